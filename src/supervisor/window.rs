//! Restart window: counts restart attempts to detect crash loops

use crate::config::RestartPolicy;

/// Result of asking the window for permission to restart
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    /// Go ahead; `attempt` is the 1-based attempt number in the current window
    Admitted { attempt: u32 },
    /// Budget used up; the supervisor must stop
    Exhausted { attempts: u32 },
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RestartWindow {
    window_start: Option<u64>,
    attempt_count: u32,
}

impl RestartWindow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a restart attempt at `now` (epoch seconds).
    ///
    /// The window restarts at `now` when it was never opened or is older than
    /// `policy.window_secs`. Once `policy.max_attempts` attempts have been
    /// admitted inside one window every further request is refused.
    pub fn admit(&mut self, now: u64, policy: &RestartPolicy) -> Admission {
        let expired = match self.window_start {
            None => true,
            Some(start) => now.saturating_sub(start) > policy.window_secs,
        };
        if expired {
            self.window_start = Some(now);
            self.attempt_count = 0;
        }

        if self.attempt_count >= policy.max_attempts {
            return Admission::Exhausted {
                attempts: self.attempt_count,
            };
        }

        self.attempt_count += 1;
        Admission::Admitted {
            attempt: self.attempt_count,
        }
    }

    pub fn attempt_count(&self) -> u32 {
        self.attempt_count
    }

    pub fn window_start(&self) -> Option<u64> {
        self.window_start
    }
}
