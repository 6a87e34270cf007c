//! Time source for the supervisor

use std::time::Duration;

/// Wall clock plus blocking sleep. Injected so tests can run the
/// supervisor without waiting in real time.
pub trait Clock {
    /// Seconds since the Unix epoch
    fn now(&self) -> u64;

    fn sleep(&self, duration: Duration);
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> u64 {
        chrono::Utc::now().timestamp().max(0) as u64
    }

    fn sleep(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

/// Clock whose `sleep` just advances the current time
#[cfg(test)]
#[derive(Debug)]
pub(crate) struct FakeClock {
    now: std::cell::Cell<u64>,
}

#[cfg(test)]
impl FakeClock {
    pub(crate) fn starting_at(now: u64) -> Self {
        Self {
            now: std::cell::Cell::new(now),
        }
    }

    pub(crate) fn advance(&self, secs: u64) {
        self.now.set(self.now.get() + secs);
    }
}

#[cfg(test)]
impl Clock for FakeClock {
    fn now(&self) -> u64 {
        self.now.get()
    }

    fn sleep(&self, duration: Duration) {
        self.advance(duration.as_secs());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_clock_is_past_2020() {
        assert!(SystemClock.now() > 1_577_836_800);
    }

    #[test]
    fn test_fake_clock_sleep_advances() {
        let clock = FakeClock::starting_at(1_000);
        clock.sleep(Duration::from_secs(3));
        assert_eq!(clock.now(), 1_003);
    }
}
