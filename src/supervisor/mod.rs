//! Container supervisor
//!
//! Polls one container, classifies what it sees and restarts the container
//! when it is down or unhealthy. A [`RestartWindow`] caps how many restarts
//! may happen in a short span; once the cap is hit the supervisor stops
//! instead of feeding a crash loop.

mod clock;
mod state;
mod window;

pub use clock::{Clock, SystemClock};
pub use state::TargetState;
pub use window::{Admission, RestartWindow};

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, error, info, warn};

use crate::config::{RestartPolicy, WatchdogConfig};
use crate::error::{Result, WatchdogError};
use crate::runtime::{ContainerObservation, ContainerRuntime, LifecycleState};

/// How a single restart attempt ended, short of a fatal error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RestartOutcome {
    /// Container observed running again after `waited_secs`
    Recovered { waited_secs: u64 },
    /// Restart issued, container never reached running in time
    TimedOut,
    /// The restart command itself failed
    RestartFailed,
    /// Shutdown was requested while waiting for the container
    Interrupted,
}

/// Counters kept for the lifetime of one supervisor run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SupervisorStats {
    pub polls: u64,
    pub restarts_issued: u32,
    pub saves_failed: u32,
    pub startup_timeouts: u32,
}

pub struct Supervisor<R: ContainerRuntime, C: Clock = SystemClock> {
    runtime: R,
    clock: C,
    target: String,
    poll_interval: Duration,
    save_command: Option<Vec<String>>,
    policy: RestartPolicy,
    window: RestartWindow,
    running: Arc<AtomicBool>,
    stats: SupervisorStats,
}

impl<R: ContainerRuntime, C: Clock> Supervisor<R, C> {
    pub fn new(config: &WatchdogConfig, runtime: R, clock: C) -> Self {
        Self {
            runtime,
            clock,
            target: config.target.clone(),
            poll_interval: Duration::from_secs(config.poll_interval_secs),
            save_command: config.save_command.clone(),
            policy: config.policy.clone(),
            window: RestartWindow::new(),
            running: Arc::new(AtomicBool::new(true)),
            stats: SupervisorStats::default(),
        }
    }

    /// Flag that keeps the poll loop alive; clear it to shut down
    pub fn shutdown_handle(&self) -> Arc<AtomicBool> {
        self.running.clone()
    }

    pub fn stop(&self) {
        self.running.store(false, Ordering::SeqCst);
    }

    fn shutdown_requested(&self) -> bool {
        !self.running.load(Ordering::SeqCst)
    }

    pub fn stats(&self) -> &SupervisorStats {
        &self.stats
    }

    pub fn restart_window(&self) -> &RestartWindow {
        &self.window
    }

    /// Fail unless the target container exists
    pub fn ensure_target_exists(&self) -> Result<()> {
        if self.runtime.exists(&self.target)? {
            Ok(())
        } else {
            Err(WatchdogError::TargetNotFound(self.target.clone()))
        }
    }

    /// Watch the container until shutdown or a fatal error
    pub fn run(&mut self) -> Result<()> {
        self.ensure_target_exists()?;

        info!(
            container = %self.target,
            interval_secs = self.poll_interval.as_secs(),
            max_restarts = self.policy.max_attempts,
            window_secs = self.policy.window_secs,
            "Watchdog started"
        );

        while !self.shutdown_requested() {
            self.run_cycle()?;
            self.sleep_interruptible(self.poll_interval);
        }

        info!(
            container = %self.target,
            polls = self.stats.polls,
            restarts = self.stats.restarts_issued,
            "Shutdown requested, watchdog stopped"
        );
        Ok(())
    }

    /// One check, followed by a restart if the container needs one
    pub fn run_cycle(&mut self) -> Result<TargetState> {
        let state = self.poll()?;
        if state.needs_restart() {
            self.attempt_restart()?;
        }
        Ok(state)
    }

    /// Inspect and classify the container. A failed inspect means the
    /// container is gone, which is fatal.
    pub fn poll(&mut self) -> Result<TargetState> {
        self.stats.polls += 1;
        let observation = self.inspect()?;
        let state = TargetState::classify(&observation);
        self.log_observation(state, &observation);
        Ok(state)
    }

    fn inspect(&self) -> Result<ContainerObservation> {
        self.runtime
            .inspect(&self.target)
            .map_err(|source| WatchdogError::TargetVanished {
                name: self.target.clone(),
                source,
            })
    }

    fn log_observation(&self, state: TargetState, observation: &ContainerObservation) {
        let reason = observation.health_output.as_deref().unwrap_or("");
        match state {
            TargetState::RunningHealthy => info!(
                container = %self.target,
                state = %state,
                health = %observation.health,
                "Server is running"
            ),
            TargetState::RunningDegraded => info!(
                container = %self.target,
                state = %state,
                health = %observation.health,
                reason,
                "Server is running, health check not settled yet"
            ),
            TargetState::RunningUnhealthy => warn!(
                container = %self.target,
                state = %state,
                reason,
                "Server health check failing"
            ),
            TargetState::StoppedExpected => info!(
                container = %self.target,
                state = %state,
                lifecycle = %observation.lifecycle,
                "Server is in a transitional state, leaving it alone"
            ),
            TargetState::StoppedCrashed => warn!(
                container = %self.target,
                state = %state,
                lifecycle = %observation.lifecycle,
                exit_code = observation.exit_code,
                "Server crash detected"
            ),
            TargetState::StoppedUnknown => warn!(
                container = %self.target,
                state = %state,
                lifecycle = %observation.lifecycle,
                "Server in unexpected state, treating it as down"
            ),
        }
    }

    /// Save, restart and wait for the container, subject to the restart window.
    ///
    /// Returns `RestartBudgetExhausted` once too many attempts land inside one
    /// window. Every other failure is logged and reported through the outcome.
    pub fn attempt_restart(&mut self) -> Result<RestartOutcome> {
        let now = self.clock.now();
        let attempt = match self.window.admit(now, &self.policy) {
            Admission::Admitted { attempt } => attempt,
            // Reported once, by whoever handles the error
            Admission::Exhausted { attempts } => {
                return Err(WatchdogError::RestartBudgetExhausted {
                    attempts,
                    window_secs: self.policy.window_secs,
                });
            }
        };

        info!(
            container = %self.target,
            attempt,
            max = self.policy.max_attempts,
            "Attempting restart"
        );

        self.save_world();

        if let Err(e) = self.runtime.restart(&self.target) {
            error!(container = %self.target, error = %e, "Restart command failed");
            return Ok(RestartOutcome::RestartFailed);
        }
        self.stats.restarts_issued += 1;

        let outcome = self.wait_for_running()?;
        match outcome {
            RestartOutcome::Recovered { waited_secs } => info!(
                container = %self.target,
                attempt,
                waited_secs,
                "Server is running again"
            ),
            RestartOutcome::TimedOut => {
                self.stats.startup_timeouts += 1;
                error!(
                    container = %self.target,
                    timeout_secs = self.policy.startup_timeout_secs,
                    "Server did not reach running state in time, will re-check next cycle"
                );
            }
            RestartOutcome::Interrupted => warn!(
                container = %self.target,
                "Shutdown requested while waiting for the server to start"
            ),
            RestartOutcome::RestartFailed => {}
        }
        Ok(outcome)
    }

    /// Best effort; a failed save never blocks the restart
    fn save_world(&mut self) {
        let Some(command) = &self.save_command else {
            debug!(container = %self.target, "World save disabled");
            return;
        };

        info!(container = %self.target, "Saving world before restart");
        match self.runtime.exec(&self.target, command) {
            Ok(()) => {
                info!(
                    container = %self.target,
                    settle_secs = self.policy.settle_delay_secs,
                    "World saved"
                );
                self.clock
                    .sleep(Duration::from_secs(self.policy.settle_delay_secs));
            }
            Err(e) => {
                self.stats.saves_failed += 1;
                warn!(
                    container = %self.target,
                    error = %e,
                    "World save failed, restarting anyway"
                );
            }
        }
    }

    fn wait_for_running(&self) -> Result<RestartOutcome> {
        let timeout = self.policy.startup_timeout_secs;
        let mut waited = 0;
        loop {
            let observation = self.inspect()?;
            if observation.lifecycle == LifecycleState::Running {
                return Ok(RestartOutcome::Recovered {
                    waited_secs: waited,
                });
            }
            debug!(
                container = %self.target,
                lifecycle = %observation.lifecycle,
                waited_secs = waited,
                "Waiting for server to start"
            );
            if waited >= timeout {
                return Ok(RestartOutcome::TimedOut);
            }
            if self.shutdown_requested() {
                return Ok(RestartOutcome::Interrupted);
            }
            self.clock.sleep(Duration::from_secs(1));
            waited += 1;
        }
    }

    /// Sleep in one-second slices so a shutdown request is noticed quickly
    fn sleep_interruptible(&self, total: Duration) {
        let mut remaining = total.as_secs();
        while remaining > 0 && !self.shutdown_requested() {
            self.clock.sleep(Duration::from_secs(1));
            remaining -= 1;
        }
    }
}
