//! ark-watchdog - keeps an ARK: Survival Ascended server container alive
//!
//! The watchdog polls a docker container, saves the world and restarts the
//! container when it crashes or its health check fails. Too many restarts in
//! a short window stop the watchdog instead of feeding a crash loop.
//!
//! # Example
//!
//! ```no_run
//! use ark_watchdog::{DockerCli, Supervisor, SystemClock, WatchdogConfig};
//!
//! let config = WatchdogConfig::default();
//! let mut supervisor = Supervisor::new(&config, DockerCli::default(), SystemClock);
//! supervisor.run().unwrap();
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod runtime;
pub mod supervisor;

pub use config::{RestartPolicy, WatchdogConfig};
pub use error::{Result, RuntimeError, WatchdogError};
pub use runtime::{ContainerObservation, ContainerRuntime, DockerCli, HealthState, LifecycleState};
pub use supervisor::{RestartOutcome, Supervisor, SupervisorStats, SystemClock, TargetState};
