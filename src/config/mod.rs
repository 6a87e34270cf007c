//! Watchdog configuration
//!
//! Built from the command line (and `ARK_WATCHDOG_*` environment variables,
//! which clap folds into the same [`Args`]).

mod validator;

pub use validator::{has_errors, validate_config, ConfigIssue, IssueSeverity};

use std::path::PathBuf;

use crate::cli::Args;

pub const DEFAULT_TARGET: &str = "asa-server-1";
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 60;
/// Intervals below this only produce a warning
pub const MIN_RECOMMENDED_POLL_INTERVAL_SECS: u64 = 10;

pub const MAX_RESTART_ATTEMPTS: u32 = 3;
pub const RESTART_WINDOW_SECONDS: u64 = 300;
pub const MAX_STARTUP_WAIT_SECONDS: u64 = 120;
pub const SAVE_SETTLE_SECONDS: u64 = 3;

pub const DEFAULT_SAVE_COMMAND: &str = "asa-ctrl rcon --exec saveworld";

/// Crash-loop breaker settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RestartPolicy {
    pub max_attempts: u32,
    pub window_secs: u64,
    pub startup_timeout_secs: u64,
    pub settle_delay_secs: u64,
}

impl Default for RestartPolicy {
    fn default() -> Self {
        Self {
            max_attempts: MAX_RESTART_ATTEMPTS,
            window_secs: RESTART_WINDOW_SECONDS,
            startup_timeout_secs: MAX_STARTUP_WAIT_SECONDS,
            settle_delay_secs: SAVE_SETTLE_SECONDS,
        }
    }
}

#[derive(Debug, Clone)]
pub struct WatchdogConfig {
    /// Container to supervise
    pub target: String,
    pub poll_interval_secs: u64,
    pub docker_bin: PathBuf,
    /// Command run inside the container before a restart. `None` skips the save.
    pub save_command: Option<Vec<String>>,
    pub policy: RestartPolicy,
}

impl Default for WatchdogConfig {
    fn default() -> Self {
        Self {
            target: DEFAULT_TARGET.to_string(),
            poll_interval_secs: DEFAULT_POLL_INTERVAL_SECS,
            docker_bin: PathBuf::from("docker"),
            save_command: Some(split_command(DEFAULT_SAVE_COMMAND)),
            policy: RestartPolicy::default(),
        }
    }
}

impl WatchdogConfig {
    pub fn from_args(args: &Args) -> Self {
        let save_command = if args.no_save {
            None
        } else {
            Some(split_command(&args.save_command))
        };

        Self {
            target: args.target.clone(),
            poll_interval_secs: args.interval,
            docker_bin: args.docker_bin.clone(),
            save_command,
            policy: RestartPolicy {
                max_attempts: args.max_restart_attempts,
                window_secs: args.restart_window,
                startup_timeout_secs: args.startup_timeout,
                settle_delay_secs: args.settle_delay,
            },
        }
    }
}

/// Whitespace split; the save command is passed straight to `docker exec`
pub fn split_command(command: &str) -> Vec<String> {
    command.split_whitespace().map(str::to_string).collect()
}
