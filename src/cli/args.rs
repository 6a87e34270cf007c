//! CLI argument parsing

use clap::Parser;
use std::path::PathBuf;

use crate::config::{
    DEFAULT_POLL_INTERVAL_SECS, DEFAULT_SAVE_COMMAND, DEFAULT_TARGET, MAX_RESTART_ATTEMPTS,
    MAX_STARTUP_WAIT_SECONDS, RESTART_WINDOW_SECONDS, SAVE_SETTLE_SECONDS,
};

#[derive(Parser, Debug)]
#[command(name = "ark-watchdog")]
#[command(
    author,
    version,
    about = "Restart a crashed ARK: Survival Ascended server container",
    long_about = "Polls a docker container, saves the world and restarts it when it crashes \
                  or turns unhealthy. Stops with a non-zero status if the container keeps \
                  crashing (more than the allowed restarts within the restart window)."
)]
pub struct Args {
    /// Name of the server container to watch
    #[arg(default_value = DEFAULT_TARGET, env = "ARK_WATCHDOG_CONTAINER")]
    pub target: String,

    /// Seconds between checks
    #[arg(default_value_t = DEFAULT_POLL_INTERVAL_SECS, env = "ARK_WATCHDOG_INTERVAL")]
    pub interval: u64,

    /// Path to the docker binary
    #[arg(long, default_value = "docker", env = "ARK_WATCHDOG_DOCKER")]
    pub docker_bin: PathBuf,

    /// Command executed inside the container to save the world before a restart
    #[arg(long, default_value = DEFAULT_SAVE_COMMAND, env = "ARK_WATCHDOG_SAVE_COMMAND")]
    pub save_command: String,

    /// Restart without attempting a world save
    #[arg(long)]
    pub no_save: bool,

    /// Restarts allowed within one restart window before giving up
    #[arg(long, default_value_t = MAX_RESTART_ATTEMPTS, env = "ARK_WATCHDOG_MAX_RESTARTS")]
    pub max_restart_attempts: u32,

    /// Length of the restart window in seconds
    #[arg(long, default_value_t = RESTART_WINDOW_SECONDS, env = "ARK_WATCHDOG_RESTART_WINDOW")]
    pub restart_window: u64,

    /// Seconds to wait for the container to come back after a restart
    #[arg(long, default_value_t = MAX_STARTUP_WAIT_SECONDS, env = "ARK_WATCHDOG_STARTUP_TIMEOUT")]
    pub startup_timeout: u64,

    /// Seconds to wait after a successful save before restarting
    #[arg(long, default_value_t = SAVE_SETTLE_SECONDS)]
    pub settle_delay: u64,

    /// Run a single check and exit
    #[arg(long)]
    pub once: bool,

    /// Log as JSON
    #[arg(long)]
    pub json: bool,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,
}
