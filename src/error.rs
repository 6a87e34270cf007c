//! Error types for ark-watchdog

use thiserror::Error;

/// Failures reported by a [`ContainerRuntime`](crate::runtime::ContainerRuntime) implementation
#[derive(Error, Debug)]
pub enum RuntimeError {
    #[error("Failed to run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("`{command}` exited with {code}: {stderr}")]
    CommandFailed {
        command: String,
        code: String,
        stderr: String,
    },

    #[error("No such container: {0}")]
    NotFound(String),

    #[error("Malformed inspect output: {0}")]
    Parse(String),
}

#[derive(Error, Debug)]
pub enum WatchdogError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Container '{0}' does not exist")]
    TargetNotFound(String),

    #[error("Container '{name}' can no longer be inspected (was it removed?): {source}")]
    TargetVanished {
        name: String,
        #[source]
        source: RuntimeError,
    },

    #[error("Restart limit reached: {attempts} attempts within {window_secs}s, giving up")]
    RestartBudgetExhausted { attempts: u32, window_secs: u64 },

    #[error("Runtime error: {0}")]
    Runtime(#[from] RuntimeError),

    #[error("Signal handler error: {0}")]
    Signal(String),
}

pub type Result<T> = std::result::Result<T, WatchdogError>;
