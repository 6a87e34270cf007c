//! ark-watchdog CLI - restart a crashed ARK server container

use std::sync::atomic::Ordering;

use clap::Parser;
use tracing::{error, info, warn};

use ark_watchdog::cli::Args;
use ark_watchdog::config::{has_errors, validate_config, IssueSeverity};
use ark_watchdog::{DockerCli, Supervisor, SystemClock, WatchdogConfig, WatchdogError};

fn main() {
    let args = Args::parse();

    if let Err(e) = ark_watchdog::logging::init(args.json, args.verbose) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    if let Err(e) = run(args) {
        error!("{}", e);
        std::process::exit(1);
    }
}

fn run(args: Args) -> ark_watchdog::Result<()> {
    let config = WatchdogConfig::from_args(&args);

    let issues = validate_config(&config);
    for issue in issues.iter().filter(|i| i.severity == IssueSeverity::Warning) {
        warn!("{}", issue.message);
    }
    if has_errors(&issues) {
        let messages: Vec<&str> = issues
            .iter()
            .filter(|i| i.severity == IssueSeverity::Error)
            .map(|i| i.message.as_str())
            .collect();
        return Err(WatchdogError::InvalidConfig(messages.join("; ")));
    }

    let runtime = DockerCli::new(&config.docker_bin);
    let mut supervisor = Supervisor::new(&config, runtime, SystemClock);

    if args.once {
        supervisor.ensure_target_exists()?;
        let state = supervisor.run_cycle()?;
        info!(container = %config.target, state = %state, "Check complete");
        return Ok(());
    }

    let running = supervisor.shutdown_handle();
    ctrlc::set_handler(move || {
        running.store(false, Ordering::SeqCst);
    })
    .map_err(|e| WatchdogError::Signal(format!("Failed to set signal handler: {}", e)))?;

    supervisor.run()
}
