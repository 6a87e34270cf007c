//! `docker` CLI adapter

use std::path::PathBuf;
use std::process::{Command, Output};

use tracing::debug;

use super::observation::ContainerObservation;
use super::ContainerRuntime;
use crate::error::RuntimeError;

/// Talks to the container runtime by shelling out to the docker binary
#[derive(Debug, Clone)]
pub struct DockerCli {
    program: PathBuf,
}

impl DockerCli {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    fn describe(&self, args: &[&str]) -> String {
        format!("{} {}", self.program.display(), args.join(" "))
    }

    fn run(&self, args: &[&str]) -> Result<Output, RuntimeError> {
        debug!(command = %self.describe(args), "running");
        Command::new(&self.program)
            .args(args)
            .output()
            .map_err(|source| RuntimeError::Spawn {
                program: self.program.display().to_string(),
                source,
            })
    }

    /// Run and require a zero exit status
    fn run_checked(&self, args: &[&str]) -> Result<Output, RuntimeError> {
        let output = self.run(args)?;
        if output.status.success() {
            return Ok(output);
        }

        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        if is_missing_container(&stderr) {
            // Every call that reaches here passes the container name second
            return Err(RuntimeError::NotFound(
                args.get(1).copied().unwrap_or_default().to_string(),
            ));
        }

        Err(RuntimeError::CommandFailed {
            command: self.describe(args),
            code: output
                .status
                .code()
                .map(|c| c.to_string())
                .unwrap_or_else(|| "signal".to_string()),
            stderr,
        })
    }
}

impl Default for DockerCli {
    fn default() -> Self {
        Self::new("docker")
    }
}

fn is_missing_container(stderr: &str) -> bool {
    let lower = stderr.to_lowercase();
    lower.contains("no such container") || lower.contains("no such object")
}

impl ContainerRuntime for DockerCli {
    fn exists(&self, name: &str) -> Result<bool, RuntimeError> {
        match self.run_checked(&["inspect", name, "--type", "container", "--format", "{{.Id}}"]) {
            Ok(_) => Ok(true),
            Err(RuntimeError::NotFound(_)) => Ok(false),
            Err(e) => Err(e),
        }
    }

    fn inspect(&self, name: &str) -> Result<ContainerObservation, RuntimeError> {
        let output = self.run_checked(&["inspect", name, "--type", "container"])?;
        ContainerObservation::from_inspect_json(&String::from_utf8_lossy(&output.stdout))
    }

    fn restart(&self, name: &str) -> Result<(), RuntimeError> {
        self.run_checked(&["restart", name]).map(|_| ())
    }

    fn exec(&self, name: &str, command: &[String]) -> Result<(), RuntimeError> {
        let mut args = vec!["exec", name];
        args.extend(command.iter().map(String::as_str));
        self.run_checked(&args).map(|_| ())
    }
}
