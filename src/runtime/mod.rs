//! Container runtime boundary
//!
//! The supervisor only ever talks to the runtime through [`ContainerRuntime`],
//! so the docker CLI can be swapped for an in-memory fake in tests.

mod docker;
mod observation;

pub use docker::DockerCli;
pub use observation::{ContainerObservation, HealthState, LifecycleState};

use crate::error::RuntimeError;

pub trait ContainerRuntime {
    /// Whether a container with this name exists at all
    fn exists(&self, name: &str) -> Result<bool, RuntimeError>;

    /// Current lifecycle and health state. Fails if the container is gone.
    fn inspect(&self, name: &str) -> Result<ContainerObservation, RuntimeError>;

    fn restart(&self, name: &str) -> Result<(), RuntimeError>;

    /// Run a command inside the container
    fn exec(&self, name: &str, command: &[String]) -> Result<(), RuntimeError>;
}
