//! Classification of a container observation

use std::fmt;

use crate::runtime::{ContainerObservation, HealthState, LifecycleState};

/// What the supervisor makes of one observation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetState {
    /// Running with no health check, or a passing one
    RunningHealthy,
    /// Running while the health check is still warming up
    RunningDegraded,
    RunningUnhealthy,
    /// Created or restarting; the runtime is already moving it
    StoppedExpected,
    /// Exited or dead
    StoppedCrashed,
    StoppedUnknown,
}

impl TargetState {
    pub fn classify(observation: &ContainerObservation) -> Self {
        match &observation.lifecycle {
            LifecycleState::Running => match observation.health {
                HealthState::None | HealthState::Healthy => TargetState::RunningHealthy,
                HealthState::Unhealthy => TargetState::RunningUnhealthy,
                HealthState::Starting | HealthState::Other(_) => TargetState::RunningDegraded,
            },
            LifecycleState::Created | LifecycleState::Restarting => TargetState::StoppedExpected,
            LifecycleState::Exited | LifecycleState::Dead => TargetState::StoppedCrashed,
            LifecycleState::Paused | LifecycleState::Removing | LifecycleState::Unknown(_) => {
                TargetState::StoppedUnknown
            }
        }
    }

    pub fn needs_restart(&self) -> bool {
        matches!(
            self,
            TargetState::RunningUnhealthy
                | TargetState::StoppedCrashed
                | TargetState::StoppedUnknown
        )
    }
}

impl fmt::Display for TargetState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            TargetState::RunningHealthy => "running_healthy",
            TargetState::RunningDegraded => "running_degraded",
            TargetState::RunningUnhealthy => "running_unhealthy",
            TargetState::StoppedExpected => "stopped_expected",
            TargetState::StoppedCrashed => "stopped_crashed",
            TargetState::StoppedUnknown => "stopped_unknown",
        };
        write!(f, "{}", label)
    }
}
