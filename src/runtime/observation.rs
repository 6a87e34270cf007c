//! Point-in-time container state as reported by the runtime

use std::fmt;

use serde::Deserialize;

use crate::error::RuntimeError;

/// Coarse lifecycle status of a container
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LifecycleState {
    Running,
    Exited,
    Dead,
    Created,
    Restarting,
    Paused,
    Removing,
    /// Anything the runtime reports that we don't recognize
    Unknown(String),
}

impl LifecycleState {
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "running" => LifecycleState::Running,
            "exited" => LifecycleState::Exited,
            "dead" => LifecycleState::Dead,
            "created" => LifecycleState::Created,
            "restarting" => LifecycleState::Restarting,
            "paused" => LifecycleState::Paused,
            "removing" => LifecycleState::Removing,
            _ => LifecycleState::Unknown(raw.trim().to_string()),
        }
    }
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LifecycleState::Running => write!(f, "running"),
            LifecycleState::Exited => write!(f, "exited"),
            LifecycleState::Dead => write!(f, "dead"),
            LifecycleState::Created => write!(f, "created"),
            LifecycleState::Restarting => write!(f, "restarting"),
            LifecycleState::Paused => write!(f, "paused"),
            LifecycleState::Removing => write!(f, "removing"),
            LifecycleState::Unknown(raw) if raw.is_empty() => write!(f, "unknown"),
            LifecycleState::Unknown(raw) => write!(f, "{}", raw),
        }
    }
}

/// Health check result. `None` covers both "no health check defined" and
/// an explicit `none` from the runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthState {
    None,
    Starting,
    Healthy,
    Unhealthy,
    Other(String),
}

impl HealthState {
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "" | "none" => HealthState::None,
            "starting" => HealthState::Starting,
            "healthy" => HealthState::Healthy,
            "unhealthy" => HealthState::Unhealthy,
            _ => HealthState::Other(raw.trim().to_string()),
        }
    }
}

impl fmt::Display for HealthState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HealthState::None => write!(f, "none"),
            HealthState::Starting => write!(f, "starting"),
            HealthState::Healthy => write!(f, "healthy"),
            HealthState::Unhealthy => write!(f, "unhealthy"),
            HealthState::Other(raw) => write!(f, "{}", raw),
        }
    }
}

/// Snapshot of a container obtained from [`ContainerRuntime::inspect`](super::ContainerRuntime::inspect)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerObservation {
    pub lifecycle: LifecycleState,
    pub health: HealthState,
    /// Only meaningful when `lifecycle` is `Exited`
    pub exit_code: i64,
    /// Output of the most recent health probe, if any
    pub health_output: Option<String>,
}

impl ContainerObservation {
    pub fn new(lifecycle: LifecycleState, health: HealthState) -> Self {
        Self {
            lifecycle,
            health,
            exit_code: 0,
            health_output: None,
        }
    }

    pub fn running() -> Self {
        Self::new(LifecycleState::Running, HealthState::None)
    }

    pub fn exited(exit_code: i64) -> Self {
        Self {
            exit_code,
            ..Self::new(LifecycleState::Exited, HealthState::None)
        }
    }

    pub fn with_health_output(mut self, output: impl Into<String>) -> Self {
        self.health_output = Some(output.into());
        self
    }

    /// Parse the JSON array printed by `docker container inspect`
    pub fn from_inspect_json(raw: &str) -> Result<Self, RuntimeError> {
        let entries: Vec<InspectEntry> =
            serde_json::from_str(raw).map_err(|e| RuntimeError::Parse(e.to_string()))?;
        let entry = entries
            .into_iter()
            .next()
            .ok_or_else(|| RuntimeError::Parse("empty inspect result".to_string()))?;

        let state = entry.state;
        let (health, health_output) = match state.health {
            Some(h) => {
                let output = h
                    .log
                    .last()
                    .map(|probe| probe.output.trim().to_string())
                    .filter(|o| !o.is_empty());
                (HealthState::parse(&h.status), output)
            }
            None => (HealthState::None, None),
        };

        Ok(Self {
            lifecycle: LifecycleState::parse(&state.status),
            health,
            exit_code: state.exit_code,
            health_output,
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct InspectEntry {
    state: InspectState,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct InspectState {
    #[serde(default)]
    status: String,
    #[serde(default)]
    exit_code: i64,
    #[serde(default)]
    health: Option<InspectHealth>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct InspectHealth {
    #[serde(default)]
    status: String,
    #[serde(default)]
    log: Vec<HealthProbe>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct HealthProbe {
    #[serde(default)]
    output: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_lifecycle() {
        assert_eq!(LifecycleState::parse("running"), LifecycleState::Running);
        assert_eq!(LifecycleState::parse("Exited\n"), LifecycleState::Exited);
        assert_eq!(
            LifecycleState::parse("frozen"),
            LifecycleState::Unknown("frozen".to_string())
        );
    }

    #[test]
    fn test_parse_health() {
        assert_eq!(HealthState::parse(""), HealthState::None);
        assert_eq!(HealthState::parse("starting"), HealthState::Starting);
        assert_eq!(HealthState::parse("unhealthy"), HealthState::Unhealthy);
    }

    #[test]
    fn test_inspect_without_healthcheck() {
        let raw = r#"[{"Id":"abc","State":{"Status":"exited","Running":false,"ExitCode":1,"Error":""}}]"#;
        let obs = ContainerObservation::from_inspect_json(raw).unwrap();
        assert_eq!(obs.lifecycle, LifecycleState::Exited);
        assert_eq!(obs.health, HealthState::None);
        assert_eq!(obs.exit_code, 1);
        assert!(obs.health_output.is_none());
    }

    #[test]
    fn test_inspect_with_health_log() {
        let raw = r#"[{"State":{"Status":"running","ExitCode":0,"Health":{
            "Status":"unhealthy","FailingStreak":4,
            "Log":[{"ExitCode":0,"Output":"ok"},{"ExitCode":1,"Output":"rcon timed out\n"}]}}}]"#;
        let obs = ContainerObservation::from_inspect_json(raw).unwrap();
        assert_eq!(obs.lifecycle, LifecycleState::Running);
        assert_eq!(obs.health, HealthState::Unhealthy);
        assert_eq!(obs.health_output.as_deref(), Some("rcon timed out"));
    }

    #[test]
    fn test_inspect_null_health() {
        let raw = r#"[{"State":{"Status":"running","ExitCode":0,"Health":null}}]"#;
        let obs = ContainerObservation::from_inspect_json(raw).unwrap();
        assert_eq!(obs.health, HealthState::None);
    }

    #[test]
    fn test_inspect_empty_array() {
        let err = ContainerObservation::from_inspect_json("[]").unwrap_err();
        assert!(matches!(err, RuntimeError::Parse(_)));
    }

    #[test]
    fn test_inspect_garbage() {
        assert!(ContainerObservation::from_inspect_json("Error: nope").is_err());
    }
}
