//! Configuration checks run before the supervisor starts

use super::{WatchdogConfig, MIN_RECOMMENDED_POLL_INTERVAL_SECS};

/// A single problem found in the configuration
#[derive(Debug, Clone)]
pub struct ConfigIssue {
    pub message: String,
    pub severity: IssueSeverity,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IssueSeverity {
    Error,
    Warning,
}

impl std::fmt::Display for ConfigIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let prefix = match self.severity {
            IssueSeverity::Error => "ERROR",
            IssueSeverity::Warning => "WARNING",
        };
        write!(f, "{}: {}", prefix, self.message)
    }
}

impl ConfigIssue {
    fn error(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            severity: IssueSeverity::Error,
        }
    }

    fn warning(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            severity: IssueSeverity::Warning,
        }
    }
}

pub fn validate_config(config: &WatchdogConfig) -> Vec<ConfigIssue> {
    let mut issues = Vec::new();

    if config.target.trim().is_empty() {
        issues.push(ConfigIssue::error("Container name must not be empty"));
    }

    if config.poll_interval_secs == 0 {
        issues.push(ConfigIssue::error("Poll interval must be at least 1 second"));
    } else if config.poll_interval_secs < MIN_RECOMMENDED_POLL_INTERVAL_SECS {
        issues.push(ConfigIssue::warning(format!(
            "Poll interval of {}s is very short (recommended: {}s or more)",
            config.poll_interval_secs, MIN_RECOMMENDED_POLL_INTERVAL_SECS
        )));
    }

    if config.policy.max_attempts == 0 {
        issues.push(ConfigIssue::error("Max restart attempts must be at least 1"));
    }

    if config.policy.window_secs == 0 {
        issues.push(ConfigIssue::error("Restart window must be at least 1 second"));
    }

    if let Some(command) = &config.save_command {
        if command.is_empty() {
            issues.push(ConfigIssue::error(
                "Save command is empty (use --no-save to disable saving)",
            ));
        }
    }

    issues
}

pub fn has_errors(issues: &[ConfigIssue]) -> bool {
    issues.iter().any(|i| i.severity == IssueSeverity::Error)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_clean() {
        let issues = validate_config(&WatchdogConfig::default());
        assert!(issues.is_empty());
    }

    #[test]
    fn test_short_interval_is_only_a_warning() {
        let config = WatchdogConfig {
            poll_interval_secs: 5,
            ..Default::default()
        };
        let issues = validate_config(&config);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].severity, IssueSeverity::Warning);
        assert!(!has_errors(&issues));
    }

    #[test]
    fn test_zero_interval_is_an_error() {
        let config = WatchdogConfig {
            poll_interval_secs: 0,
            ..Default::default()
        };
        assert!(has_errors(&validate_config(&config)));
    }

    #[test]
    fn test_empty_target_and_save_command() {
        let config = WatchdogConfig {
            target: "  ".to_string(),
            save_command: Some(Vec::new()),
            ..Default::default()
        };
        let issues = validate_config(&config);
        assert_eq!(
            issues
                .iter()
                .filter(|i| i.severity == IssueSeverity::Error)
                .count(),
            2
        );
    }

    #[test]
    fn test_zero_attempts() {
        let mut config = WatchdogConfig::default();
        config.policy.max_attempts = 0;
        let issues = validate_config(&config);
        assert!(has_errors(&issues));
        assert!(issues[0].to_string().starts_with("ERROR: "));
    }
}
