//! Polling schedule configuration.
//!
//! The schedule is optional: without a YAML file the defaults below apply.
//!
//! ```yaml
//! fetch_interval_hours: 3
//! trigger_minute: 59
//! sleep_after_execution_secs: 17640
//! polling_interval_secs: 30
//! request_timeout_secs: 30
//! ```

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tracing::info;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("cannot read config {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config {}: {source}", .path.display())]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("invalid schedule: {0}")]
    Invalid(String),
}

/// When and how often a polling cycle runs.
///
/// A cycle starts when the local hour is a multiple of
/// `fetch_interval_hours` and the minute equals `trigger_minute`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Schedule {
    pub fetch_interval_hours: u32,
    pub trigger_minute: u32,
    /// Pause after a cycle, long enough to step past the trigger minute.
    pub sleep_after_execution_secs: u64,
    /// Pause between clock checks while waiting for the trigger.
    pub polling_interval_secs: u64,
    pub request_timeout_secs: u64,
}

impl Default for Schedule {
    fn default() -> Self {
        Self {
            fetch_interval_hours: 3,
            trigger_minute: 59,
            sleep_after_execution_secs: 17_640,
            polling_interval_secs: 30,
            request_timeout_secs: 30,
        }
    }
}

impl Schedule {
    pub fn sleep_after_execution(&self) -> Duration {
        Duration::from_secs(self.sleep_after_execution_secs)
    }

    pub fn polling_interval(&self) -> Duration {
        Duration::from_secs(self.polling_interval_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    fn validate(self) -> Result<Self, ConfigError> {
        if self.fetch_interval_hours == 0 || self.fetch_interval_hours > 24 {
            return Err(ConfigError::Invalid(format!(
                "fetch_interval_hours must be between 1 and 24, got {}",
                self.fetch_interval_hours
            )));
        }
        if self.trigger_minute > 59 {
            return Err(ConfigError::Invalid(format!(
                "trigger_minute must be between 0 and 59, got {}",
                self.trigger_minute
            )));
        }
        if self.polling_interval_secs == 0 {
            return Err(ConfigError::Invalid(
                "polling_interval_secs must be positive".to_string(),
            ));
        }
        Ok(self)
    }

    pub fn from_yaml(yaml: &str, path: &Path) -> Result<Self, ConfigError> {
        let schedule: Schedule = serde_yaml::from_str(yaml).map_err(|source| ConfigError::Yaml {
            path: path.to_path_buf(),
            source,
        })?;
        schedule.validate()
    }
}

/// Load the schedule from `path`, or the defaults when no path is given.
///
/// # Arguments
///
/// * `path` - Optional YAML file; keys it leaves out keep their defaults
///
/// # Returns
///
/// A validated [`Schedule`].
///
/// # Errors
///
/// - [`ConfigError::Io`] if the file cannot be read
/// - [`ConfigError::Yaml`] on malformed YAML or an unknown key
/// - [`ConfigError::Invalid`] when a value is out of range
pub async fn load_schedule(path: Option<&Path>) -> Result<Schedule, ConfigError> {
    let Some(path) = path else {
        return Ok(Schedule::default());
    };
    let yaml = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
    let schedule = Schedule::from_yaml(&yaml, path)?;
    info!(path = %path.display(), ?schedule, "Loaded schedule");
    Ok(schedule)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let schedule =
            Schedule::from_yaml("trigger_minute: 5\npolling_interval_secs: 10\n", Path::new("s.yaml"))
                .unwrap();
        assert_eq!(schedule.trigger_minute, 5);
        assert_eq!(schedule.polling_interval(), Duration::from_secs(10));
        assert_eq!(schedule.fetch_interval_hours, 3);
        assert_eq!(schedule.sleep_after_execution(), Duration::from_secs(17_640));
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        let err = Schedule::from_yaml("fetch_interval_hours: 0\n", Path::new("s.yaml")).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
        let err = Schedule::from_yaml("trigger_minute: 60\n", Path::new("s.yaml")).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_unknown_key_is_rejected() {
        let err = Schedule::from_yaml("trigger_minit: 5\n", Path::new("s.yaml")).unwrap_err();
        assert!(matches!(err, ConfigError::Yaml { .. }));
    }

    #[tokio::test]
    async fn test_load_schedule_defaults_without_path() {
        assert_eq!(load_schedule(None).await.unwrap(), Schedule::default());
    }

    #[tokio::test]
    async fn test_load_schedule_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("schedule.yaml");
        std::fs::write(&path, "fetch_interval_hours: 1\ntrigger_minute: 0\n").unwrap();

        let schedule = load_schedule(Some(path.as_path())).await.unwrap();

        assert_eq!(schedule.fetch_interval_hours, 1);
        assert_eq!(schedule.trigger_minute, 0);
    }
}
