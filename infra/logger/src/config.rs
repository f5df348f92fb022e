use serde::Deserialize;
use std::path::PathBuf;
use tracing_appender::rolling::Rotation;

pub(crate) const DEFAULT_MAX_FILES: usize = 10;

/// Serializable logger settings, usually a `[log]` table of an application
/// config file. Feed it to [`Logger::from_config`](crate::Logger::from_config).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Default level (`error`, `warn`, `info`, `debug`, `trace` or `off`).
    pub level: String,
    pub console: bool,
    /// Directory for rolling log files. No file output when unset.
    pub path: Option<PathBuf>,
    /// Write file output as JSON lines.
    pub json: bool,
    /// Extra filter directives, e.g. `relay_events=trace`.
    pub filter: Option<String>,
    pub rotation: LogRotation,
    pub max_files: usize,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_owned(),
            console: true,
            path: None,
            json: false,
            filter: None,
            rotation: LogRotation::default(),
            max_files: DEFAULT_MAX_FILES,
        }
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogRotation {
    Minutely,
    Hourly,
    #[default]
    Daily,
    Never,
}

impl From<LogRotation> for Rotation {
    fn from(rotation: LogRotation) -> Self {
        match rotation {
            LogRotation::Minutely => Self::MINUTELY,
            LogRotation::Hourly => Self::HOURLY,
            LogRotation::Daily => Self::DAILY,
            LogRotation::Never => Self::NEVER,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_missing_fields_use_defaults() {
        let config: LogConfig = serde_json::from_value(json!({ "level": "debug" })).unwrap();
        assert_eq!(config.level, "debug");
        assert!(config.console);
        assert_eq!(config.rotation, LogRotation::Daily);
        assert_eq!(config.max_files, DEFAULT_MAX_FILES);
    }

    #[test]
    fn test_full_table() {
        let config: LogConfig = serde_json::from_value(json!({
            "level": "warn",
            "console": false,
            "path": "/var/log/relay",
            "json": true,
            "filter": "relay_events=trace",
            "rotation": "hourly",
            "max_files": 3,
        }))
        .unwrap();

        assert!(!config.console);
        assert!(config.json);
        assert_eq!(config.path.as_deref(), Some(std::path::Path::new("/var/log/relay")));
        assert_eq!(config.filter.as_deref(), Some("relay_events=trace"));
        assert_eq!(Rotation::from(config.rotation), Rotation::HOURLY);
    }
}
