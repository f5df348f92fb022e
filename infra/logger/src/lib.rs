//! # Logger
//!
//! Installs the process-wide `tracing` subscriber of a Relay binary from a
//! [`LogConfig`], usually the `[log]` table of its config file.
//!
//! * Console output goes to stderr, keeping stdout for program output.
//!   Colors are only used when stderr is a terminal.
//! * `path` adds a non-blocking rolling file appender; `json` switches the
//!   file to JSON lines.
//! * `level` is the default directive. Without `filter`, `RUST_LOG`
//!   refines it; with `filter`, those directives are used instead.
//!
//! ## Example
//!
//! ```rust
//! use relay_logger::{LogConfig, Logger};
//!
//! let config = LogConfig { level: "debug".into(), ..LogConfig::default() };
//! let _logger = Logger::from_config("my-app", &config).unwrap();
//! tracing::debug!("visible");
//! ```

mod config;
mod error;

pub use crate::config::{LogConfig, LogRotation};
pub use crate::error::{LoggerError, LoggerErrorExt};
pub use tracing::level_filters::LevelFilter;

use std::fs;
use std::io::{self, IsTerminal};
use std::path::Path;
use tracing::Subscriber;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::RollingFileAppender;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, fmt};

const LOG_FILE_SUFFIX: &str = "log";

type BoxedLayer<S> = Box<dyn Layer<S> + Send + Sync>;

/// Handle to the installed subscriber.
///
/// Holds the file writer's worker guard: keep it alive until shutdown so
/// buffered lines reach the file.
#[must_use = "Dropping this handle stops the background log writer."]
#[derive(Debug)]
pub struct Logger {
    guard: Option<WorkerGuard>,
}

impl Logger {
    /// Installs the global subscriber described by `config`.
    ///
    /// `name` prefixes rolling file names (e.g. `relay.2026-10-19.log`).
    ///
    /// # Errors
    /// Returns [`LoggerError::InvalidConfig`] for an empty name, an unknown
    /// level or a config with neither console nor file output,
    /// [`LoggerError::Filter`] for a malformed `filter`,
    /// [`LoggerError::Directory`] / [`LoggerError::Appender`] when the log
    /// file cannot be opened, and [`LoggerError::Subscriber`] when a
    /// subscriber is already installed.
    pub fn from_config(name: impl Into<String>, config: &LogConfig) -> Result<Self, LoggerError> {
        let name = name.into();
        validate(&name, config)?;
        let filter = env_filter(config)?;

        let mut layers = Vec::new();
        if config.console {
            layers.push(console_layer());
        }
        let guard = match &config.path {
            Some(dir) => {
                let (layer, guard) = file_layer(&name, dir, config)?;
                layers.push(layer);
                Some(guard)
            },
            None => None,
        };

        tracing_subscriber::registry()
            .with(filter)
            .with(layers)
            .try_init()
            .context(format!("installing logger `{name}`"))?;

        Ok(Self { guard })
    }

    /// Whether a file appender is attached.
    #[must_use]
    pub const fn writes_files(&self) -> bool {
        self.guard.is_some()
    }
}

fn validate(name: &str, config: &LogConfig) -> Result<(), LoggerError> {
    let problem = if name.trim().is_empty() {
        "logger name cannot be empty"
    } else if !config.console && config.path.is_none() {
        "no output enabled: set `console = true` or a `path`"
    } else if config.path.is_some() && config.max_files == 0 {
        "`max_files` must be greater than zero"
    } else {
        return Ok(());
    };
    Err(LoggerError::InvalidConfig { message: problem.into(), context: None })
}

fn env_filter(config: &LogConfig) -> Result<EnvFilter, LoggerError> {
    let level = config.level.parse::<LevelFilter>().map_err(|e| LoggerError::InvalidConfig {
        message: format!("unknown level `{}`: {e}", config.level).into(),
        context: None,
    })?;

    let builder = EnvFilter::builder().with_default_directive(level.into());
    match &config.filter {
        Some(filter) => builder.parse(filter).context(format!("parsing `{filter}`")),
        None => Ok(builder.from_env_lossy()),
    }
}

fn console_layer<S>() -> BoxedLayer<S>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    fmt::layer().compact().with_writer(io::stderr).with_ansi(io::stderr().is_terminal()).boxed()
}

fn file_layer<S>(
    name: &str,
    dir: &Path,
    config: &LogConfig,
) -> Result<(BoxedLayer<S>, WorkerGuard), LoggerError>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    fs::create_dir_all(dir).context(format!("creating {}", dir.display()))?;

    let appender = RollingFileAppender::builder()
        .rotation(config.rotation.into())
        .filename_prefix(name)
        .filename_suffix(LOG_FILE_SUFFIX)
        .max_log_files(config.max_files)
        .build(dir)
        .context(format!("opening log files in {}", dir.display()))?;
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let layer = fmt::layer().with_writer(writer).with_ansi(false);
    let layer = if config.json { layer.json().boxed() } else { layer.boxed() };
    Ok((layer, guard))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn config(level: &str) -> LogConfig {
        LogConfig { level: level.into(), ..LogConfig::default() }
    }

    #[test]
    fn test_validation_runs_before_install() {
        let err = Logger::from_config("  ", &LogConfig::default()).unwrap_err();
        assert!(err.to_string().contains("name cannot be empty"));

        let silent = LogConfig { console: false, ..LogConfig::default() };
        let err = Logger::from_config("relay", &silent).unwrap_err();
        assert!(matches!(err, LoggerError::InvalidConfig { .. }));

        let no_files =
            LogConfig { path: Some("logs".into()), max_files: 0, ..LogConfig::default() };
        assert!(validate("relay", &no_files).is_err());
    }

    #[test]
    fn test_unknown_level_is_rejected() {
        let err = Logger::from_config("relay", &config("chatty")).unwrap_err();
        assert!(matches!(err, LoggerError::InvalidConfig { .. }));
        assert!(err.to_string().contains("chatty"));
    }

    #[test]
    fn test_malformed_filter_is_rejected() {
        let bad = LogConfig { filter: Some("relay=loudest".into()), ..LogConfig::default() };
        let err = env_filter(&bad).unwrap_err();
        assert!(matches!(err, LoggerError::Filter { .. }));
        assert!(err.to_string().contains("relay=loudest"));
    }

    #[test]
    fn test_filter_directives_are_applied() {
        let custom = LogConfig { filter: Some("relay_events=trace".into()), ..config("warn") };
        let filter = env_filter(&custom).unwrap();
        assert!(filter.to_string().contains("relay_events=trace"));
    }

    #[test]
    #[serial]
    fn test_second_install_is_rejected() {
        let _logger = Logger::from_config("relay-unit", &config("info")).unwrap();
        let err = Logger::from_config("relay-unit-again", &config("info")).unwrap_err();
        assert!(matches!(err, LoggerError::Subscriber { .. }));
        assert!(err.to_string().contains("relay-unit-again"));
    }
}
