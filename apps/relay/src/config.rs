use config::{Config, Environment, File};
use relay_events::NotifierConfig;
use relay_logger::LogConfig;
use serde::Deserialize;
use std::borrow::Cow;
use std::path::Path;
use tracing::info;

/// Prefix of environment overrides, e.g. `RELAY__NOTIFIER__MAX_DISPATCH_DEPTH=8`.
pub const ENV_PREFIX: &str = "RELAY";

#[relay_derive::relay_error]
pub enum ConfigError {
    #[error("Config error{}: {source}", format_context(context))]
    Config { source: config::ConfigError, context: Option<Cow<'static, str>> },
}

/// Top-level settings of the `relay` binary.
#[derive(Default, Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RelayConfig {
    pub log: LogConfig,
    pub notifier: NotifierConfig,
    pub subscriptions: Vec<Subscription>,
}

/// An echo listener registered at startup.
///
/// ```toml
/// [[subscriptions]]
/// event = "ws:incomingMessage -> 500"
/// label = "inbox"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Subscription {
    /// Event spec, optionally port-qualified.
    pub event: String,
    /// First column of every line the listener prints.
    pub label: String,
}

/// Loads [`RelayConfig`] from an optional file overlaid with `RELAY__`
/// environment variables. Without a file, defaults plus environment apply.
///
/// # Errors
/// Returns [`ConfigError::Config`] if the file is missing or malformed, or if
/// the merged values do not match [`RelayConfig`].
pub fn load_config(path: Option<&Path>) -> Result<RelayConfig, ConfigError> {
    let mut builder = Config::builder();
    if let Some(path) = path {
        info!("Loading config from {}", path.display());
        builder = builder.add_source(File::from(path).required(true));
    }

    let config = builder
        .add_source(
            Environment::with_prefix(ENV_PREFIX)
                .separator("__")
                .convert_case(config::Case::Snake),
        )
        .build()
        .context("Failed to build config")?
        .try_deserialize::<RelayConfig>()
        .context("Failed to deserialize config")?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_file_with_every_section() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("relay.toml");
        fs::write(
            &path,
            r#"
            [log]
            level = "warn"
            console = false

            [notifier]
            max_dispatch_depth = 4

            [[subscriptions]]
            event = "chat"
            label = "all"

            [[subscriptions]]
            event = "chat -> 5"
            label = "five"
            "#,
        )
        .unwrap();

        let config = load_config(Some(path.as_path())).unwrap();
        assert_eq!(config.log.level, "warn");
        assert!(!config.log.console);
        assert_eq!(config.notifier.max_dispatch_depth, Some(4));
        assert!(!config.notifier.warn_unhandled);
        assert_eq!(config.subscriptions.len(), 2);
        assert_eq!(config.subscriptions[1].event, "chat -> 5");
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let dir = tempdir().unwrap();
        let err = load_config(Some(dir.path().join("absent.toml").as_path())).unwrap_err();
        assert!(err.to_string().contains("Failed to build config"));
    }
}
