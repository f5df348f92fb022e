//! # Relay
//!
//! Command-line driver for [`relay_events`]: loads [`RelayConfig`], installs
//! the process-wide [`GlobalEvents`](relay_events::GlobalEvents) registry,
//! attaches an [`Echo`] listener per configured subscription and replays a
//! [`Script`] of `trigger` / `off` commands against it.

pub mod config;
pub mod echo;
pub mod script;

pub use crate::config::{ConfigError, ENV_PREFIX, RelayConfig, Subscription, load_config};
pub use crate::echo::Echo;
pub use crate::script::{Command, Script, ScriptError};
