//! Process-wide event registry.
//!
//! [`GlobalEvents`] is an ordinary [`Evented`] host carrying JSON arguments.
//! Applications build one at startup, configure it, and publish it once with
//! [`install`]; unrelated parts of the process then reach it through
//! [`events`] without passing a reference around. Nothing is created
//! implicitly, and tests should construct their own instances with
//! [`GlobalEvents::new`] instead of installing one.
//!
//! ```rust
//! use relay_events::{Evented, GlobalEvents, Handler};
//! use serde_json::{Value, json};
//!
//! # fn main() -> Result<(), relay_events::NotifierError> {
//! let events = GlobalEvents::new();
//! events
//!     .listen("ws:incomingMessage", None)
//!     .on_port(500, Handler::new(|_, args: &[Value]| {
//!         assert_eq!(args[0]["author"], "Roman");
//!         Ok(())
//!     }))?;
//! events.trigger("ws:incomingMessage", &[json!({ "author": "Roman", "text": "Hello world!" })])?;
//! # Ok(())
//! # }
//! ```

use crate::config::NotifierConfig;
use crate::error::NotifierError;
use crate::evented::Evented;
use crate::notifier::Notifier;
use serde_json::Value;
use std::sync::OnceLock;
use tracing::info;

static INSTALLED: OnceLock<GlobalEvents> = OnceLock::new();

/// The process-wide event host.
#[derive(Debug, Default)]
pub struct GlobalEvents {
    notifier: Notifier<Self, Value>,
}

impl GlobalEvents {
    /// Version of the registry surface.
    pub const VERSION: &'static str = env!("CARGO_PKG_VERSION");

    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_config(config: NotifierConfig) -> Self {
        Self { notifier: Notifier::with_config(config) }
    }

    #[must_use]
    pub const fn version(&self) -> &'static str {
        Self::VERSION
    }
}

impl Evented for GlobalEvents {
    type Args = Value;

    fn notifier(&self) -> &Notifier<Self, Value> {
        &self.notifier
    }
}

/// Publishes `registry` as the process-wide registry.
///
/// # Errors
/// Returns [`NotifierError::AlreadyInstalled`] if a registry was installed
/// before; the rejected instance is dropped.
pub fn install(registry: GlobalEvents) -> Result<&'static GlobalEvents, NotifierError> {
    INSTALLED.set(registry).map_err(|_| NotifierError::AlreadyInstalled {
        message: "install() may only be called once per process".into(),
        context: None,
    })?;
    info!(version = GlobalEvents::VERSION, "Global events installed");
    events()
}

/// The installed registry.
///
/// # Errors
/// Returns [`NotifierError::NotInstalled`] before [`install`] has run.
pub fn events() -> Result<&'static GlobalEvents, NotifierError> {
    installed().ok_or_else(|| NotifierError::NotInstalled {
        message: "call relay_events::global::install() during startup".into(),
        context: None,
    })
}

/// The installed registry, if any.
#[must_use]
pub fn installed() -> Option<&'static GlobalEvents> {
    INSTALLED.get()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handler::Handler;
    use parking_lot::Mutex;
    use serde_json::json;
    use std::sync::Arc;

    #[test]
    fn test_instances_are_isolated() {
        let first = GlobalEvents::new();
        let second = GlobalEvents::new();
        let seen = Arc::new(Mutex::new(Vec::new()));

        let sink = Arc::clone(&seen);
        first
            .on("ping", Handler::new(move |_, args: &[Value]| {
                sink.lock().extend_from_slice(args);
                Ok(())
            }))
            .unwrap();

        second.trigger("ping", &[json!(1)]).unwrap();
        first.trigger("ping", &[json!(2)]).unwrap();
        assert_eq!(*seen.lock(), [json!(2)]);
    }

    #[test]
    fn test_listeners_see_the_host() {
        let events = GlobalEvents::with_config(NotifierConfig::default().with_warn_unhandled(true));
        events
            .on("version", Handler::new(|host: &GlobalEvents, _| {
                assert_eq!(host.version(), GlobalEvents::VERSION);
                assert!(host.notifier().config().warn_unhandled);
                Ok(())
            }))
            .unwrap();
        events.trigger("version", &[]).unwrap();
    }
}
