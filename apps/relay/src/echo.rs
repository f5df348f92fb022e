use crate::config::Subscription;
use parking_lot::Mutex;
use relay_events::{EventSpec, Evented, GlobalEvents, Handler, NotifierError};
use serde_json::Value;
use std::fmt;
use std::io::{self, Write};
use std::sync::Arc;
use tracing::info;

type SharedWriter = Arc<Mutex<Box<dyn Write + Send>>>;

/// Prints every event it hears as `<label>\t<event>\t<json args>`.
#[derive(Clone)]
pub struct Echo {
    out: SharedWriter,
}

impl Echo {
    pub fn new(out: impl Write + Send + 'static) -> Self {
        Self { out: Arc::new(Mutex::new(Box::new(out))) }
    }

    #[must_use]
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }

    /// A listener that prints under `label` for the event named in `spec`.
    #[must_use]
    pub fn handler(&self, label: &str, spec: &EventSpec) -> Handler<GlobalEvents, Value> {
        let out = Arc::clone(&self.out);
        let label = label.to_owned();
        let event = spec.name().clone();
        Handler::new(move |_, args: &[Value]| {
            let args = serde_json::to_string(args)?;
            let mut out = out.lock();
            writeln!(out, "{label}\t{event}\t{args}")?;
            out.flush()?;
            Ok(())
        })
    }

    /// Registers one listener per subscription on `events`.
    ///
    /// # Errors
    /// Propagates registration failures from `events`.
    pub fn subscribe(
        &self,
        events: &GlobalEvents,
        subscriptions: &[Subscription],
    ) -> Result<(), NotifierError> {
        for subscription in subscriptions {
            let spec = EventSpec::parse(&subscription.event);
            events.on(&spec, self.handler(&subscription.label, &spec))?;
            info!(label = %subscription.label, event = %spec, "Subscribed");
        }
        Ok(())
    }
}

impl fmt::Debug for Echo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Echo").finish_non_exhaustive()
    }
}
