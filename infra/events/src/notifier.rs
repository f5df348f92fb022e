use crate::config::NotifierConfig;
use crate::dispatcher::PortDispatcher;
use crate::error::{NotifierError, NotifierErrorExt};
use crate::handler::{Handler, IntoHandler};
use crate::spec::{EventName, EventSpec, PortId};
use fxhash::FxHashMap;
use parking_lot::RwLock;
use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::{debug, trace, warn};

/// Event storage and dispatch for one host.
///
/// A host embeds a `Notifier<Self, Args>` and exposes it through
/// [`Evented`](crate::Evented). The notifier keeps two independent stores per
/// event name:
///
/// * plain listeners, an ordered list without duplicates;
/// * a lazily created [`PortDispatcher`] mapping ports to single handlers.
///
/// Firing runs the plain listeners first, then every port, synchronously and
/// on the caller's stack. No lock is held while a listener runs, so listeners
/// may register, remove or fire events themselves; such changes apply from
/// the next firing on.
///
/// # Example
/// ```rust
/// use relay_events::{Handler, Notifier};
///
/// # fn main() -> Result<(), relay_events::NotifierError> {
/// let notifier: Notifier<(), &str> = Notifier::new();
/// notifier.on("Greet", Handler::new(|_, args: &[&str]| {
///     assert_eq!(args, ["world"]);
///     Ok(())
/// }))?;
/// notifier.trigger(&(), "greet", &["world"])?;
/// # Ok(())
/// # }
/// ```
pub struct Notifier<H: ?Sized, A> {
    events: RwLock<FxHashMap<EventName, Vec<Handler<H, A>>>>,
    dispatchers: RwLock<FxHashMap<EventName, PortDispatcher<H, A>>>,
    config: NotifierConfig,
    depth: AtomicUsize,
}

impl<H: ?Sized, A> Notifier<H, A> {
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(NotifierConfig::default())
    }

    #[must_use]
    pub fn with_config(config: NotifierConfig) -> Self {
        Self {
            events: RwLock::new(FxHashMap::default()),
            dispatchers: RwLock::new(FxHashMap::default()),
            config,
            depth: AtomicUsize::new(0),
        }
    }

    #[must_use]
    pub const fn config(&self) -> &NotifierConfig {
        &self.config
    }

    /// Returns the port dispatcher of the event named by `spec`, creating it if needed.
    ///
    /// When `spec` names a port and `handler` is given, the handler is bound
    /// to that port on the way. A handler given for a bare name is ignored.
    pub fn listen(
        &self,
        spec: impl Into<EventSpec>,
        handler: Option<Handler<H, A>>,
    ) -> PortDispatcher<H, A> {
        let (name, port) = spec.into().into_parts();
        let dispatcher = self.dispatcher_or_insert(name);

        match (port, handler) {
            (Some(port), Some(handler)) => {
                if let Err(err) = dispatcher.on_port(port, handler) {
                    warn!(event = %dispatcher.event_name(), %err, "Handler not bound");
                }
            },
            (None, Some(_)) => {
                warn!(event = %dispatcher.event_name(), "Handler ignored: listen() without a port");
            },
            _ => {},
        }

        dispatcher
    }

    /// Registers `handler` for the event named by `spec`.
    ///
    /// A port-qualified spec binds the handler on that port, replacing the
    /// previous one. A bare name appends it to the plain listeners unless the
    /// same handler is already registered there.
    ///
    /// # Errors
    /// Returns [`NotifierError::HandlerType`] if `handler` is not a handler;
    /// nothing is stored in that case.
    pub fn add_event_listener(
        &self,
        spec: impl Into<EventSpec>,
        handler: impl IntoHandler<H, A>,
    ) -> Result<&Self, NotifierError> {
        let spec = spec.into();
        let handler = handler.into_handler().context(format!("registering `{spec}`"))?;
        let (name, port) = spec.into_parts();

        if let Some(port) = port {
            self.dispatcher_or_insert(name).on_port(port, handler)?;
            return Ok(self);
        }

        let mut events = self.events.write();
        let listeners = events.entry(name).or_default();
        if listeners.iter().any(|existing| existing.same(&handler)) {
            return Ok(self);
        }
        listeners.push(handler);
        drop(events);

        Ok(self)
    }

    /// Alias of [`add_event_listener`](Self::add_event_listener).
    ///
    /// # Errors
    /// See [`add_event_listener`](Self::add_event_listener).
    pub fn on(
        &self,
        spec: impl Into<EventSpec>,
        handler: impl IntoHandler<H, A>,
    ) -> Result<&Self, NotifierError> {
        self.add_event_listener(spec, handler)
    }

    /// Removes `handler` from the event named by `spec`.
    ///
    /// For a bare name the handler leaves the plain listeners; for a
    /// port-qualified spec the port is unbound if `handler` is what it holds.
    /// Unknown events and unknown handlers are ignored.
    ///
    /// # Errors
    /// Returns [`NotifierError::HandlerType`] if `handler` is not a handler.
    pub fn remove_event_listener(
        &self,
        spec: impl Into<EventSpec>,
        handler: impl IntoHandler<H, A>,
    ) -> Result<&Self, NotifierError> {
        let spec = spec.into();
        let handler = handler.into_handler().context(format!("removing from `{spec}`"))?;
        let (name, port) = spec.into_parts();

        if let Some(port) = port {
            if let Some(dispatcher) = self.dispatcher(&name)
                && dispatcher.handler(&port).is_some_and(|bound| bound.same(&handler))
            {
                dispatcher.off_port(port);
            }
            return Ok(self);
        }

        let mut events = self.events.write();
        let Some(listeners) = events.get_mut(&name) else {
            debug!(event = %name, "Nothing to remove: event was never registered");
            return Ok(self);
        };
        if let Some(index) = listeners.iter().position(|existing| existing.same(&handler)) {
            listeners.remove(index);
            trace!(event = %name, "Removed listener");
        }
        drop(events);

        Ok(self)
    }

    /// Drops every plain listener of the event named by `spec`, keeping its ports.
    ///
    /// A port-qualified spec unbinds that port instead.
    pub fn clear_event_listeners(&self, spec: impl Into<EventSpec>) -> &Self {
        let (name, port) = spec.into().into_parts();
        if let Some(port) = port {
            return self.off_port(name, Some(port));
        }

        if let Some(listeners) = self.events.write().get_mut(&name) {
            trace!(event = %name, removed = listeners.len(), "Cleared listeners");
            listeners.clear();
        }
        self
    }

    /// Removes one listener when `handler` is given, all plain listeners otherwise.
    ///
    /// # Errors
    /// See [`remove_event_listener`](Self::remove_event_listener).
    pub fn off(
        &self,
        spec: impl Into<EventSpec>,
        handler: Option<&Handler<H, A>>,
    ) -> Result<&Self, NotifierError> {
        match handler {
            Some(handler) => self.remove_event_listener(spec, handler),
            None => Ok(self.clear_event_listeners(spec)),
        }
    }

    /// Unbinds a port. An explicit `port` wins over one parsed from `spec`.
    pub fn off_port(&self, spec: impl Into<EventSpec>, port: Option<PortId>) -> &Self {
        let (name, parsed) = spec.into().into_parts();
        let Some(port) = port.or(parsed) else {
            debug!(event = %name, "Nothing to unbind: no port given");
            return self;
        };
        if let Some(dispatcher) = self.dispatcher(&name) {
            dispatcher.off_port(port);
        }
        self
    }

    /// Unbinds every port of the event named by `spec`, keeping its plain listeners.
    pub fn off_all_ports(&self, spec: impl Into<EventSpec>) -> &Self {
        let (name, _) = spec.into().into_parts();
        if let Some(dispatcher) = self.dispatcher(&name) {
            dispatcher.off_all_ports();
        }
        self
    }

    /// Fires the event named by `spec` on `host` with `args`.
    ///
    /// The plain listeners run in registration order, then every port of the
    /// event. A port suffix in `spec` is ignored: firing always addresses the
    /// whole event name. Use [`PortDispatcher::run_port`] to reach a single
    /// port. Firing an event nobody listens to is a no-op.
    ///
    /// # Errors
    /// Returns [`NotifierError::Handler`] as soon as a listener fails; the
    /// remaining listeners are not invoked. Returns
    /// [`NotifierError::DepthExceeded`] when re-entrant firing passes
    /// [`NotifierConfig::max_dispatch_depth`].
    pub fn trigger_event(
        &self,
        host: &H,
        spec: impl Into<EventSpec>,
        args: &[A],
    ) -> Result<(), NotifierError> {
        let (name, port) = spec.into().into_parts();
        if let Some(port) = port {
            debug!(event = %name, %port, "Port ignored: firing reaches the whole event");
        }
        let _depth = self.enter(&name)?;
        let dispatcher = self.dispatcher(&name);

        let listeners = self.listeners(&name);
        let ports = dispatcher.as_ref().map_or(0, PortDispatcher::port_count);
        if listeners.is_empty() && ports == 0 {
            self.unhandled(&name);
            return Ok(());
        }
        trace!(event = %name, listeners = listeners.len(), ports, "Firing event");

        for handler in &listeners {
            handler.call(host, args).context(format!("event `{name}`"))?;
        }
        if let Some(dispatcher) = dispatcher {
            dispatcher.run_handlers(host, args)?;
        }

        Ok(())
    }

    /// Alias of [`trigger_event`](Self::trigger_event).
    ///
    /// # Errors
    /// See [`trigger_event`](Self::trigger_event).
    pub fn trigger(
        &self,
        host: &H,
        spec: impl Into<EventSpec>,
        args: &[A],
    ) -> Result<(), NotifierError> {
        self.trigger_event(host, spec, args)
    }

    /// The port dispatcher of the event named by `spec`, without creating one.
    #[must_use]
    pub fn dispatcher_for(&self, spec: impl Into<EventSpec>) -> Option<PortDispatcher<H, A>> {
        self.dispatcher(spec.into().name())
    }

    /// Number of plain listeners registered for the event named by `spec`.
    #[must_use]
    pub fn listener_count(&self, spec: impl Into<EventSpec>) -> usize {
        self.events.read().get(spec.into().name()).map_or(0, Vec::len)
    }

    /// Whether firing the event named by `spec` would reach anybody.
    #[must_use]
    pub fn has_listeners(&self, spec: impl Into<EventSpec>) -> bool {
        let (name, port) = spec.into().into_parts();
        let dispatcher = self.dispatcher(&name);
        match port {
            Some(port) => dispatcher.is_some_and(|d| d.has_port(&port)),
            None => {
                self.events.read().get(&name).is_some_and(|l| !l.is_empty())
                    || dispatcher.is_some_and(|d| d.port_count() > 0)
            },
        }
    }

    /// Every event name that has plain listeners or a dispatcher, sorted.
    #[must_use]
    pub fn event_names(&self) -> Vec<EventName> {
        let mut names: Vec<EventName> = self.events.read().keys().cloned().collect();
        names.extend(self.dispatchers.read().keys().cloned());
        names.sort_unstable();
        names.dedup();
        names
    }

    fn listeners(&self, name: &EventName) -> Vec<Handler<H, A>> {
        self.events.read().get(name).cloned().unwrap_or_default()
    }

    fn dispatcher(&self, name: &EventName) -> Option<PortDispatcher<H, A>> {
        self.dispatchers.read().get(name).cloned()
    }

    fn dispatcher_or_insert(&self, name: EventName) -> PortDispatcher<H, A> {
        if let Some(existing) = self.dispatcher(&name) {
            return existing;
        }
        self.dispatchers
            .write()
            .entry(name)
            .or_insert_with_key(|name| {
                trace!(event = %name, "Creating port dispatcher");
                PortDispatcher::new(name.clone())
            })
            .clone()
    }

    fn enter(&self, name: &EventName) -> Result<DepthGuard<'_>, NotifierError> {
        let depth = self.depth.fetch_add(1, Ordering::AcqRel) + 1;
        let guard = DepthGuard(&self.depth);
        if let Some(max) = self.config.max_dispatch_depth
            && depth > max
        {
            return Err(NotifierError::DepthExceeded {
                message: format!("depth {depth} exceeds the limit of {max}").into(),
                context: Some(format!("event `{name}`").into()),
            });
        }
        Ok(guard)
    }

    fn unhandled(&self, name: &EventName) {
        if self.config.warn_unhandled {
            warn!(event = %name, "Event fired with no listeners");
        } else {
            trace!(event = %name, "Event fired with no listeners");
        }
    }
}

/// Tracks one level of (possibly re-entrant) firing.
struct DepthGuard<'a>(&'a AtomicUsize);

impl Drop for DepthGuard<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::AcqRel);
    }
}

impl<H: ?Sized, A> Default for Notifier<H, A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H: ?Sized, A> fmt::Debug for Notifier<H, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let events: Vec<(EventName, usize)> =
            self.events.read().iter().map(|(name, l)| (name.clone(), l.len())).collect();
        let dispatchers: Vec<PortDispatcher<H, A>> =
            self.dispatchers.read().values().cloned().collect();
        f.debug_struct("Notifier")
            .field("events", &events)
            .field("dispatchers", &dispatchers)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
