use crate::error::{NotifierError, NotifierErrorExt};
use crate::handler::{Handler, IntoHandler};
use crate::spec::{EventName, PortId};
use parking_lot::RwLock;
use std::fmt;
use std::sync::Arc;
use tracing::trace;

struct DispatcherInner<H: ?Sized, A> {
    event: EventName,
    ports: RwLock<Vec<(PortId, Handler<H, A>)>>,
}

/// Port-addressed listeners of a single event.
///
/// A cheap, shared handle: every clone points at the same port table, so the
/// value returned by [`Notifier::listen`](crate::Notifier::listen) can be kept
/// and used for chained [`on_port`](Self::on_port) calls.
///
/// Each port holds exactly one handler. Ports fire in the order they were
/// first bound; re-binding a port swaps its handler in place.
pub struct PortDispatcher<H: ?Sized, A> {
    inner: Arc<DispatcherInner<H, A>>,
}

impl<H: ?Sized, A> PortDispatcher<H, A> {
    pub(crate) fn new(event: EventName) -> Self {
        Self { inner: Arc::new(DispatcherInner { event, ports: RwLock::new(Vec::new()) }) }
    }

    #[must_use]
    pub fn event_name(&self) -> &EventName {
        &self.inner.event
    }

    /// Binds `handler` to `port`, replacing any previous binding.
    ///
    /// The handler is validated before the table is touched, so a rejected
    /// replacement leaves the existing binding in place.
    ///
    /// # Errors
    /// Returns [`NotifierError::HandlerType`] if `handler` is not a handler.
    ///
    /// # Examples
    /// ```rust
    /// use relay_events::{Handler, Notifier};
    ///
    /// # fn main() -> Result<(), relay_events::NotifierError> {
    /// let notifier: Notifier<(), String> = Notifier::new();
    /// notifier
    ///     .listen("ws:message", None)
    ///     .on_port(500, Handler::new(|_, _| Ok(())))?
    ///     .on_port(501, Handler::new(|_, _| Ok(())))?;
    /// assert_eq!(notifier.listen("ws:message", None).port_count(), 2);
    /// # Ok(())
    /// # }
    /// ```
    pub fn on_port(
        &self,
        port: impl Into<PortId>,
        handler: impl IntoHandler<H, A>,
    ) -> Result<&Self, NotifierError> {
        let port = port.into();
        let handler = handler
            .into_handler()
            .context(format!("binding port `{port}` of `{}`", self.inner.event))?;

        let mut ports = self.inner.ports.write();
        if let Some(slot) = ports.iter_mut().find(|(bound, _)| *bound == port) {
            trace!(event = %self.inner.event, %port, "Replacing port handler");
            slot.1 = handler;
        } else {
            trace!(event = %self.inner.event, %port, "Binding port handler");
            ports.push((port, handler));
        }
        drop(ports);

        Ok(self)
    }

    /// Invokes every bound handler with `context` and `args`.
    ///
    /// Handlers run against a snapshot taken up front, so they may bind or
    /// unbind ports (or fire again) without affecting the current pass.
    ///
    /// # Errors
    /// Returns [`NotifierError::Handler`] for the first failing handler; the
    /// remaining ports are skipped.
    pub fn run_handlers(&self, context: &H, args: &[A]) -> Result<(), NotifierError> {
        for (port, handler) in self.snapshot() {
            handler
                .call(context, args)
                .context(format!("event `{}` port `{port}`", self.inner.event))?;
        }
        Ok(())
    }

    /// Invokes the handler bound to `port` only. Returns whether one was bound.
    ///
    /// # Errors
    /// Returns [`NotifierError::Handler`] if the handler fails.
    pub fn run_port(&self, port: &PortId, context: &H, args: &[A]) -> Result<bool, NotifierError> {
        let Some(handler) = self.handler(port) else {
            return Ok(false);
        };
        handler.call(context, args).context(format!("event `{}` port `{port}`", self.inner.event))?;
        Ok(true)
    }

    /// Removes the binding for `port`, returning its handler if one was bound.
    pub fn off_port(&self, port: impl Into<PortId>) -> Option<Handler<H, A>> {
        let port = port.into();
        let mut ports = self.inner.ports.write();
        let index = ports.iter().position(|(bound, _)| *bound == port)?;
        let (_, handler) = ports.remove(index);
        drop(ports);
        trace!(event = %self.inner.event, %port, "Unbound port handler");
        Some(handler)
    }

    /// Unbinds every port, returning how many were bound.
    pub fn off_all_ports(&self) -> usize {
        let removed = std::mem::take(&mut *self.inner.ports.write()).len();
        trace!(event = %self.inner.event, removed, "Unbound all port handlers");
        removed
    }

    #[must_use]
    pub fn handler(&self, port: &PortId) -> Option<Handler<H, A>> {
        self.inner.ports.read().iter().find(|(bound, _)| bound == port).map(|(_, h)| h.clone())
    }

    #[must_use]
    pub fn has_port(&self, port: &PortId) -> bool {
        self.inner.ports.read().iter().any(|(bound, _)| bound == port)
    }

    #[must_use]
    pub fn port_count(&self) -> usize {
        self.inner.ports.read().len()
    }

    /// Bound ports, in firing order.
    #[must_use]
    pub fn ports(&self) -> Vec<PortId> {
        self.inner.ports.read().iter().map(|(port, _)| port.clone()).collect()
    }

    fn snapshot(&self) -> Vec<(PortId, Handler<H, A>)> {
        self.inner.ports.read().clone()
    }
}

impl<H: ?Sized, A> Clone for PortDispatcher<H, A> {
    fn clone(&self) -> Self {
        Self { inner: Arc::clone(&self.inner) }
    }
}

impl<H: ?Sized, A> fmt::Debug for PortDispatcher<H, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PortDispatcher")
            .field("event", &self.inner.event)
            .field("ports", &self.ports())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handler::DynamicValue;
    use parking_lot::Mutex;

    type Log = Arc<Mutex<Vec<String>>>;

    fn recorder(log: &Log, tag: &'static str) -> Handler<(), u32> {
        let log = Arc::clone(log);
        Handler::new(move |_, args| {
            log.lock().push(format!("{tag}:{args:?}"));
            Ok(())
        })
    }

    fn dispatcher() -> PortDispatcher<(), u32> {
        PortDispatcher::new(EventName::new("chat"))
    }

    #[test]
    fn test_ports_fire_in_binding_order() {
        let log = Log::default();
        let d = dispatcher();
        d.on_port(2, recorder(&log, "two")).unwrap();
        d.on_port(1, recorder(&log, "one")).unwrap();

        d.run_handlers(&(), &[9]).unwrap();
        assert_eq!(*log.lock(), ["two:[9]", "one:[9]"]);
    }

    #[test]
    fn test_rebinding_replaces_in_place() {
        let log = Log::default();
        let d = dispatcher();
        d.on_port(1, recorder(&log, "old")).unwrap();
        d.on_port(2, recorder(&log, "other")).unwrap();
        d.on_port("1", recorder(&log, "new")).unwrap();

        d.run_handlers(&(), &[]).unwrap();
        assert_eq!(*log.lock(), ["new:[]", "other:[]"]);
        assert_eq!(d.port_count(), 2);
    }

    #[test]
    fn test_invalid_replacement_keeps_previous_binding() {
        let log = Log::default();
        let d = dispatcher();
        d.on_port(1, recorder(&log, "kept")).unwrap();

        let err = d.on_port(1, DynamicValue::new("not a handler")).unwrap_err();
        assert!(matches!(err, NotifierError::HandlerType { .. }));

        d.run_handlers(&(), &[]).unwrap();
        assert_eq!(*log.lock(), ["kept:[]"]);
    }

    #[test]
    fn test_failure_aborts_remaining_ports() {
        let log = Log::default();
        let d = dispatcher();
        d.on_port(1, Handler::new(|_, _| Err("boom".into()))).unwrap();
        d.on_port(2, recorder(&log, "skipped")).unwrap();

        let err = d.run_handlers(&(), &[]).unwrap_err();
        assert!(matches!(err, NotifierError::Handler { .. }));
        assert!(err.to_string().contains("port `1`"));
        assert!(log.lock().is_empty());
    }

    #[test]
    fn test_off_port_and_off_all_ports() {
        let log = Log::default();
        let d = dispatcher();
        d.on_port(1, recorder(&log, "a")).unwrap();
        d.on_port(2, recorder(&log, "b")).unwrap();
        d.on_port(3, recorder(&log, "c")).unwrap();

        assert!(d.off_port(2).is_some());
        assert!(d.off_port(2).is_none());
        assert_eq!(d.ports(), [PortId::from(1), PortId::from(3)]);

        assert_eq!(d.off_all_ports(), 2);
        assert_eq!(d.port_count(), 0);
        d.run_handlers(&(), &[]).unwrap();
        assert!(log.lock().is_empty());
    }

    #[test]
    fn test_run_port_targets_a_single_binding() {
        let log = Log::default();
        let d = dispatcher();
        d.on_port(1, recorder(&log, "a")).unwrap();
        d.on_port(2, recorder(&log, "b")).unwrap();

        assert!(d.run_port(&PortId::from(2), &(), &[4]).unwrap());
        assert!(!d.run_port(&PortId::from(3), &(), &[4]).unwrap());
        assert_eq!(*log.lock(), ["b:[4]"]);
    }

    #[test]
    fn test_clones_share_the_port_table() {
        let log = Log::default();
        let d = dispatcher();
        let alias = d.clone();
        alias.on_port(1, recorder(&log, "a")).unwrap();
        assert!(d.has_port(&PortId::from(1)));
    }
}
