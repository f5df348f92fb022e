use crate::dispatcher::PortDispatcher;
use crate::error::NotifierError;
use crate::handler::{Handler, IntoHandler};
use crate::notifier::Notifier;
use crate::spec::{EventSpec, PortId};

/// Publish/subscribe surface for any host that embeds a [`Notifier`].
///
/// Implement [`notifier`](Self::notifier) and the host gets the whole event
/// API; listeners receive the host itself as their context, and registration
/// methods return the host for chaining.
///
/// # Example
/// ```rust
/// use relay_events::{Evented, Handler, Notifier};
///
/// #[derive(Default)]
/// struct Button {
///     label: String,
///     events: Notifier<Button, u32>,
/// }
///
/// impl Evented for Button {
///     type Args = u32;
///
///     fn notifier(&self) -> &Notifier<Self, u32> {
///         &self.events
///     }
/// }
///
/// # fn main() -> Result<(), relay_events::NotifierError> {
/// let button = Button { label: "ok".into(), ..Button::default() };
/// button.on("click", Handler::new(|button: &Button, clicks: &[u32]| {
///     assert_eq!(button.label, "ok");
///     assert_eq!(clicks, [2]);
///     Ok(())
/// }))?;
/// button.trigger("Click", &[2])?;
/// # Ok(())
/// # }
/// ```
pub trait Evented: Sized {
    /// Type of the arguments forwarded to listeners.
    type Args;

    fn notifier(&self) -> &Notifier<Self, Self::Args>;

    /// See [`Notifier::listen`].
    fn listen(
        &self,
        spec: impl Into<EventSpec>,
        handler: Option<Handler<Self, Self::Args>>,
    ) -> PortDispatcher<Self, Self::Args> {
        self.notifier().listen(spec, handler)
    }

    /// See [`Notifier::add_event_listener`].
    ///
    /// # Errors
    /// Returns [`NotifierError::HandlerType`] if `handler` is not a handler.
    fn add_event_listener(
        &self,
        spec: impl Into<EventSpec>,
        handler: impl IntoHandler<Self, Self::Args>,
    ) -> Result<&Self, NotifierError> {
        self.notifier().add_event_listener(spec, handler)?;
        Ok(self)
    }

    /// Alias of [`add_event_listener`](Self::add_event_listener).
    ///
    /// # Errors
    /// Returns [`NotifierError::HandlerType`] if `handler` is not a handler.
    fn on(
        &self,
        spec: impl Into<EventSpec>,
        handler: impl IntoHandler<Self, Self::Args>,
    ) -> Result<&Self, NotifierError> {
        self.add_event_listener(spec, handler)
    }

    /// See [`Notifier::remove_event_listener`].
    ///
    /// # Errors
    /// Returns [`NotifierError::HandlerType`] if `handler` is not a handler.
    fn remove_event_listener(
        &self,
        spec: impl Into<EventSpec>,
        handler: impl IntoHandler<Self, Self::Args>,
    ) -> Result<&Self, NotifierError> {
        self.notifier().remove_event_listener(spec, handler)?;
        Ok(self)
    }

    /// See [`Notifier::clear_event_listeners`].
    fn clear_event_listeners(&self, spec: impl Into<EventSpec>) -> &Self {
        self.notifier().clear_event_listeners(spec);
        self
    }

    /// See [`Notifier::off`].
    ///
    /// # Errors
    /// Returns [`NotifierError::HandlerType`] if `handler` is not a handler.
    fn off(
        &self,
        spec: impl Into<EventSpec>,
        handler: Option<&Handler<Self, Self::Args>>,
    ) -> Result<&Self, NotifierError> {
        self.notifier().off(spec, handler)?;
        Ok(self)
    }

    /// See [`Notifier::off_port`].
    fn off_port(&self, spec: impl Into<EventSpec>, port: Option<PortId>) -> &Self {
        self.notifier().off_port(spec, port);
        self
    }

    /// See [`Notifier::off_all_ports`].
    fn off_all_ports(&self, spec: impl Into<EventSpec>) -> &Self {
        self.notifier().off_all_ports(spec);
        self
    }

    /// Fires an event with this host as the listeners' context.
    ///
    /// # Errors
    /// See [`Notifier::trigger_event`].
    fn trigger_event(
        &self,
        spec: impl Into<EventSpec>,
        args: &[Self::Args],
    ) -> Result<(), NotifierError> {
        self.notifier().trigger_event(self, spec, args)
    }

    /// Alias of [`trigger_event`](Self::trigger_event).
    ///
    /// # Errors
    /// See [`Notifier::trigger_event`].
    fn trigger(&self, spec: impl Into<EventSpec>, args: &[Self::Args]) -> Result<(), NotifierError> {
        self.trigger_event(spec, args)
    }
}
