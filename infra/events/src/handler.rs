use crate::error::NotifierError;
use std::any::{Any, type_name};
use std::fmt;
use std::sync::Arc;

/// Error type returned by listeners.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Outcome of a single listener invocation.
pub type HandlerResult = Result<(), BoxError>;

type HandlerFn<H, A> = dyn Fn(&H, &[A]) -> HandlerResult + Send + Sync;

/// A shared event listener.
///
/// The handler receives the host the event was fired on and the forwarded
/// arguments. Clones share identity: registering a clone of an already
/// registered handler is a no-op, and removal matches any clone.
///
/// ```rust
/// use relay_events::Handler;
///
/// let greet: Handler<(), String> = Handler::new(|_, args| {
///     assert_eq!(args, ["hi".to_owned()]);
///     Ok(())
/// });
/// assert!(greet.same(&greet.clone()));
/// ```
pub struct Handler<H: ?Sized, A>(Arc<HandlerFn<H, A>>);

impl<H: ?Sized, A> Handler<H, A> {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&H, &[A]) -> HandlerResult + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    /// Returns `true` when both values refer to the same registered callable.
    #[must_use]
    pub fn same(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    pub(crate) fn call(&self, context: &H, args: &[A]) -> HandlerResult {
        (self.0)(context, args)
    }
}

impl<H: ?Sized, A> Clone for Handler<H, A> {
    fn clone(&self) -> Self {
        Self(Arc::clone(&self.0))
    }
}

impl<H: ?Sized, A> fmt::Debug for Handler<H, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Handler").field(&Arc::as_ptr(&self.0).cast::<()>()).finish()
    }
}

/// A type-erased value handed over by a dynamic source, such as a script
/// bridge or a plugin table, that is expected to hold a [`Handler`].
///
/// Registration unwraps it and fails with [`NotifierError::HandlerType`]
/// when it holds anything else.
pub struct DynamicValue {
    value: Box<dyn Any + Send + Sync>,
    type_name: &'static str,
}

impl DynamicValue {
    pub fn new<T: Any + Send + Sync>(value: T) -> Self {
        Self { value: Box::new(value), type_name: type_name::<T>() }
    }

    /// The Rust type name of the wrapped value.
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        self.type_name
    }
}

impl fmt::Debug for DynamicValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DynamicValue").field("type_name", &self.type_name).finish_non_exhaustive()
    }
}

/// Conversion into a validated [`Handler`].
///
/// Every registration entry point goes through this trait, so malformed
/// handlers are rejected before storage is touched.
pub trait IntoHandler<H: ?Sized, A> {
    /// # Errors
    /// Returns [`NotifierError::HandlerType`] when the value is not a handler.
    fn into_handler(self) -> Result<Handler<H, A>, NotifierError>;
}

impl<H: ?Sized, A> IntoHandler<H, A> for Handler<H, A> {
    fn into_handler(self) -> Result<Handler<H, A>, NotifierError> {
        Ok(self)
    }
}

impl<H: ?Sized, A> IntoHandler<H, A> for &Handler<H, A> {
    fn into_handler(self) -> Result<Handler<H, A>, NotifierError> {
        Ok(self.clone())
    }
}

impl<H: ?Sized + 'static, A: 'static> IntoHandler<H, A> for DynamicValue {
    fn into_handler(self) -> Result<Handler<H, A>, NotifierError> {
        let type_name = self.type_name;
        self.value.downcast::<Handler<H, A>>().map(|handler| *handler).map_err(|_| {
            NotifierError::HandlerType {
                message: format!("expected a handler, got `{type_name}`").into(),
                context: None,
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noop() -> Handler<(), u8> {
        Handler::new(|_, _| Ok(()))
    }

    #[test]
    fn test_clones_share_identity() {
        let a = noop();
        let b = noop();
        assert!(a.same(&a.clone()));
        assert!(!a.same(&b));
    }

    #[test]
    fn test_dynamic_handler_unwraps() {
        let handler = noop();
        let restored: Handler<(), u8> =
            DynamicValue::new(handler.clone()).into_handler().expect("holds a handler");
        assert!(restored.same(&handler));
    }

    #[test]
    fn test_dynamic_non_handler_is_rejected() {
        let err = IntoHandler::<(), u8>::into_handler(DynamicValue::new(5_i32)).unwrap_err();
        assert!(matches!(err, NotifierError::HandlerType { .. }));
        assert!(err.to_string().contains("i32"));
    }

    #[test]
    fn test_call_forwards_arguments() {
        let handler: Handler<u8, u8> = Handler::new(|ctx, args| {
            assert_eq!(*ctx, 7);
            assert_eq!(args, [1, 2]);
            Ok(())
        });
        assert!(handler.call(&7, &[1, 2]).is_ok());
    }
}
