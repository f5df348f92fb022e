use crate::handler::BoxError;
use std::borrow::Cow;

/// Errors raised while registering or firing events.
#[relay_derive::relay_error]
pub enum NotifierError {
    /// A value expected to be a handler is not callable.
    ///
    /// Raised at registration time, before any storage is touched.
    #[error("Event handler type error{}: {message}", format_context(context))]
    HandlerType { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// A listener failed while an event was being fired.
    ///
    /// The firing pass stops at the failing listener; later listeners and ports
    /// are not invoked.
    #[error("Event handler failed{}: {source}", format_context(context))]
    Handler { source: BoxError, context: Option<Cow<'static, str>> },

    /// Re-entrant firing nested deeper than the configured limit.
    #[error("Dispatch depth exceeded{}: {message}", format_context(context))]
    DepthExceeded { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// The process-wide registry was installed twice.
    #[error("Global events already installed{}: {message}", format_context(context))]
    AlreadyInstalled { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// The process-wide registry was requested before installation.
    #[error("Global events not installed{}: {message}", format_context(context))]
    NotInstalled { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}
