use std::borrow::Cow;

/// Errors raised while installing the subscriber from a [`LogConfig`](crate::LogConfig).
#[relay_derive::relay_error]
pub enum LoggerError {
    /// `level` or `name` cannot be used, or no output is enabled.
    #[error("Invalid log config{}: {message}", format_context(context))]
    InvalidConfig { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// `filter` holds a malformed directive.
    #[error("Invalid log filter{}: {source}", format_context(context))]
    Filter { source: tracing_subscriber::filter::ParseError, context: Option<Cow<'static, str>> },

    /// The log directory could not be created.
    #[error("Log directory error{}: {source}", format_context(context))]
    Directory { source: std::io::Error, context: Option<Cow<'static, str>> },

    #[error("Log file error{}: {source}", format_context(context))]
    Appender { source: tracing_appender::rolling::InitError, context: Option<Cow<'static, str>> },

    /// Another subscriber already owns this process.
    #[error("Subscriber already set{}: {source}", format_context(context))]
    Subscriber {
        source: tracing_subscriber::util::TryInitError,
        context: Option<Cow<'static, str>>,
    },
}
