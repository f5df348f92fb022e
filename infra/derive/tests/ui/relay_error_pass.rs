use relay_derive::relay_error;
use std::borrow::Cow;

#[relay_error]
pub enum StoreError {
    #[error("IO error{}: {source}", format_context(context))]
    Io {
        #[source]
        source: std::io::Error,
        context: Option<Cow<'static, str>>,
    },

    #[error("Closed{}", format_context(context))]
    Closed { context: Option<Cow<'static, str>> },

    #[error("Internal error{}: {message}", format_context(context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

fn main() {
    let _ = StoreError::from("boom");
}
