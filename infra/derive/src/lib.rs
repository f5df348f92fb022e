#![allow(unreachable_pub)]
#![allow(clippy::needless_pass_by_value)]

//! # Macros
//!
//! Procedural macros shared by the Relay crates.
//!
//! Only one macro lives here today: [`relay_error`], which turns a plain enum
//! into a `thiserror` error with context support. Consumers depend on the crate
//! through the workspace:
//!
//! ```toml
//! [dependencies]
//! relay-derive.workspace = true
//! ```

mod macros;

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

/// Attribute macro for defining crate-level error enums.
///
/// # Features
///
/// * **Automatic Derives**: Injects `#[derive(Debug, thiserror::Error)]` unless already present.
/// * **Context Support**: Generates a companion `<Name>Ext` trait that adds `.context()`
///   to `Result<T, Name>` and to `Result<T, Source>` for every source variant.
/// * **Standard Conversions**: Implements `From<Source>` for variants with a `source` field
///   (or a field marked `#[source]`/`#[from]`), so `?` lifts upstream errors.
/// * **Internal Fallback**: Implements `From<&'static str>` and `From<String>` when an
///   `Internal { message, context }` variant is present.
/// * **`format_context`**: A module-local helper rendering the context as ` (…)` for
///   use inside `#[error(...)]` strings.
///
/// # Requirements
///
/// 1. The macro must be applied to an **enum** with named-field variants only.
/// 2. A `context` field, when present, must be `Option<Cow<'static, str>>`.
/// 3. Variants with a source must also carry a `context` field.
/// 4. An `Internal` variant must carry `message: Cow<'static, str>`.
///
/// # Example
///
/// ```rust,ignore
/// use relay_derive::relay_error;
/// use std::borrow::Cow;
///
/// #[relay_error]
/// pub enum StoreError {
///     #[error("IO error{}: {source}", format_context(context))]
///     Io { source: std::io::Error, context: Option<Cow<'static, str>> },
///
///     #[error("Internal fault{}: {message}", format_context(context))]
///     Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
/// }
///
/// fn read(path: &str) -> Result<String, StoreError> {
///     std::fs::read_to_string(path).context("Reading store snapshot")
/// }
/// ```
#[proc_macro_attribute]
pub fn relay_error(_args: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as DeriveInput);
    macros::error::expand(input).into()
}
