//! # Relay Events
//!
//! Synchronous, named-event notification that any type can embed.
//!
//! ## Overview
//!
//! A host stores a [`Notifier`] and implements [`Evented`] to gain the whole
//! publish/subscribe surface. Each event name carries two kinds of listeners:
//!
//! * **Plain listeners**: an ordered list, duplicates ignored.
//! * **Ports**: a [`PortDispatcher`] mapping caller-chosen keys to exactly one
//!   handler each, so a component can later replace or remove "its" listener
//!   without holding on to the handler.
//!
//! Event strings follow the `"name"` or `"name -> port"` grammar and names are
//! case-insensitive. Firing runs plain listeners first, then ports, on the
//! caller's stack.
//!
//! ## Features
//!
//! * **Re-entrant**: listeners may register, remove and fire events.
//! * **Checked**: type-erased values that are not handlers are rejected with
//!   [`NotifierError::HandlerType`] before anything is stored.
//! * **Configurable**: [`NotifierConfig`] bounds recursive firing and reports
//!   unhandled events.
//! * **Process-wide registry**: [`global`] publishes one [`GlobalEvents`] host.
//!
//! # Example
//!
//! ```rust
//! use relay_events::{Evented, GlobalEvents, Handler, NotifierError};
//! use serde_json::{Value, json};
//!
//! fn main() -> Result<(), NotifierError> {
//!     let events = GlobalEvents::new();
//!     events.on("user:created", Handler::new(|_, args: &[Value]| {
//!         assert_eq!(args[0]["id"], 42);
//!         Ok(())
//!     }))?;
//!
//!     events.trigger("User:Created", &[json!({ "id": 42 })])?;
//!     Ok(())
//! }
//! ```

mod config;
mod dispatcher;
mod error;
mod evented;
mod handler;
mod notifier;
mod spec;

pub mod global;

pub use config::NotifierConfig;
pub use dispatcher::PortDispatcher;
pub use error::{NotifierError, NotifierErrorExt};
pub use evented::Evented;
pub use global::GlobalEvents;
pub use handler::{BoxError, DynamicValue, Handler, HandlerResult, IntoHandler};
pub use notifier::Notifier;
pub use spec::{EventName, EventSpec, PORT_SEPARATOR, PortId};
