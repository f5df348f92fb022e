//! Event-spec grammar: `EVENT_NAME ["->" PORT_ID]`.
//!
//! Every public operation parses its spec exactly once through
//! [`EventSpec::parse`]; nothing else in the crate splits strings.

use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

/// Separator between an event name and a port id.
pub const PORT_SEPARATOR: &str = "->";

/// A case-insensitive event name, stored trimmed and lower-cased.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EventName(Box<str>);

impl EventName {
    /// Normalizes `raw` into its canonical key.
    ///
    /// ```rust
    /// use relay_events::EventName;
    ///
    /// assert_eq!(EventName::new(" Chat "), EventName::new("chat"));
    /// ```
    #[must_use]
    pub fn new(raw: &str) -> Self {
        Self(raw.trim().to_lowercase().into_boxed_str())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EventName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for EventName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for EventName {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

/// A port identifier under an event name.
///
/// Ports are compared by their string form, so `PortId::from(5)` and
/// `PortId::from("5")` address the same port.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PortId(Box<str>);

impl PortId {
    #[must_use]
    pub fn new(raw: &str) -> Self {
        Self(raw.trim().into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PortId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PortId {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

impl From<String> for PortId {
    fn from(raw: String) -> Self {
        Self::new(&raw)
    }
}

impl From<&Self> for PortId {
    fn from(port: &Self) -> Self {
        port.clone()
    }
}

macro_rules! port_from_integer {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for PortId {
                fn from(port: $ty) -> Self {
                    Self(port.to_string().into_boxed_str())
                }
            }
        )*
    };
}

port_from_integer!(u8, u16, u32, u64, usize, i8, i16, i32, i64, isize);

/// A parsed event spec: the normalized name plus an optional port.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EventSpec {
    name: EventName,
    port: Option<PortId>,
}

impl EventSpec {
    /// Parses `"name"` or `"name -> port"`.
    ///
    /// Whitespace around the name, the separator and the port is ignored and
    /// the name is lower-cased. A spec with more than one separator is taken
    /// whole as an event name; an empty port token means "no port".
    ///
    /// ```rust
    /// use relay_events::{EventSpec, PortId};
    ///
    /// let spec = EventSpec::parse(" WS:Message -> 501 ");
    /// assert_eq!(spec.name().as_str(), "ws:message");
    /// assert_eq!(spec.port(), Some(&PortId::from(501)));
    /// ```
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let mut parts = raw.split(PORT_SEPARATOR);
        match (parts.next(), parts.next(), parts.next()) {
            (Some(name), Some(port), None) => {
                let port = port.trim();
                Self {
                    name: EventName::new(name),
                    port: (!port.is_empty()).then(|| PortId::new(port)),
                }
            },
            _ => Self { name: EventName::new(raw), port: None },
        }
    }

    /// Builds a port-qualified spec without going through the string form.
    #[must_use]
    pub fn ported(name: &str, port: impl Into<PortId>) -> Self {
        Self { name: EventName::new(name), port: Some(port.into()) }
    }

    #[must_use]
    pub const fn name(&self) -> &EventName {
        &self.name
    }

    #[must_use]
    pub const fn port(&self) -> Option<&PortId> {
        self.port.as_ref()
    }

    #[must_use]
    pub fn into_parts(self) -> (EventName, Option<PortId>) {
        (self.name, self.port)
    }
}

impl fmt::Display for EventSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.port {
            Some(port) => write!(f, "{} {PORT_SEPARATOR} {port}", self.name),
            None => write!(f, "{}", self.name),
        }
    }
}

impl FromStr for EventSpec {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

impl From<&str> for EventSpec {
    fn from(raw: &str) -> Self {
        Self::parse(raw)
    }
}

impl From<&String> for EventSpec {
    fn from(raw: &String) -> Self {
        Self::parse(raw)
    }
}

impl From<String> for EventSpec {
    fn from(raw: String) -> Self {
        Self::parse(&raw)
    }
}

impl From<EventName> for EventSpec {
    fn from(name: EventName) -> Self {
        Self { name, port: None }
    }
}

impl From<&Self> for EventSpec {
    fn from(spec: &Self) -> Self {
        spec.clone()
    }
}
