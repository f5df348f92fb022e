use serde::Deserialize;

/// Tuning knobs for a [`Notifier`](crate::Notifier).
///
/// Deserializable so it can sit in an application's config file:
///
/// ```toml
/// [notifier]
/// max_dispatch_depth = 16
/// warn_unhandled = true
/// ```
#[derive(Default, Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct NotifierConfig {
    /// How deeply `trigger_event` may nest when listeners fire events
    /// themselves. `None` leaves re-entrant firing unbounded.
    pub max_dispatch_depth: Option<usize>,
    /// Log a warning when an event is fired with nobody listening.
    pub warn_unhandled: bool,
}

impl NotifierConfig {
    #[must_use]
    pub const fn with_max_dispatch_depth(mut self, depth: usize) -> Self {
        self.max_dispatch_depth = Some(depth);
        self
    }

    #[must_use]
    pub const fn with_warn_unhandled(mut self, enabled: bool) -> Self {
        self.warn_unhandled = enabled;
        self
    }
}
