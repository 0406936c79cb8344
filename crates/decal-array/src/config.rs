#![forbid(unsafe_code)]

//! Sequence configuration.

use decal_core::DEFAULT_MAX_LISTENERS;

/// When an `item.<name>` relay is torn down after listeners are removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RelayPolicy {
    /// Deactivate once no listener for `item.<name>` remains.
    #[default]
    OnLastListener,
    /// Deactivate on any `off("item.<name>", ..)` call, even if other
    /// listeners for the same event are still registered.
    OnAnyRemoval,
}

/// Configuration for an [`ObservableSequence`](crate::ObservableSequence).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SequenceConfig {
    /// Per-event listener count above which a leak warning is logged
    /// (0 = unlimited).
    pub max_listeners: usize,
    /// Event-name prefix that routes a subscription to the item relay.
    pub relay_prefix: String,
    /// Relay teardown policy.
    pub relay_policy: RelayPolicy,
}

impl Default for SequenceConfig {
    fn default() -> Self {
        Self {
            max_listeners: DEFAULT_MAX_LISTENERS,
            relay_prefix: "item.".to_owned(),
            relay_policy: RelayPolicy::default(),
        }
    }
}

impl SequenceConfig {
    /// Create the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the leak-warning threshold.
    #[must_use]
    pub fn with_max_listeners(mut self, max_listeners: usize) -> Self {
        self.max_listeners = max_listeners;
        self
    }

    /// Set the relay prefix. An empty prefix disables relaying.
    #[must_use]
    pub fn with_relay_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.relay_prefix = prefix.into();
        self
    }

    /// Set the relay teardown policy.
    #[must_use]
    pub fn with_relay_policy(mut self, policy: RelayPolicy) -> Self {
        self.relay_policy = policy;
        self
    }

    /// Relay name addressed by `event`, if `event` carries the relay prefix
    /// and a non-empty suffix.
    #[must_use]
    pub fn relay_name<'a>(&self, event: &'a str) -> Option<&'a str> {
        if self.relay_prefix.is_empty() {
            return None;
        }
        event
            .strip_prefix(self.relay_prefix.as_str())
            .filter(|name| !name.is_empty())
    }

    /// Full event name for relay `name`.
    #[must_use]
    pub fn relay_event(&self, name: &str) -> String {
        format!("{}{}", self.relay_prefix, name)
    }
}
