//! Configuration for event buses.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Default cap on the number of events delivered by one flush.
pub const DEFAULT_MAX_EVENTS_PER_FLUSH: usize = 1_000_000;

/// Configuration of an [`EventBus`](crate::EventBus).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BusConfig {
    /// Maximum number of events a single
    /// [`publish_posts`](crate::EventBus::publish_posts) call delivers before
    /// giving up. Handlers that keep posting events would otherwise never let
    /// a flush terminate. `None` removes the cap.
    pub max_events_per_flush: Option<usize>,
}

impl Default for BusConfig {
    fn default() -> Self {
        Self {
            max_events_per_flush: Some(DEFAULT_MAX_EVENTS_PER_FLUSH),
        }
    }
}

impl BusConfig {
    /// A configuration without a flush cap.
    #[must_use]
    pub fn unbounded() -> Self {
        Self {
            max_events_per_flush: None,
        }
    }

    /// Builder method to set the flush cap.
    #[must_use]
    pub fn with_max_events_per_flush(mut self, limit: usize) -> Self {
        self.max_events_per_flush = Some(limit);
        self
    }
}
