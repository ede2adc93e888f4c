//! Configuration for entity pools.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Largest id of the default id space (the positive range of an `i32`).
pub const DEFAULT_MAX_ID: u32 = i32::MAX.unsigned_abs();

/// Configuration of an [`EntityPool`](crate::EntityPool).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PoolConfig {
    /// Largest assignable id. Ids range over `1..=max_id`.
    pub max_id: u32,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            max_id: DEFAULT_MAX_ID,
        }
    }
}

impl PoolConfig {
    /// Builder method to set the largest assignable id.
    #[must_use]
    pub fn with_max_id(mut self, max_id: u32) -> Self {
        self.max_id = max_id;
        self
    }

    /// Returns the number of ids in the id space.
    #[must_use]
    pub fn capacity(&self) -> u32 {
        self.max_id
    }
}
