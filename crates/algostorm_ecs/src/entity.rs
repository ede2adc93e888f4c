//! Entity id assignment and id snapshots.
//!
//! Ids are searched for starting just after the last automatically assigned
//! id and wrapping around the id space. A freed id is therefore only handed
//! out again once the search has swept past the end of the id space and come
//! back to it.

use algostorm_foundation::{EntityId, Error, Result};
use im::OrdSet;

/// Assigns ids from `1..=max_id` with a wrap-around cursor.
#[derive(Debug, Clone)]
pub struct IdAllocator {
    /// Largest assignable id.
    max_id: u32,
    /// Last automatically assigned id, 0 before the first assignment.
    cursor: u32,
}

impl IdAllocator {
    /// Creates an allocator over `1..=max_id`.
    #[must_use]
    pub fn new(max_id: u32) -> Self {
        Self { max_id, cursor: 0 }
    }

    /// Returns the largest assignable id.
    #[must_use]
    pub fn max_id(&self) -> u32 {
        self.max_id
    }

    /// Returns the last automatically assigned id.
    #[must_use]
    pub fn cursor(&self) -> EntityId {
        EntityId::new(self.cursor)
    }

    /// Checks whether `id` lies in the id space.
    #[must_use]
    pub fn in_range(&self, id: EntityId) -> bool {
        (1..=self.max_id).contains(&id.value())
    }

    /// Finds the next free id without committing to it.
    ///
    /// `live_count` is the number of ids currently in use and `is_live`
    /// reports whether a given id is taken.
    ///
    /// # Errors
    ///
    /// Returns an error if every id of the id space is in use.
    pub fn peek(&self, live_count: usize, is_live: impl Fn(EntityId) -> bool) -> Result<EntityId> {
        if live_count >= self.max_id as usize {
            return Err(Error::capacity_exhausted(self.max_id));
        }
        let mut candidate = self.cursor;
        loop {
            candidate = if candidate >= self.max_id {
                1
            } else {
                candidate + 1
            };
            let id = EntityId::new(candidate);
            if !is_live(id) {
                return Ok(id);
            }
        }
    }

    /// Records `id` as the last assigned id.
    pub fn advance(&mut self, id: EntityId) {
        self.cursor = id.value();
    }
}

/// An immutable snapshot of entity ids, in ascending order.
///
/// Taking a snapshot is O(1) and it stays valid while the pool it was taken
/// from is mutated, so callers can walk a pool or group and modify entities
/// along the way.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntityIds(OrdSet<EntityId>);

impl EntityIds {
    pub(crate) fn new(ids: OrdSet<EntityId>) -> Self {
        Self(ids)
    }

    /// Returns the number of ids.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if the snapshot is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Checks whether the snapshot contains `id`.
    #[must_use]
    pub fn contains(&self, id: EntityId) -> bool {
        self.0.contains(&id)
    }

    /// Iterates over the ids in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.0.iter().copied()
    }
}

impl IntoIterator for EntityIds {
    type Item = EntityId;
    type IntoIter = im::ordset::ConsumingIter<EntityId>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl FromIterator<EntityId> for EntityIds {
    fn from_iter<I: IntoIterator<Item = EntityId>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
