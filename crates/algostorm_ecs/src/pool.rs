//! The entity pool.
//!
//! [`EntityPool`] owns every entity and its components, assigns ids and keeps
//! the pool's groups up to date. Entities are only reachable through borrows
//! handed out by the pool, so a group can never outlive or destroy the
//! entities it indexes.

use std::collections::HashMap;
use std::fmt;

use algostorm_foundation::{EntityId, Error, Result};
use im::OrdSet;
use tracing::{debug, trace};

use crate::component::{ComponentMap, ComponentSet, ComponentType};
use crate::config::PoolConfig;
use crate::entity::{EntityIds, IdAllocator};
use crate::entity_ref::{Entity, EntityMut, EntityRef};
use crate::group::{Group, GroupId, GroupRegistry};

/// Owner of all entities of a game state.
pub struct EntityPool {
    config: PoolConfig,
    allocator: IdAllocator,
    records: HashMap<EntityId, ComponentMap>,
    /// Live ids, kept separately so snapshots are O(1).
    live: OrdSet<EntityId>,
    groups: GroupRegistry,
}

impl Default for EntityPool {
    fn default() -> Self {
        Self::new()
    }
}

impl EntityPool {
    /// Creates an empty pool with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(PoolConfig::default())
    }

    /// Creates an empty pool with the given configuration.
    #[must_use]
    pub fn with_config(config: PoolConfig) -> Self {
        Self {
            config,
            allocator: IdAllocator::new(config.max_id),
            records: HashMap::new(),
            live: OrdSet::new(),
            groups: GroupRegistry::default(),
        }
    }

    /// Builds a pool holding the given entities.
    ///
    /// # Errors
    ///
    /// Returns an error if an id is repeated or out of range, or if an entity
    /// has two components of the same type.
    pub fn of<I>(entities: I) -> Result<Self>
    where
        I: IntoIterator<Item = (EntityId, ComponentSet)>,
    {
        Self::of_with_config(PoolConfig::default(), entities)
    }

    /// Builds a pool with the given configuration holding the given entities.
    ///
    /// # Errors
    ///
    /// Same as [`EntityPool::of`].
    pub fn of_with_config<I>(config: PoolConfig, entities: I) -> Result<Self>
    where
        I: IntoIterator<Item = (EntityId, ComponentSet)>,
    {
        let mut pool = Self::with_config(config);
        for (id, components) in entities {
            pool.create_with_id(id, components)
                .map_err(|err| err.with_context(format!("restoring {id}")))?;
        }
        Ok(pool)
    }

    /// Returns the pool configuration.
    #[must_use]
    pub fn config(&self) -> &PoolConfig {
        &self.config
    }

    /// Returns the number of live entities.
    #[must_use]
    pub fn len(&self) -> usize {
        self.live.len()
    }

    /// Returns true if there are no live entities.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }

    /// Checks whether `id` belongs to a live entity.
    #[must_use]
    pub fn contains(&self, id: EntityId) -> bool {
        self.records.contains_key(&id)
    }

    /// Creates an entity with the given components and returns its id.
    ///
    /// The id is the first free one after the last automatically assigned id,
    /// wrapping around the id space.
    ///
    /// # Errors
    ///
    /// Returns an error if the id space is exhausted or if two components
    /// share a type. The pool is unchanged on error.
    pub fn create(&mut self, components: ComponentSet) -> Result<EntityId> {
        let components = components.into_map()?;
        let id = self
            .allocator
            .peek(self.live.len(), |id| self.records.contains_key(&id))?;
        self.allocator.advance(id);
        self.install(id, components);
        Ok(id)
    }

    /// Creates an entity with a caller-chosen id.
    ///
    /// # Errors
    ///
    /// Returns an error if `id` is live or outside the id space, or if two
    /// components share a type. The pool is unchanged on error.
    pub fn create_with_id(&mut self, id: EntityId, components: ComponentSet) -> Result<EntityId> {
        if !self.allocator.in_range(id) {
            return Err(Error::invalid_entity_id(id, self.allocator.max_id()));
        }
        if self.records.contains_key(&id) {
            return Err(Error::duplicate_entity(id));
        }
        let components = components.into_map()?;
        self.install(id, components);
        Ok(id)
    }

    fn install(&mut self, id: EntityId, components: ComponentMap) {
        self.live.insert(id);
        let components = self.records.entry(id).or_insert(components);
        self.groups.refresh(&Entity::new(id, components));
        trace!(entity = %id, "created entity");
    }

    /// Gets read access to a live entity.
    #[must_use]
    pub fn get(&self, id: EntityId) -> Option<Entity<'_>> {
        self.records
            .get(&id)
            .map(|components| Entity::new(id, components))
    }

    /// Gets write access to a live entity.
    #[must_use]
    pub fn get_mut(&mut self, id: EntityId) -> Option<EntityMut<'_>> {
        let components = self.records.get_mut(&id)?;
        Some(EntityMut::new(id, components, &mut self.groups))
    }

    /// Deletes an entity and all its components.
    ///
    /// The entity leaves every group before this returns. Returns whether the
    /// entity existed.
    pub fn delete(&mut self, id: EntityId) -> bool {
        if self.records.remove(&id).is_none() {
            return false;
        }
        self.live.remove(&id);
        self.groups.evict(id);
        trace!(entity = %id, "deleted entity");
        true
    }

    /// Deletes every entity. Groups stay registered and become empty.
    pub fn clear(&mut self) {
        debug!(entities = self.live.len(), "clearing entity pool");
        self.records.clear();
        self.live = OrdSet::new();
        self.groups.clear_members();
    }

    /// Iterates over all live entities in ascending id order.
    pub fn entities(&self) -> impl Iterator<Item = Entity<'_>> + '_ {
        self.live.iter().filter_map(|id| self.get(*id))
    }

    /// Returns a snapshot of the live ids.
    ///
    /// The snapshot is not affected by later mutations, so it can be walked
    /// while entities are modified, created or deleted.
    #[must_use]
    pub fn ids(&self) -> EntityIds {
        EntityIds::new(self.live.clone())
    }

    /// Iterates over the entities having all of the given component types.
    pub fn filter_entities<'a>(
        &'a self,
        types: &'a [ComponentType],
    ) -> impl Iterator<Item = Entity<'a>> + 'a {
        self.entities()
            .filter(move |entity| types.iter().all(|ty| entity.contains_type(*ty)))
    }

    /// Derives a live group of the entities satisfying `predicate`.
    pub fn filter<P>(&mut self, predicate: P) -> GroupId
    where
        P: Fn(&Entity<'_>) -> bool + 'static,
    {
        let members: OrdSet<EntityId> = self
            .entities()
            .filter(|entity| predicate(entity))
            .map(|entity| entity.id())
            .collect();
        let size = members.len();
        let id = self.groups.insert(None, Box::new(predicate), members);
        debug!(group = %id, members = size, "created entity group");
        id
    }

    /// Derives a live group of the members of `parent` satisfying
    /// `predicate`.
    ///
    /// # Errors
    ///
    /// Returns an error if `parent` is not registered with this pool.
    pub fn filter_group<P>(&mut self, parent: GroupId, predicate: P) -> Result<GroupId>
    where
        P: Fn(&Entity<'_>) -> bool + 'static,
    {
        let node = self
            .groups
            .node(parent)
            .ok_or_else(|| Error::unknown_group(parent.index()))?;
        let members: OrdSet<EntityId> = node
            .members()
            .iter()
            .filter_map(|id| self.get(*id))
            .filter(|entity| predicate(entity))
            .map(|entity| entity.id())
            .collect();
        let size = members.len();
        let id = self.groups.insert(Some(parent), Box::new(predicate), members);
        debug!(group = %id, %parent, members = size, "created entity group");
        Ok(id)
    }

    /// Gets a view of a registered group.
    #[must_use]
    pub fn group(&self, id: GroupId) -> Option<Group<'_>> {
        self.groups
            .node(id)
            .map(|node| Group::new(id, node, &self.records))
    }

    /// Unregisters a group and every group derived from it.
    ///
    /// Entities are not affected. Returns whether the group was registered.
    pub fn drop_group(&mut self, id: GroupId) -> bool {
        let removed = self.groups.remove(id);
        if removed {
            debug!(group = %id, "dropped entity group");
        }
        removed
    }

    /// Returns the number of registered groups.
    #[must_use]
    pub fn group_count(&self) -> usize {
        self.groups.len()
    }
}

impl fmt::Debug for EntityPool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntityPool")
            .field("config", &self.config)
            .field("entities", &self.live.len())
            .field("groups", &self.groups.len())
            .finish_non_exhaustive()
    }
}
