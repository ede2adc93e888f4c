//! Capability-scoped access to a single entity.
//!
//! [`EntityRef`] grants read access to an entity's components and
//! [`MutableEntityRef`] extends it with writes. Both are short-lived borrows
//! of the owning [`EntityPool`](crate::EntityPool); the pool stays the only
//! owner of entities.

use std::fmt;

use algostorm_foundation::EntityId;

use crate::component::{Component, ComponentMap, ComponentType};
use crate::group::GroupRegistry;

/// Read access to one entity.
pub trait EntityRef {
    /// Returns the id of the entity.
    fn id(&self) -> EntityId;

    /// Returns all components of the entity.
    fn components(&self) -> &ComponentMap;

    /// Checks whether the entity has a component of type `T`.
    fn contains<T: Component>(&self) -> bool {
        self.components().contains::<T>()
    }

    /// Checks whether the entity has a component of the given type.
    fn contains_type(&self, component_type: ComponentType) -> bool {
        self.components().contains_type(component_type)
    }

    /// Gets the component of type `T`.
    fn get<T: Component>(&self) -> Option<&T> {
        self.components().get::<T>()
    }
}

/// Write access to one entity.
///
/// `set` and `remove` are the only ways to change an entity's components.
/// Each call re-evaluates this entity's membership in every group derived
/// from the pool.
pub trait MutableEntityRef: EntityRef {
    /// Installs `component`, returning the previous component of its type.
    fn set<T: Component>(&mut self, component: T) -> Option<T>;

    /// Removes the component of type `T`, returning it if present.
    fn remove<T: Component>(&mut self) -> Option<T>;
}

/// A read-only reference to a live entity.
#[derive(Clone, Copy)]
pub struct Entity<'a> {
    id: EntityId,
    components: &'a ComponentMap,
}

impl<'a> Entity<'a> {
    pub(crate) fn new(id: EntityId, components: &'a ComponentMap) -> Self {
        Self { id, components }
    }
}

impl EntityRef for Entity<'_> {
    fn id(&self) -> EntityId {
        self.id
    }

    fn components(&self) -> &ComponentMap {
        self.components
    }
}

impl fmt::Debug for Entity<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Entity")
            .field("id", &self.id)
            .field("components", self.components)
            .finish()
    }
}

/// A mutable reference to a live entity.
pub struct EntityMut<'a> {
    id: EntityId,
    components: &'a mut ComponentMap,
    groups: &'a mut GroupRegistry,
}

impl<'a> EntityMut<'a> {
    pub(crate) fn new(
        id: EntityId,
        components: &'a mut ComponentMap,
        groups: &'a mut GroupRegistry,
    ) -> Self {
        Self {
            id,
            components,
            groups,
        }
    }

    /// Downgrades to a read-only reference.
    #[must_use]
    pub fn as_entity(&self) -> Entity<'_> {
        Entity::new(self.id, self.components)
    }

    fn refresh_groups(&mut self) {
        self.groups.refresh(&Entity::new(self.id, self.components));
    }
}

impl EntityRef for EntityMut<'_> {
    fn id(&self) -> EntityId {
        self.id
    }

    fn components(&self) -> &ComponentMap {
        self.components
    }
}

impl MutableEntityRef for EntityMut<'_> {
    fn set<T: Component>(&mut self, component: T) -> Option<T> {
        let previous = self.components.insert(component);
        self.refresh_groups();
        previous
    }

    fn remove<T: Component>(&mut self) -> Option<T> {
        let removed = self.components.remove::<T>();
        if removed.is_some() {
            self.refresh_groups();
        }
        removed
    }
}

impl fmt::Debug for EntityMut<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntityMut")
            .field("id", &self.id)
            .field("components", &*self.components)
            .finish()
    }
}
