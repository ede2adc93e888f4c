//! Live entity groups.
//!
//! A group is a predicate-defined subset of the pool or of another group. The
//! pool owns a [`GroupRegistry`] and pushes every component change of an
//! entity to it; the registry then re-examines only that entity, so group
//! membership is exact immediately after each mutation.
//!
//! # Maintenance
//!
//! ```text
//! pool ── root group ── child group ── grandchild group
//!              │
//!              └── child group
//! ```
//!
//! When an entity changes, each root group re-evaluates its predicate. An
//! entity that still matches stays (or becomes) a member and the group's
//! children re-evaluate in turn. An entity that stops matching leaves the
//! group and, without consulting their predicates, every descendant.

// Allow usize to u32 casts - group counts stay far below u32::MAX
#![allow(clippy::cast_possible_truncation)]

use std::collections::HashMap;
use std::fmt;

use algostorm_foundation::EntityId;
use im::OrdSet;
use tracing::trace;

use crate::component::ComponentMap;
use crate::entity::EntityIds;
use crate::entity_ref::{Entity, EntityRef};

/// Identifier of a group registered with a pool.
///
/// Ids of dropped groups are never handed out again. The registry keeps an
/// empty slot per dropped group, so its slot table grows with the number of
/// groups ever created.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GroupId(u32);

impl GroupId {
    /// Returns the raw index of this group.
    #[must_use]
    pub const fn index(self) -> u32 {
        self.0
    }
}

impl fmt::Display for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Group({})", self.0)
    }
}

/// Membership predicate of a group.
pub type Predicate = Box<dyn Fn(&Entity<'_>) -> bool>;

pub(crate) struct GroupNode {
    parent: Option<GroupId>,
    predicate: Predicate,
    members: OrdSet<EntityId>,
    children: Vec<GroupId>,
}

impl GroupNode {
    pub(crate) fn members(&self) -> &OrdSet<EntityId> {
        &self.members
    }
}

/// All groups of a pool, with their derivation tree.
#[derive(Default)]
pub(crate) struct GroupRegistry {
    nodes: Vec<Option<GroupNode>>,
    roots: Vec<GroupId>,
    live: usize,
}

impl GroupRegistry {
    /// Returns the number of registered groups.
    pub(crate) fn len(&self) -> usize {
        self.live
    }

    pub(crate) fn node(&self, id: GroupId) -> Option<&GroupNode> {
        self.nodes.get(id.0 as usize).and_then(Option::as_ref)
    }

    fn node_mut(&mut self, id: GroupId) -> Option<&mut GroupNode> {
        self.nodes.get_mut(id.0 as usize).and_then(Option::as_mut)
    }

    /// Registers a group with precomputed members.
    ///
    /// `parent` must be registered; the pool checks it beforehand.
    pub(crate) fn insert(
        &mut self,
        parent: Option<GroupId>,
        predicate: Predicate,
        members: OrdSet<EntityId>,
    ) -> GroupId {
        let id = GroupId(self.nodes.len() as u32);
        self.nodes.push(Some(GroupNode {
            parent,
            predicate,
            members,
            children: Vec::new(),
        }));
        self.live += 1;
        match parent {
            Some(parent) => {
                if let Some(parent) = self.node_mut(parent) {
                    parent.children.push(id);
                }
            }
            None => self.roots.push(id),
        }
        id
    }

    /// Unregisters a group together with all of its descendants.
    pub(crate) fn remove(&mut self, id: GroupId) -> bool {
        let Some(parent) = self.node(id).map(|node| node.parent) else {
            return false;
        };
        match parent {
            Some(parent) => {
                if let Some(parent) = self.node_mut(parent) {
                    parent.children.retain(|child| *child != id);
                }
            }
            None => self.roots.retain(|root| *root != id),
        }
        self.remove_subtree(id);
        true
    }

    fn remove_subtree(&mut self, id: GroupId) {
        let Some(node) = self.nodes.get_mut(id.0 as usize).and_then(Option::take) else {
            return;
        };
        self.live -= 1;
        for child in node.children {
            self.remove_subtree(child);
        }
    }

    /// Re-evaluates one entity against every group.
    pub(crate) fn refresh(&mut self, entity: &Entity<'_>) {
        for index in 0..self.roots.len() {
            let root = self.roots[index];
            self.reevaluate(root, entity);
        }
    }

    fn reevaluate(&mut self, group: GroupId, entity: &Entity<'_>) {
        let id = entity.id();
        let Some(node) = self.node_mut(group) else {
            return;
        };
        if (node.predicate)(entity) {
            if node.members.insert(id).is_none() {
                trace!(%group, entity = %id, "entity joined group");
            }
            let children = node.children.clone();
            for child in children {
                self.reevaluate(child, entity);
            }
        } else if node.members.remove(&id).is_some() {
            trace!(%group, entity = %id, "entity left group");
            let children = node.children.clone();
            for child in children {
                self.evict_from(child, id);
            }
        }
    }

    /// Removes an entity from every group.
    pub(crate) fn evict(&mut self, id: EntityId) {
        for index in 0..self.roots.len() {
            let root = self.roots[index];
            self.evict_from(root, id);
        }
    }

    fn evict_from(&mut self, group: GroupId, id: EntityId) {
        let Some(node) = self.node_mut(group) else {
            return;
        };
        // Descendants are subsets, so a non-member has nothing to cascade.
        if node.members.remove(&id).is_none() {
            return;
        }
        let children = node.children.clone();
        for child in children {
            self.evict_from(child, id);
        }
    }

    /// Empties every group, keeping the groups registered.
    pub(crate) fn clear_members(&mut self) {
        for node in self.nodes.iter_mut().flatten() {
            node.members = OrdSet::new();
        }
    }
}

/// A read-only view of a live group.
#[derive(Clone, Copy)]
pub struct Group<'a> {
    id: GroupId,
    node: &'a GroupNode,
    records: &'a HashMap<EntityId, ComponentMap>,
}

impl<'a> Group<'a> {
    pub(crate) fn new(
        id: GroupId,
        node: &'a GroupNode,
        records: &'a HashMap<EntityId, ComponentMap>,
    ) -> Self {
        Self { id, node, records }
    }

    /// Returns the id of this group.
    #[must_use]
    pub fn id(&self) -> GroupId {
        self.id
    }

    /// Returns the group this one was derived from, or `None` if it was
    /// derived from the pool directly.
    #[must_use]
    pub fn parent(&self) -> Option<GroupId> {
        self.node.parent
    }

    /// Checks membership without evaluating the predicate.
    #[must_use]
    pub fn contains(&self, id: EntityId) -> bool {
        self.node.members.contains(&id)
    }

    /// Returns the number of members.
    #[must_use]
    pub fn len(&self) -> usize {
        self.node.members.len()
    }

    /// Returns true if the group has no members.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.node.members.is_empty()
    }

    /// Returns a snapshot of the current members.
    #[must_use]
    pub fn ids(&self) -> EntityIds {
        EntityIds::new(self.node.members.clone())
    }

    /// Iterates over the current members in ascending id order.
    pub fn entities(&self) -> impl Iterator<Item = Entity<'a>> + use<'a> {
        let (node, records) = (self.node, self.records);
        node.members
            .iter()
            .filter_map(move |id| records.get(id).map(|components| Entity::new(*id, components)))
    }
}

impl fmt::Debug for Group<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Group")
            .field("id", &self.id)
            .field("parent", &self.node.parent)
            .field("members", &self.node.members)
            .finish()
    }
}
