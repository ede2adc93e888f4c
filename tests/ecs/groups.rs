//! Integration tests for live entity groups
//!
//! Groups must always hold exactly the entities of their parent that satisfy
//! their predicate, whatever mutation path got the pool there.

use algostorm_ecs::{
    Component, ComponentSet, Entity, EntityId, EntityPool, EntityRef, ErrorKind, GroupId,
    MutableEntityRef,
};

#[derive(Debug, Clone, Copy, PartialEq)]
struct Marker(u32);

impl Component for Marker {}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Frozen;

impl Component for Frozen {}

fn marker(entity: &Entity<'_>) -> Option<u32> {
    entity.get::<Marker>().map(|m| m.0)
}

fn is_odd(entity: &Entity<'_>) -> bool {
    marker(entity).is_some_and(|m| m % 2 == 1)
}

fn is_even(entity: &Entity<'_>) -> bool {
    marker(entity).is_some_and(|m| m % 2 == 0)
}

fn members(pool: &EntityPool, group: GroupId) -> Vec<EntityId> {
    pool.group(group).unwrap().ids().into_iter().collect()
}

fn expected(pool: &EntityPool, predicate: impl Fn(&Entity<'_>) -> bool) -> Vec<EntityId> {
    pool.entities()
        .filter(|entity| predicate(entity))
        .map(|entity| entity.id())
        .collect()
}

// =============================================================================
// Membership Tracking
// =============================================================================

#[test]
fn odd_and_even_groups_follow_marker_changes() {
    let mut pool = EntityPool::new();
    for value in 1..1000 {
        pool.create_with_id(EntityId::new(value), ComponentSet::new().with(Marker(value)))
            .unwrap();
    }
    let odd = pool.filter(is_odd);
    let even = pool.filter(is_even);

    assert_eq!(pool.group(odd).unwrap().len(), 500);
    assert_eq!(pool.group(even).unwrap().len(), 499);

    // Flip the parity of every entity.
    for id in pool.ids() {
        let mut entity = pool.get_mut(id).unwrap();
        let value = entity.get::<Marker>().unwrap().0;
        entity.set(Marker(value + 1));
    }

    assert_eq!(members(&pool, odd), expected(&pool, is_odd));
    assert_eq!(members(&pool, even), expected(&pool, is_even));
    assert!(pool.group(even).unwrap().contains(EntityId::new(1)));
    assert!(pool.group(odd).unwrap().contains(EntityId::new(2)));
}

#[test]
fn groups_include_entities_created_later() {
    let mut pool = EntityPool::new();
    let odd = pool.filter(is_odd);

    let id = pool.create(ComponentSet::new().with(Marker(3))).unwrap();
    pool.create(ComponentSet::new().with(Marker(4))).unwrap();

    assert_eq!(members(&pool, odd), vec![id]);
}

#[test]
fn removing_component_leaves_group() {
    let mut pool = EntityPool::new();
    let id = pool.create(ComponentSet::new().with(Marker(1))).unwrap();
    let odd = pool.filter(is_odd);

    pool.get_mut(id).unwrap().remove::<Marker>();
    assert!(pool.group(odd).unwrap().is_empty());
}

#[test]
fn deleted_entities_leave_every_group() {
    let mut pool = EntityPool::new();
    let id = pool.create(ComponentSet::new().with(Marker(1))).unwrap();
    let odd = pool.filter(is_odd);
    let nested = pool.filter_group(odd, |_| true).unwrap();

    pool.delete(id);
    assert!(!pool.group(odd).unwrap().contains(id));
    assert!(!pool.group(nested).unwrap().contains(id));
}

#[test]
fn group_entities_yield_live_views() {
    let mut pool = EntityPool::new();
    pool.create(ComponentSet::new().with(Marker(5))).unwrap();
    pool.create(ComponentSet::new().with(Marker(7))).unwrap();
    let odd = pool.filter(is_odd);

    let mut values: Vec<_> = pool
        .group(odd)
        .unwrap()
        .entities()
        .filter_map(|entity| marker(&entity))
        .collect();
    values.sort_unstable();
    assert_eq!(values, vec![5, 7]);
}

// =============================================================================
// Nested Groups
// =============================================================================

#[test]
fn nested_group_is_subset_of_parent() {
    let mut pool = EntityPool::new();
    for value in 0..20 {
        pool.create(ComponentSet::new().with(Marker(value))).unwrap();
    }
    let odd = pool.filter(is_odd);
    let large_odd = pool
        .filter_group(odd, |entity| marker(entity).is_some_and(|m| m > 10))
        .unwrap();

    let parent = pool.group(odd).unwrap();
    let child = pool.group(large_odd).unwrap();
    assert_eq!(child.parent(), Some(odd));
    assert!(child.ids().iter().all(|id| parent.contains(id)));
    assert_eq!(child.len(), 5);
}

#[test]
fn leaving_parent_cascades_to_descendants() {
    let mut pool = EntityPool::new();
    let id = pool.create(ComponentSet::new().with(Marker(1))).unwrap();

    let odd = pool.filter(is_odd);
    let not_frozen = pool
        .filter_group(odd, |entity| !entity.contains::<Frozen>())
        .unwrap();
    let any = pool.filter_group(not_frozen, |_| true).unwrap();
    assert!(pool.group(any).unwrap().contains(id));

    pool.get_mut(id).unwrap().set(Marker(2));
    for group in [odd, not_frozen, any] {
        assert!(!pool.group(group).unwrap().contains(id));
    }

    // Rejoining the root does not skip intermediate predicates.
    pool.get_mut(id).unwrap().set(Frozen);
    pool.get_mut(id).unwrap().set(Marker(3));
    assert!(pool.group(odd).unwrap().contains(id));
    assert!(!pool.group(not_frozen).unwrap().contains(id));
    assert!(!pool.group(any).unwrap().contains(id));
}

#[test]
fn filter_group_of_unknown_parent_fails() {
    let mut pool = EntityPool::new();
    let group = pool.filter(is_odd);
    assert!(pool.drop_group(group));

    let err = pool.filter_group(group, is_even).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::UnknownGroup(_)));
}

#[test]
fn dropping_group_drops_descendants() {
    let mut pool = EntityPool::new();
    let odd = pool.filter(is_odd);
    let nested = pool.filter_group(odd, |_| true).unwrap();
    let sibling = pool.filter(is_even);

    assert!(pool.drop_group(odd));
    assert!(pool.group(odd).is_none());
    assert!(pool.group(nested).is_none());
    assert!(pool.group(sibling).is_some());
    assert!(!pool.drop_group(odd));
}

#[test]
fn clear_empties_groups_but_keeps_them() {
    let mut pool = EntityPool::new();
    pool.create(ComponentSet::new().with(Marker(1))).unwrap();
    let odd = pool.filter(is_odd);

    pool.clear();
    assert!(pool.group(odd).unwrap().is_empty());

    let id = pool.create(ComponentSet::new().with(Marker(9))).unwrap();
    assert!(pool.group(odd).unwrap().contains(id));
}
