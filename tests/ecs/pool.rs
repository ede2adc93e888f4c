//! Integration tests for the entity pool
//!
//! Tests id assignment, explicit ids, deletion and capacity.

use algostorm_ecs::{
    Component, ComponentSet, ComponentType, EntityId, EntityPool, EntityRef, ErrorKind,
    PoolConfig,
};

#[derive(Debug, Clone, PartialEq)]
struct Position {
    x: i32,
    y: i32,
}

impl Component for Position {}

#[derive(Debug, Clone, PartialEq)]
struct Name(&'static str);

impl Component for Name {}

fn small_pool(max_id: u32) -> EntityPool {
    EntityPool::with_config(PoolConfig::default().with_max_id(max_id))
}

// =============================================================================
// Creation
// =============================================================================

#[test]
fn created_ids_are_positive_and_distinct() {
    let mut pool = EntityPool::new();
    let ids: Vec<_> = (0..100)
        .map(|_| pool.create(ComponentSet::new()).unwrap())
        .collect();

    assert!(ids.iter().all(|id| id.value() > 0));
    let mut unique = ids.clone();
    unique.sort();
    unique.dedup();
    assert_eq!(unique.len(), ids.len());
    assert_eq!(pool.len(), 100);
}

#[test]
fn created_entity_has_given_components() {
    let mut pool = EntityPool::new();
    let components = ComponentSet::new()
        .with(Position { x: 1, y: 2 })
        .with(Name("hero"));
    let id = pool.create(components).unwrap();

    let entity = pool.get(id).unwrap();
    assert_eq!(entity.id(), id);
    assert_eq!(entity.get::<Position>(), Some(&Position { x: 1, y: 2 }));
    assert_eq!(entity.get::<Name>(), Some(&Name("hero")));
    assert_eq!(entity.components().len(), 2);
}

#[test]
fn duplicate_component_type_is_rejected() {
    let mut pool = EntityPool::new();
    let components = ComponentSet::new().with(Name("a")).with(Name("b"));

    let err = pool.create(components).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::DuplicateComponent(_)));
    assert!(pool.is_empty());
}

#[test]
fn create_with_id_uses_requested_id() {
    let mut pool = EntityPool::new();
    let id = pool
        .create_with_id(EntityId::new(17), ComponentSet::new().with(Name("x")))
        .unwrap();
    assert_eq!(id, EntityId::new(17));
    assert!(pool.contains(id));
}

#[test]
fn create_with_live_id_fails() {
    let mut pool = EntityPool::new();
    pool.create_with_id(EntityId::new(3), ComponentSet::new()).unwrap();

    let err = pool
        .create_with_id(EntityId::new(3), ComponentSet::new())
        .unwrap_err();
    assert!(matches!(err.kind, ErrorKind::DuplicateEntity(_)));
}

#[test]
fn create_with_out_of_range_id_fails() {
    let mut pool = small_pool(10);
    for raw in [0, 11] {
        let err = pool
            .create_with_id(EntityId::new(raw), ComponentSet::new())
            .unwrap_err();
        assert!(matches!(err.kind, ErrorKind::InvalidEntityId { .. }));
    }
}

#[test]
fn auto_ids_skip_explicit_ids() {
    let mut pool = EntityPool::new();
    pool.create_with_id(EntityId::new(1), ComponentSet::new()).unwrap();
    pool.create_with_id(EntityId::new(2), ComponentSet::new()).unwrap();

    let id = pool.create(ComponentSet::new()).unwrap();
    assert_eq!(id, EntityId::new(3));
}

// =============================================================================
// Capacity
// =============================================================================

#[test]
fn full_pool_refuses_creation() {
    let mut pool = small_pool(4);
    for _ in 0..4 {
        pool.create(ComponentSet::new()).unwrap();
    }

    let err = pool.create(ComponentSet::new()).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::CapacityExhausted { capacity: 4 }));
}

#[test]
fn deleted_ids_are_reused_after_wrap() {
    let mut pool = small_pool(3);
    let first = pool.create(ComponentSet::new()).unwrap();
    pool.create(ComponentSet::new()).unwrap();
    pool.create(ComponentSet::new()).unwrap();

    assert!(pool.delete(first));
    assert_eq!(pool.create(ComponentSet::new()).unwrap(), first);
}

#[test]
fn deleted_id_is_not_reused_immediately() {
    let mut pool = small_pool(100);
    let id = pool.create(ComponentSet::new()).unwrap();
    pool.delete(id);

    assert_ne!(pool.create(ComponentSet::new()).unwrap(), id);
}

// =============================================================================
// Deletion and Queries
// =============================================================================

#[test]
fn delete_removes_entity() {
    let mut pool = EntityPool::new();
    let id = pool.create(ComponentSet::new().with(Name("gone"))).unwrap();

    assert!(pool.delete(id));
    assert!(pool.get(id).is_none());
    assert!(!pool.contains(id));
    assert!(!pool.delete(id));
}

#[test]
fn get_unknown_id_is_none() {
    let pool = EntityPool::new();
    assert!(pool.get(EntityId::new(5)).is_none());
    assert!(pool.get(EntityId::NULL).is_none());
}

#[test]
fn ids_snapshot_is_unaffected_by_later_changes() {
    let mut pool = EntityPool::new();
    let a = pool.create(ComponentSet::new()).unwrap();
    let snapshot = pool.ids();

    let b = pool.create(ComponentSet::new()).unwrap();
    pool.delete(a);

    assert!(snapshot.contains(a));
    assert!(!snapshot.contains(b));
    assert_eq!(snapshot.len(), 1);
}

#[test]
fn filter_entities_by_component_types() {
    let mut pool = EntityPool::new();
    let both = pool
        .create(
            ComponentSet::new()
                .with(Name("both"))
                .with(Position { x: 0, y: 0 }),
        )
        .unwrap();
    pool.create(ComponentSet::new().with(Name("name only"))).unwrap();

    let types = [ComponentType::of::<Name>(), ComponentType::of::<Position>()];
    let matched: Vec<_> = pool.filter_entities(&types).map(|e| e.id()).collect();
    assert_eq!(matched, vec![both]);
}

#[test]
fn clear_removes_everything() {
    let mut pool = EntityPool::new();
    for _ in 0..10 {
        pool.create(ComponentSet::new()).unwrap();
    }
    pool.clear();

    assert!(pool.is_empty());
    assert_eq!(pool.entities().count(), 0);
}

#[test]
fn of_restores_entities() {
    let pool = EntityPool::of([
        (EntityId::new(4), ComponentSet::new().with(Name("four"))),
        (EntityId::new(9), ComponentSet::new().with(Name("nine"))),
    ])
    .unwrap();

    assert_eq!(pool.len(), 2);
    assert_eq!(pool.get(EntityId::new(9)).unwrap().get::<Name>(), Some(&Name("nine")));
}

#[test]
fn of_rejects_repeated_ids() {
    let err = EntityPool::of([
        (EntityId::new(4), ComponentSet::new()),
        (EntityId::new(4), ComponentSet::new()),
    ])
    .unwrap_err();

    assert!(matches!(err.kind, ErrorKind::DuplicateEntity(_)));
    assert!(err.context.is_some());
}
