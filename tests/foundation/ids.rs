//! Integration tests for entity ids

use std::collections::BTreeSet;

use algostorm_foundation::EntityId;

#[test]
fn null_is_zero() {
    assert!(EntityId::NULL.is_null());
    assert_eq!(EntityId::NULL.value(), 0);
    assert!(!EntityId::new(1).is_null());
}

#[test]
fn ids_order_by_value() {
    let ids: BTreeSet<_> = [5u32, 1, 3].into_iter().map(EntityId::from).collect();
    let values: Vec<_> = ids.into_iter().map(EntityId::value).collect();
    assert_eq!(values, vec![1, 3, 5]);
}

#[test]
fn display_and_debug() {
    assert_eq!(EntityId::new(7).to_string(), "Entity(7)");
    assert_eq!(format!("{:?}", EntityId::new(7)), "EntityId(7)");
    assert_eq!(EntityId::NULL.to_string(), "Entity(null)");
}
