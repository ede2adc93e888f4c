//! Entity pool, typed component storage and live entity groups for Algostorm.
//!
//! This crate provides:
//! - [`Component`] - Typed data attached to entities, unique per type
//! - [`EntityPool`] - Owner of entities with wrap-around id assignment
//! - [`EntityRef`] / [`MutableEntityRef`] - Read and write capabilities
//! - [`Group`] - Live, predicate-derived subsets kept exact under mutation
//!
//! # Example
//!
//! ```rust
//! use algostorm_ecs::{Component, ComponentSet, EntityPool, EntityRef, MutableEntityRef};
//!
//! #[derive(Debug)]
//! struct Health(u32);
//!
//! impl Component for Health {}
//!
//! let mut pool = EntityPool::new();
//! let alive = pool.filter(|entity| entity.get::<Health>().is_some_and(|h| h.0 > 0));
//! let id = pool.create(ComponentSet::new().with(Health(3))).unwrap();
//! assert!(pool.group(alive).unwrap().contains(id));
//!
//! pool.get_mut(id).unwrap().set(Health(0));
//! assert!(!pool.group(alive).unwrap().contains(id));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod component;
pub mod config;
pub mod entity;
pub mod entity_ref;
pub mod group;
pub mod pool;

pub use component::{Component, ComponentMap, ComponentSet, ComponentType};
pub use config::PoolConfig;
pub use entity::{EntityIds, IdAllocator};
pub use entity_ref::{Entity, EntityMut, EntityRef, MutableEntityRef};
pub use group::{Group, GroupId, Predicate};
pub use pool::EntityPool;

pub use algostorm_foundation::{EntityId, Error, ErrorKind, Result};
