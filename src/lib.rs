//! Algostorm - Entity pool and event bus for turn-based game engines
//!
//! This crate re-exports all layers of the Algostorm core for convenient access.
//! For detailed documentation, see the individual layer crates.
//!
//! # Architecture
//!
//! ```text
//! Layer 1: algostorm_ecs        - Entity pool, components, live groups
//!          algostorm_event      - Event bus, requests, subscribers
//! Layer 0: algostorm_foundation - Core types (EntityId, Error, AsAny)
//! ```

pub use algostorm_ecs as ecs;
pub use algostorm_event as event;
pub use algostorm_foundation as foundation;
