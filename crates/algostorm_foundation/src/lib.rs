//! Core identifiers, errors and type-erasure helpers for Algostorm.
//!
//! This crate provides:
//! - [`EntityId`] - Positive integer entity identifiers
//! - [`Error`] - Contract-violation errors shared by every layer
//! - [`AsAny`] - Downcasting support for type-erased components and messages

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod any;
pub mod entity;
pub mod error;

pub use any::AsAny;
pub use entity::EntityId;
pub use error::{Error, ErrorKind, HandlerRule, Result, SemanticLimit};
