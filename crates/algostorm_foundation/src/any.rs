//! Type-erasure helpers.
//!
//! Components and messages are stored as trait objects and recovered by
//! downcasting to their concrete type. [`AsAny`] is implemented for every
//! `'static` type so those traits can use it as a supertrait.
//!
//! Call these methods on the trait object itself (`&dyn Trait`), never on a
//! `Box` holding it: the box is `'static` too and would answer for itself.

use std::any::Any;

/// Conversion of a value into [`Any`] for downcasting.
pub trait AsAny: Any {
    /// Borrows this value as [`Any`].
    fn as_any(&self) -> &dyn Any;

    /// Mutably borrows this value as [`Any`].
    fn as_any_mut(&mut self) -> &mut dyn Any;

    /// Converts a boxed value into a boxed [`Any`].
    fn into_any(self: Box<Self>) -> Box<dyn Any>;

    /// Returns the name of the concrete type, for diagnostics.
    fn type_name(&self) -> &'static str;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn into_any(self: Box<Self>) -> Box<dyn Any> {
        self
    }

    fn type_name(&self) -> &'static str {
        std::any::type_name::<T>()
    }
}
