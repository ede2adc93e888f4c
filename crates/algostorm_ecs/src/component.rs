//! Typed component storage.
//!
//! A component is identified by its concrete Rust type. [`ComponentMap`]
//! holds at most one value per type for a single entity, and
//! [`ComponentSet`] collects the initial components of an entity before it
//! is created.

use std::any::TypeId;
use std::collections::HashMap;
use std::fmt;
use std::hash::{Hash, Hasher};

use algostorm_foundation::{AsAny, Error, Result};

/// Data attached to an entity.
///
/// Components are plain immutable values. Two components of different
/// concrete types never collide, whatever their field values.
///
/// # Examples
///
/// ```rust
/// use algostorm_ecs::Component;
///
/// #[derive(Debug, Clone, PartialEq)]
/// struct Position {
///     x: i32,
///     y: i32,
/// }
///
/// impl Component for Position {}
/// ```
pub trait Component: AsAny + fmt::Debug {}

/// Identity of a component type.
///
/// Equality and hashing only consider the underlying [`TypeId`]; the name is
/// kept for diagnostics.
#[derive(Clone, Copy)]
pub struct ComponentType {
    id: TypeId,
    name: &'static str,
}

impl ComponentType {
    /// Returns the component type of `T`.
    #[must_use]
    pub fn of<T: Component>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
        }
    }

    /// Returns the component type of a type-erased component.
    #[must_use]
    pub fn of_value(component: &dyn Component) -> Self {
        Self {
            id: component.as_any().type_id(),
            name: component.type_name(),
        }
    }

    /// Returns the underlying [`TypeId`].
    #[must_use]
    pub fn type_id(self) -> TypeId {
        self.id
    }

    /// Returns the fully qualified type name.
    #[must_use]
    pub fn name(self) -> &'static str {
        self.name
    }
}

impl PartialEq for ComponentType {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for ComponentType {}

impl Hash for ComponentType {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for ComponentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ComponentType({})", self.name)
    }
}

/// The components of a single entity, at most one per type.
#[derive(Default)]
pub struct ComponentMap {
    components: HashMap<ComponentType, Box<dyn Component>>,
}

impl ComponentMap {
    /// Creates an empty component map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of components.
    #[must_use]
    pub fn len(&self) -> usize {
        self.components.len()
    }

    /// Returns true if there are no components.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// Checks whether a component of type `T` is present.
    #[must_use]
    pub fn contains<T: Component>(&self) -> bool {
        self.contains_type(ComponentType::of::<T>())
    }

    /// Checks whether a component of the given type is present.
    #[must_use]
    pub fn contains_type(&self, component_type: ComponentType) -> bool {
        self.components.contains_key(&component_type)
    }

    /// Gets the component of type `T`.
    #[must_use]
    pub fn get<T: Component>(&self) -> Option<&T> {
        self.components
            .get(&ComponentType::of::<T>())
            .and_then(|component| (**component).as_any().downcast_ref::<T>())
    }

    /// Installs a component, returning the previous value of the same type.
    pub fn insert<T: Component>(&mut self, component: T) -> Option<T> {
        self.components
            .insert(ComponentType::of::<T>(), Box::new(component))
            .and_then(downcast_owned)
    }

    /// Removes the component of type `T`, returning it if present.
    pub fn remove<T: Component>(&mut self) -> Option<T> {
        self.components
            .remove(&ComponentType::of::<T>())
            .and_then(downcast_owned)
    }

    /// Iterates over all components in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = &dyn Component> + '_ {
        self.components.values().map(|component| &**component)
    }

    /// Iterates over the types of all components in unspecified order.
    pub fn types(&self) -> impl Iterator<Item = ComponentType> + '_ {
        self.components.keys().copied()
    }

    /// Installs a type-erased component, rejecting a second value of a type.
    fn insert_unique(&mut self, component: Box<dyn Component>) -> Result<()> {
        let component_type = ComponentType::of_value(&*component);
        if self.components.contains_key(&component_type) {
            return Err(Error::duplicate_component(component_type.name()));
        }
        self.components.insert(component_type, component);
        Ok(())
    }
}

impl fmt::Debug for ComponentMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.components.values()).finish()
    }
}

fn downcast_owned<T: Component>(component: Box<dyn Component>) -> Option<T> {
    component.into_any().downcast::<T>().ok().map(|boxed| *boxed)
}

/// Initial components of an entity that is about to be created.
///
/// Duplicated component types are not rejected while building; the pool
/// reports them as [`ErrorKind::DuplicateComponent`] when the set is used.
///
/// [`ErrorKind::DuplicateComponent`]: algostorm_foundation::ErrorKind::DuplicateComponent
#[derive(Debug, Default)]
pub struct ComponentSet {
    components: Vec<Box<dyn Component>>,
}

impl ComponentSet {
    /// Creates an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a component.
    #[must_use]
    pub fn with<T: Component>(mut self, component: T) -> Self {
        self.components.push(Box::new(component));
        self
    }

    /// Adds a type-erased component.
    pub fn push(&mut self, component: Box<dyn Component>) {
        self.components.push(component);
    }

    /// Returns the number of components added so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.components.len()
    }

    /// Returns true if no component was added.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// Converts the set into a component map.
    ///
    /// # Errors
    ///
    /// Returns an error if two components share a concrete type.
    pub fn into_map(self) -> Result<ComponentMap> {
        let mut map = ComponentMap::new();
        for component in self.components {
            map.insert_unique(component)?;
        }
        Ok(map)
    }
}

impl FromIterator<Box<dyn Component>> for ComponentSet {
    fn from_iter<I: IntoIterator<Item = Box<dyn Component>>>(iter: I) -> Self {
        Self {
            components: iter.into_iter().collect(),
        }
    }
}
