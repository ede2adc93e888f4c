//! Message kinds carried by the event bus.
//!
//! An [`Event`] is posted and delivered later, during a flush. A [`Query`]
//! is dispatched immediately and carries a [`Request`] slot that exactly one
//! handler completes.

use std::any::TypeId;
use std::fmt;
use std::hash::{Hash, Hasher};

use algostorm_foundation::AsAny;

use crate::request::Request;

/// An immutable, fire-and-forget message.
///
/// # Examples
///
/// ```rust
/// use algostorm_event::Event;
///
/// #[derive(Debug)]
/// struct Collided {
///     first: u32,
///     second: u32,
/// }
///
/// impl Event for Collided {}
/// ```
pub trait Event: AsAny + fmt::Debug {}

/// A message answered synchronously through its [`Request`] slot.
///
/// # Examples
///
/// ```rust
/// use algostorm_event::{Query, Request};
///
/// #[derive(Debug, Default)]
/// struct FindTarget {
///     from: u32,
///     result: Request<Option<u32>>,
/// }
///
/// impl Query for FindTarget {
///     type Output = Option<u32>;
///
///     fn request(&self) -> &Request<Self::Output> {
///         &self.result
///     }
///
///     fn request_mut(&mut self) -> &mut Request<Self::Output> {
///         &mut self.result
///     }
/// }
/// ```
pub trait Query: AsAny + fmt::Debug {
    /// The type of the answer.
    type Output;

    /// Returns the result slot.
    fn request(&self) -> &Request<Self::Output>;

    /// Returns the result slot for completion.
    fn request_mut(&mut self) -> &mut Request<Self::Output>;
}

/// Whether a message is posted or requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageKind {
    /// A queued [`Event`].
    Event,
    /// A synchronous [`Query`].
    Request,
}

/// Identity of a concrete message type, used as the dispatch key.
#[derive(Clone, Copy)]
pub struct MessageType {
    id: TypeId,
    name: &'static str,
    kind: MessageKind,
}

impl MessageType {
    /// Returns the message type of the event `E`.
    #[must_use]
    pub fn event<E: Event>() -> Self {
        Self {
            id: TypeId::of::<E>(),
            name: std::any::type_name::<E>(),
            kind: MessageKind::Event,
        }
    }

    /// Returns the message type of the request `Q`.
    #[must_use]
    pub fn request<Q: Query>() -> Self {
        Self {
            id: TypeId::of::<Q>(),
            name: std::any::type_name::<Q>(),
            kind: MessageKind::Request,
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

    /// Returns whether this is an event or a request.
    #[must_use]
    pub fn kind(self) -> MessageKind {
        self.kind
    }
}

impl PartialEq for MessageType {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for MessageType {}

impl Hash for MessageType {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for MessageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}({})", self.kind, self.name)
    }
}
