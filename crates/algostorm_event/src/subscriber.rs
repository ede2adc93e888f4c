//! Subscribers and their handler declarations.
//!
//! A [`Subscriber`] lists its handlers in a [`HandlerSet`]. Typed handlers
//! added with [`HandlerSet::on_event`] and [`HandlerSet::on_request`] always
//! have a valid shape. Handlers described at runtime, such as those exported
//! by a scripting layer, go through [`HandlerSet::declare`] with an explicit
//! [`HandlerSignature`] that the bus validates on subscription.

use std::any::Any;
use std::fmt;

use crate::message::{Event, MessageKind, MessageType, Query};

/// A type whose handlers receive events and requests from an
/// [`EventBus`](crate::EventBus).
///
/// # Examples
///
/// ```rust
/// use algostorm_event::{Event, HandlerSet, Subscriber};
///
/// #[derive(Debug)]
/// struct Scored(u32);
///
/// impl Event for Scored {}
///
/// #[derive(Default)]
/// struct Scoreboard {
///     total: u32,
/// }
///
/// impl Scoreboard {
///     fn on_scored(&mut self, event: &Scored) {
///         self.total += event.0;
///     }
/// }
///
/// impl Subscriber for Scoreboard {
///     fn declare(&self, handlers: &mut HandlerSet<Self>) {
///         handlers.on_event("on_scored", Self::on_scored);
///     }
/// }
/// ```
pub trait Subscriber: 'static {
    /// Declares every handler of this subscriber.
    fn declare(&self, handlers: &mut HandlerSet<Self>)
    where
        Self: Sized;
}

/// Type-erased handler body.
pub type Callback<S> = Box<dyn FnMut(&mut S, &mut dyn Any)>;

// =============================================================================
// Signatures
// =============================================================================

/// Visibility of a declared handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Visibility {
    /// Reachable by the bus.
    #[default]
    Public,
    /// Reachable by subtypes only. Ignored by the bus.
    Protected,
    /// Internal helper. Ignored by the bus.
    Private,
}

/// Whether a handler is bound to a subscriber instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Receiver {
    /// Called on the subscribed instance.
    #[default]
    Instance,
    /// Not bound to an instance. Ignored by the bus.
    Static,
}

/// The declared type of a handler parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParameterType {
    /// A concrete event or request type.
    Message(MessageType),
    /// A message type with unbound type arguments, such as a request whose
    /// result type is left open.
    OpenMessage(MessageKind),
    /// A type variable, optionally bounded by a message kind.
    TypeVariable {
        /// Name of the variable.
        name: String,
        /// Message kind the variable is bounded by, if any.
        bound: Option<MessageKind>,
    },
    /// Any other type.
    Other(String),
}

impl ParameterType {
    /// Whether values of this type are events or requests.
    #[must_use]
    pub fn is_message(&self) -> bool {
        match self {
            Self::Message(_) | Self::OpenMessage(_) => true,
            Self::TypeVariable { bound, .. } => bound.is_some(),
            Self::Other(_) => false,
        }
    }

    /// Whether this type is fully known.
    #[must_use]
    pub fn is_concrete(&self) -> bool {
        matches!(self, Self::Message(_) | Self::Other(_))
    }
}

/// The declared return type of a handler.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ReturnType {
    /// Returns nothing.
    #[default]
    Unit,
    /// Returns a value of the named type.
    Value(String),
}

/// Shape of a declared handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandlerSignature {
    /// Handler name, used in logs and errors.
    pub name: String,
    /// Declared visibility.
    pub visibility: Visibility,
    /// Declared receiver.
    pub receiver: Receiver,
    /// Whether subtypes may replace the handler.
    pub overridable: bool,
    /// Number of type parameters of the handler itself.
    pub type_parameters: usize,
    /// Declared parameter types.
    pub parameters: Vec<ParameterType>,
    /// Declared return type.
    pub returns: ReturnType,
}

impl HandlerSignature {
    /// A public, final, non-generic instance handler of `message` that
    /// returns nothing.
    #[must_use]
    pub fn new(name: impl Into<String>, message: MessageType) -> Self {
        Self {
            name: name.into(),
            visibility: Visibility::Public,
            receiver: Receiver::Instance,
            overridable: false,
            type_parameters: 0,
            parameters: vec![ParameterType::Message(message)],
            returns: ReturnType::Unit,
        }
    }

    /// Builder method to set the visibility.
    #[must_use]
    pub fn with_visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = visibility;
        self
    }

    /// Builder method to set the receiver.
    #[must_use]
    pub fn with_receiver(mut self, receiver: Receiver) -> Self {
        self.receiver = receiver;
        self
    }

    /// Builder method to mark the handler overridable.
    #[must_use]
    pub fn overridable(mut self) -> Self {
        self.overridable = true;
        self
    }

    /// Builder method to set the number of type parameters.
    #[must_use]
    pub fn with_type_parameters(mut self, count: usize) -> Self {
        self.type_parameters = count;
        self
    }

    /// Builder method to replace the parameter list.
    #[must_use]
    pub fn with_parameters(mut self, parameters: Vec<ParameterType>) -> Self {
        self.parameters = parameters;
        self
    }

    /// Builder method to set a non-unit return type.
    #[must_use]
    pub fn returning(mut self, type_name: impl Into<String>) -> Self {
        self.returns = ReturnType::Value(type_name.into());
        self
    }

    /// The message type of the single parameter, if it is concrete.
    #[must_use]
    pub fn message(&self) -> Option<MessageType> {
        match self.parameters.as_slice() {
            [ParameterType::Message(message)] => Some(*message),
            _ => None,
        }
    }
}

// =============================================================================
// Handler Sets
// =============================================================================

/// One declared handler and its body.
pub struct HandlerDeclaration<S> {
    pub(crate) signature: HandlerSignature,
    pub(crate) callback: Callback<S>,
}

impl<S> HandlerDeclaration<S> {
    /// Returns the declared signature.
    #[must_use]
    pub fn signature(&self) -> &HandlerSignature {
        &self.signature
    }
}

impl<S> fmt::Debug for HandlerDeclaration<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerDeclaration")
            .field("signature", &self.signature)
            .finish_non_exhaustive()
    }
}

/// Handlers declared by a subscriber, in declaration order.
pub struct HandlerSet<S> {
    declarations: Vec<HandlerDeclaration<S>>,
}

impl<S> Default for HandlerSet<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> HandlerSet<S> {
    /// Creates an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self {
            declarations: Vec::new(),
        }
    }

    /// Returns the number of declarations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.declarations.len()
    }

    /// Returns true if nothing was declared.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty()
    }

    /// Iterates over the declarations.
    pub fn iter(&self) -> impl Iterator<Item = &HandlerDeclaration<S>> {
        self.declarations.iter()
    }

    pub(crate) fn into_declarations(self) -> Vec<HandlerDeclaration<S>> {
        self.declarations
    }
}

impl<S: 'static> HandlerSet<S> {
    /// Declares a handler for events of type `E`.
    pub fn on_event<E: Event>(
        &mut self,
        name: impl Into<String>,
        mut handler: impl FnMut(&mut S, &E) + 'static,
    ) -> &mut Self {
        let signature = HandlerSignature::new(name, MessageType::event::<E>());
        self.declare(signature, move |subscriber, message| {
            if let Some(event) = message.downcast_ref::<E>() {
                handler(subscriber, event);
            }
        })
    }

    /// Declares a handler for requests of type `Q`.
    pub fn on_request<Q: Query>(
        &mut self,
        name: impl Into<String>,
        mut handler: impl FnMut(&mut S, &mut Q) + 'static,
    ) -> &mut Self {
        let signature = HandlerSignature::new(name, MessageType::request::<Q>());
        self.declare(signature, move |subscriber, message| {
            if let Some(query) = message.downcast_mut::<Q>() {
                handler(subscriber, query);
            }
        })
    }

    /// Declares a handler with an explicit signature.
    ///
    /// The body receives every message routed to the declared parameter type
    /// and is expected to downcast it.
    pub fn declare(
        &mut self,
        signature: HandlerSignature,
        handler: impl FnMut(&mut S, &mut dyn Any) + 'static,
    ) -> &mut Self {
        self.declarations.push(HandlerDeclaration {
            signature,
            callback: Box::new(handler),
        });
        self
    }
}

impl<S> fmt::Debug for HandlerSet<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.declarations.iter()).finish()
    }
}
