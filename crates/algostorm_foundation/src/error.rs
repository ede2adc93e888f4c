//! Error types for Algostorm.
//!
//! Every error is a local contract violation detected eagerly by the
//! operation that fails. Uses `thiserror` for the error definitions.

use std::fmt;

use thiserror::Error;

use crate::entity::EntityId;

/// Convenience alias for results carrying an [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for Algostorm operations.
#[derive(Debug, Error)]
#[error("{kind}")]
pub struct Error {
    /// The kind of error that occurred.
    pub kind: ErrorKind,
    /// Optional description of the operation that failed.
    pub context: Option<String>,
}

impl Error {
    /// Creates a new error with the given kind.
    #[must_use]
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            context: None,
        }
    }

    /// Adds context to this error.
    #[must_use]
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    /// Creates a capacity exhausted error.
    #[must_use]
    pub fn capacity_exhausted(capacity: u32) -> Self {
        Self::new(ErrorKind::CapacityExhausted { capacity })
    }

    /// Creates a duplicate entity error.
    #[must_use]
    pub fn duplicate_entity(id: EntityId) -> Self {
        Self::new(ErrorKind::DuplicateEntity(id))
    }

    /// Creates an invalid entity id error.
    #[must_use]
    pub fn invalid_entity_id(id: EntityId, max_id: u32) -> Self {
        Self::new(ErrorKind::InvalidEntityId { id, max_id })
    }

    /// Creates a duplicate component error.
    #[must_use]
    pub fn duplicate_component(component: &'static str) -> Self {
        Self::new(ErrorKind::DuplicateComponent(component))
    }

    /// Creates an unknown group error.
    #[must_use]
    pub fn unknown_group(group: u32) -> Self {
        Self::new(ErrorKind::UnknownGroup(group))
    }

    /// Creates an invalid handler error.
    #[must_use]
    pub fn invalid_handler(handler: impl Into<String>, rule: HandlerRule) -> Self {
        Self::new(ErrorKind::InvalidHandler {
            handler: handler.into(),
            rule,
        })
    }

    /// Creates a request not completed error.
    #[must_use]
    pub fn request_not_completed(request: &'static str) -> Self {
        Self::new(ErrorKind::RequestNotCompleted(request))
    }

    /// Creates a request already completed error.
    #[must_use]
    pub fn request_already_completed(request: &'static str) -> Self {
        Self::new(ErrorKind::RequestAlreadyCompleted(request))
    }

    /// Creates a semantic limit exceeded error.
    #[must_use]
    pub fn limit_exceeded(limit: SemanticLimit) -> Self {
        Self::new(ErrorKind::LimitExceeded(limit))
    }
}

/// Categorized error kinds for pattern matching.
#[derive(Debug, Error)]
pub enum ErrorKind {
    /// Every id of the pool's id space is in use.
    #[error("too many entities: all {capacity} ids are in use")]
    CapacityExhausted {
        /// Size of the id space.
        capacity: u32,
    },

    /// An entity with the requested id is already live.
    #[error("entity id already in use: {0}")]
    DuplicateEntity(EntityId),

    /// The requested id lies outside the pool's id space.
    #[error("entity id {id:?} outside of 1..={max_id}")]
    InvalidEntityId {
        /// The rejected id.
        id: EntityId,
        /// Largest id of the pool's id space.
        max_id: u32,
    },

    /// Two components of the same concrete type were given for one entity.
    #[error("duplicate component of type {0}")]
    DuplicateComponent(&'static str),

    /// The referenced entity group is not registered with the pool.
    #[error("unknown entity group: {0}")]
    UnknownGroup(u32),

    /// A subscriber declared a handler violating the handler contract.
    #[error("invalid handler {handler}: {rule}")]
    InvalidHandler {
        /// Name of the offending handler.
        handler: String,
        /// The violated rule.
        rule: HandlerRule,
    },

    /// A request was read before any handler completed it.
    #[error("request {0} was not completed")]
    RequestNotCompleted(&'static str),

    /// A request was completed more than once.
    #[error("request {0} was completed more than once")]
    RequestAlreadyCompleted(&'static str),

    /// Semantic limit exceeded (kill switch triggered).
    #[error("limit exceeded: {0}")]
    LimitExceeded(SemanticLimit),
}

/// Rules every considered event handler must satisfy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandlerRule {
    /// The handler must receive exactly one parameter.
    SingleParameter,
    /// The parameter must be an event or a request.
    MessageParameter,
    /// The parameter type must be concrete (not generic or open).
    ConcreteParameter,
    /// The handler itself must not be generic.
    NotGeneric,
    /// The handler must not be overridable.
    NotOverridable,
    /// The handler must not return a value.
    ReturnsUnit,
}

impl fmt::Display for HandlerRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let message = match self {
            Self::SingleParameter => "doesn't receive a single parameter",
            Self::MessageParameter => "doesn't receive an event or request as parameter",
            Self::ConcreteParameter => "receives a generic parameter",
            Self::NotGeneric => "is a generic handler",
            Self::NotOverridable => "is overridable",
            Self::ReturnsUnit => "doesn't return unit",
        };
        f.write_str(message)
    }
}

/// Semantic limits (kill switches) that can be exceeded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SemanticLimit {
    /// Maximum events delivered by a single flush exceeded.
    MaxFlushEvents {
        /// The configured limit.
        limit: usize,
        /// Events still queued when the flush stopped.
        pending: usize,
    },
}

impl fmt::Display for SemanticLimit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MaxFlushEvents { limit, pending } => {
                write!(
                    f,
                    "max events per flush ({limit}) exceeded, {pending} still pending"
                )
            }
        }
    }
}
