//! Handler signature validation.
//!
//! Only public instance handlers are considered. Everything else is skipped
//! without error. A considered handler must be final, return unit, and take
//! exactly one concrete event or request parameter.

use algostorm_foundation::{Error, HandlerRule, Result};

use crate::message::MessageType;
use crate::subscriber::{HandlerSignature, ParameterType, Receiver, ReturnType, Visibility};

/// Outcome of validating one declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// The handler receives messages of this type.
    Accept(MessageType),
    /// The declaration is not a handler and is ignored.
    Skip,
}

/// Validates a handler declaration.
///
/// # Errors
///
/// Returns [`ErrorKind::InvalidHandler`](algostorm_foundation::ErrorKind::InvalidHandler)
/// naming the first rule the declaration breaks.
pub fn validate(signature: &HandlerSignature) -> Result<Verdict> {
    if signature.visibility != Visibility::Public || signature.receiver != Receiver::Instance {
        return Ok(Verdict::Skip);
    }

    let reject = |rule| Err(Error::invalid_handler(signature.name.clone(), rule));

    if signature.overridable {
        return reject(HandlerRule::NotOverridable);
    }
    if signature.returns != ReturnType::Unit {
        return reject(HandlerRule::ReturnsUnit);
    }
    let [parameter] = signature.parameters.as_slice() else {
        return reject(HandlerRule::SingleParameter);
    };
    if !parameter.is_message() {
        return reject(HandlerRule::MessageParameter);
    }
    if signature.type_parameters > 0 {
        return reject(HandlerRule::NotGeneric);
    }
    match parameter {
        ParameterType::Message(message) => Ok(Verdict::Accept(*message)),
        _ => reject(HandlerRule::ConcreteParameter),
    }
}
