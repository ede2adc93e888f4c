//! Single-completion result slots.

use algostorm_foundation::{Error, Result};
use tracing::warn;

/// The result slot of a request.
///
/// A request is completed at most once and read any number of times after.
/// Reading before completion fails, and so does every read after a second
/// completion attempt, since the answer is then ambiguous.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request<T> {
    value: Option<T>,
    completions: u32,
}

impl<T> Default for Request<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Request<T> {
    /// Creates an uncompleted request.
    #[must_use]
    pub fn new() -> Self {
        Self {
            value: None,
            completions: 0,
        }
    }

    /// Returns true once the request has been completed.
    #[must_use]
    pub fn is_completed(&self) -> bool {
        self.completions > 0
    }

    /// Completes the request with `value`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request was already completed. The first value
    /// is kept, but the request can no longer be read.
    pub fn complete(&mut self, value: T) -> Result<()> {
        self.completions = self.completions.saturating_add(1);
        if self.value.is_some() {
            warn!(
                request = std::any::type_name::<Self>(),
                completions = self.completions,
                "request completed more than once"
            );
            return Err(Error::request_already_completed(std::any::type_name::<Self>()));
        }
        self.value = Some(value);
        Ok(())
    }

    /// Reads the completed value.
    ///
    /// # Errors
    ///
    /// Returns an error if the request was not completed, or was completed
    /// more than once.
    pub fn get(&self) -> Result<&T> {
        if self.completions > 1 {
            return Err(Error::request_already_completed(std::any::type_name::<Self>()));
        }
        self.value
            .as_ref()
            .ok_or_else(|| Error::request_not_completed(std::any::type_name::<Self>()))
    }

    /// Consumes the request, returning the completed value.
    ///
    /// # Errors
    ///
    /// Same as [`Request::get`].
    pub fn into_value(self) -> Result<T> {
        self.get()?;
        self.value
            .ok_or_else(|| Error::request_not_completed(std::any::type_name::<Self>()))
    }
}
