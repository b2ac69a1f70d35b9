//! Entity contract shared by every repository.

use crate::model::notification::Notification;
use crate::model::validator::EntityValidationError;
use crate::model::value_object::ValueObject;
use std::fmt::Display;

/// Identity-bearing domain object with mutable state.
///
/// # Invariants
/// - Exactly one identity value object per instance.
/// - Mutations of validated fields re-validate into the owned notification
///   before returning.
pub trait Entity: Clone {
    type Id: ValueObject + Display;

    /// Type name used in not-found messages, e.g. `Category`.
    const NAME: &'static str;

    fn entity_id(&self) -> &Self::Id;

    /// Validation messages accumulated by this instance.
    fn notification(&self) -> &Notification;

    fn is_valid(&self) -> bool {
        !self.notification().has_errors()
    }

    /// Converts accumulated messages into the aggregate error.
    ///
    /// # Errors
    /// - Returns [`EntityValidationError`] when the notification holds errors.
    fn ensure_valid(&self) -> Result<(), EntityValidationError> {
        match EntityValidationError::from_notification(self.notification()) {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}
