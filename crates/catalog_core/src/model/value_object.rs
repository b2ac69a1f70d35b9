//! Value object contract.
//!
//! # Responsibility
//! - Mark immutable, structurally comparable domain values.
//! - Provide absence-aware equality for call sites holding optional values.
//!
//! # Invariants
//! - Equality is field-by-field (`PartialEq`), never by reference.
//! - An absent value never equals a present one.

use std::fmt::Debug;

/// Immutable domain value compared by structure.
///
/// Implementors derive `PartialEq`/`Eq` alongside construction, so two values
/// of the same concrete type are equal iff all of their fields are equal.
/// Values of different concrete types cannot be compared at all.
pub trait ValueObject: Clone + Debug + PartialEq + Eq {
    /// Compares against a possibly absent value.
    ///
    /// Returns `false` when `other` is `None`.
    fn equals(&self, other: Option<&Self>) -> bool {
        other.is_some_and(|value| self == value)
    }
}
