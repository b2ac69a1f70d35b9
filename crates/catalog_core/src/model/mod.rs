//! Domain model: identities, entities and validation.
//!
//! # Responsibility
//! - Define the entity and value-object contracts used by repositories.
//! - Own the notification/validator model every entity relies on.
//!
//! # Invariants
//! - Every entity is identified by a validated `EntityId`.
//! - Validation aggregates all violations of a pass; it never fails fast.

pub mod category;
pub mod entity;
pub mod id;
pub mod notification;
pub mod validator;
pub mod value_object;
