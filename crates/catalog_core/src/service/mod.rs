//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into use-case level APIs.
//! - Keep transport adapters decoupled from storage details.

pub mod category_service;

pub use category_service::{
    CategoryOutput, CategoryService, CreateCategoryInput, ServiceError, ServiceResult,
    UpdateCategoryInput,
};
