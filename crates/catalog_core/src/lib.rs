//! Core domain logic for the catalog.
//! Searchable repositories, entity validation and the category use-cases.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod search;
pub mod service;
#[cfg(any(test, feature = "test-support"))]
pub mod testing;

pub use config::{ConfigError, CoreConfig};
pub use db::{open_db, open_db_in_memory, DbError, DbResult};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::category::{Category, CategoryCreateCommand, CategoryProps, CategoryValidator};
pub use model::entity::Entity;
pub use model::id::{EntityId, InvalidIdentifierError};
pub use model::notification::{FieldErrors, Notification};
pub use model::validator::{EntityValidationError, Validator};
pub use model::value_object::ValueObject;
pub use repo::{
    CategoryInMemoryRepository, CategoryRepository, CategorySearch, InMemoryRepository,
    NotFoundError, RepoError, RepoResult, Repository, SearchableRepository,
    SqliteCategoryRepository,
};
pub use search::{
    PaginationOutput, SearchFilter, SearchInput, SearchParams, SearchResult, SearchSpec,
    SortDirection, SortKey,
};
pub use service::{
    CategoryOutput, CategoryService, CreateCategoryInput, ServiceError, ServiceResult,
    UpdateCategoryInput,
};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
