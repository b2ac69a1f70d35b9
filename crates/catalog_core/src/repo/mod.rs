//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the entity-agnostic persistence and search contracts.
//! - Provide the generic in-memory store and the Category stores.
//!
//! # Invariants
//! - Write paths (`insert`, `bulk_insert`, `update`) reject entities whose
//!   notification holds errors.
//! - `update`/`delete` of an unknown identity fail with `NotFound`, a kind
//!   distinct from validation and storage failures.
//! - `search` reports `total` as the filtered count before pagination.

use crate::db::DbError;
use crate::model::entity::Entity;
use crate::model::validator::EntityValidationError;
use crate::search::params::{SearchFilter, SearchParams};
use crate::search::result::SearchResult;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod category_repo;
pub mod in_memory;

pub type RepoResult<T> = Result<T, RepoError>;

/// Lookup or mutation targeted identities that are not stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotFoundError {
    entity: &'static str,
    ids: Vec<String>,
}

impl NotFoundError {
    pub fn new(entity: &'static str, ids: Vec<String>) -> Self {
        Self { entity, ids }
    }

    /// Not-found error for one identity of entity type `E`.
    pub fn of<E: Entity>(id: &E::Id) -> Self {
        Self::new(E::NAME, vec![id.to_string()])
    }

    pub fn entity(&self) -> &str {
        self.entity
    }

    pub fn ids(&self) -> &[String] {
        &self.ids
    }
}

impl Display for NotFoundError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} not found for id {}", self.entity, self.ids.join(", "))
    }
}

impl Error for NotFoundError {}

/// Repository error for persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Validation(EntityValidationError),
    NotFound(NotFoundError),
    Db(DbError),
    /// Stored data that cannot be decoded into a valid entity.
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::NotFound(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::NotFound(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::InvalidData(_) => None,
        }
    }
}

impl From<EntityValidationError> for RepoError {
    fn from(value: EntityValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<NotFoundError> for RepoError {
    fn from(value: NotFoundError) -> Self {
        Self::NotFound(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Entity-typed persistence boundary.
pub trait Repository<E: Entity> {
    /// Appends one entity. Idempotency is the caller's responsibility.
    fn insert(&mut self, entity: E) -> RepoResult<()>;

    /// Appends many entities; nothing is stored if any of them is invalid.
    fn bulk_insert(&mut self, entities: Vec<E>) -> RepoResult<()>;

    /// Replaces the stored record sharing `entity`'s identity.
    fn update(&mut self, entity: E) -> RepoResult<()>;

    fn delete(&mut self, id: &E::Id) -> RepoResult<()>;

    /// Returns the matching entity, or `None` when absent.
    fn find_by_id(&self, id: &E::Id) -> RepoResult<Option<E>>;

    fn find_all(&self) -> RepoResult<Vec<E>>;

    /// Like [`Repository::find_by_id`] but treats absence as `NotFound`.
    fn get_by_id(&self, id: &E::Id) -> RepoResult<E> {
        self.find_by_id(id)?
            .ok_or_else(|| NotFoundError::of::<E>(id).into())
    }
}

/// Repository with the generic filter/sort/paginate query.
pub trait SearchableRepository<E: Entity>: Repository<E> {
    type Filter: SearchFilter;

    /// Field names eligible for generic sort, in declaration order.
    fn sortable_fields(&self) -> &[&'static str];

    fn search(&self, params: &SearchParams<Self::Filter>) -> RepoResult<SearchResult<E>>;
}

pub use category_repo::{
    CategoryInMemoryRepository, CategoryRepository, CategorySearch, SqliteCategoryRepository,
    CATEGORY_SORTABLE_FIELDS,
};
pub use in_memory::InMemoryRepository;
