//! Category use-case service.
//!
//! # Responsibility
//! - Provide create/get/list/update/delete entry points for categories.
//! - Map entities to flat output DTOs.
//!
//! # Invariants
//! - Identifiers arriving as text are parsed before touching the repository.
//! - Service APIs never bypass repository validation contracts.
//! - Service layer remains storage-agnostic.

use crate::model::category::{Category, CategoryCreateCommand};
use crate::model::id::{EntityId, InvalidIdentifierError};
use crate::model::validator::EntityValidationError;
use crate::repo::{CategoryRepository, NotFoundError, RepoError, Repository, SearchableRepository};
use crate::search::params::{SearchInput, SearchParams};
use crate::search::result::PaginationOutput;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Use-case level error.
#[derive(Debug)]
pub enum ServiceError {
    InvalidId(InvalidIdentifierError),
    Validation(EntityValidationError),
    NotFound(NotFoundError),
    /// Storage failures other than validation and not-found.
    Repo(RepoError),
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidId(err) => write!(f, "{err}"),
            Self::Validation(err) => write!(f, "{err}"),
            Self::NotFound(err) => write!(f, "{err}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidId(err) => Some(err),
            Self::Validation(err) => Some(err),
            Self::NotFound(err) => Some(err),
            Self::Repo(err) => Some(err),
        }
    }
}

impl From<InvalidIdentifierError> for ServiceError {
    fn from(value: InvalidIdentifierError) -> Self {
        Self::InvalidId(value)
    }
}

impl From<RepoError> for ServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::Validation(err) => Self::Validation(err),
            RepoError::NotFound(err) => Self::NotFound(err),
            other => Self::Repo(other),
        }
    }
}

/// Flat category projection returned by every use-case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryOutput {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub active: bool,
    /// Epoch milliseconds.
    pub created_at: i64,
}

impl From<&Category> for CategoryOutput {
    fn from(value: &Category) -> Self {
        Self {
            id: value.id().to_string(),
            name: value.name().to_string(),
            description: value.description().map(str::to_string),
            active: value.is_active(),
            created_at: value.created_at(),
        }
    }
}

/// Request model for creating a category.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CreateCategoryInput {
    pub name: String,
    pub description: Option<String>,
    pub active: Option<bool>,
}

/// Request model for a partial category update.
///
/// Absent fields keep their stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct UpdateCategoryInput {
    pub id: String,
    pub name: Option<String>,
    pub description: Option<String>,
    pub active: Option<bool>,
}

/// Use-case service wrapper for category operations.
pub struct CategoryService<R: CategoryRepository> {
    repo: R,
}

impl<R: CategoryRepository> CategoryService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub fn repo(&self) -> &R {
        &self.repo
    }

    pub fn into_repo(self) -> R {
        self.repo
    }

    /// Creates and stores a new category.
    ///
    /// Invalid input is rejected by the repository as `Validation`.
    pub fn create(&mut self, input: CreateCategoryInput) -> ServiceResult<CategoryOutput> {
        let category = Category::create(CategoryCreateCommand {
            name: input.name,
            description: input.description,
            active: input.active,
        });
        let output = CategoryOutput::from(&category);
        self.repo.insert(category)?;
        Ok(output)
    }

    /// Gets one category by textual id.
    pub fn get(&self, id: &str) -> ServiceResult<CategoryOutput> {
        let id = EntityId::parse(id)?;
        let category = self.repo.get_by_id(&id)?;
        Ok(CategoryOutput::from(&category))
    }

    /// Lists categories using raw paging/sort/filter input.
    pub fn list(&self, input: &SearchInput) -> ServiceResult<PaginationOutput<CategoryOutput>> {
        let params = SearchParams::new(input);
        let result = self.repo.search(&params)?;
        Ok(PaginationOutput::from_result(result, |category| {
            CategoryOutput::from(&category)
        }))
    }

    /// Applies a partial update and stores the result.
    pub fn update(&mut self, input: UpdateCategoryInput) -> ServiceResult<CategoryOutput> {
        let id = EntityId::parse(&input.id)?;
        let mut category = self.repo.get_by_id(&id)?;

        if let Some(name) = input.name {
            category.change_name(name);
        }
        if let Some(description) = input.description {
            category.change_description(Some(description));
        }
        match input.active {
            Some(true) => category.activate(),
            Some(false) => category.deactivate(),
            None => {}
        }

        let output = CategoryOutput::from(&category);
        self.repo.update(category)?;
        Ok(output)
    }

    /// Deletes one category by textual id.
    pub fn delete(&mut self, id: &str) -> ServiceResult<()> {
        let id = EntityId::parse(id)?;
        self.repo.delete(&id)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{CategoryOutput, ServiceError};
    use crate::model::category::{Category, CategoryProps};
    use crate::model::id::EntityId;
    use crate::repo::{NotFoundError, RepoError};
    use serde_json::json;

    #[test]
    fn output_serializes_camel_case() {
        let category = Category::new(CategoryProps {
            id: Some(EntityId::parse("9366b7dc-2d71-4799-b91c-c64adb205104").unwrap()),
            name: "Movie".to_string(),
            description: Some("some description".to_string()),
            active: Some(true),
            created_at: Some(1_000),
        });

        assert_eq!(
            serde_json::to_value(CategoryOutput::from(&category)).unwrap(),
            json!({
                "id": "9366b7dc-2d71-4799-b91c-c64adb205104",
                "name": "Movie",
                "description": "some description",
                "active": true,
                "createdAt": 1000
            })
        );
    }

    #[test]
    fn repo_errors_split_into_service_kinds() {
        let not_found = RepoError::from(NotFoundError::new("Category", vec!["x".to_string()]));
        assert!(matches!(
            ServiceError::from(not_found),
            ServiceError::NotFound(_)
        ));

        let invalid = RepoError::InvalidData("bad row".to_string());
        assert!(matches!(ServiceError::from(invalid), ServiceError::Repo(_)));
    }
}
