//! Category domain entity.
//!
//! # Responsibility
//! - Hold category state and its lifecycle operations.
//! - Re-validate on every change of a validated field.
//!
//! # Invariants
//! - Validation never fails a call; violations land in the owned
//!   notification (soft policy). Repositories refuse to persist an instance
//!   whose notification has errors.
//! - `created_at` is epoch milliseconds and never changes after construction.

use crate::model::entity::Entity;
use crate::model::id::EntityId;
use crate::model::notification::Notification;
use crate::model::validator::{validate_into, FieldValue, Rule, RuleSet, Validator};
use once_cell::sync::Lazy;
use serde::Serialize;
use std::time::{SystemTime, UNIX_EPOCH};

/// Maximum category name length, in characters.
pub const CATEGORY_NAME_MAX_CHARS: usize = 255;

static CATEGORY_RULES: Lazy<RuleSet> = Lazy::new(|| {
    RuleSet::new()
        .field(
            "name",
            &[
                Rule::NotEmpty,
                Rule::IsString,
                Rule::MaxLength(CATEGORY_NAME_MAX_CHARS),
            ],
        )
        .field("description", &[Rule::Optional, Rule::IsString])
        .field("active", &[Rule::Optional, Rule::IsBoolean])
});

/// Full constructor input, used by rehydration and import paths.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryProps {
    pub id: Option<EntityId>,
    pub name: String,
    pub description: Option<String>,
    pub active: Option<bool>,
    /// Epoch milliseconds; defaults to now.
    pub created_at: Option<i64>,
}

/// Creation input for brand-new categories.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryCreateCommand {
    pub name: String,
    pub description: Option<String>,
    pub active: Option<bool>,
}

/// Catalog category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    id: EntityId,
    name: String,
    description: Option<String>,
    active: bool,
    created_at: i64,
    #[serde(skip)]
    notification: Notification,
}

impl Category {
    /// Builds a category from full props and validates every field.
    pub fn new(props: CategoryProps) -> Self {
        let mut category = Self {
            id: props.id.unwrap_or_default(),
            name: props.name,
            description: props.description,
            active: props.active.unwrap_or(true),
            created_at: props.created_at.unwrap_or_else(now_epoch_ms),
            notification: Notification::new(),
        };
        category.validate(None);
        category
    }

    /// Creates a brand-new category with a generated id.
    pub fn create(command: CategoryCreateCommand) -> Self {
        Self::new(CategoryProps {
            id: None,
            name: command.name,
            description: command.description,
            active: command.active,
            created_at: None,
        })
    }

    pub fn id(&self) -> &EntityId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn created_at(&self) -> i64 {
        self.created_at
    }

    pub fn change_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
        self.validate(Some(&["name"][..]));
    }

    pub fn change_description(&mut self, description: Option<String>) {
        self.description = description;
        self.validate(Some(&["description"][..]));
    }

    /// Replaces name and description together.
    pub fn update(&mut self, name: impl Into<String>, description: Option<String>) {
        self.name = name.into();
        self.description = description;
        self.validate(Some(&["name", "description"][..]));
    }

    pub fn activate(&mut self) {
        self.active = true;
    }

    pub fn deactivate(&mut self) {
        self.active = false;
    }

    /// Runs the category rules into the owned notification.
    ///
    /// Returns `true` when this pass found no violation.
    pub fn validate(&mut self, fields: Option<&[&str]>) -> bool {
        let mut notification = std::mem::take(&mut self.notification);
        let valid = CategoryValidator.validate(&mut notification, self, fields);
        self.notification = notification;
        valid
    }
}

impl Entity for Category {
    type Id = EntityId;

    const NAME: &'static str = "Category";

    fn entity_id(&self) -> &EntityId {
        &self.id
    }

    fn notification(&self) -> &Notification {
        &self.notification
    }
}

/// Category rule evaluator.
#[derive(Debug, Clone, Copy, Default)]
pub struct CategoryValidator;

impl CategoryValidator {
    pub fn rules() -> &'static RuleSet {
        &CATEGORY_RULES
    }
}

impl Validator<Category> for CategoryValidator {
    fn validate(
        &self,
        notification: &mut Notification,
        subject: &Category,
        fields: Option<&[&str]>,
    ) -> bool {
        let values = [
            ("name", FieldValue::Text(subject.name.as_str())),
            ("description", FieldValue::from(subject.description.as_deref())),
            ("active", FieldValue::Bool(subject.active)),
        ];
        validate_into(notification, &values, &CATEGORY_RULES, fields)
    }
}

pub(crate) fn now_epoch_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| {
            i64::try_from(elapsed.as_millis()).unwrap_or(i64::MAX)
        })
}
