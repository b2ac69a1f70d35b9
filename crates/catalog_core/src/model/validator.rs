//! Rule-based field validation.
//!
//! # Responsibility
//! - Evaluate declarative per-field rules into a [`Notification`].
//! - Define the aggregate error raised when invalid state crosses a boundary.
//!
//! # Invariants
//! - Evaluation is pure: same fields and rules always yield the same messages.
//! - Every violated rule of every field is reported in one pass.
//! - Messages for one field keep rule declaration order.

use crate::model::notification::{FieldErrors, Notification};
use serde_json::Value;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Loosely typed view of one field value as seen by the rule engine.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldValue<'a> {
    /// Missing or explicit null.
    Absent,
    Text(&'a str),
    Bool(bool),
    Number(f64),
    /// Arrays, objects and anything else without a dedicated rule.
    Other,
}

impl FieldValue<'_> {
    fn is_absent(self) -> bool {
        matches!(self, Self::Absent)
    }
}

impl<'a> From<&'a Value> for FieldValue<'a> {
    fn from(value: &'a Value) -> Self {
        match value {
            Value::Null => Self::Absent,
            Value::String(text) => Self::Text(text),
            Value::Bool(flag) => Self::Bool(*flag),
            Value::Number(number) => number.as_f64().map_or(Self::Other, Self::Number),
            Value::Array(_) | Value::Object(_) => Self::Other,
        }
    }
}

impl<'a> From<Option<&'a str>> for FieldValue<'a> {
    fn from(value: Option<&'a str>) -> Self {
        value.map_or(Self::Absent, Self::Text)
    }
}

/// One constraint applied to a named field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    /// Skips every other rule of the field when the value is absent.
    Optional,
    /// Rejects absent values and empty text.
    NotEmpty,
    IsString,
    IsBoolean,
    /// Maximum length in characters; non-text values always violate it.
    MaxLength(usize),
}

impl Rule {
    fn check(self, field: &str, value: FieldValue<'_>) -> Option<String> {
        let valid = match self {
            Self::Optional => true,
            Self::NotEmpty => !matches!(value, FieldValue::Absent | FieldValue::Text("")),
            Self::IsString => matches!(value, FieldValue::Text(_)),
            Self::IsBoolean => matches!(value, FieldValue::Bool(_)),
            Self::MaxLength(max) => {
                matches!(value, FieldValue::Text(text) if text.chars().count() <= max)
            }
        };
        if valid {
            return None;
        }

        Some(match self {
            Self::Optional => return None,
            Self::NotEmpty => format!("{field} should not be empty"),
            Self::IsString => format!("{field} should be a string"),
            Self::IsBoolean => format!("{field} should be a boolean"),
            Self::MaxLength(max) => {
                format!("{field} must be shorter than or equal to {max} characters")
            }
        })
    }
}

/// Rules declared for one field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldRules {
    pub field: &'static str,
    pub rules: Vec<Rule>,
}

/// Ordered rule declarations for an entity type.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleSet {
    fields: Vec<FieldRules>,
}

impl RuleSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares rules for `field`, evaluated in the given order.
    pub fn field(mut self, field: &'static str, rules: &[Rule]) -> Self {
        self.fields.push(FieldRules {
            field,
            rules: rules.to_vec(),
        });
        self
    }

    pub fn fields(&self) -> &[FieldRules] {
        &self.fields
    }
}

/// Evaluates `rules` against named field values.
///
/// `only` restricts evaluation to the listed fields; `None` evaluates all.
/// Fields without a value in `values` are treated as absent.
pub fn validate(
    values: &[(&str, FieldValue<'_>)],
    rules: &RuleSet,
    only: Option<&[&str]>,
) -> Notification {
    let mut notification = Notification::new();
    validate_into(&mut notification, values, rules, only);
    notification
}

/// Same as [`validate`] but writes into an existing notification.
///
/// Returns `true` when no rule was violated by this pass.
pub fn validate_into(
    notification: &mut Notification,
    values: &[(&str, FieldValue<'_>)],
    rules: &RuleSet,
    only: Option<&[&str]>,
) -> bool {
    let mut valid = true;
    for declared in rules.fields() {
        if only.is_some_and(|selected| !selected.contains(&declared.field)) {
            continue;
        }

        let value = values
            .iter()
            .find(|(name, _)| *name == declared.field)
            .map_or(FieldValue::Absent, |(_, value)| *value);

        if value.is_absent() && declared.rules.contains(&Rule::Optional) {
            continue;
        }

        for rule in &declared.rules {
            if let Some(message) = rule.check(declared.field, value) {
                notification.add_error(message, Some(declared.field));
                valid = false;
            }
        }
    }
    valid
}

/// Per-entity-type rule evaluator.
pub trait Validator<T> {
    /// Validates `subject`, writing violations into `notification`.
    ///
    /// Returns `true` when `subject` satisfies every evaluated rule.
    fn validate(&self, notification: &mut Notification, subject: &T, fields: Option<&[&str]>)
        -> bool;
}

/// Aggregate validation failure carrying every field message of one pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityValidationError {
    pub errors: FieldErrors,
    message: String,
}

impl EntityValidationError {
    pub fn new(errors: FieldErrors) -> Self {
        Self {
            errors,
            message: "Validation error".to_string(),
        }
    }

    /// Builds an error from a notification; `None` when it holds no errors.
    pub fn from_notification(notification: &Notification) -> Option<Self> {
        notification
            .has_errors()
            .then(|| Self::new(notification.field_errors()))
    }

    /// Number of fields with at least one error.
    pub fn count(&self) -> usize {
        self.errors.len()
    }
}

impl Display for EntityValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)?;
        for (field, messages) in &self.errors {
            write!(f, "; {field}: {}", messages.join(", "))?;
        }
        Ok(())
    }
}

impl Error for EntityValidationError {}

#[cfg(test)]
mod tests {
    use super::{validate, EntityValidationError, FieldValue, Rule, RuleSet};
    use serde_json::json;

    fn name_rules() -> RuleSet {
        RuleSet::new()
            .field("name", &[Rule::NotEmpty, Rule::IsString, Rule::MaxLength(255)])
            .field("description", &[Rule::Optional, Rule::IsString])
            .field("active", &[Rule::Optional, Rule::IsBoolean])
    }

    #[test]
    fn absent_required_field_reports_every_violation() {
        let notification = validate(&[("name", FieldValue::Absent)], &name_rules(), None);
        assert_eq!(
            notification.errors_for("name").unwrap(),
            [
                "name should not be empty",
                "name should be a string",
                "name must be shorter than or equal to 255 characters",
            ]
        );
    }

    #[test]
    fn too_long_name_reports_only_max_length() {
        let long = "j".repeat(256);
        let notification = validate(&[("name", FieldValue::Text(&long))], &name_rules(), None);
        assert_eq!(
            notification.errors_for("name").unwrap(),
            ["name must be shorter than or equal to 255 characters"]
        );
    }

    #[test]
    fn max_length_counts_characters_not_bytes() {
        let accented = "á".repeat(255);
        let notification =
            validate(&[("name", FieldValue::Text(&accented))], &name_rules(), None);
        assert!(!notification.has_errors());
    }

    #[test]
    fn type_conformance_is_checked_on_raw_values() {
        let description = json!(7);
        let active = json!("");
        let notification = validate(
            &[
                ("name", FieldValue::Text("Movie")),
                ("description", FieldValue::from(&description)),
                ("active", FieldValue::from(&active)),
            ],
            &name_rules(),
            None,
        );

        assert_eq!(
            notification.errors_for("description").unwrap(),
            ["description should be a string"]
        );
        assert_eq!(
            notification.errors_for("active").unwrap(),
            ["active should be a boolean"]
        );
        assert!(notification.errors_for("name").is_none());
    }

    #[test]
    fn optional_fields_accept_absence() {
        let notification = validate(&[("name", FieldValue::Text("Movie"))], &name_rules(), None);
        assert!(!notification.has_errors());
    }

    #[test]
    fn field_selection_limits_evaluation() {
        let description = json!(7);
        let notification = validate(
            &[
                ("name", FieldValue::Text("")),
                ("description", FieldValue::from(&description)),
            ],
            &name_rules(),
            Some(&["name"][..]),
        );
        assert_eq!(notification.len(), 1);
        assert_eq!(
            notification.errors_for("name").unwrap(),
            ["name should not be empty"]
        );
    }

    #[test]
    fn aggregate_error_counts_fields() {
        let notification = validate(
            &[("name", FieldValue::Absent), ("active", FieldValue::Number(1.0))],
            &name_rules(),
            None,
        );
        let err = EntityValidationError::from_notification(&notification).unwrap();
        assert_eq!(err.count(), 2);
        assert!(err.to_string().starts_with("Validation error"));
        assert_eq!(err.errors["active"], vec!["active should be a boolean"]);
    }

    #[test]
    fn no_aggregate_error_for_clean_notification() {
        let notification = validate(&[("name", FieldValue::Text("ok"))], &name_rules(), None);
        assert!(EntityValidationError::from_notification(&notification).is_none());
    }
}
