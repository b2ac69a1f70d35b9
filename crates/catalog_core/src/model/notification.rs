//! Validation error accumulator.
//!
//! # Responsibility
//! - Collect validation messages per field without failing fast.
//! - Render collected messages in a stable, insertion-ordered shape.
//!
//! # Invariants
//! - Keys keep first-touch insertion order.
//! - A field never holds the same message twice via `add_error`.
//! - Field-less messages are keyed by themselves.
//! - `add_error` never drops a recorded message; only `set_error` and
//!   `copy_errors` replace what a key holds.

use crate::model::validator::EntityValidationError;
use serde::ser::SerializeSeq;
use serde::{Serialize, Serializer};
use serde_json::Value;
use std::collections::BTreeMap;

/// Field name -> ordered messages, as carried by validation errors.
pub type FieldErrors = BTreeMap<String, Vec<String>>;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Entry {
    /// Field-less message; the key is the message itself.
    Single(String),
    /// Messages reported for one named field.
    List(Vec<String>),
}

/// Error sink owned by an entity for the duration of its life.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Notification {
    entries: Vec<(String, Entry)>,
}

impl Notification {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one message.
    ///
    /// Without a field the message is its own key. With a field it is appended
    /// to that field's list unless the exact text is already present.
    pub fn add_error(&mut self, message: impl Into<String>, field: Option<&str>) {
        let message = message.into();
        let Some(field) = field else {
            let key = message.clone();
            self.put(key, Entry::Single(message));
            return;
        };

        let Some(index) = self.position(field) else {
            self.entries
                .push((field.to_string(), Entry::List(vec![message])));
            return;
        };

        let entry = &mut self.entries[index].1;
        match entry {
            Entry::List(messages) => {
                if !messages.contains(&message) {
                    messages.push(message);
                }
            }
            Entry::Single(previous) => {
                let mut messages = vec![std::mem::take(previous)];
                if messages[0] != message {
                    messages.push(message);
                }
                *entry = Entry::List(messages);
            }
        }
    }

    /// Replaces whatever is stored under the key.
    ///
    /// With a field, `messages` becomes that field's list. Without one, each
    /// message is stored under its own key.
    pub fn set_error(&mut self, messages: &[String], field: Option<&str>) {
        match field {
            Some(field) => self.put(field.to_string(), Entry::List(messages.to_vec())),
            None => {
                for message in messages {
                    self.put(message.clone(), Entry::Single(message.clone()));
                }
            }
        }
    }

    pub fn has_errors(&self) -> bool {
        !self.entries.is_empty()
    }

    /// Number of distinct keys carrying errors.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Merges every entry of `other` into `self`, overwriting shared keys.
    pub fn copy_errors(&mut self, other: &Notification) {
        for (key, entry) in &other.entries {
            match entry {
                Entry::Single(message) => self.set_error(std::slice::from_ref(message), None),
                Entry::List(messages) => self.set_error(messages, Some(key)),
            }
        }
    }

    /// Messages recorded for `field`, if any.
    pub fn errors_for(&self, field: &str) -> Option<&[String]> {
        self.position(field).and_then(|index| match &self.entries[index].1 {
            Entry::List(messages) => Some(messages.as_slice()),
            Entry::Single(_) => None,
        })
    }

    /// Field-keyed view; field-less messages are keyed by themselves.
    pub fn field_errors(&self) -> FieldErrors {
        self.entries
            .iter()
            .map(|(key, entry)| {
                let messages = match entry {
                    Entry::Single(message) => vec![message.clone()],
                    Entry::List(messages) => messages.clone(),
                };
                (key.clone(), messages)
            })
            .collect()
    }

    /// Turns accumulated errors into the aggregate validation error.
    ///
    /// # Errors
    /// - Returns [`EntityValidationError`] when any error was recorded.
    pub fn into_result(self) -> Result<(), EntityValidationError> {
        match EntityValidationError::from_notification(&self) {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    /// Ordered JSON rendering: bare strings and `{field: [messages]}` objects.
    pub fn to_json(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }

    fn position(&self, key: &str) -> Option<usize> {
        self.entries.iter().position(|(existing, _)| existing == key)
    }

    fn put(&mut self, key: String, entry: Entry) {
        match self.position(&key) {
            Some(index) => self.entries[index].1 = entry,
            None => self.entries.push((key, entry)),
        }
    }
}

impl Serialize for Notification {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.entries.len()))?;
        for (key, entry) in &self.entries {
            match entry {
                Entry::Single(message) => seq.serialize_element(message)?,
                Entry::List(messages) => {
                    let mut object = BTreeMap::new();
                    object.insert(key.as_str(), messages);
                    seq.serialize_element(&object)?;
                }
            }
        }
        seq.end()
    }
}
