//! Selectors and updates over the persisted JSON form of a document.

use std::fmt;

use serde_json::{Map, Value};

use super::ID_FIELD;

/// Conjunction of field-equality clauses.
///
/// The empty selector matches every document in a collection.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Selector {
    clauses: Vec<(String, Value)>,
}

impl Selector {
    /// Selector matching every document.
    pub fn all() -> Self {
        Self::default()
    }

    /// Selector on the `_id` key.
    pub fn id(id: impl Into<String>) -> Self {
        Self::field(ID_FIELD, Value::String(id.into()))
    }

    /// Selector on a single field.
    pub fn field(name: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::all().and(name, value)
    }

    /// Add another clause; all clauses must match.
    pub fn and(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.clauses.push((name.into(), value.into()));
        self
    }

    /// Returns the `_id` this selector pins, if any.
    pub fn id_clause(&self) -> Option<&str> {
        self.clauses
            .iter()
            .find(|(name, _)| name == ID_FIELD)
            .and_then(|(_, value)| value.as_str())
    }

    /// Whether `doc` satisfies every clause.
    pub fn matches(&self, doc: &Value) -> bool {
        self.clauses
            .iter()
            .all(|(name, value)| doc.get(name) == Some(value))
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, (name, value)) in self.clauses.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}: {}", name, value)?;
        }
        f.write_str("}")
    }
}

/// `$set`-style mutation applied to one matched document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Update {
    set: Vec<(String, Value)>,
}

impl Update {
    /// Update setting a single field.
    pub fn set(name: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::default().and_set(name, value)
    }

    /// Set another field in the same update.
    pub fn and_set(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set.push((name.into(), value.into()));
        self
    }

    /// Apply the assignments to `doc` in place.
    ///
    /// Fails without touching `doc` when it is not an object or when the
    /// update tries to rewrite `_id`.
    pub fn apply(&self, doc: &mut Map<String, Value>) -> Result<(), String> {
        if self.set.iter().any(|(name, _)| name == ID_FIELD) {
            return Err("cannot modify _id".to_string());
        }
        for (name, value) in &self.set {
            doc.insert(name.clone(), value.clone());
        }
        Ok(())
    }
}
