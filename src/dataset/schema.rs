//! Attribute schema shared by every dataset.
//!
//! The schema mirrors an ARFF header: an ordered list of attributes plus the
//! index of the class attribute. Training, test and prediction data all use
//! [`Schema::sms`], which keeps their feature spaces compatible.

use serde::{Deserialize, Serialize};

use crate::dataset::document::Label;
use crate::error::{Result, SmsBayesError};

/// Name of the class attribute.
pub const LABEL_ATTRIBUTE: &str = "label";

/// Name of the free-text attribute.
pub const TEXT_ATTRIBUTE: &str = "text";

/// Type of an attribute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AttributeKind {
    /// Enumerated values, in declared order.
    Nominal(Vec<String>),
    /// Free text.
    String,
}

/// A named, typed column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attribute {
    pub name: String,
    pub kind: AttributeKind,
}

impl Attribute {
    /// Create a nominal attribute.
    pub fn nominal<S: Into<String>>(name: S, values: Vec<String>) -> Self {
        Attribute {
            name: name.into(),
            kind: AttributeKind::Nominal(values),
        }
    }

    /// Create a string attribute.
    pub fn string<S: Into<String>>(name: S) -> Self {
        Attribute {
            name: name.into(),
            kind: AttributeKind::String,
        }
    }
}

/// Ordered attribute declarations with a designated class attribute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schema {
    attributes: Vec<Attribute>,
    class_index: usize,
}

impl Schema {
    /// The message schema: `label {spam,ham}` (class) followed by `text string`.
    pub fn sms() -> Self {
        let label_values = Label::ALL
            .iter()
            .map(|label| label.as_str().to_string())
            .collect();

        Schema {
            attributes: vec![
                Attribute::nominal(LABEL_ATTRIBUTE, label_values),
                Attribute::string(TEXT_ATTRIBUTE),
            ],
            class_index: 0,
        }
    }

    /// Get all attributes in declared order.
    pub fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }

    /// Index of the class attribute.
    pub fn class_index(&self) -> usize {
        self.class_index
    }

    /// The class attribute.
    pub fn class_attribute(&self) -> &Attribute {
        &self.attributes[self.class_index]
    }

    /// Check that `declared` describes the same attributes as this schema.
    ///
    /// Names are compared case-insensitively, types and nominal values
    /// exactly.
    pub fn check_declared(&self, declared: &[Attribute]) -> Result<()> {
        if declared.len() != self.attributes.len() {
            return Err(SmsBayesError::format(format!(
                "Schema mismatch: expected {} attributes, found {}",
                self.attributes.len(),
                declared.len()
            )));
        }

        for (expected, found) in self.attributes.iter().zip(declared) {
            if !expected.name.eq_ignore_ascii_case(&found.name) {
                return Err(SmsBayesError::format(format!(
                    "Schema mismatch: expected attribute '{}', found '{}'",
                    expected.name, found.name
                )));
            }
            if expected.kind != found.kind {
                return Err(SmsBayesError::format(format!(
                    "Schema mismatch: attribute '{}' declared as {:?}, expected {:?}",
                    found.name, found.kind, expected.kind
                )));
            }
        }

        Ok(())
    }
}

impl Default for Schema {
    fn default() -> Self {
        Self::sms()
    }
}
