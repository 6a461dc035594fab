//! Documents and class labels.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::SmsBayesError;

/// Class label of a message.
///
/// Variants are declared in the same order as the nominal values of the
/// `label` attribute. That order is also the tie-break order for prediction,
/// so `Spam` wins a tie.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Label {
    Spam,
    Ham,
}

impl Label {
    /// All labels in declared order.
    pub const ALL: [Label; 2] = [Label::Spam, Label::Ham];

    /// Number of declared labels.
    pub const COUNT: usize = Self::ALL.len();

    /// Index of this label in declared order.
    pub fn index(self) -> usize {
        match self {
            Label::Spam => 0,
            Label::Ham => 1,
        }
    }

    /// Label at `index` in declared order.
    pub fn from_index(index: usize) -> Option<Label> {
        Self::ALL.get(index).copied()
    }

    /// Nominal value as written in datasets.
    pub fn as_str(self) -> &'static str {
        match self {
            Label::Spam => "spam",
            Label::Ham => "ham",
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Label {
    type Err = SmsBayesError;

    /// Nominal values are matched exactly, as declared.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Label::ALL
            .into_iter()
            .find(|label| label.as_str() == s)
            .ok_or_else(|| {
                SmsBayesError::invalid_argument(format!(
                    "Unknown label '{s}', expected one of: spam, ham"
                ))
            })
    }
}

/// A single labelled message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    /// Class label
    pub label: Label,
    /// Message text
    pub text: String,
}

impl Document {
    /// Create a new document.
    pub fn new<S: Into<String>>(label: Label, text: S) -> Self {
        Document {
            label,
            text: text.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_order_and_index() {
        assert_eq!(Label::ALL, [Label::Spam, Label::Ham]);
        assert_eq!(Label::Spam.index(), 0);
        assert_eq!(Label::Ham.index(), 1);
        assert_eq!(Label::from_index(1), Some(Label::Ham));
        assert_eq!(Label::from_index(2), None);
        assert!(Label::Spam < Label::Ham);
    }

    #[test]
    fn test_label_parse() {
        assert_eq!("spam".parse::<Label>().unwrap(), Label::Spam);
        assert_eq!("ham".parse::<Label>().unwrap(), Label::Ham);
        assert!("Spam".parse::<Label>().is_err());
        assert!("eggs".parse::<Label>().is_err());
        assert_eq!(Label::Ham.to_string(), "ham");
    }

    #[test]
    fn test_label_serde() {
        let json = serde_json::to_string(&Label::Spam).unwrap();
        assert_eq!(json, "\"spam\"");
        let label: Label = serde_json::from_str("\"ham\"").unwrap();
        assert_eq!(label, Label::Ham);
    }
}
