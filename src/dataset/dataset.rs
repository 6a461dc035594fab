//! In-memory dataset.

use serde::{Deserialize, Serialize};

use crate::dataset::document::{Document, Label};
use crate::dataset::schema::Schema;

/// Relation name used for message datasets.
pub const DEFAULT_RELATION: &str = "SMS spam";

/// An ordered collection of labelled documents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dataset {
    relation: String,
    schema: Schema,
    documents: Vec<Document>,
}

impl Dataset {
    /// Create an empty dataset with the default relation name.
    pub fn new() -> Self {
        Self::with_relation(DEFAULT_RELATION)
    }

    /// Create an empty dataset with a custom relation name.
    pub fn with_relation<S: Into<String>>(relation: S) -> Self {
        Dataset {
            relation: relation.into(),
            schema: Schema::sms(),
            documents: Vec::new(),
        }
    }

    /// Create a dataset from documents.
    pub fn from_documents(documents: Vec<Document>) -> Self {
        Dataset {
            documents,
            ..Self::new()
        }
    }

    /// Append a document.
    pub fn push(&mut self, document: Document) {
        self.documents.push(document);
    }

    /// Relation name.
    pub fn relation(&self) -> &str {
        &self.relation
    }

    /// Attribute schema.
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Documents in input order.
    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    /// Labels in document order.
    pub fn labels(&self) -> Vec<Label> {
        self.documents.iter().map(|d| d.label).collect()
    }

    /// Number of documents per label, in declared label order.
    pub fn label_counts(&self) -> [usize; Label::COUNT] {
        let mut counts = [0; Label::COUNT];
        for document in &self.documents {
            counts[document.label.index()] += 1;
        }
        counts
    }

    /// Get the number of documents.
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    /// Check if the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Iterate over the documents.
    pub fn iter(&self) -> std::slice::Iter<'_, Document> {
        self.documents.iter()
    }
}

impl Default for Dataset {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> IntoIterator for &'a Dataset {
    type Item = &'a Document;
    type IntoIter = std::slice::Iter<'a, Document>;

    fn into_iter(self) -> Self::IntoIter {
        self.documents.iter()
    }
}

impl FromIterator<Document> for Dataset {
    fn from_iter<I: IntoIterator<Item = Document>>(iter: I) -> Self {
        Dataset::from_documents(iter.into_iter().collect())
    }
}
