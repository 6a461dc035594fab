//! Bag-of-words feature extraction.
//!
//! Fitting and transforming are two explicit phases:
//!
//! - [`BagOfWordsVectorizer::fit_transform`] scans the training set and
//!   returns a fitted [`Vocabulary`] together with the training
//!   [`FeatureMatrix`].
//! - [`transform`] / [`Vocabulary::transform_text`] map new text into the
//!   fitted feature space. Unknown tokens contribute nothing.
//!
//! # Example
//!
//! ```
//! use smsbayes::dataset::{Dataset, Document, Label};
//! use smsbayes::ml::vectorizer::{BagOfWordsVectorizer, VectorizerConfig};
//!
//! let dataset = Dataset::from_documents(vec![
//!     Document::new(Label::Spam, "You won the lottery"),
//!     Document::new(Label::Ham, "see you at lunch"),
//! ]);
//!
//! let vectorizer = BagOfWordsVectorizer::new(VectorizerConfig::default()).unwrap();
//! let (vocabulary, matrix) = vectorizer.fit_transform(&dataset).unwrap();
//!
//! assert_eq!(vocabulary.len(), 7);
//! assert_eq!(matrix.len(), 2);
//!
//! let features = vocabulary.transform_text("YOU won a car").unwrap();
//! assert_eq!(features.total(), 2.0);
//! ```

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::analysis::analyzer::{Analyzer, PipelineAnalyzer};
use crate::dataset::{Dataset, Document};
use crate::error::{Result, SmsBayesError};

/// Feature extraction settings.
///
/// The defaults give lower-cased word unigram counts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VectorizerConfig {
    /// Lower-case tokens before counting.
    pub lowercase: bool,
    /// Smallest word n-gram length.
    pub ngram_min: usize,
    /// Largest word n-gram length.
    pub ngram_max: usize,
    /// Minimum total frequency in the training set for a term to be kept.
    pub min_term_freq: usize,
    /// Record presence (1.0) instead of counts.
    pub binary: bool,
}

impl Default for VectorizerConfig {
    fn default() -> Self {
        Self {
            lowercase: true,
            ngram_min: 1,
            ngram_max: 1,
            min_term_freq: 1,
            binary: false,
        }
    }
}

impl VectorizerConfig {
    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.ngram_min == 0 {
            return Err(SmsBayesError::invalid_argument(
                "ngram_min must be at least 1",
            ));
        }
        if self.ngram_max < self.ngram_min {
            return Err(SmsBayesError::invalid_argument(format!(
                "ngram_max ({}) must not be smaller than ngram_min ({})",
                self.ngram_max, self.ngram_min
            )));
        }
        if self.min_term_freq == 0 {
            return Err(SmsBayesError::invalid_argument(
                "min_term_freq must be at least 1",
            ));
        }
        Ok(())
    }

    /// Build the analyzer these settings describe.
    fn analyzer(&self) -> Result<PipelineAnalyzer> {
        PipelineAnalyzer::word_analyzer(self.lowercase)
    }
}

/// Sparse feature vector: `(index, value)` pairs sorted by index.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FeatureVector {
    dimension: usize,
    entries: Vec<(usize, f64)>,
}

impl FeatureVector {
    /// Build a vector from unordered entries. Duplicate indices are summed.
    pub fn from_entries(dimension: usize, entries: Vec<(usize, f64)>) -> Self {
        let mut merged: BTreeMap<usize, f64> = BTreeMap::new();
        for (index, value) in entries {
            *merged.entry(index).or_insert(0.0) += value;
        }
        Self {
            dimension,
            entries: merged.into_iter().collect(),
        }
    }

    /// An all-zero vector.
    pub fn zeros(dimension: usize) -> Self {
        Self {
            dimension,
            entries: Vec::new(),
        }
    }

    /// Dimensionality of the feature space.
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Non-zero entries in index order.
    pub fn entries(&self) -> &[(usize, f64)] {
        &self.entries
    }

    /// Value at `index` (zero when absent).
    pub fn get(&self, index: usize) -> f64 {
        self.entries
            .binary_search_by_key(&index, |(i, _)| *i)
            .map(|pos| self.entries[pos].1)
            .unwrap_or(0.0)
    }

    /// Check if every entry is zero.
    pub fn is_zero(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of all values.
    pub fn total(&self) -> f64 {
        self.entries.iter().map(|(_, value)| value).sum()
    }
}

/// Feature vectors of a training set, one row per document.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FeatureMatrix {
    dimension: usize,
    rows: Vec<FeatureVector>,
}

impl FeatureMatrix {
    /// Create a matrix from rows that all share `dimension`.
    ///
    /// Every entry must index a column below `dimension` and hold a finite,
    /// non-negative count.
    pub fn new(dimension: usize, rows: Vec<FeatureVector>) -> Result<Self> {
        for (row_num, row) in rows.iter().enumerate() {
            if row.dimension() != dimension {
                return Err(SmsBayesError::invalid_argument(format!(
                    "Row {row_num} has dimension {}, matrix dimension is {dimension}",
                    row.dimension()
                )));
            }
            for &(index, value) in row.entries() {
                if index >= dimension {
                    return Err(SmsBayesError::invalid_argument(format!(
                        "Row {row_num}: feature index {index} out of range for {dimension} features"
                    )));
                }
                if !(value.is_finite() && value >= 0.0) {
                    return Err(SmsBayesError::invalid_argument(format!(
                        "Row {row_num}: feature {index} has invalid count {value}"
                    )));
                }
            }
        }
        Ok(Self { dimension, rows })
    }

    /// Number of columns (vocabulary size).
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Rows in document order.
    pub fn rows(&self) -> &[FeatureVector] {
        &self.rows
    }

    /// Get the number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Check if the matrix has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Term → feature index mapping, fixed once fitted.
///
/// `Vocabulary::default()` is unfit; transforming with it is a state error.
#[derive(Clone, Default)]
pub struct Vocabulary {
    config: VectorizerConfig,
    terms: Vec<String>,
    index: HashMap<String, usize>,
    analyzer: Option<PipelineAnalyzer>,
}

impl std::fmt::Debug for Vocabulary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Vocabulary")
            .field("fitted", &self.is_fitted())
            .field("size", &self.terms.len())
            .field("config", &self.config)
            .finish()
    }
}

impl PartialEq for Vocabulary {
    fn eq(&self, other: &Self) -> bool {
        self.is_fitted() == other.is_fitted()
            && self.config == other.config
            && self.terms == other.terms
    }
}

impl Vocabulary {
    /// Rebuild a fitted vocabulary from terms listed in index order.
    pub fn from_terms(config: VectorizerConfig, terms: Vec<String>) -> Result<Self> {
        config.validate()?;

        let mut index = HashMap::with_capacity(terms.len());
        for (i, term) in terms.iter().enumerate() {
            if index.insert(term.clone(), i).is_some() {
                return Err(SmsBayesError::invalid_argument(format!(
                    "Duplicate vocabulary term '{term}'"
                )));
            }
        }

        Ok(Self {
            analyzer: Some(config.analyzer()?),
            config,
            terms,
            index,
        })
    }

    /// Check whether this vocabulary came out of a fit.
    pub fn is_fitted(&self) -> bool {
        self.analyzer.is_some()
    }

    /// Settings the vocabulary was fitted with.
    pub fn config(&self) -> &VectorizerConfig {
        &self.config
    }

    /// Terms in feature-index order.
    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    /// Feature index of `term`.
    pub fn index_of(&self, term: &str) -> Option<usize> {
        self.index.get(term).copied()
    }

    /// Term at feature `index`.
    pub fn term(&self, index: usize) -> Option<&str> {
        self.terms.get(index).map(String::as_str)
    }

    /// Get the size of the vocabulary.
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    /// Check if the vocabulary is empty.
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Map text into this vocabulary's feature space.
    pub fn transform_text(&self, text: &str) -> Result<FeatureVector> {
        let Some(analyzer) = &self.analyzer else {
            return Err(SmsBayesError::state(
                "Vocabulary is not fitted; call fit_transform first",
            ));
        };

        let mut counts: HashMap<usize, f64> = HashMap::new();
        for term in extract_terms(analyzer, &self.config, text)? {
            if let Some(&index) = self.index.get(&term) {
                *counts.entry(index).or_insert(0.0) += 1.0;
            }
        }

        if self.config.binary {
            counts.values_mut().for_each(|value| *value = 1.0);
        }

        Ok(FeatureVector::from_entries(
            self.terms.len(),
            counts.into_iter().collect(),
        ))
    }
}

/// Transform a document with a fitted vocabulary.
pub fn transform(vocabulary: &Vocabulary, document: &Document) -> Result<FeatureVector> {
    vocabulary.transform_text(&document.text)
}

/// Bag-of-words vectorizer (unfit settings + analyzer).
#[derive(Debug, Clone)]
pub struct BagOfWordsVectorizer {
    config: VectorizerConfig,
    analyzer: PipelineAnalyzer,
}

impl BagOfWordsVectorizer {
    /// Create a new vectorizer with the given settings.
    pub fn new(config: VectorizerConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            analyzer: config.analyzer()?,
            config,
        })
    }

    /// Get the vectorizer settings.
    pub fn config(&self) -> &VectorizerConfig {
        &self.config
    }

    /// Fit a vocabulary on the training documents.
    pub fn fit(&self, dataset: &Dataset) -> Result<Vocabulary> {
        self.fit_transform(dataset).map(|(vocabulary, _)| vocabulary)
    }

    /// Fit a vocabulary on the training documents and transform them.
    ///
    /// Term indices follow sorted term order, so the same training set
    /// always produces the same feature space.
    pub fn fit_transform(&self, dataset: &Dataset) -> Result<(Vocabulary, FeatureMatrix)> {
        if dataset.is_empty() {
            return Err(SmsBayesError::invalid_argument(
                "Cannot fit a vocabulary on an empty dataset",
            ));
        }

        let document_terms: Vec<Vec<String>> = dataset
            .iter()
            .map(|document| extract_terms(&self.analyzer, &self.config, &document.text))
            .collect::<Result<_>>()?;

        let mut frequencies: BTreeMap<&str, usize> = BTreeMap::new();
        for term in document_terms.iter().flatten() {
            *frequencies.entry(term.as_str()).or_insert(0) += 1;
        }

        let terms: Vec<String> = frequencies
            .into_iter()
            .filter(|(_, freq)| *freq >= self.config.min_term_freq)
            .map(|(term, _)| term.to_string())
            .collect();

        let vocabulary = Vocabulary::from_terms(self.config.clone(), terms)?;

        let rows = document_terms
            .iter()
            .map(|terms| {
                let mut counts: HashMap<usize, f64> = HashMap::new();
                for term in terms {
                    if let Some(index) = vocabulary.index_of(term) {
                        *counts.entry(index).or_insert(0.0) += 1.0;
                    }
                }
                if self.config.binary {
                    counts.values_mut().for_each(|value| *value = 1.0);
                }
                FeatureVector::from_entries(vocabulary.len(), counts.into_iter().collect())
            })
            .collect();

        let matrix = FeatureMatrix::new(vocabulary.len(), rows)?;
        Ok((vocabulary, matrix))
    }
}

/// Analyze text and expand its tokens into the configured word n-grams.
fn extract_terms(
    analyzer: &PipelineAnalyzer,
    config: &VectorizerConfig,
    text: &str,
) -> Result<Vec<String>> {
    let tokens: Vec<String> = analyzer.analyze(text)?.map(|token| token.text).collect();

    if config.ngram_min == 1 && config.ngram_max == 1 {
        return Ok(tokens);
    }

    let mut terms = Vec::new();
    for n in config.ngram_min..=config.ngram_max {
        terms.extend(tokens.windows(n).map(|window| window.join(" ")));
    }
    Ok(terms)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::Label;
    use crate::error::ErrorKind;

    fn training_set() -> Dataset {
        Dataset::from_documents(vec![
            Document::new(Label::Spam, "You WON the lottery, you won!"),
            Document::new(Label::Ham, "see you at lunch"),
        ])
    }

    #[test]
    fn test_fit_transform_counts() {
        let vectorizer = BagOfWordsVectorizer::new(VectorizerConfig::default()).unwrap();
        let (vocabulary, matrix) = vectorizer.fit_transform(&training_set()).unwrap();

        assert_eq!(
            vocabulary.terms(),
            &["at", "lottery", "lunch", "see", "the", "won", "you"]
        );
        assert_eq!(matrix.dimension(), 7);
        assert_eq!(matrix.len(), 2);

        let spam = &matrix.rows()[0];
        assert_eq!(spam.get(vocabulary.index_of("you").unwrap()), 2.0);
        assert_eq!(spam.get(vocabulary.index_of("won").unwrap()), 2.0);
        assert_eq!(spam.get(vocabulary.index_of("lunch").unwrap()), 0.0);
        assert_eq!(spam.total(), 6.0);
    }

    #[test]
    fn test_transform_ignores_unknown_tokens() {
        let vectorizer = BagOfWordsVectorizer::new(VectorizerConfig::default()).unwrap();
        let (vocabulary, _) = vectorizer.fit_transform(&training_set()).unwrap();

        let vector = vocabulary.transform_text("Brand new car for YOU").unwrap();
        assert_eq!(vector.entries().len(), 1);
        assert_eq!(vector.get(vocabulary.index_of("you").unwrap()), 1.0);

        let empty = vocabulary.transform_text("zzz qqq !!!").unwrap();
        assert!(empty.is_zero());
        assert_eq!(empty.dimension(), vocabulary.len());
    }

    #[test]
    fn test_vocabulary_closure() {
        let dataset = training_set();
        let vectorizer = BagOfWordsVectorizer::new(VectorizerConfig::default()).unwrap();
        let (vocabulary, _) = vectorizer.fit_transform(&dataset).unwrap();

        for text in ["you won a prize", "lunch at noon?", "", "SEE THE LOTTERY"] {
            let vector = vocabulary.transform_text(text).unwrap();
            for &(index, _) in vector.entries() {
                assert!(index < vocabulary.len());
                let term = vocabulary.term(index).unwrap();
                assert!(
                    dataset
                        .iter()
                        .any(|d| d.text.to_lowercase().contains(term)),
                    "term {term} not seen in training"
                );
            }
        }
    }

    #[test]
    fn test_transform_document_matches_text() {
        let vectorizer = BagOfWordsVectorizer::new(VectorizerConfig::default()).unwrap();
        let (vocabulary, matrix) = vectorizer.fit_transform(&training_set()).unwrap();
        let dataset = training_set();
        let document = &dataset.documents()[1];

        assert_eq!(transform(&vocabulary, document).unwrap(), matrix.rows()[1]);
    }

    #[test]
    fn test_unfit_vocabulary_is_state_error() {
        let vocabulary = Vocabulary::default();
        assert!(!vocabulary.is_fitted());

        let err = vocabulary.transform_text("you won").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::State);

        let document = Document::new(Label::Ham, "hello");
        let err = transform(&vocabulary, &document).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::State);
    }

    #[test]
    fn test_fit_on_empty_dataset() {
        let vectorizer = BagOfWordsVectorizer::new(VectorizerConfig::default()).unwrap();
        let err = vectorizer.fit_transform(&Dataset::new()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    }

    #[test]
    fn test_case_sensitive_and_binary() {
        let config = VectorizerConfig {
            lowercase: false,
            binary: true,
            ..VectorizerConfig::default()
        };
        let vectorizer = BagOfWordsVectorizer::new(config).unwrap();
        let (vocabulary, matrix) = vectorizer.fit_transform(&training_set()).unwrap();

        assert!(vocabulary.index_of("You").is_some());
        assert!(vocabulary.index_of("WON").is_some());
        assert_eq!(matrix.rows()[0].get(vocabulary.index_of("won").unwrap()), 1.0);
    }

    #[test]
    fn test_bigrams_and_min_term_freq() {
        let config = VectorizerConfig {
            ngram_max: 2,
            min_term_freq: 2,
            ..VectorizerConfig::default()
        };
        let vectorizer = BagOfWordsVectorizer::new(config).unwrap();
        let (vocabulary, _) = vectorizer.fit_transform(&training_set()).unwrap();

        assert_eq!(vocabulary.terms(), &["won", "you", "you won"]);
    }

    #[test]
    fn test_invalid_config() {
        for config in [
            VectorizerConfig {
                ngram_min: 0,
                ..VectorizerConfig::default()
            },
            VectorizerConfig {
                ngram_min: 2,
                ngram_max: 1,
                ..VectorizerConfig::default()
            },
            VectorizerConfig {
                min_term_freq: 0,
                ..VectorizerConfig::default()
            },
        ] {
            let err = BagOfWordsVectorizer::new(config).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidArgument);
        }
    }

    #[test]
    fn test_duplicate_terms_rejected() {
        let err = Vocabulary::from_terms(
            VectorizerConfig::default(),
            vec!["a".to_string(), "a".to_string()],
        )
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    }

    #[test]
    fn test_feature_vector_helpers() {
        let vector = FeatureVector::from_entries(4, vec![(3, 1.0), (1, 2.0), (3, 1.0)]);
        assert_eq!(vector.entries(), &[(1, 2.0), (3, 2.0)]);
        assert_eq!(vector.get(1), 2.0);
        assert_eq!(vector.get(2), 0.0);
        assert_eq!(vector.total(), 4.0);
        assert!(FeatureVector::zeros(4).is_zero());
    }

    #[test]
    fn test_matrix_rejects_out_of_range_index() {
        let row = FeatureVector::from_entries(2, vec![(5, 1.0)]);
        let err = FeatureMatrix::new(2, vec![row]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    }

    #[test]
    fn test_matrix_rejects_invalid_counts() {
        for value in [-5.0, f64::NAN, f64::INFINITY] {
            let row = FeatureVector::from_entries(2, vec![(0, value)]);
            let err = FeatureMatrix::new(2, vec![row]).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidArgument);
        }
    }
}
