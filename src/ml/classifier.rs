//! Text classifier: fitted vocabulary plus Naive Bayes parameters.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::dataset::Label;
use crate::error::{Result, SmsBayesError};
use crate::ml::naive_bayes::MultinomialNaiveBayes;
use crate::ml::vectorizer::{FeatureVector, Vocabulary};

/// Text classifier trait.
///
/// Implementations map a raw message to one of the declared labels.
pub trait Classifier: Send + Sync {
    /// Predict the label for a message.
    fn predict(&self, text: &str) -> Result<Label>;

    /// Class probabilities for a message, in declared label order.
    fn predict_proba(&self, text: &str) -> Result<[f64; Label::COUNT]>;

    /// Get the name of this classifier for debugging and logging.
    fn name(&self) -> &str;
}

/// Lifecycle of a classification pipeline.
///
/// `Unfit → Fitting → Ready`; only a fit performs the transition, once per
/// model value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PipelineState {
    Unfit,
    Fitting,
    Ready,
}

impl fmt::Display for PipelineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PipelineState::Unfit => f.write_str("unfit"),
            PipelineState::Fitting => f.write_str("fitting"),
            PipelineState::Ready => f.write_str("ready"),
        }
    }
}

/// The trained model: vocabulary and classifier kept together so they never
/// drift apart.
///
/// `TextClassifier::default()` is unfit. Fitted values come from
/// [`Pipeline::fit`](crate::ml::pipeline::Pipeline::fit) or
/// [`load_model`](crate::storage::load_model) and are read-only afterwards.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TextClassifier {
    vocabulary: Vocabulary,
    model: MultinomialNaiveBayes,
}

impl TextClassifier {
    /// Pair a vocabulary with a classifier fitted on its feature space.
    pub fn new(vocabulary: Vocabulary, model: MultinomialNaiveBayes) -> Result<Self> {
        if let Some(params) = model.params()
            && params.n_features != vocabulary.len()
        {
            return Err(SmsBayesError::invalid_argument(format!(
                "Classifier expects {} features but vocabulary has {} terms",
                params.n_features,
                vocabulary.len()
            )));
        }
        Ok(Self { vocabulary, model })
    }

    /// Current lifecycle state.
    pub fn state(&self) -> PipelineState {
        if self.is_fitted() {
            PipelineState::Ready
        } else {
            PipelineState::Unfit
        }
    }

    /// Check whether both the vocabulary and the classifier are fitted.
    pub fn is_fitted(&self) -> bool {
        self.vocabulary.is_fitted() && self.model.is_fitted()
    }

    pub(crate) fn ensure_fitted(&self) -> Result<()> {
        if self.is_fitted() {
            Ok(())
        } else {
            Err(SmsBayesError::state(format!(
                "Model is {}; train or load a model first",
                self.state()
            )))
        }
    }

    /// Fitted vocabulary.
    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    /// Fitted Naive Bayes model.
    pub fn model(&self) -> &MultinomialNaiveBayes {
        &self.model
    }

    /// Map text into the model's feature space.
    pub fn features(&self, text: &str) -> Result<FeatureVector> {
        self.ensure_fitted()?;
        self.vocabulary.transform_text(text)
    }
}

impl Classifier for TextClassifier {
    fn predict(&self, text: &str) -> Result<Label> {
        let features = self.features(text)?;
        self.model.predict(&features)
    }

    fn predict_proba(&self, text: &str) -> Result<[f64; Label::COUNT]> {
        let features = self.features(text)?;
        self.model.predict_proba(&features)
    }

    fn name(&self) -> &str {
        "multinomial_naive_bayes"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_unfit_classifier() {
        let classifier = TextClassifier::default();
        assert_eq!(classifier.state(), PipelineState::Unfit);

        let err = classifier.predict("you won").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::State);
        assert_eq!(
            err.to_string(),
            "State error: Model is unfit; train or load a model first"
        );

        let err = classifier.predict_proba("you won").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::State);
    }

    #[test]
    fn test_state_display() {
        assert_eq!(PipelineState::Fitting.to_string(), "fitting");
        assert_eq!(PipelineState::Ready.to_string(), "ready");
    }
}
