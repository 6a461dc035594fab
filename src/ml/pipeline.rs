//! Training pipeline: dataset → vocabulary → Naive Bayes → model file.

use std::path::Path;

use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::config::PipelineConfig;
use crate::dataset::{Dataset, load_cached_or_raw};
use crate::error::{Result, SmsBayesError};
use crate::ml::classifier::{PipelineState, TextClassifier};
use crate::ml::naive_bayes::MultinomialNaiveBayes;
use crate::ml::vectorizer::BagOfWordsVectorizer;
use crate::storage::{load_model, save_model};

/// Where a ready model came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelOrigin {
    /// Deserialized from an existing model file.
    Loaded,
    /// Trained because no model file existed.
    Trained,
}

/// Fits text classifiers according to a [`PipelineConfig`].
#[derive(Debug, Clone, Default)]
pub struct Pipeline {
    config: PipelineConfig,
}

impl Pipeline {
    /// Create a new pipeline after validating its configuration.
    pub fn new(config: PipelineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Get the pipeline configuration.
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Fit a vocabulary and classifier on `dataset`.
    ///
    /// This is the only `Fitting → Ready` transition; the returned model is
    /// immutable.
    pub fn fit(&self, dataset: &Dataset) -> Result<TextClassifier> {
        if dataset.is_empty() {
            return Err(SmsBayesError::invalid_argument(
                "Training dataset contains no documents",
            ));
        }
        debug!("Pipeline {} -> {}", PipelineState::Unfit, PipelineState::Fitting);

        let vectorizer = BagOfWordsVectorizer::new(self.config.vectorizer.clone())?;
        let (vocabulary, matrix) = vectorizer.fit_transform(dataset)?;
        let model = MultinomialNaiveBayes::fit(
            &self.config.naive_bayes,
            &matrix,
            &dataset.labels(),
        )?;
        let classifier = TextClassifier::new(vocabulary, model)?;

        let [spam, ham] = dataset.label_counts();
        info!(
            "Trained model on {} documents ({spam} spam, {ham} ham), vocabulary size {}",
            dataset.len(),
            classifier.vocabulary().len()
        );
        debug!("Pipeline {} -> {}", PipelineState::Fitting, classifier.state());

        Ok(classifier)
    }

    /// Load the model at `model_path`, or train and save one if it is absent.
    ///
    /// Only a missing model file triggers training; a corrupt one is an error.
    pub fn load_or_train<M, R, A>(
        &self,
        model_path: M,
        train_raw: R,
        train_arff: A,
    ) -> Result<(TextClassifier, ModelOrigin)>
    where
        M: AsRef<Path>,
        R: AsRef<Path>,
        A: AsRef<Path>,
    {
        let model_path = model_path.as_ref();
        match load_model(model_path) {
            Ok(classifier) => Ok((classifier, ModelOrigin::Loaded)),
            Err(e) if e.is_not_found() => {
                info!("No model at {}; training a new one", model_path.display());
                let classifier = self.train(train_raw, train_arff, model_path)?;
                Ok((classifier, ModelOrigin::Trained))
            }
            Err(e) => Err(e),
        }
    }

    /// Load training data (ARFF cache or raw corpus), fit, and save the model.
    pub fn train<R, A, M>(&self, train_raw: R, train_arff: A, model_path: M) -> Result<TextClassifier>
    where
        R: AsRef<Path>,
        A: AsRef<Path>,
        M: AsRef<Path>,
    {
        let dataset = load_cached_or_raw(train_raw, train_arff)?;
        let classifier = self.fit(&dataset)?;
        save_model(&classifier, model_path)?;
        Ok(classifier)
    }
}
