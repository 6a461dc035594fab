//! Multinomial Naive Bayes.
//!
//! For class `c` and term `t`:
//!
//! ```text
//! log P(c)     = ln((N_c + alpha) / (N + alpha * |C|))
//! log P(t | c) = ln((count_c(t) + alpha) / (total_c + alpha * |V|))
//! score(c, x)  = log P(c) + Σ_t x_t * log P(t | c)
//! ```
//!
//! Prediction is the argmax of `score`; ties go to the earlier declared
//! label. A vector with no known terms scores on the priors alone.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::dataset::Label;
use crate::error::{Result, SmsBayesError};
use crate::ml::vectorizer::{FeatureMatrix, FeatureVector};

/// Estimator settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NaiveBayesConfig {
    /// Additive (Laplace) smoothing; 1.0 is add-one smoothing.
    pub alpha: f64,
}

impl Default for NaiveBayesConfig {
    fn default() -> Self {
        Self { alpha: 1.0 }
    }
}

impl NaiveBayesConfig {
    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if !(self.alpha.is_finite() && self.alpha > 0.0) {
            return Err(SmsBayesError::invalid_argument(format!(
                "alpha must be a positive finite number, got {}",
                self.alpha
            )));
        }
        Ok(())
    }
}

/// Fitted parameters, indexed by [`Label::index`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NaiveBayesParams {
    /// Training documents per class.
    pub class_counts: Vec<usize>,
    /// Smoothed log prior per class.
    pub class_log_prior: Vec<f64>,
    /// Smoothed log P(term | class), one row of `n_features` per class.
    pub feature_log_prob: Vec<Vec<f64>>,
    /// Dimensionality of the feature space.
    pub n_features: usize,
}

impl NaiveBayesParams {
    /// Check that the tables agree with each other and with `n_features`.
    pub fn check_consistency(&self, n_features: usize) -> Result<()> {
        if self.n_features != n_features {
            return Err(SmsBayesError::corrupt_model(format!(
                "Parameter table has {} features but vocabulary has {n_features} terms",
                self.n_features
            )));
        }

        for (name, len) in [
            ("class_counts", self.class_counts.len()),
            ("class_log_prior", self.class_log_prior.len()),
            ("feature_log_prob", self.feature_log_prob.len()),
        ] {
            if len != Label::COUNT {
                return Err(SmsBayesError::corrupt_model(format!(
                    "{name} has {len} classes, expected {}",
                    Label::COUNT
                )));
            }
        }

        if self.class_log_prior.iter().any(|p| !p.is_finite()) {
            return Err(SmsBayesError::corrupt_model("Non-finite class prior"));
        }

        for (class, row) in self.feature_log_prob.iter().enumerate() {
            if row.len() != n_features {
                return Err(SmsBayesError::corrupt_model(format!(
                    "Class {class} has {} term probabilities, expected {n_features}",
                    row.len()
                )));
            }
            if row.iter().any(|p| !p.is_finite()) {
                return Err(SmsBayesError::corrupt_model(format!(
                    "Non-finite term probability for class {class}"
                )));
            }
        }

        Ok(())
    }
}

/// Multinomial Naive Bayes classifier.
///
/// `MultinomialNaiveBayes::default()` is unfit; [`MultinomialNaiveBayes::fit`]
/// returns a new, fitted value.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MultinomialNaiveBayes {
    config: NaiveBayesConfig,
    params: Option<NaiveBayesParams>,
}

impl MultinomialNaiveBayes {
    /// Estimate priors and term likelihoods from a feature matrix.
    pub fn fit(config: &NaiveBayesConfig, matrix: &FeatureMatrix, labels: &[Label]) -> Result<Self> {
        config.validate()?;

        if matrix.len() != labels.len() {
            return Err(SmsBayesError::invalid_argument(format!(
                "Feature matrix has {} rows but {} labels were given",
                matrix.len(),
                labels.len()
            )));
        }
        if matrix.is_empty() {
            return Err(SmsBayesError::invalid_argument(
                "Cannot fit on an empty feature matrix",
            ));
        }

        let alpha = config.alpha;
        let n_features = matrix.dimension();
        let mut class_counts = vec![0usize; Label::COUNT];
        let mut feature_counts = vec![vec![0.0f64; n_features]; Label::COUNT];

        for (row, label) in matrix.rows().iter().zip(labels) {
            let class = label.index();
            class_counts[class] += 1;
            for &(index, value) in row.entries() {
                feature_counts[class][index] += value;
            }
        }

        let n_documents = labels.len() as f64;
        let class_log_prior = class_counts
            .iter()
            .map(|&count| {
                ((count as f64 + alpha) / (n_documents + alpha * Label::COUNT as f64)).ln()
            })
            .collect();

        let feature_log_prob = feature_counts
            .iter()
            .map(|counts| {
                let total: f64 = counts.iter().sum();
                let denominator = total + alpha * n_features as f64;
                counts
                    .iter()
                    .map(|&count| ((count + alpha) / denominator).ln())
                    .collect()
            })
            .collect();

        Ok(Self {
            config: config.clone(),
            params: Some(NaiveBayesParams {
                class_counts,
                class_log_prior,
                feature_log_prob,
                n_features,
            }),
        })
    }

    /// Rebuild a fitted classifier from stored parameters.
    pub fn from_params(config: NaiveBayesConfig, params: NaiveBayesParams) -> Result<Self> {
        config.validate()?;
        params.check_consistency(params.n_features)?;
        Ok(Self {
            config,
            params: Some(params),
        })
    }

    /// Check whether this classifier has been fitted.
    pub fn is_fitted(&self) -> bool {
        self.params.is_some()
    }

    /// Get the estimator settings.
    pub fn config(&self) -> &NaiveBayesConfig {
        &self.config
    }

    /// Fitted parameters, if any.
    pub fn params(&self) -> Option<&NaiveBayesParams> {
        self.params.as_ref()
    }

    fn fitted_params(&self) -> Result<&NaiveBayesParams> {
        self.params.as_ref().ok_or_else(|| {
            SmsBayesError::state("Naive Bayes model is not fitted; call fit first")
        })
    }

    /// Unnormalized log posterior per class, in declared label order.
    pub fn predict_log_scores(&self, features: &FeatureVector) -> Result<[f64; Label::COUNT]> {
        let params = self.fitted_params()?;
        if features.is_zero() {
            debug!("No known terms; scoring on class priors alone");
        }

        let mut scores = [0.0; Label::COUNT];
        for (class, score) in scores.iter_mut().enumerate() {
            *score = params.class_log_prior[class];
            let log_probs = &params.feature_log_prob[class];
            for &(index, value) in features.entries() {
                let log_prob = log_probs.get(index).ok_or_else(|| {
                    SmsBayesError::invalid_argument(format!(
                        "Feature index {index} out of range for {} features",
                        params.n_features
                    ))
                })?;
                *score += value * log_prob;
            }
        }

        Ok(scores)
    }

    /// Posterior class probabilities, in declared label order.
    pub fn predict_proba(&self, features: &FeatureVector) -> Result<[f64; Label::COUNT]> {
        let scores = self.predict_log_scores(features)?;
        Ok(normalize(scores))
    }

    /// Most probable label; ties resolve to the earlier declared label.
    pub fn predict(&self, features: &FeatureVector) -> Result<Label> {
        let scores = self.predict_log_scores(features)?;
        best_label(&scores)
    }

    /// Label and class probabilities from a single scoring pass.
    pub fn predict_with_proba(
        &self,
        features: &FeatureVector,
    ) -> Result<(Label, [f64; Label::COUNT])> {
        let scores = self.predict_log_scores(features)?;
        Ok((best_label(&scores)?, normalize(scores)))
    }
}

/// Softmax over log scores.
fn normalize(scores: [f64; Label::COUNT]) -> [f64; Label::COUNT] {
    let max = scores.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    let mut probabilities = scores.map(|score| (score - max).exp());
    let sum: f64 = probabilities.iter().sum();
    probabilities.iter_mut().for_each(|p| *p /= sum);
    probabilities
}

/// Argmax with a strict comparison, so the first declared label wins ties.
fn best_label(scores: &[f64; Label::COUNT]) -> Result<Label> {
    let mut best = 0;
    for class in 1..scores.len() {
        if scores[class] > scores[best] {
            best = class;
        }
    }

    Label::from_index(best)
        .ok_or_else(|| SmsBayesError::state(format!("No label for class index {best}")))
}
