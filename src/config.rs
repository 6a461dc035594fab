//! Configuration for the classification pipeline.
//!
//! Every section falls back to its defaults, so a JSON file only needs the
//! values it changes:
//!
//! ```json
//! {
//!   "vectorizer": { "ngram_max": 2 },
//!   "paths": { "model": "models/bigram.dat" }
//! }
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::ml::naive_bayes::NaiveBayesConfig;
use crate::ml::vectorizer::VectorizerConfig;

/// File locations used by the `run` flow and as CLI defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Raw training corpus.
    pub train_raw: PathBuf,
    /// ARFF cache of the training corpus.
    pub train_arff: PathBuf,
    /// Raw test corpus.
    pub test_raw: PathBuf,
    /// ARFF cache of the test corpus.
    pub test_arff: PathBuf,
    /// Trained model file.
    pub model: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            train_raw: PathBuf::from("dataset/train.txt"),
            train_arff: PathBuf::from("dataset/train.arff"),
            test_raw: PathBuf::from("dataset/test.txt"),
            test_arff: PathBuf::from("dataset/test.arff"),
            model: PathBuf::from("models/sms.dat"),
        }
    }
}

/// Configuration for the whole pipeline.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Feature extraction settings.
    pub vectorizer: VectorizerConfig,
    /// Naive Bayes settings.
    pub naive_bayes: NaiveBayesConfig,
    /// File locations.
    pub paths: PathsConfig,
}

impl PipelineConfig {
    /// Load and validate a configuration from a JSON file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let config: PipelineConfig = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate every section.
    pub fn validate(&self) -> Result<()> {
        self.vectorizer.validate()?;
        self.naive_bayes.validate()?;
        Ok(())
    }
}
