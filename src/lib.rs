//! # smsbayes
//!
//! A spam/ham SMS classifier built on multinomial Naive Bayes.
//!
//! ## Features
//!
//! - Tolerant loader for the `<label> <text>` raw corpus
//! - ARFF cache with a strict reader and writer
//! - Bag-of-words vectorizer with an explicit fit phase
//! - Laplace-smoothed multinomial Naive Bayes
//! - Checksummed, versioned model files written atomically
//! - Weka-style evaluation summary (accuracy, kappa, confusion matrix)

pub mod analysis;
pub mod cli;
pub mod config;
pub mod dataset;
pub mod error;
pub mod ml;
pub mod storage;

pub mod prelude {
    pub use crate::config::PipelineConfig;
    pub use crate::dataset::{Dataset, Document, Label};
    pub use crate::error::{ErrorKind, Result, SmsBayesError};
    pub use crate::ml::{Classifier, ModelOrigin, Pipeline, TextClassifier, evaluate};
    pub use crate::storage::{load_model, save_model};
}

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
