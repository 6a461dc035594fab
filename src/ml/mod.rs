//! Machine learning components of the spam/ham pipeline.
//!
//! # Architecture
//!
//! - [`vectorizer`]: bag-of-words feature extraction (`fit_transform` / `transform`)
//! - [`naive_bayes`]: multinomial Naive Bayes estimator
//! - [`classifier`]: the trained model (`TextClassifier`) and the `Classifier` trait
//! - [`pipeline`]: fitting and the load-or-train flow
//! - [`evaluation`]: accuracy, confusion matrix and per-class metrics
//!
//! # Example
//!
//! ```
//! use smsbayes::dataset::{Dataset, Document, Label};
//! use smsbayes::ml::classifier::Classifier;
//! use smsbayes::ml::pipeline::Pipeline;
//!
//! let training = Dataset::from_documents(vec![
//!     Document::new(Label::Spam, "you won the lottery"),
//!     Document::new(Label::Ham, "see you at lunch"),
//! ]);
//!
//! let classifier = Pipeline::default().fit(&training).unwrap();
//! assert_eq!(classifier.predict("you won").unwrap(), Label::Spam);
//! ```

pub mod classifier;
pub mod evaluation;
pub mod naive_bayes;
pub mod pipeline;
pub mod vectorizer;

// Public exports
pub use classifier::{Classifier, PipelineState, TextClassifier};
pub use evaluation::{ClassMetrics, ConfusionMatrix, EvaluationSummary, evaluate};
pub use naive_bayes::{MultinomialNaiveBayes, NaiveBayesConfig, NaiveBayesParams};
pub use pipeline::{ModelOrigin, Pipeline};
pub use vectorizer::{
    BagOfWordsVectorizer, FeatureMatrix, FeatureVector, VectorizerConfig, Vocabulary, transform,
};
