//! Error types for the smsbayes library.
//!
//! All fallible operations return [`Result`], whose error is the
//! [`SmsBayesError`] enum. Callers that need to branch on *what* went wrong
//! (for example, retraining when a model file is absent but aborting when it
//! is corrupt) should match on [`SmsBayesError::kind`] instead of the
//! variant payloads.
//!
//! # Examples
//!
//! ```
//! use smsbayes::error::{ErrorKind, SmsBayesError, Result};
//!
//! fn load() -> Result<()> {
//!     Err(SmsBayesError::not_found("models/sms.dat"))
//! }
//!
//! match load() {
//!     Err(e) if e.kind() == ErrorKind::NotFound => println!("retraining"),
//!     Err(e) => eprintln!("Error: {e}"),
//!     Ok(()) => {}
//! }
//! ```

use std::io;

use thiserror::Error;

/// The main error type for smsbayes operations.
#[derive(Error, Debug)]
pub enum SmsBayesError {
    /// I/O errors (missing, unreadable or unwritable files).
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Malformed tabular (ARFF) dataset.
    #[error("Format error: {0}")]
    Format(String),

    /// Operation invoked in the wrong pipeline phase (e.g. predict before fit).
    #[error("State error: {0}")]
    State(String),

    /// Model file absent. Callers usually fall back to training.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Persisted model failed its integrity or consistency checks.
    #[error("Corrupt model: {0}")]
    CorruptModel(String),

    /// Invalid configuration or input.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Analysis-related errors (tokenizer construction, filtering).
    #[error("Analysis error: {0}")]
    Analysis(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Binary (bincode) serialization errors
    #[error("Serialization error: {0}")]
    Bincode(#[from] bincode::Error),
}

/// Closed classification of [`SmsBayesError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Io,
    Format,
    State,
    NotFound,
    CorruptModel,
    InvalidArgument,
    Analysis,
    Serialization,
}

/// Result type alias for operations that may fail with SmsBayesError.
pub type Result<T> = std::result::Result<T, SmsBayesError>;

impl SmsBayesError {
    /// Create a new format error.
    pub fn format<S: Into<String>>(msg: S) -> Self {
        SmsBayesError::Format(msg.into())
    }

    /// Create a new state error.
    pub fn state<S: Into<String>>(msg: S) -> Self {
        SmsBayesError::State(msg.into())
    }

    /// Create a new not found error.
    pub fn not_found<S: Into<String>>(msg: S) -> Self {
        SmsBayesError::NotFound(msg.into())
    }

    /// Create a new corrupt model error.
    pub fn corrupt_model<S: Into<String>>(msg: S) -> Self {
        SmsBayesError::CorruptModel(msg.into())
    }

    /// Create a new invalid argument error.
    pub fn invalid_argument<S: Into<String>>(msg: S) -> Self {
        SmsBayesError::InvalidArgument(msg.into())
    }

    /// Create a new analysis error.
    pub fn analysis<S: Into<String>>(msg: S) -> Self {
        SmsBayesError::Analysis(msg.into())
    }

    /// The kind of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            SmsBayesError::Io(_) => ErrorKind::Io,
            SmsBayesError::Format(_) => ErrorKind::Format,
            SmsBayesError::State(_) => ErrorKind::State,
            SmsBayesError::NotFound(_) => ErrorKind::NotFound,
            SmsBayesError::CorruptModel(_) => ErrorKind::CorruptModel,
            SmsBayesError::InvalidArgument(_) => ErrorKind::InvalidArgument,
            SmsBayesError::Analysis(_) => ErrorKind::Analysis,
            SmsBayesError::Json(_) | SmsBayesError::Bincode(_) => ErrorKind::Serialization,
        }
    }

    /// Whether this is the expected "model file absent" condition.
    pub fn is_not_found(&self) -> bool {
        self.kind() == ErrorKind::NotFound
    }
}
