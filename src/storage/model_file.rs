//! Single-file model store.
//!
//! A model file is a fixed header followed by a bincode payload:
//!
//! ```text
//! +--------+-----------+--------------+-------------+-----------------+
//! | "SMNB" | version   | payload len  | payload crc | payload         |
//! | 4 B    | u32 LE    | u64 LE       | u32 LE      | bincode snapshot|
//! +--------+-----------+--------------+-------------+-----------------+
//! ```
//!
//! The payload holds the vectorizer settings, the vocabulary terms and the
//! Naive Bayes parameters, so vocabulary and classifier are always written
//! and read together. Files are replaced atomically through
//! [`write_atomic`].

use std::fs;
use std::io::{self, Cursor, Read, Write};
use std::path::Path;

use bincode::Options;
use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::error::{Result, SmsBayesError};
use crate::ml::classifier::TextClassifier;
use crate::ml::naive_bayes::{MultinomialNaiveBayes, NaiveBayesConfig, NaiveBayesParams};
use crate::ml::vectorizer::{VectorizerConfig, Vocabulary};
use crate::storage::atomic::write_atomic;

/// File signature.
pub const MAGIC: &[u8; 4] = b"SMNB";

/// Current payload format version.
pub const FORMAT_VERSION: u32 = 1;

const HEADER_LEN: usize = 4 + 4 + 8 + 4;

/// Serialized form of a fitted [`TextClassifier`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct ModelSnapshot {
    vectorizer: VectorizerConfig,
    terms: Vec<String>,
    naive_bayes: NaiveBayesConfig,
    params: NaiveBayesParams,
}

impl ModelSnapshot {
    fn capture(classifier: &TextClassifier) -> Result<Self> {
        let vocabulary = classifier.vocabulary();
        let model = classifier.model();
        let params = model
            .params()
            .ok_or_else(|| SmsBayesError::state("Cannot save an unfit model"))?;

        Ok(Self {
            vectorizer: vocabulary.config().clone(),
            terms: vocabulary.terms().to_vec(),
            naive_bayes: model.config().clone(),
            params: params.clone(),
        })
    }

    /// Rebuild the classifier, rejecting any internal inconsistency.
    fn restore(self) -> Result<TextClassifier> {
        self.params.check_consistency(self.terms.len())?;

        let vocabulary = Vocabulary::from_terms(self.vectorizer, self.terms)
            .map_err(|e| SmsBayesError::corrupt_model(format!("Invalid vocabulary: {e}")))?;
        let model = MultinomialNaiveBayes::from_params(self.naive_bayes, self.params)
            .map_err(|e| SmsBayesError::corrupt_model(format!("Invalid parameters: {e}")))?;

        TextClassifier::new(vocabulary, model)
            .map_err(|e| SmsBayesError::corrupt_model(e.to_string()))
    }
}

/// Save a fitted model to `path`, replacing any existing file atomically.
pub fn save_model<P: AsRef<Path>>(classifier: &TextClassifier, path: P) -> Result<()> {
    let path = path.as_ref();
    classifier.ensure_fitted()?;

    let snapshot = ModelSnapshot::capture(classifier)?;
    let bytes = encode(&snapshot)?;

    write_atomic(path, &bytes)?;

    info!("Saved model: {} ({} bytes)", path.display(), bytes.len());
    Ok(())
}

/// Load a model from `path`.
///
/// A missing file is reported as [`SmsBayesError::NotFound`], distinct from
/// [`SmsBayesError::CorruptModel`] for a file that exists but fails its
/// checks.
pub fn load_model<P: AsRef<Path>>(path: P) -> Result<TextClassifier> {
    let path = path.as_ref();
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            return Err(SmsBayesError::not_found(format!(
                "Model file {}",
                path.display()
            )));
        }
        Err(e) => return Err(e.into()),
    };

    let classifier = decode(&bytes)?.restore()?;
    info!("Loaded model: {}", path.display());
    Ok(classifier)
}

fn encode(snapshot: &ModelSnapshot) -> Result<Vec<u8>> {
    let payload = bincode::DefaultOptions::new().serialize(snapshot)?;

    let mut bytes = Vec::with_capacity(HEADER_LEN + payload.len());
    bytes.write_all(MAGIC)?;
    bytes.write_u32::<LittleEndian>(FORMAT_VERSION)?;
    bytes.write_u64::<LittleEndian>(payload.len() as u64)?;
    bytes.write_u32::<LittleEndian>(crc32fast::hash(&payload))?;
    bytes.write_all(&payload)?;
    Ok(bytes)
}

fn decode(bytes: &[u8]) -> Result<ModelSnapshot> {
    if bytes.len() < HEADER_LEN {
        return Err(SmsBayesError::corrupt_model(format!(
            "File too short for header: {} bytes",
            bytes.len()
        )));
    }

    let mut reader = Cursor::new(bytes);
    let mut magic = [0u8; 4];
    reader.read_exact(&mut magic)?;
    if &magic != MAGIC {
        return Err(SmsBayesError::corrupt_model("Invalid model magic number"));
    }

    let version = reader.read_u32::<LittleEndian>()?;
    if version != FORMAT_VERSION {
        return Err(SmsBayesError::corrupt_model(format!(
            "Unsupported model format version {version}"
        )));
    }

    let payload_len = reader.read_u64::<LittleEndian>()?;
    let checksum = reader.read_u32::<LittleEndian>()?;
    let payload = &bytes[HEADER_LEN..];

    if payload.len() as u64 != payload_len {
        return Err(SmsBayesError::corrupt_model(format!(
            "Payload length mismatch: header says {payload_len}, found {}",
            payload.len()
        )));
    }
    if crc32fast::hash(payload) != checksum {
        return Err(SmsBayesError::corrupt_model("Checksum mismatch"));
    }

    debug!("Decoding model payload of {payload_len} bytes");
    bincode::DefaultOptions::new()
        .with_limit(payload_len)
        .deserialize(payload)
        .map_err(|e| SmsBayesError::corrupt_model(format!("Undecodable payload: {e}")))
}
