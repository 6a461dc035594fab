//! Labelled message datasets.
//!
//! A [`Dataset`] is an ordered sequence of [`Document`]s sharing the fixed
//! [`Schema`] (`label {spam,ham}`, `text string`). Datasets come either from
//! the raw line-oriented corpus ([`raw`]) or from the ARFF cache ([`arff`]).

#[allow(clippy::module_inception)]
pub mod dataset;
pub mod document;
pub mod schema;

pub mod arff;
pub mod raw;

// Re-export commonly used types
pub use arff::{load_arff, load_cached_or_raw, save_arff};
pub use dataset::{DEFAULT_RELATION, Dataset};
pub use document::{Document, Label};
pub use raw::{RawLoadReport, load_raw, parse_raw};
pub use schema::{Attribute, AttributeKind, Schema};
