//! Text analysis for smsbayes.
//!
//! This module turns raw message text into the token stream the
//! bag-of-words vectorizer counts. The pipeline is:
//!
//! ```text
//! Raw Text → Tokenizer (\w+) → LowercaseFilter → Tokens
//! ```

pub mod analyzer;
pub mod token;
pub mod token_filter;
pub mod tokenizer;

// Re-export commonly used types
pub use analyzer::*;
pub use token::*;
pub use token_filter::*;
pub use tokenizer::*;
