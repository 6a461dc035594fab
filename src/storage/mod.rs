//! Persistence of trained models and atomic file replacement.

pub mod atomic;
pub mod model_file;

// Re-export commonly used types
pub use atomic::{write_atomic, write_atomic_with};
pub use model_file::{FORMAT_VERSION, MAGIC, load_model, save_model};
