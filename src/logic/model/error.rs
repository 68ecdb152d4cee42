//! Model Errors
//!
//! `ModelLoadError` is fatal and only happens at startup. `InferenceError`
//! aborts a single prediction.

use std::path::PathBuf;

use crate::logic::features::layout::LayoutMismatchError;

// ============================================================================
// STARTUP
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum ModelLoadError {
    #[error("Model artifact not found: {}", .path.display())]
    Missing { path: PathBuf },

    #[error("Failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to deserialize {}: {reason}", .path.display())]
    Corrupt { path: PathBuf, reason: String },

    #[error("Checksum mismatch for {}: expected {expected}, got {actual}", .path.display())]
    ChecksumMismatch {
        path: PathBuf,
        expected: String,
        actual: String,
    },

    #[error("Model bundle was built for another sensor layout: {0}")]
    Layout(#[from] LayoutMismatchError),
}

impl ModelLoadError {
    pub fn corrupt(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        ModelLoadError::Corrupt {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}

// ============================================================================
// INFERENCE
// ============================================================================

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum InferenceError {
    #[error("{model}: {message}")]
    Runtime { model: &'static str, message: String },

    #[error("{model}: output '{output}' not found")]
    MissingOutput { model: &'static str, output: String },

    #[error("{model}: empty output")]
    EmptyOutput { model: &'static str },

    #[error("{model}: unsupported output element type for this model")]
    UnsupportedOutput { model: &'static str },
}

impl InferenceError {
    pub fn runtime(model: &'static str, message: impl ToString) -> Self {
        InferenceError::Runtime {
            model,
            message: message.to_string(),
        }
    }
}
