//! Model Module - AI/ML Inference Engine
//!
//! The five artifacts behind the predictor and the capabilities the pipeline
//! needs from them. Concrete implementations: `StandardScaler` (JSON) and the
//! ONNX-backed regressor, classifier and anomaly detector.

pub mod error;
pub mod manifest;
pub mod onnx;
pub mod scaler;
pub mod store;

use std::fmt;
use serde::{Deserialize, Serialize};

use crate::logic::features::FEATURE_COUNT;

// Re-export common types
pub use error::{InferenceError, ModelLoadError};
pub use store::ModelStore;

/// Detector label meaning "outlier"
pub const OUTLIER_LABEL: i64 = -1;

// ============================================================================
// MODEL CAPABILITIES
// ============================================================================

/// Fitted feature transform applied before a specific model
pub trait Scaler: Send + Sync {
    fn transform(&self, features: &[f32; FEATURE_COUNT]) -> Result<[f32; FEATURE_COUNT], InferenceError>;
}

/// Continuous AQI estimate
pub trait Regressor: Send + Sync {
    fn predict(&self, features: &[f32; FEATURE_COUNT]) -> Result<f64, InferenceError>;
}

/// Categorical air-quality label
pub trait Classifier: Send + Sync {
    fn predict(&self, features: &[f32; FEATURE_COUNT]) -> Result<ClassLabel, InferenceError>;
}

/// Discrete inlier/outlier label; `OUTLIER_LABEL` marks an anomaly
pub trait OutlierDetector: Send + Sync {
    fn predict(&self, features: &[f32; FEATURE_COUNT]) -> Result<i64, InferenceError>;
}

// ============================================================================
// CLASS LABEL
// ============================================================================

/// Classifier output, displayed as-is
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ClassLabel {
    Integer(i64),
    Number(f64),
    Text(String),
}

impl fmt::Display for ClassLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClassLabel::Integer(v) => write!(f, "{}", v),
            ClassLabel::Number(v) => write!(f, "{}", v),
            ClassLabel::Text(v) => f.write_str(v),
        }
    }
}
