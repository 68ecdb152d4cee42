//! Central Configuration Constants
//!
//! Single source of truth for all configuration defaults.
//! Artifact file names are fixed; only the directory is configurable.

/// Default model directory, relative to the working directory
pub const DEFAULT_MODEL_DIR: &str = "model";

/// Regression model
pub const REGRESSOR_FILE: &str = "aqi_regressor.onnx";

/// Scaler fitted for the regressor
pub const REGRESSION_SCALER_FILE: &str = "scaler_reg.json";

/// Classification model
pub const CLASSIFIER_FILE: &str = "aqi_classifier.onnx";

/// Scaler fitted for the classifier
pub const CLASSIFICATION_SCALER_FILE: &str = "scaler_clf.json";

/// Anomaly detector (unscaled input)
pub const ANOMALY_DETECTOR_FILE: &str = "anomaly_detector.onnx";

/// Optional checksums / class names
pub const MANIFEST_FILE: &str = "manifest.json";

/// App version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// App name
pub const APP_NAME: &str = "Smart Air Quality Predictor";

/// Footer credit
pub const APP_CREDIT: &str = "Created by Sahana Paul";

/// Footer project line
pub const APP_PROJECT: &str = "Part of AICTE Internship Project — Environmental Monitoring";
