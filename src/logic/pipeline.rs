//! Inference Pipeline
//!
//! One explicit trigger → one `PredictionResult`. Order is fixed: anomaly
//! detector on the raw vector, regressor on the regression-scaled vector,
//! classifier on the classification-scaled vector. The first error aborts
//! the run; nothing partial is returned.

use std::time::Instant;

use serde::Serialize;

use crate::logic::category::{map_category, AqiCategory};
use crate::logic::features::FeatureVector;
use crate::logic::model::{ClassLabel, InferenceError, ModelStore, OUTLIER_LABEL};

/// Combined output of the three models
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionResult {
    /// Detector returned the outlier sentinel
    pub anomaly: bool,
    /// Regressor estimate, unclamped
    pub aqi_value: f64,
    /// Breakpoint category of `aqi_value`
    pub aqi_category: AqiCategory,
    /// Classifier's own label; may disagree with `aqi_category`
    pub classifier_label: ClassLabel,
}

/// Run all three models over one feature vector
pub fn predict(store: &ModelStore, vector: &FeatureVector) -> Result<PredictionResult, InferenceError> {
    let start_time = Instant::now();
    let raw = &vector.values;

    let anomaly = store.anomaly_detector().predict(raw)? == OUTLIER_LABEL;

    let scaled_reg = store.regression_scaler().transform(raw)?;
    let aqi_value = store.regressor().predict(&scaled_reg)?;

    let scaled_clf = store.classification_scaler().transform(raw)?;
    let classifier_label = store.classifier().predict(&scaled_clf)?;

    let aqi_category = map_category(aqi_value);

    log::info!(
        "Prediction: aqi={:.2} category={} classifier={} anomaly={} ({}us)",
        aqi_value,
        aqi_category,
        classifier_label,
        anomaly,
        start_time.elapsed().as_micros()
    );
    log::debug!("Input: {}", vector.to_log_entry());

    Ok(PredictionResult {
        anomaly,
        aqi_value,
        aqi_category,
        classifier_label,
    })
}

// ============================================================================
// TESTS
// ============================================================================
