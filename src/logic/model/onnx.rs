//! ONNX Models - ONNX Runtime Integration
//!
//! The regressor, the classifier and the anomaly detector are exported to
//! ONNX and run through ONNX Runtime. Each takes a single `[1, 12]` float
//! tensor.

use std::collections::BTreeMap;
use std::path::Path;

use ndarray::Array2;
use parking_lot::Mutex;
use ort::session::{Session, builder::GraphOptimizationLevel};
use ort::value::Value;

use crate::logic::features::FEATURE_COUNT;
use super::error::{InferenceError, ModelLoadError};
use super::{ClassLabel, Classifier, OutlierDetector, Regressor, OUTLIER_LABEL};

/// Output name used by exported classifiers and detectors
const LABEL_OUTPUT: &str = "label";

// ============================================================================
// SESSION
// ============================================================================

/// Output tensor copied out of the session
#[derive(Debug, Clone, PartialEq)]
enum OutputData {
    Float(Vec<f64>),
    Int(Vec<i64>),
    Text(Vec<String>),
}

/// Which session output a model role reads
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OutputChoice {
    First,
    Named(&'static str),
}

fn select_output<'a>(names: impl IntoIterator<Item = &'a str>, choice: OutputChoice) -> Option<String> {
    let mut names = names.into_iter();
    let found = match choice {
        OutputChoice::First => names.next(),
        OutputChoice::Named(wanted) => names.find(|name| *name == wanted),
    };
    found.map(str::to_string)
}

/// A loaded ONNX session.
///
/// `Session::run` needs exclusive access, so the session is behind a mutex.
/// Nothing about the model changes after load.
pub struct OnnxModel {
    name: &'static str,
    session: Mutex<Session>,
}

impl std::fmt::Debug for OnnxModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OnnxModel").field("name", &self.name).finish()
    }
}

impl OnnxModel {
    /// Load an ONNX model from file
    pub fn load(name: &'static str, path: &Path) -> Result<Self, ModelLoadError> {
        log::info!("Loading ONNX model '{}' from: {}", name, path.display());

        if !path.exists() {
            return Err(ModelLoadError::Missing { path: path.to_path_buf() });
        }

        let session = Session::builder()
            .map_err(|e| ModelLoadError::corrupt(path, format!("Failed to create session builder: {}", e)))?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .map_err(|e| ModelLoadError::corrupt(path, format!("Failed to set optimization: {}", e)))?
            .commit_from_file(path)
            .map_err(|e| ModelLoadError::corrupt(path, format!("Failed to load model: {}", e)))?;

        log::info!("ONNX model '{}' loaded successfully", name);

        Ok(Self {
            name,
            session: Mutex::new(session),
        })
    }

    /// Run one vector and copy out the chosen output
    fn run(&self, features: &[f32; FEATURE_COUNT], choice: OutputChoice) -> Result<OutputData, InferenceError> {
        let input_array = Array2::<f32>::from_shape_vec((1, FEATURE_COUNT), features.to_vec())
            .map_err(|e| InferenceError::runtime(self.name, format!("Array error: {}", e)))?;

        let mut session = self.session.lock();

        let output_name = select_output(session.outputs.iter().map(|o| o.name.as_str()), choice)
            .ok_or_else(|| InferenceError::MissingOutput {
                model: self.name,
                output: match choice {
                    OutputChoice::First => "<first>".to_string(),
                    OutputChoice::Named(name) => name.to_string(),
                },
            })?;

        let input_tensor = Value::from_array(input_array)
            .map_err(|e| InferenceError::runtime(self.name, format!("Tensor error: {}", e)))?;

        let outputs = session
            .run(ort::inputs![input_tensor])
            .map_err(|e| InferenceError::runtime(self.name, format!("Inference failed: {}", e)))?;

        let output = outputs.get(&output_name).ok_or_else(|| InferenceError::MissingOutput {
            model: self.name,
            output: output_name.clone(),
        })?;

        if let Ok((_, data)) = output.try_extract_tensor::<f32>() {
            return Ok(OutputData::Float(data.iter().map(|v| *v as f64).collect()));
        }
        if let Ok((_, data)) = output.try_extract_tensor::<f64>() {
            return Ok(OutputData::Float(data.to_vec()));
        }
        if let Ok((_, data)) = output.try_extract_tensor::<i64>() {
            return Ok(OutputData::Int(data.to_vec()));
        }
        // Classifiers trained on category names emit string labels
        if let Ok((_, data)) = output.try_extract_strings() {
            return Ok(OutputData::Text(data));
        }

        Err(InferenceError::UnsupportedOutput { model: self.name })
    }
}

// ============================================================================
// OUTPUT CONVERSION
// ============================================================================

fn regression_value(model: &'static str, output: OutputData) -> Result<f64, InferenceError> {
    let value = match output {
        OutputData::Float(values) => values.first().copied(),
        OutputData::Int(values) => values.first().map(|v| *v as f64),
        OutputData::Text(_) => return Err(InferenceError::UnsupportedOutput { model }),
    };
    value.ok_or(InferenceError::EmptyOutput { model })
}

/// First label, renamed through `class_names` when a name is configured
fn class_label(
    model: &'static str,
    output: OutputData,
    class_names: &BTreeMap<String, String>,
) -> Result<ClassLabel, InferenceError> {
    let label = match output {
        OutputData::Int(values) => values.first().map(|v| ClassLabel::Integer(*v)),
        OutputData::Float(values) => values.first().map(|v| ClassLabel::Number(*v)),
        OutputData::Text(values) => values.into_iter().next().map(ClassLabel::Text),
    }
    .ok_or(InferenceError::EmptyOutput { model })?;

    Ok(match class_names.get(&label.to_string()) {
        Some(name) => ClassLabel::Text(name.clone()),
        None => label,
    })
}

fn outlier_label(model: &'static str, output: OutputData) -> Result<i64, InferenceError> {
    let label = match output {
        OutputData::Int(values) => values.first().copied(),
        OutputData::Float(values) => values.first().map(|v| {
            if *v < 0.0 { OUTLIER_LABEL } else { 1 }
        }),
        OutputData::Text(_) => return Err(InferenceError::UnsupportedOutput { model }),
    };
    label.ok_or(InferenceError::EmptyOutput { model })
}

// ============================================================================
// MODEL ROLES
// ============================================================================

/// Regressor: first output, first element is the AQI estimate
#[derive(Debug)]
pub struct OnnxRegressor(pub OnnxModel);

impl Regressor for OnnxRegressor {
    fn predict(&self, features: &[f32; FEATURE_COUNT]) -> Result<f64, InferenceError> {
        let output = self.0.run(features, OutputChoice::First)?;
        regression_value(self.0.name, output)
    }
}

/// Classifier: the `label` output, optionally mapped to display names
#[derive(Debug)]
pub struct OnnxClassifier {
    pub model: OnnxModel,
    /// Display names keyed by the rendered label ("0" → "Good")
    pub class_names: BTreeMap<String, String>,
}

impl Classifier for OnnxClassifier {
    fn predict(&self, features: &[f32; FEATURE_COUNT]) -> Result<ClassLabel, InferenceError> {
        // Never fall back to `probabilities`
        let output = self.model.run(features, OutputChoice::Named(LABEL_OUTPUT))?;
        class_label(self.model.name, output, &self.class_names)
    }
}

/// Anomaly detector: the `label` output, -1 for outliers
#[derive(Debug)]
pub struct OnnxOutlierDetector(pub OnnxModel);

impl OutlierDetector for OnnxOutlierDetector {
    fn predict(&self, features: &[f32; FEATURE_COUNT]) -> Result<i64, InferenceError> {
        let output = self.0.run(features, OutputChoice::Named(LABEL_OUTPUT))?;
        outlier_label(self.0.name, output)
    }
}

// ============================================================================
// TESTS
// ============================================================================
