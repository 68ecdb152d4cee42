//! Model Store
//!
//! Loads the five artifacts once at startup and hands out an immutable
//! handle. Any missing or unreadable artifact fails the whole load.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::constants::{
    ANOMALY_DETECTOR_FILE, CLASSIFICATION_SCALER_FILE, CLASSIFIER_FILE, MANIFEST_FILE,
    REGRESSION_SCALER_FILE, REGRESSOR_FILE,
};
use crate::logic::features::layout::{validate_layout, LayoutInfo};
use super::error::ModelLoadError;
use super::manifest::ModelManifest;
use super::onnx::{OnnxClassifier, OnnxModel, OnnxOutlierDetector, OnnxRegressor};
use super::scaler::StandardScaler;
use super::{Classifier, OutlierDetector, Regressor, Scaler};

/// Artifact roles in load order
const ARTIFACTS: [(&str, &str); 5] = [
    ("aqi_regressor", REGRESSOR_FILE),
    ("scaler_reg", REGRESSION_SCALER_FILE),
    ("aqi_classifier", CLASSIFIER_FILE),
    ("scaler_clf", CLASSIFICATION_SCALER_FILE),
    ("anomaly_detector", ANOMALY_DETECTOR_FILE),
];

// ============================================================================
// METADATA
// ============================================================================

/// One loaded artifact, for status display
#[derive(Debug, Clone, Serialize)]
pub struct ArtifactInfo {
    pub name: &'static str,
    pub path: PathBuf,
    /// Present when checksums were computed at load
    pub sha256: Option<String>,
}

/// What was loaded, from where, and when
#[derive(Debug, Clone, Serialize)]
pub struct StoreMetadata {
    pub model_dir: PathBuf,
    pub artifacts: Vec<ArtifactInfo>,
    pub manifest_found: bool,
    pub layout: LayoutInfo,
    pub loaded_at: DateTime<Utc>,
}

// ============================================================================
// STORE
// ============================================================================

/// Immutable, shareable set of models used by every prediction
pub struct ModelStore {
    regressor: Box<dyn Regressor>,
    regression_scaler: Box<dyn Scaler>,
    classifier: Box<dyn Classifier>,
    classification_scaler: Box<dyn Scaler>,
    anomaly_detector: Box<dyn OutlierDetector>,
    metadata: StoreMetadata,
}

impl std::fmt::Debug for ModelStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelStore").field("metadata", &self.metadata).finish()
    }
}

impl ModelStore {
    /// Load every artifact from `model_dir`.
    ///
    /// All files are checked for presence (and checksums, when enabled)
    /// before anything is deserialized.
    pub fn load(model_dir: &Path, verify_checksums: bool) -> Result<Self, ModelLoadError> {
        log::info!("Loading model artifacts from {}", model_dir.display());

        let manifest = ModelManifest::load_optional(&model_dir.join(MANIFEST_FILE))?;
        let manifest_found = manifest.is_some();
        let manifest = manifest.unwrap_or_default();

        if let Some(hash) = manifest.layout_hash {
            validate_layout(hash)?;
        }

        let mut artifacts = Vec::with_capacity(ARTIFACTS.len());
        for (name, file) in ARTIFACTS {
            let path = model_dir.join(file);
            if !path.is_file() {
                return Err(ModelLoadError::Missing { path });
            }

            let sha256 = if verify_checksums {
                Some(manifest.verify(file, &path)?)
            } else {
                None
            };

            artifacts.push(ArtifactInfo { name, path, sha256 });
        }

        let path_of = |file: &str| model_dir.join(file);

        let regression_scaler = StandardScaler::load(&path_of(REGRESSION_SCALER_FILE))?;
        let classification_scaler = StandardScaler::load(&path_of(CLASSIFICATION_SCALER_FILE))?;
        let regressor = OnnxRegressor(OnnxModel::load("aqi_regressor", &path_of(REGRESSOR_FILE))?);
        let classifier = OnnxClassifier {
            model: OnnxModel::load("aqi_classifier", &path_of(CLASSIFIER_FILE))?,
            class_names: manifest.class_names.clone(),
        };
        let anomaly_detector =
            OnnxOutlierDetector(OnnxModel::load("anomaly_detector", &path_of(ANOMALY_DETECTOR_FILE))?);

        log::info!("All {} model artifacts loaded", artifacts.len());

        Ok(Self {
            regressor: Box::new(regressor),
            regression_scaler: Box::new(regression_scaler),
            classifier: Box::new(classifier),
            classification_scaler: Box::new(classification_scaler),
            anomaly_detector: Box::new(anomaly_detector),
            metadata: StoreMetadata {
                model_dir: model_dir.to_path_buf(),
                artifacts,
                manifest_found,
                layout: LayoutInfo::current(),
                loaded_at: Utc::now(),
            },
        })
    }

    /// Assemble a store from already-built models
    #[cfg(test)]
    pub fn from_parts(
        regressor: Box<dyn Regressor>,
        regression_scaler: Box<dyn Scaler>,
        classifier: Box<dyn Classifier>,
        classification_scaler: Box<dyn Scaler>,
        anomaly_detector: Box<dyn OutlierDetector>,
    ) -> Self {
        Self {
            regressor,
            regression_scaler,
            classifier,
            classification_scaler,
            anomaly_detector,
            metadata: StoreMetadata {
                model_dir: PathBuf::from("<memory>"),
                artifacts: Vec::new(),
                manifest_found: false,
                layout: LayoutInfo::current(),
                loaded_at: Utc::now(),
            },
        }
    }

    pub fn regressor(&self) -> &dyn Regressor {
        self.regressor.as_ref()
    }

    pub fn regression_scaler(&self) -> &dyn Scaler {
        self.regression_scaler.as_ref()
    }

    pub fn classifier(&self) -> &dyn Classifier {
        self.classifier.as_ref()
    }

    pub fn classification_scaler(&self) -> &dyn Scaler {
        self.classification_scaler.as_ref()
    }

    pub fn anomaly_detector(&self) -> &dyn OutlierDetector {
        self.anomaly_detector.as_ref()
    }

    pub fn metadata(&self) -> &StoreMetadata {
        &self.metadata
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::features::layout::layout_hash;
    use crate::logic::features::FEATURE_COUNT;
    use std::fs;

    fn write_scaler(dir: &Path, file: &str) {
        let json = serde_json::json!({
            "mean": vec![0.0; FEATURE_COUNT],
            "scale": vec![1.0; FEATURE_COUNT],
        });
        fs::write(dir.join(file), json.to_string()).unwrap();
    }

    /// All five files present; the ONNX ones are placeholders
    fn write_bundle(dir: &Path) {
        fs::write(dir.join(REGRESSOR_FILE), b"onnx-regressor").unwrap();
        fs::write(dir.join(CLASSIFIER_FILE), b"onnx-classifier").unwrap();
        fs::write(dir.join(ANOMALY_DETECTOR_FILE), b"onnx-detector").unwrap();
        write_scaler(dir, REGRESSION_SCALER_FILE);
        write_scaler(dir, CLASSIFICATION_SCALER_FILE);
    }

    #[test]
    fn test_empty_dir_reports_first_missing_artifact() {
        let dir = tempfile::tempdir().unwrap();

        match ModelStore::load(dir.path(), true) {
            Err(ModelLoadError::Missing { path }) => {
                assert_eq!(path, dir.path().join(REGRESSOR_FILE));
            }
            other => panic!("Expected Missing error, got {:?}", other),
        }
    }

    #[test]
    fn test_single_missing_artifact() {
        let dir = tempfile::tempdir().unwrap();
        write_bundle(dir.path());
        fs::remove_file(dir.path().join(ANOMALY_DETECTOR_FILE)).unwrap();

        match ModelStore::load(dir.path(), false) {
            Err(ModelLoadError::Missing { path }) => {
                assert!(path.ends_with(ANOMALY_DETECTOR_FILE));
            }
            other => panic!("Expected Missing error, got {:?}", other),
        }
    }

    #[test]
    fn test_layout_mismatch_rejected() {
        let dir = tempfile::tempdir().unwrap();
        write_bundle(dir.path());
        let manifest = serde_json::json!({ "layout_hash": layout_hash().wrapping_add(1) });
        fs::write(dir.path().join(MANIFEST_FILE), manifest.to_string()).unwrap();

        assert!(matches!(
            ModelStore::load(dir.path(), true),
            Err(ModelLoadError::Layout(_))
        ));
    }

    #[test]
    fn test_checksum_mismatch_rejected() {
        let dir = tempfile::tempdir().unwrap();
        write_bundle(dir.path());
        let manifest = serde_json::json!({
            "layout_hash": layout_hash(),
            "checksums": { REGRESSOR_FILE: "00".repeat(32) },
        });
        fs::write(dir.path().join(MANIFEST_FILE), manifest.to_string()).unwrap();

        match ModelStore::load(dir.path(), true) {
            Err(ModelLoadError::ChecksumMismatch { path, .. }) => {
                assert!(path.ends_with(REGRESSOR_FILE));
            }
            other => panic!("Expected ChecksumMismatch error, got {:?}", other),
        }
    }

    #[test]
    fn test_corrupt_scaler_rejected() {
        let dir = tempfile::tempdir().unwrap();
        write_bundle(dir.path());
        fs::write(dir.path().join(CLASSIFICATION_SCALER_FILE), "{\"mean\": [1.0]}").unwrap();

        match ModelStore::load(dir.path(), false) {
            Err(ModelLoadError::Corrupt { path, .. }) => {
                assert!(path.ends_with(CLASSIFICATION_SCALER_FILE));
            }
            other => panic!("Expected Corrupt error, got {:?}", other),
        }
    }

    #[test]
    fn test_corrupt_manifest_rejected() {
        let dir = tempfile::tempdir().unwrap();
        write_bundle(dir.path());
        fs::write(dir.path().join(MANIFEST_FILE), "not json").unwrap();

        assert!(matches!(
            ModelStore::load(dir.path(), true),
            Err(ModelLoadError::Corrupt { .. })
        ));
    }
}
