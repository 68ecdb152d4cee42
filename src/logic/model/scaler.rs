//! Standard Scaler
//!
//! Fitted standardization parameters stored as JSON:
//! `{ "mean": [..12], "scale": [..12] }` (the `mean_` / `scale_` attribute
//! names of a fitted scikit-learn `StandardScaler` are accepted too).

use std::path::Path;
use serde::{Deserialize, Serialize};

use crate::logic::features::FEATURE_COUNT;
use super::error::{InferenceError, ModelLoadError};
use super::Scaler;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardScaler {
    #[serde(alias = "mean_")]
    pub mean: Vec<f32>,
    #[serde(alias = "scale_")]
    pub scale: Vec<f32>,
}

impl StandardScaler {
    /// Load and validate a scaler file
    pub fn load(path: &Path) -> Result<Self, ModelLoadError> {
        let data = std::fs::read(path).map_err(|source| ModelLoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&data).map_err(|reason| ModelLoadError::corrupt(path, reason))
    }

    /// Parse scaler parameters, checking both vectors cover every sensor
    pub fn from_json(data: &[u8]) -> Result<Self, String> {
        let scaler: StandardScaler = serde_json::from_slice(data).map_err(|e| e.to_string())?;

        for (name, values) in [("mean", &scaler.mean), ("scale", &scaler.scale)] {
            if values.len() != FEATURE_COUNT {
                return Err(format!(
                    "{} has {} entries, expected {}",
                    name,
                    values.len(),
                    FEATURE_COUNT
                ));
            }
            if values.iter().any(|v| !v.is_finite()) {
                return Err(format!("{} contains non-finite values", name));
            }
        }

        Ok(scaler)
    }
}

impl Scaler for StandardScaler {
    fn transform(&self, features: &[f32; FEATURE_COUNT]) -> Result<[f32; FEATURE_COUNT], InferenceError> {
        let mut scaled = [0.0f32; FEATURE_COUNT];

        for (out, ((value, mean), scale)) in scaled
            .iter_mut()
            .zip(features.iter().zip(&self.mean).zip(&self.scale))
        {
            // Constant features were fitted with zero variance
            let scale = if *scale == 0.0 { 1.0 } else { *scale };
            *out = (value - mean) / scale;
        }

        Ok(scaled)
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn scaler_json(mean: f32, scale: f32) -> String {
        serde_json::json!({
            "mean": vec![mean; FEATURE_COUNT],
            "scale": vec![scale; FEATURE_COUNT],
        })
        .to_string()
    }

    #[test]
    fn test_transform_standardizes() {
        let scaler = StandardScaler::from_json(scaler_json(10.0, 2.0).as_bytes()).unwrap();
        let scaled = scaler.transform(&[14.0; FEATURE_COUNT]).unwrap();
        assert_eq!(scaled, [2.0; FEATURE_COUNT]);
    }

    #[test]
    fn test_transform_is_per_feature() {
        let scaler = StandardScaler {
            mean: (0..FEATURE_COUNT).map(|i| i as f32).collect(),
            scale: (1..=FEATURE_COUNT).map(|i| i as f32).collect(),
        };
        let features: [f32; FEATURE_COUNT] = std::array::from_fn(|i| (2 * i + 1) as f32);

        let scaled = scaler.transform(&features).unwrap();
        for (i, value) in scaled.iter().enumerate() {
            // (2i + 1 - i) / (i + 1) == 1
            assert_eq!(*value, 1.0, "feature {}", i);
        }
    }

    #[test]
    fn test_zero_scale_treated_as_one() {
        let scaler = StandardScaler::from_json(scaler_json(1.0, 0.0).as_bytes()).unwrap();
        let scaled = scaler.transform(&[3.0; FEATURE_COUNT]).unwrap();
        assert_eq!(scaled, [2.0; FEATURE_COUNT]);
    }

    #[test]
    fn test_accepts_sklearn_attribute_names() {
        let json = serde_json::json!({
            "mean_": vec![0.0; FEATURE_COUNT],
            "scale_": vec![1.0; FEATURE_COUNT],
        })
        .to_string();
        assert!(StandardScaler::from_json(json.as_bytes()).is_ok());
    }

    #[test]
    fn test_rejects_wrong_width() {
        let json = serde_json::json!({
            "mean": vec![0.0; 11],
            "scale": vec![1.0; FEATURE_COUNT],
        })
        .to_string();
        let err = StandardScaler::from_json(json.as_bytes()).unwrap_err();
        assert!(err.contains("mean has 11 entries"));
    }

    #[test]
    fn test_rejects_garbage() {
        assert!(StandardScaler::from_json(b"not json").is_err());
        assert!(StandardScaler::from_json(b"{\"mean\": []}").is_err());
    }

    #[test]
    fn test_load_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scaler_reg.json");
        std::fs::write(&path, scaler_json(0.0, 1.0)).unwrap();

        let scaler = StandardScaler::load(&path).unwrap();
        assert_eq!(scaler.mean.len(), FEATURE_COUNT);
    }

    #[test]
    fn test_load_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scaler_clf.json");
        std::fs::write(&path, "{").unwrap();

        assert!(matches!(StandardScaler::load(&path), Err(ModelLoadError::Corrupt { .. })));
    }
}
