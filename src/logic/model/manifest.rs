//! Model Manifest - optional `manifest.json` next to the artifacts
//!
//! ```json
//! {
//!   "layout_hash": 305419896,
//!   "class_names": { "0": "Good", "1": "Moderate" },
//!   "checksums": { "aqi_regressor.onnx": "9f86d08..." }
//! }
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use super::error::ModelLoadError;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelManifest {
    /// CRC32 of the sensor layout the bundle was trained on
    pub layout_hash: Option<u32>,
    /// Classifier display names keyed by integer label
    pub class_names: BTreeMap<String, String>,
    /// Lowercase hex SHA-256 per artifact file name
    pub checksums: BTreeMap<String, String>,
}

impl ModelManifest {
    /// Load manifest if present. A missing manifest is not an error.
    pub fn load_optional(path: &Path) -> Result<Option<Self>, ModelLoadError> {
        if !path.exists() {
            log::info!("No model manifest at {} - skipping integrity checks", path.display());
            return Ok(None);
        }

        let data = fs::read(path).map_err(|source| ModelLoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let manifest = serde_json::from_slice(&data)
            .map_err(|e| ModelLoadError::corrupt(path, e))?;

        Ok(Some(manifest))
    }

    /// Verify an artifact against its listed checksum, if any.
    /// Returns the computed digest.
    pub fn verify(&self, file_name: &str, path: &Path) -> Result<String, ModelLoadError> {
        let actual = sha256_file(path)?;

        if let Some(expected) = self.checksums.get(file_name) {
            if !expected.eq_ignore_ascii_case(&actual) {
                return Err(ModelLoadError::ChecksumMismatch {
                    path: path.to_path_buf(),
                    expected: expected.clone(),
                    actual,
                });
            }
            log::debug!("Checksum verified for {}", file_name);
        }

        Ok(actual)
    }
}

/// SHA-256 of a file as lowercase hex
pub fn sha256_file(path: &Path) -> Result<String, ModelLoadError> {
    let io_err = |source: std::io::Error| ModelLoadError::Io {
        path: path.to_path_buf(),
        source,
    };

    let mut file = fs::File::open(path).map_err(io_err)?;
    let mut hasher = Sha256::new();
    let mut buffer = [0u8; 8192];

    loop {
        let bytes_read = file.read(&mut buffer).map_err(io_err)?;

        if bytes_read == 0 {
            break;
        }

        hasher.update(&buffer[..bytes_read]);
    }

    Ok(hex::encode(hasher.finalize()))
}

// ============================================================================
// TESTS
// ============================================================================
