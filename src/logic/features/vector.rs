//! Feature Vector - Core data structure for ML input
//!
//! Twelve sensor readings in the order defined by `layout.rs`. The length is
//! part of the type, so a vector that reaches a model always has exactly
//! `FEATURE_COUNT` elements.

use serde::{Deserialize, Serialize};
use super::layout::{FEATURE_COUNT, FEATURE_VERSION, SENSOR_LAYOUT, layout_hash};

// ============================================================================
// VERSIONED FEATURE VECTOR
// ============================================================================

/// Versioned Feature Vector with layout metadata
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    /// Feature layout version
    pub version: u8,
    /// CRC32 hash of the sensor layout
    pub layout_hash: u32,
    /// Sensor values in order defined by SENSOR_LAYOUT
    pub values: [f32; FEATURE_COUNT],
}

/// Raised when raw values don't have one entry per sensor
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Expected 12 features, got {0}")]
pub struct VectorShapeError(pub usize);

impl FeatureVector {
    /// Create from raw values with current version
    pub fn from_values(values: [f32; FEATURE_COUNT]) -> Self {
        Self {
            version: FEATURE_VERSION,
            layout_hash: layout_hash(),
            values,
        }
    }

    /// Vector of every sensor's default reading
    #[cfg(test)]
    pub fn defaults() -> Self {
        let mut values = [0.0f32; FEATURE_COUNT];
        for (slot, sensor) in values.iter_mut().zip(SENSOR_LAYOUT.iter()) {
            *slot = sensor.default as f32;
        }
        Self::from_values(values)
    }

    /// Get feature by name
    #[cfg(test)]
    pub fn get_by_name(&self, name: &str) -> Option<f32> {
        super::layout::feature_index(name).and_then(|i| self.values.get(i).copied())
    }

    /// Convert to JSON-serializable format for logging
    pub fn to_log_entry(&self) -> serde_json::Value {
        serde_json::json!({
            "feature_version": self.version,
            "layout_hash": self.layout_hash,
            "named_values": SENSOR_LAYOUT.iter()
                .zip(self.values.iter())
                .map(|(sensor, value)| (sensor.name.to_string(), serde_json::json!(value)))
                .collect::<serde_json::Map<_, _>>(),
        })
    }
}

// ============================================================================
// TESTS
// ============================================================================
