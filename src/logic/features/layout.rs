//! Sensor Layout - Centralized Feature Definition
//!
//! **CRITICAL: This file controls the feature schema**
//!
//! ## Rules (NEVER break these):
//! 1. Add sensor → increment FEATURE_VERSION
//! 2. Change order → increment FEATURE_VERSION
//! 3. Remove sensor → increment FEATURE_VERSION
//!
//! The regressor, the classifier, both scalers and the anomaly detector were
//! all fitted on vectors in exactly this order.

use crc32fast::Hasher;
use serde::{Deserialize, Serialize};

// ============================================================================
// FEATURE VERSION
// ============================================================================

/// Current sensor layout version
/// MUST be incremented when layout changes
pub const FEATURE_VERSION: u8 = 1;

/// Total number of sensors
/// IMPORTANT: Must match SENSOR_LAYOUT.len()!
pub const FEATURE_COUNT: usize = 12;

// ============================================================================
// SENSOR SPEC
// ============================================================================

/// One bounded numeric input of the sensor panel
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SensorSpec {
    pub name: &'static str,
    /// Unit shown after the label, e.g. "(°C)"
    pub unit: Option<&'static str>,
    pub min: f64,
    pub max: f64,
    pub default: f64,
    pub step: f64,
}

impl SensorSpec {
    const fn new(
        name: &'static str,
        unit: Option<&'static str>,
        min: f64,
        max: f64,
        default: f64,
        step: f64,
    ) -> Self {
        Self { name, unit, min, max, default, step }
    }

    const fn pollutant(name: &'static str) -> Self {
        Self::new(name, None, 0.0, 500.0, 50.0, 0.1)
    }

    /// Field label as rendered in the panel
    pub fn label(&self) -> String {
        match self.unit {
            Some(unit) => format!("{} value {}", self.name, unit),
            None => format!("{} value", self.name),
        }
    }

    /// Clamp a value into `[min, max]`
    pub fn clamp(&self, value: f64) -> f64 {
        value.clamp(self.min, self.max)
    }

    /// Number of decimals implied by the step (0.1 → 1, 0.01 → 2)
    pub fn precision(&self) -> usize {
        let mut precision = 0;
        let mut step = self.step;
        while step.fract().abs() > 1e-9 && precision < 6 {
            step *= 10.0;
            precision += 1;
        }
        precision
    }
}

// ============================================================================
// SENSOR LAYOUT (Authoritative source)
// ============================================================================

/// Sensors in exact order they appear in the vector
/// This is the SINGLE SOURCE OF TRUTH for feature layout
pub const SENSOR_LAYOUT: [SensorSpec; FEATURE_COUNT] = [
    // === Air pollutants (0-5) ===
    SensorSpec::pollutant("PM2.5"),
    SensorSpec::pollutant("PM10"),
    SensorSpec::pollutant("NO2"),
    SensorSpec::pollutant("CO"),
    SensorSpec::pollutant("O3"),
    SensorSpec::pollutant("SO2"),

    // === Weather (6-8) ===
    SensorSpec::new("Temperature", Some("(°C)"), -50.0, 60.0, 25.0, 0.1),
    SensorSpec::new("Humidity", Some("(%)"), 0.0, 100.0, 50.0, 0.1),
    SensorSpec::new("Wind Speed", Some("(m/s)"), 0.0, 50.0, 2.0, 0.1),

    // === Water (9-11) ===
    SensorSpec::new("pH", None, 0.0, 14.0, 7.0, 0.01),
    SensorSpec::new("Turbidity", None, 0.0, 1000.0, 1.0, 0.1),
    SensorSpec::new("Dissolved Oxygen", None, 0.0, 20.0, 7.0, 0.01),
];

// ============================================================================
// LAYOUT HASH
// ============================================================================

/// Compute CRC32 hash of the sensor layout
/// Used to detect model/layout mismatches at load time
pub fn compute_layout_hash() -> u32 {
    let mut hasher = Hasher::new();

    hasher.update(&[FEATURE_VERSION]);

    // Only names and order matter to the models, not UI ranges
    for sensor in &SENSOR_LAYOUT {
        hasher.update(sensor.name.as_bytes());
        hasher.update(&[0]);
    }

    hasher.finalize()
}

/// Get layout hash
pub fn layout_hash() -> u32 {
    compute_layout_hash()
}

// ============================================================================
// LAYOUT INFO
// ============================================================================

/// Complete layout information for serialization/logging
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutInfo {
    pub version: u8,
    pub hash: u32,
    pub feature_count: usize,
    pub feature_names: Vec<String>,
}

impl LayoutInfo {
    pub fn current() -> Self {
        Self {
            version: FEATURE_VERSION,
            hash: layout_hash(),
            feature_count: FEATURE_COUNT,
            feature_names: SENSOR_LAYOUT.iter().map(|s| s.name.to_string()).collect(),
        }
    }
}

// ============================================================================
// LAYOUT VALIDATION
// ============================================================================

/// Error when a model bundle was built for a different sensor layout
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Feature layout mismatch: expected hash {expected_hash:08x}, got {actual_hash:08x}")]
pub struct LayoutMismatchError {
    pub expected_hash: u32,
    pub actual_hash: u32,
}

/// Validate a layout hash declared by a model bundle
pub fn validate_layout(incoming_hash: u32) -> Result<(), LayoutMismatchError> {
    let current_hash = layout_hash();

    if incoming_hash != current_hash {
        return Err(LayoutMismatchError {
            expected_hash: current_hash,
            actual_hash: incoming_hash,
        });
    }

    Ok(())
}

// ============================================================================
// FEATURE INDEX LOOKUP
// ============================================================================

/// Normalize a sensor name for lookup: "Wind Speed", "wind_speed" and
/// "wind-speed" all match.
fn normalize_name(name: &str) -> String {
    name.trim()
        .chars()
        .filter(|c| !matches!(c, ' ' | '_' | '-'))
        .flat_map(char::to_lowercase)
        .collect()
}

/// Get sensor index by name (case-insensitive)
pub fn feature_index(name: &str) -> Option<usize> {
    let wanted = normalize_name(name);
    SENSOR_LAYOUT
        .iter()
        .position(|s| normalize_name(s.name) == wanted)
}

// ============================================================================
// TESTS
// ============================================================================
