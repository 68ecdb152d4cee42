//! AQI Category Mapper
//!
//! Fixed breakpoints over the regressor's continuous estimate. The chain is
//! evaluated top-down with `<=`, so a breakpoint value belongs to the lower
//! category. Values are not clamped: anything below zero is still "Good".

use std::fmt;
use serde::{Deserialize, Serialize};

/// Upper bounds (inclusive) of the first five categories
pub const BREAKPOINTS: [f64; 5] = [50.0, 100.0, 150.0, 200.0, 300.0];

/// Ordinal air-quality category
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum AqiCategory {
    Good,
    Moderate,
    UnhealthySensitive,
    Unhealthy,
    VeryUnhealthy,
    Hazardous,
}

impl AqiCategory {
    /// All categories, least to most severe
    pub const ALL: [AqiCategory; 6] = [
        AqiCategory::Good,
        AqiCategory::Moderate,
        AqiCategory::UnhealthySensitive,
        AqiCategory::Unhealthy,
        AqiCategory::VeryUnhealthy,
        AqiCategory::Hazardous,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            AqiCategory::Good => "Good",
            AqiCategory::Moderate => "Moderate",
            AqiCategory::UnhealthySensitive => "Unhealthy for Sensitive Groups",
            AqiCategory::Unhealthy => "Unhealthy",
            AqiCategory::VeryUnhealthy => "Very Unhealthy",
            AqiCategory::Hazardous => "Hazardous",
        }
    }

    /// Colored marker shown next to the value
    pub fn marker(&self) -> &'static str {
        match self {
            AqiCategory::Good => "🟢",
            AqiCategory::Moderate => "🟡",
            AqiCategory::UnhealthySensitive => "🟠",
            AqiCategory::Unhealthy => "🔴",
            AqiCategory::VeryUnhealthy => "🟣",
            AqiCategory::Hazardous => "⚫",
        }
    }
}

impl fmt::Display for AqiCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Map an AQI estimate to its category.
///
/// NaN fails every comparison and lands on `Hazardous`.
pub fn map_category(aqi: f64) -> AqiCategory {
    BREAKPOINTS
        .iter()
        .zip(AqiCategory::ALL.iter())
        .find(|(bound, _)| aqi <= **bound)
        .map(|(_, category)| *category)
        .unwrap_or(AqiCategory::Hazardous)
}

// ============================================================================
// TESTS
// ============================================================================
