//! Features Module - Sensor Input Panel
//!
//! The sensor layout, the bounded input form and the feature vector handed
//! to the models.

pub mod layout;
pub mod vector;
pub mod form;


// Re-export common types
pub use form::{FormError, SensorForm};
pub use layout::{FEATURE_COUNT, SENSOR_LAYOUT};
pub use vector::FeatureVector;
