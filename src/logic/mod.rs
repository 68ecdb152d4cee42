//! Logic Module - Business Logic & Engines
//!
//! - `features/` - sensor layout, input form, feature vector
//! - `model/` - model artifacts and the store that loads them
//! - `category` - AQI breakpoint mapping
//! - `pipeline` - detector → regressor → classifier

pub mod category;
pub mod features;
pub mod model;
pub mod pipeline;
