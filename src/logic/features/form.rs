//! Sensor Form - input panel state
//!
//! Holds the current value of every sensor field. Every write goes through
//! the field's range clamp, so whatever `vector()` returns is already inside
//! each sensor's domain. Editing never triggers inference.

use super::layout::{feature_index, SensorSpec, FEATURE_COUNT, SENSOR_LAYOUT};
use super::vector::{FeatureVector, VectorShapeError};

/// Edit rejected at the input boundary
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FormError {
    #[error("Unknown sensor field: {0}")]
    UnknownField(String),

    #[error("{field} only accepts finite numbers")]
    NotFinite { field: &'static str },

    #[error(transparent)]
    Shape(#[from] VectorShapeError),
}

/// Current values of the twelve sensor inputs
#[derive(Debug, Clone, PartialEq)]
pub struct SensorForm {
    values: [f64; FEATURE_COUNT],
}

impl SensorForm {
    /// All fields at their defaults
    pub fn new() -> Self {
        let mut values = [0.0; FEATURE_COUNT];
        for (slot, sensor) in values.iter_mut().zip(SENSOR_LAYOUT.iter()) {
            *slot = sensor.default;
        }
        Self { values }
    }

    /// Resolve a field by 1-based position ("10") or by name ("pH").
    pub fn resolve(field: &str) -> Result<usize, FormError> {
        let field = field.trim();
        if let Ok(position) = field.parse::<usize>() {
            if (1..=FEATURE_COUNT).contains(&position) {
                return Ok(position - 1);
            }
        }
        feature_index(field).ok_or_else(|| FormError::UnknownField(field.to_string()))
    }

    pub fn spec(index: usize) -> Result<&'static SensorSpec, FormError> {
        SENSOR_LAYOUT
            .get(index)
            .ok_or_else(|| FormError::UnknownField(format!("#{}", index + 1)))
    }

    /// Current value of a field
    #[cfg(test)]
    pub fn value(&self, index: usize) -> Option<f64> {
        self.values.get(index).copied()
    }

    pub fn values(&self) -> &[f64; FEATURE_COUNT] {
        &self.values
    }

    /// Store a value, clamped into the sensor's range. Returns what was stored.
    pub fn set(&mut self, index: usize, value: f64) -> Result<f64, FormError> {
        let spec = Self::spec(index)?;
        if !value.is_finite() {
            return Err(FormError::NotFinite { field: spec.name });
        }

        let stored = spec.clamp(value);
        if stored != value {
            log::debug!("{} clamped from {} to {}", spec.name, value, stored);
        }
        self.values[index] = stored;
        Ok(stored)
    }

    /// Replace every field at once, in sensor order. Nothing is written
    /// unless all values are accepted.
    pub fn set_all(&mut self, values: &[f64]) -> Result<(), FormError> {
        if values.len() != FEATURE_COUNT {
            return Err(VectorShapeError(values.len()).into());
        }

        let mut next = self.clone();
        for (index, &value) in values.iter().enumerate() {
            next.set(index, value)?;
        }
        *self = next;
        Ok(())
    }

    /// Spinner "+" button
    pub fn step_up(&mut self, index: usize) -> Result<f64, FormError> {
        self.step(index, 1.0)
    }

    /// Spinner "-" button
    pub fn step_down(&mut self, index: usize) -> Result<f64, FormError> {
        self.step(index, -1.0)
    }

    fn step(&mut self, index: usize, direction: f64) -> Result<f64, FormError> {
        let spec = Self::spec(index)?;
        let scale = 10f64.powi(spec.precision() as i32);
        let next = self.values[index] + direction * spec.step;
        self.set(index, (next * scale).round() / scale)
    }

    /// Restore every default
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Snapshot of the current state as a model input
    pub fn vector(&self) -> FeatureVector {
        let mut values = [0.0f32; FEATURE_COUNT];
        for (slot, value) in values.iter_mut().zip(self.values.iter()) {
            *slot = *value as f32;
        }
        FeatureVector::from_values(values)
    }
}

impl Default for SensorForm {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const PH: usize = 9;

    #[test]
    fn test_new_form_holds_defaults() {
        let form = SensorForm::new();
        assert_eq!(form.vector(), FeatureVector::defaults());
    }

    #[test]
    fn test_ph_clamped_to_max() {
        let mut form = SensorForm::new();
        assert_eq!(form.set(PH, 15.0), Ok(14.0));
        assert_eq!(form.value(PH), Some(14.0));
        assert_eq!(form.vector().get_by_name("pH"), Some(14.0));
    }

    #[test]
    fn test_temperature_clamped_to_min() {
        let mut form = SensorForm::new();
        let index = SensorForm::resolve("Temperature").unwrap();
        assert_eq!(form.set(index, -80.0), Ok(-50.0));
    }

    #[test]
    fn test_non_finite_rejected() {
        let mut form = SensorForm::new();
        assert_eq!(
            form.set(PH, f64::NAN),
            Err(FormError::NotFinite { field: "pH" })
        );
        assert!(form.set(PH, f64::INFINITY).is_err());
        assert_eq!(form.value(PH), Some(7.0));
    }

    #[test]
    fn test_resolve_by_position_and_name() {
        assert_eq!(SensorForm::resolve("1"), Ok(0));
        assert_eq!(SensorForm::resolve("12"), Ok(11));
        assert_eq!(SensorForm::resolve("pm2.5"), Ok(0));
        assert_eq!(SensorForm::resolve("dissolved_oxygen"), Ok(11));
        assert!(matches!(SensorForm::resolve("13"), Err(FormError::UnknownField(_))));
        assert!(matches!(SensorForm::resolve("0"), Err(FormError::UnknownField(_))));
        assert!(matches!(SensorForm::resolve("lead"), Err(FormError::UnknownField(_))));
    }

    #[test]
    fn test_unknown_index() {
        let mut form = SensorForm::new();
        assert!(form.set(FEATURE_COUNT, 1.0).is_err());
    }

    #[test]
    fn test_step_up_and_down() {
        let mut form = SensorForm::new();
        assert_eq!(form.step_up(PH), Ok(7.01));
        assert_eq!(form.step_down(PH), Ok(7.0));
        assert_eq!(form.step_down(PH), Ok(6.99));

        // PM2.5 steps by 0.1
        assert_eq!(form.step_up(0), Ok(50.1));
    }

    #[test]
    fn test_step_clamps_at_bounds() {
        let mut form = SensorForm::new();
        form.set(PH, 14.0).unwrap();
        assert_eq!(form.step_up(PH), Ok(14.0));

        form.set(0, 0.0).unwrap();
        assert_eq!(form.step_down(0), Ok(0.0));
    }

    #[test]
    fn test_set_all_clamps_each_field() {
        let mut form = SensorForm::new();
        let values = [600.0, 10.0, 10.0, 10.0, 10.0, 10.0, 20.0, 40.0, 3.0, 15.0, 2.0, 8.0];
        form.set_all(&values).unwrap();

        assert_eq!(form.value(0), Some(500.0));
        assert_eq!(form.value(PH), Some(14.0));
        assert_eq!(form.value(11), Some(8.0));
    }

    #[test]
    fn test_set_all_wrong_length_leaves_form_untouched() {
        let mut form = SensorForm::new();
        let result = form.set_all(&[1.0; 11]);
        assert_eq!(result, Err(FormError::Shape(VectorShapeError(11))));
        assert_eq!(form, SensorForm::new());
    }

    #[test]
    fn test_set_all_is_atomic() {
        let mut form = SensorForm::new();
        let mut values = [1.0; FEATURE_COUNT];
        values[5] = f64::NAN;
        assert!(form.set_all(&values).is_err());
        assert_eq!(form, SensorForm::new());
    }

    #[test]
    fn test_reset() {
        let mut form = SensorForm::new();
        form.set(PH, 3.0).unwrap();
        form.reset();
        assert_eq!(form, SensorForm::new());
    }

    #[test]
    fn test_vector_always_in_range() {
        let mut form = SensorForm::new();
        for index in 0..FEATURE_COUNT {
            form.set(index, 1.0e9).unwrap();
        }
        let vector = form.vector();
        for (value, sensor) in vector.values.iter().zip(SENSOR_LAYOUT.iter()) {
            assert!((*value as f64) <= sensor.max);
        }
    }
}
