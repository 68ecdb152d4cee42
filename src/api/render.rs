//! Result Renderer
//!
//! Plain-text rendering of the page: header, sensor panel, result block and
//! footer. Everything writes to a `Write` so sessions can be captured.

use std::io::{self, Write};

use crate::constants::{APP_CREDIT, APP_NAME, APP_PROJECT, APP_VERSION};
use crate::logic::features::{SensorForm, SENSOR_LAYOUT};
use crate::logic::model::store::StoreMetadata;
use crate::logic::model::InferenceError;
use crate::logic::pipeline::PredictionResult;

pub const ANOMALY_WARNING: &str = "⚠️ Sensor readings detected as unusual or anomalous!";
const RULE: &str = "---";

pub fn header(out: &mut impl Write) -> io::Result<()> {
    writeln!(out, "🌬️ {} v{}", APP_NAME, APP_VERSION)?;
    writeln!(
        out,
        "Predict AQI, classify air quality, and detect anomalies using environmental sensor data"
    )?;
    writeln!(out, "{}", RULE)
}

/// The twelve inputs with their current values and ranges
pub fn panel(out: &mut impl Write, form: &SensorForm) -> io::Result<()> {
    writeln!(out, "📊 Sensor Input Panel")?;
    writeln!(out, "Provide sensor readings to predict AQI and detect anomalies.")?;

    for (index, (sensor, value)) in SENSOR_LAYOUT.iter().zip(form.values().iter()).enumerate() {
        let precision = sensor.precision();
        writeln!(
            out,
            "{:>2}. {:<28} {:>9.prec$}   [{:.prec$} .. {:.prec$}, step {}]",
            index + 1,
            sensor.label(),
            value,
            sensor.min,
            sensor.max,
            sensor.step,
            prec = precision,
        )?;
    }

    Ok(())
}

/// Success line: marker, AQI to two decimals, category
pub fn success_line(result: &PredictionResult) -> String {
    format!(
        "{} AQI (Regression): {:.2} — Category: {}",
        result.aqi_category.marker(),
        result.aqi_value,
        result.aqi_category.label()
    )
}

/// Info line with the classifier's raw label
pub fn info_line(result: &PredictionResult) -> String {
    format!("✅ AQI Classifier predicts category: {}", result.classifier_label)
}

/// Result block for one trigger. The warning, when present, comes first.
pub fn prediction(out: &mut impl Write, result: &PredictionResult) -> io::Result<()> {
    if result.anomaly {
        writeln!(out, "{}", ANOMALY_WARNING)?;
    }
    writeln!(out, "{}", RULE)?;
    writeln!(out, "🌱 Prediction Results")?;
    writeln!(out, "{}", success_line(result))?;
    writeln!(out, "{}", info_line(result))
}

pub fn prediction_error(out: &mut impl Write, error: &InferenceError) -> io::Result<()> {
    writeln!(out, "❌ Prediction failed: {}", error)
}

/// Loaded artifacts and when they were loaded
pub fn status(out: &mut impl Write, metadata: &StoreMetadata) -> io::Result<()> {
    writeln!(out, "Model directory: {}", metadata.model_dir.display())?;
    writeln!(out, "Loaded at: {}", metadata.loaded_at.to_rfc3339())?;
    writeln!(
        out,
        "Sensor layout: v{} ({:08x}), {} features",
        metadata.layout.version, metadata.layout.hash, metadata.layout.feature_count
    )?;
    writeln!(out, "Manifest: {}", if metadata.manifest_found { "found" } else { "none" })?;

    for artifact in &metadata.artifacts {
        match &artifact.sha256 {
            Some(sha) => writeln!(out, "  {:<18} {}  sha256:{}", artifact.name, artifact.path.display(), sha)?,
            None => writeln!(out, "  {:<18} {}", artifact.name, artifact.path.display())?,
        }
    }

    Ok(())
}

pub fn footer(out: &mut impl Write) -> io::Result<()> {
    writeln!(out, "{}", RULE)?;
    writeln!(out, "{}", APP_CREDIT)?;
    writeln!(out, "{}", APP_PROJECT)
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::category::{map_category, AqiCategory};
    use crate::logic::model::ClassLabel;

    fn result(anomaly: bool, aqi_value: f64, label: ClassLabel) -> PredictionResult {
        PredictionResult {
            anomaly,
            aqi_value,
            aqi_category: map_category(aqi_value),
            classifier_label: label,
        }
    }

    fn render(result: &PredictionResult) -> String {
        let mut out = Vec::new();
        prediction(&mut out, result).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_success_line_two_decimals() {
        let r = result(false, 87.456, ClassLabel::Integer(1));
        assert_eq!(success_line(&r), "🟡 AQI (Regression): 87.46 — Category: Moderate");
    }

    #[test]
    fn test_info_line_opaque_label() {
        let r = result(false, 10.0, ClassLabel::Text("Satisfactory".into()));
        assert_eq!(info_line(&r), "✅ AQI Classifier predicts category: Satisfactory");
    }

    #[test]
    fn test_no_warning_when_normal() {
        let text = render(&result(false, 10.0, ClassLabel::Integer(0)));
        assert!(!text.contains(ANOMALY_WARNING));
        assert!(text.contains("🟢 AQI (Regression): 10.00 — Category: Good"));
    }

    #[test]
    fn test_warning_comes_first() {
        let text = render(&result(true, 300.0, ClassLabel::Integer(4)));
        let warning = text.find(ANOMALY_WARNING).unwrap();
        let success = text.find("AQI (Regression)").unwrap();
        let info = text.find("AQI Classifier").unwrap();

        assert!(warning < success && success < info);
        assert!(text.contains("🟣 AQI (Regression): 300.00 — Category: Very Unhealthy"));
    }

    #[test]
    fn test_panel_lists_every_sensor() {
        let mut out = Vec::new();
        panel(&mut out, &SensorForm::new()).unwrap();
        let text = String::from_utf8(out).unwrap();

        for sensor in SENSOR_LAYOUT.iter() {
            assert!(text.contains(&sensor.label()), "missing {}", sensor.name);
        }
        assert!(text.contains("Temperature value (°C)"));
        assert!(text.contains("7.00"));
    }

    #[test]
    fn test_negative_aqi_renders_good() {
        let r = result(false, -3.0, ClassLabel::Integer(0));
        assert_eq!(r.aqi_category, AqiCategory::Good);
        assert_eq!(success_line(&r), "🟢 AQI (Regression): -3.00 — Category: Good");
    }
}
