// File: src/config.rs
use crate::core::vocabulary::{TraceMode, TraceParams};
use crate::error::{GestureError, Result};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Speed correction of the location channel.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpeedModel {
    /// How strongly the speed ratio bends the location sigma.
    pub gamma: f64,
    /// Expected drawing speed in surface units per second; the ideal time of
    /// a candidate is its ideal path length divided by this.
    pub nominal_speed: f64,
}

/// Tuning knobs of the recognizer. Every field has a default, so a config
/// file only needs to name what it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Points per resampled trace.
    pub sample_count: usize,
    /// Larger bounding box side of a normalized trace.
    pub bounding_box_side: f64,
    /// Keys closer than this to the last point are plausible final rows.
    pub end_radius: f64,
    /// Width of the location-channel tunnel around the ideal trace.
    pub tunnel_radius: f64,
    /// Tuned for distances in shape space.
    pub sigma_shape: f64,
    /// Tuned for distances in surface units.
    pub sigma_location: f64,
    /// Candidates must score strictly above this.
    pub min_confidence: f64,
    pub trace_mode: TraceMode,
    pub speed: Option<SpeedModel>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            sample_count: 20,
            bounding_box_side: 1.0,
            end_radius: 50.0,
            tunnel_radius: 15.0,
            sigma_shape: 0.008,
            sigma_location: 12.0,
            min_confidence: 0.001,
            trace_mode: TraceMode::Consonant,
            speed: None,
        }
    }
}

impl EngineConfig {
    /// Reads and validates a JSON config file.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let reader = BufReader::new(File::open(path)?);
        let config: Self = serde_json::from_reader(reader)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.sample_count < 2 {
            return Err(GestureError::InvalidConfig(format!(
                "sample_count must be at least 2, got {}",
                self.sample_count
            )));
        }
        let positive = [
            ("bounding_box_side", self.bounding_box_side),
            ("sigma_shape", self.sigma_shape),
            ("sigma_location", self.sigma_location),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(GestureError::InvalidConfig(format!(
                    "{name} must be positive, got {value}"
                )));
            }
        }
        let non_negative = [
            ("end_radius", self.end_radius),
            ("tunnel_radius", self.tunnel_radius),
        ];
        for (name, value) in non_negative {
            if !(value.is_finite() && value >= 0.0) {
                return Err(GestureError::InvalidConfig(format!(
                    "{name} must not be negative, got {value}"
                )));
            }
        }
        if let Some(speed) = &self.speed {
            if !(speed.nominal_speed.is_finite() && speed.nominal_speed > 0.0) {
                return Err(GestureError::InvalidConfig(format!(
                    "speed.nominal_speed must be positive, got {}",
                    speed.nominal_speed
                )));
            }
        }
        Ok(())
    }

    pub fn trace_params(&self) -> TraceParams {
        TraceParams {
            sample_count: self.sample_count,
            bounding_box_side: self.bounding_box_side,
            mode: self.trace_mode,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn defaults_are_valid() {
        let config = EngineConfig::default();
        config.validate().expect("defaults");
        assert_eq!(config.trace_params(), TraceParams::default());
    }

    #[test]
    fn partial_json_keeps_other_defaults() {
        let mut file = NamedTempFile::new().expect("tempfile");
        write!(
            file,
            r#"{{ "min_confidence": 0.05, "trace_mode": {{ "vowel_offset": {{ "offset": 25.0 }} }} }}"#
        )
        .expect("write");

        let config = EngineConfig::from_json_file(file.path()).expect("config");
        assert_eq!(config.min_confidence, 0.05);
        assert_eq!(config.trace_mode, TraceMode::VowelOffset { offset: 25.0 });
        assert_eq!(config.sample_count, 20);
        assert_eq!(config.speed, None);
    }

    #[test]
    fn invalid_values_are_rejected() {
        let config = EngineConfig {
            sample_count: 1,
            ..EngineConfig::default()
        };
        assert!(matches!(config.validate(), Err(GestureError::InvalidConfig(_))));

        let config = EngineConfig {
            sigma_shape: 0.0,
            ..EngineConfig::default()
        };
        assert!(matches!(config.validate(), Err(GestureError::InvalidConfig(_))));

        let config = EngineConfig {
            speed: Some(SpeedModel { gamma: 0.5, nominal_speed: -1.0 }),
            ..EngineConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn malformed_json_is_a_config_error() {
        let mut file = NamedTempFile::new().expect("tempfile");
        write!(file, "not json").expect("write");
        assert!(matches!(
            EngineConfig::from_json_file(file.path()),
            Err(GestureError::Config(_))
        ));
    }
}
