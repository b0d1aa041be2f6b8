//! Gaze classifier configuration

use serde::{Deserialize, Serialize};

use crate::GazeError;

/// Gaze classifier configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GazeConfig {
    /// An eye whose blink ratio is at or below this is closed
    pub blink_threshold: f64,

    /// Vertical eye span (pixels) of a fully open eye
    pub open_eye_span_px: f64,

    /// Horizontal ratio band (low, high); outside it the gaze leaves the centre column
    pub horizontal_band: (f64, f64),

    /// Vertical ratio band (low, high); outside it the gaze leaves the centre row
    pub vertical_band: (f64, f64),
}

impl Default for GazeConfig {
    fn default() -> Self {
        Self {
            blink_threshold: 0.3,
            open_eye_span_px: 21.0,
            horizontal_band: (0.45, 0.55),
            vertical_band: (0.45, 0.55),
        }
    }
}

impl GazeConfig {
    /// Narrow centre band, reports off-centre gaze sooner
    pub fn strict() -> Self {
        Self {
            horizontal_band: (0.48, 0.52),
            vertical_band: (0.48, 0.52),
            ..Default::default()
        }
    }

    /// Wide centre band, tolerates noisy landmarks
    pub fn lenient() -> Self {
        Self {
            horizontal_band: (0.40, 0.60),
            vertical_band: (0.40, 0.60),
            ..Default::default()
        }
    }

    /// Check thresholds are usable
    pub fn validate(&self) -> Result<(), GazeError> {
        if !(self.open_eye_span_px > 0.0) {
            return Err(GazeError::Config(format!(
                "open_eye_span_px must be positive, got {}",
                self.open_eye_span_px
            )));
        }
        for (name, (low, high)) in [
            ("horizontal_band", self.horizontal_band),
            ("vertical_band", self.vertical_band),
        ] {
            if !(low <= high) {
                return Err(GazeError::Config(format!(
                    "{name} lower bound {low} exceeds upper bound {high}"
                )));
            }
        }
        if !self.blink_threshold.is_finite() {
            return Err(GazeError::Config("blink_threshold must be finite".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_thresholds() {
        let config = GazeConfig::default();
        assert_eq!(config.blink_threshold, 0.3);
        assert_eq!(config.open_eye_span_px, 21.0);
        assert_eq!(config.horizontal_band, (0.45, 0.55));
        assert_eq!(config.vertical_band, (0.45, 0.55));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_presets_are_valid() {
        assert!(GazeConfig::strict().validate().is_ok());
        assert!(GazeConfig::lenient().validate().is_ok());
    }

    #[test]
    fn test_inverted_band_rejected() {
        let config = GazeConfig {
            vertical_band: (0.6, 0.4),
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(GazeError::Config(_))));
    }

    #[test]
    fn test_zero_span_rejected() {
        let config = GazeConfig {
            open_eye_span_px: 0.0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: GazeConfig = serde_json::from_str(r#"{"blink_threshold": 0.25}"#).unwrap();
        assert_eq!(config.blink_threshold, 0.25);
        assert_eq!(config.open_eye_span_px, 21.0);
    }
}
