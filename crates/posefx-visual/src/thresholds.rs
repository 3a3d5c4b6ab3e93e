//! Feature thresholds
//!
//! Values are in provider image units (canvas pixels at capture scale).

use serde::{Deserialize, Serialize};

use posefx_core::{PosefxError, PosefxResult};

/// Tunable thresholds for the feature extractors
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeatureThresholds {
    /// Inner-lip gap above which the mouth counts as open
    pub mouth_open_gap: f32,
    /// Eyelid gap above which an eye counts as open
    pub eye_open_gap: f32,
    /// Fingertip-to-wrist distance below which a finger counts as curled
    pub fist_radius: f32,
    /// Curled fingers needed for a fist
    pub fist_min_closed: usize,
    /// Margin a tip must clear beyond its base to count as extended
    pub extension_tolerance: f32,
}

impl Default for FeatureThresholds {
    fn default() -> Self {
        Self {
            mouth_open_gap: 15.0,
            eye_open_gap: 8.0,
            fist_radius: 100.0,
            fist_min_closed: 3,
            extension_tolerance: 20.0,
        }
    }
}

impl FeatureThresholds {
    pub fn validate(&self) -> PosefxResult<()> {
        let distances = [
            ("mouth_open_gap", self.mouth_open_gap),
            ("eye_open_gap", self.eye_open_gap),
            ("fist_radius", self.fist_radius),
            ("extension_tolerance", self.extension_tolerance),
        ];
        for (name, value) in distances {
            if !value.is_finite() || value < 0.0 {
                return Err(PosefxError::InvalidConfig(format!(
                    "{} must be a non-negative number, got {}",
                    name, value
                )));
            }
        }
        if self.fist_min_closed == 0 || self.fist_min_closed > 5 {
            return Err(PosefxError::InvalidConfig(format!(
                "fist_min_closed must be in 1..=5, got {}",
                self.fist_min_closed
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(FeatureThresholds::default().validate().is_ok());
    }

    #[test]
    fn test_rejects_bad_values() {
        let t = FeatureThresholds {
            eye_open_gap: f32::NAN,
            ..Default::default()
        };
        assert!(t.validate().is_err());

        let t = FeatureThresholds {
            fist_min_closed: 6,
            ..Default::default()
        };
        assert!(t.validate().is_err());
    }
}
