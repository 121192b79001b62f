use serde::{Deserialize, Serialize};

use crate::config::ConfigError;

/// Which heartbeat sample the audio player should use.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display, strum::EnumString,
)]
pub enum CueBucket {
    #[default]
    Silent,
    Slow,
    Medium,
    Fast,
    Critical,
}

/// Absolute distances (meters, inclusive) selecting a [`CueBucket`].
///
/// These are deliberately separate from the level thresholds.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CueThresholds {
    pub critical: f64,
    pub fast: f64,
    pub medium: f64,
    pub slow: f64,
}

impl Default for CueThresholds {
    fn default() -> Self {
        Self {
            critical: 5.0,
            fast: 10.0,
            medium: 30.0,
            slow: 50.0,
        }
    }
}

impl CueThresholds {
    pub fn select(&self, distance: f64) -> CueBucket {
        if distance.is_nan() || distance > self.slow {
            CueBucket::Silent
        } else if distance > self.medium {
            CueBucket::Slow
        } else if distance > self.fast {
            CueBucket::Medium
        } else if distance > self.critical {
            CueBucket::Fast
        } else {
            CueBucket::Critical
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let ordered = self.slow > self.medium && self.medium > self.fast && self.fast > self.critical;
        if !ordered || !self.slow.is_finite() || !(self.critical >= 0.0) {
            return Err(ConfigError::InvalidValue {
                field: "feedback.cue_thresholds",
                reason: format!(
                    "expected slow > medium > fast > critical >= 0, got {} / {} / {} / {}",
                    self.slow, self.medium, self.fast, self.critical
                ),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bucket_selection() {
        let t = CueThresholds::default();
        assert_eq!(t.select(0.0), CueBucket::Critical);
        assert_eq!(t.select(5.0), CueBucket::Critical);
        assert_eq!(t.select(5.1), CueBucket::Fast);
        assert_eq!(t.select(10.0), CueBucket::Fast);
        assert_eq!(t.select(30.0), CueBucket::Medium);
        assert_eq!(t.select(50.0), CueBucket::Slow);
        assert_eq!(t.select(50.1), CueBucket::Silent);
        assert_eq!(t.select(f64::INFINITY), CueBucket::Silent);
        assert_eq!(t.select(f64::NAN), CueBucket::Silent);
    }

    #[test]
    fn test_cue_granularity_differs_from_levels() {
        // 7m is Near for the level engine but only a Fast cue
        assert_eq!(CueThresholds::default().select(7.0), CueBucket::Fast);
    }

    #[test]
    fn test_validation() {
        assert!(CueThresholds::default().validate().is_ok());
        let broken = CueThresholds {
            fast: 40.0,
            ..CueThresholds::default()
        };
        assert!(broken.validate().is_err());
    }

    #[test]
    fn test_bucket_names() {
        assert_eq!(CueBucket::Critical.to_string(), "Critical");
        assert_eq!("Slow".parse::<CueBucket>().unwrap(), CueBucket::Slow);
    }
}
