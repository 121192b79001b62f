use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::ConfigError;

/// Discrete proximity classification, ordered from safest to closest.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum HeartbeatLevel {
    #[default]
    None,
    Far,
    Mid,
    Near,
}

impl fmt::Display for HeartbeatLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::None => "None",
            Self::Far => "Far",
            Self::Mid => "Mid",
            Self::Near => "Near",
        };
        f.write_str(name)
    }
}

/// A level plus the Critical sub-state, which only exists inside Near.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct LevelReading {
    pub level: HeartbeatLevel,
    pub critical: bool,
}

impl LevelReading {
    pub const NONE: LevelReading = LevelReading {
        level: HeartbeatLevel::None,
        critical: false,
    };

    pub fn is_active(&self) -> bool {
        self.level != HeartbeatLevel::None
    }
}

impl fmt::Display for LevelReading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.critical {
            write!(f, "{}+Critical", self.level)
        } else {
            write!(f, "{}", self.level)
        }
    }
}

/// Distance bands in meters. Upper bounds are inclusive.
///
/// Invariant: `far > mid > near > critical >= 0`, checked by
/// [`Thresholds::new`] and [`Thresholds::validate`].
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Thresholds {
    pub far: f64,
    pub mid: f64,
    pub near: f64,
    pub critical: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            far: 50.0,
            mid: 30.0,
            near: 10.0,
            critical: 0.5,
        }
    }
}

impl Thresholds {
    pub fn new(far: f64, mid: f64, near: f64, critical: f64) -> Result<Self, ConfigError> {
        let thresholds = Self {
            far,
            mid,
            near,
            critical,
        };
        thresholds.validate()?;
        Ok(thresholds)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let values = [self.far, self.mid, self.near, self.critical];
        if values.iter().any(|v| !v.is_finite()) {
            return Err(ConfigError::InvalidThresholds(format!(
                "thresholds must be finite: {self:?}"
            )));
        }
        if !(self.far > self.mid && self.mid > self.near && self.near > self.critical) {
            return Err(ConfigError::InvalidThresholds(format!(
                "expected far > mid > near > critical, got {} / {} / {} / {}",
                self.far, self.mid, self.near, self.critical
            )));
        }
        if self.critical < 0.0 {
            return Err(ConfigError::InvalidThresholds(format!(
                "critical threshold must be non-negative, got {}",
                self.critical
            )));
        }
        Ok(())
    }

    /// Floor and ceiling of the band a level occupies.
    pub fn band(&self, level: HeartbeatLevel) -> Option<(f64, f64)> {
        match level {
            HeartbeatLevel::None => None,
            HeartbeatLevel::Far => Some((self.mid, self.far)),
            HeartbeatLevel::Mid => Some((self.near, self.mid)),
            HeartbeatLevel::Near => Some((0.0, self.near)),
        }
    }
}

/// Pure classification of a distance.
///
/// Unknown distances (`+inf`, NaN) classify as None.
pub fn classify(distance: f64, thresholds: &Thresholds) -> LevelReading {
    if distance.is_nan() || distance > thresholds.far {
        return LevelReading::NONE;
    }

    let level = if distance > thresholds.mid {
        HeartbeatLevel::Far
    } else if distance > thresholds.near {
        HeartbeatLevel::Mid
    } else {
        HeartbeatLevel::Near
    };

    LevelReading {
        level,
        critical: level == HeartbeatLevel::Near && distance <= thresholds.critical,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn thresholds() -> Thresholds {
        Thresholds::new(50.0, 30.0, 10.0, 0.5).unwrap()
    }

    #[test]
    fn test_band_edges_are_inclusive_upper() {
        let t = thresholds();

        assert_eq!(classify(50.0001, &t).level, HeartbeatLevel::None);
        assert_eq!(classify(50.0, &t).level, HeartbeatLevel::Far);
        assert_eq!(classify(30.0001, &t).level, HeartbeatLevel::Far);
        assert_eq!(classify(30.0, &t).level, HeartbeatLevel::Mid);
        assert_eq!(classify(10.0001, &t).level, HeartbeatLevel::Mid);
        assert_eq!(classify(10.0, &t).level, HeartbeatLevel::Near);
        assert!(!classify(0.5001, &t).critical);
        assert!(classify(0.5, &t).critical);
        assert!(classify(0.0, &t).critical);
    }

    #[test]
    fn test_unknown_distance_is_none() {
        let t = thresholds();

        assert_eq!(classify(f64::INFINITY, &t), LevelReading::NONE);
        assert_eq!(classify(f64::NAN, &t), LevelReading::NONE);
        assert_eq!(classify(f64::MAX, &t), LevelReading::NONE);
    }

    #[test]
    fn test_classify_is_deterministic() {
        let t = thresholds();
        for d in [0.0, 0.3, 7.0, 15.0, 29.9, 42.0, 60.0, f64::INFINITY] {
            assert_eq!(classify(d, &t), classify(d, &t));
        }
    }

    #[test]
    fn test_threshold_ordering_enforced() {
        assert!(Thresholds::new(50.0, 30.0, 10.0, 0.0).is_ok());
        assert!(Thresholds::new(30.0, 30.0, 10.0, 0.5).is_err());
        assert!(Thresholds::new(50.0, 10.0, 30.0, 0.5).is_err());
        assert!(Thresholds::new(50.0, 30.0, 10.0, 10.0).is_err());
        assert!(Thresholds::new(50.0, 30.0, 10.0, -0.1).is_err());
        assert!(Thresholds::new(f64::INFINITY, 30.0, 10.0, 0.5).is_err());
    }

    #[test]
    fn test_level_ordering() {
        assert!(HeartbeatLevel::None < HeartbeatLevel::Far);
        assert!(HeartbeatLevel::Far < HeartbeatLevel::Mid);
        assert!(HeartbeatLevel::Mid < HeartbeatLevel::Near);
    }

    #[test]
    fn test_reading_display() {
        let reading = LevelReading {
            level: HeartbeatLevel::Near,
            critical: true,
        };
        assert_eq!(reading.to_string(), "Near+Critical");
        assert_eq!(LevelReading::NONE.to_string(), "None");
    }
}
