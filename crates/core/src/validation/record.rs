use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::{ConfigError, ensure_positive};

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display, strum::EnumString,
)]
pub enum AccuracyBucket {
    /// Within tolerance.
    Excellent,
    /// Within 1.5x tolerance.
    Good,
    /// Within 2x tolerance.
    Poor,
    Failed,
}

/// Per-band absolute error tolerance, in meters.
///
/// The band is picked by the actual distance: up to `near_edge` is near, up
/// to `mid_edge` is mid, everything beyond is far.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToleranceBands {
    pub near_edge: f64,
    pub mid_edge: f64,
    pub near: f64,
    pub mid: f64,
    pub far: f64,
}

impl Default for ToleranceBands {
    fn default() -> Self {
        Self {
            near_edge: 2.0,
            mid_edge: 10.0,
            near: 0.5,
            mid: 2.0,
            far: 5.0,
        }
    }
}

impl ToleranceBands {
    pub fn tolerance_for(&self, actual: f64) -> f64 {
        if actual <= self.near_edge {
            self.near
        } else if actual <= self.mid_edge {
            self.mid
        } else {
            self.far
        }
    }

    pub fn bucket(&self, actual: f64, error_abs: f64) -> AccuracyBucket {
        let tolerance = self.tolerance_for(actual);
        if error_abs <= tolerance {
            AccuracyBucket::Excellent
        } else if error_abs <= tolerance * 1.5 {
            AccuracyBucket::Good
        } else if error_abs <= tolerance * 2.0 {
            AccuracyBucket::Poor
        } else {
            AccuracyBucket::Failed
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        ensure_positive("validation.tolerances.near_edge", self.near_edge)?;
        ensure_positive("validation.tolerances.mid_edge", self.mid_edge)?;
        if self.mid_edge <= self.near_edge {
            return Err(ConfigError::InvalidValue {
                field: "validation.tolerances.mid_edge",
                reason: format!("must exceed near_edge ({})", self.near_edge),
            });
        }
        ensure_positive("validation.tolerances.near", self.near)?;
        ensure_positive("validation.tolerances.mid", self.mid)?;
        ensure_positive("validation.tolerances.far", self.far)
    }
}

/// One paired measurement. Fields are derived once and never change.
#[derive(Clone, Debug, PartialEq)]
pub struct ValidationRecord {
    timestamp: DateTime<Utc>,
    actual: f64,
    measured: f64,
    rssi: f64,
    error_abs: f64,
    error_pct: f64,
    bucket: AccuracyBucket,
}

impl ValidationRecord {
    pub fn new(
        timestamp: DateTime<Utc>,
        actual: f64,
        measured: f64,
        rssi: f64,
        tolerances: &ToleranceBands,
    ) -> Self {
        let error_abs = (measured - actual).abs();
        let error_pct = if actual > 0.0 {
            error_abs / actual * 100.0
        } else {
            0.0
        };

        Self {
            timestamp,
            actual,
            measured,
            rssi,
            error_abs,
            error_pct,
            bucket: tolerances.bucket(actual, error_abs),
        }
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn actual(&self) -> f64 {
        self.actual
    }

    pub fn measured(&self) -> f64 {
        self.measured
    }

    pub fn rssi(&self) -> f64 {
        self.rssi
    }

    pub fn error_abs(&self) -> f64 {
        self.error_abs
    }

    pub fn error_pct(&self) -> f64 {
        self.error_pct
    }

    pub fn bucket(&self) -> AccuracyBucket {
        self.bucket
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn record(actual: f64, measured: f64) -> ValidationRecord {
        ValidationRecord::new(Utc::now(), actual, measured, -52.0, &ToleranceBands::default())
    }

    #[test]
    fn test_five_meter_sample_is_excellent() {
        let r = record(5.0, 5.4);
        assert_abs_diff_eq!(r.error_abs(), 0.4, epsilon = 1e-12);
        assert_abs_diff_eq!(r.error_pct(), 8.0, epsilon = 1e-9);
        assert_eq!(r.bucket(), AccuracyBucket::Excellent);

        // still Excellent when 5m falls under the tight 0.5m tolerance
        let wide_near = ToleranceBands {
            near_edge: 5.0,
            mid_edge: 10.0,
            ..ToleranceBands::default()
        };
        assert_eq!(wide_near.tolerance_for(5.0), 0.5);
        let r = ValidationRecord::new(Utc::now(), 5.0, 5.4, -52.0, &wide_near);
        assert_eq!(r.bucket(), AccuracyBucket::Excellent);
    }

    #[test]
    fn test_near_band_tolerance() {
        let bands = ToleranceBands::default();
        assert_eq!(bands.tolerance_for(2.0), 0.5);
        assert_eq!(bands.tolerance_for(2.1), 2.0);
        assert_eq!(bands.tolerance_for(10.0), 2.0);
        assert_eq!(bands.tolerance_for(10.1), 5.0);

        // 1.5m actual: tolerance 0.5m, 0.4m error is Excellent
        assert_eq!(record(1.5, 1.9).bucket(), AccuracyBucket::Excellent);
    }

    #[test]
    fn test_bucket_multipliers() {
        let bands = ToleranceBands::default();
        // far band, tolerance 5m
        assert_eq!(bands.bucket(20.0, 5.0), AccuracyBucket::Excellent);
        assert_eq!(bands.bucket(20.0, 7.5), AccuracyBucket::Good);
        assert_eq!(bands.bucket(20.0, 10.0), AccuracyBucket::Poor);
        assert_eq!(bands.bucket(20.0, 10.01), AccuracyBucket::Failed);
    }

    #[test]
    fn test_zero_actual_has_zero_percentage() {
        let r = record(0.0, 0.3);
        assert_eq!(r.error_pct(), 0.0);
        assert_abs_diff_eq!(r.error_abs(), 0.3);
    }

    #[test]
    fn test_bucket_names_round_trip() {
        for bucket in [
            AccuracyBucket::Excellent,
            AccuracyBucket::Good,
            AccuracyBucket::Poor,
            AccuracyBucket::Failed,
        ] {
            assert_eq!(bucket.to_string().parse::<AccuracyBucket>().unwrap(), bucket);
        }
    }

    #[test]
    fn test_tolerance_validation() {
        assert!(ToleranceBands::default().validate().is_ok());
        let broken = ToleranceBands {
            mid_edge: 1.0,
            ..ToleranceBands::default()
        };
        assert!(broken.validate().is_err());
    }
}
