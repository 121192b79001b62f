//! Ranging accuracy: paired samples, aggregate statistics and CSV export.
//!
//! The validator only measures. It never feeds corrections back into the
//! registry.

#[cfg(feature = "calibration")]
pub mod calibration;
pub mod export;
pub mod record;
pub mod stats;
pub mod validator;

use serde::{Deserialize, Serialize};

use crate::config::{ConfigError, ensure_non_negative, ensure_positive};

pub use record::{AccuracyBucket, ToleranceBands, ValidationRecord};
pub use stats::AccuracyStats;
pub use validator::AccuracyValidator;

#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("No observation available to validate against")]
    NoObservations,
    #[error("No validation records to export")]
    NoRecords,
    #[error("Invalid {field} distance: {value}")]
    InvalidDistance { field: &'static str, value: f64 },
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    pub tolerances: ToleranceBands,
    /// Oldest records are evicted past this count.
    pub capacity: usize,
    pub calibration_interval: f64,
    /// Fraction of the measured distance used as +/- noise.
    pub calibration_jitter: f64,
    pub calibration_seed: u64,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            tolerances: ToleranceBands::default(),
            capacity: 100,
            calibration_interval: 2.0,
            calibration_jitter: 0.2,
            calibration_seed: 0xca1,
        }
    }
}

impl ValidationConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.tolerances.validate()?;
        if self.capacity == 0 {
            return Err(ConfigError::InvalidValue {
                field: "validation.capacity",
                reason: "must hold at least one record".into(),
            });
        }
        ensure_positive("validation.calibration_interval", self.calibration_interval)?;
        ensure_non_negative("validation.calibration_jitter", self.calibration_jitter)
    }
}
