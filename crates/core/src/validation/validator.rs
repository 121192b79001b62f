use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use pursuit_ranging::Clock;

use crate::proximity::ProximityRegistry;
use crate::validation::{
    ValidationConfig, ValidationError, export,
    record::{ToleranceBands, ValidationRecord},
    stats::AccuracyStats,
};

/// Paired actual/measured samples in a capped FIFO.
pub struct AccuracyValidator {
    tolerances: ToleranceBands,
    capacity: usize,
    records: VecDeque<ValidationRecord>,
    clock: Arc<dyn Clock>,
}

impl AccuracyValidator {
    pub fn new(config: &ValidationConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            tolerances: config.tolerances,
            capacity: config.capacity.max(1),
            records: VecDeque::with_capacity(config.capacity.max(1)),
            clock,
        }
    }

    pub fn tolerances(&self) -> &ToleranceBands {
        &self.tolerances
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn records(&self) -> impl ExactSizeIterator<Item = &ValidationRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn record_sample(&mut self, actual: f64, measured: f64, rssi: f64) -> Result<&ValidationRecord, ValidationError> {
        let now = self.clock.now();
        self.record_sample_at(now, actual, measured, rssi)
    }

    pub fn record_sample_at(
        &mut self,
        timestamp: DateTime<Utc>,
        actual: f64,
        measured: f64,
        rssi: f64,
    ) -> Result<&ValidationRecord, ValidationError> {
        for (field, value) in [("actual", actual), ("measured", measured)] {
            if !(value.is_finite() && value >= 0.0) {
                return Err(ValidationError::InvalidDistance { field, value });
            }
        }

        let record = ValidationRecord::new(timestamp, actual, measured, rssi, &self.tolerances);
        tracing::info!(
            actual,
            measured,
            error = record.error_abs(),
            bucket = %record.bucket(),
            "validation sample recorded"
        );

        while self.records.len() >= self.capacity {
            self.records.pop_front();
        }
        self.records.push_back(record);
        self.records.back().ok_or(ValidationError::NoRecords)
    }

    /// Pair `actual` with the nearest observation currently in `registry`.
    pub fn validate_manual(
        &mut self,
        registry: &ProximityRegistry,
        actual: f64,
    ) -> Result<&ValidationRecord, ValidationError> {
        let now = self.clock.now();
        let Some(nearest) = registry.nearest(now) else {
            tracing::warn!("manual validation requested with nobody in range");
            return Err(ValidationError::NoObservations);
        };
        let (measured, rssi) = (nearest.distance, nearest.rssi);
        self.record_sample_at(now, actual, measured, rssi)
    }

    pub fn stats(&self) -> AccuracyStats {
        AccuracyStats::from_records(&self.records)
    }

    pub fn export_csv(&self) -> Result<String, ValidationError> {
        if self.records.is_empty() {
            return Err(ValidationError::NoRecords);
        }
        export::to_csv(&self.records)
    }

    /// Write the export into `dir` and return the file path.
    pub fn write_csv(&self, dir: &Path) -> Result<PathBuf, ValidationError> {
        let csv = self.export_csv()?;
        export::write_to_dir(dir, self.clock.now(), &csv)
    }

    pub fn clear(&mut self) {
        tracing::info!(count = self.records.len(), "validation records cleared");
        self.records.clear();
    }
}
