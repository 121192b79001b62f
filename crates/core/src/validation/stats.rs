use std::fmt;

use crate::validation::record::{AccuracyBucket, ValidationRecord};

/// Aggregate over the records currently held. Computed on demand.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct AccuracyStats {
    pub total: usize,
    pub excellent: usize,
    pub good: usize,
    pub poor: usize,
    pub failed: usize,
    pub mean_error: f64,
    pub mean_error_pct: f64,
    /// `(excellent + good) / total * 100`, zero when empty.
    pub success_rate: f64,
}

impl AccuracyStats {
    pub fn from_records<'a>(records: impl IntoIterator<Item = &'a ValidationRecord>) -> Self {
        let mut stats = Self::default();
        let mut error_sum = 0.0;
        let mut pct_sum = 0.0;

        for record in records {
            stats.total += 1;
            error_sum += record.error_abs();
            pct_sum += record.error_pct();
            match record.bucket() {
                AccuracyBucket::Excellent => stats.excellent += 1,
                AccuracyBucket::Good => stats.good += 1,
                AccuracyBucket::Poor => stats.poor += 1,
                AccuracyBucket::Failed => stats.failed += 1,
            }
        }

        if stats.total > 0 {
            let total = stats.total as f64;
            stats.mean_error = error_sum / total;
            stats.mean_error_pct = pct_sum / total;
            stats.success_rate = (stats.excellent + stats.good) as f64 / total * 100.0;
        }
        stats
    }
}

impl fmt::Display for AccuracyStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "samples: {} mean error: {:.1}m ({:.1}%) success: {:.1}% [excellent:{} good:{} poor:{} failed:{}]",
            self.total,
            self.mean_error,
            self.mean_error_pct,
            self.success_rate,
            self.excellent,
            self.good,
            self.poor,
            self.failed
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::record::ToleranceBands;
    use approx::assert_abs_diff_eq;
    use chrono::Utc;

    fn records(errors: &[f64]) -> Vec<ValidationRecord> {
        // 20m actual: far band, tolerance 5m
        errors
            .iter()
            .map(|e| ValidationRecord::new(Utc::now(), 20.0, 20.0 + e, -70.0, &ToleranceBands::default()))
            .collect()
    }

    #[test]
    fn test_success_rate() {
        // 6 Excellent, 2 Good, 1 Poor, 1 Failed
        let records = records(&[0.0, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 9.0, 12.0]);
        let stats = AccuracyStats::from_records(&records);

        assert_eq!(stats.total, 10);
        assert_eq!((stats.excellent, stats.good, stats.poor, stats.failed), (6, 2, 1, 1));
        assert_abs_diff_eq!(stats.success_rate, 80.0);
        assert_abs_diff_eq!(stats.mean_error, 4.9, epsilon = 1e-12);
        assert_abs_diff_eq!(stats.mean_error_pct, 24.5, epsilon = 1e-9);
    }

    #[test]
    fn test_empty_stats() {
        let stats = AccuracyStats::from_records(std::iter::empty());
        assert_eq!(stats, AccuracyStats::default());
        assert_eq!(stats.success_rate, 0.0);
    }

    #[test]
    fn test_summary_string() {
        let stats = AccuracyStats::from_records(&records(&[0.0, 8.0]));
        assert_eq!(
            stats.to_string(),
            "samples: 2 mean error: 4.0m (20.0%) success: 50.0% [excellent:1 good:0 poor:1 failed:0]"
        );
    }
}
