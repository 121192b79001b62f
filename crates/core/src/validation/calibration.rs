//! Synthetic ground truth for exercising the validator in the field.
//!
//! Builds only with the `calibration` feature. The "actual" distance here is
//! invented from the measured one, so its statistics say nothing about real
//! ranging accuracy.

use std::time::Duration;

use rand::{Rng, SeedableRng, rngs::StdRng};

use crate::heartbeat::BeatTimer;
use crate::proximity::ProximityRegistry;
use crate::validation::{ValidationConfig, validator::AccuracyValidator};

pub struct CalibrationSampler {
    timer: BeatTimer,
    jitter: f64,
    rng: StdRng,
}

impl CalibrationSampler {
    pub fn new(config: &ValidationConfig) -> Self {
        tracing::warn!("calibration sampler enabled; validation records will use synthetic ground truth");
        Self {
            timer: BeatTimer::new(config.calibration_interval),
            jitter: config.calibration_jitter.abs(),
            rng: StdRng::seed_from_u64(config.calibration_seed),
        }
    }

    /// Samples the nearest observation once per interval. Returns whether a
    /// record was added.
    pub fn advance(
        &mut self,
        elapsed: Duration,
        registry: &ProximityRegistry,
        validator: &mut AccuracyValidator,
    ) -> bool {
        if !self.timer.advance(elapsed) {
            return false;
        }

        let now = validator.now();
        let Some(nearest) = registry.nearest(now) else {
            return false;
        };

        let measured = nearest.distance;
        let variation = measured * self.jitter;
        let actual = if variation > 0.0 {
            (measured + self.rng.random_range(-variation..=variation)).max(0.0)
        } else {
            measured
        };

        validator.record_sample_at(now, actual, measured, nearest.rssi).is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::proximity::{BeaconObservation, RegistryConfig};
    use crate::role::PlayerIdentity;
    use chrono::{TimeZone, Utc};
    use pursuit_ranging::{BeaconKey, Clock, ManualClock, PlayerId, SessionId};
    use std::sync::Arc;

    #[test]
    fn test_samples_on_interval_with_bounded_jitter() {
        let clock = Arc::new(ManualClock::new(Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap()));
        let config = ValidationConfig::default();
        let mut validator = AccuracyValidator::new(&config, clock.clone());
        let mut registry = ProximityRegistry::new(
            PlayerIdentity::new(PlayerId::new(1001), PlayerId::new(1000)),
            &RegistryConfig::default(),
        );
        let mut sampler = CalibrationSampler::new(&config);

        // nothing to sample yet
        assert!(!sampler.advance(Duration::from_secs(2), &registry, &mut validator));

        registry.record_observation(BeaconObservation {
            key: BeaconKey {
                session: SessionId::new(1),
                player: PlayerId::new(1000),
            },
            distance: 10.0,
            rssi: -60.0,
            observed_at: clock.now(),
        });

        let mut added = 0;
        for _ in 0..40 {
            added += usize::from(sampler.advance(Duration::from_millis(500), &registry, &mut validator));
        }

        assert_eq!(added, 10);
        for record in validator.records() {
            assert_eq!(record.measured(), 10.0);
            assert!((8.0..=12.0).contains(&record.actual()));
        }
    }
}
