use std::collections::HashMap;

use chrono::{DateTime, TimeDelta, Utc};
use pursuit_ranging::BeaconKey;
use serde::{Deserialize, Serialize};

use crate::config::{ConfigError, ensure_positive};
use crate::proximity::observation::BeaconObservation;
use crate::role::{PlayerIdentity, PlayerRole};

/// Distance returned when nobody of the requested role is in sight.
pub const UNKNOWN_DISTANCE: f64 = f64::INFINITY;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// Observations older than this are ignored by every query.
    pub max_age_seconds: f64,
    /// Observations farther than this are ignored by distance queries.
    pub max_detection_range: f64,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            max_age_seconds: 300.0,
            max_detection_range: 100.0,
        }
    }
}

impl RegistryConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        ensure_positive("registry.max_age_seconds", self.max_age_seconds)?;
        ensure_positive("registry.max_detection_range", self.max_detection_range)
    }

    /// NaN and non-positive ages make everything stale; huge ones saturate.
    pub fn max_age(&self) -> TimeDelta {
        if self.max_age_seconds.is_nan() || self.max_age_seconds <= 0.0 {
            return TimeDelta::zero();
        }
        // float-to-int casts saturate, infinity included
        let millis = (self.max_age_seconds * 1000.0).round() as i64;
        TimeDelta::try_milliseconds(millis).unwrap_or(TimeDelta::MAX)
    }
}

/// Latest observation per beacon, read through lazy staleness filtering.
///
/// Nothing is ever evicted in the background. Every query takes `now` and
/// skips entries older than the configured maximum age.
#[derive(Clone, Debug)]
pub struct ProximityRegistry {
    identity: PlayerIdentity,
    max_age: TimeDelta,
    max_range: f64,
    observations: HashMap<BeaconKey, BeaconObservation>,
}

impl ProximityRegistry {
    pub fn new(identity: PlayerIdentity, config: &RegistryConfig) -> Self {
        Self {
            identity,
            max_age: config.max_age(),
            max_range: config.max_detection_range,
            observations: HashMap::new(),
        }
    }

    pub fn identity(&self) -> &PlayerIdentity {
        &self.identity
    }

    /// Upsert by beacon key. Always succeeds.
    pub fn record_observation(&mut self, observation: BeaconObservation) {
        tracing::trace!(
            source = %observation.source(),
            distance = observation.distance,
            "observation recorded"
        );
        self.observations.insert(observation.key, observation);
    }

    /// Fresh observations, nearest first.
    pub fn nearby_players(&self, now: DateTime<Utc>) -> Vec<&BeaconObservation> {
        self.nearby_players_within(now, self.max_age)
    }

    pub fn nearby_players_within(&self, now: DateTime<Utc>, max_age: TimeDelta) -> Vec<&BeaconObservation> {
        let mut nearby: Vec<_> = self
            .observations
            .values()
            .filter(|observation| !observation.is_stale(now, max_age))
            .collect();
        nearby.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        nearby
    }

    /// Nearest fresh observation of anybody but ourselves.
    pub fn nearest(&self, now: DateTime<Utc>) -> Option<&BeaconObservation> {
        self.nearby_players(now)
            .into_iter()
            .find(|observation| !self.identity.is_self(observation.source()))
    }

    /// Zero when we are `role` ourselves; otherwise the closest in-range
    /// player of that role, or [`UNKNOWN_DISTANCE`].
    pub fn distance_to_role(&self, now: DateTime<Utc>, role: PlayerRole) -> f64 {
        if self.identity.role() == role {
            return 0.0;
        }

        self.others_in_range(now)
            .filter(|observation| self.identity.role_of(observation.source()) == role)
            .map(|observation| observation.distance)
            .fold(UNKNOWN_DISTANCE, f64::min)
    }

    /// Distance to the Hunter, the role every heartbeat is about.
    pub fn distance_to_opponent_role(&self, now: DateTime<Utc>) -> f64 {
        self.distance_to_role(now, PlayerRole::Hunter)
    }

    /// Others at or within `range` meters, nearest first.
    pub fn players_within_range(&self, now: DateTime<Utc>, range: f64) -> Vec<&BeaconObservation> {
        self.nearby_players(now)
            .into_iter()
            .filter(|observation| {
                observation.distance <= range
                    && observation.distance <= self.max_range
                    && !self.identity.is_self(observation.source())
            })
            .collect()
    }

    pub fn nearest_player_distance(&self, now: DateTime<Utc>) -> f64 {
        self.others_in_range(now)
            .map(|observation| observation.distance)
            .fold(UNKNOWN_DISTANCE, f64::min)
    }

    /// Evaders in range, nearest first. Empty unless we are the Hunter.
    pub fn nearby_evaders(&self, now: DateTime<Utc>) -> Vec<&BeaconObservation> {
        if self.identity.role() != PlayerRole::Hunter {
            return Vec::new();
        }
        self.nearby_players(now)
            .into_iter()
            .filter(|observation| {
                observation.distance <= self.max_range
                    && self.identity.role_of(observation.source()) == PlayerRole::Evader
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    pub fn clear(&mut self) {
        self.observations.clear();
    }

    fn others_in_range(&self, now: DateTime<Utc>) -> impl Iterator<Item = &BeaconObservation> {
        self.observations.values().filter(move |observation| {
            !observation.is_stale(now, self.max_age)
                && observation.distance <= self.max_range
                && !self.identity.is_self(observation.source())
        })
    }
}
