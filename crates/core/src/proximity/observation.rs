use chrono::{DateTime, TimeDelta, Utc};
use pursuit_ranging::{BeaconKey, BeaconSighting, PlayerId};

/// The latest accepted reading for one beacon.
#[derive(Clone, Debug, PartialEq)]
pub struct BeaconObservation {
    pub key: BeaconKey,
    pub distance: f64,
    pub rssi: f64,
    pub observed_at: DateTime<Utc>,
}

impl BeaconObservation {
    /// `None` when the platform did not produce a usable distance.
    pub fn from_sighting(sighting: &BeaconSighting) -> Option<Self> {
        sighting.has_valid_distance().then(|| Self {
            key: sighting.key(),
            distance: sighting.distance,
            rssi: sighting.rssi,
            observed_at: sighting.observed_at,
        })
    }

    pub fn source(&self) -> PlayerId {
        self.key.player
    }

    pub fn age(&self, now: DateTime<Utc>) -> TimeDelta {
        now.signed_duration_since(self.observed_at)
    }

    /// Strictly older than `max_age`.
    pub fn is_stale(&self, now: DateTime<Utc>, max_age: TimeDelta) -> bool {
        self.age(now) > max_age
    }
}
