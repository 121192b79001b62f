use pursuit_ranging::{BeaconSighting, SessionId};
use uuid::Uuid;

use crate::proximity::observation::BeaconObservation;

/// Admission check applied while draining the observation queue.
///
/// Sightings from another region or session, or without a usable distance,
/// never reach the registry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SightingFilter {
    pub region: Uuid,
    pub session: SessionId,
}

impl SightingFilter {
    pub fn new(region: Uuid, session: SessionId) -> Self {
        Self { region, session }
    }

    pub fn admit(&self, sighting: &BeaconSighting) -> Option<BeaconObservation> {
        match Uuid::parse_str(&sighting.uuid) {
            Ok(uuid) if uuid == self.region => {}
            _ => {
                tracing::trace!(uuid = %sighting.uuid, "sighting from foreign region dropped");
                return None;
            }
        }
        if sighting.key().session != self.session {
            tracing::trace!(major = sighting.major, "sighting from foreign session dropped");
            return None;
        }

        let observation = BeaconObservation::from_sighting(sighting);
        if observation.is_none() {
            tracing::trace!(minor = sighting.minor, distance = sighting.distance, "sighting without distance dropped");
        }
        observation
    }
}
