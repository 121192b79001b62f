//! Deterministic stand-in for devices without ranging hardware.
//!
//! Emits one synthetic sighting per period while scanning. A Hunter sees a
//! random Evader; an Evader sees the Hunter. The RNG is seeded, so a given
//! configuration and tick sequence always yields the same sightings.

use std::collections::HashMap;
use std::ops::RangeInclusive;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use rand::{Rng, SeedableRng, rngs::StdRng};

use crate::backend::traits::RangingBackend;
use crate::identifiers::{BeaconKey, PlayerId, SessionId};
use crate::models::types::{Advertisement, BackendKind, Result};
use crate::queue::ObservationSink;

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SimulationConfig {
    /// Delay between starting a scan and the first sighting.
    pub initial_delay: Duration,
    pub period: Duration,
    pub seed: u64,
    pub min_distance: f64,
    pub max_distance: f64,
    /// Identifiers a simulated Hunter may detect.
    pub evader_ids: RangeInclusive<i32>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            initial_delay: Duration::from_secs(2),
            period: Duration::from_secs(3),
            seed: 0x5eed,
            min_distance: 0.5,
            max_distance: 30.0,
            evader_ids: 1001..=1006,
        }
    }
}

/// Who the simulated device is, fixed at construction.
#[derive(Clone, Copy, Debug)]
pub struct SimulatedIdentity {
    pub session: SessionId,
    pub player: PlayerId,
    pub hunter: PlayerId,
}

struct SimulationState {
    rng: StdRng,
    uuid: String,
    until_next: Duration,
    last_distances: HashMap<BeaconKey, f64>,
}

pub struct SimulatedBackend {
    config: SimulationConfig,
    identity: SimulatedIdentity,
    sink: ObservationSink,
    advertising: AtomicBool,
    scanning: AtomicBool,
    state: Mutex<SimulationState>,
}

impl SimulatedBackend {
    pub fn new(config: SimulationConfig, identity: SimulatedIdentity, sink: ObservationSink) -> Self {
        let state = SimulationState {
            rng: StdRng::seed_from_u64(config.seed),
            uuid: String::new(),
            until_next: config.initial_delay,
            last_distances: HashMap::new(),
        };

        Self {
            config,
            identity,
            sink,
            advertising: AtomicBool::new(false),
            scanning: AtomicBool::new(false),
            state: Mutex::new(state),
        }
    }

    fn emit(&self, state: &mut SimulationState) {
        let target = if self.identity.player == self.identity.hunter {
            let (lo, hi) = self.config.evader_ids.clone().into_inner();
            if lo > hi {
                return;
            }
            PlayerId::new(state.rng.random_range(lo..=hi))
        } else {
            self.identity.hunter
        };

        let (lo, hi) = (self.config.min_distance, self.config.max_distance);
        let distance = if hi > lo {
            state.rng.random_range(lo..hi)
        } else {
            lo
        };
        // rough free-space falloff
        let rssi = -40.0 - distance * 2.0;

        let key = BeaconKey {
            session: self.identity.session,
            player: target,
        };
        state.last_distances.insert(key, distance);

        tracing::debug!(%target, distance, "synthetic sighting");
        self.sink.on_beacon_detected(
            &state.uuid,
            key.session.get(),
            key.player.get(),
            distance,
            rssi,
        );
    }
}

impl RangingBackend for SimulatedBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Simulated
    }

    fn start_advertising(&self, advertisement: &Advertisement) -> Result<()> {
        if !self.advertising.swap(true, Ordering::AcqRel) {
            tracing::info!(player = %advertisement.player, "[simulated] advertising started");
        }
        Ok(())
    }

    fn stop_advertising(&self) {
        if self.advertising.swap(false, Ordering::AcqRel) {
            tracing::info!("[simulated] advertising stopped");
        }
    }

    fn start_scanning(&self, uuid: &str) -> Result<()> {
        if self.scanning.load(Ordering::Acquire) {
            return Ok(());
        }

        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        state.uuid = uuid.to_owned();
        state.until_next = self.config.initial_delay;
        self.scanning.store(true, Ordering::Release);

        tracing::info!(uuid, "[simulated] scanning started");
        Ok(())
    }

    fn stop_scanning(&self) {
        if self.scanning.swap(false, Ordering::AcqRel) {
            tracing::info!("[simulated] scanning stopped");
        }
    }

    fn is_advertising(&self) -> bool {
        self.advertising.load(Ordering::Acquire)
    }

    fn is_scanning(&self) -> bool {
        self.scanning.load(Ordering::Acquire)
    }

    fn distance_to_beacon(&self, session: SessionId, target: PlayerId) -> Option<f64> {
        let state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        state
            .last_distances
            .get(&BeaconKey {
                session,
                player: target,
            })
            .copied()
    }

    fn advance(&self, elapsed: Duration) {
        if !self.is_scanning() || self.config.period.is_zero() {
            return;
        }

        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        let mut remaining = elapsed;

        // A long tick may cover several periods; emit once for each.
        while remaining >= state.until_next {
            remaining -= state.until_next;
            state.until_next = self.config.period;
            self.emit(&mut state);
        }
        state.until_next -= remaining;
    }
}
