//! The explicit home of all proximity state for one device.
//!
//! A host builds exactly one [`ProximityContext`] per session and drives it
//! with [`ProximityContext::tick`]. Independent contexts share nothing, so
//! tests can run several side by side.

use std::sync::Arc;
use std::time::Duration;

use pursuit_ranging::{
    Advertisement, BackendKind, Clock, NativeRangingBridge, ObservationDrain, ObservationSink,
    RangingBackend, RangingError, SimulatedBackend, SimulatedIdentity, observation_queue, select_backend,
};

use crate::config::HeartbeatConfig;
use crate::error::Result;
use crate::feedback::{FeedbackFrame, FeedbackSink, FeedbackSynthesizer, sink::dispatch};
use crate::heartbeat::{HeartbeatLevelEngine, LevelChanged, LevelUpdate};
use crate::proximity::{BeaconObservation, ProximityRegistry, SightingFilter, UNKNOWN_DISTANCE};
use crate::role::{PlayerIdentity, PlayerRole};
use crate::validation::{AccuracyStats, AccuracyValidator, ValidationError, ValidationRecord};

#[cfg(feature = "calibration")]
use crate::validation::calibration::CalibrationSampler;

/// What one tick consumed and produced.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TickReport {
    pub admitted: usize,
    pub rejected: usize,
    pub update: LevelUpdate,
    pub frame: FeedbackFrame,
}

pub struct ProximityContext {
    config: HeartbeatConfig,
    identity: PlayerIdentity,
    clock: Arc<dyn Clock>,
    filter: SightingFilter,
    sink: ObservationSink,
    drain: ObservationDrain,
    backend: Box<dyn RangingBackend>,
    registry: ProximityRegistry,
    engine: HeartbeatLevelEngine,
    synthesizer: FeedbackSynthesizer,
    validator: AccuracyValidator,
    #[cfg(feature = "calibration")]
    calibration: CalibrationSampler,
    sinks: Vec<Box<dyn FeedbackSink>>,
    running: bool,
}

impl ProximityContext {
    /// Validates `config` and picks a backend. Without a bridge, or with one
    /// that reports no hardware, the simulated backend is used.
    pub fn new(
        config: HeartbeatConfig,
        identity: PlayerIdentity,
        bridge: Option<Arc<dyn NativeRangingBridge>>,
        clock: Arc<dyn Clock>,
    ) -> Result<Self> {
        config.validate()?;
        let filter = SightingFilter::new(config.identity.region()?, config.identity.session_id);

        let (sink, drain) = observation_queue(clock.clone());
        let backend = select_backend(
            bridge,
            config.simulation.clone(),
            simulated_identity(&config, &identity),
            sink.clone(),
        );

        tracing::info!(
            player = %identity.player,
            role = %identity.role(),
            backend = ?backend.kind(),
            "proximity context created"
        );

        Ok(Self {
            filter,
            sink,
            drain,
            backend,
            registry: ProximityRegistry::new(identity, &config.registry),
            engine: HeartbeatLevelEngine::new(config.levels, config.cadence),
            synthesizer: FeedbackSynthesizer::new(config.feedback.clone()),
            validator: AccuracyValidator::new(&config.validation, clock.clone()),
            #[cfg(feature = "calibration")]
            calibration: CalibrationSampler::new(&config.validation),
            sinks: Vec::new(),
            running: false,
            identity,
            clock,
            config,
        })
    }

    // ========================================================================
    // Lifecycle
    // ========================================================================

    /// Start scanning, then advertising. Safe to call repeatedly.
    ///
    /// An unavailable native backend is swapped for the simulated one and the
    /// start is retried; other ranging errors are returned.
    pub fn start(&mut self) -> Result<()> {
        match self.start_backend() {
            Ok(()) => {}
            Err(error) if error.is_unavailable() && self.backend.kind() == BackendKind::Native => {
                tracing::warn!(%error, "native ranging failed to start; falling back to simulation");
                self.backend.stop_scanning();
                self.backend.stop_advertising();
                self.backend = Box::new(SimulatedBackend::new(
                    self.config.simulation.clone(),
                    simulated_identity(&self.config, &self.identity),
                    self.sink.clone(),
                ));
                self.start_backend()?;
            }
            Err(error) => return Err(error.into()),
        }

        if !self.running {
            tracing::info!(backend = ?self.backend.kind(), "proximity sensing started");
        }
        self.running = true;
        Ok(())
    }

    /// Stop both directions. Safe to call when never started.
    pub fn stop(&mut self) {
        self.backend.stop_scanning();
        self.backend.stop_advertising();
        if self.running {
            tracing::info!("proximity sensing stopped");
        }
        self.running = false;
    }

    fn start_backend(&self) -> std::result::Result<(), RangingError> {
        self.backend.start_scanning(&self.config.identity.region_uuid)?;
        self.backend.start_advertising(&Advertisement {
            uuid: self.config.identity.region_uuid.clone(),
            session: self.config.identity.session_id,
            player: self.identity.player,
        })
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn backend_kind(&self) -> BackendKind {
        self.backend.kind()
    }

    // ========================================================================
    // Consumer loop
    // ========================================================================

    /// One pass of the consumer loop.
    ///
    /// Drains the queue into the registry, reclassifies, synthesizes feedback
    /// and hands it to every registered sink.
    pub fn tick(&mut self, elapsed: Duration) -> TickReport {
        self.backend.advance(elapsed);

        let (mut admitted, mut rejected) = (0, 0);
        for sighting in self.drain.drain() {
            match self.filter.admit(&sighting) {
                Some(observation) => {
                    self.registry.record_observation(observation);
                    admitted += 1;
                }
                None => rejected += 1,
            }
        }

        let distance = self.heartbeat_distance();
        let update = self.engine.tick(distance, elapsed);
        let frame = self.synthesizer.synthesize(&update, elapsed);
        for sink in &mut self.sinks {
            dispatch(sink.as_mut(), &frame, update.changed.as_ref());
        }

        #[cfg(feature = "calibration")]
        self.calibration.advance(elapsed, &self.registry, &mut self.validator);

        TickReport {
            admitted,
            rejected,
            update,
            frame,
        }
    }

    /// The Hunter hears no heartbeat of their own.
    fn heartbeat_distance(&self) -> f64 {
        match self.identity.role() {
            PlayerRole::Hunter => UNKNOWN_DISTANCE,
            PlayerRole::Evader => self.registry.distance_to_opponent_role(self.clock.now()),
        }
    }

    /// Producer end for `onBeaconDetected`. Clone freely across threads.
    pub fn observation_sink(&self) -> ObservationSink {
        self.sink.clone()
    }

    pub fn add_sink(&mut self, sink: Box<dyn FeedbackSink>) {
        self.sinks.push(sink);
    }

    pub fn clear_sinks(&mut self) {
        self.sinks.clear();
    }

    /// Polled alternative to a level-changed callback.
    pub fn take_level_changed(&mut self) -> Option<LevelChanged> {
        self.engine.take_changed()
    }

    pub fn trigger_flash(&mut self) {
        self.synthesizer.trigger_flash();
    }

    // ========================================================================
    // Queries
    // ========================================================================

    pub fn config(&self) -> &HeartbeatConfig {
        &self.config
    }

    pub fn identity(&self) -> &PlayerIdentity {
        &self.identity
    }

    pub fn clock(&self) -> &Arc<dyn Clock> {
        &self.clock
    }

    pub fn registry(&self) -> &ProximityRegistry {
        &self.registry
    }

    pub fn engine(&self) -> &HeartbeatLevelEngine {
        &self.engine
    }

    pub fn nearby_players(&self) -> Vec<BeaconObservation> {
        self.registry
            .nearby_players(self.clock.now())
            .into_iter()
            .cloned()
            .collect()
    }

    pub fn distance_to_opponent(&self) -> f64 {
        self.registry.distance_to_opponent_role(self.clock.now())
    }

    /// Direct backend query, bypassing the registry.
    pub fn distance_to_beacon(&self, target: pursuit_ranging::PlayerId) -> Option<f64> {
        self.backend
            .distance_to_beacon(self.config.identity.session_id, target)
    }

    // ========================================================================
    // Validation
    // ========================================================================

    pub fn validator(&self) -> &AccuracyValidator {
        &self.validator
    }

    pub fn validator_mut(&mut self) -> &mut AccuracyValidator {
        &mut self.validator
    }

    pub fn validate_manual(&mut self, actual: f64) -> std::result::Result<ValidationRecord, ValidationError> {
        self.validator
            .validate_manual(&self.registry, actual)
            .cloned()
    }

    pub fn validation_stats(&self) -> AccuracyStats {
        self.validator.stats()
    }
}

impl Drop for ProximityContext {
    fn drop(&mut self) {
        self.stop();
    }
}

fn simulated_identity(config: &HeartbeatConfig, identity: &PlayerIdentity) -> SimulatedIdentity {
    SimulatedIdentity {
        session: config.identity.session_id,
        player: identity.player,
        hunter: identity.hunter,
    }
}
