use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use pursuit_core::{
    ConfigError, HeartbeatConfig, PlayerIdentity, ProximityContext,
    driver::run_consumer_loop,
    ranging::{BackendKind, NativeRangingBridge, ObservationSink, PlayerId, SystemClock},
    validation::ValidationError,
};
use tokio::runtime::Runtime;
use tokio::sync::oneshot;

use crate::bridge::{PlatformBridge, PlatformRanging};
use crate::listener::{FeedbackListener, ListenerSink};
use crate::types::{Level, LevelChangedEvent, NearbyPlayer, TickSummary, ValidationResult, ValidationSummary};

#[derive(Debug, thiserror::Error, uniffi::Error)]
#[uniffi(flat_error)]
pub enum SessionError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Core(#[from] pursuit_core::Error),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("{0}")]
    Polling(#[from] std::io::Error),
}

/// Background ticking on a private runtime. Stops when dropped.
struct Poller {
    #[allow(dead_code)] // Kept alive to keep the loop running
    runtime: Runtime,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl Poller {
    fn start(context: Arc<Mutex<ProximityContext>>, period: Duration) -> Result<Self, std::io::Error> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .thread_name("pursuit-poller")
            .enable_time()
            .build()?;

        let (shutdown_tx, shutdown_rx) = oneshot::channel();
        runtime.spawn(run_consumer_loop(context, period, shutdown_rx, |report| {
            if let Some(event) = report.update.changed {
                tracing::debug!(from = %event.previous.level, to = %event.reading.level, "level changed");
            }
        }));

        Ok(Self {
            runtime,
            shutdown_tx: Some(shutdown_tx),
        })
    }
}

impl Drop for Poller {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

/// One device's proximity session, as seen from Kotlin/Swift.
#[derive(uniffi::Object)]
pub struct HeartbeatSession {
    context: Arc<Mutex<ProximityContext>>,
    sink: ObservationSink,
    poller: Mutex<Option<Poller>>,
}

impl HeartbeatSession {
    fn build(
        config_json: &str,
        player_id: Option<String>,
        bridge: Option<Arc<dyn NativeRangingBridge>>,
    ) -> Result<Self, SessionError> {
        let config = if config_json.trim().is_empty() {
            HeartbeatConfig::default()
        } else {
            HeartbeatConfig::from_json_str(config_json)?
        };
        let identity = PlayerIdentity::resolve(
            player_id.as_deref(),
            config.identity.hunter_id,
            config.identity.default_player_id,
        );

        let context = ProximityContext::new(config, identity, bridge, Arc::new(SystemClock))?;
        let sink = context.observation_sink();
        Ok(Self {
            context: Arc::new(Mutex::new(context)),
            sink,
            poller: Mutex::new(None),
        })
    }

    fn context(&self) -> MutexGuard<'_, ProximityContext> {
        self.context.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn poller(&self) -> MutexGuard<'_, Option<Poller>> {
        self.poller.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[uniffi::export]
impl HeartbeatSession {
    /// Simulated ranging. An empty `config_json` means defaults.
    #[uniffi::constructor]
    pub fn new(config_json: String, player_id: Option<String>) -> Result<Self, SessionError> {
        Self::build(&config_json, player_id, None)
    }

    /// Platform ranging, falling back to simulation when it is unavailable.
    #[uniffi::constructor]
    pub fn with_platform(
        config_json: String,
        player_id: Option<String>,
        platform: Arc<dyn PlatformRanging>,
    ) -> Result<Self, SessionError> {
        Self::build(&config_json, player_id, Some(Arc::new(PlatformBridge(platform))))
    }

    pub fn start(&self) -> Result<(), SessionError> {
        Ok(self.context().start()?)
    }

    pub fn stop(&self) {
        self.stop_polling();
        self.context().stop();
    }

    pub fn is_running(&self) -> bool {
        self.context().is_running()
    }

    pub fn is_simulated(&self) -> bool {
        self.context().backend_kind() == BackendKind::Simulated
    }

    pub fn player_id(&self) -> i32 {
        self.context().identity().player.get()
    }

    pub fn is_hunter(&self) -> bool {
        let context = self.context();
        context.identity().player == context.identity().hunter
    }

    /// `onBeaconDetected`. Never blocks on the session lock.
    pub fn on_beacon_detected(&self, uuid: String, major: i32, minor: i32, distance: f64, rssi: f64) {
        self.sink.on_beacon_detected(&uuid, major, minor, distance, rssi);
    }

    /// Advance by `elapsed_seconds`. Negative or non-finite input counts as zero.
    ///
    /// While polling, the poller owns the clock: this still drains pending
    /// sightings and reports the current state, but advances no timers.
    pub fn tick(&self, elapsed_seconds: f64) -> TickSummary {
        let polling = self.poller().is_some();
        let elapsed = if polling {
            Duration::ZERO
        } else {
            Duration::try_from_secs_f64(elapsed_seconds).unwrap_or(Duration::ZERO)
        };
        let report = self.context().tick(elapsed);
        TickSummary::from(&report)
    }

    /// Tick every `period_ms` on a background thread until `stop_polling`.
    pub fn start_polling(&self, period_ms: u64) -> Result<(), SessionError> {
        let period = Duration::from_millis(period_ms.max(1));
        let mut poller = self.poller();
        // the old runtime must be gone before the new loop ticks
        drop(poller.take());
        *poller = Some(Poller::start(self.context.clone(), period)?);
        Ok(())
    }

    pub fn stop_polling(&self) {
        drop(self.poller().take());
    }

    pub fn set_listener(&self, listener: Option<Arc<dyn FeedbackListener>>) {
        let mut context = self.context();
        context.clear_sinks();
        if let Some(listener) = listener {
            context.add_sink(Box::new(ListenerSink(listener)));
        }
    }

    pub fn take_level_changed(&self) -> Option<LevelChangedEvent> {
        self.context().take_level_changed().as_ref().map(Into::into)
    }

    pub fn trigger_flash(&self) {
        self.context().trigger_flash();
    }

    pub fn current_level(&self) -> Level {
        self.context().engine().current().into()
    }

    pub fn nearby_players(&self) -> Vec<NearbyPlayer> {
        self.context().nearby_players().iter().map(Into::into).collect()
    }

    /// Infinite when the opponent has not been seen.
    pub fn distance_to_opponent(&self) -> f64 {
        self.context().distance_to_opponent()
    }

    pub fn distance_to_beacon(&self, player_id: i32) -> Option<f64> {
        self.context().distance_to_beacon(PlayerId::new(player_id))
    }

    pub fn validate_manual(&self, actual_distance: f64) -> Result<ValidationResult, SessionError> {
        let record = self.context().validate_manual(actual_distance)?;
        Ok(ValidationResult::from(&record))
    }

    pub fn record_sample(&self, actual: f64, measured: f64, rssi: f64) -> Result<ValidationResult, SessionError> {
        let mut context = self.context();
        let record = context.validator_mut().record_sample(actual, measured, rssi)?;
        Ok(ValidationResult::from(record))
    }

    pub fn validation_stats(&self) -> ValidationSummary {
        ValidationSummary::from(&self.context().validation_stats())
    }

    pub fn export_csv(&self) -> Result<String, SessionError> {
        Ok(self.context().validator().export_csv()?)
    }

    /// Returns the written file's path.
    pub fn write_csv(&self, directory: String) -> Result<String, SessionError> {
        let path = self.context().validator().write_csv(directory.as_ref())?;
        Ok(path.to_string_lossy().into_owned())
    }

    pub fn clear_validation(&self) {
        self.context().validator_mut().clear();
    }
}

impl Drop for HeartbeatSession {
    fn drop(&mut self) {
        self.stop_polling();
    }
}
