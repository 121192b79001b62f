//! The ranging capability and the native call contract that backs it.

use std::time::Duration;

use crate::identifiers::{PlayerId, SessionId};
use crate::models::types::{Advertisement, BackendKind, Result};

/// Platform ranging: advertise ourselves, scan for everybody else.
///
/// Sightings are not returned from any method here. Each implementation is
/// constructed with an [`crate::queue::ObservationSink`] and publishes into
/// it from whatever context it likes.
///
/// All start/stop calls are idempotent. Stopping something that was never
/// started is a no-op.
pub trait RangingBackend: Send + Sync {
    fn kind(&self) -> BackendKind;

    fn start_advertising(&self, advertisement: &Advertisement) -> Result<()>;
    fn stop_advertising(&self);

    fn start_scanning(&self, uuid: &str) -> Result<()>;
    fn stop_scanning(&self);

    fn is_advertising(&self) -> bool;
    fn is_scanning(&self) -> bool;

    /// Optional direct query for one beacon's last known distance.
    fn distance_to_beacon(&self, session: SessionId, target: PlayerId) -> Option<f64>;

    /// Called by the consumer loop once per tick with the time since the
    /// previous tick. Backends that produce their own sightings use this as
    /// their only time source.
    fn advance(&self, _elapsed: Duration) {}
}

/// The native bridge, exactly as the platform plugin exposes it.
///
/// Detections do not come back through this trait; the platform calls
/// `onBeaconDetected` on an [`crate::queue::ObservationSink`] instead.
pub trait NativeRangingBridge: Send + Sync {
    /// Whether ranging hardware exists and the app may use it.
    fn is_available(&self) -> bool;

    fn start_advertising(&self, uuid: &str, session_id: i32, player_id: i32) -> Result<()>;
    fn stop_advertising(&self);

    fn start_scanning(&self, uuid: &str) -> Result<()>;
    fn stop_scanning(&self);

    /// Negative or non-finite return values mean "unknown".
    fn get_distance_to_beacon(&self, session_id: i32, target_id: i32) -> f64;
}
