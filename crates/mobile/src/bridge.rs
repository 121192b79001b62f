//! The platform ranging plugin, implemented on the Kotlin/Swift side.

use std::sync::Arc;

use pursuit_core::ranging::{NativeRangingBridge, RangingError};

#[derive(Debug, thiserror::Error, uniffi::Error)]
pub enum PlatformError {
    #[error("ranging unavailable: {reason}")]
    Unavailable { reason: String },
    #[error("ranging permission denied")]
    PermissionDenied,
    #[error("platform failure: {reason}")]
    Failed { reason: String },
}

impl From<uniffi::UnexpectedUniFFICallbackError> for PlatformError {
    fn from(error: uniffi::UnexpectedUniFFICallbackError) -> Self {
        Self::Failed {
            reason: error.reason,
        }
    }
}

impl From<PlatformError> for RangingError {
    fn from(error: PlatformError) -> Self {
        match error {
            PlatformError::Unavailable { reason } => Self::Unavailable(reason),
            PlatformError::PermissionDenied => Self::PermissionDenied,
            PlatformError::Failed { reason } => Self::Bridge(reason),
        }
    }
}

/// Sightings do not come back through here; the platform calls
/// `HeartbeatSession::on_beacon_detected` instead.
#[uniffi::export(with_foreign)]
pub trait PlatformRanging: Send + Sync {
    fn is_available(&self) -> bool;

    fn start_advertising(&self, uuid: String, session_id: i32, player_id: i32) -> Result<(), PlatformError>;
    fn stop_advertising(&self);

    fn start_scanning(&self, uuid: String) -> Result<(), PlatformError>;
    fn stop_scanning(&self);

    /// Negative when unknown.
    fn get_distance_to_beacon(&self, session_id: i32, target_id: i32) -> f64;
}

pub(crate) struct PlatformBridge(pub Arc<dyn PlatformRanging>);

impl NativeRangingBridge for PlatformBridge {
    fn is_available(&self) -> bool {
        self.0.is_available()
    }

    fn start_advertising(&self, uuid: &str, session_id: i32, player_id: i32) -> Result<(), RangingError> {
        Ok(self.0.start_advertising(uuid.to_owned(), session_id, player_id)?)
    }

    fn stop_advertising(&self) {
        self.0.stop_advertising();
    }

    fn start_scanning(&self, uuid: &str) -> Result<(), RangingError> {
        Ok(self.0.start_scanning(uuid.to_owned())?)
    }

    fn stop_scanning(&self) {
        self.0.stop_scanning();
    }

    fn get_distance_to_beacon(&self, session_id: i32, target_id: i32) -> f64 {
        self.0.get_distance_to_beacon(session_id, target_id)
    }
}
