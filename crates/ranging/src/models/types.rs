//! Core data types for raw ranging output.

use chrono::{DateTime, Utc};

use crate::identifiers::*;

// ============================================================================
// Enums
// ============================================================================

/// Which implementation is currently producing sightings.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BackendKind {
    Native,
    Simulated,
}

// ============================================================================
// Data Structures
// ============================================================================

/// A single detection delivered by a ranging backend.
///
/// This is exactly what arrives through `onBeaconDetected`, stamped with the
/// time it was queued. Nothing has been validated yet.
#[derive(Clone, Debug, PartialEq)]
pub struct BeaconSighting {
    pub uuid: String,
    pub major: i32,
    pub minor: i32,
    pub distance: f64, // meters; platforms report negative values for "unknown"
    pub rssi: f64,     // dBm
    pub observed_at: DateTime<Utc>,
}

impl BeaconSighting {
    pub fn key(&self) -> BeaconKey {
        BeaconKey::new(self.major, self.minor)
    }

    /// A sighting is usable when the platform produced an actual distance.
    pub fn has_valid_distance(&self) -> bool {
        self.distance.is_finite() && self.distance >= 0.0
    }
}

/// What a device advertises about itself.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Advertisement {
    pub uuid: String,
    pub session: SessionId,
    pub player: PlayerId,
}

// ============================================================================
// Errors
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RangingError {
    /// No ranging hardware, or the radio is switched off.
    #[error("Ranging backend unavailable: {0}")]
    Unavailable(String),

    #[error("Ranging permission denied")]
    PermissionDenied,

    #[error("Native bridge failure: {0}")]
    Bridge(String),
}

impl RangingError {
    /// Whether the caller should fall back to the simulated backend.
    pub fn is_unavailable(&self) -> bool {
        matches!(self, Self::Unavailable(_) | Self::PermissionDenied)
    }
}

pub type Result<T> = std::result::Result<T, RangingError>;
