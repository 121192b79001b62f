//! # pursuit-core
//!
//! Proximity sensing for a Hunter/Evader chase: sightings in, heartbeat
//! feedback out.
//!
//! ```text
//! RangingBackend -> ProximityRegistry -> HeartbeatLevelEngine -> FeedbackSynthesizer -> sinks
//!                          |
//!                          +-> AccuracyValidator
//! ```
//!
//! Everything is owned by one [`ProximityContext`] and advanced by
//! [`ProximityContext::tick`] with an explicit elapsed time.

pub mod config;
pub mod context;
pub mod driver;
pub mod error;
pub mod feedback;
pub mod heartbeat;
pub mod proximity;
pub mod role;
pub mod validation;

// Re-export ranging from the ranging crate
pub use pursuit_ranging as ranging;

pub use config::{ConfigError, HeartbeatConfig};
pub use context::{ProximityContext, TickReport};
pub use error::{Error, Result};
pub use role::{PlayerIdentity, PlayerRole};
