//! # pursuit-ranging
//!
//! Short-range wireless ranging behind a single capability trait.
//!
//! ## Pieces
//!
//! - **Backends**: [`NativeBackend`] forwards to the platform plugin,
//!   [`SimulatedBackend`] synthesizes sightings for devices without hardware
//! - **Queue**: sightings arrive on arbitrary threads and are handed to the
//!   consumer loop through an [`ObservationSink`] / [`ObservationDrain`] pair
//! - **Clock**: every timestamp comes from a [`Clock`] so expiry can be tested
//!
//! ## Example
//!
//! ```
//! use std::{sync::Arc, time::Duration};
//! use pursuit_ranging::prelude::*;
//!
//! let (sink, mut drain) = observation_queue(Arc::new(SystemClock));
//! let identity = SimulatedIdentity {
//!     session: SessionId::new(1),
//!     player: PlayerId::new(1001),
//!     hunter: PlayerId::new(1000),
//! };
//! let backend = select_backend(None, SimulationConfig::default(), identity, sink);
//!
//! backend.start_scanning("550e8400-e29b-41d4-a716-446655440000").unwrap();
//! backend.advance(Duration::from_secs(2));
//!
//! let sightings = drain.drain();
//! assert_eq!(sightings.len(), 1);
//! assert_eq!(sightings[0].minor, 1000);
//! ```

pub mod backend;
pub mod identifiers;
pub mod models;
pub mod queue;

pub mod prelude {
    pub use crate::backend::{
        native::NativeBackend,
        select_backend,
        simulated::{SimulatedBackend, SimulatedIdentity, SimulationConfig},
        traits::*,
    };
    pub use crate::identifiers::*;
    pub use crate::models::{clock::*, types::*};
    pub use crate::queue::{ObservationDrain, ObservationSink, observation_queue};
}

pub use prelude::*;
