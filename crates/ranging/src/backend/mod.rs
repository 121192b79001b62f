pub mod native;
pub mod simulated;
pub mod traits;

use std::sync::Arc;

use crate::backend::{
    native::NativeBackend,
    simulated::{SimulatedBackend, SimulatedIdentity, SimulationConfig},
    traits::{NativeRangingBridge, RangingBackend},
};
use crate::queue::ObservationSink;

/// Pick the backend for this device.
///
/// With no bridge, or a bridge that reports no hardware, the simulated
/// backend is used instead. Either way the result publishes into `sink`.
pub fn select_backend(
    bridge: Option<Arc<dyn NativeRangingBridge>>,
    simulation: SimulationConfig,
    identity: SimulatedIdentity,
    sink: ObservationSink,
) -> Box<dyn RangingBackend> {
    match bridge {
        Some(bridge) if bridge.is_available() => Box::new(NativeBackend::new(bridge)),
        Some(_) => {
            tracing::warn!("native ranging unavailable; using simulated backend");
            Box::new(SimulatedBackend::new(simulation, identity, sink))
        }
        None => {
            tracing::info!("no native ranging bridge; using simulated backend");
            Box::new(SimulatedBackend::new(simulation, identity, sink))
        }
    }
}
