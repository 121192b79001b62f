//! Who is near us, and how far away.

pub mod filter;
pub mod observation;
pub mod registry;

pub use filter::SightingFilter;
pub use observation::BeaconObservation;
pub use registry::{ProximityRegistry, RegistryConfig, UNKNOWN_DISTANCE};
