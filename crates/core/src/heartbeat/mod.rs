//! Distance classification, beat cadence and the normalized intensity that
//! drives every feedback curve.

pub mod cadence;
pub mod engine;
pub mod intensity;
pub mod level;

pub use cadence::{BeatTimer, CadenceConfig, CadenceTable};
pub use engine::{HeartbeatLevelEngine, LevelChanged, LevelUpdate};
pub use intensity::{clamp01, normalized_intensity};
pub use level::{HeartbeatLevel, LevelReading, Thresholds, classify};
