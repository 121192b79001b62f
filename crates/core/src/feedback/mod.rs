//! Turns a level update into output values for audio, haptics and visuals.
//!
//! Nothing here plays, vibrates or renders. The synthesizer produces a
//! [`FeedbackFrame`] each tick and [`sink::dispatch`] hands it to whatever
//! [`FeedbackSink`]s the host registered.

pub mod cue;
pub mod curve;
pub mod haptics;
pub mod sink;
pub mod synthesizer;
pub mod visual;

use serde::{Deserialize, Serialize};

use crate::config::{ConfigError, ensure_non_negative, ensure_positive, ensure_unit};

pub use cue::{CueBucket, CueThresholds};
pub use curve::ResponseCurve;
pub use haptics::HapticStrength;
pub use sink::{FeedbackSink, RecordingSink};
pub use synthesizer::{AudioOutput, FeedbackFrame, FeedbackSynthesizer, VisualOutput};
pub use visual::{DangerOverlayConfig, PulseConfig, ShakeConfig, SmoothedValue};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedbackConfig {
    pub max_volume: f64,
    pub volume_curve: ResponseCurve,
    pub cue_thresholds: CueThresholds,
    pub vibration_enabled: bool,
    /// Seconds between vibration pulses, independent of the beat cadence.
    pub vibration_interval: f64,
    pub vibration_curve: ResponseCurve,
    pub max_alpha: f64,
    pub critical_alpha_floor: f64,
    /// Fraction of the remaining gap closed per second.
    pub alpha_smoothing_rate: f64,
    pub ambient_max_volume: f64,
    pub ambient_smoothing_rate: f64,
    pub danger_overlay: DangerOverlayConfig,
    pub pulse: PulseConfig,
    pub shake: ShakeConfig,
}

impl Default for FeedbackConfig {
    fn default() -> Self {
        Self {
            max_volume: 1.0,
            volume_curve: ResponseCurve::ease_in_out(0.1, 1.0),
            cue_thresholds: CueThresholds::default(),
            vibration_enabled: true,
            vibration_interval: 0.5,
            vibration_curve: ResponseCurve::ease_in_out(0.0, 1.0),
            max_alpha: 0.6,
            critical_alpha_floor: 0.8,
            alpha_smoothing_rate: 2.0,
            ambient_max_volume: 0.3,
            ambient_smoothing_rate: 2.0,
            danger_overlay: DangerOverlayConfig::default(),
            pulse: PulseConfig::default(),
            shake: ShakeConfig::default(),
        }
    }
}

impl FeedbackConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        ensure_unit("feedback.max_volume", self.max_volume)?;
        ensure_unit("feedback.max_alpha", self.max_alpha)?;
        ensure_unit("feedback.critical_alpha_floor", self.critical_alpha_floor)?;
        ensure_unit("feedback.ambient_max_volume", self.ambient_max_volume)?;
        ensure_unit("feedback.danger_overlay.max_alpha", self.danger_overlay.max_alpha)?;
        ensure_unit("feedback.pulse.max_alpha", self.pulse.max_alpha)?;

        ensure_positive("feedback.vibration_interval", self.vibration_interval)?;
        ensure_positive("feedback.pulse.far_period", self.pulse.far_period)?;
        ensure_positive("feedback.pulse.mid_period", self.pulse.mid_period)?;
        ensure_positive("feedback.pulse.near_period", self.pulse.near_period)?;
        ensure_positive("feedback.shake.interval", self.shake.interval)?;

        ensure_non_negative("feedback.alpha_smoothing_rate", self.alpha_smoothing_rate)?;
        ensure_non_negative("feedback.ambient_smoothing_rate", self.ambient_smoothing_rate)?;
        ensure_non_negative("feedback.pulse.rest", self.pulse.rest)?;
        ensure_non_negative("feedback.shake.intensity", self.shake.intensity)?;

        self.volume_curve.validate("feedback.volume_curve")?;
        self.vibration_curve.validate("feedback.vibration_curve")?;
        self.pulse.curve.validate("feedback.pulse.curve")?;
        self.cue_thresholds.validate()
    }
}
