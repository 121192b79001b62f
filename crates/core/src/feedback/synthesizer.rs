use std::time::Duration;

use crate::feedback::{
    FeedbackConfig,
    cue::CueBucket,
    haptics::HapticStrength,
    visual::{DamageFlash, PulseEffect, ScreenShake, SmoothedValue},
};
use crate::heartbeat::{BeatTimer, HeartbeatLevel, LevelUpdate};

/// Sink contract for the audio player.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct AudioOutput {
    pub volume: f64,
    pub cue: CueBucket,
    /// True when a heartbeat should be played this tick.
    pub beat: bool,
    pub ambient: SmoothedValue,
}

/// Sink contract for the overlay renderer.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct VisualOutput {
    /// Raw target alpha for the vignette; the renderer may animate toward it.
    pub alpha_target: f64,
    pub vignette: SmoothedValue,
    /// Damage flash drawn on top of the vignette; zero when no flash is showing.
    pub flash_alpha: f64,
    pub danger: SmoothedValue,
    pub pulse_alpha: f64,
    pub shake_offset: (f64, f64),
    pub ui_beat: bool,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FeedbackFrame {
    pub audio: AudioOutput,
    /// Present only on ticks where the vibration timer fired.
    pub haptic: Option<HapticStrength>,
    pub visual: VisualOutput,
}

/// Shapes normalized intensity into output values. Owns the smoothing and
/// effect timers so that all per-channel state lives in one place.
#[derive(Clone, Debug)]
pub struct FeedbackSynthesizer {
    config: FeedbackConfig,
    vibration: BeatTimer,
    vignette: SmoothedValue,
    danger: SmoothedValue,
    ambient: SmoothedValue,
    pulse: PulseEffect,
    shake: ScreenShake,
    flash: DamageFlash,
}

impl FeedbackSynthesizer {
    pub fn new(config: FeedbackConfig) -> Self {
        Self {
            vibration: BeatTimer::new(config.vibration_interval),
            vignette: SmoothedValue::default(),
            danger: SmoothedValue::default(),
            ambient: SmoothedValue::default(),
            pulse: PulseEffect::new(config.pulse.clone()),
            shake: ScreenShake::new(config.shake),
            flash: DamageFlash::default(),
            config,
        }
    }

    pub fn config(&self) -> &FeedbackConfig {
        &self.config
    }

    /// Volume for the given intensity; zero when there is no level.
    pub fn volume(&self, update: &LevelUpdate) -> f64 {
        if !update.reading.is_active() {
            return 0.0;
        }
        self.config.volume_curve.evaluate(update.normalized) * self.config.max_volume
    }

    pub fn cue(&self, update: &LevelUpdate) -> CueBucket {
        if !update.reading.is_active() {
            return CueBucket::Silent;
        }
        self.config.cue_thresholds.select(update.distance)
    }

    pub fn alpha_target(&self, update: &LevelUpdate) -> f64 {
        if !update.reading.is_active() {
            return 0.0;
        }
        let alpha = update.normalized * self.config.max_alpha;
        if update.reading.critical {
            alpha.max(self.config.critical_alpha_floor)
        } else {
            alpha
        }
    }

    /// Red flash over the vignette, e.g. when caught.
    pub fn trigger_flash(&mut self) {
        self.flash.trigger();
    }

    pub fn synthesize(&mut self, update: &LevelUpdate, elapsed: Duration) -> FeedbackFrame {
        let active = update.reading.is_active();

        let haptic = if active && self.config.vibration_enabled {
            self.vibration
                .advance(elapsed)
                .then(|| HapticStrength::from_strength(self.config.vibration_curve.evaluate(update.normalized)))
        } else {
            self.vibration.reset();
            None
        };

        self.ambient.target = if active { self.config.ambient_max_volume } else { 0.0 };
        self.ambient.advance(self.config.ambient_smoothing_rate, elapsed);

        let alpha_target = self.alpha_target(update);
        self.vignette.target = alpha_target;
        self.vignette.advance(self.config.alpha_smoothing_rate, elapsed);
        let flash_alpha = self.flash.advance(elapsed);

        self.danger.target = self.config.danger_overlay.target(update.reading.level, update.distance);
        self.danger.advance(self.config.alpha_smoothing_rate, elapsed);

        self.pulse.set_level(update.reading.level);
        let pulse_alpha = self.pulse.advance(elapsed);
        let shake_offset = self.shake.advance(update.reading.level == HeartbeatLevel::Near, elapsed);

        FeedbackFrame {
            audio: AudioOutput {
                volume: self.volume(update),
                cue: self.cue(update),
                beat: update.audio_beat,
                ambient: self.ambient,
            },
            haptic,
            visual: VisualOutput {
                alpha_target,
                vignette: self.vignette,
                flash_alpha,
                danger: self.danger,
                pulse_alpha,
                shake_offset,
                ui_beat: update.ui_beat,
            },
        }
    }

    /// Drop all smoothing and effect state.
    pub fn reset(&mut self) {
        *self = Self::new(self.config.clone());
    }
}
