//! Visual effect state. Every effect here is plain data advanced by an
//! explicit elapsed time; the renderer only reads the results.

use std::time::Duration;

use rand::{Rng, SeedableRng, rngs::StdRng};
use serde::{Deserialize, Serialize};

use crate::feedback::curve::ResponseCurve;
use crate::heartbeat::{HeartbeatLevel, clamp01};

/// `(value - a) / (b - a)` clamped to `[0, 1]`. Works with `a > b`.
pub fn inverse_lerp(a: f64, b: f64, value: f64) -> f64 {
    if a == b {
        return 0.0;
    }
    clamp01((value - a) / (b - a))
}

// ============================================================================
// Smoothing
// ============================================================================

/// A value easing toward its target. Both halves are public contract.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SmoothedValue {
    pub current: f64,
    pub target: f64,
}

impl SmoothedValue {
    pub fn new(value: f64) -> Self {
        Self {
            current: value,
            target: value,
        }
    }

    /// Exponential approach: each step covers `rate * elapsed` of the
    /// remaining gap, capped at all of it.
    pub fn advance(&mut self, rate: f64, elapsed: Duration) -> f64 {
        let step = clamp01(rate * elapsed.as_secs_f64());
        self.current += (self.target - self.current) * step;
        self.current
    }

    pub fn snap(&mut self) {
        self.current = self.target;
    }
}

// ============================================================================
// Danger overlay
// ============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DangerOverlayConfig {
    /// Overlay starts fading in below this distance.
    pub start_distance: f64,
    /// Overlay is fully opaque (at `max_alpha`) from here inward.
    pub full_distance: f64,
    pub max_alpha: f64,
}

impl Default for DangerOverlayConfig {
    fn default() -> Self {
        Self {
            start_distance: 10.0,
            full_distance: 2.0,
            max_alpha: 0.3,
        }
    }
}

impl DangerOverlayConfig {
    /// Only the Near band shows the overlay.
    pub fn target(&self, level: HeartbeatLevel, distance: f64) -> f64 {
        if level != HeartbeatLevel::Near {
            return 0.0;
        }
        inverse_lerp(self.start_distance, self.full_distance, distance) * self.max_alpha
    }
}

// ============================================================================
// Pulse
// ============================================================================

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PulseConfig {
    pub far_period: f64,
    pub mid_period: f64,
    pub near_period: f64,
    /// Dark gap between pulses.
    pub rest: f64,
    pub max_alpha: f64,
    pub curve: ResponseCurve,
}

impl Default for PulseConfig {
    fn default() -> Self {
        Self {
            far_period: 2.0,
            mid_period: 1.5,
            near_period: 1.0,
            rest: 0.1,
            max_alpha: 0.3,
            curve: ResponseCurve::ease_in_out(0.0, 1.0),
        }
    }
}

impl PulseConfig {
    pub fn period_for(&self, level: HeartbeatLevel) -> Option<f64> {
        match level {
            HeartbeatLevel::None => None,
            HeartbeatLevel::Far => Some(self.far_period),
            HeartbeatLevel::Mid => Some(self.mid_period),
            HeartbeatLevel::Near => Some(self.near_period),
        }
    }
}

/// A repeating ramp: rises along the curve for one period, then rests.
#[derive(Clone, Debug, PartialEq)]
pub struct PulseEffect {
    config: PulseConfig,
    period: Option<f64>,
    phase: f64,
    alpha: f64,
}

impl PulseEffect {
    pub fn new(config: PulseConfig) -> Self {
        Self {
            config,
            period: None,
            phase: 0.0,
            alpha: 0.0,
        }
    }

    pub fn is_active(&self) -> bool {
        self.period.is_some()
    }

    pub fn period(&self) -> Option<f64> {
        self.period
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    /// Switching to a different period restarts the ramp.
    pub fn set_level(&mut self, level: HeartbeatLevel) {
        let period = self.config.period_for(level).filter(|p| *p > 0.0);
        if period != self.period {
            self.period = period;
            self.phase = 0.0;
            self.alpha = 0.0;
        }
    }

    pub fn advance(&mut self, elapsed: Duration) -> f64 {
        let Some(period) = self.period else {
            self.alpha = 0.0;
            return 0.0;
        };

        let cycle = period + self.config.rest.max(0.0);
        self.phase = (self.phase + elapsed.as_secs_f64()) % cycle;
        self.alpha = if self.phase < period {
            self.config.curve.evaluate(self.phase / period) * self.config.max_alpha
        } else {
            0.0
        };
        self.alpha
    }
}

// ============================================================================
// Screen shake
// ============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShakeConfig {
    pub enabled: bool,
    /// Offsets are drawn from `[-intensity, intensity]` on both axes.
    pub intensity: f64,
    pub interval: f64,
    pub seed: u64,
}

impl Default for ShakeConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            intensity: 0.05,
            interval: 0.05,
            seed: 0x5ac3,
        }
    }
}

/// Camera offset that jumps to a new random position every interval while
/// active and sits at the origin otherwise.
#[derive(Clone, Debug)]
pub struct ScreenShake {
    config: ShakeConfig,
    rng: StdRng,
    active: bool,
    until_next: f64,
    offset: (f64, f64),
}

impl ScreenShake {
    /// A non-finite intensity disables the offset rather than poisoning the rng range.
    pub fn new(mut config: ShakeConfig) -> Self {
        config.intensity = if config.intensity.is_finite() { config.intensity.abs() } else { 0.0 };
        Self {
            rng: StdRng::seed_from_u64(config.seed),
            config,
            active: false,
            until_next: 0.0,
            offset: (0.0, 0.0),
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn offset(&self) -> (f64, f64) {
        self.offset
    }

    pub fn advance(&mut self, active: bool, elapsed: Duration) -> (f64, f64) {
        self.active = active && self.config.enabled;
        if !self.active {
            self.until_next = 0.0;
            self.offset = (0.0, 0.0);
            return self.offset;
        }

        self.until_next -= elapsed.as_secs_f64();
        if self.until_next <= 0.0 {
            let range = self.config.intensity;
            self.offset = if range > 0.0 {
                (
                    self.rng.random_range(-range..=range),
                    self.rng.random_range(-range..=range),
                )
            } else {
                (0.0, 0.0)
            };
            self.until_next = self.config.interval.max(0.0);
        }
        self.offset
    }
}

// ============================================================================
// Damage flash
// ============================================================================

const FLASH_ALPHA: f64 = 0.8;
const FLASH_HOLD: f64 = 0.1;
const FLASH_FADE: f64 = 0.5;

/// One-shot red flash drawn over the vignette: hold, then fade to nothing.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct DamageFlash {
    elapsed: Option<f64>,
}

impl DamageFlash {
    /// Restarts the flash if one is already showing.
    pub fn trigger(&mut self) {
        self.elapsed = Some(0.0);
    }

    pub fn is_active(&self) -> bool {
        self.elapsed.is_some()
    }

    /// Flash alpha after `elapsed` more time; zero once the fade is over.
    pub fn advance(&mut self, elapsed: Duration) -> f64 {
        let Some(t) = self.elapsed.as_mut() else {
            return 0.0;
        };

        *t += elapsed.as_secs_f64();
        let now = *t;

        if now < FLASH_HOLD {
            FLASH_ALPHA
        } else if now < FLASH_HOLD + FLASH_FADE {
            let progress = (now - FLASH_HOLD) / FLASH_FADE;
            FLASH_ALPHA * (1.0 - progress)
        } else {
            self.elapsed = None;
            0.0
        }
    }
}
