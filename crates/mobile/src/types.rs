//! Flat records handed across the FFI boundary.

use pursuit_core::{
    TickReport,
    feedback::{AudioOutput, CueBucket, HapticStrength, VisualOutput},
    heartbeat::{HeartbeatLevel, LevelChanged, LevelReading},
    proximity::BeaconObservation,
    validation::{AccuracyBucket, AccuracyStats, ValidationRecord},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, uniffi::Enum)]
pub enum Level {
    None,
    Far,
    Mid,
    Near,
    Critical,
}

impl From<LevelReading> for Level {
    fn from(reading: LevelReading) -> Self {
        match reading.level {
            HeartbeatLevel::None => Self::None,
            HeartbeatLevel::Far => Self::Far,
            HeartbeatLevel::Mid => Self::Mid,
            HeartbeatLevel::Near if reading.critical => Self::Critical,
            HeartbeatLevel::Near => Self::Near,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, uniffi::Enum)]
pub enum Cue {
    Silent,
    Slow,
    Medium,
    Fast,
    Critical,
}

impl From<CueBucket> for Cue {
    fn from(bucket: CueBucket) -> Self {
        match bucket {
            CueBucket::Silent => Self::Silent,
            CueBucket::Slow => Self::Slow,
            CueBucket::Medium => Self::Medium,
            CueBucket::Fast => Self::Fast,
            CueBucket::Critical => Self::Critical,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, uniffi::Enum)]
pub enum Haptic {
    None,
    Medium,
    Strong,
}

impl From<HapticStrength> for Haptic {
    fn from(strength: HapticStrength) -> Self {
        match strength {
            HapticStrength::None => Self::None,
            HapticStrength::Medium => Self::Medium,
            HapticStrength::Strong => Self::Strong,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, uniffi::Enum)]
pub enum Accuracy {
    Excellent,
    Good,
    Poor,
    Failed,
}

impl From<AccuracyBucket> for Accuracy {
    fn from(bucket: AccuracyBucket) -> Self {
        match bucket {
            AccuracyBucket::Excellent => Self::Excellent,
            AccuracyBucket::Good => Self::Good,
            AccuracyBucket::Poor => Self::Poor,
            AccuracyBucket::Failed => Self::Failed,
        }
    }
}

#[derive(Debug, Clone, PartialEq, uniffi::Record)]
pub struct LevelChangedEvent {
    pub previous: Level,
    pub level: Level,
    pub audio_cadence: f64,
    pub ui_cadence: f64,
    pub distance: f64,
}

impl From<&LevelChanged> for LevelChangedEvent {
    fn from(event: &LevelChanged) -> Self {
        Self {
            previous: event.previous.into(),
            level: event.reading.into(),
            audio_cadence: event.audio_cadence,
            ui_cadence: event.ui_cadence,
            distance: event.distance,
        }
    }
}

#[derive(Debug, Clone, PartialEq, uniffi::Record)]
pub struct AudioBeat {
    pub volume: f64,
    pub cue: Cue,
}

impl From<&AudioOutput> for AudioBeat {
    fn from(output: &AudioOutput) -> Self {
        Self {
            volume: output.volume,
            cue: output.cue.into(),
        }
    }
}

/// Smoothed values are sent as their current level; targets stay on this side.
#[derive(Debug, Clone, PartialEq, uniffi::Record)]
pub struct VisualFrame {
    pub alpha_target: f64,
    pub vignette_alpha: f64,
    pub flash_alpha: f64,
    pub danger_alpha: f64,
    pub pulse_alpha: f64,
    pub shake_x: f64,
    pub shake_y: f64,
    pub ui_beat: bool,
}

impl From<&VisualOutput> for VisualFrame {
    fn from(output: &VisualOutput) -> Self {
        Self {
            alpha_target: output.alpha_target,
            vignette_alpha: output.vignette.current,
            flash_alpha: output.flash_alpha,
            danger_alpha: output.danger.current,
            pulse_alpha: output.pulse_alpha,
            shake_x: output.shake_offset.0,
            shake_y: output.shake_offset.1,
            ui_beat: output.ui_beat,
        }
    }
}

#[derive(Debug, Clone, PartialEq, uniffi::Record)]
pub struct TickSummary {
    pub admitted: u32,
    pub rejected: u32,
    pub level: Level,
    pub distance: f64,
    pub normalized: f64,
    pub level_changed: Option<LevelChangedEvent>,
    pub audio_beat: bool,
    pub ui_beat: bool,
    pub visual: VisualFrame,
}

impl From<&TickReport> for TickSummary {
    fn from(report: &TickReport) -> Self {
        Self {
            admitted: saturate(report.admitted),
            rejected: saturate(report.rejected),
            level: report.update.reading.into(),
            distance: report.update.distance,
            normalized: report.update.normalized,
            level_changed: report.update.changed.as_ref().map(Into::into),
            audio_beat: report.update.audio_beat,
            ui_beat: report.update.ui_beat,
            visual: (&report.frame.visual).into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, uniffi::Record)]
pub struct NearbyPlayer {
    pub session_id: i32,
    pub player_id: i32,
    pub distance: f64,
    pub rssi: f64,
    pub observed_at_ms: i64,
}

impl From<&BeaconObservation> for NearbyPlayer {
    fn from(observation: &BeaconObservation) -> Self {
        Self {
            session_id: observation.key.session.get(),
            player_id: observation.key.player.get(),
            distance: observation.distance,
            rssi: observation.rssi,
            observed_at_ms: observation.observed_at.timestamp_millis(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, uniffi::Record)]
pub struct ValidationResult {
    pub actual: f64,
    pub measured: f64,
    pub rssi: f64,
    pub error_abs: f64,
    pub error_pct: f64,
    pub accuracy: Accuracy,
    pub timestamp_ms: i64,
}

impl From<&ValidationRecord> for ValidationResult {
    fn from(record: &ValidationRecord) -> Self {
        Self {
            actual: record.actual(),
            measured: record.measured(),
            rssi: record.rssi(),
            error_abs: record.error_abs(),
            error_pct: record.error_pct(),
            accuracy: record.bucket().into(),
            timestamp_ms: record.timestamp().timestamp_millis(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, uniffi::Record)]
pub struct ValidationSummary {
    pub total: u32,
    pub excellent: u32,
    pub good: u32,
    pub poor: u32,
    pub failed: u32,
    pub mean_error: f64,
    pub mean_error_pct: f64,
    pub success_rate: f64,
    pub description: String,
}

impl From<&AccuracyStats> for ValidationSummary {
    fn from(stats: &AccuracyStats) -> Self {
        Self {
            total: saturate(stats.total),
            excellent: saturate(stats.excellent),
            good: saturate(stats.good),
            poor: saturate(stats.poor),
            failed: saturate(stats.failed),
            mean_error: stats.mean_error,
            mean_error_pct: stats.mean_error_pct,
            success_rate: stats.success_rate,
            description: stats.to_string(),
        }
    }
}

fn saturate(count: usize) -> u32 {
    u32::try_from(count).unwrap_or(u32::MAX)
}
