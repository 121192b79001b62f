use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::config::ConfigError;
use crate::heartbeat::level::{HeartbeatLevel, LevelReading};

/// Beat interval per level, in seconds. None never beats.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CadenceTable {
    pub far: f64,
    pub mid: f64,
    pub near: f64,
    pub critical: f64,
}

impl CadenceTable {
    pub const AUDIO: CadenceTable = CadenceTable {
        far: 1.2,
        mid: 0.8,
        near: 0.4,
        critical: 0.2,
    };

    pub const UI: CadenceTable = CadenceTable {
        far: 1.2,
        mid: 0.7,
        near: 0.4,
        critical: 0.2,
    };

    /// Seconds between beats; zero means silent.
    pub fn interval_for(&self, reading: LevelReading) -> f64 {
        match reading.level {
            HeartbeatLevel::None => 0.0,
            HeartbeatLevel::Far => self.far,
            HeartbeatLevel::Mid => self.mid,
            HeartbeatLevel::Near if reading.critical => self.critical,
            HeartbeatLevel::Near => self.near,
        }
    }

    pub fn validate(&self, name: &str) -> Result<(), ConfigError> {
        for (level, value) in [
            ("far", self.far),
            ("mid", self.mid),
            ("near", self.near),
            ("critical", self.critical),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::InvalidCadence(format!(
                    "{name}.{level} must be a positive number of seconds, got {value}"
                )));
            }
        }
        Ok(())
    }
}

/// Both cadence tables; audio and UI are tuned independently.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CadenceConfig {
    pub audio: CadenceTable,
    pub ui: CadenceTable,
}

impl Default for CadenceConfig {
    fn default() -> Self {
        Self {
            audio: CadenceTable::AUDIO,
            ui: CadenceTable::UI,
        }
    }
}

/// Accumulates elapsed time and fires once per interval.
///
/// Driven only by [`BeatTimer::advance`], so it behaves the same no matter
/// how often the host ticks.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct BeatTimer {
    interval: f64,
    accumulated: Duration,
}

impl BeatTimer {
    pub fn new(interval: f64) -> Self {
        Self {
            interval: sanitize(interval),
            accumulated: Duration::ZERO,
        }
    }

    pub fn interval(&self) -> f64 {
        self.interval
    }

    pub fn accumulated(&self) -> Duration {
        self.accumulated
    }

    pub fn is_running(&self) -> bool {
        self.interval > 0.0
    }

    /// Change the interval. Accumulated time is kept so a faster cadence can
    /// fire on the next tick; stopping (interval zero) clears it.
    pub fn set_interval(&mut self, interval: f64) {
        self.interval = sanitize(interval);
        if !self.is_running() {
            self.accumulated = Duration::ZERO;
        }
    }

    pub fn reset(&mut self) {
        self.accumulated = Duration::ZERO;
    }

    /// Returns true when a beat fires.
    pub fn advance(&mut self, elapsed: Duration) -> bool {
        if !self.is_running() {
            return false;
        }

        self.accumulated = self.accumulated.saturating_add(elapsed);
        if self.accumulated.as_secs_f64() >= self.interval {
            self.accumulated = Duration::ZERO;
            true
        } else {
            false
        }
    }
}

fn sanitize(interval: f64) -> f64 {
    if interval.is_finite() && interval > 0.0 {
        interval
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reading(level: HeartbeatLevel, critical: bool) -> LevelReading {
        LevelReading { level, critical }
    }

    #[test]
    fn test_default_cadences() {
        let audio = CadenceTable::AUDIO;
        assert_eq!(audio.interval_for(LevelReading::NONE), 0.0);
        assert_eq!(audio.interval_for(reading(HeartbeatLevel::Far, false)), 1.2);
        assert_eq!(audio.interval_for(reading(HeartbeatLevel::Mid, false)), 0.8);
        assert_eq!(audio.interval_for(reading(HeartbeatLevel::Near, false)), 0.4);
        assert_eq!(audio.interval_for(reading(HeartbeatLevel::Near, true)), 0.2);

        assert_eq!(CadenceTable::UI.interval_for(reading(HeartbeatLevel::Mid, false)), 0.7);
    }

    #[test]
    fn test_cadence_validation() {
        assert!(CadenceTable::AUDIO.validate("audio").is_ok());

        let broken = CadenceTable {
            mid: 0.0,
            ..CadenceTable::AUDIO
        };
        assert!(broken.validate("audio").is_err());

        let broken = CadenceTable {
            far: f64::NAN,
            ..CadenceTable::AUDIO
        };
        assert!(broken.validate("audio").is_err());
    }

    #[test]
    fn test_timer_fires_on_interval() {
        let mut timer = BeatTimer::new(0.4);

        assert!(!timer.advance(Duration::from_millis(200)));
        assert!(!timer.advance(Duration::from_millis(199)));
        assert!(timer.advance(Duration::from_millis(1)));
        assert_eq!(timer.accumulated(), Duration::ZERO);
    }

    #[test]
    fn test_timer_independent_of_tick_rate() {
        let count = |step_ms: u64| {
            let mut timer = BeatTimer::new(0.5);
            let steps = 10_000 / step_ms;
            (0..steps)
                .filter(|_| timer.advance(Duration::from_millis(step_ms)))
                .count()
        };

        assert_eq!(count(10), 20);
        assert_eq!(count(50), 20);
        assert_eq!(count(100), 20);
    }

    #[test]
    fn test_stopped_timer_never_fires() {
        let mut timer = BeatTimer::new(0.0);
        assert!(!timer.advance(Duration::from_secs(10)));

        let mut timer = BeatTimer::new(1.0);
        timer.advance(Duration::from_millis(600));
        timer.set_interval(0.0);
        assert_eq!(timer.accumulated(), Duration::ZERO);
        assert!(!timer.advance(Duration::from_secs(10)));
    }

    #[test]
    fn test_faster_interval_keeps_accumulated_time() {
        let mut timer = BeatTimer::new(1.2);
        timer.advance(Duration::from_millis(500));
        timer.set_interval(0.4);

        assert!(timer.advance(Duration::from_millis(1)));
    }
}
