use std::time::Duration;

use crate::heartbeat::{
    cadence::{BeatTimer, CadenceConfig},
    intensity::normalized_intensity,
    level::{LevelReading, Thresholds, classify},
};

/// Raised whenever the level or the Critical flag changes.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LevelChanged {
    pub previous: LevelReading,
    pub reading: LevelReading,
    pub audio_cadence: f64,
    pub ui_cadence: f64,
    pub distance: f64,
}

/// Everything one engine tick produced.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LevelUpdate {
    pub reading: LevelReading,
    pub distance: f64,
    pub normalized: f64,
    pub changed: Option<LevelChanged>,
    pub audio_beat: bool,
    pub ui_beat: bool,
}

/// Distance to level state machine with two independent beat timers.
///
/// Level changes are reported twice: inline on the [`LevelUpdate`] and as a
/// pending event that stays queued until [`HeartbeatLevelEngine::take_changed`]
/// polls it.
#[derive(Clone, Debug)]
pub struct HeartbeatLevelEngine {
    thresholds: Thresholds,
    cadence: CadenceConfig,
    reading: LevelReading,
    distance: f64,
    audio: BeatTimer,
    ui: BeatTimer,
    pending: Option<LevelChanged>,
}

impl HeartbeatLevelEngine {
    pub fn new(thresholds: Thresholds, cadence: CadenceConfig) -> Self {
        Self {
            thresholds,
            cadence,
            reading: LevelReading::NONE,
            distance: f64::INFINITY,
            audio: BeatTimer::default(),
            ui: BeatTimer::default(),
            pending: None,
        }
    }

    pub fn thresholds(&self) -> &Thresholds {
        &self.thresholds
    }

    pub fn cadence(&self) -> &CadenceConfig {
        &self.cadence
    }

    pub fn current(&self) -> LevelReading {
        self.reading
    }

    pub fn distance(&self) -> f64 {
        self.distance
    }

    pub fn audio_cadence(&self) -> f64 {
        self.audio.interval()
    }

    pub fn ui_cadence(&self) -> f64 {
        self.ui.interval()
    }

    pub fn normalized(&self) -> f64 {
        normalized_intensity(self.distance, self.reading, &self.thresholds)
    }

    /// Level change since the last poll, if any. Several changes between
    /// polls collapse into one event spanning all of them, and none at all
    /// when the level ends up where it started.
    pub fn take_changed(&mut self) -> Option<LevelChanged> {
        self.pending.take()
    }

    /// Classify `distance` and advance both beat timers by `elapsed`.
    ///
    /// NaN is treated like the unknown sentinel (`+inf`) and resolves to None.
    pub fn tick(&mut self, distance: f64, elapsed: Duration) -> LevelUpdate {
        let distance = if distance.is_nan() { f64::INFINITY } else { distance.max(0.0) };
        let reading = classify(distance, &self.thresholds);
        self.distance = distance;

        let changed = if reading != self.reading {
            Some(self.transition(reading))
        } else {
            None
        };

        let audio_beat = self.audio.advance(elapsed);
        let ui_beat = self.ui.advance(elapsed);

        LevelUpdate {
            reading,
            distance,
            normalized: self.normalized(),
            changed,
            audio_beat,
            ui_beat,
        }
    }

    /// Back to None with both timers stopped, as if no tick had happened.
    pub fn reset(&mut self) {
        self.reading = LevelReading::NONE;
        self.distance = f64::INFINITY;
        self.audio = BeatTimer::default();
        self.ui = BeatTimer::default();
        self.pending = None;
    }

    fn transition(&mut self, reading: LevelReading) -> LevelChanged {
        let audio_cadence = self.cadence.audio.interval_for(reading);
        let ui_cadence = self.cadence.ui.interval_for(reading);
        self.audio.set_interval(audio_cadence);
        self.ui.set_interval(ui_cadence);

        let event = LevelChanged {
            previous: self.reading,
            reading,
            audio_cadence,
            ui_cadence,
            distance: self.distance,
        };
        tracing::debug!(
            from = %event.previous,
            to = %event.reading,
            distance = event.distance,
            audio_cadence,
            "heartbeat level changed"
        );

        self.reading = reading;
        let merged = match self.pending {
            Some(earlier) => LevelChanged {
                previous: earlier.previous,
                ..event
            },
            None => event,
        };
        // a round trip between polls is no change at all
        self.pending = (merged.previous != merged.reading).then_some(merged);
        event
    }
}

impl Default for HeartbeatLevelEngine {
    fn default() -> Self {
        Self::new(Thresholds::default(), CadenceConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::heartbeat::level::HeartbeatLevel;

    const TICK: Duration = Duration::from_millis(100);

    #[test]
    fn test_initial_state_is_none() {
        let mut engine = HeartbeatLevelEngine::default();
        assert_eq!(engine.current(), LevelReading::NONE);
        assert_eq!(engine.audio_cadence(), 0.0);
        assert!(engine.take_changed().is_none());
    }

    #[test]
    fn test_level_sequence_and_cadence() {
        let mut engine = HeartbeatLevelEngine::default();
        let mut levels = Vec::new();
        let mut cadences = Vec::new();

        for distance in [60.0, 40.0, 15.0, 0.3] {
            let update = engine.tick(distance, TICK);
            levels.push(update.reading);
            cadences.push(engine.audio_cadence());
        }

        assert_eq!(
            levels.iter().map(|r| r.level).collect::<Vec<_>>(),
            [
                HeartbeatLevel::None,
                HeartbeatLevel::Far,
                HeartbeatLevel::Mid,
                HeartbeatLevel::Near,
            ]
        );
        assert!(levels[3].critical);
        assert_eq!(cadences, [0.0, 1.2, 0.8, 0.2]);
    }

    #[test]
    fn test_change_events() {
        let mut engine = HeartbeatLevelEngine::default();

        assert!(engine.tick(60.0, TICK).changed.is_none());

        let changed = engine.tick(8.0, TICK).changed.unwrap();
        assert_eq!(changed.previous, LevelReading::NONE);
        assert_eq!(changed.reading.level, HeartbeatLevel::Near);
        assert_eq!(changed.audio_cadence, 0.4);
        assert_eq!(changed.ui_cadence, 0.4);

        assert!(engine.tick(7.0, TICK).changed.is_none());

        // Critical toggling alone is a change
        let changed = engine.tick(0.2, TICK).changed.unwrap();
        assert!(changed.reading.critical);
        assert_eq!(changed.audio_cadence, 0.2);
    }

    #[test]
    fn test_polled_change_spans_unpolled_ticks() {
        let mut engine = HeartbeatLevelEngine::default();
        engine.tick(40.0, TICK);
        engine.tick(20.0, TICK);

        let changed = engine.take_changed().unwrap();
        assert_eq!(changed.previous, LevelReading::NONE);
        assert_eq!(changed.reading.level, HeartbeatLevel::Mid);
        assert!(engine.take_changed().is_none());
    }

    #[test]
    fn test_unknown_distance_never_panics() {
        let mut engine = HeartbeatLevelEngine::default();
        engine.tick(5.0, TICK);

        let update = engine.tick(f64::INFINITY, TICK);
        assert_eq!(update.reading, LevelReading::NONE);
        assert_eq!(engine.audio_cadence(), 0.0);

        let update = engine.tick(f64::NAN, TICK);
        assert_eq!(update.reading, LevelReading::NONE);
        assert_eq!(update.normalized, 0.0);
    }

    #[test]
    fn test_beats_follow_cadence() {
        let mut engine = HeartbeatLevelEngine::default();
        let mut audio = 0;
        let mut ui = 0;

        // 2.4s at Mid: audio every 0.8s, UI every 0.7s
        for _ in 0..24 {
            let update = engine.tick(20.0, TICK);
            audio += usize::from(update.audio_beat);
            ui += usize::from(update.ui_beat);
        }

        assert_eq!(audio, 3);
        assert_eq!(ui, 3);
    }

    #[test]
    fn test_none_is_silent() {
        let mut engine = HeartbeatLevelEngine::default();
        for _ in 0..100 {
            let update = engine.tick(75.0, TICK);
            assert!(!update.audio_beat);
            assert!(!update.ui_beat);
        }
    }

    #[test]
    fn test_reset() {
        let mut engine = HeartbeatLevelEngine::default();
        engine.tick(5.0, TICK);
        engine.reset();

        assert_eq!(engine.current(), LevelReading::NONE);
        assert!(engine.take_changed().is_none());
        assert_eq!(engine.audio_cadence(), 0.0);
    }

    #[test]
    fn test_round_trip_between_polls_is_not_a_change() {
        let mut engine = HeartbeatLevelEngine::default();
        assert!(engine.tick(40.0, TICK).changed.is_some());
        assert!(engine.tick(80.0, TICK).changed.is_some());
        assert_eq!(engine.take_changed(), None);

        // a later real change is still reported from the polled baseline
        engine.tick(40.0, TICK);
        engine.tick(15.0, TICK);
        let event = engine.take_changed().unwrap();
        assert_eq!(event.previous.level, HeartbeatLevel::None);
        assert_eq!(event.reading.level, HeartbeatLevel::Mid);
    }
}
