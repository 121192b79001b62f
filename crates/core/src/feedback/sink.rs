use crate::feedback::{
    haptics::HapticStrength,
    synthesizer::{AudioOutput, FeedbackFrame, VisualOutput},
};
use crate::heartbeat::LevelChanged;

/// External output collaborator. Every method defaults to a no-op so a sink
/// only implements the channels it drives.
pub trait FeedbackSink: Send {
    /// Called on each audio beat.
    fn audio(&mut self, _output: &AudioOutput) {}

    /// Called each time the vibration timer fires.
    fn haptic(&mut self, _strength: HapticStrength) {}

    /// Called every tick.
    fn visual(&mut self, _output: &VisualOutput) {}

    /// Called every tick with the smoothed ambient volume.
    fn ambient(&mut self, _volume: f64) {}

    fn level_changed(&mut self, _event: &LevelChanged) {}
}

/// Route one frame to a sink.
pub fn dispatch(sink: &mut dyn FeedbackSink, frame: &FeedbackFrame, changed: Option<&LevelChanged>) {
    if let Some(event) = changed {
        sink.level_changed(event);
    }
    if frame.audio.beat {
        sink.audio(&frame.audio);
    }
    if let Some(strength) = frame.haptic {
        sink.haptic(strength);
    }
    sink.ambient(frame.audio.ambient.current);
    sink.visual(&frame.visual);
}

/// Keeps everything it receives. Handy for tests and debug overlays.
#[derive(Clone, Debug, Default)]
pub struct RecordingSink {
    pub audio: Vec<AudioOutput>,
    pub haptics: Vec<HapticStrength>,
    pub visuals: Vec<VisualOutput>,
    pub ambient: Vec<f64>,
    pub level_changes: Vec<LevelChanged>,
}

impl FeedbackSink for RecordingSink {
    fn audio(&mut self, output: &AudioOutput) {
        self.audio.push(*output);
    }

    fn haptic(&mut self, strength: HapticStrength) {
        self.haptics.push(strength);
    }

    fn visual(&mut self, output: &VisualOutput) {
        self.visuals.push(*output);
    }

    fn ambient(&mut self, volume: f64) {
        self.ambient.push(volume);
    }

    fn level_changed(&mut self, event: &LevelChanged) {
        self.level_changes.push(*event);
    }
}
