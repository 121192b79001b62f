use std::sync::Arc;

use pursuit_core::{
    feedback::{AudioOutput, FeedbackSink, HapticStrength, VisualOutput},
    heartbeat::LevelChanged,
};

use crate::types::{AudioBeat, Haptic, LevelChangedEvent, VisualFrame};

/// Receives feedback as it is synthesized.
///
/// Calls arrive on whichever thread ticks the session, with the session
/// locked. Implementations must not call back into the session from here.
#[uniffi::export(with_foreign)]
pub trait FeedbackListener: Send + Sync {
    /// Once per audio beat.
    fn on_audio_beat(&self, beat: AudioBeat);
    fn on_haptic(&self, strength: Haptic);
    /// Every tick.
    fn on_visual(&self, frame: VisualFrame);
    /// Every tick, smoothed.
    fn on_ambient(&self, volume: f64);
    fn on_level_changed(&self, event: LevelChangedEvent);
}

pub(crate) struct ListenerSink(pub Arc<dyn FeedbackListener>);

impl FeedbackSink for ListenerSink {
    fn audio(&mut self, output: &AudioOutput) {
        self.0.on_audio_beat(output.into());
    }

    fn haptic(&mut self, strength: HapticStrength) {
        self.0.on_haptic(strength.into());
    }

    fn visual(&mut self, output: &VisualOutput) {
        self.0.on_visual(output.into());
    }

    fn ambient(&mut self, volume: f64) {
        self.0.on_ambient(volume);
    }

    fn level_changed(&mut self, event: &LevelChanged) {
        self.0.on_level_changed(event.into());
    }
}
