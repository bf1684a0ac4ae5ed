//! Playback mirror of a vehicle's looping engine sound.
//!
//! The audio device runs on another thread, so the engine cannot ask it
//! synchronously what is playing. [`EngineVoice`] keeps the main thread's view
//! of the loop slot: it is updated optimistically when a loop is requested and
//! corrected by feedback messages from the audio thread (see
//! [`crate::systems::engine::engine_voice_feedback_system`]).

use bevy_ecs::prelude::Component;

/// State of one vehicle's loop slot.
#[derive(Component, Debug, Clone, Default, PartialEq, Eq)]
pub struct EngineVoice {
    /// Cue currently assigned to the loop slot.
    pub active: Option<String>,
    /// Whether the assigned cue is audible.
    pub playing: bool,
    /// Whether the assigned cue restarts when it reaches its end.
    pub looping: bool,
}

impl EngineVoice {
    /// True when `cue` is the assigned cue, it is playing and it loops.
    pub fn is_loop_active(&self, cue: &str) -> bool {
        self.playing && self.looping && self.active.as_deref() == Some(cue)
    }

    /// Record that `cue` was requested as the looping cue.
    pub fn begin_loop(&mut self, cue: &str) {
        self.active = Some(cue.to_string());
        self.playing = true;
        self.looping = true;
    }

    /// Record that the loop slot was silenced.
    pub fn clear(&mut self) {
        self.active = None;
        self.playing = false;
        self.looping = false;
    }

    /// Mark the assigned cue as not audible, keeping the assignment.
    ///
    /// Ignored when `cue` is not the assigned cue (stale feedback).
    pub fn mark_stopped(&mut self, cue: &str) {
        if self.active.as_deref() == Some(cue) {
            self.playing = false;
        }
    }

    /// Mark the assigned cue as audible again.
    pub fn mark_playing(&mut self, cue: &str) {
        if self.active.as_deref() == Some(cue) {
            self.playing = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_silent() {
        let v = EngineVoice::default();
        assert_eq!(v.active, None);
        assert!(!v.is_loop_active("idle"));
    }

    #[test]
    fn test_begin_loop_makes_cue_active() {
        let mut v = EngineVoice::default();
        v.begin_loop("idle");
        assert!(v.is_loop_active("idle"));
        assert!(!v.is_loop_active("gear1"));
    }

    #[test]
    fn test_stopped_cue_is_not_active() {
        let mut v = EngineVoice::default();
        v.begin_loop("idle");
        v.mark_stopped("idle");
        assert_eq!(v.active.as_deref(), Some("idle"));
        assert!(!v.is_loop_active("idle"));

        v.mark_playing("idle");
        assert!(v.is_loop_active("idle"));
    }

    #[test]
    fn test_non_looping_cue_is_not_active() {
        let mut v = EngineVoice::default();
        v.begin_loop("idle");
        v.looping = false;
        assert!(!v.is_loop_active("idle"));
    }

    #[test]
    fn test_stale_feedback_is_ignored() {
        let mut v = EngineVoice::default();
        v.begin_loop("gear2");
        v.mark_stopped("gear1");
        assert!(v.is_loop_active("gear2"));
    }

    #[test]
    fn test_clear() {
        let mut v = EngineVoice::default();
        v.begin_loop("idle");
        v.clear();
        assert_eq!(v, EngineVoice::default());
    }
}
