//! Sound playback capability used by the engine state machine.
//!
//! [`SoundPlayer`] is the only seam between
//! [`EngineStateMachine`](crate::components::enginestate::EngineStateMachine)
//! and actual audio. Calls are fire-and-forget: an implementation must never
//! block the caller waiting for a cue to finish.
//!
//! Implementations:
//! - [`RecordingPlayer`] – records every call as a [`CueCall`]; used by tests
//!   and dry runs.
//! - [`VoicePlayer`](crate::systems::engine::VoicePlayer) – turns calls into
//!   [`AudioCmd`](crate::events::audio::AudioCmd) messages for the audio thread.

use std::fmt;

use crate::components::enginevoice::EngineVoice;

/// Audio operations the engine needs from its host.
pub trait SoundPlayer {
    /// Play `cue` once, without touching the loop slot.
    fn play_one_shot(&mut self, cue: &str);

    /// Put `cue` in the loop slot and start it looping, replacing any current
    /// loop.
    fn set_loop(&mut self, cue: &str);

    /// Halt whatever is in the loop slot.
    fn stop_loop(&mut self);

    /// True when `cue` is the active cue, it is playing and looping is enabled.
    fn is_loop_active(&self, cue: &str) -> bool;

    /// Start `cue` looping unless it already is the active, playing loop.
    ///
    /// Returns `true` when [`set_loop`](SoundPlayer::set_loop) was issued.
    fn ensure_loop(&mut self, cue: &str) -> bool {
        if self.is_loop_active(cue) {
            return false;
        }
        self.set_loop(cue);
        true
    }
}

/// One call made on a [`SoundPlayer`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CueCall {
    PlayOneShot(String),
    SetLoop(String),
    StopLoop,
}

impl CueCall {
    pub fn play_one_shot(cue: impl Into<String>) -> Self {
        CueCall::PlayOneShot(cue.into())
    }

    pub fn set_loop(cue: impl Into<String>) -> Self {
        CueCall::SetLoop(cue.into())
    }
}

impl fmt::Display for CueCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CueCall::PlayOneShot(cue) => write!(f, "PlayOneShot({})", cue),
            CueCall::SetLoop(cue) => write!(f, "SetLoop({})", cue),
            CueCall::StopLoop => write!(f, "StopLoop()"),
        }
    }
}

/// [`SoundPlayer`] that records calls and simulates an ideal loop slot.
///
/// A loop set through this player is considered playing and looping until
/// [`stop_loop`](SoundPlayer::stop_loop) or [`RecordingPlayer::finish_loop`].
#[derive(Debug, Default, Clone)]
pub struct RecordingPlayer {
    calls: Vec<CueCall>,
    voice: EngineVoice,
}

impl RecordingPlayer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every call recorded so far, oldest first.
    pub fn calls(&self) -> &[CueCall] {
        &self.calls
    }

    /// Take the recorded calls, leaving the log empty. The loop slot is kept.
    pub fn drain(&mut self) -> Vec<CueCall> {
        std::mem::take(&mut self.calls)
    }

    /// Simulated loop slot.
    pub fn voice(&self) -> &EngineVoice {
        &self.voice
    }

    /// Simulate the backend dropping the active loop (device error, stream
    /// end without looping).
    pub fn finish_loop(&mut self) {
        if let Some(cue) = self.voice.active.clone() {
            self.voice.mark_stopped(&cue);
        }
    }
}

impl SoundPlayer for RecordingPlayer {
    fn play_one_shot(&mut self, cue: &str) {
        self.calls.push(CueCall::play_one_shot(cue));
    }

    fn set_loop(&mut self, cue: &str) {
        self.calls.push(CueCall::set_loop(cue));
        self.voice.begin_loop(cue);
    }

    fn stop_loop(&mut self) {
        self.calls.push(CueCall::StopLoop);
        self.voice.clear();
    }

    fn is_loop_active(&self, cue: &str) -> bool {
        self.voice.is_loop_active(cue)
    }
}
