//! Messages exchanged with the background audio thread.
//!
//! [`AudioCmd`] flows from ECS systems to the audio thread; [`AudioMessage`]
//! flows back as feedback. Loop and one-shot commands carry a `voice` id (the
//! vehicle entity's bits) so several vehicles can each own a loop slot.

use bevy_ecs::message::Message;

/// Commands sent *to* the audio thread
#[derive(Message, Debug, Clone, PartialEq)]
pub enum AudioCmd {
    /// Load a cue that will be played looped (streamed).
    LoadLoop { id: String, path: String },
    /// Load a cue that will be played once (fully decoded).
    LoadOneShot { id: String, path: String },
    /// Play a one-shot cue for `voice`.
    PlayOneShot { voice: u64, id: String },
    /// Replace the loop of `voice` with `id`, from the beginning.
    SetLoop { voice: u64, id: String },
    /// Halt the loop of `voice`.
    StopLoop { voice: u64 },
    UnloadAll,
    Shutdown,
}

/// Events sent *back* from the audio thread
#[derive(Message, Debug, Clone, PartialEq)]
pub enum AudioMessage {
    Loaded { id: String },
    LoadFailed { id: String, error: String },
    LoopStarted { voice: u64, id: String },
    LoopStopped { voice: u64, id: String },
    /// The loop could not be started (cue not loaded).
    LoopFailed { voice: u64, id: String },
    OneShotFinished { voice: u64, id: String },
    UnloadedAll,
}
