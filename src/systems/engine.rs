//! Engine systems.
//!
//! - [`vehicle_engine_system`] – ticks every vehicle's [`EngineStateMachine`]
//!   against its [`VehicleControls`], turning cue decisions into [`AudioCmd`]
//!   messages and triggering engine events.
//! - [`engine_voice_feedback_system`] – folds [`AudioMessage`] feedback from the
//!   audio thread into each vehicle's [`EngineVoice`] and raises
//!   [`CueFinishedEvent`] for finished one-shots.
//!
//! # System Ordering
//!
//! 1. audio message polling (see [`crate::systems::audio`])
//! 2. `engine_voice_feedback_system`
//! 3. scenario/input updates to [`VehicleControls`]
//! 4. `vehicle_engine_system`

use bevy_ecs::prelude::*;
use log::{debug, info, warn};

use crate::components::enginestate::EngineStateMachine;
use crate::components::enginevoice::EngineVoice;
use crate::components::vehiclecontrols::VehicleControls;
use crate::events::audio::{AudioCmd, AudioMessage};
use crate::events::engine::{CueFinishedEvent, EngineStartRejectedEvent, EngineStateChangedEvent};
use crate::soundplayer::SoundPlayer;

/// [`SoundPlayer`] writing [`AudioCmd`] messages for one vehicle.
///
/// The vehicle's [`EngineVoice`] is updated as commands are written, so
/// [`is_loop_active`](SoundPlayer::is_loop_active) answers without waiting for
/// the audio thread.
pub struct VoicePlayer<'a, 'w> {
    voice_id: u64,
    voice: &'a mut EngineVoice,
    audio_cmds: &'a mut MessageWriter<'w, AudioCmd>,
}

impl<'a, 'w> VoicePlayer<'a, 'w> {
    pub fn new(
        entity: Entity,
        voice: &'a mut EngineVoice,
        audio_cmds: &'a mut MessageWriter<'w, AudioCmd>,
    ) -> Self {
        Self {
            voice_id: entity.to_bits(),
            voice,
            audio_cmds,
        }
    }
}

impl SoundPlayer for VoicePlayer<'_, '_> {
    fn play_one_shot(&mut self, cue: &str) {
        self.audio_cmds.write(AudioCmd::PlayOneShot {
            voice: self.voice_id,
            id: cue.to_string(),
        });
    }

    fn set_loop(&mut self, cue: &str) {
        self.audio_cmds.write(AudioCmd::SetLoop {
            voice: self.voice_id,
            id: cue.to_string(),
        });
        self.voice.begin_loop(cue);
    }

    fn stop_loop(&mut self) {
        self.audio_cmds.write(AudioCmd::StopLoop {
            voice: self.voice_id,
        });
        self.voice.clear();
    }

    fn is_loop_active(&self, cue: &str) -> bool {
        self.voice.is_loop_active(cue)
    }
}

/// Advance every vehicle's engine by one step.
///
/// Rejected starts revert the vehicle's `engine_on` control and trigger an
/// [`EngineStartRejectedEvent`]; starts, stops and shifts trigger an
/// [`EngineStateChangedEvent`].
pub fn vehicle_engine_system(
    mut vehicles: Query<(
        Entity,
        &mut EngineStateMachine,
        &mut VehicleControls,
        &mut EngineVoice,
    )>,
    mut audio_cmds: MessageWriter<AudioCmd>,
    mut commands: Commands,
) {
    for (entity, mut engine, mut controls, mut voice) in vehicles.iter_mut() {
        let mut request = controls.request;
        let report = {
            let mut player = VoicePlayer::new(entity, &mut voice, &mut audio_cmds);
            engine.tick(&mut request, &mut player)
        };
        if report.is_quiet() {
            continue;
        }
        if request != controls.request {
            controls.request = request;
        }

        if let Some(rejected) = report.rejected {
            commands.trigger(EngineStartRejectedEvent {
                entity,
                gear: rejected.gear,
            });
        }
        if report.transition.is_some() || report.shifted.is_some() {
            commands.trigger(EngineStateChangedEvent {
                entity,
                state: engine.state(),
                gear: engine.current_gear(),
                shifted_from: report.shifted.map(|(from, _)| from),
            });
        }
    }
}

/// Apply audio-thread feedback to vehicle voices.
///
/// Never blocks: it only drains what the audio thread has already reported.
pub fn engine_voice_feedback_system(
    mut reader: MessageReader<AudioMessage>,
    mut voices: Query<(Entity, &mut EngineVoice)>,
    mut commands: Commands,
) {
    for msg in reader.read() {
        match msg {
            AudioMessage::Loaded { id } => debug!("cue loaded '{}'", id),
            AudioMessage::LoadFailed { id, error } => {
                warn!("cue '{}' failed to load: {}", id, error)
            }
            AudioMessage::LoopStarted { voice, id } => {
                if let Some((_, mut v)) = voices.iter_mut().find(|(e, _)| e.to_bits() == *voice) {
                    v.mark_playing(id);
                }
            }
            AudioMessage::LoopStopped { voice, id } => {
                if let Some((_, mut v)) = voices.iter_mut().find(|(e, _)| e.to_bits() == *voice) {
                    v.mark_stopped(id);
                }
            }
            AudioMessage::LoopFailed { voice, id } => {
                warn!("loop '{}' could not start", id);
                if let Some((_, mut v)) = voices.iter_mut().find(|(e, _)| e.to_bits() == *voice) {
                    v.mark_stopped(id);
                }
            }
            AudioMessage::OneShotFinished { voice, id } => {
                if let Some((entity, _)) = voices.iter().find(|(e, _)| e.to_bits() == *voice) {
                    commands.trigger(CueFinishedEvent {
                        entity,
                        cue: id.clone(),
                    });
                }
            }
            AudioMessage::UnloadedAll => info!("all cues unloaded"),
        }
    }
}
