//! Simulation setup: vehicle spawning, observers and the per-step schedule.
//!
//! # Frame order
//!
//! 1. Audio message plumbing (commands out, feedback in)
//! 2. [`scenario_system`] applies scripted driver input
//! 3. [`engine_voice_feedback_system`] folds audio feedback into voices
//! 4. [`vehicle_engine_system`] ticks every engine
//! 5. [`vehicle_movement_system`] moves running vehicles
//!
//! ```ignore
//! let mut world = World::new();
//! world.insert_resource(WorldTime::default());
//! init_audio_messages(&mut world);
//! register_observers(&mut world);
//! let vehicle = spawn_vehicle(&mut world, &VehicleConfig::new())?;
//! let mut schedule = build_schedule();
//! update_world_time(&mut world, 1.0 / 60.0);
//! schedule.run(&mut world);
//! ```

use bevy_ecs::prelude::*;
use bevy_ecs::schedule::common_conditions::{not, resource_exists};
use log::info;

use crate::components::enginevoice::EngineVoice;
use crate::components::soundbinding::SoundBinding;
use crate::components::vehiclecontrols::VehicleControls;
use crate::components::vehicletransform::VehicleTransform;
use crate::error::ConfigError;
use crate::events::audio::AudioCmd;
use crate::events::engine::{
    log_cue_finished_observer, log_engine_rejected_observer, log_engine_state_observer,
};
use crate::resources::audio::AudioBridge;
use crate::resources::vehicleconfig::VehicleConfig;
use crate::systems::audio::{
    forward_audio_cmds, log_audio_cmds, poll_audio_messages, update_bevy_audio_cmds,
    update_bevy_audio_messages,
};
use crate::systems::engine::{engine_voice_feedback_system, vehicle_engine_system};
use crate::systems::movement::vehicle_movement_system;
use crate::systems::scenario::scenario_system;

/// Spawn a vehicle entity from `config`.
///
/// Builds its engine (failing on a malformed sound binding) and queues load
/// commands for every bound cue. `Messages<AudioCmd>` must already exist.
pub fn spawn_vehicle(world: &mut World, config: &VehicleConfig) -> Result<Entity, ConfigError> {
    let engine = config.build_engine()?;
    let controls = VehicleControls::from_request(engine.as_request());
    let entity = world
        .spawn((
            engine,
            controls,
            EngineVoice::default(),
            VehicleTransform::default(),
            config.drive_tuning(),
        ))
        .id();
    queue_cue_loads(world, &config.sounds);
    info!(
        "Spawned vehicle {:?} in gear {} (running={})",
        entity, config.initial_gear, config.engine_running
    );
    Ok(entity)
}

/// Write load commands for every distinct cue of `binding`.
pub fn queue_cue_loads(world: &mut World, binding: &SoundBinding) {
    let mut msgs = world.resource_mut::<Messages<AudioCmd>>();
    for cue in binding.loop_cues() {
        msgs.write(AudioCmd::LoadLoop {
            id: cue.to_string(),
            path: cue.to_string(),
        });
    }
    for cue in binding.one_shot_cues() {
        msgs.write(AudioCmd::LoadOneShot {
            id: cue.to_string(),
            path: cue.to_string(),
        });
    }
}

/// Register the engine logging observers.
pub fn register_observers(world: &mut World) {
    world.add_observer(log_engine_state_observer);
    world.add_observer(log_engine_rejected_observer);
    world.add_observer(log_cue_finished_observer);
    // Ensure observers exist before any system triggers events.
    world.flush();
}

/// Per-step schedule. Works with or without an [`AudioBridge`].
pub fn build_schedule() -> Schedule {
    let mut update = Schedule::default();
    update.add_systems(
        // audio systems must be together
        (
            update_bevy_audio_cmds,
            forward_audio_cmds.run_if(resource_exists::<AudioBridge>),
            log_audio_cmds.run_if(not(resource_exists::<AudioBridge>)),
            poll_audio_messages.run_if(resource_exists::<AudioBridge>),
            update_bevy_audio_messages,
        )
            .chain(),
    );
    update.add_systems(scenario_system);
    update.add_systems(engine_voice_feedback_system.after(update_bevy_audio_messages));
    update.add_systems(
        vehicle_engine_system
            .after(scenario_system)
            .after(engine_voice_feedback_system),
    );
    update.add_systems(vehicle_movement_system.after(vehicle_engine_system));
    update
}
