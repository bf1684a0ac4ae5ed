//! Engine notifications and their logging observers.
//!
//! [`vehicle_engine_system`](crate::systems::engine::vehicle_engine_system)
//! triggers these after ticking each vehicle's
//! [`EngineStateMachine`](crate::components::enginestate::EngineStateMachine);
//! [`engine_voice_feedback_system`](crate::systems::engine::engine_voice_feedback_system)
//! triggers [`CueFinishedEvent`] when the audio thread reports a one-shot has
//! ended, so nobody has to wait on audio.
//!
//! ```ignore
//! world.add_observer(|trigger: On<EngineStartRejectedEvent>| {
//!     println!("put it in neutral first ({})", trigger.event().gear);
//! });
//! ```

use bevy_ecs::observer::On;
use bevy_ecs::prelude::*;
use log::{debug, info, warn};

use crate::components::enginestate::EngineState;
use crate::components::gear::Gear;

/// The engine started or stopped, or the gear changed.
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct EngineStateChangedEvent {
    pub entity: Entity,
    pub state: EngineState,
    pub gear: Gear,
    /// Previous gear when this step shifted.
    pub shifted_from: Option<Gear>,
}

/// An engine start was requested outside of neutral and refused.
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct EngineStartRejectedEvent {
    pub entity: Entity,
    pub gear: Gear,
}

/// A one-shot cue played for `entity` has finished.
#[derive(Event, Debug, Clone, PartialEq)]
pub struct CueFinishedEvent {
    pub entity: Entity,
    pub cue: String,
}

pub fn log_engine_state_observer(trigger: On<EngineStateChangedEvent>) {
    let event = trigger.event();
    match event.shifted_from {
        Some(from) => info!(
            "vehicle {:?}: {:?}, gear {} -> {}",
            event.entity, event.state, from, event.gear
        ),
        None => info!(
            "vehicle {:?}: {:?} in gear {}",
            event.entity, event.state, event.gear
        ),
    }
}

pub fn log_engine_rejected_observer(trigger: On<EngineStartRejectedEvent>) {
    let event = trigger.event();
    warn!(
        "vehicle {:?}: engine must be started in neutral (selected: {})",
        event.entity, event.gear
    );
}

pub fn log_cue_finished_observer(trigger: On<CueFinishedEvent>) {
    let event = trigger.event();
    debug!("vehicle {:?}: cue '{}' finished", event.entity, event.cue);
}
