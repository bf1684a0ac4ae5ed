//! Scenario playback system.

use bevy_ecs::prelude::*;
use log::debug;

use crate::components::vehiclecontrols::VehicleControls;
use crate::resources::scenario::ScenarioPlayer;

/// Apply this frame's scenario action (if any) to every vehicle's controls.
///
/// Does nothing when no [`ScenarioPlayer`] resource is present.
pub fn scenario_system(
    player: Option<ResMut<ScenarioPlayer>>,
    mut controls: Query<&mut VehicleControls>,
) {
    let Some(mut player) = player else {
        return;
    };
    if let Some(action) = player.next_action() {
        debug!("scenario action {:?}", action);
        for mut c in controls.iter_mut() {
            action.apply(&mut c);
        }
    }
}
