//! Vehicle movement system.

use bevy_ecs::prelude::*;

use crate::components::drivetuning::DriveTuning;
use crate::components::enginestate::EngineStateMachine;
use crate::components::vehiclecontrols::VehicleControls;
use crate::components::vehicletransform::VehicleTransform;
use crate::resources::worldtime::WorldTime;

/// Steer and push running vehicles along their heading.
///
/// Speed is the gear's speed units times `speed_scale`, with no acceleration;
/// a stopped engine neither moves nor turns the vehicle.
pub fn vehicle_movement_system(
    mut query: Query<(
        &EngineStateMachine,
        &VehicleControls,
        &DriveTuning,
        &mut VehicleTransform,
    )>,
    time: Res<WorldTime>,
) {
    for (engine, controls, tuning, mut transform) in query.iter_mut() {
        if !engine.is_running() {
            continue;
        }
        if controls.steer != 0.0 {
            transform.rotate(controls.steer * tuning.yaw_rate * time.delta);
        }
        let forward = engine.speed_units() * tuning.speed_scale * time.delta;
        if forward != 0.0 {
            transform.translate(forward);
        }
    }
}
