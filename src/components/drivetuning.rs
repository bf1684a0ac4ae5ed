//! Movement tuning component.

use bevy_ecs::prelude::Component;

/// Per-vehicle movement tuning.
///
/// Forward speed is `gear.speed_units() * speed_scale` units per second and
/// full steering turns at `yaw_rate` degrees per second.
#[derive(Component, Clone, Copy, Debug, PartialEq)]
pub struct DriveTuning {
    pub speed_scale: f32,
    pub yaw_rate: f32,
}

impl Default for DriveTuning {
    fn default() -> Self {
        Self {
            speed_scale: 1.0,
            yaw_rate: 45.0,
        }
    }
}
