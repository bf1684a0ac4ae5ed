//! Ground-plane transform of a vehicle.
//!
//! Position is in world units on the X/Z plane (Y is up and untouched by
//! movement). Heading is a yaw angle in degrees; yaw 0 faces +Z and positive
//! yaw turns towards +X.

use bevy_ecs::prelude::Component;

#[derive(Component, Clone, Copy, Debug, Default, PartialEq)]
pub struct VehicleTransform {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub yaw_degrees: f32,
}

impl VehicleTransform {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self {
            x,
            y,
            z,
            yaw_degrees: 0.0,
        }
    }

    /// Turn by `delta_yaw` degrees, keeping the heading in `[0, 360)`.
    pub fn rotate(&mut self, delta_yaw: f32) {
        self.yaw_degrees = (self.yaw_degrees + delta_yaw).rem_euclid(360.0);
    }

    /// Move `delta_forward` units along the current heading. Negative values
    /// move backwards.
    pub fn translate(&mut self, delta_forward: f32) {
        let yaw = self.yaw_degrees.to_radians();
        self.x += yaw.sin() * delta_forward;
        self.z += yaw.cos() * delta_forward;
    }
}
