//! Driver-facing controls of a vehicle.
//!
//! [`VehicleControls`] is what input handling (or a scenario script) writes:
//! the engine toggle, the gear selector and the steering amount. The engine
//! system reads it every frame and may revert `request.engine_on` when a start
//! is rejected.

use bevy_ecs::prelude::Component;

use crate::components::enginestate::EngineRequest;
use crate::components::gear::Gear;

#[derive(Component, Debug, Clone, Copy, Default, PartialEq)]
pub struct VehicleControls {
    /// Requested engine toggle and gear.
    pub request: EngineRequest,
    /// Steering input in `[-1.0, 1.0]`; positive turns right.
    pub steer: f32,
}

impl VehicleControls {
    /// Controls that match an existing engine state.
    pub fn from_request(request: EngineRequest) -> Self {
        Self {
            request,
            steer: 0.0,
        }
    }

    pub fn set_engine(&mut self, on: bool) {
        self.request.engine_on = on;
    }

    pub fn toggle_engine(&mut self) {
        self.request.engine_on = !self.request.engine_on;
    }

    pub fn select_gear(&mut self, gear: Gear) {
        self.request.gear = gear;
    }

    pub fn shift_up(&mut self) {
        self.request.gear = self.request.gear.shifted_up();
    }

    pub fn shift_down(&mut self) {
        self.request.gear = self.request.gear.shifted_down();
    }

    /// Set steering, clamped to `[-1.0, 1.0]`.
    pub fn set_steer(&mut self, amount: f32) {
        self.steer = amount.clamp(-1.0, 1.0);
    }
}
