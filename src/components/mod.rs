//! ECS components for vehicle entities.
//!
//! This module groups all component types that can be attached to a vehicle.
//! Components define data and behaviors such as the engine state, the driver's
//! controls, the loop voice, and the vehicle's pose.
//!
//! Submodules overview:
//! - [`drivetuning`] – per-vehicle speed and steering multipliers
//! - [`enginestate`] – engine/gear state machine and its audio-cue policy
//! - [`enginevoice`] – main-thread mirror of the vehicle's looping sound
//! - [`gear`] – gear selector positions and the shift ladder
//! - [`soundbinding`] – cue ids bound to gears and engine transitions
//! - [`vehiclecontrols`] – driver intent (engine toggle, gear, steering)
//! - [`vehicletransform`] – position and heading on the ground plane

pub mod drivetuning;
pub mod enginestate;
pub mod enginevoice;
pub mod gear;
pub mod soundbinding;
pub mod vehiclecontrols;
pub mod vehicletransform;
