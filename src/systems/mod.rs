//! ECS systems run each simulation step.
//!
//! Submodules overview:
//! - [`audio`] – audio message plumbing and the device thread
//! - [`engine`] – engine ticking and audio feedback
//! - [`movement`] – moves running vehicles
//! - [`scenario`] – applies scripted driver actions
//! - [`time`] – advances [`WorldTime`](crate::resources::worldtime::WorldTime)

pub mod audio;
pub mod engine;
pub mod movement;
pub mod scenario;
pub mod time;
