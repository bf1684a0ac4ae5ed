//! ECS resources shared across systems.
//!
//! Submodules overview:
//! - [`audio`] – bridge to the background audio thread
//! - [`scenario`] – scripted driver actions and their playback cursor
//! - [`vehicleconfig`] – INI-backed vehicle and simulation settings
//! - [`worldtime`] – simulation clock

pub mod audio;
pub mod scenario;
pub mod vehicleconfig;
pub mod worldtime;
