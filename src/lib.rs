//! gearsound library.
//!
//! This module exposes the vehicle engine state machine together with the ECS
//! components, resources, systems, and events that drive it, for use in
//! integration tests and as a reusable library.

pub mod components;
pub mod error;
pub mod events;
pub mod game;
pub mod resources;
pub mod soundplayer;
pub mod systems;
