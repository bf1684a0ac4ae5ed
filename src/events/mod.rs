//! Event and message types.
//!
//! Submodules overview:
//! - [`audio`] – commands to and feedback from the audio thread
//! - [`engine`] – engine state changes, rejected starts, finished cues, and
//!   their logging observers

pub mod audio;
pub mod engine;
