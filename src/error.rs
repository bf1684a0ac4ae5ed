//! Error types shared by the engine state machine and the config loader.

use thiserror::Error;

use crate::components::gear::Gear;

/// Malformed vehicle configuration or sound binding.
///
/// Fatal at construction: a vehicle is never spawned from a config that
/// produced one of these.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("failed to load config: {0}")]
    Load(String),
    #[error("unknown sound slot '{0}'")]
    UnknownSoundSlot(String),
    #[error("sound slot '{0}' is bound to a blank cue")]
    BlankCue(String),
    #[error("invalid value '{value}' for [{section}] {key}")]
    InvalidValue {
        section: String,
        key: String,
        value: String,
    },
}

/// An engine start was requested outside of neutral.
///
/// Recoverable: the engine stays stopped and the requester must clear its
/// "engine on" flag. Shifting to neutral and requesting again succeeds.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("engine cannot start in gear {gear}, shift to neutral first")]
pub struct RejectedTransition {
    /// Gear that was selected when the start was requested.
    pub gear: Gear,
}
