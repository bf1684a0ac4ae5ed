//! Per-vehicle table of audio cues.
//!
//! A [`SoundBinding`] associates one looping cue with every [`Gear`] plus two
//! one-shot cues: `start` (played when the engine starts) and `stop` (played
//! when it stops). Any slot may be empty, which means silence for that slot.
//!
//! Cues are identified by string ids. The shipped host uses the asset path as
//! the id, so two gears bound to the same file share one cue and reselecting it
//! does not restart playback.
//!
//! # Slot names
//!
//! Config files and [`SoundBinding::set_slot`] address slots by name:
//! `neutral`, `first`, `second`, `third`, `fourth`, `reverse`, `start`, `stop`.

use enum_map::EnumMap;

use crate::components::gear::Gear;
use crate::error::ConfigError;

/// Name of the engine-start one-shot slot.
pub const START_SLOT: &str = "start";
/// Name of the engine-stop one-shot slot.
pub const STOP_SLOT: &str = "stop";

/// Loop cue per gear plus start/stop one-shots.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SoundBinding {
    loops: EnumMap<Gear, Option<String>>,
    start: Option<String>,
    stop: Option<String>,
}

impl SoundBinding {
    /// An empty binding: every slot silent.
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind the loop played while running in `gear` (builder pattern).
    pub fn with_loop(mut self, gear: Gear, cue: impl Into<String>) -> Self {
        self.loops[gear] = Some(cue.into());
        self
    }

    /// Bind the engine-start one-shot (builder pattern).
    pub fn with_start(mut self, cue: impl Into<String>) -> Self {
        self.start = Some(cue.into());
        self
    }

    /// Bind the engine-stop one-shot (builder pattern).
    pub fn with_stop(mut self, cue: impl Into<String>) -> Self {
        self.stop = Some(cue.into());
        self
    }

    /// Loop cue for `gear`, if bound.
    pub fn loop_for(&self, gear: Gear) -> Option<&str> {
        self.loops[gear].as_deref()
    }

    /// Engine-start one-shot, if bound.
    pub fn start_cue(&self) -> Option<&str> {
        self.start.as_deref()
    }

    /// Engine-stop one-shot, if bound.
    pub fn stop_cue(&self) -> Option<&str> {
        self.stop.as_deref()
    }

    /// Set a slot by its config name. `None` clears the slot.
    ///
    /// Returns [`ConfigError::UnknownSoundSlot`] for names that are neither a
    /// gear nor `start`/`stop`.
    pub fn set_slot(&mut self, slot: &str, cue: Option<String>) -> Result<(), ConfigError> {
        match slot {
            START_SLOT => self.start = cue,
            STOP_SLOT => self.stop = cue,
            other => {
                let gear = Gear::ALL
                    .into_iter()
                    .find(|g| g.name() == other)
                    .ok_or_else(|| ConfigError::UnknownSoundSlot(other.to_string()))?;
                self.loops[gear] = cue;
            }
        }
        Ok(())
    }

    /// Every bound slot as `(slot name, cue)`, gears first.
    pub fn slots(&self) -> impl Iterator<Item = (&'static str, &str)> + '_ {
        self.loops
            .iter()
            .filter_map(|(gear, cue)| cue.as_deref().map(|c| (gear.name(), c)))
            .chain(self.start.as_deref().map(|c| (START_SLOT, c)))
            .chain(self.stop.as_deref().map(|c| (STOP_SLOT, c)))
    }

    /// Every slot as `(slot name, cue)`, empty slots included, gears first.
    pub fn all_slots(&self) -> impl Iterator<Item = (&'static str, Option<&str>)> + '_ {
        self.loops
            .iter()
            .map(|(gear, cue)| (gear.name(), cue.as_deref()))
            .chain([
                (START_SLOT, self.start.as_deref()),
                (STOP_SLOT, self.stop.as_deref()),
            ])
    }

    /// Distinct loop cue ids, in gear order.
    pub fn loop_cues(&self) -> Vec<&str> {
        let mut cues: Vec<&str> = Vec::new();
        for cue in self.loops.values().filter_map(|c| c.as_deref()) {
            if !cues.contains(&cue) {
                cues.push(cue);
            }
        }
        cues
    }

    /// Distinct one-shot cue ids (`start`, then `stop`).
    pub fn one_shot_cues(&self) -> Vec<&str> {
        let mut cues: Vec<&str> = Vec::new();
        for cue in [self.start.as_deref(), self.stop.as_deref()]
            .into_iter()
            .flatten()
        {
            if !cues.contains(&cue) {
                cues.push(cue);
            }
        }
        cues
    }

    /// Check the binding is well formed.
    ///
    /// Empty slots are valid. A slot bound to an empty or whitespace-only cue
    /// id is not.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (slot, cue) in self.slots() {
            if cue.trim().is_empty() {
                return Err(ConfigError::BlankCue(slot.to_string()));
            }
        }
        Ok(())
    }
}
