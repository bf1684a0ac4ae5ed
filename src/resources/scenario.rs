//! Scripted driving scenarios.
//!
//! A [`Scenario`] is a JSON list of driver actions. [`ScenarioPlayer`] hands
//! out one action per frame (a `wait` action holds for several frames), which
//! [`scenario_system`](crate::systems::scenario::scenario_system) applies to
//! every vehicle's [`VehicleControls`](crate::components::vehiclecontrols::VehicleControls).
//!
//! ```json
//! {
//!   "steps": [
//!     { "action": "engine", "on": true },
//!     { "action": "gear", "gear": "first" },
//!     { "action": "steer", "amount": 0.5 },
//!     { "action": "wait", "frames": 60 },
//!     { "action": "shift", "direction": "up" },
//!     { "action": "engine", "on": false }
//!   ]
//! }
//! ```

use bevy_ecs::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::components::gear::Gear;
use crate::components::vehiclecontrols::VehicleControls;
use crate::error::ConfigError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShiftDirection {
    Up,
    Down,
}

/// One driver action.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "lowercase")]
pub enum ScenarioAction {
    Engine { on: bool },
    Gear { gear: Gear },
    Shift { direction: ShiftDirection },
    Steer { amount: f32 },
    Wait { frames: u32 },
}

impl ScenarioAction {
    /// Apply the action to a vehicle's controls. `Wait` changes nothing.
    pub fn apply(&self, controls: &mut VehicleControls) {
        match *self {
            ScenarioAction::Engine { on } => controls.set_engine(on),
            ScenarioAction::Gear { gear } => controls.select_gear(gear),
            ScenarioAction::Shift {
                direction: ShiftDirection::Up,
            } => controls.shift_up(),
            ScenarioAction::Shift {
                direction: ShiftDirection::Down,
            } => controls.shift_down(),
            ScenarioAction::Steer { amount } => controls.set_steer(amount),
            ScenarioAction::Wait { .. } => {}
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    pub steps: Vec<ScenarioAction>,
}

impl Scenario {
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(text).map_err(|e| ConfigError::Load(format!("bad scenario: {}", e)))
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Load(format!("{}: {}", path.display(), e)))?;
        Self::from_json(&text)
    }

    /// Short demo drive: start, work up through the gears, reverse, stop.
    pub fn demo() -> Self {
        let shift_up = ScenarioAction::Shift {
            direction: ShiftDirection::Up,
        };
        Self {
            steps: vec![
                // refused: not in neutral
                ScenarioAction::Gear { gear: Gear::First },
                ScenarioAction::Engine { on: true },
                ScenarioAction::Wait { frames: 10 },
                ScenarioAction::Gear { gear: Gear::Neutral },
                ScenarioAction::Engine { on: true },
                ScenarioAction::Wait { frames: 60 },
                shift_up,
                ScenarioAction::Steer { amount: 0.5 },
                ScenarioAction::Wait { frames: 60 },
                shift_up,
                ScenarioAction::Wait { frames: 60 },
                ScenarioAction::Steer { amount: 0.0 },
                shift_up,
                ScenarioAction::Wait { frames: 60 },
                ScenarioAction::Gear { gear: Gear::Reverse },
                ScenarioAction::Wait { frames: 60 },
                ScenarioAction::Engine { on: false },
                ScenarioAction::Wait { frames: 30 },
            ],
        }
    }
}

/// Cursor over a [`Scenario`], one action per frame.
#[derive(Resource, Debug, Clone, Default)]
pub struct ScenarioPlayer {
    scenario: Scenario,
    cursor: usize,
    waiting: u32,
}

impl ScenarioPlayer {
    pub fn new(scenario: Scenario) -> Self {
        Self {
            scenario,
            cursor: 0,
            waiting: 0,
        }
    }

    /// Action for this frame, if any.
    ///
    /// A `Wait { frames: n }` action occupies this frame and the `n - 1`
    /// following ones (at least one frame).
    pub fn next_action(&mut self) -> Option<ScenarioAction> {
        if self.waiting > 0 {
            self.waiting -= 1;
            return None;
        }
        let action = *self.scenario.steps.get(self.cursor)?;
        self.cursor += 1;
        if let ScenarioAction::Wait { frames } = action {
            self.waiting = frames.saturating_sub(1);
        }
        Some(action)
    }

    pub fn is_finished(&self) -> bool {
        self.waiting == 0 && self.cursor >= self.scenario.steps.len()
    }
}
