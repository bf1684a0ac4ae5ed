//! Gear selector values.
//!
//! [`Gear`] is the discrete gearbox position of a vehicle. Each gear maps to a
//! fixed, linear speed in abstract units via [`Gear::speed_units`]; there is no
//! acceleration curve.
//!
//! Gears parse from config/scenario strings (`"neutral"`, `"n"`, `"1"`,
//! `"first"`, `"r"`, `"reverse"`, ...) and serialize in lowercase.

use enum_map::Enum;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Gearbox position.
///
/// The declaration order is the canonical order of the gear set. The physical
/// shift ladder used by [`Gear::shifted_up`]/[`Gear::shifted_down`] is
/// `Reverse < Neutral < First < Second < Third < Fourth`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Enum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gear {
    #[default]
    Neutral,
    First,
    Second,
    Third,
    Fourth,
    Reverse,
}

/// Shift order from lowest to highest.
const SHIFT_LADDER: [Gear; 6] = [
    Gear::Reverse,
    Gear::Neutral,
    Gear::First,
    Gear::Second,
    Gear::Third,
    Gear::Fourth,
];

impl Gear {
    /// Every gear, in declaration order.
    pub const ALL: [Gear; 6] = [
        Gear::Neutral,
        Gear::First,
        Gear::Second,
        Gear::Third,
        Gear::Fourth,
        Gear::Reverse,
    ];

    /// Signed speed magnitude in units per second.
    ///
    /// Neutral is 0, First..Fourth are 1..4 and Reverse is -1.
    pub fn speed_units(self) -> f32 {
        match self {
            Gear::Neutral => 0.0,
            Gear::First => 1.0,
            Gear::Second => 2.0,
            Gear::Third => 3.0,
            Gear::Fourth => 4.0,
            Gear::Reverse => -1.0,
        }
    }

    /// Lowercase name, as used in config files.
    pub fn name(self) -> &'static str {
        match self {
            Gear::Neutral => "neutral",
            Gear::First => "first",
            Gear::Second => "second",
            Gear::Third => "third",
            Gear::Fourth => "fourth",
            Gear::Reverse => "reverse",
        }
    }

    /// Next gear up the shift ladder. Saturates at `Fourth`.
    pub fn shifted_up(self) -> Gear {
        let idx = self.ladder_index();
        SHIFT_LADDER[(idx + 1).min(SHIFT_LADDER.len() - 1)]
    }

    /// Next gear down the shift ladder. Saturates at `Reverse`.
    pub fn shifted_down(self) -> Gear {
        let idx = self.ladder_index();
        SHIFT_LADDER[idx.saturating_sub(1)]
    }

    fn ladder_index(self) -> usize {
        match self {
            Gear::Reverse => 0,
            Gear::Neutral => 1,
            Gear::First => 2,
            Gear::Second => 3,
            Gear::Third => 4,
            Gear::Fourth => 5,
        }
    }
}

impl fmt::Display for Gear {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Gear {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "neutral" | "n" | "0" => Ok(Gear::Neutral),
            "first" | "1" => Ok(Gear::First),
            "second" | "2" => Ok(Gear::Second),
            "third" | "3" => Ok(Gear::Third),
            "fourth" | "4" => Ok(Gear::Fourth),
            "reverse" | "r" => Ok(Gear::Reverse),
            other => Err(format!("unknown gear '{}'", other)),
        }
    }
}
