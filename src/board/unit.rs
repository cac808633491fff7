//! Unit types and units on the board.

use serde::{Deserialize, Serialize};

use super::province::{Coast, Power, Province, ProvinceType};

/// The type of a military unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitType {
    Army,
    Fleet,
}

impl UnitType {
    /// Lowercase letter used by the position notation.
    pub const fn letter(self) -> char {
        match self {
            UnitType::Army => 'a',
            UnitType::Fleet => 'f',
        }
    }

    pub fn from_letter(c: char) -> Option<UnitType> {
        match c {
            'a' => Some(UnitType::Army),
            'f' => Some(UnitType::Fleet),
            _ => None,
        }
    }

    /// Returns true if this unit type may stand in a province of the given terrain.
    pub const fn can_occupy(self, terrain: ProvinceType) -> bool {
        !matches!(
            (self, terrain),
            (UnitType::Army, ProvinceType::Sea) | (UnitType::Fleet, ProvinceType::Land)
        )
    }
}

impl std::fmt::Display for UnitType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UnitType::Army => f.write_str("army"),
            UnitType::Fleet => f.write_str("fleet"),
        }
    }
}

/// A unit standing on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Unit {
    pub unit_type: UnitType,
    pub power: Power,
    pub province: Province,
    #[serde(default)]
    pub coast: Coast,
}

impl Unit {
    pub fn army(power: Power, province: Province) -> Self {
        Unit { unit_type: UnitType::Army, power, province, coast: Coast::None }
    }

    pub fn fleet(power: Power, province: Province, coast: Coast) -> Self {
        Unit { unit_type: UnitType::Fleet, power, province, coast }
    }
}
