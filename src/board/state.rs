//! Board snapshot: unit positions, center ownership, phase, season and year,
//! plus the leftovers of the previous movement phase (dislodged units and
//! standoff provinces) that the retreat phase needs.

use serde::{Deserialize, Serialize};

use super::province::{Coast, Power, Province, ALL_PROVINCES, PROVINCE_COUNT};
use super::unit::{Unit, UnitType};

/// The season of a game turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Season {
    Spring,
    Fall,
}

impl Season {
    /// Returns the single-character DFEN abbreviation.
    pub const fn dfen_char(self) -> char {
        match self {
            Season::Spring => 's',
            Season::Fall => 'f',
        }
    }

    /// Parses a season from its single-character DFEN abbreviation.
    pub fn from_dfen_char(c: char) -> Option<Season> {
        match c {
            's' => Some(Season::Spring),
            'f' => Some(Season::Fall),
            _ => None,
        }
    }
}

/// The phase within a game turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    Movement,
    Retreat,
    Adjustment,
}

impl Phase {
    /// Returns the single-character DFEN abbreviation.
    pub const fn dfen_char(self) -> char {
        match self {
            Phase::Movement => 'm',
            Phase::Retreat => 'r',
            Phase::Adjustment => 'b',
        }
    }

    /// Parses a phase from its single-character DFEN abbreviation.
    pub fn from_dfen_char(c: char) -> Option<Phase> {
        match c {
            'm' => Some(Phase::Movement),
            'r' => Some(Phase::Retreat),
            'b' => Some(Phase::Adjustment),
            _ => None,
        }
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Phase::Movement => f.write_str("movement"),
            Phase::Retreat => f.write_str("retreat"),
            Phase::Adjustment => f.write_str("adjustment"),
        }
    }
}

/// A unit dislodged in the previous movement phase, awaiting a retreat order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DislodgedUnit {
    pub unit: Unit,
    /// Province the successful attacker came from.
    pub attacker_from: Province,
    /// True when the attacker arrived by convoy; the unit may then retreat
    /// to `attacker_from`.
    pub by_convoy: bool,
}

/// Complete board state at a point in time.
///
/// Fixed-size arrays indexed by `Province as usize`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardState {
    pub year: u16,
    pub season: Season,
    pub phase: Phase,
    pub units: [Option<Unit>; PROVINCE_COUNT],
    /// Supply center owner: None if not a center or if neutral.
    pub sc_owner: [Option<Power>; PROVINCE_COUNT],
    pub dislodged: [Option<DislodgedUnit>; PROVINCE_COUNT],
    /// Provinces left vacant by a standoff in the last movement phase.
    pub standoffs: [bool; PROVINCE_COUNT],
}

impl BoardState {
    /// Creates an empty board state with no units or ownership.
    pub fn empty(year: u16, season: Season, phase: Phase) -> Self {
        BoardState {
            year,
            season,
            phase,
            units: [None; PROVINCE_COUNT],
            sc_owner: [None; PROVINCE_COUNT],
            dislodged: [None; PROVINCE_COUNT],
            standoffs: [false; PROVINCE_COUNT],
        }
    }

    /// Places a unit on the board. Returns false if the province is already occupied.
    pub fn place_unit(&mut self, province: Province, power: Power, unit_type: UnitType, coast: Coast) -> bool {
        let slot = &mut self.units[province as usize];
        if slot.is_some() {
            return false;
        }
        *slot = Some(Unit { unit_type, power, province, coast });
        true
    }

    /// Removes and returns the unit at a province.
    pub fn take_unit(&mut self, province: Province) -> Option<Unit> {
        self.units[province as usize].take()
    }

    pub fn unit(&self, province: Province) -> Option<Unit> {
        self.units[province as usize]
    }

    /// Sets supply center ownership for a province.
    pub fn set_sc_owner(&mut self, province: Province, owner: Option<Power>) {
        self.sc_owner[province as usize] = owner;
    }

    /// Records a dislodged unit at a province.
    pub fn set_dislodged(&mut self, province: Province, dislodged: DislodgedUnit) {
        self.dislodged[province as usize] = Some(dislodged);
    }

    pub fn dislodged_unit(&self, province: Province) -> Option<DislodgedUnit> {
        self.dislodged[province as usize]
    }

    pub fn set_standoff(&mut self, province: Province) {
        self.standoffs[province as usize] = true;
    }

    /// Iterates over every unit on the board in province order.
    pub fn all_units(&self) -> impl Iterator<Item = Unit> + '_ {
        self.units.iter().flatten().copied()
    }

    /// Iterates over every dislodged unit in province order.
    pub fn all_dislodged(&self) -> impl Iterator<Item = DislodgedUnit> + '_ {
        self.dislodged.iter().flatten().copied()
    }

    pub fn unit_count(&self, power: Power) -> usize {
        self.all_units().filter(|u| u.power == power).count()
    }

    pub fn center_count(&self, power: Power) -> usize {
        self.sc_owner.iter().filter(|o| **o == Some(power)).count()
    }

    /// Home centers of `power` that it currently owns.
    pub fn owned_home_centers(&self, power: Power) -> impl Iterator<Item = Province> + '_ {
        ALL_PROVINCES
            .into_iter()
            .filter(move |p| p.home_power() == Some(power) && self.sc_owner[*p as usize] == Some(power))
    }

    /// Clears the retreat-phase leftovers.
    pub fn clear_retreat_data(&mut self) {
        self.dislodged = [None; PROVINCE_COUNT];
        self.standoffs = [false; PROVINCE_COUNT];
    }
}
