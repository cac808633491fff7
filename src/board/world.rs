//! Read-only view of the world the adjudicator resolves against.
//!
//! The engine never owns the map or the position; it asks a `World` for unit
//! positions, ownership, phase, adjacency and border rules. `BoardState`
//! implements it for the standard map.

use super::adjacency;
use super::border::Border;
use super::province::{Coast, Power, Province};
use super::state::{BoardState, DislodgedUnit, Phase, Season};
use super::unit::{Unit, UnitType};

/// Snapshot queries used during validation and resolution.
pub trait World {
    fn unit_at(&self, province: Province) -> Option<Unit>;

    fn dislodged_unit_at(&self, province: Province) -> Option<DislodgedUnit>;

    fn supply_center_owner(&self, province: Province) -> Option<Power>;

    fn phase(&self) -> Phase;

    fn season(&self) -> Season;

    /// True if the province was left vacant by a standoff last movement phase.
    fn is_standoff(&self, province: Province) -> bool;

    fn home_power(&self, province: Province) -> Option<Power> {
        province.home_power()
    }

    fn is_adjacent(&self, src: Province, src_coast: Coast, dst: Province, dst_coast: Coast, unit_type: UnitType) -> bool {
        adjacency::is_adjacent(src, src_coast, dst, dst_coast, unit_type)
    }

    /// Border rule on the edge between two provinces, if any.
    fn border(&self, _from: Province, _to: Province) -> Option<&Border> {
        None
    }

    /// Strength modifier for a move into `dest` from `src`. Negative across a
    /// difficult passable border.
    fn base_move_modifier(&self, dest: Province, src: Province) -> i32 {
        self.border(src, dest).map_or(0, |b| b.move_modifier)
    }

    /// True for coastal provinces whose fleets may convoy, as on some variant maps.
    fn is_convoyable_coast(&self, _province: Province) -> bool {
        false
    }
}

impl World for BoardState {
    fn unit_at(&self, province: Province) -> Option<Unit> {
        self.unit(province)
    }

    fn dislodged_unit_at(&self, province: Province) -> Option<DislodgedUnit> {
        self.dislodged[province as usize]
    }

    fn supply_center_owner(&self, province: Province) -> Option<Power> {
        self.sc_owner[province as usize]
    }

    fn phase(&self) -> Phase {
        self.phase
    }

    fn season(&self) -> Season {
        self.season
    }

    fn is_standoff(&self, province: Province) -> bool {
        self.standoffs[province as usize]
    }
}
