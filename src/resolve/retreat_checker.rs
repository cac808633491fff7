//! Legal retreat destinations of dislodged units.

use crate::board::{fleet_coasts_to, Coast, DislodgedUnit, UnitType, World};
use crate::orders::{Location, OrderKind};

/// Why a retreat destination is closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetreatBlock {
    NotAdjacent,
    /// The destination has several reachable coasts and none was given.
    CoastRequired,
    Occupied,
    /// Left vacant by a standoff in the preceding movement phase.
    Standoff,
    /// The attacker came from there over land.
    AttackerOrigin,
    Border,
}

impl std::fmt::Display for RetreatBlock {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            RetreatBlock::NotAdjacent => "not adjacent",
            RetreatBlock::CoastRequired => "coast required",
            RetreatBlock::Occupied => "occupied",
            RetreatBlock::Standoff => "standoff province",
            RetreatBlock::AttackerOrigin => "attacker came from there",
            RetreatBlock::Border => "border closed to retreats",
        })
    }
}

/// Answers retreat questions from the snapshot taken after the movement phase.
pub struct RetreatChecker<'a> {
    world: &'a dyn World,
}

impl<'a> RetreatChecker<'a> {
    pub fn new(world: &'a dyn World) -> Self {
        RetreatChecker { world }
    }

    /// Checks a retreat of `unit` to `dest`; returns the coast the unit arrives on.
    pub fn check(&self, unit: &DislodgedUnit, dest: Location) -> Result<Coast, RetreatBlock> {
        let src = unit.unit.province;
        let to = dest.province;
        let coast = self.arrival_coast(unit, dest)?;
        if self.world.border(src, to).is_some_and(|b| !b.allows(Some(unit.unit.unit_type), OrderKind::Retreat)) {
            return Err(RetreatBlock::Border);
        }
        if self.world.unit_at(to).is_some() {
            return Err(RetreatBlock::Occupied);
        }
        if to == unit.attacker_from && !unit.by_convoy {
            return Err(RetreatBlock::AttackerOrigin);
        }
        if self.world.is_standoff(to) {
            return Err(RetreatBlock::Standoff);
        }
        Ok(coast)
    }

    fn arrival_coast(&self, unit: &DislodgedUnit, dest: Location) -> Result<Coast, RetreatBlock> {
        let u = unit.unit;
        if !self.world.is_adjacent(u.province, u.coast, dest.province, dest.coast, u.unit_type) {
            return Err(RetreatBlock::NotAdjacent);
        }
        if u.unit_type == UnitType::Army || !dest.province.has_coasts() {
            return Ok(Coast::None);
        }
        if dest.coast.is_specified() {
            return Ok(dest.coast);
        }
        match fleet_coasts_to(u.province, u.coast, dest.province).as_slice() {
            [only] => Ok(*only),
            _ => Err(RetreatBlock::CoastRequired),
        }
    }
}
