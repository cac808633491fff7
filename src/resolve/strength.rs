//! Strength bounds of moves and occupied provinces.
//!
//! Every strength is an interval `[min, max]`: `min` counts only what is
//! already certain, `max` everything not yet ruled out. A decision is taken
//! once the intervals of the two sides no longer overlap.

use crate::board::Province;
use crate::orders::support_counts;

use super::adjudicator::Adjudicator;
use super::state::{OrderId, Status};
use super::tristate::Tristate;

/// A provable strength interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Bounds {
    pub min: i32,
    pub max: i32,
}

impl Bounds {
    pub const ZERO: Bounds = Bounds { min: 0, max: 0 };

    pub fn exact(value: i32) -> Self {
        Bounds { min: value, max: value }
    }

    fn from_counts(base: i32, (certain, max): (u32, u32)) -> Self {
        Bounds { min: base + certain as i32, max: base + max as i32 }
    }

    fn span(self, other: Bounds) -> Self {
        Bounds { min: self.min.min(other.min), max: self.max.max(other.max) }
    }

    /// Lowers `min` to zero while the move's route is undecided.
    fn gated(self, path: Tristate) -> Self {
        match path {
            Tristate::Failure => Bounds::ZERO,
            Tristate::Uncertain => Bounds { min: 0, max: self.max },
            Tristate::Success => self,
        }
    }
}

/// Base strength of a move before supports: 1 plus any border modifier.
fn base(adj: &Adjudicator, src: Province, dest: Province) -> i32 {
    1 + adj.world().base_move_modifier(dest, src)
}

/// Support bounds of move `id`: (all, from powers other than the occupant's).
pub fn move_supports(adj: &Adjudicator, id: OrderId) -> ((u32, u32), (u32, u32)) {
    let deps = adj.deps(id);
    let all = support_counts(adj, &deps.supports_of_move, |_| true);
    let own = support_counts(adj, &deps.self_supports, |_| true);
    (all, (all.0 - own.0, all.1 - own.1))
}

/// The move ordered from the destination back into this move's source,
/// unless either side is convoyed.
pub fn head_to_head(adj: &Adjudicator, id: OrderId, convoying: bool) -> Option<OrderId> {
    if convoying {
        return None;
    }
    let mv = adj.order(id).as_move()?;
    let occupant = adj.deps(id).occupant?;
    let other = adj.order(occupant).as_move()?;
    let opposed = other.destination.province == mv.unit.province() && !adj.status(occupant).convoying;
    opposed.then_some(occupant)
}

/// Strength with which move `id` attacks its destination.
///
/// Against a unit that stays, supports from that unit's power do not count,
/// and a unit of the mover's own power cannot be attacked at all.
pub fn attack(adj: &Adjudicator, id: OrderId, own: &Status) -> Bounds {
    let Some(mv) = adj.order(id).as_move() else {
        return Bounds::ZERO;
    };
    let src = mv.unit.province();
    let dest = mv.destination.province;
    let base = base(adj, src, dest);
    let (all, foreign) = move_supports(adj, id);
    let vacated = Bounds::from_counts(base, all);

    let bounds = match adj.deps(id).occupant {
        None => vacated,
        Some(occ) => {
            let staying = if adj.order(occ).power() == mv.unit.power {
                Bounds::ZERO
            } else {
                Bounds::from_counts(base, foreign)
            };
            let leaving = adj.order(occ).is_move() && own.head_to_head.is_none();
            if !leaving {
                staying
            } else {
                match adj.status(occ).eval {
                    Tristate::Success => vacated,
                    Tristate::Failure => staying,
                    Tristate::Uncertain => staying.span(vacated),
                }
            }
        }
    };
    bounds.gated(own.path)
}

/// Attack strength of move `id` if its destination were vacated.
pub fn attack_if_vacated(adj: &Adjudicator, id: OrderId, own: &Status) -> Bounds {
    let Some(mv) = adj.order(id).as_move() else {
        return Bounds::ZERO;
    };
    let (all, _) = move_supports(adj, id);
    Bounds::from_counts(base(adj, mv.unit.province(), mv.destination.province), all).gated(own.path)
}

/// Strength with which move `id` keeps rivals out of its destination.
pub fn prevent(adj: &Adjudicator, id: OrderId, own: &Status) -> Bounds {
    let Some(mv) = adj.order(id).as_move() else {
        return Bounds::ZERO;
    };
    let (all, _) = move_supports(adj, id);
    let mut bounds = Bounds::from_counts(base(adj, mv.unit.province(), mv.destination.province), all).gated(own.path);
    if let Some(opponent) = head_to_head(adj, id, own.convoying) {
        match adj.status(opponent).eval {
            Tristate::Success => return Bounds::ZERO,
            Tristate::Uncertain => bounds.min = 0,
            Tristate::Failure => {}
        }
    }
    bounds
}

/// Strength with which move `id` defends its own province in a head-to-head battle.
pub fn defend(adj: &Adjudicator, id: OrderId) -> Bounds {
    let Some(mv) = adj.order(id).as_move() else {
        return Bounds::ZERO;
    };
    let (all, _) = move_supports(adj, id);
    Bounds::from_counts(base(adj, mv.unit.province(), mv.destination.province), all)
}

/// Strength with which the unit in `province` holds it.
///
/// A unit ordered to move keeps strength 1 only if its move failed; hold
/// supports apply only to units not ordered to move.
pub fn hold(adj: &Adjudicator, province: Province) -> Bounds {
    let Some(occ) = adj.order_at(province) else {
        return Bounds::ZERO;
    };
    if adj.order(occ).is_move() {
        return match adj.status(occ).eval {
            Tristate::Success => Bounds::ZERO,
            Tristate::Failure => Bounds::exact(1),
            Tristate::Uncertain => Bounds { min: 0, max: 1 },
        };
    }
    Bounds::from_counts(1, support_counts(adj, &adj.deps(occ).supports_of_source, |_| true))
}

/// Strength of a retreat: 1 plus any border modifier.
pub fn retreat(adj: &Adjudicator, id: OrderId) -> i32 {
    match adj.order(id).as_retreat() {
        Some(r) => 1 + adj.world().base_move_modifier(r.destination.province, r.unit.province()),
        None => 0,
    }
}
