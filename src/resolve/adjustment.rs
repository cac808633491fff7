//! Adjustment-phase quantity rules.
//!
//! Each power may build (or waive) as many times as its supply centers
//! exceed its units, and must remove as many units as its units exceed its
//! centers. Orders past the allowance fail in submission order; a missing
//! removal is made for the power by civil disorder, taking the units
//! furthest from home first.

use std::collections::VecDeque;

use crate::board::{edges_from, Power, Province, Unit, ALL_POWERS, ALL_PROVINCES, PROVINCE_COUNT};
use crate::orders::Order;

use super::adjudicator::Adjudicator;
use super::state::{FailureReason, OrderId};

/// What the quantity rules decided before resolution.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AdjustmentPlan {
    /// Orders that fail regardless of anything else.
    pub rejected: Vec<(OrderId, FailureReason)>,
    /// Units to remove on behalf of powers that ordered too few removals.
    pub civil_disorder: Vec<Unit>,
}

/// Supply centers minus units, read from the world.
fn allowance(adj: &Adjudicator, power: Power) -> i32 {
    let world = adj.world();
    let mut balance = 0;
    for province in ALL_PROVINCES {
        if world.supply_center_owner(province) == Some(power) {
            balance += 1;
        }
        if world.unit_at(province).is_some_and(|u| u.power == power) {
            balance -= 1;
        }
    }
    balance
}

pub fn plan_adjustments(adj: &Adjudicator) -> AdjustmentPlan {
    let mut plan = AdjustmentPlan::default();
    for power in ALL_POWERS {
        let balance = allowance(adj, power);
        let mut granted = 0;
        let mut removing = [false; PROVINCE_COUNT];
        for (id, order) in adj.orders().filter(|(_, o)| o.power() == power) {
            let wanted = match order {
                Order::Build(_) | Order::Waive(_) => balance > 0,
                Order::Remove(_) => balance < 0,
                _ => continue,
            };
            if !wanted {
                plan.rejected.push((id, FailureReason::NoAdjustmentDue));
            } else if granted >= balance.unsigned_abs() {
                plan.rejected.push((id, FailureReason::ExcessAdjustment));
            } else {
                granted += 1;
                if let Order::Remove(r) = order {
                    removing[r.unit.province() as usize] = true;
                }
            }
        }
        if balance < 0 && granted < balance.unsigned_abs() {
            let missing = (balance.unsigned_abs() - granted) as usize;
            log::debug!("{power} is in civil disorder, {missing} removals missing");
            plan.civil_disorder.extend(civil_disorder(adj, power, missing, &removing));
        }
    }
    plan
}

/// Picks `count` units of `power` not already being removed, furthest from
/// a home center first, then by province index.
fn civil_disorder(adj: &Adjudicator, power: Power, count: usize, removing: &[bool; PROVINCE_COUNT]) -> Vec<Unit> {
    let mut candidates: Vec<(usize, Unit)> = ALL_PROVINCES
        .into_iter()
        .filter(|p| !removing[*p as usize])
        .filter_map(|p| adj.world().unit_at(p))
        .filter(|u| u.power == power)
        .map(|u| (distance_to_home(u.province, power), u))
        .collect();
    candidates.sort_by(|a, b| b.0.cmp(&a.0).then_with(|| (a.1.province as usize).cmp(&(b.1.province as usize))));
    candidates.into_iter().take(count).map(|(_, u)| u).collect()
}

/// Breadth-first distance over all borders to the nearest home center of
/// `power`. `usize::MAX` if there is none.
pub fn distance_to_home(from: Province, power: Power) -> usize {
    let is_home = |p: Province| p.is_supply_center() && p.home_power() == Some(power);
    let mut dist = [usize::MAX; PROVINCE_COUNT];
    dist[from as usize] = 0;
    let mut queue = VecDeque::from([from]);
    while let Some(prov) = queue.pop_front() {
        if is_home(prov) {
            return dist[prov as usize];
        }
        for edge in edges_from(prov) {
            let next = edge.to as usize;
            if dist[next] == usize::MAX {
                dist[next] = dist[prov as usize] + 1;
                queue.push_back(edge.to);
            }
        }
    }
    usize::MAX
}
