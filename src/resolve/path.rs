//! Convoy route search.
//!
//! A convoy route is a chain `[src, fleet.., dest]` of at least three
//! provinces where every intermediate province holds a fleet able to convoy
//! (at sea, or on a coast the world declares convoyable) and consecutive
//! provinces share a fleet border. A route is *theoretical* when the fleets
//! merely stand there and *legal* when each of them carries a matching
//! convoy order.

use std::collections::VecDeque;

use crate::board::{fleet_border, Province, UnitType, World, ALL_PROVINCES, PROVINCE_COUNT};

use super::adjudicator::Adjudicator;
use super::state::OrderId;
use super::tristate::Tristate;
use crate::config::ConvoyRouteRule;

/// Graph search over the fleets of one world snapshot.
pub struct Path<'a> {
    world: &'a dyn World,
}

impl<'a> Path<'a> {
    pub fn new(world: &'a dyn World) -> Self {
        Path { world }
    }

    /// True if a fleet stands in `province` and may take part in a convoy there.
    pub fn can_convoy(&self, province: Province) -> bool {
        self.world.unit_at(province).is_some_and(|u| u.unit_type == UnitType::Fleet)
            && (province.is_sea() || self.world.is_convoyable_coast(province))
    }

    /// True if fleets stand in a chain from `src` to `dest`, whatever their orders.
    pub fn theoretical_route_exists(&self, src: Province, dest: Province) -> bool {
        self.route_exists(src, dest, |p| self.can_convoy(p))
    }

    /// True if the fleet at `via` lies on some theoretical route from `src` to `dest`.
    pub fn on_theoretical_route(&self, src: Province, via: Province, dest: Province) -> bool {
        let linked = |a: Province, b: Province| fleet_border(a, b) || self.route_exists(a, b, |p| self.can_convoy(p));
        self.theoretical_route_exists(src, dest) && linked(src, via) && linked(via, dest)
    }

    /// Breadth-first search from `src` to `dest` through provinces accepted by `usable`.
    pub fn route_exists(&self, src: Province, dest: Province, usable: impl Fn(Province) -> bool) -> bool {
        if src == dest {
            return false;
        }
        let mut seen = [false; PROVINCE_COUNT];
        let mut queue = VecDeque::new();
        for p in ALL_PROVINCES {
            if p != src && p != dest && fleet_border(src, p) && usable(p) {
                seen[p as usize] = true;
                queue.push_back(p);
            }
        }
        while let Some(fleet) = queue.pop_front() {
            if fleet_border(fleet, dest) {
                return true;
            }
            for p in ALL_PROVINCES {
                if !seen[p as usize] && p != src && p != dest && fleet_border(fleet, p) && usable(p) {
                    seen[p as usize] = true;
                    queue.push_back(p);
                }
            }
        }
        false
    }

    /// Every simple route from `src` to `dest` through provinces accepted by `usable`.
    pub fn routes(&self, src: Province, dest: Province, usable: impl Fn(Province) -> bool) -> Vec<Vec<Province>> {
        let candidates: Vec<Province> = ALL_PROVINCES
            .into_iter()
            .filter(|p| *p != src && *p != dest && usable(*p))
            .collect();
        let mut found = Vec::new();
        let mut route = vec![src];
        self.extend_routes(&candidates, dest, &mut route, &mut found);
        found
    }

    fn extend_routes(&self, candidates: &[Province], dest: Province, route: &mut Vec<Province>, found: &mut Vec<Vec<Province>>) {
        let Some(&last) = route.last() else { return };
        if route.len() >= 2 && fleet_border(last, dest) {
            let mut complete = route.clone();
            complete.push(dest);
            found.push(complete);
        }
        for &next in candidates {
            if !route.contains(&next) && fleet_border(last, next) {
                route.push(next);
                self.extend_routes(candidates, dest, route, found);
                route.pop();
            }
        }
    }

    /// Checks the shape of an explicitly written route.
    pub fn is_valid_route(&self, route: &[Province], src: Province, dest: Province) -> bool {
        route.len() >= 3
            && route.first() == Some(&src)
            && route.last() == Some(&dest)
            && route[1..route.len() - 1].iter().all(|p| self.can_convoy(*p))
            && route.windows(2).all(|w| fleet_border(w[0], w[1]))
    }

    /// Tristate of a route set given the state of each fleet's convoy.
    ///
    /// `fleet` returns `None` for provinces without a matching convoy order.
    /// Success if some route runs through successful convoys only, Failure if
    /// every route has a failed or missing convoy.
    pub fn evaluate(&self, src: Province, dest: Province, fleet: impl Fn(Province) -> Option<Tristate>) -> Tristate {
        if self.route_exists(src, dest, |p| fleet(p) == Some(Tristate::Success)) {
            Tristate::Success
        } else if self.route_exists(src, dest, |p| fleet(p).is_some_and(|t| t != Tristate::Failure)) {
            Tristate::Uncertain
        } else {
            Tristate::Failure
        }
    }
}

/// Tristate of one explicit route.
pub fn evaluate_route(route: &[Province], fleet: impl Fn(Province) -> Option<Tristate>) -> Tristate {
    if route.len() < 3 {
        return Tristate::Failure;
    }
    route[1..route.len() - 1].iter().map(|p| fleet(*p).unwrap_or(Tristate::Failure)).collect()
}

/// Best state over a set of routes: Success if any succeeds, Uncertain if
/// any might.
fn any_route<'r>(routes: impl Iterator<Item = &'r Vec<Province>>, fleet: impl Fn(Province) -> Option<Tristate>) -> Tristate {
    routes.map(|route| evaluate_route(route, &fleet)).fold(Tristate::Failure, |acc, t| match (acc, t) {
        (Tristate::Success, _) | (_, Tristate::Success) => Tristate::Success,
        (Tristate::Uncertain, _) | (_, Tristate::Uncertain) => Tristate::Uncertain,
        _ => Tristate::Failure,
    })
}

/// State of the convoy carrying move `id` from the fleet at `fleet`, if any.
fn convoy_state(adj: &Adjudicator, id: OrderId, fleet: Province) -> Option<Tristate> {
    adj.deps(id)
        .convoys
        .iter()
        .find(|c| adj.order(**c).source() == fleet)
        .map(|c| adj.status(*c).eval)
}

fn uses_explicit_routes(adj: &Adjudicator, routes: &[Vec<Province>]) -> bool {
    !routes.is_empty() && adj.rules().convoy_routes != ConvoyRouteRule::ImplicitOnly
}

/// Current state of the convoy route of move `id`.
pub fn move_path(adj: &Adjudicator, id: OrderId) -> Tristate {
    let Some(mv) = adj.order(id).as_move() else {
        return Tristate::Failure;
    };
    let fleet = |p: Province| convoy_state(adj, id, p);
    if uses_explicit_routes(adj, &mv.routes) {
        return any_route(mv.routes.iter(), fleet);
    }
    Path::new(adj.world()).evaluate(mv.unit.province(), mv.destination.province, fleet)
}

/// Every legal route of move `id`: routes through fleets carrying a matching convoy.
pub fn legal_routes(adj: &Adjudicator, id: OrderId) -> Vec<Vec<Province>> {
    let Some(mv) = adj.order(id).as_move() else {
        return Vec::new();
    };
    if uses_explicit_routes(adj, &mv.routes) {
        return mv.routes.clone();
    }
    let fleets: Vec<Province> = adj.deps(id).convoys.iter().map(|c| adj.order(*c).source()).collect();
    Path::new(adj.world()).routes(mv.unit.province(), mv.destination.province, |p| fleets.contains(&p))
}

/// State of move `id`'s convoy over the legal routes that avoid the fleet
/// in `avoid`. Failure if every legal route runs through it.
pub fn path_avoiding(adj: &Adjudicator, id: OrderId, avoid: Province) -> Tristate {
    let routes = legal_routes(adj, id);
    any_route(routes.iter().filter(|r| !r.contains(&avoid)), |p| convoy_state(adj, id, p))
}
