//! Move: `A par - bur`, `A lon - nwy via convoy`.

use serde::{Deserialize, Serialize};

use super::{Location, Order, OrderError, OrderKind, OrderUnit, ValidationContext, ValidationWarning, Verification};
use crate::board::{fleet_coasts_to, Coast, Province, UnitType, World};
use crate::config::ConvoyRouteRule;
use crate::resolve::path::{self, Path};
use crate::resolve::state::{Dependencies, FailureReason, OrderId, Status};
use crate::resolve::strength::{self, Bounds};
use crate::resolve::tristate::Tristate;
use crate::resolve::Adjudicator;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Move {
    pub unit: OrderUnit,
    pub destination: Location,
    /// The army is to be convoyed even where a land route exists.
    #[serde(default)]
    pub via_convoy: bool,
    /// Convoy routes written into the order, each `[src, fleet.., dest]`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub routes: Vec<Vec<Province>>,
}

impl Move {
    pub fn new(unit: OrderUnit, destination: Location) -> Self {
        Move { unit, destination, via_convoy: false, routes: Vec::new() }
    }

    pub fn by_convoy(mut self) -> Self {
        self.via_convoy = true;
        self
    }

    pub fn with_route(mut self, route: Vec<Province>) -> Self {
        self.routes.push(route);
        self
    }

    fn is_fleet(&self) -> bool {
        self.unit.unit_type == Some(UnitType::Fleet)
    }

    fn land_route(&self, world: &dyn World) -> bool {
        world.is_adjacent(self.unit.province(), Coast::None, self.destination.province, Coast::None, UnitType::Army)
    }

    fn explicit_routes(&self, rule: ConvoyRouteRule) -> &[Vec<Province>] {
        if rule == ConvoyRouteRule::ImplicitOnly {
            &[]
        } else {
            &self.routes
        }
    }

    pub(super) fn validate(&mut self, ctx: &ValidationContext) -> Result<Option<ValidationWarning>, OrderError> {
        ctx.require_phase(OrderKind::Move)?;
        let warning = self.unit.check_against(ctx.world.unit_at(self.unit.province()), ctx.options)?;
        let unit_type = self.unit.unit_type.ok_or(OrderError::MissingUnitType(self.unit.province()))?;
        let src = self.unit.province();
        let dest = self.destination.province;
        if src == dest {
            return Err(OrderError::MoveToSelf(src));
        }

        match unit_type {
            UnitType::Fleet => {
                if self.via_convoy || !self.routes.is_empty() {
                    return Err(OrderError::NotConvoyable(src));
                }
                self.destination.coast = fleet_arrival(ctx, self.unit.location, self.destination)?;
            }
            UnitType::Army => {
                self.destination.coast = Coast::None;
                self.check_army_route(ctx)?;
            }
        }
        ctx.check_border(OrderKind::Move, Some(unit_type), src, dest)?;

        let convoy_ordered = ctx.own_orders.iter().filter_map(Order::as_convoy).any(|c| {
            c.convoyed.province == src && c.destination.province == dest
        });
        if unit_type == UnitType::Army
            && !self.via_convoy
            && self.routes.is_empty()
            && convoy_ordered
            && self.land_route(ctx.world)
        {
            return Ok(warning.or(Some(ValidationWarning::ConvoyIntentAssumed { from: src, to: dest })));
        }
        Ok(warning)
    }

    fn check_army_route(&self, ctx: &ValidationContext) -> Result<(), OrderError> {
        let src = self.unit.province();
        let dest = self.destination.province;
        let rule = ctx.rules.convoy_routes;
        let path = Path::new(ctx.world);
        let routes = self.explicit_routes(rule);
        if routes.iter().any(|r| !path.is_valid_route(r, src, dest)) {
            return Err(OrderError::InvalidRoute { from: src, to: dest });
        }
        if self.land_route(ctx.world) || !routes.is_empty() {
            return Ok(());
        }
        if rule == ConvoyRouteRule::ExplicitOnly {
            return Err(OrderError::ExplicitRouteRequired { from: src, to: dest });
        }
        if path.theoretical_route_exists(src, dest) {
            Ok(())
        } else {
            Err(OrderError::Unreachable { from: src, to: dest })
        }
    }

    /// Decides whether the army means to travel by convoy, and whether the
    /// convoy orders given could carry it at all.
    pub(super) fn verify(&self, id: OrderId, adj: &Adjudicator) -> Verification {
        if self.is_fleet() {
            return Verification::default();
        }
        let src = self.unit.province();
        let dest = self.destination.province;
        let rule = adj.rules().convoy_routes;
        let matching: Vec<(Province, bool)> = adj
            .orders()
            .filter_map(|(_, o)| o.as_convoy())
            .filter(|c| c.convoyed.province == src && c.destination.province == dest)
            .map(|c| (c.unit.province(), c.unit.power == self.unit.power))
            .collect();

        let land = self.land_route(adj.world());
        let routes = self.explicit_routes(rule);
        let intent = !land
            || self.via_convoy
            || !routes.is_empty()
            || (rule != ConvoyRouteRule::ExplicitOnly && matching.iter().any(|(_, own)| *own));
        if !intent {
            return Verification::default();
        }

        let carried = |p: Province| matching.iter().any(|(fleet, _)| *fleet == p);
        let found = if routes.is_empty() {
            Path::new(adj.world()).route_exists(src, dest, carried)
        } else {
            routes.iter().any(|r| r.len() >= 3 && r[1..r.len() - 1].iter().all(|p| carried(*p)))
        };
        if found {
            log::trace!("{id} moves by convoy");
            Verification { failure: None, convoying: true }
        } else if land && !self.via_convoy && routes.is_empty() {
            Verification::default()
        } else {
            Verification::failed(FailureReason::NoConvoyRoute)
        }
    }

    pub(super) fn determine_dependencies(&self, id: OrderId, adj: &Adjudicator, deps: &mut Dependencies) {
        let src = self.unit.province();
        let dest = self.destination.province;
        for (other, order) in adj.orders() {
            if other == id {
                continue;
            }
            if order.source() == dest {
                deps.occupant = Some(other);
            }
            match order {
                Order::Move(m) if m.destination.province == dest => deps.moves_to_destination.push(other),
                Order::Support(s) if s.supported.province == src && s.destination.is_some_and(|d| d.province == dest) => {
                    deps.supports_of_move.push(other)
                }
                Order::Convoy(c) if c.convoyed.province == src && c.destination.province == dest => deps.convoys.push(other),
                _ => {}
            }
        }
        if let Some(occupant) = deps.occupant {
            let power = adj.order(occupant).power();
            deps.self_supports = deps
                .supports_of_move
                .iter()
                .copied()
                .filter(|s| adj.order(*s).power() == power)
                .collect();
        }
    }

    fn can_fall_back(&self, adj: &Adjudicator) -> bool {
        !self.routes.is_empty() && !self.via_convoy && self.land_route(adj.world())
    }

    pub(super) fn evaluate(&self, id: OrderId, adj: &Adjudicator) -> Status {
        let mut status = *adj.status(id);
        let deps = adj.deps(id);

        if status.convoying && status.path == Tristate::Uncertain {
            status.path = path::move_path(adj, id);
        }
        if status.is_resolved() {
            // Only the route was still open.
            if status.path == Tristate::Failure && status.eval == Tristate::Failure {
                status.reason = Some(FailureReason::NoConvoyRoute);
            }
            return status;
        }
        if status.convoying && status.path == Tristate::Failure {
            if self.can_fall_back(adj) {
                status.convoying = false;
                status.path = Tristate::Success;
            } else {
                status.fail(FailureReason::NoConvoyRoute);
                return status;
            }
        }
        status.head_to_head = strength::head_to_head(adj, id, status.convoying);

        let (all, foreign) = strength::move_supports(adj, id);
        (status.atk_certain, status.atk_max) = foreign;
        (status.self_support_certain, status.self_support_max) = (all.0 - foreign.0, all.1 - foreign.1);

        let attack = strength::attack(adj, id, &status);
        let vacated = strength::attack_if_vacated(adj, id, &status);
        let mut beats_all = true;
        let mut rivals_beaten = true;
        for &rival in &deps.moves_to_destination {
            let rival_status = adj.status(rival);
            if rival_status.eval == Tristate::Success {
                status.fail(FailureReason::Bounced { against: Some(rival) });
                return status;
            }
            let prevent = strength::prevent(adj, rival, rival_status);
            if attack.max <= prevent.min {
                status.fail(FailureReason::Bounced { against: Some(rival) });
                return status;
            }
            rivals_beaten &= attack.min > prevent.max;
            beats_all &= vacated.min > prevent.max;
        }
        status.beats_contenders = beats_all;

        let resist = match status.head_to_head {
            Some(opponent) => strength::defend(adj, opponent),
            None => strength::hold(adj, self.destination.province),
        };
        if attack.max <= resist.min {
            let own = deps.occupant.is_some_and(|o| adj.order(o).power() == self.unit.power);
            status.fail(if own { FailureReason::OwnUnit } else { FailureReason::Bounced { against: deps.occupant } });
            return status;
        }
        if rivals_beaten && attack.min > resist.max {
            let may_dislodge = deps
                .occupant
                .is_some_and(|o| !adj.order(o).is_move() || adj.status(o).eval != Tristate::Success);
            match (may_dislodge, self.stays_strongest(id, adj, &status)) {
                (false, _) | (true, Tristate::Success) => status.succeed(),
                (true, Tristate::Failure) => status.fail(FailureReason::Bounced { against: None }),
                (true, Tristate::Uncertain) => {}
            }
        }
        status
    }

    /// Whether this move would remain the strongest contender for its
    /// destination counting only supports from powers other than the
    /// occupant's (the beleaguered garrison question).
    pub fn stays_strongest(&self, id: OrderId, adj: &Adjudicator, status: &Status) -> Tristate {
        let (_, foreign) = strength::move_supports(adj, id);
        let base = 1 + adj.world().base_move_modifier(self.destination.province, self.unit.province());
        let own = Bounds { min: base + foreign.0 as i32, max: base + foreign.1 as i32 };
        let own = if status.path == Tristate::Uncertain { Bounds { min: 0, max: own.max } } else { own };
        let mut result = Tristate::Success;
        for &rival in &adj.deps(id).moves_to_destination {
            let prevent = strength::prevent(adj, rival, adj.status(rival));
            if own.max <= prevent.min {
                return Tristate::Failure;
            }
            if own.min <= prevent.max {
                result = Tristate::Uncertain;
            }
        }
        result
    }
}

/// Coast a fleet arrives on, checking reachability.
fn fleet_arrival(ctx: &ValidationContext, from: Location, to: Location) -> Result<Coast, OrderError> {
    let reachable = fleet_coasts_to(from.province, from.coast, to.province);
    if reachable.is_empty() || !ctx.world.is_adjacent(from.province, from.coast, to.province, to.coast, UnitType::Fleet) {
        return Err(OrderError::Unreachable { from: from.province, to: to.province });
    }
    if !to.province.has_coasts() {
        if to.coast.is_specified() {
            return Err(OrderError::InvalidCoast { province: to.province, coast: to.coast });
        }
        return Ok(Coast::None);
    }
    if to.coast.is_specified() {
        return if reachable.contains(&to.coast) {
            Ok(to.coast)
        } else {
            Err(OrderError::InvalidCoast { province: to.province, coast: to.coast })
        };
    }
    match reachable.as_slice() {
        [only] => Ok(*only),
        _ => Err(OrderError::AmbiguousCoast(to.province)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{Power, Province};
    use crate::orders::test_util::*;
    use crate::resolve::state::FailureReason;

    #[test]
    fn simple_bounce_is_symmetric() {
        let mut state = empty_state();
        place(&mut state, Power::France, UnitType::Army, Province::Par);
        place(&mut state, Power::Germany, UnitType::Army, Province::Mun);
        let report = run(
            &state,
            vec![mv(Power::France, Province::Par, Province::Bur), mv(Power::Germany, Province::Mun, Province::Bur)],
        );
        assert_eq!(report.eval_of(Province::Par), Some(Tristate::Failure));
        assert_eq!(report.eval_of(Province::Mun), Some(Tristate::Failure));
        assert_eq!(report.standoffs, vec![Province::Bur]);
    }

    #[test]
    fn supported_move_dislodges() {
        let mut state = empty_state();
        place(&mut state, Power::France, UnitType::Army, Province::Par);
        place(&mut state, Power::France, UnitType::Army, Province::Mar);
        place(&mut state, Power::Germany, UnitType::Army, Province::Bur);
        let report = run(
            &state,
            vec![
                mv(Power::France, Province::Par, Province::Bur),
                support_move(Power::France, Province::Mar, Province::Par, Province::Bur),
                hold(Power::Germany, Province::Bur),
            ],
        );
        assert_eq!(report.eval_of(Province::Par), Some(Tristate::Success));
        assert_eq!(report.dislodged.len(), 1);
        assert_eq!(report.dislodged[0].unit.province, Province::Bur);
        assert_eq!(report.dislodged[0].attacker_from, Some(Province::Par));
    }

    #[test]
    fn refuses_to_dislodge_own_unit() {
        let mut state = empty_state();
        place(&mut state, Power::France, UnitType::Army, Province::Par);
        place(&mut state, Power::France, UnitType::Army, Province::Mar);
        place(&mut state, Power::France, UnitType::Army, Province::Bur);
        let report = run(
            &state,
            vec![
                mv(Power::France, Province::Par, Province::Bur),
                support_move(Power::France, Province::Mar, Province::Par, Province::Bur),
                hold(Power::France, Province::Bur),
            ],
        );
        assert_eq!(report.eval_of(Province::Par), Some(Tristate::Failure));
        assert_eq!(report.reason_of(Province::Par), Some(FailureReason::OwnUnit));
        assert!(report.dislodged.is_empty());
    }

    #[test]
    fn unsupported_head_to_head_bounces() {
        let mut state = empty_state();
        place(&mut state, Power::France, UnitType::Army, Province::Par);
        place(&mut state, Power::Germany, UnitType::Army, Province::Bur);
        let report = run(
            &state,
            vec![mv(Power::France, Province::Par, Province::Bur), mv(Power::Germany, Province::Bur, Province::Par)],
        );
        assert_eq!(report.eval_of(Province::Par), Some(Tristate::Failure));
        assert_eq!(report.eval_of(Province::Bur), Some(Tristate::Failure));
        assert!(report.dislodged.is_empty());
    }

    #[test]
    fn supported_head_to_head_wins() {
        let mut state = empty_state();
        place(&mut state, Power::France, UnitType::Army, Province::Par);
        place(&mut state, Power::France, UnitType::Army, Province::Gas);
        place(&mut state, Power::Germany, UnitType::Army, Province::Bur);
        let report = run(
            &state,
            vec![
                mv(Power::France, Province::Par, Province::Bur),
                support_move(Power::France, Province::Gas, Province::Par, Province::Bur),
                mv(Power::Germany, Province::Bur, Province::Par),
            ],
        );
        assert_eq!(report.eval_of(Province::Par), Some(Tristate::Success));
        assert_eq!(report.eval_of(Province::Bur), Some(Tristate::Failure));
        assert_eq!(report.dislodged[0].unit.province, Province::Bur);
    }

    #[test]
    fn rejects_unreachable_and_self_moves() {
        let mut state = empty_state();
        place(&mut state, Power::Austria, UnitType::Army, Province::Vie);
        let mut order = mv(Power::Austria, Province::Vie, Province::Vie);
        assert_eq!(validate_one(&state, &mut order, &[]), Err(OrderError::MoveToSelf(Province::Vie)));
        let mut order = mv(Power::Austria, Province::Vie, Province::Ber);
        assert_eq!(
            validate_one(&state, &mut order, &[]),
            Err(OrderError::Unreachable { from: Province::Vie, to: Province::Ber })
        );
    }

    #[test]
    fn fleet_destination_coast() {
        let mut state = empty_state();
        place(&mut state, Power::France, UnitType::Fleet, Province::Mao);
        place(&mut state, Power::France, UnitType::Fleet, Province::Gol);
        let mut order = mv(Power::France, Province::Mao, Province::Spa);
        assert_eq!(validate_one(&state, &mut order, &[]), Err(OrderError::AmbiguousCoast(Province::Spa)));

        let mut order = mv(Power::France, Province::Gol, Province::Spa);
        assert_eq!(validate_one(&state, &mut order, &[]), Ok(None));
        assert_eq!(order.destination(), Some(Location::with_coast(Province::Spa, Coast::South)));
    }

    #[test]
    fn army_needs_a_theoretical_convoy_route() {
        let mut state = empty_state();
        place(&mut state, Power::England, UnitType::Army, Province::Lon);
        let mut order = mv(Power::England, Province::Lon, Province::Nwy);
        assert!(matches!(validate_one(&state, &mut order, &[]), Err(OrderError::Unreachable { .. })));

        place(&mut state, Power::England, UnitType::Fleet, Province::Nth);
        let mut order = mv(Power::England, Province::Lon, Province::Nwy);
        assert_eq!(validate_one(&state, &mut order, &[]), Ok(None));
    }

    #[test]
    fn own_convoy_implies_convoy_intent() {
        let mut state = empty_state();
        place(&mut state, Power::Germany, UnitType::Army, Province::Kie);
        place(&mut state, Power::Germany, UnitType::Fleet, Province::Hel);
        let own = [convoy(Power::Germany, Province::Hel, Province::Kie, Province::Hol)];
        let mut order = mv(Power::Germany, Province::Kie, Province::Hol);
        assert_eq!(
            validate_one(&state, &mut order, &own),
            Ok(Some(ValidationWarning::ConvoyIntentAssumed { from: Province::Kie, to: Province::Hol }))
        );
    }

    #[test]
    fn beleaguered_garrison_check() {
        let mut state = empty_state();
        place(&mut state, Power::Germany, UnitType::Army, Province::Mun);
        place(&mut state, Power::Germany, UnitType::Army, Province::Ruh);
        place(&mut state, Power::France, UnitType::Army, Province::Bur);
        place(&mut state, Power::Italy, UnitType::Army, Province::Pie);
        place(&mut state, Power::Italy, UnitType::Army, Province::Gas);
        let orders = vec![
            mv(Power::Italy, Province::Pie, Province::Mar),
            support_move(Power::Italy, Province::Gas, Province::Pie, Province::Mar),
            mv(Power::Germany, Province::Mun, Province::Bur),
            support_move(Power::Germany, Province::Ruh, Province::Mun, Province::Bur),
            hold(Power::France, Province::Bur),
        ];
        let adj = crate::resolve::Adjudicator::resolve(&state, &crate::config::AdjudicatorConfig::default(), orders)
            .expect("adjudication succeeds");
        let (id, order) = adj.orders().find(|(_, o)| o.source() == Province::Mun).expect("move present");
        let m = order.as_move().expect("a move");
        assert_eq!(m.stays_strongest(id, &adj, adj.status(id)), Tristate::Success);
        assert_eq!(adj.status(id).eval, Tristate::Success);
    }

    #[test]
    fn prevent_of_a_later_head_to_head_rival() {
        // Ber leaves for Pru, so Kie only meets Pru's prevent strength. Pru is
        // in a head-to-head with Ber and loses it.
        let mut state = empty_state();
        place(&mut state, Power::Germany, UnitType::Army, Province::Ber);
        place(&mut state, Power::Germany, UnitType::Fleet, Province::Kie);
        place(&mut state, Power::Germany, UnitType::Army, Province::Sil);
        place(&mut state, Power::Russia, UnitType::Army, Province::Pru);
        let report = run(
            &state,
            vec![
                mv(Power::Germany, Province::Kie, Province::Ber),
                mv(Power::Germany, Province::Ber, Province::Pru),
                support_move(Power::Germany, Province::Sil, Province::Ber, Province::Pru),
                mv(Power::Russia, Province::Pru, Province::Ber),
            ],
        );
        assert_eq!(report.eval_of(Province::Kie), Some(Tristate::Success));
        assert_eq!(report.eval_of(Province::Ber), Some(Tristate::Success));
        assert_eq!(report.eval_of(Province::Pru), Some(Tristate::Failure));
        assert!(report.standoffs.is_empty());
    }

    #[test]
    fn failed_convoyed_move_still_settles_its_route() {
        let mut state = empty_state();
        place(&mut state, Power::England, UnitType::Army, Province::Lon);
        place(&mut state, Power::England, UnitType::Fleet, Province::Nth);
        place(&mut state, Power::Germany, UnitType::Fleet, Province::Hel);
        place(&mut state, Power::Germany, UnitType::Fleet, Province::Ska);
        place(&mut state, Power::Germany, UnitType::Army, Province::Bel);
        let orders = vec![
            mv(Power::England, Province::Lon, Province::Hol),
            convoy(Power::England, Province::Nth, Province::Lon, Province::Hol),
            mv(Power::Germany, Province::Ska, Province::Nth),
            support_move(Power::Germany, Province::Hel, Province::Ska, Province::Nth),
            mv(Power::Germany, Province::Bel, Province::Hol),
        ];
        let adj = crate::resolve::Adjudicator::resolve(&state, &crate::config::AdjudicatorConfig::default(), orders)
            .expect("adjudication succeeds");
        let lon = adj.status(adj.order_at(Province::Lon).expect("ordered"));
        assert!(lon.is_settled());
        assert_eq!((lon.eval, lon.path), (Tristate::Failure, Tristate::Failure));
        assert_eq!(lon.reason, Some(FailureReason::NoConvoyRoute));
        let bel = adj.status(adj.order_at(Province::Bel).expect("ordered"));
        assert_eq!(bel.eval, Tristate::Success);
    }
}
