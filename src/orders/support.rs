//! Support: `A tyr S A vie` (hold) and `A tyr S A vie - mun` (move).

use serde::{Deserialize, Serialize};

use super::{support_counts, Location, OrderError, OrderKind, OrderUnit, ValidationContext, ValidationWarning, Verification};
use crate::board::{Coast, Power, Province, UnitType};
use crate::resolve::path::{self, Path};
use crate::resolve::state::{DislodgedState, FailureReason, OrderId, Status};
use crate::resolve::tristate::Tristate;
use crate::resolve::Adjudicator;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Support {
    pub unit: OrderUnit,
    pub supported: Location,
    /// Destination of the supported move; `None` supports a hold.
    #[serde(default)]
    pub destination: Option<Location>,
    #[serde(default)]
    pub supported_power: Option<Power>,
    #[serde(default)]
    pub supported_type: Option<UnitType>,
}

impl Support {
    pub fn hold(unit: OrderUnit, supported: Province) -> Self {
        Support { unit, supported: Location::new(supported), destination: None, supported_power: None, supported_type: None }
    }

    pub fn to_move(unit: OrderUnit, supported: Province, destination: Province) -> Self {
        Support {
            destination: Some(Location::new(destination)),
            ..Support::hold(unit, supported)
        }
    }

    /// The province this support is given into.
    pub fn target(&self) -> Province {
        self.destination.map_or(self.supported.province, |d| d.province)
    }

    pub(super) fn validate(&mut self, ctx: &ValidationContext) -> Result<Option<ValidationWarning>, OrderError> {
        ctx.require_phase(OrderKind::Support)?;
        let mut warning = self.unit.check_against(ctx.world.unit_at(self.unit.province()), ctx.options)?;
        let unit_type = self.unit.unit_type.ok_or(OrderError::MissingUnitType(self.unit.province()))?;
        let src = self.unit.province();
        let target = self.target();
        if self.supported.province == src || target == src {
            return Err(OrderError::SupportSelf(src));
        }
        if !ctx.world.is_adjacent(src, self.unit.location.coast, target, Coast::None, unit_type) {
            return Err(OrderError::Unreachable { from: src, to: target });
        }
        ctx.check_border(OrderKind::Support, Some(unit_type), src, target)?;

        let supported = ctx.world.unit_at(self.supported.province).ok_or(OrderError::NoUnit(self.supported.province))?;
        if let Some(declared) = self.supported_power.filter(|p| *p != supported.power) {
            if ctx.options.is_strict() {
                return Err(OrderError::WrongPower { province: self.supported.province, owner: supported.power, ordered_by: declared });
            }
            warning = warning.or(Some(ValidationWarning::PowerCorrected {
                province: self.supported.province,
                declared,
                actual: supported.power,
            }));
        }
        if let Some(declared) = self.supported_type.filter(|t| *t != supported.unit_type) {
            if ctx.options.is_strict() {
                return Err(OrderError::UnitTypeMismatch { province: self.supported.province, declared, actual: supported.unit_type });
            }
            warning = warning.or(Some(ValidationWarning::SupportedTypeMismatch {
                province: self.supported.province,
                declared,
                actual: supported.unit_type,
            }));
        }
        self.supported_power = Some(supported.power);
        self.supported_type = Some(supported.unit_type);
        self.supported.coast = supported.coast;

        if let Some(dest) = self.destination.as_mut() {
            dest.coast = Coast::None;
            let from = self.supported.province;
            let reachable = ctx.world.is_adjacent(from, supported.coast, dest.province, Coast::None, supported.unit_type)
                || (supported.unit_type == UnitType::Army && Path::new(ctx.world).theoretical_route_exists(from, dest.province));
            if !reachable {
                return Err(OrderError::Unreachable { from, to: dest.province });
            }
        } else if supported.power == self.unit.power {
            let moving = ctx.own_orders.iter().any(|o| o.is_move() && o.source() == self.supported.province);
            if moving {
                warning = warning.or(Some(ValidationWarning::SupportHoldOfMovingUnit(self.supported.province)));
            }
        }
        Ok(warning)
    }

    /// Finds the supported order: a move to the same destination, or any
    /// non-move for a support to hold.
    pub(super) fn verify(&self, adj: &Adjudicator) -> Verification {
        let Some(supported) = adj.order_at(self.supported.province) else {
            return Verification::failed(FailureReason::Void);
        };
        let matches = match (adj.order(supported).as_move(), self.destination) {
            (Some(m), Some(dest)) => m.destination.province == dest.province,
            (None, None) => true,
            _ => false,
        };
        if matches {
            Verification::default()
        } else {
            Verification::failed(FailureReason::Mismatch)
        }
    }

    /// Whether move `mover` cuts this support: `Failure` means cut.
    fn survives(&self, status: &Status, mover: OrderId, adj: &Adjudicator) -> Tristate {
        let attacker = adj.order(mover);
        if attacker.power() == self.unit.power {
            return Tristate::Success;
        }
        let attacker_status = adj.status(mover);
        let Some(dest) = self.destination.map(|d| d.province) else {
            return attacker_status.path.invert();
        };
        if attacker.source() == dest {
            return match status.dislodged {
                DislodgedState::No => Tristate::Success,
                DislodgedState::Maybe => Tristate::Uncertain,
                DislodgedState::Yes => Tristate::Failure,
            };
        }
        let through_target = attacker_status.convoying
            && adj.deps(mover).convoys.iter().any(|c| adj.order(*c).source() == dest);
        if through_target && attacker_status.path != Tristate::Failure {
            return path::path_avoiding(adj, mover, dest).invert();
        }
        attacker_status.path.invert()
    }

    pub(super) fn evaluate(&self, id: OrderId, adj: &Adjudicator) -> Status {
        let mut status = *adj.status(id);
        let deps = adj.deps(id);
        (status.def_certain, status.def_max) = support_counts(adj, &deps.supports_of_source, |_| true);

        if status.dislodged == DislodgedState::Yes {
            status.fail(FailureReason::Dislodged { by: status.dislodged_by });
            return status;
        }
        if adj.world().base_move_modifier(self.target(), self.unit.province()) < 0 {
            status.fail(FailureReason::DifficultBorder);
            return status;
        }

        let mut evidence = Tristate::Success;
        for &mover in &deps.moves_to_source {
            let t = self.survives(&status, mover, adj);
            if t == Tristate::Failure {
                status.fail(FailureReason::Cut { by: mover });
                return status;
            }
            evidence = evidence.combine(t);
        }
        if evidence == Tristate::Success && status.dislodged == DislodgedState::No {
            status.succeed();
        }
        status
    }
}

#[cfg(test)]
mod tests {
    use crate::board::{Power, Province, UnitType};
    use crate::orders::test_util::*;
    use crate::config::ValidationOptions;
    use crate::orders::{Order, OrderError, ValidationWarning};
    use crate::resolve::state::FailureReason;
    use crate::resolve::Tristate;

    #[test]
    fn support_cut_by_attack() {
        let mut state = empty_state();
        place(&mut state, Power::Austria, UnitType::Army, Province::Tyr);
        place(&mut state, Power::Austria, UnitType::Army, Province::Boh);
        place(&mut state, Power::Germany, UnitType::Army, Province::Mun);
        place(&mut state, Power::Italy, UnitType::Army, Province::Ven);
        let report = run(
            &state,
            vec![
                mv(Power::Austria, Province::Boh, Province::Mun),
                support_move(Power::Austria, Province::Tyr, Province::Boh, Province::Mun),
                hold(Power::Germany, Province::Mun),
                mv(Power::Italy, Province::Ven, Province::Tyr),
            ],
        );
        assert_eq!(report.eval_of(Province::Tyr), Some(Tristate::Failure));
        assert!(matches!(report.reason_of(Province::Tyr), Some(FailureReason::Cut { .. })));
        assert_eq!(report.eval_of(Province::Boh), Some(Tristate::Failure));
        assert_eq!(report.eval_of(Province::Mun), Some(Tristate::Success));
    }

    #[test]
    fn own_attack_does_not_cut() {
        let mut state = empty_state();
        place(&mut state, Power::Austria, UnitType::Army, Province::Tyr);
        place(&mut state, Power::Austria, UnitType::Army, Province::Boh);
        place(&mut state, Power::Austria, UnitType::Army, Province::Ven);
        place(&mut state, Power::Germany, UnitType::Army, Province::Mun);
        let report = run(
            &state,
            vec![
                mv(Power::Austria, Province::Boh, Province::Mun),
                support_move(Power::Austria, Province::Tyr, Province::Boh, Province::Mun),
                mv(Power::Austria, Province::Ven, Province::Tyr),
                hold(Power::Germany, Province::Mun),
            ],
        );
        assert_eq!(report.eval_of(Province::Tyr), Some(Tristate::Success));
        assert_eq!(report.eval_of(Province::Boh), Some(Tristate::Success));
    }

    #[test]
    fn attack_from_target_cuts_only_by_dislodging() {
        let mut state = empty_state();
        place(&mut state, Power::Austria, UnitType::Army, Province::Tyr);
        place(&mut state, Power::Austria, UnitType::Army, Province::Boh);
        place(&mut state, Power::Germany, UnitType::Army, Province::Mun);
        let report = run(
            &state,
            vec![
                mv(Power::Austria, Province::Boh, Province::Mun),
                support_move(Power::Austria, Province::Tyr, Province::Boh, Province::Mun),
                mv(Power::Germany, Province::Mun, Province::Tyr),
            ],
        );
        assert_eq!(report.eval_of(Province::Tyr), Some(Tristate::Success));
        assert_eq!(report.eval_of(Province::Boh), Some(Tristate::Success));
        assert_eq!(report.eval_of(Province::Mun), Some(Tristate::Failure));
        assert_eq!(report.dislodged.len(), 1);
    }

    #[test]
    fn void_support_fails() {
        let mut state = empty_state();
        place(&mut state, Power::France, UnitType::Army, Province::Gas);
        place(&mut state, Power::France, UnitType::Army, Province::Par);
        let report = run(
            &state,
            vec![
                support_move(Power::France, Province::Gas, Province::Par, Province::Bur),
                hold(Power::France, Province::Par),
            ],
        );
        assert_eq!(report.eval_of(Province::Gas), Some(Tristate::Failure));
        assert_eq!(report.reason_of(Province::Gas), Some(FailureReason::Mismatch));
    }

    #[test]
    fn validation() {
        let mut state = empty_state();
        place(&mut state, Power::Austria, UnitType::Army, Province::Vie);
        place(&mut state, Power::Austria, UnitType::Army, Province::Bud);
        let mut order = support_move(Power::Austria, Province::Vie, Province::Bud, Province::Vie);
        assert_eq!(validate_one(&state, &mut order, &[]), Err(OrderError::SupportSelf(Province::Vie)));

        let mut order = support_move(Power::Austria, Province::Vie, Province::Bud, Province::Ser);
        assert!(matches!(validate_one(&state, &mut order, &[]), Err(OrderError::Unreachable { .. })));

        let own = [mv(Power::Austria, Province::Bud, Province::Gal)];
        let mut order = support_hold(Power::Austria, Province::Vie, Province::Bud);
        assert_eq!(
            validate_one(&state, &mut order, &own),
            Ok(Some(ValidationWarning::SupportHoldOfMovingUnit(Province::Bud)))
        );
    }

    #[test]
    fn convoyed_attack_cuts_only_when_a_route_avoids_the_target() {
        let channel_dislodged = |second_route: bool| {
            let mut state = empty_state();
            place(&mut state, Power::England, UnitType::Army, Province::Lon);
            place(&mut state, Power::England, UnitType::Fleet, Province::Eng);
            place(&mut state, Power::France, UnitType::Fleet, Province::Bel);
            place(&mut state, Power::France, UnitType::Fleet, Province::Bre);
            let mut orders = vec![
                mv(Power::England, Province::Lon, Province::Bel),
                convoy(Power::England, Province::Eng, Province::Lon, Province::Bel),
                mv(Power::France, Province::Bre, Province::Eng),
                support_move(Power::France, Province::Bel, Province::Bre, Province::Eng),
            ];
            if second_route {
                place(&mut state, Power::England, UnitType::Fleet, Province::Nth);
                orders.push(convoy(Power::England, Province::Nth, Province::Lon, Province::Bel));
            }
            run(&state, orders).is_dislodged(Province::Eng)
        };
        assert!(channel_dislodged(false));
        assert!(!channel_dislodged(true));
    }

    #[test]
    fn wrong_supported_power_is_corrected_only_when_lenient() {
        let mut state = empty_state();
        place(&mut state, Power::Austria, UnitType::Army, Province::Tyr);
        place(&mut state, Power::Italy, UnitType::Army, Province::Ven);
        let order = || {
            let mut order = support_hold(Power::Austria, Province::Tyr, Province::Ven);
            if let Order::Support(s) = &mut order {
                s.supported_power = Some(Power::Germany);
            }
            order
        };

        assert_eq!(
            validate_one(&state, &mut order(), &[]),
            Err(OrderError::WrongPower { province: Province::Ven, owner: Power::Italy, ordered_by: Power::Germany })
        );

        let mut lenient = order();
        assert_eq!(
            validate_with(&state, &mut lenient, &[], &ValidationOptions::lenient()),
            Ok(Some(ValidationWarning::PowerCorrected {
                province: Province::Ven,
                declared: Power::Germany,
                actual: Power::Italy,
            }))
        );
        let Order::Support(s) = lenient else { panic!("still a support") };
        assert_eq!(s.supported_power, Some(Power::Italy));
    }
}
