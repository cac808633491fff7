//! Disband of a dislodged unit: `A bud D`.

use serde::{Deserialize, Serialize};

use super::{OrderError, OrderKind, OrderUnit, ValidationContext, ValidationWarning};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Disband {
    pub unit: OrderUnit,
}

impl Disband {
    pub fn new(unit: OrderUnit) -> Self {
        Disband { unit }
    }

    pub(super) fn validate(&mut self, ctx: &ValidationContext) -> Result<Option<ValidationWarning>, OrderError> {
        ctx.require_phase(OrderKind::Disband)?;
        let src = self.unit.province();
        let dislodged = ctx.world.dislodged_unit_at(src).ok_or(OrderError::NotDislodged(src))?;
        self.unit.check_against(Some(dislodged.unit), ctx.options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{BoardState, DislodgedUnit, Phase, Power, Province, Season, Unit};
    use crate::orders::test_util::validate_one;
    use crate::orders::{Location, Order};

    #[test]
    fn only_dislodged_units_disband() {
        let mut state = BoardState::empty(1902, Season::Fall, Phase::Retreat);
        state.set_dislodged(
            Province::Kie,
            DislodgedUnit { unit: Unit::army(Power::Germany, Province::Kie), attacker_from: Province::Ber, by_convoy: false },
        );
        let mut order = Order::Disband(Disband::new(OrderUnit::new(Power::Germany, None, Location::new(Province::Kie))));
        assert_eq!(validate_one(&state, &mut order, &[]), Ok(None));
        assert_eq!(order.unit_type(), Some(crate::board::UnitType::Army));

        let mut order = Order::Disband(Disband::new(OrderUnit::new(Power::Germany, None, Location::new(Province::Mun))));
        assert_eq!(validate_one(&state, &mut order, &[]), Err(OrderError::NotDislodged(Province::Mun)));
    }
}
