//! Convoy: `F nth C A lon - nwy`.

use serde::{Deserialize, Serialize};

use super::{support_counts, Location, OrderError, OrderKind, OrderUnit, ValidationContext, ValidationWarning, Verification};
use crate::board::{Coast, Power, Province, UnitType};
use crate::resolve::adjudicator::AdjudicationError;
use crate::resolve::path::Path;
use crate::resolve::state::{DislodgedState, FailureReason, OrderId, Status};
use crate::resolve::Adjudicator;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Convoy {
    pub unit: OrderUnit,
    pub convoyed: Location,
    pub destination: Location,
    #[serde(default)]
    pub convoyed_power: Option<Power>,
    #[serde(default)]
    pub convoyed_type: Option<UnitType>,
}

impl Convoy {
    pub fn new(unit: OrderUnit, convoyed: Province, destination: Province) -> Self {
        Convoy {
            unit,
            convoyed: Location::new(convoyed),
            destination: Location::new(destination),
            convoyed_power: None,
            convoyed_type: None,
        }
    }

    pub(super) fn validate(&mut self, ctx: &ValidationContext) -> Result<Option<ValidationWarning>, OrderError> {
        ctx.require_phase(OrderKind::Convoy)?;
        let mut warning = self.unit.check_against(ctx.world.unit_at(self.unit.province()), ctx.options)?;
        let src = self.unit.province();
        let path = Path::new(ctx.world);
        if !path.can_convoy(src) {
            return Err(OrderError::CannotConvoy(src));
        }

        let from = self.convoyed.province;
        let to = self.destination.province;
        let army = ctx.world.unit_at(from).ok_or(OrderError::NoUnit(from))?;
        if army.unit_type != UnitType::Army || self.convoyed_type == Some(UnitType::Fleet) {
            return Err(OrderError::NotConvoyable(from));
        }
        if let Some(declared) = self.convoyed_power.filter(|p| *p != army.power) {
            if ctx.options.is_strict() {
                return Err(OrderError::WrongPower { province: from, owner: army.power, ordered_by: declared });
            }
            warning = warning.or(Some(ValidationWarning::PowerCorrected { province: from, declared, actual: army.power }));
        }
        self.convoyed_power = Some(army.power);
        self.convoyed_type = Some(UnitType::Army);
        self.destination.coast = Coast::None;

        if from == to || !path.on_theoretical_route(from, src, to) || !UnitType::Army.can_occupy(to.province_type()) {
            return Err(OrderError::Unreachable { from, to });
        }
        Ok(warning)
    }

    /// Requires the convoyed army's move to be verified already.
    pub(super) fn verify(&self, id: OrderId, adj: &Adjudicator) -> Result<Verification, AdjudicationError> {
        let Some(army) = adj.order_at(self.convoyed.province) else {
            return Ok(Verification::failed(FailureReason::Void));
        };
        let Some(mv) = adj.order(army).as_move() else {
            return Ok(Verification::failed(FailureReason::Void));
        };
        if mv.destination.province != self.destination.province {
            return Ok(Verification::failed(FailureReason::Mismatch));
        }
        let status = adj.status(army);
        if !status.verified {
            return Err(AdjudicationError::UnverifiedDependency { order: id, dependency: army });
        }
        if status.convoying {
            Ok(Verification::default())
        } else {
            Ok(Verification::failed(FailureReason::Mismatch))
        }
    }

    /// Follows the fleet's dislodgement.
    pub(super) fn evaluate(&self, id: OrderId, adj: &Adjudicator) -> Status {
        let mut status = *adj.status(id);
        (status.def_certain, status.def_max) = support_counts(adj, &adj.deps(id).supports_of_source, |_| true);
        match status.dislodged {
            DislodgedState::Yes => status.fail(FailureReason::Dislodged { by: status.dislodged_by }),
            DislodgedState::No => status.succeed(),
            DislodgedState::Maybe => {}
        }
        status
    }
}
