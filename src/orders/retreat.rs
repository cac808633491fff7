//! Retreat: `A bud R rum`.

use serde::{Deserialize, Serialize};

use super::{Location, OrderError, OrderKind, OrderUnit, ValidationContext, ValidationWarning};
use crate::resolve::retreat_checker::RetreatChecker;
use crate::resolve::state::{Dependencies, FailureReason, OrderId, Status};
use crate::resolve::strength;
use crate::resolve::tristate::Tristate;
use crate::resolve::Adjudicator;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Retreat {
    pub unit: OrderUnit,
    pub destination: Location,
}

impl Retreat {
    pub fn new(unit: OrderUnit, destination: Location) -> Self {
        Retreat { unit, destination }
    }

    pub(super) fn validate(&mut self, ctx: &ValidationContext) -> Result<Option<ValidationWarning>, OrderError> {
        ctx.require_phase(OrderKind::Retreat)?;
        let src = self.unit.province();
        let dislodged = ctx.world.dislodged_unit_at(src).ok_or(OrderError::NotDislodged(src))?;
        let warning = self.unit.check_against(Some(dislodged.unit), ctx.options)?;
        let coast = RetreatChecker::new(ctx.world).check(&dislodged, self.destination).map_err(|reason| {
            OrderError::IllegalRetreat { from: src, to: self.destination.province, reason }
        })?;
        self.destination.coast = coast;
        Ok(warning)
    }

    pub(super) fn determine_dependencies(&self, id: OrderId, adj: &Adjudicator, deps: &mut Dependencies) {
        let dest = self.destination.province;
        deps.retreat_rivals = adj
            .orders()
            .filter(|(other, o)| *other != id && o.as_retreat().is_some_and(|r| r.destination.province == dest))
            .map(|(other, _)| other)
            .collect();
    }

    /// Bounces against any rival at least as strong; succeeds once every
    /// weaker rival has resolved.
    pub(super) fn evaluate(&self, id: OrderId, adj: &Adjudicator) -> Status {
        let mut status = *adj.status(id);
        let mine = strength::retreat(adj, id);
        let mut pending = false;
        for &rival in &adj.deps(id).retreat_rivals {
            if strength::retreat(adj, rival) >= mine {
                status.fail(FailureReason::Bounced { against: Some(rival) });
                return status;
            }
            pending |= adj.status(rival).eval == Tristate::Uncertain;
        }
        if !pending {
            status.succeed();
        }
        status
    }
}
