//! Hold: `A vie H`.

use serde::{Deserialize, Serialize};

use super::{support_counts, OrderError, OrderKind, OrderUnit, ValidationContext, ValidationWarning};
use crate::resolve::state::{DislodgedState, FailureReason, OrderId, Status};
use crate::resolve::Adjudicator;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hold {
    pub unit: OrderUnit,
}

impl Hold {
    pub fn new(unit: OrderUnit) -> Self {
        Hold { unit }
    }

    pub(super) fn validate(&mut self, ctx: &ValidationContext) -> Result<Option<ValidationWarning>, OrderError> {
        ctx.require_phase(OrderKind::Hold)?;
        self.unit.check_against(ctx.world.unit_at(self.unit.province()), ctx.options)
    }

    /// Succeeds unless the unit is dislodged.
    pub(super) fn evaluate(&self, id: OrderId, adj: &Adjudicator) -> Status {
        let mut status = *adj.status(id);
        let deps = adj.deps(id);
        (status.def_certain, status.def_max) = support_counts(adj, &deps.supports_of_source, |_| true);

        if deps.moves_to_source.is_empty() {
            status.succeed();
            return status;
        }
        match status.dislodged {
            DislodgedState::No => status.succeed(),
            DislodgedState::Yes => status.fail(FailureReason::Dislodged { by: status.dislodged_by }),
            DislodgedState::Maybe => {}
        }
        status
    }
}
