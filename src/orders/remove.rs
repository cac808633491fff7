//! Removal of a unit in the adjustment phase: `remove A war`.

use serde::{Deserialize, Serialize};

use super::{OrderError, OrderKind, OrderUnit, ValidationContext, ValidationWarning};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Remove {
    pub unit: OrderUnit,
}

impl Remove {
    pub fn new(unit: OrderUnit) -> Self {
        Remove { unit }
    }

    pub(super) fn validate(&mut self, ctx: &ValidationContext) -> Result<Option<ValidationWarning>, OrderError> {
        ctx.require_phase(OrderKind::Remove)?;
        self.unit.check_against(ctx.world.unit_at(self.unit.province()), ctx.options)
    }
}
