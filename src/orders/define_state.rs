//! Setup order placing a unit on the board. Never adjudicated.

use serde::{Deserialize, Serialize};

use super::{OrderError, OrderUnit, ValidationContext, ValidationWarning};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DefineState {
    pub unit: OrderUnit,
}

impl DefineState {
    pub fn new(unit: OrderUnit) -> Self {
        DefineState { unit }
    }

    pub(super) fn validate(&mut self, _ctx: &ValidationContext) -> Result<Option<ValidationWarning>, OrderError> {
        Err(OrderError::DefineState)
    }
}
