//! Waive: a power declines one of its builds.

use serde::{Deserialize, Serialize};

use super::{Location, OrderError, OrderKind, OrderUnit, ValidationContext, ValidationWarning};
use crate::board::{Power, Province};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Waive {
    /// The power waiving and the build site left unused.
    pub unit: OrderUnit,
}

impl Waive {
    pub fn new(power: Power, province: Province) -> Self {
        Waive { unit: OrderUnit::new(power, None, Location::new(province)) }
    }

    pub(super) fn validate(&mut self, ctx: &ValidationContext) -> Result<Option<ValidationWarning>, OrderError> {
        ctx.require_phase(OrderKind::Waive)?;
        Ok(None)
    }
}
