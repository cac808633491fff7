//! Build: `build F stp/nc`.

use serde::{Deserialize, Serialize};

use super::{BuildBlock, OrderError, OrderKind, OrderUnit, ValidationContext, ValidationWarning};
use crate::board::{Coast, Power, UnitType, World, ALL_PROVINCES};
use crate::config::BuildPolicy;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Build {
    pub unit: OrderUnit,
}

impl Build {
    pub fn new(unit: OrderUnit) -> Self {
        Build { unit }
    }

    pub(super) fn validate(&mut self, ctx: &ValidationContext) -> Result<Option<ValidationWarning>, OrderError> {
        ctx.require_phase(OrderKind::Build)?;
        let province = self.unit.province();
        let unit_type = self.unit.unit_type.ok_or(OrderError::MissingUnitType(province))?;
        let refuse = |reason| Err(OrderError::IllegalBuild { province, reason });

        if !province.is_supply_center() {
            return refuse(BuildBlock::NotSupplyCenter);
        }
        if ctx.world.supply_center_owner(province) != Some(self.unit.power) {
            return refuse(BuildBlock::NotOwned);
        }
        match ctx.rules.build_policy {
            BuildPolicy::HomeOnly if ctx.world.home_power(province) != Some(self.unit.power) => {
                return refuse(BuildBlock::NotHomeCenter);
            }
            BuildPolicy::AnyIfOneHomeOwned if !owns_home_center(ctx.world, self.unit.power) => {
                return refuse(BuildBlock::NoHomeCenterOwned);
            }
            _ => {}
        }
        if ctx.world.unit_at(province).is_some() {
            return refuse(BuildBlock::Occupied);
        }
        if !unit_type.can_occupy(province.province_type()) {
            return refuse(BuildBlock::Terrain);
        }

        let coast = self.unit.location.coast;
        match unit_type {
            UnitType::Army => self.unit.location.coast = Coast::None,
            UnitType::Fleet if province.has_coasts() => {
                if !coast.is_specified() {
                    return Err(OrderError::AmbiguousCoast(province));
                }
                if !province.coasts().contains(&coast) {
                    return Err(OrderError::InvalidCoast { province, coast });
                }
            }
            UnitType::Fleet => {
                if coast.is_specified() {
                    return Err(OrderError::InvalidCoast { province, coast });
                }
            }
        }
        Ok(None)
    }
}

fn owns_home_center(world: &dyn World, power: Power) -> bool {
    ALL_PROVINCES
        .into_iter()
        .any(|p| world.home_power(p) == Some(power) && world.supply_center_owner(p) == Some(power))
}
