//! Validation errors and warnings.

use crate::board::{Coast, Phase, Power, Province, UnitType};
use crate::resolve::retreat_checker::RetreatBlock;

use super::OrderKind;

/// Why a build site was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildBlock {
    NotSupplyCenter,
    NotHomeCenter,
    NotOwned,
    /// The power owns none of its home centers.
    NoHomeCenterOwned,
    Occupied,
    /// The unit type cannot stand on this terrain.
    Terrain,
}

impl std::fmt::Display for BuildBlock {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            BuildBlock::NotSupplyCenter => "not a supply center",
            BuildBlock::NotHomeCenter => "not a home center",
            BuildBlock::NotOwned => "center not owned",
            BuildBlock::NoHomeCenterOwned => "no home center owned",
            BuildBlock::Occupied => "occupied",
            BuildBlock::Terrain => "unit cannot stand there",
        })
    }
}

/// A hard validation failure. The order is excluded from resolution.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum OrderError {
    #[error("{kind} orders are not allowed in the {phase} phase")]
    WrongPhase { kind: OrderKind, phase: Phase },

    #[error("no unit at {0}")]
    NoUnit(Province),

    #[error("no dislodged unit at {0}")]
    NotDislodged(Province),

    #[error("unit at {province} belongs to {owner}, not {ordered_by}")]
    WrongPower { province: Province, owner: Power, ordered_by: Power },

    #[error("unit at {province} is {actual}, not {declared}")]
    UnitTypeMismatch { province: Province, declared: UnitType, actual: UnitType },

    #[error("a unit type is required at {0}")]
    MissingUnitType(Province),

    #[error("coast '{}' is not valid at {province}", .coast.abbr())]
    InvalidCoast { province: Province, coast: Coast },

    #[error("a coast must be given for {0}")]
    AmbiguousCoast(Province),

    #[error("{kind} from {from} to {to} crosses a prohibited border")]
    BorderProhibited { kind: OrderKind, from: Province, to: Province },

    #[error("{from} cannot reach {to}")]
    Unreachable { from: Province, to: Province },

    #[error("unit at {0} cannot move to its own province")]
    MoveToSelf(Province),

    #[error("unit at {0} cannot support itself or into its own province")]
    SupportSelf(Province),

    #[error("convoy route from {from} to {to} is not valid")]
    InvalidRoute { from: Province, to: Province },

    #[error("move from {from} to {to} needs an explicit convoy route")]
    ExplicitRouteRequired { from: Province, to: Province },

    #[error("unit at {0} cannot convoy")]
    CannotConvoy(Province),

    #[error("unit at {0} cannot be convoyed")]
    NotConvoyable(Province),

    #[error("cannot retreat from {from} to {to}: {reason}")]
    IllegalRetreat { from: Province, to: Province, reason: RetreatBlock },

    #[error("cannot build at {province}: {reason}")]
    IllegalBuild { province: Province, reason: BuildBlock },

    #[error("unit at {0} already has an order")]
    DuplicateOrder(Province),

    #[error("setup orders cannot be adjudicated")]
    DefineState,
}

/// An ambiguous but legal order. Returned only once every hard check passed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationWarning {
    #[error("unit at {province} is {actual}, not {declared}; corrected")]
    UnitTypeCorrected { province: Province, declared: UnitType, actual: UnitType },

    #[error("coast at {province} corrected to '{}'", .actual.abbr())]
    CoastCorrected { province: Province, declared: Coast, actual: Coast },

    #[error("move from {from} to {to} will be convoyed because of a convoy order")]
    ConvoyIntentAssumed { from: Province, to: Province },

    #[error("support of {0} to hold, but that unit is ordered to move")]
    SupportHoldOfMovingUnit(Province),

    #[error("unit at {province} belongs to {actual}, not {declared}; corrected")]
    PowerCorrected { province: Province, declared: Power, actual: Power },

    #[error("supported unit at {province} is {actual}, not {declared}")]
    SupportedTypeMismatch { province: Province, declared: UnitType, actual: UnitType },
}
