//! Orders for every phase and their resolution contract.
//!
//! `Order` is a closed enum of ten variants. The adjudicator drives each
//! accepted order through four steps, always in this order:
//!
//! 1. `validate` checks legality against the snapshot and the power's own
//!    orders, deriving a missing unit type or coast;
//! 2. `verify` cross-checks against every other order once all are known;
//! 3. `determine_dependencies` declares the order's graph edges;
//! 4. `evaluate` advances the order's status from what is known so far.

pub mod build;
pub mod convoy;
pub mod define_state;
pub mod disband;
pub mod error;
pub mod factory;
pub mod hold;
pub mod movement;
pub mod remove;
pub mod retreat;
pub mod support;
pub mod waive;

use serde::{Deserialize, Serialize};

use crate::board::{Coast, Phase, Power, Province, Unit, UnitType, World};
use crate::config::{RuleOptions, ValidationOptions};
use crate::resolve::adjudicator::{AdjudicationError, Adjudicator};
use crate::resolve::state::{Dependencies, FailureReason, OrderId, Status};
use crate::resolve::tristate::Tristate;

pub use build::Build;
pub use convoy::Convoy;
pub use define_state::DefineState;
pub use disband::Disband;
pub use error::{BuildBlock, OrderError, ValidationWarning};
pub use factory::{OrderFactory, StdOrderFactory};
pub use hold::Hold;
pub use movement::Move;
pub use remove::Remove;
pub use retreat::Retreat;
pub use support::Support;
pub use waive::Waive;

/// A location on the board: a province with an optional coast specifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Location {
    pub province: Province,
    #[serde(default)]
    pub coast: Coast,
}

impl Location {
    /// Creates a location without a coast.
    pub fn new(province: Province) -> Self {
        Self { province, coast: Coast::None }
    }

    /// Creates a location with a coast specifier.
    pub fn with_coast(province: Province, coast: Coast) -> Self {
        Self { province, coast }
    }
}

impl From<Unit> for OrderUnit {
    fn from(unit: Unit) -> Self {
        OrderUnit::new(unit.power, Some(unit.unit_type), Location::with_coast(unit.province, unit.coast))
    }
}

impl From<Province> for Location {
    fn from(province: Province) -> Self {
        Location::new(province)
    }
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.coast.is_specified() {
            write!(f, "{}/{}", self.province, self.coast.abbr())
        } else {
            write!(f, "{}", self.province)
        }
    }
}

/// The unit an order is given to: owner, type (derived if absent) and location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OrderUnit {
    pub power: Power,
    #[serde(default)]
    pub unit_type: Option<UnitType>,
    pub location: Location,
}

impl OrderUnit {
    pub fn new(power: Power, unit_type: Option<UnitType>, location: Location) -> Self {
        OrderUnit { power, unit_type, location }
    }

    pub fn army(power: Power, province: Province) -> Self {
        OrderUnit::new(power, Some(UnitType::Army), Location::new(province))
    }

    pub fn fleet(power: Power, province: Province) -> Self {
        OrderUnit::new(power, Some(UnitType::Fleet), Location::new(province))
    }

    pub fn province(&self) -> Province {
        self.location.province
    }

    /// Fills in type and coast from the live unit.
    pub fn derive_from(&mut self, unit: &Unit) {
        self.unit_type = Some(unit.unit_type);
        self.location.coast = unit.coast;
    }

    /// Checks this order's unit against the unit actually standing there,
    /// deriving or correcting type and coast.
    fn check_against(&mut self, found: Option<Unit>, options: &ValidationOptions) -> Result<Option<ValidationWarning>, OrderError> {
        let province = self.province();
        let unit = found.ok_or(OrderError::NoUnit(province))?;
        if unit.power != self.power {
            return Err(OrderError::WrongPower { province, owner: unit.power, ordered_by: self.power });
        }
        let mut warning = None;
        if let Some(declared) = self.unit_type.filter(|t| *t != unit.unit_type) {
            if options.is_strict() {
                return Err(OrderError::UnitTypeMismatch { province, declared, actual: unit.unit_type });
            }
            warning = Some(ValidationWarning::UnitTypeCorrected { province, declared, actual: unit.unit_type });
        }
        let declared_coast = self.location.coast;
        if declared_coast.is_specified() && declared_coast != unit.coast {
            if options.is_strict() {
                return Err(OrderError::InvalidCoast { province, coast: declared_coast });
            }
            warning = warning.or(Some(ValidationWarning::CoastCorrected {
                province,
                declared: declared_coast,
                actual: unit.coast,
            }));
        }
        self.derive_from(&unit);
        Ok(warning)
    }
}

/// The ten order kinds, used where behaviour keys off the kind alone
/// (border prohibitions, phase checks).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderKind {
    Hold,
    Move,
    Support,
    Convoy,
    Retreat,
    Build,
    Disband,
    Remove,
    Waive,
    DefineState,
}

impl OrderKind {
    /// The phase in which orders of this kind are adjudicated.
    pub fn phase(self) -> Option<Phase> {
        match self {
            OrderKind::Hold | OrderKind::Move | OrderKind::Support | OrderKind::Convoy => Some(Phase::Movement),
            OrderKind::Retreat | OrderKind::Disband => Some(Phase::Retreat),
            OrderKind::Build | OrderKind::Remove | OrderKind::Waive => Some(Phase::Adjustment),
            OrderKind::DefineState => None,
        }
    }
}

impl std::fmt::Display for OrderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            OrderKind::Hold => "hold",
            OrderKind::Move => "move",
            OrderKind::Support => "support",
            OrderKind::Convoy => "convoy",
            OrderKind::Retreat => "retreat",
            OrderKind::Build => "build",
            OrderKind::Disband => "disband",
            OrderKind::Remove => "remove",
            OrderKind::Waive => "waive",
            OrderKind::DefineState => "define-state",
        })
    }
}

/// Inputs available to `validate`: the snapshot, the rules, and the orders
/// its power submitted, itself included. Other powers' orders are never visible.
pub struct ValidationContext<'a> {
    pub world: &'a dyn World,
    pub rules: &'a RuleOptions,
    pub options: &'a ValidationOptions,
    pub own_orders: &'a [Order],
}

impl ValidationContext<'_> {
    fn require_phase(&self, kind: OrderKind) -> Result<(), OrderError> {
        let phase = self.world.phase();
        if kind.phase() == Some(phase) {
            Ok(())
        } else {
            Err(OrderError::WrongPhase { kind, phase })
        }
    }

    fn check_border(&self, kind: OrderKind, unit_type: Option<UnitType>, from: Province, to: Province) -> Result<(), OrderError> {
        match self.world.border(from, to) {
            Some(border) if !border.allows(unit_type, kind) => Err(OrderError::BorderProhibited { kind, from, to }),
            _ => Ok(()),
        }
    }
}

/// Structural facts established by `verify`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Verification {
    pub failure: Option<FailureReason>,
    pub convoying: bool,
}

impl Verification {
    fn failed(reason: FailureReason) -> Self {
        Verification { failure: Some(reason), ..Verification::default() }
    }
}

/// A single order of any phase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Order {
    Hold(Hold),
    Move(Move),
    Support(Support),
    Convoy(Convoy),
    Retreat(Retreat),
    Build(Build),
    Disband(Disband),
    Remove(Remove),
    Waive(Waive),
    DefineState(DefineState),
}

impl Order {
    pub fn kind(&self) -> OrderKind {
        match self {
            Order::Hold(_) => OrderKind::Hold,
            Order::Move(_) => OrderKind::Move,
            Order::Support(_) => OrderKind::Support,
            Order::Convoy(_) => OrderKind::Convoy,
            Order::Retreat(_) => OrderKind::Retreat,
            Order::Build(_) => OrderKind::Build,
            Order::Disband(_) => OrderKind::Disband,
            Order::Remove(_) => OrderKind::Remove,
            Order::Waive(_) => OrderKind::Waive,
            Order::DefineState(_) => OrderKind::DefineState,
        }
    }

    /// The unit the order is given to. For a waive, the power and the build
    /// site left unused.
    pub fn unit(&self) -> &OrderUnit {
        match self {
            Order::Hold(o) => &o.unit,
            Order::Move(o) => &o.unit,
            Order::Support(o) => &o.unit,
            Order::Convoy(o) => &o.unit,
            Order::Retreat(o) => &o.unit,
            Order::Build(o) => &o.unit,
            Order::Disband(o) => &o.unit,
            Order::Remove(o) => &o.unit,
            Order::Waive(o) => &o.unit,
            Order::DefineState(o) => &o.unit,
        }
    }

    pub fn power(&self) -> Power {
        self.unit().power
    }

    /// Province the order is issued from.
    pub fn source(&self) -> Province {
        self.unit().province()
    }

    pub fn unit_type(&self) -> Option<UnitType> {
        self.unit().unit_type
    }

    /// Province a move or retreat is aimed at.
    pub fn destination(&self) -> Option<Location> {
        match self {
            Order::Move(o) => Some(o.destination),
            Order::Retreat(o) => Some(o.destination),
            _ => None,
        }
    }

    /// Province that at most one order may claim: the unit's province, or
    /// the build site. Waives claim nothing.
    pub fn claim(&self) -> Option<Province> {
        match self {
            Order::Waive(_) => None,
            _ => Some(self.source()),
        }
    }

    pub fn as_move(&self) -> Option<&Move> {
        match self {
            Order::Move(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_support(&self) -> Option<&Support> {
        match self {
            Order::Support(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_convoy(&self) -> Option<&Convoy> {
        match self {
            Order::Convoy(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_retreat(&self) -> Option<&Retreat> {
        match self {
            Order::Retreat(r) => Some(r),
            _ => None,
        }
    }

    pub fn is_move(&self) -> bool {
        matches!(self, Order::Move(_))
    }

    pub fn validate(&mut self, ctx: &ValidationContext) -> Result<Option<ValidationWarning>, OrderError> {
        match self {
            Order::Hold(o) => o.validate(ctx),
            Order::Move(o) => o.validate(ctx),
            Order::Support(o) => o.validate(ctx),
            Order::Convoy(o) => o.validate(ctx),
            Order::Retreat(o) => o.validate(ctx),
            Order::Build(o) => o.validate(ctx),
            Order::Disband(o) => o.validate(ctx),
            Order::Remove(o) => o.validate(ctx),
            Order::Waive(o) => o.validate(ctx),
            Order::DefineState(o) => o.validate(ctx),
        }
    }

    pub fn verify(&self, id: OrderId, adj: &Adjudicator) -> Result<Verification, AdjudicationError> {
        match self {
            Order::Move(o) => Ok(o.verify(id, adj)),
            Order::Support(o) => Ok(o.verify(adj)),
            Order::Convoy(o) => o.verify(id, adj),
            _ => Ok(Verification::default()),
        }
    }

    pub fn determine_dependencies(&self, id: OrderId, adj: &Adjudicator) -> Dependencies {
        let mut deps = Dependencies {
            moves_to_source: moves_into(adj, self.source(), id),
            ..Dependencies::default()
        };
        match self {
            Order::Move(o) => o.determine_dependencies(id, adj, &mut deps),
            Order::Retreat(o) => o.determine_dependencies(id, adj, &mut deps),
            Order::Hold(_) | Order::Support(_) | Order::Convoy(_) => {
                deps.supports_of_source = hold_supports_of(adj, self.source());
            }
            _ => {}
        }
        deps
    }

    pub fn evaluate(&self, id: OrderId, adj: &Adjudicator) -> Status {
        let status = *adj.status(id);
        if status.is_settled() {
            return status;
        }
        match self {
            Order::Hold(o) => o.evaluate(id, adj),
            Order::Move(o) => o.evaluate(id, adj),
            Order::Support(o) => o.evaluate(id, adj),
            Order::Convoy(o) => o.evaluate(id, adj),
            Order::Retreat(o) => o.evaluate(id, adj),
            Order::Build(_) | Order::Disband(_) | Order::Remove(_) | Order::Waive(_) => {
                let mut status = status;
                status.succeed();
                status
            }
            Order::DefineState(_) => {
                let mut status = status;
                status.fail(FailureReason::Void);
                status
            }
        }
    }
}

impl std::fmt::Display for Order {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let unit = |f: &mut std::fmt::Formatter<'_>, u: &OrderUnit| {
            let letter = u.unit_type.map_or('?', |t| t.letter().to_ascii_uppercase());
            write!(f, "{} {} {}", u.power, letter, u.location)
        };
        match self {
            Order::Hold(o) => {
                unit(f, &o.unit)?;
                f.write_str(" H")
            }
            Order::Move(o) => {
                unit(f, &o.unit)?;
                write!(f, " - {}", o.destination)?;
                if o.via_convoy {
                    f.write_str(" via convoy")?;
                }
                Ok(())
            }
            Order::Support(o) => {
                unit(f, &o.unit)?;
                write!(f, " S {}", o.supported.province)?;
                match o.destination {
                    Some(dest) => write!(f, " - {dest}"),
                    None => f.write_str(" H"),
                }
            }
            Order::Convoy(o) => {
                unit(f, &o.unit)?;
                write!(f, " C {} - {}", o.convoyed.province, o.destination)
            }
            Order::Retreat(o) => {
                unit(f, &o.unit)?;
                write!(f, " R {}", o.destination)
            }
            Order::Build(o) => {
                f.write_str("build ")?;
                unit(f, &o.unit)
            }
            Order::Disband(o) => {
                unit(f, &o.unit)?;
                f.write_str(" D")
            }
            Order::Remove(o) => {
                f.write_str("remove ")?;
                unit(f, &o.unit)
            }
            Order::Waive(o) => write!(f, "{} waive {}", o.unit.power, o.unit.location),
            Order::DefineState(o) => {
                f.write_str("setup ")?;
                unit(f, &o.unit)
            }
        }
    }
}

/// Moves whose destination is `province`, excluding `except`.
fn moves_into(adj: &Adjudicator, province: Province, except: OrderId) -> Vec<OrderId> {
    adj.orders()
        .filter(|(id, o)| *id != except && o.as_move().is_some_and(|m| m.destination.province == province))
        .map(|(id, _)| id)
        .collect()
}

/// Supports to hold of the unit at `province`.
fn hold_supports_of(adj: &Adjudicator, province: Province) -> Vec<OrderId> {
    adj.orders()
        .filter(|(_, o)| o.as_support().is_some_and(|s| s.destination.is_none() && s.supported.province == province))
        .map(|(id, _)| id)
        .collect()
}

/// Counts the supports in `ids` that have succeeded and that have not failed,
/// restricted to those whose power passes `filter`.
pub(crate) fn support_counts(adj: &Adjudicator, ids: &[OrderId], filter: impl Fn(Power) -> bool) -> (u32, u32) {
    let mut certain = 0;
    let mut max = 0;
    for &id in ids {
        if !filter(adj.order(id).power()) {
            continue;
        }
        let eval = adj.status(id).eval;
        if eval == Tristate::Success {
            certain += 1;
        }
        if eval != Tristate::Failure {
            max += 1;
        }
    }
    (certain, max)
}

#[cfg(test)]
pub(crate) mod test_util {
    //! Shared fixtures for order and resolver unit tests.

    use super::*;
    use crate::board::{BoardState, Season};

    pub fn empty_state() -> BoardState {
        BoardState::empty(1901, Season::Spring, Phase::Movement)
    }

    pub fn place(state: &mut BoardState, power: Power, unit_type: UnitType, province: Province) {
        state.place_unit(province, power, unit_type, Coast::None);
    }

    pub fn hold(power: Power, province: Province) -> Order {
        Order::Hold(Hold { unit: OrderUnit::new(power, None, Location::new(province)) })
    }

    pub fn mv(power: Power, from: Province, to: Province) -> Order {
        Order::Move(Move::new(OrderUnit::new(power, None, Location::new(from)), Location::new(to)))
    }

    pub fn support_hold(power: Power, from: Province, supported: Province) -> Order {
        Order::Support(Support::hold(OrderUnit::new(power, None, Location::new(from)), supported))
    }

    pub fn support_move(power: Power, from: Province, supported: Province, to: Province) -> Order {
        Order::Support(Support::to_move(OrderUnit::new(power, None, Location::new(from)), supported, to))
    }

    pub fn convoy(power: Power, fleet: Province, from: Province, to: Province) -> Order {
        Order::Convoy(Convoy::new(OrderUnit::new(power, None, Location::new(fleet)), from, to))
    }

    /// Adjudicates with default options; panics on an internal error.
    pub fn run(state: &BoardState, orders: Vec<Order>) -> crate::resolve::TurnReport {
        crate::resolve::adjudicate(state, &crate::config::AdjudicatorConfig::default(), orders)
            .expect("adjudication succeeds")
    }

    pub fn validate_one(state: &BoardState, order: &mut Order, own: &[Order]) -> Result<Option<ValidationWarning>, OrderError> {
        validate_with(state, order, own, &ValidationOptions::default())
    }

    pub fn validate_with(
        state: &BoardState,
        order: &mut Order,
        own: &[Order],
        options: &ValidationOptions,
    ) -> Result<Option<ValidationWarning>, OrderError> {
        let rules = RuleOptions::default();
        let ctx = ValidationContext { world: state, rules: &rules, options, own_orders: own };
        order.validate(&ctx)
    }
}

#[cfg(test)]
mod tests {
    use super::test_util::*;
    use super::*;

    #[test]
    fn accessors() {
        let order = mv(Power::France, Province::Par, Province::Bur);
        assert_eq!(order.kind(), OrderKind::Move);
        assert_eq!(order.power(), Power::France);
        assert_eq!(order.source(), Province::Par);
        assert_eq!(order.destination(), Some(Location::new(Province::Bur)));
        assert_eq!(order.claim(), Some(Province::Par));
        let waive = Order::Waive(Waive::new(Power::France, Province::Par));
        assert_eq!(waive.claim(), None);
        assert_eq!(waive.power(), Power::France);
    }

    #[test]
    fn kind_phases() {
        assert_eq!(OrderKind::Support.phase(), Some(Phase::Movement));
        assert_eq!(OrderKind::Disband.phase(), Some(Phase::Retreat));
        assert_eq!(OrderKind::Waive.phase(), Some(Phase::Adjustment));
        assert_eq!(OrderKind::DefineState.phase(), None);
    }

    #[test]
    fn unit_check_derives_type_and_coast() {
        let mut state = empty_state();
        state.place_unit(Province::Stp, Power::Russia, UnitType::Fleet, Coast::South);
        let mut order = hold(Power::Russia, Province::Stp);
        assert_eq!(validate_one(&state, &mut order, &[]), Ok(None));
        let unit = *order.unit();
        assert_eq!(unit.unit_type, Some(UnitType::Fleet));
        assert_eq!(unit.location.coast, Coast::South);
    }

    #[test]
    fn unit_check_strict_and_lenient() {
        let mut state = empty_state();
        place(&mut state, Power::Germany, UnitType::Army, Province::Mun);
        let declared_fleet = OrderUnit::fleet(Power::Germany, Province::Mun);

        let mut unit = declared_fleet;
        let err = unit.check_against(state.unit(Province::Mun), &ValidationOptions::default());
        assert!(matches!(err, Err(OrderError::UnitTypeMismatch { .. })));

        let mut unit = declared_fleet;
        let warning = unit.check_against(state.unit(Province::Mun), &ValidationOptions::lenient());
        assert!(matches!(warning, Ok(Some(ValidationWarning::UnitTypeCorrected { .. }))));
        assert_eq!(unit.unit_type, Some(UnitType::Army));

        let mut unit = OrderUnit::army(Power::France, Province::Mun);
        assert!(matches!(
            unit.check_against(state.unit(Province::Mun), &ValidationOptions::default()),
            Err(OrderError::WrongPower { owner: Power::Germany, .. })
        ));
        let mut unit = OrderUnit::army(Power::France, Province::Par);
        assert_eq!(unit.check_against(None, &ValidationOptions::default()), Err(OrderError::NoUnit(Province::Par)));
    }

    #[test]
    fn display_reads_like_notation() {
        let mut order = support_move(Power::Austria, Province::Tyr, Province::Vie, Province::Mun);
        if let Order::Support(s) = &mut order {
            s.unit.unit_type = Some(UnitType::Army);
        }
        assert_eq!(order.to_string(), "austria A tyr S vie - mun");
    }

    #[test]
    fn serializes_with_kind_tag() {
        let order = mv(Power::Italy, Province::Ven, Province::Tri);
        let json = serde_json::to_string(&order).expect("order serializes");
        assert!(json.contains(r#""kind":"move""#));
        let back: Order = serde_json::from_str(&json).expect("order deserializes");
        assert_eq!(back, order);
    }
}
