//! The adjudicator: admits orders, then propagates their states to a fixed point.
//!
//! Resolution never guesses. Every order's `Status` only moves away from
//! its undecided values, and an order is re-evaluated only when something it
//! reads has changed. The loop runs in sweeps over a dirty set kept in index
//! order; a change made during a sweep is visible to the orders after it in
//! the same sweep. When the dirty set drains with orders still undecided, the
//! circular-movement rule and then the paradox rule are applied and the
//! sweeps resume.

use std::collections::{BTreeMap, BTreeSet};

use crate::board::{Phase, Power, Province, World, ALL_PROVINCES, PROVINCE_COUNT};
use crate::config::{AdjudicatorConfig, ParadoxRule, RuleOptions, ValidationOptions};
use crate::orders::{Disband, Hold, Order, OrderError, OrderUnit, Remove, ValidationContext, ValidationWarning, Verification};

use super::adjustment;
use super::paradox;
use super::report::{InvalidOrder, TurnReport};
use super::state::{Dependencies, DislodgedState, FailureReason, OrderId, Status};
use super::tristate::Tristate;

/// Internal inconsistencies that abort an adjudication pass.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AdjudicationError {
    #[error("order {order} was verified before {dependency}, which it depends on")]
    UnverifiedDependency { order: OrderId, dependency: OrderId },
}

/// Resolves one phase's orders against a world snapshot.
pub struct Adjudicator<'a> {
    world: &'a dyn World,
    rules: RuleOptions,
    orders: Vec<Order>,
    defaulted: Vec<bool>,
    statuses: Vec<Status>,
    deps: Vec<Dependencies>,
    watchers: Vec<Vec<OrderId>>,
    lookup: [Option<OrderId>; PROVINCE_COUNT],
    invalid: Vec<InvalidOrder>,
    warnings: Vec<(OrderId, ValidationWarning)>,
    sweeps: usize,
    capped: bool,
}

impl<'a> Adjudicator<'a> {
    fn new(world: &'a dyn World, rules: RuleOptions) -> Self {
        Adjudicator {
            world,
            rules,
            orders: Vec::new(),
            defaulted: Vec::new(),
            statuses: Vec::new(),
            deps: Vec::new(),
            watchers: Vec::new(),
            lookup: [None; PROVINCE_COUNT],
            invalid: Vec::new(),
            warnings: Vec::new(),
            sweeps: 0,
            capped: false,
        }
    }

    /// Runs a full pass and returns the adjudicator in its final state.
    pub fn resolve(world: &'a dyn World, config: &AdjudicatorConfig, orders: Vec<Order>) -> Result<Self, AdjudicationError> {
        let mut adj = Adjudicator::new(world, config.rules);
        adj.admit(orders, &config.validation);
        adj.add_defaults();
        adj.plan_adjustments();
        adj.verify_all()?;
        adj.link();
        adj.run();
        Ok(adj)
    }

    pub fn world(&self) -> &'a dyn World {
        self.world
    }

    pub fn rules(&self) -> &RuleOptions {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.orders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    pub fn order(&self, id: OrderId) -> &Order {
        &self.orders[id.index()]
    }

    pub fn status(&self, id: OrderId) -> &Status {
        &self.statuses[id.index()]
    }

    pub fn deps(&self, id: OrderId) -> &Dependencies {
        &self.deps[id.index()]
    }

    /// The accepted order claiming `province`: the unit standing there, the
    /// dislodged unit retreating from there, or the build there.
    pub fn order_at(&self, province: Province) -> Option<OrderId> {
        self.lookup[province as usize]
    }

    pub fn orders(&self) -> impl Iterator<Item = (OrderId, &Order)> + '_ {
        self.orders.iter().enumerate().map(|(i, o)| (OrderId(i), o))
    }

    /// True if the order was supplied for a unit left without one.
    pub fn is_defaulted(&self, id: OrderId) -> bool {
        self.defaulted[id.index()]
    }

    pub fn invalid(&self) -> &[InvalidOrder] {
        &self.invalid
    }

    pub fn warnings(&self) -> &[(OrderId, ValidationWarning)] {
        &self.warnings
    }

    /// Number of sweeps that changed at least one order.
    pub fn sweeps(&self) -> usize {
        self.sweeps
    }

    /// True if the sweep cap stopped resolution early.
    pub fn hit_sweep_cap(&self) -> bool {
        self.capped
    }

    /// Orders still undecided.
    pub fn unresolved(&self) -> Vec<OrderId> {
        self.orders().map(|(id, _)| id).filter(|id| !self.status(*id).is_resolved()).collect()
    }

    pub fn report(&self) -> TurnReport {
        TurnReport::from_adjudicator(self)
    }

    fn push(&mut self, order: Order, defaulted: bool) -> OrderId {
        let id = OrderId(self.orders.len());
        if let Some(province) = order.claim() {
            self.lookup[province as usize] = Some(id);
        }
        self.orders.push(order);
        self.defaulted.push(defaulted);
        self.statuses.push(Status::default());
        id
    }

    /// Validates each order against the snapshot and its own power's
    /// submission. Rejected orders are kept aside for the report.
    fn admit(&mut self, orders: Vec<Order>, options: &ValidationOptions) {
        let mut by_power: BTreeMap<Power, Vec<Order>> = BTreeMap::new();
        for order in &orders {
            by_power.entry(order.power()).or_default().push(order.clone());
        }
        for mut order in orders {
            let own = by_power.get(&order.power()).map_or(&[][..], Vec::as_slice);
            let ctx = ValidationContext { world: self.world, rules: &self.rules, options, own_orders: own };
            let warning = match order.validate(&ctx) {
                Ok(warning) => warning,
                Err(error) => {
                    log::debug!("rejected {order}: {error}");
                    self.invalid.push(InvalidOrder { order, error });
                    continue;
                }
            };
            if let Some(province) = order.claim().filter(|p| self.lookup[*p as usize].is_some()) {
                self.invalid.push(InvalidOrder { order, error: OrderError::DuplicateOrder(province) });
                continue;
            }
            let id = self.push(order, false);
            if let Some(warning) = warning {
                self.warnings.push((id, warning));
            }
        }
    }

    /// Holds for unordered units in movement, disbands for unordered
    /// dislodged units in retreats.
    fn add_defaults(&mut self) {
        let phase = self.world.phase();
        for province in ALL_PROVINCES {
            if self.lookup[province as usize].is_some() {
                continue;
            }
            let order = match phase {
                Phase::Movement => self.world.unit_at(province).map(|u| Order::Hold(Hold::new(OrderUnit::from(u)))),
                Phase::Retreat => self
                    .world
                    .dislodged_unit_at(province)
                    .map(|d| Order::Disband(Disband::new(OrderUnit::from(d.unit)))),
                Phase::Adjustment => None,
            };
            if let Some(order) = order {
                self.push(order, true);
            }
        }
    }

    /// Fails adjustment orders beyond each power's allowance and orders
    /// removals for powers in civil disorder.
    fn plan_adjustments(&mut self) {
        if self.world.phase() != Phase::Adjustment {
            return;
        }
        let plan = adjustment::plan_adjustments(self);
        for (id, reason) in plan.rejected {
            self.statuses[id.index()].fail(reason);
        }
        for unit in plan.civil_disorder {
            log::debug!("civil disorder removes {} {}", unit.power, unit.province);
            self.push(Order::Remove(Remove::new(OrderUnit::from(unit))), true);
        }
    }

    fn apply_verification(&mut self, id: OrderId, v: Verification) {
        let status = &mut self.statuses[id.index()];
        status.verified = true;
        status.convoying = v.convoying;
        status.path = if v.convoying { Tristate::Uncertain } else { Tristate::Success };
        if let Some(reason) = v.failure {
            if reason == FailureReason::NoConvoyRoute {
                status.path = Tristate::Failure;
            }
            if !status.is_resolved() {
                status.fail(reason);
            }
        }
    }

    /// Moves first, so convoys can see their army's convoy intent.
    fn verify_all(&mut self) -> Result<(), AdjudicationError> {
        for pass_moves in [true, false] {
            for i in 0..self.orders.len() {
                let id = OrderId(i);
                if self.orders[i].is_move() != pass_moves {
                    continue;
                }
                let v = self.orders[i].verify(id, self)?;
                self.apply_verification(id, v);
            }
        }
        Ok(())
    }

    /// Declares dependencies, then the read sets and their inverse.
    fn link(&mut self) {
        let deps: Vec<Dependencies> = self.orders().map(|(id, o)| o.determine_dependencies(id, self)).collect();
        self.deps = deps;
        for i in 0..self.orders.len() {
            let reads = self.reads_of(OrderId(i));
            self.deps[i].reads = reads;
        }

        self.watchers = vec![Vec::new(); self.orders.len()];
        for i in 0..self.orders.len() {
            self.watchers[i].push(OrderId(i));
            for k in self.deps[i].reads.clone() {
                self.watchers[k.index()].push(OrderId(i));
            }
        }

        for (i, status) in self.statuses.iter_mut().enumerate() {
            if status.dislodged == DislodgedState::Maybe && self.deps[i].moves_to_source.is_empty() {
                status.dislodged = DislodgedState::No;
            }
        }
    }

    /// Everything the evaluation of `id` may look at, one step beyond its
    /// direct edges.
    fn reads_of(&self, id: OrderId) -> Vec<OrderId> {
        let deps = self.deps(id);
        let mut reads = deps.direct_reads();
        match self.order(id) {
            Order::Move(_) => {
                for &rival in &deps.moves_to_destination {
                    let theirs = self.deps(rival);
                    reads.extend(theirs.supports_of_move.iter().chain(&theirs.convoys));
                    reads.extend(theirs.occupant);
                }
                if let Some(occupant) = deps.occupant {
                    let theirs = self.deps(occupant);
                    reads.extend(theirs.supports_of_source.iter().chain(&theirs.supports_of_move));
                }
            }
            Order::Support(_) => {
                for &mover in &deps.moves_to_source {
                    reads.extend(self.deps(mover).convoys.iter().copied());
                }
            }
            _ => {}
        }
        reads.retain(|r| *r != id);
        reads.sort_unstable();
        reads.dedup();
        reads
    }

    /// Derives the dislodgement of `id`'s unit from the moves into its province.
    fn settle_dislodged(&mut self, id: OrderId) {
        let status = self.statuses[id.index()];
        if status.dislodged != DislodgedState::Maybe {
            return;
        }
        let moving = self.orders[id.index()].is_move();
        let movers = &self.deps[id.index()].moves_to_source;
        let (dislodged, by) = if moving && status.eval == Tristate::Success {
            (DislodgedState::No, None)
        } else if let Some(&winner) = movers.iter().find(|m| self.statuses[m.index()].eval == Tristate::Success) {
            if moving && status.eval == Tristate::Uncertain {
                (DislodgedState::Maybe, None)
            } else {
                (DislodgedState::Yes, Some(winner))
            }
        } else if movers.iter().all(|m| self.statuses[m.index()].eval == Tristate::Failure) {
            (DislodgedState::No, None)
        } else {
            (DislodgedState::Maybe, None)
        };
        let status = &mut self.statuses[id.index()];
        status.dislodged = dislodged;
        status.dislodged_by = by;
    }

    /// Evaluates one order; returns true if its status changed.
    fn step(&mut self, id: OrderId) -> bool {
        let before = self.statuses[id.index()];
        self.settle_dislodged(id);
        let after = self.orders[id.index()].evaluate(id, self);
        self.statuses[id.index()] = after;
        self.settle_dislodged(id);
        let after = self.statuses[id.index()];
        if after.eval != before.eval {
            log::trace!("{id} {}: {} ({:?})", self.orders[id.index()], after.eval, after.reason);
        }
        after != before
    }

    fn sweep_cap(&self) -> usize {
        self.rules.max_sweeps.unwrap_or(16 * (self.orders.len() + 1))
    }

    /// Sweeps the dirty set until it drains or the cap is reached.
    fn sweep(&mut self, mut dirty: BTreeSet<OrderId>) {
        let cap = self.sweep_cap();
        while !dirty.is_empty() {
            if self.sweeps >= cap {
                log::warn!("stopped after {} sweeps with {} orders still dirty", self.sweeps, dirty.len());
                self.capped = true;
                return;
            }
            let batch = std::mem::take(&mut dirty);
            let mut changed = 0;
            for id in batch {
                if self.step(id) {
                    changed += 1;
                    dirty.extend(self.watchers[id.index()].iter().copied());
                }
            }
            if changed > 0 {
                self.sweeps += 1;
                log::debug!("sweep {}: {changed} orders changed, {} dirty", self.sweeps, dirty.len());
            }
        }
    }

    /// Everything watching the orders in `changed`.
    fn wake(&self, changed: &[OrderId]) -> BTreeSet<OrderId> {
        changed.iter().flat_map(|id| self.watchers[id.index()].iter().copied()).collect()
    }

    fn run(&mut self) {
        let all: BTreeSet<OrderId> = (0..self.orders.len()).map(OrderId).collect();
        self.sweep(all);
        while !self.capped {
            let ring = paradox::circular_movement(self);
            if !ring.is_empty() {
                log::debug!("circular movement: {ring:?}");
                for id in &ring {
                    self.statuses[id.index()].succeed();
                    self.settle_dislodged(*id);
                }
                let dirty = self.wake(&ring);
                self.sweep(dirty);
                continue;
            }
            if self.rules.paradox == ParadoxRule::Szykman {
                let convoyed = paradox::szykman(self);
                if !convoyed.is_empty() {
                    log::debug!("convoy paradox, convoyed moves fail: {convoyed:?}");
                    for id in &convoyed {
                        let status = &mut self.statuses[id.index()];
                        status.path = Tristate::Failure;
                        status.fail(FailureReason::ConvoyParadox);
                    }
                    let dirty = self.wake(&convoyed);
                    self.sweep(dirty);
                    continue;
                }
            }
            break;
        }
        for id in self.unresolved() {
            log::warn!("{id} {} left unresolved", self.order(id));
        }
    }
}

/// Adjudicates `orders` against `world` and returns the turn report.
pub fn adjudicate(world: &dyn World, config: &AdjudicatorConfig, orders: Vec<Order>) -> Result<TurnReport, AdjudicationError> {
    Adjudicator::resolve(world, config, orders).map(|adj| adj.report())
}
