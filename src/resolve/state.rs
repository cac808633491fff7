//! Per-order resolution records.
//!
//! Every accepted order gets one `Status` and one `Dependencies` in the
//! adjudicator's arenas, both addressed by `OrderId`. `Status` is a small
//! `Copy` value so a whole evaluation can be computed off to the side and
//! compared against the stored one to detect change.

use serde::{Deserialize, Serialize};

use super::tristate::Tristate;

/// Index of an order in the adjudicator's arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(pub usize);

impl OrderId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl std::fmt::Display for OrderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Whether the unit behind an order is dislodged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DislodgedState {
    No,
    #[default]
    Maybe,
    Yes,
}

/// Why an order failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "reason")]
pub enum FailureReason {
    /// Support or convoy with no matching order to act on.
    Void,
    /// The supported or convoyed unit was ordered differently.
    Mismatch,
    NoConvoyRoute,
    /// Convoyed army caught in a convoy paradox.
    ConvoyParadox,
    /// Lost to another move or to the defender.
    Bounced { against: Option<OrderId> },
    /// Refused to dislodge a unit of its own power.
    OwnUnit,
    Cut { by: OrderId },
    /// Support given across a difficult passable border.
    DifficultBorder,
    Dislodged { by: Option<OrderId> },
    /// Adjustment order beyond the power's allowance.
    ExcessAdjustment,
    /// Adjustment order of a power with nothing to adjust, or of the wrong kind.
    NoAdjustmentDue,
}

impl std::fmt::Display for FailureReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FailureReason::Void => f.write_str("void: no matching order"),
            FailureReason::Mismatch => f.write_str("void: order does not match"),
            FailureReason::NoConvoyRoute => f.write_str("no convoy route"),
            FailureReason::ConvoyParadox => f.write_str("convoy paradox"),
            FailureReason::Bounced { against: Some(id) } => write!(f, "bounced against {id}"),
            FailureReason::Bounced { against: None } => f.write_str("bounced"),
            FailureReason::OwnUnit => f.write_str("cannot dislodge own unit"),
            FailureReason::Cut { by } => write!(f, "cut by {by}"),
            FailureReason::DifficultBorder => f.write_str("cut across difficult border"),
            FailureReason::Dislodged { by: Some(id) } => write!(f, "dislodged by {id}"),
            FailureReason::Dislodged { by: None } => f.write_str("dislodged"),
            FailureReason::ExcessAdjustment => f.write_str("exceeds adjustment allowance"),
            FailureReason::NoAdjustmentDue => f.write_str("no such adjustment due"),
        }
    }
}

/// Mutable resolution state of one order.
///
/// `eval`, `path` and `dislodged` only ever move away from their undecided
/// values. Support bounds count supporting orders: `*_certain` are those
/// already successful, `*_max` those not yet failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Status {
    pub eval: Tristate,
    pub reason: Option<FailureReason>,
    pub dislodged: DislodgedState,
    pub dislodged_by: Option<OrderId>,
    /// Supports from powers other than the destination occupant's.
    pub atk_certain: u32,
    pub atk_max: u32,
    /// Supports from the destination occupant's power.
    pub self_support_certain: u32,
    pub self_support_max: u32,
    /// Hold supports of this order's unit.
    pub def_certain: u32,
    pub def_max: u32,
    pub head_to_head: Option<OrderId>,
    pub verified: bool,
    pub convoying: bool,
    pub path: Tristate,
    /// Attack strength, assuming the destination is vacated, beats every rival.
    pub beats_contenders: bool,
}

impl Default for Status {
    fn default() -> Self {
        Status {
            eval: Tristate::Uncertain,
            reason: None,
            dislodged: DislodgedState::Maybe,
            dislodged_by: None,
            atk_certain: 0,
            atk_max: 0,
            self_support_certain: 0,
            self_support_max: 0,
            def_certain: 0,
            def_max: 0,
            head_to_head: None,
            verified: false,
            convoying: false,
            path: Tristate::Success,
            beats_contenders: false,
        }
    }
}

impl Status {
    pub fn succeed(&mut self) {
        self.eval = Tristate::Success;
        self.reason = None;
    }

    pub fn fail(&mut self, reason: FailureReason) {
        self.eval = Tristate::Failure;
        self.reason = Some(reason);
    }

    pub fn is_resolved(&self) -> bool {
        self.eval.is_resolved()
    }

    /// Resolved, and for a convoyed move its route decided as well. Rivals
    /// read the route of a failed convoyed move through its prevent strength.
    pub fn is_settled(&self) -> bool {
        self.is_resolved() && !(self.convoying && self.path == Tristate::Uncertain)
    }
}

/// Graph edges of one order, fixed once all orders are verified.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dependencies {
    /// Moves whose destination is this order's source province.
    pub moves_to_source: Vec<OrderId>,
    /// Hold supports of this order's unit.
    pub supports_of_source: Vec<OrderId>,
    /// Other moves into the same destination.
    pub moves_to_destination: Vec<OrderId>,
    /// Supports of this move.
    pub supports_of_move: Vec<OrderId>,
    /// Supports of this move from the destination occupant's power.
    pub self_supports: Vec<OrderId>,
    /// Order of the unit standing in this move's destination.
    pub occupant: Option<OrderId>,
    /// Convoy orders carrying this move.
    pub convoys: Vec<OrderId>,
    /// Other retreats into the same destination.
    pub retreat_rivals: Vec<OrderId>,
    /// Every order whose status this order's evaluation reads.
    pub reads: Vec<OrderId>,
}

impl Dependencies {
    /// Collects the direct edges into `reads`, sorted and deduplicated.
    pub fn direct_reads(&self) -> Vec<OrderId> {
        let mut reads: Vec<OrderId> = self
            .moves_to_source
            .iter()
            .chain(&self.supports_of_source)
            .chain(&self.moves_to_destination)
            .chain(&self.supports_of_move)
            .chain(&self.convoys)
            .chain(&self.retreat_rivals)
            .chain(&self.occupant)
            .copied()
            .collect();
        reads.sort_unstable();
        reads.dedup();
        reads
    }
}
