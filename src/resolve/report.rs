//! Turn reports: per-order outcomes and the result stream.

use serde::{Serialize, Serializer};

use crate::board::{Phase, Province, Unit, PROVINCE_COUNT};
use crate::orders::{Order, OrderError, ValidationWarning};

use super::adjudicator::Adjudicator;
use super::state::{DislodgedState, FailureReason, OrderId};
use super::tristate::Tristate;

fn display<T: std::fmt::Display, S: Serializer>(value: &T, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(value)
}

/// An order refused by validation and left out of resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InvalidOrder {
    pub order: Order,
    #[serde(serialize_with = "display")]
    pub error: OrderError,
}

/// Final state of one accepted order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderOutcome {
    pub id: OrderId,
    pub order: Order,
    pub eval: Tristate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<FailureReason>,
    /// Supplied by the adjudicator for a unit left without an order.
    pub defaulted: bool,
}

/// A unit forced out of its province this turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Dislodgement {
    pub province: Province,
    pub unit: Unit,
    pub by: Option<OrderId>,
    /// Province the dislodging unit came from.
    pub attacker_from: Option<Province>,
    pub by_convoy: bool,
}

/// One line of the result stream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ResultEntry {
    Success { order: OrderId },
    Failure { order: OrderId, reason: FailureReason },
    Dislodged { order: OrderId, by: Option<OrderId> },
    Bounced { order: OrderId, against: Option<OrderId> },
    Info { text: String },
    Invalid { order: String, error: String },
    Warning { order: OrderId, warning: String },
    Unresolved { order: OrderId },
}

/// Everything one adjudication pass decided.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TurnReport {
    pub phase: Phase,
    pub outcomes: Vec<OrderOutcome>,
    pub results: Vec<ResultEntry>,
    pub dislodged: Vec<Dislodgement>,
    /// Provinces two or more moves bounced out of, left vacant.
    pub standoffs: Vec<Province>,
    pub invalid: Vec<InvalidOrder>,
    #[serde(skip)]
    pub warnings: Vec<(OrderId, ValidationWarning)>,
    pub unresolved: Vec<OrderId>,
    pub sweeps: usize,
}

impl TurnReport {
    pub fn from_adjudicator(adj: &Adjudicator) -> Self {
        let phase = adj.world().phase();
        let outcomes: Vec<OrderOutcome> = adj
            .orders()
            .map(|(id, order)| {
                let status = adj.status(id);
                OrderOutcome {
                    id,
                    order: order.clone(),
                    eval: status.eval,
                    reason: status.reason,
                    defaulted: adj.is_defaulted(id),
                }
            })
            .collect();

        let mut dislodged = Vec::new();
        for (id, order) in adj.orders() {
            let status = adj.status(id);
            if status.dislodged != DislodgedState::Yes {
                continue;
            }
            let Some(unit) = adj.world().unit_at(order.source()) else {
                continue;
            };
            dislodged.push(Dislodgement {
                province: order.source(),
                unit,
                by: status.dislodged_by,
                attacker_from: status.dislodged_by.map(|by| adj.order(by).source()),
                by_convoy: status.dislodged_by.is_some_and(|by| adj.status(by).convoying),
            });
        }

        let standoffs = if phase == Phase::Movement { standoffs(adj) } else { Vec::new() };
        let unresolved = adj.unresolved();

        let mut report = TurnReport {
            phase,
            outcomes,
            results: Vec::new(),
            dislodged,
            standoffs,
            invalid: adj.invalid().to_vec(),
            warnings: adj.warnings().to_vec(),
            unresolved,
            sweeps: adj.sweeps(),
        };
        report.results = report.result_stream(adj);
        report
    }

    fn result_stream(&self, adj: &Adjudicator) -> Vec<ResultEntry> {
        let mut results = Vec::new();
        for invalid in &self.invalid {
            results.push(ResultEntry::Invalid { order: invalid.order.to_string(), error: invalid.error.to_string() });
        }
        for (order, warning) in &self.warnings {
            results.push(ResultEntry::Warning { order: *order, warning: warning.to_string() });
        }
        for outcome in &self.outcomes {
            let order = outcome.id;
            if outcome.defaulted {
                results.push(ResultEntry::Info { text: format!("{order} {} ordered by default", outcome.order) });
            }
            results.push(match (outcome.eval, outcome.reason) {
                (Tristate::Success, _) => ResultEntry::Success { order },
                (Tristate::Failure, Some(FailureReason::Bounced { against })) => ResultEntry::Bounced { order, against },
                (Tristate::Failure, Some(reason)) => ResultEntry::Failure { order, reason },
                (Tristate::Failure, None) => ResultEntry::Failure { order, reason: FailureReason::Void },
                (Tristate::Uncertain, _) => ResultEntry::Unresolved { order },
            });
            let status = adj.status(order);
            if status.dislodged == DislodgedState::Yes {
                results.push(ResultEntry::Dislodged { order, by: status.dislodged_by });
            }
        }
        for province in &self.standoffs {
            results.push(ResultEntry::Info { text: format!("standoff in {province}") });
        }
        if adj.hit_sweep_cap() {
            results.push(ResultEntry::Info { text: format!("stopped at the sweep cap after {} sweeps", adj.sweeps()) });
        }
        results
    }

    pub fn outcome(&self, id: OrderId) -> Option<&OrderOutcome> {
        self.outcomes.get(id.index())
    }

    /// The accepted order issued from `province`.
    pub fn outcome_at(&self, province: Province) -> Option<&OrderOutcome> {
        self.outcomes.iter().find(|o| o.order.claim() == Some(province))
    }

    pub fn eval_of(&self, province: Province) -> Option<Tristate> {
        self.outcome_at(province).map(|o| o.eval)
    }

    pub fn reason_of(&self, province: Province) -> Option<FailureReason> {
        self.outcome_at(province).and_then(|o| o.reason)
    }

    pub fn is_dislodged(&self, province: Province) -> bool {
        self.dislodged.iter().any(|d| d.province == province)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Provinces contested by two or more moves with a route, none successful.
fn standoffs(adj: &Adjudicator) -> Vec<Province> {
    let mut contested = [0usize; PROVINCE_COUNT];
    let mut entered = [false; PROVINCE_COUNT];
    for (id, order) in adj.orders() {
        let Some(mv) = order.as_move() else { continue };
        let status = adj.status(id);
        let dest = mv.destination.province as usize;
        if status.eval == Tristate::Success {
            entered[dest] = true;
        } else if status.path != Tristate::Failure && status.eval == Tristate::Failure {
            contested[dest] += 1;
        }
    }
    let vacated = |p: Province| match adj.world().unit_at(p) {
        None => true,
        Some(_) => adj.order_at(p).is_some_and(|id| adj.order(id).is_move() && adj.status(id).eval == Tristate::Success),
    };
    crate::board::ALL_PROVINCES
        .into_iter()
        .filter(|p| contested[*p as usize] >= 2 && !entered[*p as usize] && vacated(*p))
        .collect()
}

#[cfg(test)]
mod tests {
    use crate::board::{Power, Province, UnitType};
    use crate::orders::test_util::*;
    use crate::resolve::Tristate;

    use super::*;

    #[test]
    fn bounce_leaves_a_standoff() {
        let mut state = empty_state();
        place(&mut state, Power::Germany, UnitType::Army, Province::Ber);
        place(&mut state, Power::Russia, UnitType::Army, Province::War);
        let report = run(
            &state,
            vec![mv(Power::Germany, Province::Ber, Province::Sil), mv(Power::Russia, Province::War, Province::Sil)],
        );
        assert_eq!(report.standoffs, vec![Province::Sil]);
        assert!(report.results.iter().any(|r| matches!(r, ResultEntry::Bounced { .. })));
    }

    #[test]
    fn dislodgement_records_the_attacker() {
        let mut state = empty_state();
        place(&mut state, Power::Germany, UnitType::Army, Province::Mun);
        place(&mut state, Power::Germany, UnitType::Army, Province::Ruh);
        place(&mut state, Power::France, UnitType::Army, Province::Bur);
        let report = run(
            &state,
            vec![
                mv(Power::Germany, Province::Mun, Province::Bur),
                support_move(Power::Germany, Province::Ruh, Province::Mun, Province::Bur),
            ],
        );
        assert!(report.is_dislodged(Province::Bur));
        let d = report.dislodged[0];
        assert_eq!(d.unit.power, Power::France);
        assert_eq!(d.attacker_from, Some(Province::Mun));
        assert!(!d.by_convoy);
        assert!(report.standoffs.is_empty());
        assert!(report.results.iter().any(|r| matches!(r, ResultEntry::Dislodged { .. })));
    }

    #[test]
    fn invalid_orders_are_reported_and_serialized() {
        let mut state = empty_state();
        place(&mut state, Power::Italy, UnitType::Army, Province::Ven);
        let report = run(&state, vec![mv(Power::Italy, Province::Ven, Province::Mun)]);
        assert_eq!(report.invalid.len(), 1);
        assert_eq!(report.eval_of(Province::Ven), Some(Tristate::Success));
        assert!(report.outcomes[0].defaulted);
        let json = report.to_json().expect("report serializes");
        assert!(json.contains(r#""type": "invalid""#));
        assert!(json.contains(r#""type": "info""#));
    }
}
