//! Applies a resolved turn to the board state.

use crate::board::{BoardState, DislodgedUnit, Phase, Unit};
use crate::config::AdjudicatorConfig;
use crate::orders::Order;

use super::adjudicator::{adjudicate, AdjudicationError};
use super::phase::advance_state;
use super::report::TurnReport;
use super::tristate::Tristate;

fn succeeded(report: &TurnReport) -> impl Iterator<Item = &Order> {
    report.outcomes.iter().filter(|o| o.eval == Tristate::Success).map(|o| &o.order)
}

/// Writes the outcome of `report` into `state` without changing the phase.
///
/// Movement: dislodged units are lifted off the board into the retreat
/// slots, then every successful move lands. Retreat: successful retreats
/// land and all other dislodged units are gone. Adjustment: builds are placed
/// and removals taken off.
pub fn apply_turn(state: &mut BoardState, report: &TurnReport) {
    match report.phase {
        Phase::Movement => apply_movement(state, report),
        Phase::Retreat => apply_retreats(state, report),
        Phase::Adjustment => apply_adjustments(state, report),
    }
}

fn apply_movement(state: &mut BoardState, report: &TurnReport) {
    state.clear_retreat_data();
    for d in &report.dislodged {
        if let Some(unit) = state.take_unit(d.province) {
            state.set_dislodged(
                d.province,
                DislodgedUnit { unit, attacker_from: d.attacker_from.unwrap_or(d.province), by_convoy: d.by_convoy },
            );
        }
    }

    // Lift every mover first so rings and swaps land cleanly.
    let mut landing: Vec<Unit> = Vec::new();
    for order in succeeded(report) {
        let Order::Move(mv) = order else { continue };
        if let Some(unit) = state.take_unit(mv.unit.province()) {
            landing.push(Unit { province: mv.destination.province, coast: mv.destination.coast, ..unit });
        }
    }
    for unit in landing {
        if !state.place_unit(unit.province, unit.power, unit.unit_type, unit.coast) {
            log::warn!("{} {} landed on an occupied province", unit.power, unit.province);
        }
    }

    for &province in &report.standoffs {
        state.set_standoff(province);
    }
}

fn apply_retreats(state: &mut BoardState, report: &TurnReport) {
    for order in succeeded(report) {
        let Order::Retreat(retreat) = order else { continue };
        let Some(d) = state.dislodged_unit(retreat.unit.province()) else { continue };
        let dest = retreat.destination;
        state.place_unit(dest.province, d.unit.power, d.unit.unit_type, dest.coast);
    }
    state.clear_retreat_data();
}

fn apply_adjustments(state: &mut BoardState, report: &TurnReport) {
    for order in succeeded(report) {
        match order {
            Order::Build(build) => {
                let Some(unit_type) = build.unit.unit_type else { continue };
                state.place_unit(build.unit.province(), build.unit.power, unit_type, build.unit.location.coast);
            }
            Order::Remove(remove) => {
                state.take_unit(remove.unit.province());
            }
            _ => {}
        }
    }
}

/// Adjudicates one phase, applies it and advances to the next phase.
pub fn play_phase(state: &mut BoardState, config: &AdjudicatorConfig, orders: Vec<Order>) -> Result<TurnReport, AdjudicationError> {
    let report = adjudicate(state, config, orders)?;
    apply_turn(state, &report);
    advance_state(state, !report.dislodged.is_empty());
    Ok(report)
}
