//! Phase sequencing.
//!
//! Determines the next phase of the game year and advances the board state
//! into it, updating center ownership at the end of each year.

use crate::board::{BoardState, Phase, Power, Season, ALL_POWERS, ALL_PROVINCES, VICTORY_CENTERS};

/// Computes the next (season, phase) given the current state and whether dislodgements occurred.
///
/// Phase flow:
/// - Spring Movement -> Spring Retreat (if dislodged) OR Fall Movement
/// - Spring Retreat  -> Fall Movement
/// - Fall Movement   -> Fall Retreat (if dislodged) OR Fall Adjustment
/// - Fall Retreat    -> Fall Adjustment
/// - Fall Adjustment -> Spring Movement (next year)
pub fn next_phase(state: &BoardState, has_dislodgements: bool) -> (Season, Phase) {
    match state.phase {
        Phase::Movement if has_dislodgements => (state.season, Phase::Retreat),
        Phase::Movement | Phase::Retreat => after_movement(state.season),
        Phase::Adjustment => (Season::Spring, Phase::Movement),
    }
}

fn after_movement(season: Season) -> (Season, Phase) {
    match season {
        Season::Spring => (Season::Fall, Phase::Movement),
        Season::Fall => (Season::Fall, Phase::Adjustment),
    }
}

/// Returns true if any power has a unit/center mismatch requiring adjustments.
pub fn needs_adjustment(state: &BoardState) -> bool {
    ALL_POWERS.iter().any(|&p| state.center_count(p) != state.unit_count(p))
}

/// Centers are captured by the power whose unit stands on them; an empty
/// center keeps its owner.
pub fn update_sc_ownership(state: &mut BoardState) {
    for prov in ALL_PROVINCES {
        if !prov.is_supply_center() {
            continue;
        }
        if let Some(unit) = state.unit(prov) {
            state.set_sc_owner(prov, Some(unit.power));
        }
    }
}

/// Advances the board state to the next phase.
///
/// Updates ownership after Fall movement or Fall retreat, skips an
/// adjustment phase nobody needs, increments the year on entering Spring and
/// clears retreat data unless a retreat phase follows.
pub fn advance_state(state: &mut BoardState, has_dislodgements: bool) {
    if state.season == Season::Fall && matches!(state.phase, Phase::Movement | Phase::Retreat) {
        update_sc_ownership(state);
    }

    let (mut season, mut phase) = next_phase(state, has_dislodgements);
    if phase == Phase::Adjustment && !needs_adjustment(state) {
        log::debug!("no adjustments due in {}", state.year);
        (season, phase) = (Season::Spring, Phase::Movement);
    }

    if season == Season::Spring && phase == Phase::Movement && state.season == Season::Fall {
        state.year += 1;
    }
    state.season = season;
    state.phase = phase;

    if phase != Phase::Retreat {
        state.clear_retreat_data();
    }
}

/// The power holding a majority of the centers, if any.
pub fn solo_winner(state: &BoardState) -> Option<Power> {
    ALL_POWERS.into_iter().find(|&p| state.center_count(p) >= VICTORY_CENTERS)
}
