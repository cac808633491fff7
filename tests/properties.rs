//! Randomized checks over seeded order sets: every adjudication terminates
//! with all orders decided, is deterministic, and leaves a consistent board.

use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use arbiter::board::{initial_state, neighbours, BoardState, Phase, Province, ProvinceType, Unit, UnitType, ALL_PROVINCES};
use arbiter::config::AdjudicatorConfig;
use arbiter::orders::{Convoy, Hold, Location, Move, Order, OrderUnit, Retreat, Support};
use arbiter::resolve::{adjudicate, play_phase, ResultEntry, Tristate, TurnReport};

const SEEDS: u64 = 150;
const YEARS: usize = 3;

fn random_movement_order(rng: &mut SmallRng, state: &BoardState, unit: Unit) -> Order {
    let me = OrderUnit::from(unit);
    let adjacent = neighbours(unit.province, unit.coast, unit.unit_type);
    let units: Vec<Unit> = state.all_units().collect();
    match rng.gen_range(0..10) {
        0 | 1 => Order::Hold(Hold::new(me)),
        2..=5 => match adjacent.choose(rng) {
            Some(&to) => Order::Move(Move::new(me, Location::new(to))),
            None => Order::Hold(Hold::new(me)),
        },
        6..=8 => {
            let Some(&target) = adjacent.choose(rng) else {
                return Order::Hold(Hold::new(me));
            };
            match state.unit(target) {
                Some(_) if rng.gen_bool(0.5) => Order::Support(Support::hold(me, target)),
                _ => match units.choose(rng) {
                    Some(other) => Order::Support(Support::to_move(me, other.province, target)),
                    None => Order::Hold(Hold::new(me)),
                },
            }
        }
        _ => {
            let armies: Vec<&Unit> = units.iter().filter(|u| u.unit_type == UnitType::Army).collect();
            match (unit.unit_type, armies.choose(rng)) {
                (UnitType::Fleet, Some(army)) if unit.province.is_sea() => {
                    let coastal: Vec<Province> =
                        ALL_PROVINCES.into_iter().filter(|p| p.province_type() == ProvinceType::Coastal && *p != army.province).collect();
                    match coastal.choose(rng) {
                        Some(&to) => Order::Convoy(Convoy::new(me, army.province, to)),
                        None => Order::Hold(Hold::new(me)),
                    }
                }
                _ => Order::Hold(Hold::new(me)),
            }
        }
    }
}

fn random_orders(rng: &mut SmallRng, state: &BoardState) -> Vec<Order> {
    match state.phase {
        Phase::Movement => {
            let mut orders: Vec<Order> = state.all_units().map(|u| random_movement_order(rng, state, u)).collect();
            orders.shuffle(rng);
            // Leave some units to the defaults.
            orders.truncate(orders.len() - orders.len() / 5);
            orders
        }
        Phase::Retreat => state
            .all_dislodged()
            .filter_map(|d| {
                let options = neighbours(d.unit.province, d.unit.coast, d.unit.unit_type);
                let to = *options.choose(rng)?;
                Some(Order::Retreat(Retreat::new(OrderUnit::from(d.unit), Location::new(to))))
            })
            .collect(),
        Phase::Adjustment => Vec::new(),
    }
}

fn assert_decided(report: &TurnReport) {
    assert!(report.unresolved.is_empty(), "unresolved orders: {:?}", report.unresolved);
    assert!(report.outcomes.iter().all(|o| o.eval != Tristate::Uncertain));
    assert!(!report
        .results
        .iter()
        .any(|r| matches!(r, ResultEntry::Info { text } if text.contains("sweep cap"))));
}

fn assert_consistent(report: &TurnReport) {
    let mut entered = [0usize; ALL_PROVINCES.len()];
    for outcome in report.outcomes.iter().filter(|o| o.eval == Tristate::Success) {
        if let Some(dest) = outcome.order.destination() {
            entered[dest.province as usize] += 1;
        }
    }
    assert!(entered.iter().all(|n| *n <= 1), "two units entered one province");
    for d in &report.dislodged {
        let by = d.by.and_then(|id| report.outcome(id)).expect("dislodger recorded");
        assert_eq!(by.eval, Tristate::Success);
        assert_eq!(by.order.destination().map(|l| l.province), Some(d.province));
    }
    for province in &report.standoffs {
        assert_eq!(entered[*province as usize], 0);
    }
}

#[test]
fn random_games_resolve_every_order() {
    let config = AdjudicatorConfig::default();
    for seed in 0..SEEDS {
        let mut rng = SmallRng::seed_from_u64(seed);
        let mut state = initial_state();
        let mut phases = 0;
        while state.year < 1901 + YEARS as u16 {
            let orders = random_orders(&mut rng, &state);
            let before = state.clone();
            let total = state.all_units().count();
            let phase = state.phase;

            let report = play_phase(&mut state, &config, orders.clone()).expect("adjudication succeeds");
            assert_decided(&report);
            assert_consistent(&report);
            assert!(report.sweeps < 16 * (report.outcomes.len() + 1));

            let again = adjudicate(&before, &config, orders).expect("adjudication succeeds");
            assert_eq!(again, report, "seed {seed} is not deterministic");

            if phase == Phase::Movement {
                let on_board = state.all_units().count() + state.all_dislodged().count();
                assert_eq!(on_board, total, "seed {seed} lost a unit");
            }
            phases += 1;
        }
        assert!(phases >= YEARS * 2);
    }
}

#[test]
fn accepted_orders_resolve_identically() {
    let config = AdjudicatorConfig::default();
    for seed in 0..SEEDS {
        let mut rng = SmallRng::seed_from_u64(seed ^ 0x5eed);
        let state = initial_state();
        let orders = random_orders(&mut rng, &state);
        let first = adjudicate(&state, &config, orders).expect("adjudication succeeds");

        let accepted: Vec<Order> = first.outcomes.iter().map(|o| o.order.clone()).collect();
        let second = adjudicate(&state, &config, accepted).expect("adjudication succeeds");
        assert!(second.invalid.is_empty(), "seed {seed}: {:?}", second.invalid);
        let evals = |r: &TurnReport| r.outcomes.iter().map(|o| (o.order.source(), o.eval)).collect::<Vec<_>>();
        assert_eq!(evals(&first), evals(&second), "seed {seed}");
        assert_eq!(first.dislodged, second.dislodged);
    }
}
