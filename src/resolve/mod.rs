//! Order resolution.
//!
//! Resolves one phase's orders by monotone propagation: every order starts
//! undecided and its state is tightened, sweep by sweep, from what the orders
//! it depends on have settled, until nothing changes. Cycles the propagation
//! cannot break are handled by the circular-movement and convoy-paradox rules
//! in `paradox`.

pub mod adjudicator;
pub mod adjustment;
pub mod apply;
pub mod paradox;
pub mod path;
pub mod phase;
pub mod report;
pub mod retreat_checker;
pub mod state;
pub mod strength;
pub mod tristate;

pub use adjudicator::{adjudicate, AdjudicationError, Adjudicator};
pub use apply::{apply_turn, play_phase};
pub use phase::{advance_state, next_phase, solo_winner};
pub use report::{Dislodgement, InvalidOrder, OrderOutcome, ResultEntry, TurnReport};
pub use state::{DislodgedState, FailureReason, OrderId, Status};
pub use tristate::Tristate;
