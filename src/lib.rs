//! Arbiter: an order-resolution engine for Diplomacy.
//!
//! Exposes the board and world snapshot, the order types, rule options, and
//! the adjudicator that turns a phase's orders into a turn report.

pub mod board;
pub mod config;
pub mod orders;
pub mod resolve;

pub use config::AdjudicatorConfig;
pub use resolve::{adjudicate, TurnReport};
