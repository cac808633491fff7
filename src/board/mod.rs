//! Board representation and world-snapshot types.
//!
//! Contains the standard map (provinces, coasts, adjacency), units, the board
//! state with its DFEN notation, border overlays, and the `World` trait the
//! adjudicator reads.

pub mod adjacency;
pub mod border;
pub mod dfen;
pub mod province;
pub mod state;
pub mod unit;
pub mod world;

pub use adjacency::{edges_from, fleet_border, fleet_coasts_to, is_adjacent, neighbours, Edge};
pub use border::{Border, BorderedBoard};
pub use dfen::{encode_dfen, initial_state, parse_dfen, DfenError, INITIAL_DFEN};
pub use province::{
    Coast, Power, Province, ProvinceInfo, ProvinceType, ALL_POWERS, ALL_PROVINCES, PROVINCE_COUNT,
    PROVINCE_INFO, SUPPLY_CENTER_COUNT, VICTORY_CENTERS,
};
pub use state::{BoardState, DislodgedUnit, Phase, Season};
pub use unit::{Unit, UnitType};
pub use world::World;
