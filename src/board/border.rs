//! Border rules layered over the standard map.
//!
//! A border sits on the edge between two provinces and may forbid some unit
//! types or order kinds from crossing it, or make it a difficult passable
//! border that lowers the strength of anything crossing it.

use serde::{Deserialize, Serialize};

use super::province::{Coast, Power, Province};
use super::state::{DislodgedUnit, Phase, Season};
use super::unit::{Unit, UnitType};
use super::world::World;
use crate::orders::OrderKind;

/// A rule attached to the edge between two provinces (both directions).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Border {
    pub a: Province,
    pub b: Province,
    #[serde(default)]
    pub description: String,
    /// Unit types that may not cross.
    #[serde(default)]
    pub prohibited_units: Vec<UnitType>,
    /// Order kinds that may not be given across this edge.
    #[serde(default)]
    pub prohibited_orders: Vec<OrderKind>,
    /// Added to the strength of moves, supports and retreats crossing the edge.
    #[serde(default)]
    pub move_modifier: i32,
}

impl Border {
    /// A difficult passable border with the given penalty.
    pub fn difficult(a: Province, b: Province, penalty: i32) -> Self {
        Border {
            a,
            b,
            description: String::new(),
            prohibited_units: Vec::new(),
            prohibited_orders: Vec::new(),
            move_modifier: -penalty.abs(),
        }
    }

    /// An impassable border for the listed order kinds.
    pub fn closed_to(a: Province, b: Province, kinds: &[OrderKind]) -> Self {
        Border {
            a,
            b,
            description: String::new(),
            prohibited_units: Vec::new(),
            prohibited_orders: kinds.to_vec(),
            move_modifier: 0,
        }
    }

    pub fn joins(&self, x: Province, y: Province) -> bool {
        (self.a == x && self.b == y) || (self.a == y && self.b == x)
    }

    /// Returns false if an order of `kind` by a unit of `unit_type` may not cross.
    pub fn allows(&self, unit_type: Option<UnitType>, kind: OrderKind) -> bool {
        let unit_ok = unit_type.map_or(true, |t| !self.prohibited_units.contains(&t));
        unit_ok && !self.prohibited_orders.contains(&kind)
    }

    pub fn is_difficult(&self) -> bool {
        self.move_modifier < 0
    }
}

/// A world with a border overlay on top of another world.
pub struct BorderedBoard<'a> {
    base: &'a dyn World,
    borders: Vec<Border>,
    convoyable_coasts: Vec<Province>,
}

impl<'a> BorderedBoard<'a> {
    pub fn new(base: &'a dyn World, borders: Vec<Border>) -> Self {
        BorderedBoard { base, borders, convoyable_coasts: Vec::new() }
    }

    /// Declares coastal provinces whose fleets may take part in convoys.
    pub fn with_convoyable_coasts(mut self, provinces: &[Province]) -> Self {
        self.convoyable_coasts.extend_from_slice(provinces);
        self
    }

    /// Loads the border list from JSON, e.g. `[{"a":"mun","b":"ber","move_modifier":-1}]`.
    pub fn from_json(base: &'a dyn World, json: &str) -> Result<Self, serde_json::Error> {
        Ok(Self::new(base, serde_json::from_str(json)?))
    }

    pub fn borders(&self) -> &[Border] {
        &self.borders
    }
}

impl World for BorderedBoard<'_> {
    fn unit_at(&self, province: Province) -> Option<Unit> {
        self.base.unit_at(province)
    }

    fn dislodged_unit_at(&self, province: Province) -> Option<DislodgedUnit> {
        self.base.dislodged_unit_at(province)
    }

    fn supply_center_owner(&self, province: Province) -> Option<Power> {
        self.base.supply_center_owner(province)
    }

    fn phase(&self) -> Phase {
        self.base.phase()
    }

    fn season(&self) -> Season {
        self.base.season()
    }

    fn is_standoff(&self, province: Province) -> bool {
        self.base.is_standoff(province)
    }

    fn home_power(&self, province: Province) -> Option<Power> {
        self.base.home_power(province)
    }

    fn is_adjacent(&self, src: Province, src_coast: Coast, dst: Province, dst_coast: Coast, unit_type: UnitType) -> bool {
        self.base.is_adjacent(src, src_coast, dst, dst_coast, unit_type)
    }

    fn border(&self, from: Province, to: Province) -> Option<&Border> {
        self.borders.iter().find(|b| b.joins(from, to))
    }

    fn is_convoyable_coast(&self, province: Province) -> bool {
        self.convoyable_coasts.contains(&province) || self.base.is_convoyable_coast(province)
    }
}
