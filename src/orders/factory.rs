//! Order construction behind a trait, so front ends can produce orders
//! without naming the variant structs.

use super::{Build, Convoy, DefineState, Disband, Hold, Location, Move, Order, OrderUnit, Remove, Retreat, Support, Waive};
use crate::board::{Power, Province};

/// One constructor per order variant.
pub trait OrderFactory {
    fn hold(&self, unit: OrderUnit) -> Order;

    fn movement(&self, unit: OrderUnit, destination: Location, via_convoy: bool) -> Order;

    fn support_hold(&self, unit: OrderUnit, supported: Location) -> Order;

    fn support_move(&self, unit: OrderUnit, supported: Location, destination: Location) -> Order;

    fn convoy(&self, unit: OrderUnit, convoyed: Location, destination: Location) -> Order;

    fn retreat(&self, unit: OrderUnit, destination: Location) -> Order;

    fn build(&self, unit: OrderUnit) -> Order;

    fn disband(&self, unit: OrderUnit) -> Order;

    fn remove(&self, unit: OrderUnit) -> Order;

    fn waive(&self, power: Power, province: Province) -> Order;

    fn define_state(&self, unit: OrderUnit) -> Order;
}

/// Builds the standard order variants.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdOrderFactory;

impl OrderFactory for StdOrderFactory {
    fn hold(&self, unit: OrderUnit) -> Order {
        Order::Hold(Hold::new(unit))
    }

    fn movement(&self, unit: OrderUnit, destination: Location, via_convoy: bool) -> Order {
        let mv = Move::new(unit, destination);
        Order::Move(if via_convoy { mv.by_convoy() } else { mv })
    }

    fn support_hold(&self, unit: OrderUnit, supported: Location) -> Order {
        let mut support = Support::hold(unit, supported.province);
        support.supported = supported;
        Order::Support(support)
    }

    fn support_move(&self, unit: OrderUnit, supported: Location, destination: Location) -> Order {
        let mut support = Support::to_move(unit, supported.province, destination.province);
        support.supported = supported;
        support.destination = Some(destination);
        Order::Support(support)
    }

    fn convoy(&self, unit: OrderUnit, convoyed: Location, destination: Location) -> Order {
        Order::Convoy(Convoy::new(unit, convoyed.province, destination.province))
    }

    fn retreat(&self, unit: OrderUnit, destination: Location) -> Order {
        Order::Retreat(Retreat::new(unit, destination))
    }

    fn build(&self, unit: OrderUnit) -> Order {
        Order::Build(Build::new(unit))
    }

    fn disband(&self, unit: OrderUnit) -> Order {
        Order::Disband(Disband::new(unit))
    }

    fn remove(&self, unit: OrderUnit) -> Order {
        Order::Remove(Remove::new(unit))
    }

    fn waive(&self, power: Power, province: Province) -> Order {
        Order::Waive(Waive::new(power, province))
    }

    fn define_state(&self, unit: OrderUnit) -> Order {
        Order::DefineState(DefineState::new(unit))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orders::OrderKind;

    #[test]
    fn builds_every_kind() {
        let f = StdOrderFactory;
        let unit = OrderUnit::army(Power::France, Province::Par);
        let to = Location::new(Province::Bur);
        let orders = [
            f.hold(unit),
            f.movement(unit, to, true),
            f.support_hold(unit, to),
            f.support_move(unit, to, Location::new(Province::Mun)),
            f.convoy(unit, to, Location::new(Province::Mun)),
            f.retreat(unit, to),
            f.build(unit),
            f.disband(unit),
            f.remove(unit),
            f.waive(Power::France, Province::Par),
            f.define_state(unit),
        ];
        let kinds: Vec<OrderKind> = orders.iter().map(Order::kind).collect();
        assert_eq!(
            kinds,
            vec![
                OrderKind::Hold,
                OrderKind::Move,
                OrderKind::Support,
                OrderKind::Support,
                OrderKind::Convoy,
                OrderKind::Retreat,
                OrderKind::Build,
                OrderKind::Disband,
                OrderKind::Remove,
                OrderKind::Waive,
                OrderKind::DefineState,
            ]
        );
        assert!(orders[1].as_move().is_some_and(|m| m.via_convoy));
        assert_eq!(orders[3].as_support().and_then(|s| s.destination), Some(Location::new(Province::Mun)));
    }
}
