//! Adjacency graph of the standard map.
//!
//! Each border is listed once, undirected: `ARMY_EDGES` for land moves and
//! `FLEET_EDGES` for sea moves with the coast used at each end. The lookup
//! index expands them into both directions on first use.
//!
//! Split-coast provinces (bul, spa, stp) carry coast-specific fleet edges and
//! `Coast::None` army edges.

use std::sync::LazyLock;

use super::province::{Coast, Province, PROVINCE_COUNT};
use super::unit::UnitType;

const N: Coast = Coast::None;
const NC: Coast = Coast::North;
const SC: Coast = Coast::South;
const EC: Coast = Coast::East;

use Province::*;

const ARMY_EDGES: [(Province, Province); 111] = [
    (Alb, Gre), (Alb, Ser), (Alb, Tri), (Ank, Arm), (Ank, Con), (Ank, Smy), (Apu, Nap),
    (Apu, Rom), (Apu, Ven), (Arm, Sev), (Arm, Smy), (Arm, Syr), (Bel, Bur), (Bel, Hol),
    (Bel, Pic), (Bel, Ruh), (Ber, Kie), (Ber, Mun), (Ber, Pru), (Ber, Sil), (Boh, Gal),
    (Boh, Mun), (Boh, Sil), (Boh, Tyr), (Boh, Vie), (Bre, Gas), (Bre, Par), (Bre, Pic),
    (Bud, Gal), (Bud, Rum), (Bud, Ser), (Bud, Tri), (Bud, Vie), (Bul, Con), (Bul, Gre),
    (Bul, Rum), (Bul, Ser), (Bur, Gas), (Bur, Mar), (Bur, Mun), (Bur, Par), (Bur, Pic),
    (Bur, Ruh), (Cly, Edi), (Cly, Lvp), (Con, Smy), (Den, Kie), (Den, Swe), (Edi, Lvp),
    (Edi, Yor), (Fin, Nwy), (Fin, Stp), (Fin, Swe), (Gal, Rum), (Gal, Sil), (Gal, Ukr),
    (Gal, Vie), (Gal, War), (Gas, Mar), (Gas, Par), (Gas, Spa), (Gre, Ser), (Hol, Kie), (Hol, Ruh),
    (Kie, Mun), (Kie, Ruh), (Lon, Wal), (Lon, Yor), (Lvn, Mos), (Lvn, Pru), (Lvn, Stp),
    (Lvn, War), (Lvp, Wal), (Lvp, Yor), (Mar, Pie), (Mar, Spa), (Mos, Sev), (Mos, Stp),
    (Mos, Ukr), (Mos, War), (Mun, Ruh), (Mun, Sil), (Mun, Tyr), (Naf, Tun), (Nap, Rom),
    (Nwy, Stp), (Nwy, Swe), (Par, Pic), (Pie, Tus), (Pie, Tyr), (Pie, Ven), (Por, Spa),
    (Pru, Sil), (Pru, War), (Rom, Tus), (Rom, Ven), (Rum, Ser), (Rum, Sev), (Rum, Ukr),
    (Ser, Tri), (Sev, Ukr), (Sil, War), (Smy, Syr), (Tri, Tyr), (Tri, Ven), (Tri, Vie),
    (Tus, Ven), (Tyr, Ven), (Tyr, Vie), (Ukr, War), (Wal, Yor),
];

const FLEET_EDGES: [(Province, Coast, Province, Coast); 141] = [
    (Adr, N, Alb, N), (Adr, N, Apu, N), (Adr, N, Ion, N), (Adr, N, Tri, N),
    (Adr, N, Ven, N), (Aeg, N, Bul, SC), (Aeg, N, Con, N), (Aeg, N, Eas, N),
    (Aeg, N, Gre, N), (Aeg, N, Ion, N), (Aeg, N, Smy, N), (Alb, N, Gre, N),
    (Alb, N, Ion, N), (Alb, N, Tri, N), (Ank, N, Arm, N), (Ank, N, Bla, N),
    (Ank, N, Con, N), (Apu, N, Ion, N), (Apu, N, Nap, N), (Apu, N, Ven, N),
    (Arm, N, Bla, N), (Arm, N, Sev, N), (Bal, N, Ber, N), (Bal, N, Bot, N),
    (Bal, N, Den, N), (Bal, N, Kie, N), (Bal, N, Lvn, N), (Bal, N, Pru, N),
    (Bal, N, Swe, N), (Bar, N, Nrg, N), (Bar, N, Nwy, N), (Bar, N, Stp, NC),
    (Bel, N, Eng, N), (Bel, N, Hol, N), (Bel, N, Nth, N), (Bel, N, Pic, N),
    (Ber, N, Kie, N), (Ber, N, Pru, N), (Bla, N, Bul, EC), (Bla, N, Con, N),
    (Bla, N, Rum, N), (Bla, N, Sev, N), (Bot, N, Fin, N), (Bot, N, Lvn, N),
    (Bot, N, Stp, SC), (Bot, N, Swe, N), (Bre, N, Eng, N), (Bre, N, Gas, N),
    (Bre, N, Mao, N), (Bre, N, Pic, N), (Bul, EC, Con, N), (Bul, EC, Rum, N),
    (Bul, SC, Con, N), (Bul, SC, Gre, N), (Cly, N, Edi, N), (Cly, N, Lvp, N),
    (Cly, N, Nao, N), (Cly, N, Nrg, N), (Con, N, Smy, N), (Den, N, Hel, N),
    (Den, N, Kie, N), (Den, N, Nth, N), (Den, N, Ska, N), (Den, N, Swe, N),
    (Eas, N, Ion, N), (Eas, N, Smy, N), (Eas, N, Syr, N), (Edi, N, Nrg, N),
    (Edi, N, Nth, N), (Edi, N, Yor, N), (Eng, N, Iri, N), (Eng, N, Lon, N),
    (Eng, N, Mao, N), (Eng, N, Nth, N), (Eng, N, Pic, N), (Eng, N, Wal, N),
    (Fin, N, Stp, SC), (Fin, N, Swe, N), (Gas, N, Mao, N), (Gas, N, Spa, NC),
    (Gol, N, Mar, N), (Gol, N, Pie, N), (Gol, N, Spa, SC), (Gol, N, Tus, N),
    (Gol, N, Tys, N), (Gol, N, Wes, N), (Gre, N, Ion, N), (Hel, N, Hol, N),
    (Hel, N, Kie, N), (Hel, N, Nth, N), (Hol, N, Kie, N), (Hol, N, Nth, N), (Ion, N, Nap, N),
    (Ion, N, Tun, N), (Ion, N, Tys, N), (Iri, N, Lvp, N), (Iri, N, Mao, N),
    (Iri, N, Nao, N), (Iri, N, Wal, N), (Lon, N, Nth, N), (Lon, N, Wal, N),
    (Lon, N, Yor, N), (Lvn, N, Pru, N), (Lvn, N, Stp, SC), (Lvp, N, Nao, N),
    (Lvp, N, Wal, N), (Mao, N, Naf, N), (Mao, N, Nao, N), (Mao, N, Por, N),
    (Mao, N, Spa, NC), (Mao, N, Spa, SC), (Mao, N, Wes, N), (Mar, N, Pie, N),
    (Mar, N, Spa, SC), (Naf, N, Tun, N), (Naf, N, Wes, N), (Nao, N, Nrg, N),
    (Nap, N, Rom, N), (Nap, N, Tys, N), (Nrg, N, Nth, N), (Nrg, N, Nwy, N),
    (Nth, N, Nwy, N), (Nth, N, Ska, N), (Nth, N, Yor, N), (Nwy, N, Ska, N),
    (Nwy, N, Stp, NC), (Nwy, N, Swe, N), (Pie, N, Tus, N), (Por, N, Spa, NC),
    (Por, N, Spa, SC), (Rom, N, Tus, N), (Rom, N, Tys, N), (Rum, N, Sev, N),
    (Ska, N, Swe, N), (Smy, N, Syr, N), (Spa, SC, Wes, N), (Tri, N, Ven, N),
    (Tun, N, Tys, N), (Tun, N, Wes, N), (Tus, N, Tys, N), (Tys, N, Wes, N),
];

/// One directed border as seen from its origin province.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Edge {
    pub to: Province,
    pub from_coast: Coast,
    pub to_coast: Coast,
    pub army_ok: bool,
    pub fleet_ok: bool,
}

impl Edge {
    fn passable(&self, unit_type: UnitType) -> bool {
        match unit_type {
            UnitType::Army => self.army_ok,
            UnitType::Fleet => self.fleet_ok,
        }
    }

    fn leaves(&self, coast: Coast) -> bool {
        !coast.is_specified() || !self.from_coast.is_specified() || self.from_coast == coast
    }

    fn arrives(&self, coast: Coast) -> bool {
        !coast.is_specified() || !self.to_coast.is_specified() || self.to_coast == coast
    }
}

static EDGE_INDEX: LazyLock<Vec<Vec<Edge>>> = LazyLock::new(|| {
    let mut index = vec![Vec::new(); PROVINCE_COUNT];
    for (a, b) in ARMY_EDGES {
        for (from, to) in [(a, b), (b, a)] {
            index[from as usize].push(Edge { to, from_coast: N, to_coast: N, army_ok: true, fleet_ok: false });
        }
    }
    for (a, ac, b, bc) in FLEET_EDGES {
        for (from, fc, to, tc) in [(a, ac, b, bc), (b, bc, a, ac)] {
            index[from as usize].push(Edge { to, from_coast: fc, to_coast: tc, army_ok: false, fleet_ok: true });
        }
    }
    index
});

/// Returns every directed edge leaving `prov`.
#[inline]
pub fn edges_from(prov: Province) -> &'static [Edge] {
    &EDGE_INDEX[prov as usize]
}

/// Returns true if a unit of the given type can move from `src` to `dst`.
///
/// Coasts are only checked when both the edge and the caller specify one.
pub fn is_adjacent(src: Province, src_coast: Coast, dst: Province, dst_coast: Coast, unit_type: UnitType) -> bool {
    edges_from(src)
        .iter()
        .any(|e| e.to == dst && e.passable(unit_type) && e.leaves(src_coast) && e.arrives(dst_coast))
}

/// Returns true if a fleet could pass between the two provinces on some coast.
pub fn fleet_border(a: Province, b: Province) -> bool {
    edges_from(a).iter().any(|e| e.to == b && e.fleet_ok)
}

/// Returns the coasts of `dst` reachable by a fleet leaving `src` on `src_coast`.
pub fn fleet_coasts_to(src: Province, src_coast: Coast, dst: Province) -> Vec<Coast> {
    let mut coasts = Vec::new();
    for e in edges_from(src) {
        if e.to == dst && e.fleet_ok && e.leaves(src_coast) && !coasts.contains(&e.to_coast) {
            coasts.push(e.to_coast);
        }
    }
    coasts
}

/// Returns the provinces a unit of the given type can reach from `prov`.
pub fn neighbours(prov: Province, coast: Coast, unit_type: UnitType) -> Vec<Province> {
    let mut result = Vec::new();
    for e in edges_from(prov) {
        if e.passable(unit_type) && e.leaves(coast) && !result.contains(&e.to) {
            result.push(e.to);
        }
    }
    result
}
