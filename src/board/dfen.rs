//! DFEN position notation.
//!
//! A single-line encoding of a board position:
//!
//! `<year><season><phase>/<units>/<centers>/<dislodged>[/<standoffs>]`
//!
//! * units: `<power><type><prov>[.<coast>]`, comma separated, `-` if none
//! * centers: `<power|N><prov>`, comma separated (`N` is neutral)
//! * dislodged: `<power><type><prov>[.<coast>]<<attacker>`, with `<<` instead
//!   of `<` when the attacker arrived by convoy
//! * standoffs: province abbreviations, optional section
//!
//! Example: `1901sm/Aavie,Rfstp.sc/Avie,Nbel/-`

use super::province::{Coast, Power, Province, ALL_POWERS, ALL_PROVINCES};
use super::state::{BoardState, DislodgedUnit, Phase, Season};
use super::unit::{Unit, UnitType};

/// Errors that can occur during DFEN parsing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DfenError {
    #[error("expected 4 or 5 sections separated by '/', got {0}")]
    WrongSectionCount(usize),

    #[error("invalid year in phase info: '{0}'")]
    InvalidYear(String),

    #[error("invalid season character: '{0}'")]
    InvalidSeason(char),

    #[error("invalid phase character: '{0}'")]
    InvalidPhase(char),

    #[error("invalid power character: '{0}'")]
    InvalidPower(char),

    #[error("invalid unit type character: '{0}'")]
    InvalidUnitType(char),

    #[error("unknown province abbreviation: '{0}'")]
    UnknownProvince(String),

    #[error("invalid coast abbreviation: '{0}'")]
    InvalidCoast(String),

    #[error("duplicate unit at province '{0}'")]
    DuplicateUnit(Province),

    #[error("duplicate center entry for province '{0}'")]
    DuplicateCenter(Province),

    #[error("'{0}' is not a supply center")]
    NotACenter(Province),

    #[error("duplicate dislodged unit at province '{0}'")]
    DuplicateDislodged(Province),

    #[error("invalid unit entry: '{0}'")]
    InvalidUnitEntry(String),

    #[error("invalid center entry: '{0}'")]
    InvalidCenterEntry(String),

    #[error("invalid dislodged entry: '{0}'")]
    InvalidDislodgedEntry(String),

    #[error("phase info too short: '{0}'")]
    PhaseInfoTooShort(String),
}

fn parse_power(c: char) -> Result<Power, DfenError> {
    Power::from_letter(c).ok_or(DfenError::InvalidPower(c))
}

fn parse_province(s: &str) -> Result<Province, DfenError> {
    Province::from_abbr(s).ok_or_else(|| DfenError::UnknownProvince(s.to_string()))
}

/// Parses a location such as `vie` or `stp.sc`.
fn parse_location(s: &str) -> Result<(Province, Coast), DfenError> {
    match s.split_once('.') {
        Some((prov, coast_str)) => {
            let coast = Coast::from_abbr(coast_str)
                .filter(|c| c.is_specified())
                .ok_or_else(|| DfenError::InvalidCoast(coast_str.to_string()))?;
            Ok((parse_province(prov)?, coast))
        }
        None => Ok((parse_province(s)?, Coast::None)),
    }
}

/// Parses `<power><type><location>` into a unit.
fn parse_unit(entry: &str) -> Option<Result<Unit, DfenError>> {
    let mut chars = entry.chars();
    let power_char = chars.next()?;
    let type_char = chars.next()?;
    let rest = chars.as_str();
    if rest.len() < 3 {
        return None;
    }
    Some((|| {
        let power = parse_power(power_char)?;
        let unit_type = UnitType::from_letter(type_char).ok_or(DfenError::InvalidUnitType(type_char))?;
        let (province, coast) = parse_location(rest)?;
        Ok(Unit { unit_type, power, province, coast })
    })())
}

fn parse_phase_info(s: &str) -> Result<(u16, Season, Phase), DfenError> {
    if s.len() < 3 || !s.is_ascii() {
        return Err(DfenError::PhaseInfoTooShort(s.to_string()));
    }
    let (year_str, tail) = s.split_at(s.len() - 2);
    let mut tail = tail.chars();
    let season_char = tail.next().unwrap_or_default();
    let phase_char = tail.next().unwrap_or_default();

    let year: u16 = year_str.parse().map_err(|_| DfenError::InvalidYear(year_str.to_string()))?;
    let season = Season::from_dfen_char(season_char).ok_or(DfenError::InvalidSeason(season_char))?;
    let phase = Phase::from_dfen_char(phase_char).ok_or(DfenError::InvalidPhase(phase_char))?;
    Ok((year, season, phase))
}

/// Splits a comma-separated section, treating `-` and the empty string as empty.
fn entries(s: &str) -> impl Iterator<Item = &str> {
    let s = if s == "-" { "" } else { s };
    s.split(',').filter(|e| !e.is_empty())
}

fn parse_units(s: &str, state: &mut BoardState) -> Result<(), DfenError> {
    for entry in entries(s) {
        let unit = parse_unit(entry).ok_or_else(|| DfenError::InvalidUnitEntry(entry.to_string()))??;
        if !state.place_unit(unit.province, unit.power, unit.unit_type, unit.coast) {
            return Err(DfenError::DuplicateUnit(unit.province));
        }
    }
    Ok(())
}

fn parse_centers(s: &str, state: &mut BoardState) -> Result<(), DfenError> {
    let mut seen = [false; ALL_PROVINCES.len()];
    for entry in entries(s) {
        let mut chars = entry.chars();
        let owner_char = chars.next().ok_or_else(|| DfenError::InvalidCenterEntry(entry.to_string()))?;
        let prov_str = chars.as_str();
        if prov_str.len() != 3 {
            return Err(DfenError::InvalidCenterEntry(entry.to_string()));
        }
        let owner = match owner_char {
            'N' => None,
            c => Some(parse_power(c)?),
        };
        let province = parse_province(prov_str)?;
        if !province.is_supply_center() {
            return Err(DfenError::NotACenter(province));
        }
        if std::mem::replace(&mut seen[province as usize], true) {
            return Err(DfenError::DuplicateCenter(province));
        }
        state.set_sc_owner(province, owner);
    }
    Ok(())
}

fn parse_dislodged(s: &str, state: &mut BoardState) -> Result<(), DfenError> {
    for entry in entries(s) {
        let invalid = || DfenError::InvalidDislodgedEntry(entry.to_string());
        let (unit_part, attacker_part) = entry.split_once('<').ok_or_else(invalid)?;
        let (by_convoy, attacker_str) = match attacker_part.strip_prefix('<') {
            Some(rest) => (true, rest),
            None => (false, attacker_part),
        };
        let unit = parse_unit(unit_part).ok_or_else(invalid)??;
        let attacker_from = parse_province(attacker_str)?;
        if state.dislodged[unit.province as usize].is_some() {
            return Err(DfenError::DuplicateDislodged(unit.province));
        }
        state.set_dislodged(unit.province, DislodgedUnit { unit, attacker_from, by_convoy });
    }
    Ok(())
}

fn parse_standoffs(s: &str, state: &mut BoardState) -> Result<(), DfenError> {
    for entry in entries(s) {
        state.set_standoff(parse_province(entry)?);
    }
    Ok(())
}

/// Parses a DFEN string into a `BoardState`.
pub fn parse_dfen(s: &str) -> Result<BoardState, DfenError> {
    let sections: Vec<&str> = s.trim().split('/').collect();
    if !(4..=5).contains(&sections.len()) {
        return Err(DfenError::WrongSectionCount(sections.len()));
    }

    let (year, season, phase) = parse_phase_info(sections[0])?;
    let mut state = BoardState::empty(year, season, phase);

    parse_units(sections[1], &mut state)?;
    parse_centers(sections[2], &mut state)?;
    parse_dislodged(sections[3], &mut state)?;
    if let Some(standoffs) = sections.get(4) {
        parse_standoffs(standoffs, &mut state)?;
    }

    Ok(state)
}

fn encode_unit(unit: &Unit) -> String {
    let mut s = format!("{}{}{}", unit.power.letter(), unit.unit_type.letter(), unit.province.abbr());
    if unit.coast.is_specified() {
        s.push('.');
        s.push_str(unit.coast.abbr());
    }
    s
}

fn join_or_dash(entries: Vec<String>) -> String {
    if entries.is_empty() {
        "-".to_string()
    } else {
        entries.join(",")
    }
}

/// Encodes a `BoardState` into canonical DFEN.
///
/// Units and dislodged units are grouped by power in standard order and sorted
/// by province within each group; centers likewise, with neutral centers last.
/// The standoff section is emitted only when some province is marked.
pub fn encode_dfen(state: &BoardState) -> String {
    let mut units = Vec::new();
    let mut dislodged = Vec::new();
    let mut centers = Vec::new();
    for power in ALL_POWERS {
        units.extend(state.all_units().filter(|u| u.power == power).map(|u| encode_unit(&u)));
        dislodged.extend(state.all_dislodged().filter(|d| d.unit.power == power).map(|d| {
            let arrow = if d.by_convoy { "<<" } else { "<" };
            format!("{}{}{}", encode_unit(&d.unit), arrow, d.attacker_from.abbr())
        }));
        centers.extend(
            ALL_PROVINCES
                .iter()
                .filter(|p| p.is_supply_center() && state.sc_owner[**p as usize] == Some(power))
                .map(|p| format!("{}{}", power.letter(), p.abbr())),
        );
    }
    centers.extend(
        ALL_PROVINCES
            .iter()
            .filter(|p| p.is_supply_center() && state.sc_owner[**p as usize].is_none())
            .map(|p| format!("N{}", p.abbr())),
    );

    let mut out = format!(
        "{}{}{}/{}/{}/{}",
        state.year,
        state.season.dfen_char(),
        state.phase.dfen_char(),
        join_or_dash(units),
        join_or_dash(centers),
        join_or_dash(dislodged),
    );

    let standoffs: Vec<&str> =
        ALL_PROVINCES.iter().filter(|p| state.standoffs[**p as usize]).map(|p| p.abbr()).collect();
    if !standoffs.is_empty() {
        out.push('/');
        out.push_str(&standoffs.join(","));
    }
    out
}

/// The standard 1901 opening position.
pub const INITIAL_DFEN: &str = "1901sm/Aavie,Aabud,Aftri,Eflon,Efedi,Ealvp,Ffbre,Fapar,Famar,Gfkie,Gaber,Gamun,Ifnap,Iarom,Iaven,Rfstp.sc,Ramos,Rawar,Rfsev,Tfank,Tacon,Tasmy/Abud,Atri,Avie,Eedi,Elon,Elvp,Fbre,Fmar,Fpar,Gber,Gkie,Gmun,Inap,Irom,Iven,Rmos,Rsev,Rstp,Rwar,Tank,Tcon,Tsmy,Nbel,Nbul,Nden,Ngre,Nhol,Nnwy,Npor,Nrum,Nser,Nspa,Nswe,Ntun/-";

/// Returns the standard opening position.
pub fn initial_state() -> BoardState {
    parse_dfen(INITIAL_DFEN).unwrap_or_else(|_| BoardState::empty(1901, Season::Spring, Phase::Movement))
}
