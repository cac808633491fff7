//! Provinces, coasts and powers of the standard map.
//!
//! The 75 provinces are declared once in the `provinces!` table below, which
//! expands into the `Province` enum, the `ALL_PROVINCES` list and the
//! `PROVINCE_INFO` metadata table indexed by discriminant.

use serde::{Deserialize, Serialize};

/// The number of provinces on the standard map.
pub const PROVINCE_COUNT: usize = 75;

/// The number of supply centers on the standard map.
pub const SUPPLY_CENTER_COUNT: usize = 34;

/// Supply centers needed for a solo victory.
pub const VICTORY_CENTERS: usize = 18;

/// Coast specifier for split-coast provinces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Coast {
    #[default]
    None,
    North,
    South,
    East,
}

impl Coast {
    /// Returns the 2-letter abbreviation (empty string for None).
    pub const fn abbr(self) -> &'static str {
        match self {
            Coast::None => "",
            Coast::North => "nc",
            Coast::South => "sc",
            Coast::East => "ec",
        }
    }

    /// Parses a coast from its 2-letter abbreviation.
    pub fn from_abbr(s: &str) -> Option<Coast> {
        match s {
            "" => Some(Coast::None),
            "nc" => Some(Coast::North),
            "sc" => Some(Coast::South),
            "ec" => Some(Coast::East),
            _ => Option::None,
        }
    }

    /// True for any real coast specifier.
    pub const fn is_specified(self) -> bool {
        !matches!(self, Coast::None)
    }
}

/// Classifies a province by terrain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProvinceType {
    Land,
    Sea,
    Coastal,
}

/// One of the seven great powers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Power {
    Austria,
    England,
    France,
    Germany,
    Italy,
    Russia,
    Turkey,
}

/// All seven powers in standard order.
pub const ALL_POWERS: [Power; 7] = [
    Power::Austria,
    Power::England,
    Power::France,
    Power::Germany,
    Power::Italy,
    Power::Russia,
    Power::Turkey,
];

impl Power {
    /// Returns the lowercase full name of this power.
    pub const fn name(self) -> &'static str {
        match self {
            Power::Austria => "austria",
            Power::England => "england",
            Power::France => "france",
            Power::Germany => "germany",
            Power::Italy => "italy",
            Power::Russia => "russia",
            Power::Turkey => "turkey",
        }
    }

    /// Single uppercase letter used by the position notation.
    pub const fn letter(self) -> char {
        match self {
            Power::Austria => 'A',
            Power::England => 'E',
            Power::France => 'F',
            Power::Germany => 'G',
            Power::Italy => 'I',
            Power::Russia => 'R',
            Power::Turkey => 'T',
        }
    }

    /// Parses a power from its lowercase full name.
    pub fn from_name(name: &str) -> Option<Power> {
        ALL_POWERS.iter().copied().find(|p| p.name() == name)
    }

    /// Parses a power from its position-notation letter.
    pub fn from_letter(c: char) -> Option<Power> {
        ALL_POWERS.iter().copied().find(|p| p.letter() == c)
    }
}

/// Static metadata for a province.
#[derive(Debug)]
pub struct ProvinceInfo {
    pub abbr: &'static str,
    pub name: &'static str,
    pub province_type: ProvinceType,
    pub is_supply_center: bool,
    pub home_power: Option<Power>,
    pub coasts: &'static [Coast],
}

macro_rules! provinces {
    ($($variant:ident $abbr:literal $name:literal $kind:ident $sc:literal $home:expr, [$($coast:ident),*];)*) => {
        /// A province on the standard map, in alphabetical order of abbreviation.
        ///
        /// `#[repr(u8)]` makes the discriminant usable as an array index.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(rename_all = "lowercase")]
        #[repr(u8)]
        pub enum Province {
            $($variant,)*
        }

        /// All provinces in index order.
        pub const ALL_PROVINCES: [Province; PROVINCE_COUNT] = [$(Province::$variant,)*];

        /// Metadata table indexed by `Province as usize`.
        pub static PROVINCE_INFO: [ProvinceInfo; PROVINCE_COUNT] = [
            $(ProvinceInfo {
                abbr: $abbr,
                name: $name,
                province_type: ProvinceType::$kind,
                is_supply_center: $sc,
                home_power: $home,
                coasts: &[$(Coast::$coast),*],
            },)*
        ];
    };
}

provinces! {
    Adr "adr" "Adriatic Sea" Sea false None, [];
    Aeg "aeg" "Aegean Sea" Sea false None, [];
    Alb "alb" "Albania" Coastal false None, [];
    Ank "ank" "Ankara" Coastal true Some(Power::Turkey), [];
    Apu "apu" "Apulia" Coastal false None, [];
    Arm "arm" "Armenia" Coastal false None, [];
    Bal "bal" "Baltic Sea" Sea false None, [];
    Bar "bar" "Barents Sea" Sea false None, [];
    Bel "bel" "Belgium" Coastal true None, [];
    Ber "ber" "Berlin" Coastal true Some(Power::Germany), [];
    Bla "bla" "Black Sea" Sea false None, [];
    Boh "boh" "Bohemia" Land false None, [];
    Bot "bot" "Gulf of Bothnia" Sea false None, [];
    Bre "bre" "Brest" Coastal true Some(Power::France), [];
    Bud "bud" "Budapest" Land true Some(Power::Austria), [];
    Bul "bul" "Bulgaria" Coastal true None, [East, South];
    Bur "bur" "Burgundy" Land false None, [];
    Cly "cly" "Clyde" Coastal false None, [];
    Con "con" "Constantinople" Coastal true Some(Power::Turkey), [];
    Den "den" "Denmark" Coastal true None, [];
    Eas "eas" "Eastern Mediterranean" Sea false None, [];
    Edi "edi" "Edinburgh" Coastal true Some(Power::England), [];
    Eng "eng" "English Channel" Sea false None, [];
    Fin "fin" "Finland" Coastal false None, [];
    Gal "gal" "Galicia" Land false None, [];
    Gas "gas" "Gascony" Coastal false None, [];
    Gol "gol" "Gulf of Lyon" Sea false None, [];
    Gre "gre" "Greece" Coastal true None, [];
    Hel "hel" "Heligoland Bight" Sea false None, [];
    Hol "hol" "Holland" Coastal true None, [];
    Ion "ion" "Ionian Sea" Sea false None, [];
    Iri "iri" "Irish Sea" Sea false None, [];
    Kie "kie" "Kiel" Coastal true Some(Power::Germany), [];
    Lon "lon" "London" Coastal true Some(Power::England), [];
    Lvn "lvn" "Livonia" Coastal false None, [];
    Lvp "lvp" "Liverpool" Coastal true Some(Power::England), [];
    Mao "mao" "Mid-Atlantic Ocean" Sea false None, [];
    Mar "mar" "Marseilles" Coastal true Some(Power::France), [];
    Mos "mos" "Moscow" Land true Some(Power::Russia), [];
    Mun "mun" "Munich" Land true Some(Power::Germany), [];
    Naf "naf" "North Africa" Coastal false None, [];
    Nao "nao" "North Atlantic Ocean" Sea false None, [];
    Nap "nap" "Naples" Coastal true Some(Power::Italy), [];
    Nrg "nrg" "Norwegian Sea" Sea false None, [];
    Nth "nth" "North Sea" Sea false None, [];
    Nwy "nwy" "Norway" Coastal true None, [];
    Par "par" "Paris" Land true Some(Power::France), [];
    Pic "pic" "Picardy" Coastal false None, [];
    Pie "pie" "Piedmont" Coastal false None, [];
    Por "por" "Portugal" Coastal true None, [];
    Pru "pru" "Prussia" Coastal false None, [];
    Rom "rom" "Rome" Coastal true Some(Power::Italy), [];
    Ruh "ruh" "Ruhr" Land false None, [];
    Rum "rum" "Rumania" Coastal true None, [];
    Ser "ser" "Serbia" Land true None, [];
    Sev "sev" "Sevastopol" Coastal true Some(Power::Russia), [];
    Sil "sil" "Silesia" Land false None, [];
    Ska "ska" "Skagerrak" Sea false None, [];
    Smy "smy" "Smyrna" Coastal true Some(Power::Turkey), [];
    Spa "spa" "Spain" Coastal true None, [North, South];
    Stp "stp" "St. Petersburg" Coastal true Some(Power::Russia), [North, South];
    Swe "swe" "Sweden" Coastal true None, [];
    Syr "syr" "Syria" Coastal false None, [];
    Tri "tri" "Trieste" Coastal true Some(Power::Austria), [];
    Tun "tun" "Tunisia" Coastal true None, [];
    Tus "tus" "Tuscany" Coastal false None, [];
    Tyr "tyr" "Tyrolia" Land false None, [];
    Tys "tys" "Tyrrhenian Sea" Sea false None, [];
    Ukr "ukr" "Ukraine" Land false None, [];
    Ven "ven" "Venice" Coastal true Some(Power::Italy), [];
    Vie "vie" "Vienna" Land true Some(Power::Austria), [];
    Wal "wal" "Wales" Coastal false None, [];
    War "war" "Warsaw" Land true Some(Power::Russia), [];
    Wes "wes" "Western Mediterranean" Sea false None, [];
    Yor "yor" "Yorkshire" Coastal false None, [];
}

impl Province {
    fn info(self) -> &'static ProvinceInfo {
        &PROVINCE_INFO[self as usize]
    }

    /// Returns the 3-letter abbreviation.
    pub fn abbr(self) -> &'static str {
        self.info().abbr
    }

    /// Returns the display name.
    pub fn name(self) -> &'static str {
        self.info().name
    }

    pub fn province_type(self) -> ProvinceType {
        self.info().province_type
    }

    pub fn is_supply_center(self) -> bool {
        self.info().is_supply_center
    }

    /// Returns the power whose home center this is, if any.
    pub fn home_power(self) -> Option<Power> {
        self.info().home_power
    }

    /// Coasts of a split-coast province; empty otherwise.
    pub fn coasts(self) -> &'static [Coast] {
        self.info().coasts
    }

    pub fn has_coasts(self) -> bool {
        !self.info().coasts.is_empty()
    }

    pub fn is_sea(self) -> bool {
        self.province_type() == ProvinceType::Sea
    }

    /// Looks up a province by its 3-letter abbreviation.
    pub fn from_abbr(abbr: &str) -> Option<Province> {
        ALL_PROVINCES.iter().copied().find(|p| p.abbr() == abbr)
    }

    /// Converts an array index back to a province.
    pub fn from_index(idx: usize) -> Option<Province> {
        ALL_PROVINCES.get(idx).copied()
    }
}

impl std::fmt::Display for Province {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.abbr())
    }
}

impl std::fmt::Display for Power {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn province_indices_are_sequential() {
        for (i, p) in ALL_PROVINCES.iter().enumerate() {
            assert_eq!(*p as usize, i, "Province {:?} has wrong index", p);
            assert_eq!(Province::from_index(i), Some(*p));
        }
        assert_eq!(Province::from_index(PROVINCE_COUNT), None);
    }

    #[test]
    fn supply_center_count_is_34() {
        let sc_count = ALL_PROVINCES.iter().filter(|p| p.is_supply_center()).count();
        assert_eq!(sc_count, SUPPLY_CENTER_COUNT);
    }

    #[test]
    fn abbr_lookup_matches_table() {
        for p in ALL_PROVINCES.iter() {
            assert_eq!(Province::from_abbr(p.abbr()), Some(*p));
        }
        assert_eq!(Province::from_abbr("xyz"), None);
    }

    #[test]
    fn terrain_counts() {
        let count = |t: ProvinceType| ALL_PROVINCES.iter().filter(|p| p.province_type() == t).count();
        assert_eq!(count(ProvinceType::Land), 14);
        assert_eq!(count(ProvinceType::Sea), 19);
        assert_eq!(count(ProvinceType::Coastal), 42);
    }

    #[test]
    fn split_coasts() {
        assert_eq!(Province::Bul.coasts(), &[Coast::East, Coast::South]);
        assert_eq!(Province::Spa.coasts(), &[Coast::North, Coast::South]);
        assert_eq!(Province::Stp.coasts(), &[Coast::North, Coast::South]);
        assert_eq!(ALL_PROVINCES.iter().filter(|p| p.has_coasts()).count(), 3);
    }

    #[test]
    fn home_centers_per_power() {
        let homes = |power: Power| {
            ALL_PROVINCES
                .iter()
                .filter(|p| p.is_supply_center() && p.home_power() == Some(power))
                .count()
        };
        assert_eq!(homes(Power::Russia), 4);
        for power in [Power::Austria, Power::England, Power::France, Power::Germany, Power::Italy, Power::Turkey] {
            assert_eq!(homes(power), 3, "{power}");
        }
    }

    #[test]
    fn power_names_and_letters() {
        for p in ALL_POWERS {
            assert_eq!(Power::from_name(p.name()), Some(p));
            assert_eq!(Power::from_letter(p.letter()), Some(p));
        }
        assert_eq!(Power::from_letter('N'), None);
    }

    #[test]
    fn serde_uses_abbreviations() {
        let json = serde_json::to_string(&Province::Stp).unwrap();
        assert_eq!(json, "\"stp\"");
        let power: Power = serde_json::from_str("\"turkey\"").unwrap();
        assert_eq!(power, Power::Turkey);
    }
}
