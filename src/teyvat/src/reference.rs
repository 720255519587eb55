//! Reference data for account-snapshot normalization
//!
//! Hardcoded lookup tables for stat codes, GOOD export keys, per-stat
//! maximum single-roll values, and gacha banner codes, plus the
//! [`ReferenceTables`] bundle the pipeline components borrow. Tables are
//! read-only for the lifetime of the process; tests build their own bundles
//! with fixture entries instead of mutating shared state.

use std::collections::HashMap;

use crate::wish::Banner;

// ============================================================================
// Fight Properties
// ============================================================================

/// One upstream fight property: the string code and numeric id the coded
/// fight-property map uses, the display label, and whether values are
/// percent-scaled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FightProp {
    pub code: &'static str,
    pub prop_id: u32,
    pub label: &'static str,
    pub percent: bool,
}

/// All fight properties the upstream snapshot shapes are known to emit
pub const FIGHT_PROPS: &[FightProp] = &[
    FightProp {
        code: "FIGHT_PROP_BASE_HP",
        prop_id: 1,
        label: "Base HP",
        percent: false,
    },
    FightProp {
        code: "FIGHT_PROP_HP",
        prop_id: 2,
        label: "HP",
        percent: false,
    },
    FightProp {
        code: "FIGHT_PROP_HP_PERCENT",
        prop_id: 3,
        label: "HP%",
        percent: true,
    },
    FightProp {
        code: "FIGHT_PROP_BASE_ATTACK",
        prop_id: 4,
        label: "Base ATK",
        percent: false,
    },
    FightProp {
        code: "FIGHT_PROP_ATTACK",
        prop_id: 5,
        label: "ATK",
        percent: false,
    },
    FightProp {
        code: "FIGHT_PROP_ATTACK_PERCENT",
        prop_id: 6,
        label: "ATK%",
        percent: true,
    },
    FightProp {
        code: "FIGHT_PROP_BASE_DEFENSE",
        prop_id: 7,
        label: "Base DEF",
        percent: false,
    },
    FightProp {
        code: "FIGHT_PROP_DEFENSE",
        prop_id: 8,
        label: "DEF",
        percent: false,
    },
    FightProp {
        code: "FIGHT_PROP_DEFENSE_PERCENT",
        prop_id: 9,
        label: "DEF%",
        percent: true,
    },
    FightProp {
        code: "FIGHT_PROP_CRITICAL",
        prop_id: 20,
        label: "CRIT Rate",
        percent: true,
    },
    FightProp {
        code: "FIGHT_PROP_CRITICAL_HURT",
        prop_id: 22,
        label: "CRIT DMG",
        percent: true,
    },
    FightProp {
        code: "FIGHT_PROP_CHARGE_EFFICIENCY",
        prop_id: 23,
        label: "Energy Recharge",
        percent: true,
    },
    FightProp {
        code: "FIGHT_PROP_HEAL_ADD",
        prop_id: 26,
        label: "Healing Bonus",
        percent: true,
    },
    FightProp {
        code: "FIGHT_PROP_ELEMENT_MASTERY",
        prop_id: 28,
        label: "Elemental Mastery",
        percent: false,
    },
    FightProp {
        code: "FIGHT_PROP_PHYSICAL_ADD_HURT",
        prop_id: 30,
        label: "Physical DMG Bonus",
        percent: true,
    },
    FightProp {
        code: "FIGHT_PROP_FIRE_ADD_HURT",
        prop_id: 40,
        label: "Pyro DMG Bonus",
        percent: true,
    },
    FightProp {
        code: "FIGHT_PROP_ELEC_ADD_HURT",
        prop_id: 41,
        label: "Electro DMG Bonus",
        percent: true,
    },
    FightProp {
        code: "FIGHT_PROP_WATER_ADD_HURT",
        prop_id: 42,
        label: "Hydro DMG Bonus",
        percent: true,
    },
    FightProp {
        code: "FIGHT_PROP_GRASS_ADD_HURT",
        prop_id: 43,
        label: "Dendro DMG Bonus",
        percent: true,
    },
    FightProp {
        code: "FIGHT_PROP_WIND_ADD_HURT",
        prop_id: 44,
        label: "Anemo DMG Bonus",
        percent: true,
    },
    FightProp {
        code: "FIGHT_PROP_ROCK_ADD_HURT",
        prop_id: 45,
        label: "Geo DMG Bonus",
        percent: true,
    },
    FightProp {
        code: "FIGHT_PROP_ICE_ADD_HURT",
        prop_id: 46,
        label: "Cryo DMG Bonus",
        percent: true,
    },
    FightProp {
        code: "FIGHT_PROP_MAX_HP",
        prop_id: 2000,
        label: "Max HP",
        percent: false,
    },
    FightProp {
        code: "FIGHT_PROP_CUR_ATTACK",
        prop_id: 2001,
        label: "ATK",
        percent: false,
    },
    FightProp {
        code: "FIGHT_PROP_CUR_DEFENSE",
        prop_id: 2002,
        label: "DEF",
        percent: false,
    },
];

/// Get fight property by string code
pub fn fight_prop_by_code(code: &str) -> Option<&'static FightProp> {
    FIGHT_PROPS.iter().find(|p| p.code == code)
}

/// Get fight property by numeric property id
pub fn fight_prop_by_id(prop_id: u32) -> Option<&'static FightProp> {
    FIGHT_PROPS.iter().find(|p| p.prop_id == prop_id)
}

// ============================================================================
// GOOD Export Keys
// ============================================================================

/// GOOD-format short keys and their display labels. Keys ending in `_` are
/// percent stats and arrive already scaled (never rescale them).
pub const GOOD_KEYS: &[(&str, &str)] = &[
    ("hp", "HP"),
    ("hp_", "HP%"),
    ("atk", "ATK"),
    ("atk_", "ATK%"),
    ("def", "DEF"),
    ("def_", "DEF%"),
    ("eleMas", "Elemental Mastery"),
    ("enerRech_", "Energy Recharge%"),
    ("heal_", "Healing Bonus%"),
    ("critRate_", "CRIT Rate%"),
    ("critDMG_", "CRIT DMG%"),
    ("physical_dmg_", "Physical DMG Bonus%"),
    ("anemo_dmg_", "Anemo DMG Bonus%"),
    ("geo_dmg_", "Geo DMG Bonus%"),
    ("electro_dmg_", "Electro DMG Bonus%"),
    ("hydro_dmg_", "Hydro DMG Bonus%"),
    ("pyro_dmg_", "Pyro DMG Bonus%"),
    ("cryo_dmg_", "Cryo DMG Bonus%"),
    ("dendro_dmg_", "Dendro DMG Bonus%"),
];

/// Whether a GOOD key denotes a percent stat
pub fn good_key_is_percent(key: &str) -> bool {
    key.ends_with('_')
}

// ============================================================================
// Max Single Rolls
// ============================================================================

/// Approximate maximum single-roll values for 5-star substats. Percent stats
/// carry a trailing `%` so flat and percent variants of the same stat stay
/// distinct. The `ER%`/`EM` rows are short-form aliases seen in hand-made
/// exports.
pub const MAX_ROLLS: &[(&str, f64)] = &[
    ("CRIT Rate%", 3.9),
    ("CRIT DMG%", 7.8),
    ("ATK%", 5.8),
    ("HP%", 5.8),
    ("DEF%", 7.3),
    ("Energy Recharge%", 6.5),
    ("ER%", 6.5),
    ("Elemental Mastery", 23.0),
    ("EM", 23.0),
    ("HP", 298.75),
    ("ATK", 19.45),
    ("DEF", 23.15),
];

// ============================================================================
// Banner Codes
// ============================================================================

/// Known gacha-type codes and the banner each belongs to
pub const BANNER_CODES: &[(&str, Banner)] = &[
    ("100", Banner::Standard),
    ("200", Banner::Standard),
    ("301", Banner::Character),
    ("400", Banner::Character),
    ("302", Banner::Weapon),
];

// ============================================================================
// Elements
// ============================================================================

/// Upstream element spellings mapped to canonical names
pub const ELEMENT_ALIASES: &[(&str, &str)] = &[
    ("Fire", "Pyro"),
    ("Water", "Hydro"),
    ("Ice", "Cryo"),
    ("Electric", "Electro"),
    ("Wind", "Anemo"),
    ("Rock", "Geo"),
    ("Grass", "Dendro"),
    ("Pyro", "Pyro"),
    ("Hydro", "Hydro"),
    ("Cryo", "Cryo"),
    ("Electro", "Electro"),
    ("Anemo", "Anemo"),
    ("Geo", "Geo"),
    ("Dendro", "Dendro"),
];

/// Canonical element name for an upstream spelling
pub fn canonical_element(raw: &str) -> Option<&'static str> {
    ELEMENT_ALIASES
        .iter()
        .find(|(alias, _)| alias.eq_ignore_ascii_case(raw))
        .map(|(_, name)| *name)
}

// ============================================================================
// ReferenceTables
// ============================================================================

/// Read-only lookup bundle the pipeline borrows.
///
/// Replaces lazily-warmed module-level caches: every component takes a
/// `&ReferenceTables`, so tests can construct a bundle with fixture entries
/// and the process-wide defaults stay immutable.
#[derive(Debug, Clone)]
pub struct ReferenceTables {
    stat_labels: HashMap<String, (String, bool)>,
    good_labels: HashMap<String, String>,
    max_rolls: HashMap<String, f64>,
    banner_codes: HashMap<String, Banner>,
}

impl ReferenceTables {
    /// Build the bundle from the built-in tables
    pub fn new() -> Self {
        let mut stat_labels = HashMap::new();
        for prop in FIGHT_PROPS {
            let entry = (prop.label.to_string(), prop.percent);
            stat_labels.insert(prop.code.to_string(), entry.clone());
            stat_labels.insert(prop.prop_id.to_string(), entry);
        }

        let good_labels = GOOD_KEYS
            .iter()
            .map(|(key, label)| (key.to_string(), label.to_string()))
            .collect();

        let max_rolls = MAX_ROLLS
            .iter()
            .map(|(name, max)| (name.to_ascii_lowercase(), *max))
            .collect();

        let banner_codes = BANNER_CODES
            .iter()
            .map(|(code, banner)| (code.to_string(), *banner))
            .collect();

        Self {
            stat_labels,
            good_labels,
            max_rolls,
            banner_codes,
        }
    }

    /// Display label for a stat code (`FIGHT_PROP_HP` or a numeric id string)
    pub fn stat_label(&self, code: &str) -> Option<&str> {
        self.stat_labels.get(code).map(|(label, _)| label.as_str())
    }

    /// Whether a stat code denotes a percent-scaled value
    pub fn stat_is_percent(&self, code: &str) -> Option<bool> {
        self.stat_labels.get(code).map(|(_, percent)| *percent)
    }

    /// Display label for a GOOD short key; `None` for unmapped keys (callers
    /// fall back to the raw key itself)
    pub fn good_label(&self, key: &str) -> Option<&str> {
        self.good_labels.get(key).map(String::as_str)
    }

    /// Maximum single-roll value for a substat name (trailing `%` marks the
    /// percent variant); `None` for unknown stats
    pub fn max_roll(&self, name: &str) -> Option<f64> {
        self.max_rolls.get(&name.to_ascii_lowercase()).copied()
    }

    /// Banner for an exact gacha-type code
    pub fn banner_for_code(&self, code: &str) -> Option<Banner> {
        self.banner_codes.get(code).copied()
    }

    /// Add or override a stat-code entry (test fixtures)
    pub fn with_stat_label(mut self, code: &str, label: &str, percent: bool) -> Self {
        self.stat_labels
            .insert(code.to_string(), (label.to_string(), percent));
        self
    }

    /// Add or override a max-roll entry (test fixtures)
    pub fn with_max_roll(mut self, name: &str, max: f64) -> Self {
        self.max_rolls.insert(name.to_ascii_lowercase(), max);
        self
    }

    /// Add or override a banner-code entry (test fixtures)
    pub fn with_banner_code(mut self, code: &str, banner: Banner) -> Self {
        self.banner_codes.insert(code.to_string(), banner);
        self
    }
}

impl Default for ReferenceTables {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fight_prop_lookup() {
        assert_eq!(fight_prop_by_code("FIGHT_PROP_HP").map(|p| p.label), Some("HP"));
        assert_eq!(fight_prop_by_id(22).map(|p| p.label), Some("CRIT DMG"));
        assert!(fight_prop_by_code("FIGHT_PROP_NOPE").is_none());
    }

    #[test]
    fn test_tables_stat_label_by_code_and_id() {
        let tables = ReferenceTables::new();
        assert_eq!(tables.stat_label("FIGHT_PROP_CRITICAL"), Some("CRIT Rate"));
        assert_eq!(tables.stat_label("20"), Some("CRIT Rate"));
        assert_eq!(tables.stat_is_percent("20"), Some(true));
        assert_eq!(tables.stat_is_percent("2"), Some(false));
        assert_eq!(tables.stat_label("9999"), None);
    }

    #[test]
    fn test_good_labels() {
        let tables = ReferenceTables::new();
        assert_eq!(tables.good_label("critRate_"), Some("CRIT Rate%"));
        assert_eq!(tables.good_label("eleMas"), Some("Elemental Mastery"));
        assert_eq!(tables.good_label("unknown_key"), None);
        assert!(good_key_is_percent("atk_"));
        assert!(!good_key_is_percent("atk"));
    }

    #[test]
    fn test_max_roll_flat_vs_percent() {
        let tables = ReferenceTables::new();
        assert_eq!(tables.max_roll("ATK%"), Some(5.8));
        assert_eq!(tables.max_roll("ATK"), Some(19.45));
        assert_eq!(tables.max_roll("crit rate%"), Some(3.9));
        assert_eq!(tables.max_roll("Mystery Stat"), None);
    }

    #[test]
    fn test_banner_codes() {
        let tables = ReferenceTables::new();
        assert_eq!(tables.banner_for_code("301"), Some(Banner::Character));
        assert_eq!(tables.banner_for_code("400"), Some(Banner::Character));
        assert_eq!(tables.banner_for_code("302"), Some(Banner::Weapon));
        assert_eq!(tables.banner_for_code("200"), Some(Banner::Standard));
        assert_eq!(tables.banner_for_code("777"), None);
    }

    #[test]
    fn test_element_aliases() {
        assert_eq!(canonical_element("Fire"), Some("Pyro"));
        assert_eq!(canonical_element("Electric"), Some("Electro"));
        assert_eq!(canonical_element("Geo"), Some("Geo"));
        assert_eq!(canonical_element("Plasma"), None);
    }

    #[test]
    fn test_fixture_overrides() {
        let tables = ReferenceTables::new()
            .with_max_roll("Luck%", 9.9)
            .with_banner_code("999", Banner::Weapon)
            .with_stat_label("77", "Luck", true);
        assert_eq!(tables.max_roll("luck%"), Some(9.9));
        assert_eq!(tables.banner_for_code("999"), Some(Banner::Weapon));
        assert_eq!(tables.stat_label("77"), Some("Luck"));
    }
}
