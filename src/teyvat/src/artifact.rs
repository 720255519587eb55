//! Artifact assembly
//!
//! Merges the partially-overlapping raw representations of one equipped
//! artifact into a canonical [`Artifact`]. Substats may arrive as a plain
//! list, a wrapped container, an object keyed by index, or not at all with a
//! GOOD-format export on the side; the merger tries the richest direct shape
//! first and fills gaps positionally from GOOD without duplicating stats.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::reference::{good_key_is_percent, ReferenceTables};
use crate::stat::{stat_from_property, text_of, StatValue};

/// Artifact slots in display order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Slot {
    Flower,
    Feather,
    Sands,
    Goblet,
    Circlet,
}

impl Slot {
    /// All slots in display order
    pub const ALL: &'static [Slot] = &[
        Slot::Flower,
        Slot::Feather,
        Slot::Sands,
        Slot::Goblet,
        Slot::Circlet,
    ];

    /// Map an upstream equip-type code, GOOD slot key, or plain slot name
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "EQUIP_BRACER" => Some(Slot::Flower),
            "EQUIP_NECKLACE" => Some(Slot::Feather),
            "EQUIP_SHOES" => Some(Slot::Sands),
            "EQUIP_RING" => Some(Slot::Goblet),
            "EQUIP_DRESS" => Some(Slot::Circlet),
            _ => match code.to_ascii_lowercase().as_str() {
                "flower" => Some(Slot::Flower),
                "feather" | "plume" => Some(Slot::Feather),
                "sands" => Some(Slot::Sands),
                "goblet" => Some(Slot::Goblet),
                "circlet" => Some(Slot::Circlet),
                _ => None,
            },
        }
    }

    /// Position in display order
    pub fn order(&self) -> usize {
        *self as usize
    }

    /// Slot name
    pub fn name(&self) -> &'static str {
        match self {
            Slot::Flower => "Flower",
            Slot::Feather => "Feather",
            Slot::Sands => "Sands",
            Slot::Goblet => "Goblet",
            Slot::Circlet => "Circlet",
        }
    }
}

impl std::fmt::Display for Slot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// One merged artifact. Fields the upstream omits resolve to defaults
/// (`rarity` 0, `level` 0, `slot`/`main_stat` null, empty substats) rather
/// than failing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Artifact {
    pub id: String,
    pub set_name: String,
    pub rarity: u8,
    pub level: u8,
    pub slot: Option<Slot>,
    pub main_stat: Option<StatValue>,
    pub substats: Vec<StatValue>,
}

impl Artifact {
    /// Sum of the flat-HP contributions on this piece (main stat plus
    /// substats). Feeds the Max-HP reconstruction when the snapshot omits
    /// the additive-HP aggregate.
    pub fn flat_hp_total(&self) -> f64 {
        self.main_stat
            .iter()
            .chain(self.substats.iter())
            .filter(|s| !s.is_percent && s.name.eq_ignore_ascii_case("hp"))
            .map(|s| s.value)
            .sum()
    }
}

/// Keys tried for the raw substat collection, richest shape first
const SUBSTAT_KEYS: &[&str] = &["substats", "subStats", "substatList"];

/// Keys a sidecar GOOD export may live under
const GOOD_KEYS: &[&str] = &["good", "goodExport"];

/// Assemble a full artifact record from one raw JSON node.
///
/// Never fails: unknown stat codes keep the code as display name, missing
/// fields get defaults, and fewer than four usable direct substats trigger
/// the GOOD-export fallback with positional merging.
pub fn merge_artifact(raw: &Value, tables: &ReferenceTables) -> Artifact {
    let data = raw.get("data").or_else(|| raw.get("artifactData"));
    let good = good_node(raw);

    let id = raw
        .get("id")
        .or_else(|| data.and_then(|d| d.get("id")))
        .map(id_string)
        .unwrap_or_default();

    let set_name = set_name(raw, data, good).unwrap_or_else(|| "Unknown Set".to_string());

    let rarity = first_u64(raw, &["rarity", "rank"])
        .or_else(|| data.and_then(|d| first_u64(d, &["stars", "rarity"])))
        .map(|r| r.clamp(1, 5) as u8)
        .unwrap_or(0);

    let level = first_u64(raw, &["level", "lv"])
        .map(|l| l.min(20) as u8)
        .unwrap_or(0);

    let slot = first_str(raw, &["equipType", "slot"])
        .or_else(|| data.and_then(|d| first_str(d, &["equipType"])))
        .or_else(|| good.and_then(|g| first_str(g, &["slotKey"])))
        .and_then(|code| Slot::from_code(&code));

    let substats = merge_substats(raw, good, tables);
    let main_stat = merge_main_stat(raw, good, tables);

    Artifact {
        id,
        set_name,
        rarity,
        level,
        slot,
        main_stat,
        substats,
    }
}

/// The sidecar GOOD export, or the node itself when it is already GOOD-shaped
fn good_node(raw: &Value) -> Option<&Value> {
    for key in GOOD_KEYS {
        if let Some(g) = raw.get(key) {
            if g.is_object() {
                return Some(g);
            }
        }
    }
    raw.get("mainStatKey").is_some().then_some(raw)
}

fn set_name(raw: &Value, data: Option<&Value>, good: Option<&Value>) -> Option<String> {
    data.and_then(|d| d.get("set"))
        .and_then(|s| s.get("name"))
        .and_then(text_of)
        .or_else(|| raw.get("set").and_then(|s| s.get("name")).and_then(text_of))
        .or_else(|| raw.get("set").and_then(text_of))
        .or_else(|| raw.get("setName").and_then(text_of))
        .or_else(|| good.and_then(|g| g.get("setKey")).and_then(text_of))
}

pub(crate) fn id_string(v: &Value) -> String {
    match v {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        _ => String::new(),
    }
}

fn first_u64(raw: &Value, keys: &[&str]) -> Option<u64> {
    keys.iter().find_map(|k| raw.get(*k).and_then(Value::as_u64))
}

fn first_str(raw: &Value, keys: &[&str]) -> Option<String> {
    keys.iter()
        .find_map(|k| raw.get(*k).and_then(Value::as_str).map(str::to_string))
}

/// Pull the raw substat entries out of whichever shape the upstream used.
/// Index-keyed objects are read in numeric key order.
fn raw_substat_entries(raw: &Value) -> Vec<Value> {
    let node = match SUBSTAT_KEYS.iter().find_map(|k| raw.get(*k)) {
        Some(node) => node,
        None => return Vec::new(),
    };
    match node {
        Value::Array(items) => items.clone(),
        Value::Object(map) => {
            // wrapped container first, then an object keyed by index
            for inner in ["substats", "list"] {
                if let Some(Value::Array(items)) = map.get(inner) {
                    return items.clone();
                }
            }
            let mut entries: Vec<(&String, &Value)> = map.iter().collect();
            entries.sort_by_key(|(k, _)| k.parse::<usize>().unwrap_or(usize::MAX));
            entries.into_iter().map(|(_, v)| v.clone()).collect()
        }
        _ => Vec::new(),
    }
}

/// Substats from a GOOD export. Values are already in game units; no
/// rescaling happens here.
fn good_substats(good: &Value, tables: &ReferenceTables) -> Vec<StatValue> {
    let items = match good.get("substats").and_then(Value::as_array) {
        Some(items) => items,
        None => return Vec::new(),
    };
    items
        .iter()
        .filter_map(|entry| {
            let key = entry.get("key").and_then(Value::as_str)?;
            if key.is_empty() {
                return None;
            }
            let value = entry.get("value").and_then(Value::as_f64).unwrap_or(0.0);
            Some(good_stat(key, value, tables))
        })
        .collect()
}

fn good_stat(key: &str, value: f64, tables: &ReferenceTables) -> StatValue {
    let name = tables
        .good_label(key)
        .map(str::to_string)
        .unwrap_or_else(|| key.to_string());
    StatValue::new(name, value, good_key_is_percent(key))
}

/// Merge direct substats with the GOOD fallback.
///
/// The direct shape wins per index; GOOD substitutes where the direct entry
/// is unusable, never introducing a duplicate stat name, and filling stops
/// at four entries.
fn merge_substats(raw: &Value, good: Option<&Value>, tables: &ReferenceTables) -> Vec<StatValue> {
    let entries = raw_substat_entries(raw);
    let primary: Vec<Option<StatValue>> = entries
        .iter()
        .map(|e| stat_from_property(e, tables))
        .collect();

    let usable = primary.iter().flatten().count();
    let any_incomplete = primary.iter().any(Option::is_none);
    let needs_good = usable < 4 || any_incomplete;

    let alternate: Vec<StatValue> = if needs_good {
        good.map(|g| good_substats(g, tables)).unwrap_or_default()
    } else {
        Vec::new()
    };

    let mut merged: Vec<StatValue> = Vec::new();
    let positions = primary.len().max(alternate.len()).min(4);
    for i in 0..positions {
        let candidate = primary
            .get(i)
            .and_then(|p| p.as_ref())
            .or_else(|| alternate.get(i));
        if let Some(stat) = candidate {
            if !merged.iter().any(|m| m.identity() == stat.identity()) {
                merged.push(stat.clone());
            }
        }
    }
    // top up from the alternate export when positional substitution still
    // left gaps
    for stat in &alternate {
        if merged.len() >= 4 {
            break;
        }
        if !merged.iter().any(|m| m.identity() == stat.identity()) {
            merged.push(stat.clone());
        }
    }
    merged.truncate(4);
    merged
}

/// Main stat: direct StatProperty shape if usable, else the GOOD export's
/// main-stat key/value (already scaled, no rescaling applied).
fn merge_main_stat(raw: &Value, good: Option<&Value>, tables: &ReferenceTables) -> Option<StatValue> {
    let primary = ["mainstat", "mainStat", "mainProperty"]
        .iter()
        .find_map(|k| raw.get(*k))
        .and_then(|node| stat_from_property(node, tables));
    if primary.is_some() {
        return primary;
    }
    let good = good?;
    let key = good.get("mainStatKey").and_then(Value::as_str)?;
    if key.is_empty() {
        return None;
    }
    let value = good
        .get("mainStatValue")
        .and_then(Value::as_f64)
        .unwrap_or(0.0);
    Some(good_stat(key, value, tables))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn tables() -> ReferenceTables {
        ReferenceTables::new()
    }

    fn sub(name: &str, value: f64) -> Value {
        json!({ "name": name, "value": value })
    }

    #[test]
    fn test_slot_codes() {
        assert_eq!(Slot::from_code("EQUIP_BRACER"), Some(Slot::Flower));
        assert_eq!(Slot::from_code("EQUIP_DRESS"), Some(Slot::Circlet));
        assert_eq!(Slot::from_code("plume"), Some(Slot::Feather));
        assert_eq!(Slot::from_code("Goblet"), Some(Slot::Goblet));
        assert_eq!(Slot::from_code("EQUIP_HAT"), None);
        assert!(Slot::Flower.order() < Slot::Circlet.order());
    }

    #[test]
    fn test_clean_primary_substats_unchanged() {
        let raw = json!({
            "substats": [
                sub("CRIT Rate", 3.9),
                sub("CRIT DMG", 7.8),
                sub("ATK%", 5.8),
                sub("HP", 299.0),
            ],
            "good": { "substats": [ { "key": "def_", "value": 7.3 } ] }
        });
        let artifact = merge_artifact(&raw, &tables());
        let names: Vec<&str> = artifact.substats.iter().map(|s| s.name.as_str()).collect();
        // four usable direct entries: the GOOD sidecar is never consulted
        assert_eq!(names, vec!["CRIT Rate", "CRIT DMG", "ATK%", "HP"]);
    }

    #[test]
    fn test_positional_fill_from_good() {
        let raw = json!({
            "substats": [
                sub("CRIT Rate", 3.9),
                { "value": 7.8 },          // unusable: no name
                sub("ATK%", 5.8),
            ],
            "good": { "substats": [
                { "key": "critRate_", "value": 3.9 },
                { "key": "critDMG_", "value": 7.8 },
                { "key": "atk_", "value": 5.8 },
                { "key": "hp", "value": 299.0 },
            ]}
        });
        let artifact = merge_artifact(&raw, &tables());
        let names: Vec<&str> = artifact.substats.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["CRIT Rate", "CRIT DMG%", "ATK%", "HP"]);
    }

    #[test]
    fn test_good_values_not_rescaled() {
        // GOOD percent values arrive scaled; 0.4 here would be a genuinely
        // tiny roll, not a fraction to multiply
        let raw = json!({
            "good": { "substats": [ { "key": "critRate_", "value": 0.4 } ] }
        });
        let artifact = merge_artifact(&raw, &tables());
        assert_eq!(artifact.substats[0], StatValue::new("CRIT Rate%", 0.4, true));
    }

    #[test]
    fn test_wrapped_container_shape() {
        let raw = json!({
            "substats": { "substats": [ sub("HP", 299.0), sub("DEF", 23.0) ] }
        });
        let artifact = merge_artifact(&raw, &tables());
        assert_eq!(artifact.substats.len(), 2);
        assert_eq!(artifact.substats[0].name, "HP");
    }

    #[test]
    fn test_index_keyed_object_shape() {
        let raw = json!({
            "substats": { "1": sub("DEF", 23.0), "0": sub("HP", 299.0) }
        });
        let artifact = merge_artifact(&raw, &tables());
        let names: Vec<&str> = artifact.substats.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["HP", "DEF"]);
    }

    #[test]
    fn test_no_duplicate_names_after_merge() {
        let raw = json!({
            "substats": [ sub("CRIT Rate", 3.9) ],
            "good": { "substats": [
                { "key": "critRate_", "value": 3.9 },
                { "key": "critDMG_", "value": 7.8 },
            ]}
        });
        let artifact = merge_artifact(&raw, &tables());
        let names: Vec<&str> = artifact.substats.iter().map(|s| s.name.as_str()).collect();
        // direct CRIT Rate survives; GOOD contributes only the missing stat
        assert_eq!(names, vec!["CRIT Rate", "CRIT DMG%"]);
    }

    #[test]
    fn test_substats_capped_at_four() {
        let raw = json!({
            "substats": [
                sub("CRIT Rate", 3.9),
                sub("CRIT DMG", 7.8),
                sub("ATK%", 5.8),
                sub("HP", 299.0),
                sub("DEF", 23.0),
            ]
        });
        let artifact = merge_artifact(&raw, &tables());
        assert_eq!(artifact.substats.len(), 4);
    }

    #[test]
    fn test_main_stat_falls_back_to_good() {
        let raw = json!({
            "mainstat": { "name": "" },
            "good": { "mainStatKey": "pyro_dmg_", "mainStatValue": 46.6 }
        });
        let artifact = merge_artifact(&raw, &tables());
        assert_eq!(
            artifact.main_stat,
            Some(StatValue::new("Pyro DMG Bonus%", 46.6, true))
        );
    }

    #[test]
    fn test_main_stat_primary_wins() {
        let raw = json!({
            "mainStat": { "fightPropName": "ATK", "value": 311.0 },
            "good": { "mainStatKey": "atk_", "mainStatValue": 46.6 }
        });
        let artifact = merge_artifact(&raw, &tables());
        assert_eq!(artifact.main_stat, Some(StatValue::new("ATK", 311.0, false)));
    }

    #[test]
    fn test_unknown_good_key_passes_through() {
        let raw = json!({
            "good": { "substats": [ { "key": "futureStat_", "value": 12.0 } ] }
        });
        let artifact = merge_artifact(&raw, &tables());
        assert_eq!(artifact.substats[0].name, "futureStat_");
        assert!(artifact.substats[0].is_percent);
    }

    #[test]
    fn test_metadata_fields() {
        let raw = json!({
            "id": 1234567,
            "setName": "Crimson Witch of Flames",
            "rarity": 5,
            "level": 20,
            "equipType": "EQUIP_RING",
        });
        let artifact = merge_artifact(&raw, &tables());
        assert_eq!(artifact.id, "1234567");
        assert_eq!(artifact.set_name, "Crimson Witch of Flames");
        assert_eq!(artifact.rarity, 5);
        assert_eq!(artifact.level, 20);
        assert_eq!(artifact.slot, Some(Slot::Goblet));
    }

    #[test]
    fn test_empty_input_yields_defaults() {
        let artifact = merge_artifact(&json!({}), &tables());
        assert_eq!(artifact.set_name, "Unknown Set");
        assert_eq!(artifact.rarity, 0);
        assert!(artifact.substats.is_empty());
        assert!(artifact.main_stat.is_none());
    }

    #[test]
    fn test_flat_hp_total() {
        let artifact = Artifact {
            id: String::new(),
            set_name: "Test".to_string(),
            rarity: 5,
            level: 20,
            slot: Some(Slot::Flower),
            main_stat: Some(StatValue::new("HP", 4780.0, false)),
            substats: vec![
                StatValue::new("HP", 299.0, false),
                StatValue::new("HP", 5.8, true), // percent HP does not count
                StatValue::new("ATK", 19.0, false),
            ],
        };
        assert_eq!(artifact.flat_hp_total(), 5079.0);
    }
}
