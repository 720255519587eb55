//! Character snapshot mapping
//!
//! Builds canonical [`Character`] records from one raw per-character node of
//! an account snapshot, including the equipped weapon, merged artifacts, and
//! the derived display-stat map with its Max-HP reconstruction fallback.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::artifact::{id_string, merge_artifact, Artifact};
use crate::reference::{canonical_element, fight_prop_by_id, ReferenceTables};
use crate::stat::{is_percent_stat_name, normalize, round1, text_of};

// ============================================================================
// Records
// ============================================================================

/// Equipped weapon
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Weapon {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub weapon_type: Option<String>,
    pub rarity: u8,
    pub level: u8,
    pub refinement: Option<u8>,
    pub base_atk: Option<f64>,
}

/// One talent: display name and current level
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Talent {
    pub name: String,
    pub level: u8,
}

/// The three talent slots. Snapshots that omit talent data yield
/// empty-named level-0 entries.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Talents {
    pub normal: Talent,
    pub skill: Talent,
    pub burst: Talent,
}

/// One normalized character with equipment and derived stats
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Character {
    pub id: String,
    pub name: String,
    pub level: u32,
    pub element: Option<String>,
    pub weapon_type: Option<String>,
    pub rarity: u8,
    pub base_stats: BTreeMap<String, f64>,
    pub stats: BTreeMap<String, f64>,
    pub talents: Talents,
    pub weapon: Option<Weapon>,
    pub artifacts: Vec<Artifact>,
}

// ============================================================================
// Mapping
// ============================================================================

/// Property ids surfaced in the derived stats map, in upstream id order
const DERIVED_PROP_IDS: &[u32] = &[
    20, 22, 23, 26, 28, 30, 40, 41, 42, 43, 44, 45, 46, 2000, 2001, 2002,
];

/// Property ids for the base-stat map (base HP/ATK/DEF)
const BASE_PROP_IDS: &[u32] = &[1, 4, 7];

/// Keys a character's artifact list may hide under
const ARTIFACT_KEYS: &[&str] = &["artifacts", "reliquaries", "equipments"];

/// Map one raw character node into a canonical record. Total: every missing
/// field resolves to a default.
pub fn map_character(raw: &Value, tables: &ReferenceTables) -> Character {
    let data = raw.get("data").or_else(|| raw.get("characterData"));

    let id = data
        .and_then(|d| d.get("id"))
        .or_else(|| raw.get("id"))
        .or_else(|| raw.get("avatarId"))
        .map(id_string)
        .unwrap_or_default();

    let name = data
        .and_then(|d| d.get("name"))
        .and_then(text_of)
        .or_else(|| raw.get("name").and_then(text_of))
        .unwrap_or_default();

    let artifacts = map_artifacts(raw, tables);
    let props = fight_prop_map(raw);

    Character {
        id,
        name,
        level: character_level(raw),
        element: map_element(raw, data),
        weapon_type: first_text(&[data, Some(raw)], "weaponType"),
        rarity: character_rarity(raw, data),
        base_stats: base_stats(&props, tables),
        stats: derived_stats(&props, &artifacts, tables),
        talents: map_talents(raw),
        weapon: raw.get("weapon").and_then(map_weapon),
        artifacts,
    }
}

/// Map one raw weapon node. `None` for non-object input (no weapon equipped).
pub fn map_weapon(raw: &Value) -> Option<Weapon> {
    if !raw.is_object() {
        return None;
    }
    let data = raw.get("data").or_else(|| raw.get("weaponData"));

    let id = data
        .and_then(|d| d.get("id"))
        .or_else(|| raw.get("id"))
        .map(id_string)
        .unwrap_or_default();

    let name = data
        .and_then(|d| d.get("name"))
        .and_then(text_of)
        .or_else(|| raw.get("name").and_then(text_of))
        .unwrap_or_default();

    let weapon_type = first_text(&[data, Some(raw)], "weaponType")
        .or_else(|| raw.get("type").and_then(text_of));

    let rarity = [Some(raw), data]
        .iter()
        .flatten()
        .find_map(|node| {
            ["rarity", "stars"]
                .iter()
                .find_map(|k| node.get(*k).and_then(Value::as_u64))
        })
        .map(|r| r.clamp(1, 5) as u8)
        .unwrap_or(0);

    let refinement = ["refinementRank", "refinement", "refinementLevel"]
        .iter()
        .find_map(|k| raw.get(*k).and_then(Value::as_u64))
        .map(|r| r.min(5) as u8);

    let base_atk = ["baseAtk", "baseAttack"]
        .iter()
        .find_map(|k| raw.get(*k).or_else(|| data.and_then(|d| d.get(*k))))
        .and_then(Value::as_f64);

    Some(Weapon {
        id,
        name,
        weapon_type,
        rarity,
        level: raw.get("level").and_then(Value::as_u64).unwrap_or(0).min(90) as u8,
        refinement,
        base_atk,
    })
}

fn first_text(nodes: &[Option<&Value>], key: &str) -> Option<String> {
    nodes
        .iter()
        .flatten()
        .find_map(|node| node.get(key).and_then(text_of))
}

fn character_level(raw: &Value) -> u32 {
    if let Some(level) = raw.get("level").and_then(Value::as_u64) {
        return level as u32;
    }
    // enka keeps the level as a string in propMap under prop type 4001
    raw.get("propMap")
        .and_then(|m| m.get("4001"))
        .and_then(|p| p.get("val"))
        .and_then(Value::as_str)
        .and_then(|s| s.parse().ok())
        .unwrap_or(0)
}

fn character_rarity(raw: &Value, data: Option<&Value>) -> u8 {
    [Some(raw), data]
        .iter()
        .flatten()
        .find_map(|node| {
            ["rarity", "quality"]
                .iter()
                .find_map(|k| node.get(*k).and_then(Value::as_u64))
        })
        .map(|r| r.clamp(1, 5) as u8)
        .unwrap_or(0)
}

fn map_element(raw: &Value, data: Option<&Value>) -> Option<String> {
    let node = data
        .and_then(|d| d.get("element"))
        .or_else(|| raw.get("element"))?;
    let raw_name = match node {
        Value::String(s) => s.clone(),
        Value::Object(_) => node
            .get("id")
            .and_then(text_of)
            .or_else(|| node.get("name").and_then(text_of))?,
        _ => return None,
    };
    Some(
        canonical_element(&raw_name)
            .map(str::to_string)
            .unwrap_or(raw_name),
    )
}

fn map_artifacts(raw: &Value, tables: &ReferenceTables) -> Vec<Artifact> {
    let list = ARTIFACT_KEYS
        .iter()
        .find_map(|k| raw.get(*k).and_then(Value::as_array));
    let Some(list) = list else {
        return Vec::new();
    };
    let mut artifacts: Vec<Artifact> = list
        .iter()
        // equipment lists mix in the weapon; keep slot-bearing entries
        .filter(|e| {
            e.get("equipType").is_some() || e.get("slot").is_some() || e.get("good").is_some()
        })
        .map(|e| merge_artifact(e, tables))
        .collect();
    artifacts.sort_by_key(|a| a.slot.map(|s| s.order()).unwrap_or(usize::MAX));
    artifacts
}

// ============================================================================
// Talents
// ============================================================================

fn map_talents(raw: &Value) -> Talents {
    if let Some(node) = raw.get("talents") {
        if node.get("normal").is_some() || node.get("skill").is_some() || node.get("burst").is_some()
        {
            return Talents {
                normal: map_talent(node.get("normal")),
                skill: map_talent(node.get("skill")),
                burst: map_talent(node.get("burst")),
            };
        }
        if let Some(list) = node.as_array() {
            return Talents {
                normal: map_talent(list.first()),
                skill: map_talent(list.get(1)),
                burst: map_talent(list.get(2)),
            };
        }
    }
    // bare level map: {"10021": 6, ...} in ascending key order, no names
    if let Some(map) = raw.get("skillLevelMap").and_then(Value::as_object) {
        let mut entries: Vec<(&String, &Value)> = map.iter().collect();
        entries.sort_by_key(|(k, _)| k.parse::<u64>().unwrap_or(u64::MAX));
        let level_at = |i: usize| -> Talent {
            Talent {
                name: String::new(),
                level: entries
                    .get(i)
                    .and_then(|(_, v)| v.as_u64())
                    .unwrap_or(0)
                    .min(15) as u8,
            }
        };
        return Talents {
            normal: level_at(0),
            skill: level_at(1),
            burst: level_at(2),
        };
    }
    Talents::default()
}

fn map_talent(node: Option<&Value>) -> Talent {
    let Some(node) = node else {
        return Talent::default();
    };
    Talent {
        name: node.get("name").and_then(text_of).unwrap_or_default(),
        level: node
            .get("level")
            .and_then(Value::as_u64)
            .unwrap_or(0)
            .min(15) as u8,
    }
}

// ============================================================================
// Stats
// ============================================================================

/// Keys the coded fight-property map may live under
const FIGHT_PROP_KEYS: &[&str] = &["fightPropMap", "fightProps", "stats"];

fn fight_prop_map(raw: &Value) -> BTreeMap<String, f64> {
    for key in FIGHT_PROP_KEYS {
        if let Some(map) = raw.get(*key).and_then(Value::as_object) {
            let props: BTreeMap<String, f64> = map
                .iter()
                .filter_map(|(k, v)| v.as_f64().map(|n| (k.clone(), n)))
                .collect();
            if !props.is_empty() {
                return props;
            }
        }
    }
    BTreeMap::new()
}

/// Reading for one property, whether the map is keyed by numeric id or by
/// the string code
fn prop_value(props: &BTreeMap<String, f64>, prop_id: u32) -> Option<f64> {
    if let Some(v) = props.get(&prop_id.to_string()) {
        return Some(*v);
    }
    fight_prop_by_id(prop_id).and_then(|p| props.get(p.code).copied())
}

fn base_stats(props: &BTreeMap<String, f64>, tables: &ReferenceTables) -> BTreeMap<String, f64> {
    let mut base = BTreeMap::new();
    for &prop_id in BASE_PROP_IDS {
        if let (Some(value), Some(label)) = (
            prop_value(props, prop_id),
            tables.stat_label(&prop_id.to_string()),
        ) {
            base.insert(label.to_string(), value.round());
        }
    }
    base
}

/// Build the display-stat map from the coded fight-property map.
///
/// Coded-map percent properties are canonically fractional (0.706 means
/// 70.6%), so they scale by 100 unconditionally; flat aggregates are rounded
/// to the nearest integer here, the aggregation boundary. Map keys that are
/// already display labels pass through instead.
fn derived_stats(
    props: &BTreeMap<String, f64>,
    artifacts: &[Artifact],
    tables: &ReferenceTables,
) -> BTreeMap<String, f64> {
    let mut stats = BTreeMap::new();

    for &prop_id in DERIVED_PROP_IDS {
        // Max HP has its own reconstruction path below
        if prop_id == 2000 {
            continue;
        }
        let (Some(value), Some(label)) = (
            prop_value(props, prop_id),
            tables.stat_label(&prop_id.to_string()),
        ) else {
            continue;
        };
        let percent = tables.stat_is_percent(&prop_id.to_string()).unwrap_or(false);
        let rendered = if percent {
            round1(value * 100.0)
        } else {
            value.round()
        };
        stats.insert(label.to_string(), rendered);
    }

    // already-derived maps keyed by label pass through the code table;
    // percent-named readings still get the one normalization pass
    for (key, &value) in props {
        if key.parse::<u32>().is_ok() || key.starts_with("FIGHT_PROP_") {
            continue;
        }
        let rendered = if is_percent_stat_name(key) {
            normalize(Some(value), Some(true)).0
        } else {
            value.round()
        };
        stats.entry(key.clone()).or_insert(rendered);
    }

    let hp = max_hp(props, stats.get("Max HP").copied(), artifacts);
    stats.insert("Max HP".to_string(), hp);

    stats
}

/// Max HP, reconstructing when the direct reading is absent or the <=1
/// "unset" sentinel: `round(base_hp * (1 + hp%/100) + flat_hp_add)`. When the
/// snapshot also omits the additive aggregate, the equipped artifacts' flat
/// HP contributions stand in for it.
fn max_hp(props: &BTreeMap<String, f64>, label_keyed: Option<f64>, artifacts: &[Artifact]) -> f64 {
    if let Some(direct) = prop_value(props, 2000).or(label_keyed) {
        if direct > 1.0 {
            return direct.round();
        }
    }
    let base_hp = prop_value(props, 1).unwrap_or(0.0);
    let hp_pct = prop_value(props, 3).unwrap_or(0.0) * 100.0;
    let hp_add = prop_value(props, 2)
        .unwrap_or_else(|| artifacts.iter().map(Artifact::flat_hp_total).sum());
    (base_hp * (1.0 + hp_pct / 100.0) + hp_add).round()
}
