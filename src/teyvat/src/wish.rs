//! Wish log parsing
//!
//! Converts arbitrary pull-history exports (a flat JSON array, spreadsheet
//! rows converted to objects, or paginated API pages) into canonical
//! [`Wish`] records. Parsing is total: malformed individual records coerce
//! to documented defaults instead of being dropped, so record counts are
//! conserved for the pity fold.

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::reference::ReferenceTables;

// ============================================================================
// Banner
// ============================================================================

/// Gacha pools with independent pity counters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Banner {
    Standard,
    Character,
    Weapon,
}

impl std::fmt::Display for Banner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Standard => write!(f, "standard"),
            Self::Character => write!(f, "character"),
            Self::Weapon => write!(f, "weapon"),
        }
    }
}

impl std::str::FromStr for Banner {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "standard" => Ok(Self::Standard),
            "character" => Ok(Self::Character),
            "weapon" => Ok(Self::Weapon),
            _ => Err(format!("Unknown banner: {}", s)),
        }
    }
}

// ============================================================================
// Rank
// ============================================================================

/// Pull rarity as the upstream string codes "3" | "4" | "5"
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Rank {
    #[serde(rename = "3")]
    Three,
    #[serde(rename = "4")]
    Four,
    #[serde(rename = "5")]
    Five,
}

impl std::fmt::Display for Rank {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Three => write!(f, "3"),
            Self::Four => write!(f, "4"),
            Self::Five => write!(f, "5"),
        }
    }
}

// ============================================================================
// Item kind
// ============================================================================

/// What a pull yielded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ItemKind {
    Character,
    Weapon,
}

// ============================================================================
// Wish
// ============================================================================

/// One canonical pull record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Wish {
    pub id: String,
    pub time: DateTime<Utc>,
    pub name: String,
    pub rank_type: Rank,
    pub item_type: ItemKind,
    pub banner: Banner,
}

/// Wrapper keys a pull list may hide under
const LIST_KEYS: &[&str] = &["list", "wishes", "data"];

/// Parse a pull-history export into canonical records.
///
/// Accepts an array directly or unwraps it from common wrapper keys
/// (including the paginated `{"data": {"list": [...]}}` page shape).
/// Non-list input yields an empty vec. Unparseable records are coerced to
/// defaults rather than dropped; whether dropping would serve pity math
/// better is a product decision deliberately not made here.
pub fn parse_wishes(raw: &Value, tables: &ReferenceTables) -> Vec<Wish> {
    let list = unwrap_list(raw);
    list.iter()
        .enumerate()
        .map(|(idx, record)| parse_record(record, idx, tables))
        .collect()
}

fn unwrap_list(raw: &Value) -> Vec<Value> {
    if let Value::Array(items) = raw {
        return items.clone();
    }
    if raw.is_object() {
        for key in LIST_KEYS {
            match raw.get(key) {
                Some(Value::Array(items)) => return items.clone(),
                // paginated page: {"data": {"list": [...]}}
                Some(inner @ Value::Object(_)) => {
                    if let Some(Value::Array(items)) = inner.get("list") {
                        return items.clone();
                    }
                }
                _ => {}
            }
        }
    }
    Vec::new()
}

fn parse_record(record: &Value, idx: usize, tables: &ReferenceTables) -> Wish {
    let id = first_string(record, &["id", "uid"]).unwrap_or_else(|| idx.to_string());
    let time = parse_time(record).unwrap_or_else(Utc::now);
    let name = first_string(record, &["name", "item", "item_name"])
        .unwrap_or_else(|| "Unknown".to_string());
    let rank_type = parse_rank(record);
    let item_type = parse_item_kind(record);
    let banner = parse_banner(record, tables);

    Wish {
        id,
        time,
        name,
        rank_type,
        item_type,
        banner,
    }
}

fn first_string(record: &Value, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| match record.get(*key)? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

fn parse_time(record: &Value) -> Option<DateTime<Utc>> {
    for key in ["time", "timestamp", "date"] {
        match record.get(key) {
            Some(Value::String(s)) => {
                if let Some(t) = parse_time_str(s) {
                    return Some(t);
                }
            }
            Some(Value::Number(n)) => {
                if let Some(t) = n.as_i64().and_then(epoch_to_utc) {
                    return Some(t);
                }
            }
            _ => {}
        }
    }
    None
}

fn parse_time_str(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(t) = DateTime::parse_from_rfc3339(s) {
        return Some(t.with_timezone(&Utc));
    }
    // upstream export format, no zone marker
    NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S")
        .ok()
        .map(|naive| Utc.from_utc_datetime(&naive))
}

fn epoch_to_utc(n: i64) -> Option<DateTime<Utc>> {
    // values past ~2001-09 in milliseconds
    if n.abs() >= 1_000_000_000_000 {
        Utc.timestamp_millis_opt(n).single()
    } else {
        Utc.timestamp_opt(n, 0).single()
    }
}

fn parse_rank(record: &Value) -> Rank {
    let raw = first_string(record, &["rank_type", "rankType", "rank", "rarity"]);
    match raw.as_deref() {
        Some("5") => Rank::Five,
        Some("4") => Rank::Four,
        _ => Rank::Three,
    }
}

fn parse_item_kind(record: &Value) -> ItemKind {
    let raw = match first_string(record, &["item_type", "itemType"]) {
        Some(s) => s,
        None => return ItemKind::Character,
    };
    match raw.as_str() {
        "Character" | "角色" => ItemKind::Character,
        "Weapon" | "武器" => ItemKind::Weapon,
        other if other.to_ascii_lowercase().contains("weapon") => ItemKind::Weapon,
        _ => ItemKind::Character,
    }
}

fn parse_banner(record: &Value, tables: &ReferenceTables) -> Banner {
    let code = first_string(record, &["gacha_type", "gachaType", "banner", "pool"])
        .unwrap_or_default();
    if let Some(banner) = tables.banner_for_code(&code) {
        return banner;
    }
    let k = code.to_ascii_lowercase();
    if k.contains("character") {
        Banner::Character
    } else if k.contains("weapon") {
        Banner::Weapon
    } else {
        Banner::Standard
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn tables() -> ReferenceTables {
        ReferenceTables::new()
    }

    #[test]
    fn test_flat_array_input() {
        let raw = json!([
            { "id": "100", "time": "2024-03-01 12:00:00", "name": "Dull Blade",
              "rank_type": "3", "item_type": "Weapon", "gacha_type": "302" }
        ]);
        let wishes = parse_wishes(&raw, &tables());
        assert_eq!(wishes.len(), 1);
        let w = &wishes[0];
        assert_eq!(w.id, "100");
        assert_eq!(w.name, "Dull Blade");
        assert_eq!(w.rank_type, Rank::Three);
        assert_eq!(w.item_type, ItemKind::Weapon);
        assert_eq!(w.banner, Banner::Weapon);
    }

    #[test]
    fn test_wrapper_keys() {
        for key in ["list", "wishes", "data"] {
            let raw = json!({ (key): [ { "id": "1" } ] });
            assert_eq!(parse_wishes(&raw, &tables()).len(), 1, "wrapper {key}");
        }
    }

    #[test]
    fn test_paginated_page_shape() {
        let raw = json!({ "data": { "list": [ { "id": "1" }, { "id": "2" } ], "end_id": "2" } });
        assert_eq!(parse_wishes(&raw, &tables()).len(), 2);
    }

    #[test]
    fn test_non_list_input_is_empty() {
        for raw in [json!(null), json!(42), json!("nope"), json!({ "other": 1 })] {
            assert!(parse_wishes(&raw, &tables()).is_empty());
        }
    }

    #[test]
    fn test_malformed_record_coerced_not_dropped() {
        let raw = json!([ null, { "id": "2" } ]);
        let wishes = parse_wishes(&raw, &tables());
        assert_eq!(wishes.len(), 2);
        assert_eq!(wishes[0].id, "0"); // index fallback
        assert_eq!(wishes[0].name, "Unknown");
        assert_eq!(wishes[0].rank_type, Rank::Three);
        assert_eq!(wishes[0].item_type, ItemKind::Character);
        assert_eq!(wishes[0].banner, Banner::Standard);
    }

    #[test]
    fn test_banner_code_table_and_substrings() {
        let t = tables();
        let cases = [
            ("301", Banner::Character),
            ("400", Banner::Character),
            ("302", Banner::Weapon),
            ("200", Banner::Standard),
            ("Character Event Wish", Banner::Character),
            ("weapon banner", Banner::Weapon),
            ("whatever", Banner::Standard),
        ];
        for (code, expected) in cases {
            let raw = json!([ { "gacha_type": code } ]);
            assert_eq!(parse_wishes(&raw, &t)[0].banner, expected, "code {code}");
        }
    }

    #[test]
    fn test_numeric_gacha_type_and_rank() {
        let raw = json!([ { "gacha_type": 301, "rank": 5 } ]);
        let w = &parse_wishes(&raw, &tables())[0];
        assert_eq!(w.banner, Banner::Character);
        assert_eq!(w.rank_type, Rank::Five);
    }

    #[test]
    fn test_cjk_item_types() {
        let raw = json!([
            { "item_type": "武器" },
            { "item_type": "角色" },
        ]);
        let wishes = parse_wishes(&raw, &tables());
        assert_eq!(wishes[0].item_type, ItemKind::Weapon);
        assert_eq!(wishes[1].item_type, ItemKind::Character);
    }

    #[test]
    fn test_weapon_substring_inference() {
        let raw = json!([ { "item_type": "weapon (event)" } ]);
        assert_eq!(parse_wishes(&raw, &tables())[0].item_type, ItemKind::Weapon);
    }

    #[test]
    fn test_time_formats() {
        let raw = json!([
            { "time": "2024-03-01T12:00:00Z" },
            { "time": "2024-03-01 12:00:00" },
            { "timestamp": 1_709_294_400 },
            { "timestamp": 1_709_294_400_000i64 },
        ]);
        let wishes = parse_wishes(&raw, &tables());
        assert_eq!(wishes[0].time, wishes[1].time);
        assert_eq!(wishes[2].time, wishes[3].time);
    }

    #[test]
    fn test_round_trip() {
        let raw = json!([
            { "id": "9001", "time": "2024-03-01 12:00:00", "name": "Amber",
              "rank_type": "4", "item_type": "Character", "gacha_type": "301" },
            { "id": "9002", "time": "2024-03-02 08:30:00", "name": "Skyward Pride",
              "rank_type": "5", "item_type": "Weapon", "gacha_type": "302" },
        ]);
        let t = tables();
        let first = parse_wishes(&raw, &t);
        let serialized = serde_json::to_value(&first).unwrap();
        let second = parse_wishes(&serialized, &t);
        assert_eq!(first, second);
    }

    #[test]
    fn test_serde_shape() {
        let wish = Wish {
            id: "1".to_string(),
            time: Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap(),
            name: "Amber".to_string(),
            rank_type: Rank::Four,
            item_type: ItemKind::Character,
            banner: Banner::Character,
        };
        let json = serde_json::to_value(&wish).unwrap();
        assert_eq!(json["rankType"], "4");
        assert_eq!(json["itemType"], "Character");
        assert_eq!(json["banner"], "character");
        assert_eq!(json["time"], "2024-03-01T12:00:00Z");
    }
}
