//! Stat normalization
//!
//! Converts one raw stat reading into a canonical [`StatValue`]. Upstream
//! sources disagree on field names, on whether percents arrive as fractions
//! (0.466) or already scaled (46.6), and on where the display name lives;
//! everything funnels through the candidate tables below so the resolution
//! order stays auditable.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::reference::ReferenceTables;

/// One canonical stat reading. Percent values are always on a 0-100 scale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatValue {
    pub name: String,
    pub value: f64,
    pub is_percent: bool,
}

impl StatValue {
    pub fn new(name: impl Into<String>, value: f64, is_percent: bool) -> Self {
        Self {
            name: name.into(),
            value,
            is_percent,
        }
    }

    /// Max-roll lookup key: percent stats carry a trailing `%` so flat `ATK`
    /// and `ATK%` stay distinct.
    pub fn roll_key(&self) -> String {
        if self.is_percent && !self.name.ends_with('%') {
            format!("{}%", self.name)
        } else {
            self.name.clone()
        }
    }

    /// Canonical identity: lowercased name without the `%` suffix, plus the
    /// percent flag. Recognizes differently-labeled sources ("CRIT Rate" vs
    /// "CRIT Rate%") as the same stat while keeping flat HP distinct from HP%.
    pub fn identity(&self) -> (String, bool) {
        (
            self.name.trim_end_matches('%').trim().to_ascii_lowercase(),
            self.is_percent,
        )
    }
}

/// Normalize one raw stat reading.
///
/// An explicit percent flag is trusted as-is. Without one, values in the open
/// interval (0,1) are fractional percents and get multiplied by 100; values
/// >= 1 (or <= 0) are already scaled or flat. Percent outputs are rounded to
/// one decimal; flat outputs are left as given.
///
/// Caller contract: this runs exactly once per raw field. It is not safe to
/// re-apply to an already-normalized value (a second pass would rescale any
/// fractional result).
pub fn normalize(raw: Option<f64>, explicit_is_percent: Option<bool>) -> (f64, bool) {
    let v = match raw {
        Some(v) if v.is_finite() => v,
        _ => return (0.0, explicit_is_percent.unwrap_or(false)),
    };
    let fractional = v > 0.0 && v < 1.0;
    let is_percent = explicit_is_percent.unwrap_or(fractional);
    if is_percent {
        let scaled = if fractional { v * 100.0 } else { v };
        (round1(scaled), true)
    } else {
        (v, false)
    }
}

pub(crate) fn round1(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}

/// Paths tried, in order, for an explicit human-readable label
const TEXT_LABEL_PATHS: &[&[&str]] = &[
    &["fightPropName"],
    &["statProperty", "fightPropName"],
    &["statProperty", "name"],
    &["name"],
    &["statText"],
    &["stat"],
];

/// Keys tried, in order, for a stat code to run through the label table
const CODE_KEYS: &[&str] = &["fightProp", "type", "propType", "appendPropId", "mainPropId"];

/// Keys tried, in order, for the numeric reading. `rawValue` first: wrappers
/// that expose it have already pre-multiplied `value`.
const VALUE_KEYS: &[&str] = &["rawValue", "value", "statValue"];

/// Coerce a TextAssets-like node to a plain string
pub(crate) fn text_of(v: &Value) -> Option<String> {
    match v {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Object(map) => {
            for key in ["en", "text"] {
                if let Some(Value::String(s)) = map.get(key) {
                    if !s.is_empty() {
                        return Some(s.clone());
                    }
                }
            }
            None
        }
        _ => None,
    }
}

fn value_at_path<'a>(raw: &'a Value, path: &[&str]) -> Option<&'a Value> {
    let mut node = raw;
    for key in path {
        node = node.get(key)?;
    }
    Some(node)
}

/// The stat code carried by a StatProperty-like node, as a string
fn stat_code(raw: &Value) -> Option<String> {
    CODE_KEYS.iter().find_map(|key| match raw.get(*key)? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

/// Resolve a stat's display name: explicit text label, then the code-to-label
/// table, then the raw code itself. First non-empty source wins; unmapped
/// codes fall back to the code string rather than failing.
pub fn resolve_stat_name(raw: &Value, tables: &ReferenceTables) -> String {
    for path in TEXT_LABEL_PATHS {
        if let Some(name) = value_at_path(raw, path).and_then(text_of) {
            return name;
        }
    }
    if let Some(code) = stat_code(raw) {
        if let Some(label) = tables.stat_label(&code) {
            return label.to_string();
        }
        return code;
    }
    String::new()
}

/// Names that denote percent stats even when the upstream flag is missing
pub fn is_percent_stat_name(name: &str) -> bool {
    if name.ends_with('%') {
        return true;
    }
    let k = name.to_ascii_lowercase();
    k.contains("crit rate")
        || k.contains("crit dmg")
        || k.contains("energy recharge")
        || k.contains("dmg bonus")
        || k.contains("healing bonus")
}

/// Build a [`StatValue`] from a StatProperty-like JSON node.
///
/// Percent resolution order: upstream `isPercent` flag, then the
/// known-percent-name hint, and only then the magnitude heuristic inside
/// [`normalize`]. Returns `None` for entries that are not usable, i.e. that
/// lack either a name or a numeric reading.
pub fn stat_from_property(raw: &Value, tables: &ReferenceTables) -> Option<StatValue> {
    if !raw.is_object() {
        return None;
    }
    let name = resolve_stat_name(raw, tables);
    let base = VALUE_KEYS.iter().find_map(|key| raw.get(*key).and_then(Value::as_f64));
    if name.is_empty() || base.is_none() {
        return None;
    }

    let explicit = raw
        .get("isPercent")
        .and_then(Value::as_bool)
        .or_else(|| is_percent_stat_name(&name).then_some(true));

    let (value, is_percent) = normalize(base, explicit);
    Some(StatValue {
        name,
        value,
        is_percent,
    })
}
