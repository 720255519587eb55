//! Artifact quality scoring
//!
//! Derives roll-efficiency and composite quality numbers from a canonical
//! substat set. The composite is a fixed linear blend; no attempt is made to
//! normalize weights across character roles.

use crate::reference::ReferenceTables;
use crate::stat::StatValue;

/// Composite score weights
const WEIGHT_CRIT_VALUE: f64 = 0.7;
const WEIGHT_ATK_PERCENT: f64 = 0.5;
const WEIGHT_ENERGY_RECHARGE: f64 = 0.3;
const WEIGHT_ELEMENTAL_MASTERY: f64 = 0.05;

/// Value of the first substat matching any of the canonical keys, 0 if absent
fn stat_of(substats: &[StatValue], keys: &[&str], percent: bool) -> f64 {
    substats
        .iter()
        .find(|s| {
            let (name, is_percent) = s.identity();
            is_percent == percent && keys.contains(&name.as_str())
        })
        .map(|s| s.value)
        .unwrap_or(0.0)
}

/// Crit value: `2 x CRIT Rate% + CRIT DMG%`, with absent stats counting as 0
pub fn crit_value(substats: &[StatValue]) -> f64 {
    let cr = stat_of(substats, &["crit rate"], true);
    let cd = stat_of(substats, &["crit dmg"], true);
    2.0 * cr + cd
}

/// Number of maximum-size rolls the given total represents.
///
/// Unknown stat names return the value itself (a ratio against 1), which is
/// clearly not a roll count; that pass-through is a known limitation of the
/// fixed table.
pub fn roll_estimate(name: &str, value: f64, tables: &ReferenceTables) -> f64 {
    match tables.max_roll(name) {
        Some(max) if max > 0.0 => value / max,
        _ => value,
    }
}

/// Fixed linear composite:
/// `0.7 x crit value + 0.5 x ATK% + 0.3 x Energy Recharge% + 0.05 x EM`
pub fn score(substats: &[StatValue]) -> f64 {
    let cv = crit_value(substats);
    let atk = stat_of(substats, &["atk"], true);
    let er = stat_of(substats, &["energy recharge", "er"], true);
    let em = stat_of(substats, &["elemental mastery", "em"], false);
    WEIGHT_CRIT_VALUE * cv
        + WEIGHT_ATK_PERCENT * atk
        + WEIGHT_ENERGY_RECHARGE * er
        + WEIGHT_ELEMENTAL_MASTERY * em
}
