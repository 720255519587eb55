//! Account snapshot ingestion
//!
//! [`Snapshot`] wraps one already-fetched account payload and is the only
//! fallible boundary in the crate: JSON syntax errors surface here, and
//! everything downstream is a total transform.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::character::{map_character, Character};
use crate::reference::ReferenceTables;
use crate::stat::text_of;

#[derive(Error, Debug)]
pub enum SnapshotError {
    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),
}

/// Player profile block of a snapshot
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    pub nickname: Option<String>,
    pub level: Option<u32>,
    pub world_level: Option<u32>,
}

/// Keys the character list may hide under
const CHARACTER_LIST_KEYS: &[&str] = &["characters", "characterDetails", "avatarInfoList"];

/// One account snapshot with query capabilities
pub struct Snapshot {
    data: Value,
}

impl Snapshot {
    /// Parse a snapshot from raw JSON text
    pub fn from_json(json: &str) -> Result<Self, SnapshotError> {
        let data = serde_json::from_str(json)?;
        Ok(Snapshot { data })
    }

    /// Wrap an already-parsed JSON value
    pub fn from_value(data: Value) -> Self {
        Snapshot { data }
    }

    /// The raw payload
    pub fn raw(&self) -> &Value {
        &self.data
    }

    /// Player profile, with absent fields left unset
    pub fn player(&self) -> Player {
        let info = self
            .data
            .get("playerInfo")
            .or_else(|| self.data.get("player"));
        let Some(info) = info else {
            return Player::default();
        };
        Player {
            nickname: info.get("nickname").and_then(text_of),
            level: info.get("level").and_then(Value::as_u64).map(|l| l as u32),
            world_level: info
                .get("worldLevel")
                .or_else(|| info.get("world_level"))
                .and_then(Value::as_u64)
                .map(|l| l as u32),
        }
    }

    /// Normalize every character in the snapshot. Entries carrying neither an
    /// id nor a name are dropped; everything else maps totally.
    pub fn characters(&self, tables: &ReferenceTables) -> Vec<Character> {
        let list = CHARACTER_LIST_KEYS
            .iter()
            .find_map(|k| self.data.get(*k).and_then(Value::as_array));
        let Some(list) = list else {
            return Vec::new();
        };
        list.iter()
            .map(|raw| map_character(raw, tables))
            .filter(|c| !c.id.is_empty() || !c.name.is_empty())
            .collect()
    }
}

impl fmt::Debug for Snapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let player = self.player();
        f.debug_struct("Snapshot")
            .field("nickname", &player.nickname)
            .field("level", &player.level)
            .field("world_level", &player.world_level)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_json_rejects_malformed_text() {
        assert!(Snapshot::from_json("{not json").is_err());
    }

    #[test]
    fn test_player_profile() {
        let snapshot = Snapshot::from_value(json!({
            "playerInfo": { "nickname": "Aether", "level": 58, "worldLevel": 8 }
        }));
        let player = snapshot.player();
        assert_eq!(player.nickname.as_deref(), Some("Aether"));
        assert_eq!(player.level, Some(58));
        assert_eq!(player.world_level, Some(8));
    }

    #[test]
    fn test_player_profile_alternate_keys() {
        let snapshot = Snapshot::from_value(json!({
            "player": { "nickname": "Lumine", "world_level": 6 }
        }));
        let player = snapshot.player();
        assert_eq!(player.nickname.as_deref(), Some("Lumine"));
        assert_eq!(player.level, None);
        assert_eq!(player.world_level, Some(6));
    }

    #[test]
    fn test_characters_under_alternate_keys() {
        let tables = ReferenceTables::new();
        for key in CHARACTER_LIST_KEYS {
            let snapshot = Snapshot::from_value(json!({ (*key): [ { "name": "Amber" } ] }));
            assert_eq!(snapshot.characters(&tables).len(), 1, "key {key}");
        }
    }

    #[test]
    fn test_anonymous_entries_dropped() {
        let tables = ReferenceTables::new();
        let snapshot = Snapshot::from_value(json!({
            "characters": [ { "name": "Amber" }, {}, { "id": 123 } ]
        }));
        assert_eq!(snapshot.characters(&tables).len(), 2);
    }

    #[test]
    fn test_missing_character_list() {
        let tables = ReferenceTables::new();
        let snapshot = Snapshot::from_value(json!({ "playerInfo": {} }));
        assert!(snapshot.characters(&tables).is_empty());
        assert_eq!(snapshot.player(), Player::default());
    }
}
