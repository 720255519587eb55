//! # teyvat
//!
//! Account-data normalization and derived-metrics library for game-account
//! dashboards.
//!
//! This library provides functionality to:
//! - Reconcile inconsistent upstream snapshot shapes into canonical
//!   character, weapon, and artifact records
//! - Normalize percent-or-flat stat readings onto one scale
//! - Score artifacts (crit value, roll estimates, composite quality)
//! - Parse arbitrary wish-history exports into canonical pull records
//! - Fold a pull history into per-banner pity counters
//!
//! Every transform is pure and total: fixed read-only lookup tables in, JSON
//! values in, canonical records out, with documented defaults instead of
//! errors for incomplete input. The only fallible call is JSON ingestion on
//! [`Snapshot::from_json`].
//!
//! ## Example
//!
//! ```no_run
//! use std::fs;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let tables = teyvat::ReferenceTables::new();
//!
//! let snapshot = teyvat::Snapshot::from_json(&fs::read_to_string("snapshot.json")?)?;
//! for character in snapshot.characters(&tables) {
//!     for artifact in &character.artifacts {
//!         println!(
//!             "{} {}: CV {:.1}",
//!             character.name,
//!             artifact.set_name,
//!             teyvat::scoring::crit_value(&artifact.substats),
//!         );
//!     }
//! }
//!
//! let export: serde_json::Value = serde_json::from_str(&fs::read_to_string("wishes.json")?)?;
//! let wishes = teyvat::parse_wishes(&export, &tables);
//! println!("{:?}", teyvat::compute_pity(&wishes));
//! # Ok(())
//! # }
//! ```

pub mod artifact;
pub mod character;
pub mod pity;
pub mod reference;
pub mod scoring;
pub mod snapshot;
pub mod stat;
pub mod wish;

// Re-export commonly used items
#[doc(inline)]
pub use artifact::{merge_artifact, Artifact, Slot};
#[doc(inline)]
pub use character::{map_character, map_weapon, Character, Talent, Talents, Weapon};
#[doc(inline)]
pub use pity::{compute_pity, PityState};
#[doc(inline)]
pub use reference::ReferenceTables;
#[doc(inline)]
pub use scoring::{crit_value, roll_estimate, score};
#[doc(inline)]
pub use snapshot::{Player, Snapshot, SnapshotError};
#[doc(inline)]
pub use stat::{normalize, stat_from_property, StatValue};
#[doc(inline)]
pub use wish::{parse_wishes, Banner, ItemKind, Rank, Wish};
