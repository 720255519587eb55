//! Command handlers for the teyvat CLI
//!
//! Each subcommand has its own module with handler functions.

pub mod artifacts;
pub mod characters;
pub mod configure;
pub mod pity;
pub mod wishes;

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde_json::Value;
use teyvat::Snapshot;

/// Read and parse an account snapshot file
pub fn load_snapshot(path: &Path) -> Result<Snapshot> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read snapshot from {}", path.display()))?;
    Snapshot::from_json(&text)
        .with_context(|| format!("Failed to parse snapshot JSON in {}", path.display()))
}

/// Read and parse an arbitrary JSON file
pub fn load_json(path: &Path) -> Result<Value> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&text)
        .with_context(|| format!("Failed to parse JSON in {}", path.display()))
}
