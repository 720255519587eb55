//! Character listing command handlers

use std::path::Path;

use anyhow::Result;
use teyvat::ReferenceTables;

use crate::cli::OutputFormat;
use crate::commands::load_snapshot;

/// Handle the characters command
pub fn handle(input: &Path, format: OutputFormat) -> Result<()> {
    let snapshot = load_snapshot(input)?;
    let tables = ReferenceTables::new();
    let characters = snapshot.characters(&tables);
    tracing::debug!(count = characters.len(), "normalized characters");

    if format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(&characters)?);
        return Ok(());
    }

    let player = snapshot.player();
    if let Some(nickname) = &player.nickname {
        println!(
            "{} (AR {}, WL {})",
            nickname,
            player.level.map_or("?".to_string(), |l| l.to_string()),
            player.world_level.map_or("?".to_string(), |l| l.to_string()),
        );
        println!();
    }

    if characters.is_empty() {
        println!("No characters in snapshot");
        return Ok(());
    }

    println!(
        "{:<20} {:>5} {:<8} {:>6} {:<24} {:>9}",
        "Name", "Level", "Element", "Rarity", "Weapon", "Artifacts"
    );
    for c in &characters {
        let weapon = c.weapon.as_ref().map_or("-".to_string(), |w| w.name.clone());
        println!(
            "{:<20} {:>5} {:<8} {:>6} {:<24} {:>9}",
            c.name,
            c.level,
            c.element.as_deref().unwrap_or("-"),
            c.rarity,
            weapon,
            c.artifacts.len(),
        );
    }

    Ok(())
}
