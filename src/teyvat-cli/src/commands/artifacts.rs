//! Artifact scoring command handlers

use std::path::Path;

use anyhow::Result;
use serde_json::json;
use teyvat::{scoring, Artifact, Character, ReferenceTables};

use crate::cli::OutputFormat;
use crate::commands::load_snapshot;

/// Handle the artifacts command
pub fn handle(input: &Path, character: Option<&str>, format: OutputFormat) -> Result<()> {
    let snapshot = load_snapshot(input)?;
    let tables = ReferenceTables::new();
    let mut characters = snapshot.characters(&tables);

    if let Some(filter) = character {
        characters.retain(|c| c.name.eq_ignore_ascii_case(filter));
        if characters.is_empty() {
            println!("No character named {:?} in snapshot", filter);
            return Ok(());
        }
    }

    if format == OutputFormat::Json {
        let tables_ref = &tables;
        let rows: Vec<_> = characters
            .iter()
            .flat_map(|c| c.artifacts.iter().map(move |a| scored_row(c, a, tables_ref)))
            .collect();
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    for c in &characters {
        if c.artifacts.is_empty() {
            continue;
        }
        println!("{} (Lv {})", c.name, c.level);
        for artifact in &c.artifacts {
            print_artifact(artifact, &tables);
        }
        println!();
    }

    Ok(())
}

fn scored_row(character: &Character, artifact: &Artifact, tables: &ReferenceTables) -> serde_json::Value {
    let rolls: Vec<_> = artifact
        .substats
        .iter()
        .map(|s| {
            json!({
                "name": s.name,
                "rolls": scoring::roll_estimate(&s.roll_key(), s.value, tables),
            })
        })
        .collect();
    json!({
        "character": character.name,
        "artifact": artifact,
        "critValue": scoring::crit_value(&artifact.substats),
        "score": scoring::score(&artifact.substats),
        "rollEstimates": rolls,
    })
}

fn print_artifact(artifact: &Artifact, tables: &ReferenceTables) {
    let slot = artifact.slot.map_or("-".to_string(), |s| s.to_string());
    println!(
        "  {} ({slot}, {}*, +{})",
        artifact.set_name, artifact.rarity, artifact.level
    );
    if let Some(main) = &artifact.main_stat {
        println!("    Main: {} {}", main.name, format_value(main.value, main.is_percent));
    }
    for s in &artifact.substats {
        let rolls = scoring::roll_estimate(&s.roll_key(), s.value, tables);
        println!(
            "    {} {} (~{:.1} rolls)",
            s.name,
            format_value(s.value, s.is_percent),
            rolls
        );
    }
    println!(
        "    CV {:.1}  score {:.1}",
        scoring::crit_value(&artifact.substats),
        scoring::score(&artifact.substats)
    );
}

fn format_value(value: f64, is_percent: bool) -> String {
    if is_percent {
        format!("{value:.1}%")
    } else {
        format!("{value}")
    }
}
