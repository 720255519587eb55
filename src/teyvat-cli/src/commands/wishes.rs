//! Wish history command handlers

use std::path::Path;

use anyhow::Result;
use teyvat::{parse_wishes, Rank, ReferenceTables};

use crate::cli::OutputFormat;
use crate::commands::load_json;

/// Handle the wishes command
pub fn handle(input: &Path, format: OutputFormat) -> Result<()> {
    let raw = load_json(input)?;
    let tables = ReferenceTables::new();
    let wishes = parse_wishes(&raw, &tables);
    tracing::debug!(count = wishes.len(), "parsed wishes");

    if format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(&wishes)?);
        return Ok(());
    }

    if wishes.is_empty() {
        println!("No pulls in export");
        return Ok(());
    }

    println!("{:<20} {:>4} {:<9} {:<28}", "Time", "Rank", "Banner", "Name");
    for w in &wishes {
        println!(
            "{:<20} {:>4} {:<9} {:<28}",
            w.time.format("%Y-%m-%d %H:%M:%S"),
            w.rank_type.to_string(),
            w.banner.to_string(),
            w.name,
        );
    }

    let fives = wishes.iter().filter(|w| w.rank_type == Rank::Five).count();
    let fours = wishes.iter().filter(|w| w.rank_type == Rank::Four).count();
    println!();
    println!("{} pulls ({} five-star, {} four-star)", wishes.len(), fives, fours);

    Ok(())
}
