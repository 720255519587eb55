//! Pity command handlers

use std::path::Path;

use anyhow::Result;
use teyvat::{compute_pity, parse_wishes, ReferenceTables};

use crate::cli::OutputFormat;
use crate::commands::load_json;

/// Handle the pity command
pub fn handle(input: &Path, format: OutputFormat) -> Result<()> {
    let raw = load_json(input)?;
    let tables = ReferenceTables::new();
    let wishes = parse_wishes(&raw, &tables);
    let pity = compute_pity(&wishes);

    if format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(&pity)?);
        return Ok(());
    }

    println!("Pity since last five-star ({} pulls total)", wishes.len());
    println!("  standard:  {}", pity.standard);
    println!("  character: {}", pity.character);
    println!("  weapon:    {}", pity.weapon);

    Ok(())
}
