//! Configuration command handlers
//!
//! Handles the `configure` subcommand for setting up teyvat CLI defaults.

use anyhow::Result;

use crate::cli::OutputFormat;
use crate::config::Config;

/// Handle the configure command
pub fn handle(default: Option<OutputFormat>, show: bool) -> Result<()> {
    let mut config = Config::load()?;

    if show {
        show_config(&config)?;
        return Ok(());
    }

    if let Some(format) = default {
        set_output(&mut config, format)?;
    } else {
        show_usage();
    }

    Ok(())
}

/// Display current configuration
fn show_config(config: &Config) -> Result<()> {
    if let Some(output) = config.get_output() {
        println!("Default output: {}", output);
    } else {
        println!("No default output configured (table is used)");
    }

    if let Ok(path) = Config::config_path() {
        println!("Config file: {}", path.display());
    }

    Ok(())
}

/// Set the default output format in configuration
fn set_output(config: &mut Config, format: OutputFormat) -> Result<()> {
    let name = match format {
        OutputFormat::Table => "table",
        OutputFormat::Json => "json",
    };
    config.set_output(name.to_string());
    config.save()?;

    println!("Default output configured: {}", name);
    if let Ok(path) = Config::config_path() {
        println!("Config saved to: {}", path.display());
    }

    Ok(())
}

/// Show usage help for the configure command
fn show_usage() {
    println!("Usage: teyvat configure --default table|json");
    println!("   or: teyvat configure --show");
}
