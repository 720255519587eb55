mod cli;
mod commands;
mod config;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands, OutputFormat};
use config::Config;

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.verbose);
    let format = resolve_format(cli.output)?;

    match cli.command {
        Commands::Characters { input } => {
            commands::characters::handle(&input, format)?;
        }

        Commands::Artifacts { input, character } => {
            commands::artifacts::handle(&input, character.as_deref(), format)?;
        }

        Commands::Wishes { input } => {
            commands::wishes::handle(&input, format)?;
        }

        Commands::Pity { input } => {
            commands::pity::handle(&input, format)?;
        }

        Commands::Configure { default, show } => {
            commands::configure::handle(default, show)?;
        }
    }

    Ok(())
}

fn init_tracing(verbosity: u8) {
    let default = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// CLI flag wins over the configured default; table otherwise
fn resolve_format(flag: Option<OutputFormat>) -> Result<OutputFormat> {
    if let Some(format) = flag {
        return Ok(format);
    }
    let config = Config::load()?;
    Ok(match config.get_output() {
        Some("json") => OutputFormat::Json,
        _ => OutputFormat::Table,
    })
}
