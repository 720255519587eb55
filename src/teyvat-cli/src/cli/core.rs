//! Core CLI definitions

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "teyvat")]
#[command(about = "Account snapshot and wish history inspector", long_about = None)]
pub struct Cli {
    /// Output format (overrides the configured default)
    #[arg(short, long, global = true, value_enum)]
    pub output: Option<OutputFormat>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table
    Table,
    /// Canonical JSON records
    Json,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Normalize an account snapshot and list characters
    #[command(visible_alias = "c")]
    Characters {
        /// Path to snapshot JSON
        input: PathBuf,
    },

    /// Merge and score the artifacts in a snapshot
    #[command(visible_alias = "a")]
    Artifacts {
        /// Path to snapshot JSON
        input: PathBuf,

        /// Only show one character's artifacts (case-insensitive name match)
        #[arg(short, long)]
        character: Option<String>,
    },

    /// Parse a wish-history export into canonical records
    #[command(visible_alias = "w")]
    Wishes {
        /// Path to export JSON (flat array, wrapped list, or API page)
        input: PathBuf,
    },

    /// Compute per-banner pity counters from a wish-history export
    #[command(visible_alias = "p")]
    Pity {
        /// Path to export JSON
        input: PathBuf,
    },

    /// Configure default settings
    Configure {
        /// Set the default output format
        #[arg(long, value_enum, value_name = "FORMAT")]
        default: Option<OutputFormat>,

        /// Show current configuration
        #[arg(long)]
        show: bool,
    },
}
