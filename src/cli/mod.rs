// src/cli/mod.rs — CLI definition (clap derive)

pub mod export;
pub mod replay;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "foresight",
    about = "Mine action patterns and suggest next steps",
    version
)]
pub struct Cli {
    /// Config file path
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Log at debug level (RUST_LOG still wins)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Replay a JSON-lines event log and print what was learned
    Replay {
        /// Replay file (one JSON record per line)
        file: PathBuf,
        /// Action key to predict from, e.g. "Add|Walls" (defaults to the most common)
        #[arg(short, long)]
        predict: Option<String>,
        /// Context snapshot (JSON) to evaluate once the replay is done
        #[arg(long)]
        context: Option<PathBuf>,
        /// How many rows to show per section
        #[arg(short, long, default_value = "5")]
        top: usize,
        /// Document name used in suggestion text
        #[arg(long, default_value = "Untitled")]
        document: String,
    },
    /// Replay a log, then export the snapshot report
    Export {
        /// Replay file (one JSON record per line)
        file: PathBuf,
        /// Output format (json, yaml)
        #[arg(long, default_value = "json")]
        format: String,
        /// Output file path (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
        #[arg(long, default_value = "Untitled")]
        document: String,
    },
    /// Print the effective configuration as TOML
    Config,
}
