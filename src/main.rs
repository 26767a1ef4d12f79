// src/main.rs — Foresight entry point

use clap::Parser;

use foresight::assistant::Assistant;
use foresight::cli::{Cli, Commands};
use foresight::infra::config::Config;
use foresight::infra::{errors, logger};

fn main() {
    if let Err(e) = run() {
        eprintln!("error: {e}");
        std::process::exit(errors::exit_code(&e));
    }
}

fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load config (falls back to defaults if no config.toml)
    let config = match cli.config {
        Some(ref path) => Config::load_from(path)?,
        None => Config::load()?,
    };

    logger::init_logging(logger::effective_level(&config.logging.level, cli.verbose));

    match cli.command {
        Commands::Config => {
            print!("{}", toml::to_string_pretty(&config)?);
            Ok(())
        }
        Commands::Replay {
            file,
            predict,
            context,
            top,
            document,
        } => {
            let assistant = Assistant::new(&config);
            foresight::cli::replay::run_replay(
                &assistant,
                &file,
                &document,
                context.as_deref(),
                predict.as_deref(),
                top,
            )
        }
        Commands::Export {
            file,
            format,
            output,
            document,
        } => {
            let assistant = Assistant::new(&config);
            foresight::cli::export::run_export(
                &assistant,
                &file,
                &document,
                &format,
                output.as_deref(),
            )
        }
    }
}
