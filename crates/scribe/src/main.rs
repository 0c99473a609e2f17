//! Scribe CLI - extract structured JSON from an image with Gemini.
//!
//! # Usage
//!
//! ```bash
//! # Extract from the bundled sample image
//! scribe
//!
//! # Extract from a specific image
//! scribe scans/receipt.jpg
//!
//! # View configuration
//! scribe config show
//! ```
//!
//! Credentials and sampling parameters come from the environment (or a
//! `.env` file): `GEMINI_API_KEY`, `GEMINI_MODEL`, `TEMPERATURE`, `TOP_P`.

use clap::{Parser, Subcommand};
use std::process::ExitCode;

mod cli;
mod logging;

/// Scribe - extract structured JSON from an image with a multimodal model.
#[derive(Parser, Debug)]
#[command(name = "scribe")]
#[command(author, version, about, long_about = None)]
#[command(args_conflicts_with_subcommands = true)]
struct Cli {
    #[command(flatten)]
    extract: cli::extract::ExtractArgs,

    /// Enable verbose (debug) logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output logs in JSON format
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available commands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// View and manage configuration
    Config(cli::config::ConfigArgs),
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Logging isn't initialized yet, so config warnings go through eprintln.
    let loaded = scribe_core::Config::load();
    let log_config = match &loaded {
        Ok(config) => config.clone(),
        Err(e) => {
            eprintln!(
                "Warning: Failed to load config: {e}\n  \
                 Using default logging settings. Check your config file with `scribe config path`."
            );
            scribe_core::Config::default()
        }
    };
    logging::init_from_config(&log_config, cli.verbose, cli.json_logs);

    tracing::debug!("Scribe v{}", scribe_core::VERSION);

    let outcome = match cli.command {
        Some(Commands::Config(args)) => cli::config::execute(args).await,
        None => match loaded {
            Ok(config) => cli::extract::execute(cli.extract, config).await,
            Err(e) => Err(scribe_core::OcrError::from(e).into()),
        },
    };

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
