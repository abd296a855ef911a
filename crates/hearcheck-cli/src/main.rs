//! hearcheck CLI: plays tones at random intervals and grades Enter presses.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand, ValueEnum};

use hearcheck_core::RoundMode;

mod commands;

#[derive(Parser)]
#[command(name = "hearcheck", version, about = "High-frequency hearing check")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Player selectable from the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PlayerKind {
    Console,
    Silent,
    Audio,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one round. Press Enter when you hear a tone, `q` to stop.
    Run {
        /// Round mode: ascending, descending, random
        #[arg(long)]
        mode: Option<RoundMode>,

        /// Number of tones (defaults to the catalog size)
        #[arg(long)]
        count: Option<usize>,

        /// RNG seed for reproducible delays and random rounds
        #[arg(long)]
        seed: Option<u64>,

        /// Tone player
        #[arg(long, value_enum)]
        player: Option<PlayerKind>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,

        /// Print the round report as JSON on stdout
        #[arg(long)]
        json: bool,
    },

    /// List the tones of the active catalog
    Catalog {
        /// Catalog file (defaults to the configured or built-in catalog)
        #[arg(long)]
        catalog: Option<PathBuf>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Validate a catalog file
    Validate {
        /// Path to the catalog TOML
        #[arg(long)]
        catalog: PathBuf,
    },

    /// Create a starter config and catalog
    Init,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("hearcheck=info")),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Run {
            mode,
            count,
            seed,
            player,
            config,
            json,
        } => {
            commands::run::execute(commands::run::RunOptions {
                mode,
                count,
                seed,
                player,
                config,
                json,
            })
            .await
        }
        Commands::Catalog { catalog, config } => commands::catalog::execute(catalog, config),
        Commands::Validate { catalog } => commands::validate::execute(catalog),
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
