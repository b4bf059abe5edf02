//! Claim verification CLI
//!
//! # Usage
//!
//! ```bash
//! # Evaluate a claim with default thresholds
//! claim-verify evaluate --facts bundle.json --reference policy.json
//!
//! # Override thresholds from a file and the environment
//! VERIFY_REJECT_THRESHOLD=15 claim-verify --config thresholds.toml evaluate -f bundle.json -r policy.json
//!
//! # Print the effective thresholds
//! claim-verify defaults
//! ```
//!
//! # Environment Variables
//!
//! * `VERIFY_<THRESHOLD>` - Overrides any threshold, e.g. `VERIFY_FLAG_THRESHOLD`
//! * `VERIFY_LOG_LEVEL` - Log level: trace, debug, info, warn, error (default: warn)
//! * `RUST_LOG` - Takes precedence over `VERIFY_LOG_LEVEL`

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use interface_cli::commands;
use interface_cli::settings::{self, CliSettings};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "claim-verify")]
#[command(about = "Deterministic verification of motor insurance claims")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Threshold file (TOML or JSON)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Pretty-print JSON output
    #[arg(long, global = true)]
    pretty: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate one claim
    Evaluate {
        /// Fact bundle JSON
        #[arg(short, long)]
        facts: PathBuf,

        /// Policy and claim history JSON
        #[arg(short, long)]
        reference: PathBuf,

        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Print the effective thresholds
    Defaults,
}

fn main() -> Result<()> {
    // Load .env file if present (useful for local development)
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let cli_settings = CliSettings::from_env().unwrap_or_default();
    init_tracing(&cli_settings.log_level);

    let config = settings::load_thresholds(cli.config.as_deref())
        .context("Failed to load verification thresholds")?;

    match cli.command {
        Commands::Evaluate {
            facts,
            reference,
            output,
        } => {
            let result = commands::evaluate_files(&facts, &reference, &config)?;
            let json = commands::render(&result, cli.pretty)?;
            commands::emit(&json, output.as_deref())?;
        }
        Commands::Defaults => {
            let json = commands::render_thresholds(&config)?;
            commands::emit(&json, None)?;
        }
    }
    Ok(())
}

/// Initializes the tracing subscriber, logging to stderr so stdout stays JSON
///
/// # Arguments
///
/// * `log_level` - Fallback level when `RUST_LOG` is not set
fn init_tracing(log_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(log_level))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_writer(std::io::stderr),
        )
        .init();
}
