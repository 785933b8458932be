//! passpilot CLI: the user-facing command-line interface.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

use passpilot_core::error::AnalyzerError;

mod commands;
mod inputs;

use commands::{Format, GlobalArgs};
use inputs::PassArgs;

#[derive(Parser)]
#[command(name = "passpilot", version, about = "Exam question corpus analyzer")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file path
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Directory of JSON question files (overrides config)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Output format: text, json
    #[arg(long, global = true, default_value = "text")]
    format: Format,

    /// Also save the result as a JSON report at this path
    #[arg(long, global = true)]
    save: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show analyzer readiness and corpus size
    Health,

    /// Find past questions similar to a query
    Query {
        /// Query text
        #[arg(long)]
        query: String,

        /// Minimum similarity in [0, 1] (default from config: 0.5)
        #[arg(long, allow_negative_numbers = true)]
        threshold: Option<f32>,

        /// Maximum number of results (default from config: 20)
        #[arg(long, allow_negative_numbers = true)]
        top_k: Option<i64>,
    },

    /// Plan which topics to study to pass
    Strategy {
        #[command(flatten)]
        pass: PassArgs,
    },

    /// Estimate pass probability with a Monte Carlo simulation
    Simulate {
        #[command(flatten)]
        pass: PassArgs,

        /// Number of random trials (default from config: 10000)
        #[arg(long)]
        trials: Option<u32>,

        /// RNG seed for reproducible runs
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Topic frequency analysis
    Topics {
        /// Minimum number of occurrences (default from config: 2)
        #[arg(long)]
        min_frequency: Option<usize>,
    },

    /// Corpus-wide statistics
    Stats,

    /// Load the question files and report malformed records
    Validate,

    /// Create starter config and example question file
    Init,
}

fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                tracing_subscriber::EnvFilter::new("passpilot=info,passpilot_core=info")
            }),
        )
        .init();

    let cli = Cli::parse();

    let global = GlobalArgs {
        config: cli.config,
        data_dir: cli.data_dir,
        format: cli.format,
        save: cli.save,
    };

    let result = match cli.command {
        Commands::Health => commands::health::execute(&global),
        Commands::Query {
            query,
            threshold,
            top_k,
        } => commands::query::execute(&global, query, threshold, top_k),
        Commands::Strategy { pass } => commands::strategy::execute(&global, pass),
        Commands::Simulate { pass, trials, seed } => {
            commands::simulate::execute(&global, pass, trials, seed)
        }
        Commands::Topics { min_frequency } => commands::topics::execute(&global, min_frequency),
        Commands::Stats => commands::stats::execute(&global),
        Commands::Validate => commands::validate::execute(&global),
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(exit_code(&e));
    }
}

/// Not ready → 3, bad input → 2, anything else → 1.
fn exit_code(e: &anyhow::Error) -> i32 {
    match e.downcast_ref::<AnalyzerError>() {
        Some(AnalyzerError::NotReady(_)) => 3,
        Some(AnalyzerError::InvalidInput(_)) => 2,
        _ => 1,
    }
}
