//! pyfront CLI - Main entry point

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod config;

use config::FrontendConfig;

#[derive(Parser)]
#[command(name = "pyfront")]
#[command(version)]
#[command(about = "Python front end: tree translation and desugaring", long_about = None)]
struct Cli {
    /// Configuration file (defaults to ./pyfront.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Report errors without source lines
    #[arg(long, global = true)]
    no_lines: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Translate a native tree and print it desugared
    Desugar {
        /// Native tree as JSON ('-' for stdin)
        input: PathBuf,

        /// Rule to apply, in priority order (repeatable; overrides the config)
        #[arg(short, long = "rule")]
        rules: Vec<String>,

        /// Skip the check that no rule still matches
        #[arg(long)]
        no_verify: bool,
    },

    /// Translate a native tree and report any errors
    Check {
        /// Native tree as JSON ('-' for stdin)
        input: PathBuf,
    },

    /// Print node schemas
    Schema {
        /// Kind to print (all kinds when omitted)
        kind: Option<String>,
    },
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pyfront=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let cwd = std::env::current_dir()?;
    let mut config = FrontendConfig::discover(cli.config.as_deref(), &cwd)?;
    if cli.no_lines {
        config.output.show_lines = false;
    }

    match cli.command {
        Commands::Desugar {
            input,
            rules,
            no_verify,
        } => {
            if !rules.is_empty() {
                config.desugar.rules = Some(rules);
            }
            if no_verify {
                config.desugar.verify = false;
            }
            commands::desugar::execute(&input, &config)
        }
        Commands::Check { input } => commands::check::execute(&input, &config),
        Commands::Schema { kind } => commands::schema::execute(kind.as_deref()),
    }
}
