//! Binary entry point for linkgraph.
//!
//! This binary provides the CLI interface for materializing parses into an
//! atom store.

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(missing_docs)]
// Allow print_stderr in main binary for CLI output
#![allow(clippy::print_stderr)]
#![allow(clippy::print_stdout)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::multiple_crate_versions)]

use anyhow::Context;
use clap::{Parser, Subcommand};
use linkgraph::cli::{ConfigCommand, ParseCommand, ShowCommand, StatsCommand};
use linkgraph::config::{CONFIG_PATH_ENV, LinkgraphConfig};
use linkgraph::observability::{self, ObservabilityHandle};
use linkgraph::parser::FixtureParser;
use linkgraph::storage::open_store;
use linkgraph::{Dictionary, ParseService};
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

/// Linkgraph - materializes link-grammar parses into a content-addressed graph.
#[derive(Parser)]
#[command(name = "linkgraph")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to configuration file.
    #[arg(short, long, global = true, env = CONFIG_PATH_ENV)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands.
#[derive(Subcommand)]
enum Commands {
    /// Parse a sentence and materialize its linkages.
    Parse {
        /// The sentence text.
        sentence: String,

        /// Dictionary language (overrides configuration).
        #[arg(short, long)]
        dictionary: Option<String>,
    },

    /// Show atom counts.
    Stats {
        /// Print JSON instead of text.
        #[arg(long)]
        json: bool,
    },

    /// Show one atom by handle.
    Show {
        /// The 64-character hex handle.
        handle: String,
    },

    /// Manage configuration.
    Config {
        /// Show current configuration.
        #[arg(long)]
        show: bool,
    },
}

/// Main entry point.
fn main() -> ExitCode {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    let config = match load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {e:#}");
            return ExitCode::FAILURE;
        },
    };

    let observability = match observability::init_from_config(&config.observability, cli.verbose)
    {
        Ok(handle) => handle,
        Err(e) => {
            eprintln!("Failed to initialize observability: {e}");
            return ExitCode::FAILURE;
        },
    };

    let result = run_command(cli, &config);
    render_metrics(&observability);

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        },
    }
}

/// Runs the selected command.
fn run_command(cli: Cli, config: &LinkgraphConfig) -> anyhow::Result<()> {
    let mut out = io::stdout().lock();

    match cli.command {
        Commands::Parse {
            sentence,
            dictionary,
        } => {
            let dictionary =
                Dictionary::new(dictionary.unwrap_or_else(|| config.parser.dictionary.clone()));
            let fixture = config.parser.fixture_path.as_ref().context(
                "no parser fixture configured; set parser.fixture_path or LINKGRAPH_FIXTURE_PATH",
            )?;
            let parser = FixtureParser::from_path(fixture)?;
            let store = open_store(&config.store)?;
            let service = ParseService::new(parser, store)?;
            ParseCommand::new(sentence, dictionary).run(&service, &mut out)?;
        },

        Commands::Stats { json } => {
            let store = open_store(&config.store)?;
            StatsCommand::new(json).run(store.as_ref(), &mut out)?;
        },

        Commands::Show { handle } => {
            let store = open_store(&config.store)?;
            ShowCommand::parse(&handle)?.run(store.as_ref(), &mut out)?;
        },

        Commands::Config { show } => ConfigCommand::new(show).run(config, &mut out)?,
    }

    Ok(())
}

/// Loads configuration and applies environment overrides.
fn load_config(path: Option<&std::path::Path>) -> anyhow::Result<LinkgraphConfig> {
    let config = match path {
        Some(path) => LinkgraphConfig::load_from_file(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => LinkgraphConfig::load_default(),
    };

    Ok(config.with_env_overrides())
}

/// Prints recorded metrics to stderr when metrics are enabled.
fn render_metrics(observability: &ObservabilityHandle) {
    if let Some(metrics) = observability.metrics() {
        eprintln!("{}", metrics.render());
    }
}
