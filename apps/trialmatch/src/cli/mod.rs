//! # trialmatch CLI Module
//!
//! ## Available Commands
//!
//! - `status` - Show ontology and configuration summary
//! - `closure` - Print the ancestor closure of codes
//! - `classify` - Judge whether a tumor belongs to target types
//! - `tiers` - Three-tier pass/fail/warn classification
//! - `snapshot` - Write a binary ontology snapshot

mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use trialmatch_core::{OntologyGraph, TrialMatchError};

pub use commands::*;

// =============================================================================
// CLI STRUCTURE
// =============================================================================

/// trialmatch - disease ontology matching for trial eligibility
#[derive(Parser, Debug)]
#[command(name = "trialmatch")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress the summary header
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Ontology reference file (JSON or snapshot)
    #[arg(short = 'O', long, global = true, default_value = "ontology.json")]
    pub ontology: PathBuf,

    /// Manual configuration overrides (TOML)
    #[arg(short = 'C', long, global = true)]
    pub config: Option<PathBuf>,

    /// Output in JSON format (for programmatic access)
    #[arg(long, global = true)]
    pub json_mode: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show ontology status
    Status,

    /// Print the ancestor closure of codes
    Closure {
        /// Classification codes (comma-separated)
        #[arg(value_delimiter = ',', required = true)]
        codes: Vec<String>,
    },

    /// Judge whether a tumor belongs to target types
    Classify {
        /// Tumor classification codes (comma-separated)
        #[arg(value_delimiter = ',', required = true)]
        codes: Vec<String>,

        /// Target codes (comma-separated)
        #[arg(short, long, value_delimiter = ',', required = true)]
        targets: Vec<String>,

        /// Free-text tumor name
        #[arg(short, long, default_value = "")]
        name: String,

        /// Specific term the tumor name must mention
        #[arg(short = 's', long)]
        query: Option<String>,
    },

    /// Three-tier pass/fail/warn classification
    Tiers {
        /// Tumor classification codes (comma-separated)
        #[arg(value_delimiter = ',', required = true)]
        codes: Vec<String>,

        /// Codes that pass (comma-separated)
        #[arg(long, value_delimiter = ',')]
        pass: Vec<String>,

        /// Codes that fail (comma-separated)
        #[arg(long, value_delimiter = ',')]
        fail: Vec<String>,

        /// Codes that warn (comma-separated)
        #[arg(long, value_delimiter = ',')]
        warn: Vec<String>,
    },

    /// Write a binary ontology snapshot
    Snapshot {
        /// Output file path
        #[arg(short, long)]
        output: PathBuf,
    },
}

// =============================================================================
// COMMAND EXECUTION
// =============================================================================

/// Load the ontology named by the global flags.
///
/// Without `--config`, a snapshot keeps its embedded configuration and a
/// JSON reference gets the built-in defaults.
pub fn load_graph(cli: &Cli) -> Result<OntologyGraph, TrialMatchError> {
    let config = cli
        .config
        .as_deref()
        .map(|path| crate::config::load_manual_config(Some(path)))
        .transpose()?;
    crate::reference::load_ontology(&cli.ontology, config)
}

/// Execute the CLI with parsed arguments.
pub fn execute(cli: Cli) -> Result<(), TrialMatchError> {
    let graph = load_graph(&cli)?;
    let output = Output {
        json_mode: cli.json_mode,
        verbose: cli.verbose,
        quiet: cli.quiet,
    };

    match cli.command {
        Some(Commands::Closure { codes }) => cmd_closure(&graph, output, &codes),
        Some(Commands::Classify {
            codes,
            targets,
            name,
            query,
        }) => cmd_classify(&graph, output, &codes, &targets, &name, query.as_deref()),
        Some(Commands::Tiers {
            codes,
            pass,
            fail,
            warn,
        }) => cmd_tiers(&graph, output, &codes, &pass, &fail, &warn),
        Some(Commands::Snapshot { output: path }) => cmd_snapshot(&graph, output, &path),
        Some(Commands::Status) | None => cmd_status(&graph, output, &cli.ontology),
    }
}
