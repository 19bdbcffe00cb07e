//! # trialmatch
//!
//! Command-line front end for the trialmatch-core decision core.
//!
//! Loads ontology reference data (JSON or a binary snapshot), applies the
//! manual configuration, and answers matcher queries from the shell.
//!
//! ## Usage
//!
//! ```bash
//! trialmatch --ontology doid.json status
//! trialmatch --ontology doid.json closure 3908
//! trialmatch --ontology doid.json classify 3910 --targets 1324 --name "lung cancer"
//! trialmatch --ontology doid.json --config manual.toml snapshot -o doid.tmon
//! ```

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use trialmatch::cli;

// =============================================================================
// APPLICATION ENTRY POINT
// =============================================================================

fn main() {
    // TRIALMATCH_LOG_FORMAT=json switches to machine-parseable log lines.
    let log_format = std::env::var("TRIALMATCH_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "trialmatch=info,trialmatch_core=info".into());

    match log_format.as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
                .init();
        }
    }

    let cli = cli::Cli::parse();

    if let Err(e) = cli::execute(cli) {
        tracing::error!("Error: {}", e);
        std::process::exit(1);
    }
}
