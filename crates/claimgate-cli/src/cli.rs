use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "claimgate",
    about = "Claimgate: fail-closed validation and finalization of scientific report claim graphs",
    version
)]
pub struct Cli {
    /// Path to a TOML config file (default: ./claimgate.toml, if present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Diagnostic log filter, e.g. `warn`, `debug`, `claimgate_kernel=debug`
    #[arg(long, global = true, default_value = "warn")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Parse a report at the wire boundary and run the structural validator
    Validate {
        /// Path to the report JSON document
        report: PathBuf,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Decide whether a report may be marked FINAL
    Finalize {
        /// Path to the report JSON document
        report: PathBuf,

        /// Append the decision to <dir>/finalization.jsonl
        #[arg(long)]
        log_dir: Option<PathBuf>,

        /// Run identifier recorded in audit entries
        #[arg(long)]
        run_id: Option<String>,

        /// How many unsupported claims to list individually
        #[arg(long)]
        unsupported_sample_limit: Option<usize>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Extract claim drafts from prose and LaTeX
    Extract {
        /// Path to the prose input text
        input: PathBuf,

        /// LaTeX block files, scanned before the prose (repeatable)
        #[arg(long = "latex")]
        latex: Vec<PathBuf>,

        /// Append the extraction to <dir>/claim_extraction.jsonl
        #[arg(long)]
        log_dir: Option<PathBuf>,

        /// Run identifier recorded in audit entries
        #[arg(long)]
        run_id: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}
