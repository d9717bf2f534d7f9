mod cli;
mod commands;
mod config;
mod support;

use clap::Parser;
use cli::{Cli, Commands};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

fn main() {
    let cli = Cli::parse();
    init_tracing(&cli.log_level);
    let config = support::load_config_or_exit(cli.config.as_deref());

    match cli.command {
        Commands::Validate { report, json } => commands::validate::run(report, json),

        Commands::Finalize {
            report,
            log_dir,
            run_id,
            unsupported_sample_limit,
            json,
        } => commands::finalize::run(commands::finalize::Args {
            report,
            log_dir: log_dir.or(config.log.dir),
            run_id,
            unsupported_sample_limit: unsupported_sample_limit
                .or(config.gate.unsupported_sample_limit),
            json,
        }),

        Commands::Extract {
            input,
            latex,
            log_dir,
            run_id,
            json,
        } => commands::extract::run(commands::extract::Args {
            input,
            latex,
            log_dir: log_dir.or(config.log.dir),
            run_id,
            json,
        }),
    }
}

/// Diagnostics go to stderr so stdout stays machine-readable.
fn init_tracing(level: &str) {
    let filter = EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();
}
