//! hdlint entry point.
//!
//! ```bash
//! hdlint check deploy.sh
//! RUST_LOG=hdlint_kernel=debug hdlint watch scripts/
//! ```

use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use hdlint_cli::cli::Cli;

#[tokio::main]
async fn main() -> Result<ExitCode> {
    // Diagnostics go to stdout, logs to stderr (respects RUST_LOG)
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env())
        .init();

    hdlint_cli::run(Cli::parse()).await
}
