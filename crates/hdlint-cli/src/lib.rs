//! hdlint command-line front end.
//!
//! - `check`: validate files once, print diagnostics, exit 1 on errors
//! - `scan`: list the heredoc regions the scanner finds
//! - `watch`: revalidate scripts as they change on disk

pub mod cli;
pub mod commands;
pub mod config;
pub mod paths;
pub mod report;
pub mod shell;
pub mod watch;

use std::process::ExitCode;

use anyhow::Result;

use cli::{Cli, Command};

/// Run a parsed command line.
pub async fn run(cli: Cli) -> Result<ExitCode> {
    match cli.command {
        Command::Check(args) => commands::check(args).await,
        Command::Scan(args) => commands::scan(args).await,
        Command::Watch(args) => watch::watch(args).await,
    }
}
