//! Command-line schema.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

#[derive(Parser, Debug)]
#[command(name = "hdlint")]
#[command(about = "Check JSON, YAML, XML and Python embedded in shell heredocs")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Validate every tagged heredoc in the given files
    Check(CheckArgs),
    /// List the tagged heredoc regions in the given files
    Scan(ScanArgs),
    /// Watch files or directories and revalidate on change
    Watch(WatchArgs),
}

/// Options shared by the commands that run validators.
#[derive(Args, Debug, Clone, Default)]
pub struct ConfigArgs {
    /// Config file (default: $XDG_CONFIG_HOME/hdlint/config.toml)
    #[arg(long, short = 'c', value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Skip bodies larger than this many bytes
    #[arg(long, value_name = "BYTES")]
    pub max_bytes: Option<usize>,

    /// Disable a validator by key (json, yaml, xml, python); repeatable
    #[arg(long, value_name = "KEY")]
    pub disable: Vec<String>,
}

#[derive(Args, Debug)]
pub struct CheckArgs {
    #[command(flatten)]
    pub config: ConfigArgs,

    /// Output format
    #[arg(long, short = 'f', value_enum, default_value_t = Format::Text)]
    pub format: Format,

    /// Shell scripts to check
    #[arg(required = true)]
    pub files: Vec<PathBuf>,
}

#[derive(Args, Debug)]
pub struct ScanArgs {
    /// Shell scripts to scan
    #[arg(required = true)]
    pub files: Vec<PathBuf>,
}

#[derive(Args, Debug)]
pub struct WatchArgs {
    #[command(flatten)]
    pub config: ConfigArgs,

    /// Files or directories to watch
    #[arg(required = true)]
    pub paths: Vec<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Format {
    /// `path:line:col: severity: [heredoc:key] message`
    Text,
    /// One JSON array of per-file reports
    Json,
}
