use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "tdiff",
    about = "tdiff -- Two-way and three-way directory comparison",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,

    /// TOML file with exclusion patterns and comparison settings
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Leave out entries matching this gitignore-style pattern (repeatable)
    #[arg(long, global = true)]
    pub exclude: Vec<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Show every entry that differs, as a tree
    Compare(TreeArgs),
    /// Show counts of differing entries
    Status(TreeArgs),
}

#[derive(Args)]
pub struct TreeArgs {
    /// Left side of the comparison
    pub left: PathBuf,
    /// Right side of the comparison
    pub right: PathBuf,
    /// Common ancestor; enables three-way comparison
    #[arg(short, long)]
    pub ancestor: Option<PathBuf>,
}
