use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "docsearch")]
#[command(about = "Incremental search over a generated API-reference index", long_about = None)]
pub struct Cli {
    /// Path to a TOML config file.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Directory holding the shard assets (overrides config).
    #[arg(short = 'd', long)]
    pub shard_dir: Option<PathBuf>,

    /// Maximum number of result groups to show (overrides config).
    #[arg(short = 'n', long)]
    pub limit: Option<usize>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run a single query and print the ranked results.
    Query { text: String },
    /// Read queries line by line from stdin, presenting results as they
    /// resolve. An empty line clears; EOF exits.
    Interactive,
}
