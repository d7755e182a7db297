use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use vcs_refs::RefKind;

#[derive(Parser, Debug)]
#[command(
    name = "vcstate",
    about = "Inspect remote names and working-copy state of a vcstate repository",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,

    /// TOML configuration file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Show the bookmarks and branch heads recorded per remote
    Remotenames(RemotenamesArgs),
    /// Inspect or edit the working-copy file state table
    Dirstate(DirstateArgs),
    /// Inspect or edit recorded copies and renames
    Copies(CopiesArgs),
}

#[derive(Args, Debug)]
pub struct RemotenamesArgs {
    /// Repository metadata directory
    #[arg(long, default_value = ".vc")]
    pub repo: PathBuf,
    /// Only show one kind of name
    #[arg(long, value_parser = parse_kind)]
    pub kind: Option<RefKind>,
}

fn parse_kind(s: &str) -> Result<RefKind, String> {
    s.parse().map_err(|e: vcs_refs::RefError| e.to_string())
}

#[derive(Args, Debug)]
pub struct DirstateArgs {
    /// SQLite database holding the state
    #[arg(long)]
    pub db: PathBuf,
    #[command(subcommand)]
    pub action: DirstateAction,
}

#[derive(Subcommand, Debug)]
pub enum DirstateAction {
    /// List every tracked file
    List {
        /// Only files a status check must look at again
        #[arg(long)]
        pending: bool,
    },
    /// Show one file's entry
    Get { path: String },
    /// Forget a file
    Rm { path: String },
    /// Forget every file
    Clear,
}

#[derive(Args, Debug)]
pub struct CopiesArgs {
    /// SQLite database holding the copy map
    #[arg(long)]
    pub db: PathBuf,
    #[command(subcommand)]
    pub action: CopiesAction,
}

#[derive(Subcommand, Debug)]
pub enum CopiesAction {
    /// List destination and source pairs
    List,
    /// Record that DEST was copied from SOURCE
    Set { dest: String, source: String },
    /// Forget the copy record for DEST
    Rm { dest: String },
}
