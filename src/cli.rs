use std::path::PathBuf;

use clap::Parser;

/// Create a `.env` from the project's `.env.example` (or `.env.template`,
/// `.env.sample`, `.env.dist`) and fill in its placeholders.
#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub(crate) struct Cli {
    /// Workspace root to search for templates. Defaults to the current directory
    pub(crate) root: Option<PathBuf>,

    /// Log debug output to stderr
    #[arg(short, long)]
    pub(crate) verbose: bool,

    /// Only copy the template; skip filling placeholders interactively
    #[arg(long)]
    pub(crate) plain: bool,
}
