//! Command-line definitions for the codesync host.

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};

/// Mirrors a served source file into a web IDE page.
#[derive(Parser)]
#[command(name = "codesync")]
#[command(about = "Mirror a served source file into a web IDE page")]
#[command(version)]
pub(crate) struct Cli {
    /// RON configuration file (defaults to ./codesync.ron when present)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// File holding the persisted popup state
    #[arg(long, global = true, default_value = ".codesync_state.json")]
    pub state_file: PathBuf,

    /// Also write logs to this file
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Run the sync loop against the console page (default)
    Run(RunArgs),

    /// Print the persisted state
    Show,
}

#[derive(Args, Debug, Default, Clone, PartialEq, Eq)]
pub(crate) struct RunArgs {
    /// Source URL to poll
    #[arg(long)]
    pub url: Option<String>,

    /// Enable sync
    #[arg(long, conflicts_with = "no_sync")]
    pub sync: bool,

    /// Disable sync
    #[arg(long)]
    pub no_sync: bool,

    /// Enable autoplay
    #[arg(long, conflicts_with = "no_autoplay")]
    pub autoplay: bool,

    /// Disable autoplay
    #[arg(long)]
    pub no_autoplay: bool,

    /// Also write every new program to this file
    #[arg(long)]
    pub mirror_to: Option<PathBuf>,
}

impl RunArgs {
    pub fn sync_toggle(&self) -> Option<bool> {
        toggle(self.sync, self.no_sync)
    }

    pub fn autoplay_toggle(&self) -> Option<bool> {
        toggle(self.autoplay, self.no_autoplay)
    }
}

fn toggle(on: bool, off: bool) -> Option<bool> {
    match (on, off) {
        (true, _) => Some(true),
        (_, true) => Some(false),
        _ => None,
    }
}
