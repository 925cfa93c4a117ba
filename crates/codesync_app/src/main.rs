mod cli;
mod host;

use clap::Parser;
use codesync_logging::LogDestination;
use log::LevelFilter;

use cli::{Cli, Commands, RunArgs};

fn main() -> anyhow::Result<()> {
    let Cli {
        config,
        state_file,
        log_file,
        verbose,
        command,
    } = Cli::parse();

    let level = match verbose {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    let destination = match log_file {
        Some(path) => LogDestination::Both(path),
        None => LogDestination::Terminal,
    };
    codesync_logging::initialize(destination, level);

    let config = host::AppConfig::load(config.as_deref())?;
    match command.unwrap_or(Commands::Run(RunArgs::default())) {
        Commands::Run(args) => host::run(args, &state_file, config),
        Commands::Show => host::show(&state_file),
    }
}
