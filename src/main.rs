mod cli;
mod commands;
mod db;
mod error;
mod logging;
mod mover;
mod plan;
mod utils;

use anyhow::Result;
use clap::Parser;

use crate::cli::{Cli, Commands};
use crate::commands::check::cmd_check;
use crate::commands::reorg::cmd_reorg;
use crate::utils::{AppConfig, DateBasis};

fn main() -> Result<()> {
    logging::init_logger();
    let cli = Cli::parse();

    let (dry_run, prune_empty) = match &cli.command {
        Commands::Reorg {
            dry_run,
            prune_empty,
            ..
        } => (*dry_run, *prune_empty),
        Commands::Check { .. } => (true, false),
    };

    let config = AppConfig {
        dry_run,
        date_basis: if cli.local_dates {
            DateBasis::Local
        } else {
            DateBasis::Utc
        },
        prune_empty,
    };

    match &cli.command {
        Commands::Reorg {
            managed, target, ..
        } => cmd_reorg(&config, managed, target)?,
        Commands::Check { managed } => cmd_check(&config, managed)?,
    }

    Ok(())
}
