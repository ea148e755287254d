use crate::db::load_records;
use crate::mover::Mover;
use crate::utils::{prune_empty_dirs, validate_database, validate_target, AppConfig};
use anyhow::Result;
use colored::Colorize;
use std::path::Path;
use tracing::{info, warn};

pub fn cmd_reorg(config: &AppConfig, managed: &Path, target: &Path) -> Result<()> {
    if config.dry_run {
        println!(
            "{}",
            "This is a dry run - no changes will be applied".green()
        );
    }

    let db = load_records(managed)?;
    info!(records = db.media.len(), managed = ?managed, "database loaded");
    validate_database(managed, &db.media)?;
    validate_target(target)?;

    let mover = Mover::new(target, db.media, config.date_basis)?;
    info!(
        planned = mover.plan().len(),
        renamed = mover.plan().renamed(),
        "destinations planned"
    );
    if mover.plan().is_empty() {
        warn!("every record is ignored, only the database will be carried over");
    }
    let report = mover.perform_move(managed, config.dry_run)?;

    println!(
        "{}",
        format!(
            "{} {} files into {:?}, {} ignored",
            if config.dry_run { "Would move" } else { "Moved" },
            report.moved,
            target,
            report.skipped
        )
        .bold()
    );

    info!(
        records = report.database.media.len(),
        updated = report.database.last_updated,
        "run complete"
    );

    if config.prune_empty {
        let removed = prune_empty_dirs(managed, &report.vacated, config.dry_run)?;
        info!(directories = removed.len(), "pruned empty directories");
    }
    Ok(())
}
