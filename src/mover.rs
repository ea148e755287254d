use crate::db::{Database, Records, DB_FILE_NAME};
use crate::error::ReorgError;
use crate::plan::Plan;
use crate::utils::DateBasis;
use anyhow::{Context, Result};
use colored::Colorize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

#[derive(Debug)]
pub struct MoveReport {
    pub moved: usize,
    /// Source files that were moved (or would be, in a dry run).
    pub vacated: Vec<PathBuf>,
    pub skipped: usize,
    pub database: Database,
}

/// Owns the working copy of the records for one run. Planning happens in
/// `new`; `perform_move` consumes the mover and hands the updated records back.
pub struct Mover {
    records: Records,
    plan: Plan,
    target: PathBuf,
    basis: DateBasis,
}

impl Mover {
    pub fn new(target: &Path, records: Records, basis: DateBasis) -> Result<Self> {
        let plan = Plan::build(&records, basis)?;
        Ok(Mover {
            records,
            plan,
            target: target.to_path_buf(),
            basis,
        })
    }

    pub fn plan(&self) -> &Plan {
        &self.plan
    }

    /// Moves every eligible file from `managed` into the target layout, then
    /// writes the rewritten database to `<target>/pic-man.db`. The first
    /// failure aborts the run; files already moved stay where they are.
    ///
    /// In a dry run nothing on disk changes. Intended moves and the database
    /// that would have been written are printed instead.
    pub fn perform_move(self, managed: &Path, dry_run: bool) -> Result<MoveReport> {
        let Mover {
            mut records,
            plan,
            target,
            basis,
        } = self;
        let mut vacated = Vec::new();
        let mut skipped = 0;

        for (hash, record) in records.iter_mut() {
            if record.is_ignored_media() {
                skipped += 1;
                continue;
            }
            let from = managed.join(&record.stored_at);
            let relative_dest = plan
                .destination_for(hash)
                .ok_or_else(|| ReorgError::MissingDestination {
                    hash: hash.clone(),
                    from: from.clone(),
                })?;
            let dest = target.join(relative_dest);

            if dry_run {
                let when = basis
                    .date_of(record.earliest)
                    .map(|d| d.to_string())
                    .unwrap_or_default();
                println!(
                    "{}",
                    format!(
                        "DRY-RUN: Would move {:?} to {:?} for {} of date {}",
                        from, dest, record.earliest, when
                    )
                    .green()
                );
            } else {
                move_file(&from, &dest)?;
                debug!(from = ?from, to = ?dest, "moved");
            }

            record.stored_at = relative_dest.to_string();
            vacated.push(from);
        }

        let database = Database::new(records);
        if dry_run {
            let yaml = database.to_yaml()?;
            println!(
                "{}",
                format!(
                    "DRY-RUN: Would write {:?}:",
                    target.join(DB_FILE_NAME)
                )
                .green()
            );
            println!("{}", yaml);
        } else {
            database.write_to(&target)?;
            info!(path = ?target.join(DB_FILE_NAME), "database written");
        }

        Ok(MoveReport {
            moved: vacated.len(),
            vacated,
            skipped,
            database,
        })
    }
}

fn move_file(from: &Path, dest: &Path) -> Result<()> {
    if dest.symlink_metadata().is_ok() {
        return Err(ReorgError::DestinationExists(dest.to_path_buf()).into());
    }
    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent).with_context(|| format!("Failed to create {:?}", parent))?;
    }
    fs::rename(from, dest).with_context(|| format!("Error moving {:?} to {:?}", from, dest))
}
