use crate::db::Records;
use crate::error::ReorgError;
use anyhow::{Context, Result};
use chrono::{DateTime, Datelike, Local, NaiveDate};
use colored::Colorize;
use regex::Regex;
use std::cmp::Reverse;
use std::collections::BTreeSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

// --- Config ---

/// Which calendar a capture timestamp is read in when picking its day directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateBasis {
    Utc,
    Local,
}

impl DateBasis {
    pub fn date_of(&self, millis: i64) -> Option<NaiveDate> {
        let utc = DateTime::from_timestamp_millis(millis)?;
        Some(match self {
            DateBasis::Utc => utc.date_naive(),
            DateBasis::Local => utc.with_timezone(&Local).date_naive(),
        })
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub dry_run: bool,
    pub date_basis: DateBasis,
    pub prune_empty: bool,
}

// --- Path helpers ---

/// Treats both `/` and `\` as separators, whatever platform recorded the path.
pub fn normalize_separators(path: &str) -> String {
    path.replace('\\', "/")
}

pub fn file_name_of(path: &str) -> Option<String> {
    let normalized = normalize_separators(path);
    normalized
        .rsplit('/')
        .next()
        .filter(|name| !name.is_empty())
        .map(|name| name.to_string())
}

/// Splits `name` into stem and extension (dot included). A leading dot does not
/// start an extension.
pub fn split_extension(name: &str) -> (&str, &str) {
    match name.rfind('.') {
        Some(idx) if idx > 0 => (&name[..idx], &name[idx..]),
        _ => (name, ""),
    }
}

pub fn day_dir(date: NaiveDate) -> String {
    format!("{:04}/{:02}/{:02}", date.year(), date.month(), date.day())
}

// --- Pre-flight ---

pub fn validate_target(target: &Path) -> Result<()> {
    let exists = target
        .try_exists()
        .with_context(|| format!("Failed to stat target {:?}", target))?;
    if exists || target.symlink_metadata().is_ok() {
        return Err(ReorgError::TargetExists(target.to_path_buf()).into());
    }
    Ok(())
}

/// Confirms there is something to migrate and that every eligible record
/// points at a regular file under `managed`.
pub fn validate_database(managed: &Path, records: &Records) -> Result<()> {
    if records.is_empty() {
        return Err(ReorgError::EmptyDatabase(managed.to_path_buf()).into());
    }

    let sha256 = Regex::new(r"^[0-9A-Fa-f]{64}$")?;

    for (hash, rec) in records {
        if !sha256.is_match(hash) {
            warn!(hash = %hash, "record key is not a sha256 hex digest");
        }
        if !rec.sha_key.is_empty() && rec.sha_key != *hash {
            warn!(hash = %hash, sha256 = %rec.sha_key, "record key differs from its sha256 field");
        }
        if rec.is_ignored_media() {
            debug!(hash = %hash, "skipping ignored record");
            continue;
        }
        if rec.paths.is_empty() {
            return Err(ReorgError::NoOriginalPath(hash.clone()).into());
        }

        let src = managed.join(&rec.stored_at);
        match fs::metadata(&src) {
            Ok(details) if details.is_dir() => {
                return Err(ReorgError::NotAFile {
                    hash: hash.clone(),
                    path: src,
                }
                .into())
            }
            Ok(_) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(ReorgError::MissingSource {
                    hash: hash.clone(),
                    path: src,
                }
                .into())
            }
            Err(e) => {
                return Err(e)
                    .with_context(|| format!("Failed to stat {:?} for record {}", src, hash))
            }
        }
    }
    Ok(())
}

// --- Cleanup ---

/// Removes directories under `root` that the moved `vacated` files leave
/// empty, deepest first. `root` itself, and directories that already held
/// nothing tracked, are kept.
pub fn prune_empty_dirs(root: &Path, vacated: &[PathBuf], dry_run: bool) -> Result<Vec<PathBuf>> {
    let mut candidates = BTreeSet::new();
    for file in vacated {
        for dir in file.ancestors().skip(1) {
            if dir == root || !dir.starts_with(root) {
                break;
            }
            candidates.insert(dir.to_path_buf());
        }
    }
    let mut ordered: Vec<PathBuf> = candidates.into_iter().collect();
    ordered.sort_by_key(|dir| Reverse(dir.components().count()));

    let mut removed: Vec<PathBuf> = Vec::new();
    for dir in ordered {
        if !dir.is_dir() {
            continue;
        }
        // In a dry run the moved files and pruned children are still on disk.
        let mut is_empty = true;
        for entry in WalkDir::new(&dir).min_depth(1).max_depth(1) {
            let child = entry?.into_path();
            if !vacated.contains(&child) && !removed.contains(&child) {
                is_empty = false;
                break;
            }
        }
        if !is_empty {
            continue;
        }
        if dry_run {
            println!(
                "{}",
                format!("DRY-RUN: Removing empty directory: {:?}", dir).green()
            );
        } else {
            println!("Removing empty directory: {:?}", dir);
            fs::remove_dir(&dir).with_context(|| format!("Failed to remove {:?}", dir))?;
        }
        removed.push(dir);
    }
    Ok(removed)
}
