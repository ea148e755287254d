use crate::db::{MediaRecord, Records};
use crate::error::ReorgError;
use crate::utils::{day_dir, file_name_of, split_extension, DateBasis};
use anyhow::Result;
use chrono::NaiveDate;
use std::collections::{BTreeMap, HashMap};
use tracing::debug;

/// Destination for every eligible record, relative to the target root.
///
/// Built once before anything touches the disk, so all name collisions are
/// settled up front. `by_destination` is the reverse index used while
/// building; together the two maps are a bijection over eligible hashes.
#[derive(Debug, Default)]
pub struct Plan {
    by_hash: BTreeMap<String, String>,
    by_destination: HashMap<String, String>,
    renamed: usize,
}

impl Plan {
    /// Plans records in hash order. A destination already taken by an earlier
    /// hash gets a `_N` suffix, with N counting up until the name is free.
    pub fn build(records: &Records, basis: DateBasis) -> Result<Self> {
        let mut plan = Plan::default();
        for (hash, rec) in records {
            if rec.is_ignored_media() {
                continue;
            }
            let (date, name) = planning_inputs(hash, rec, basis)?;

            let mut iteration = 0;
            let mut dest = derive_destination(date, &name, iteration);
            while plan.by_destination.contains_key(&dest) {
                iteration += 1;
                dest = derive_destination(date, &name, iteration);
            }
            if iteration > 0 {
                debug!(hash = %hash, dest = %dest, "renamed to avoid collision");
                plan.renamed += 1;
            }

            plan.by_destination.insert(dest.clone(), hash.clone());
            plan.by_hash.insert(hash.clone(), dest);
        }
        Ok(plan)
    }

    pub fn destination_for(&self, hash: &str) -> Option<&str> {
        self.by_hash.get(hash).map(|d| d.as_str())
    }

    #[cfg(test)]
    pub fn owner_of(&self, dest: &str) -> Option<&str> {
        self.by_destination.get(dest).map(|h| h.as_str())
    }

    pub fn len(&self) -> usize {
        self.by_hash.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_hash.is_empty()
    }

    /// How many records had to take a suffixed name.
    pub fn renamed(&self) -> usize {
        self.renamed
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.by_hash.iter().map(|(h, d)| (h.as_str(), d.as_str()))
    }
}

fn planning_inputs(hash: &str, rec: &MediaRecord, basis: DateBasis) -> Result<(NaiveDate, String)> {
    let original = rec
        .original_path()
        .ok_or_else(|| ReorgError::NoOriginalPath(hash.to_string()))?;
    let name = file_name_of(original).ok_or_else(|| ReorgError::NoFileName {
        hash: hash.to_string(),
        path: original.to_string(),
    })?;
    let date = basis
        .date_of(rec.earliest)
        .ok_or_else(|| ReorgError::InvalidTimestamp {
            hash: hash.to_string(),
            millis: rec.earliest,
        })?;
    Ok((date, name))
}

/// `YYYY/MM/DD/<name>` for iteration 0, `YYYY/MM/DD/<stem>_<iteration><ext>` after.
pub fn derive_destination(date: NaiveDate, file_name: &str, iteration: u32) -> String {
    let dir = day_dir(date);
    if iteration == 0 {
        return format!("{}/{}", dir, file_name);
    }
    let (stem, ext) = split_extension(file_name);
    format!("{}/{}_{}{}", dir, stem, iteration, ext)
}
