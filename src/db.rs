use anyhow::{Context, Result};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

pub const DB_FILE_NAME: &str = "pic-man.db";

/// Optional boolean as stored in the database. Absence is kept distinct from
/// `false` so a record written back looks like the one that was read.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Option<bool>", into = "Option<bool>")]
pub enum Flag {
    #[default]
    Absent,
    False,
    True,
}

impl Flag {
    pub fn is_absent(&self) -> bool {
        *self == Flag::Absent
    }

    pub fn is_set(&self) -> bool {
        *self == Flag::True
    }
}

impl From<Option<bool>> for Flag {
    fn from(value: Option<bool>) -> Self {
        match value {
            None => Flag::Absent,
            Some(false) => Flag::False,
            Some(true) => Flag::True,
        }
    }
}

impl From<Flag> for Option<bool> {
    fn from(flag: Flag) -> Self {
        match flag {
            Flag::Absent => None,
            Flag::False => Some(false),
            Flag::True => Some(true),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaRecord {
    #[serde(rename = "sha256", default)]
    pub sha_key: String,
    #[serde(rename = "storedAt", default)]
    pub stored_at: String,
    #[serde(default)]
    pub extensions: Vec<String>,
    /// Capture time in milliseconds since the Unix epoch.
    #[serde(rename = "earliestDate", default)]
    pub earliest: i64,
    #[serde(default)]
    pub paths: Vec<String>,
    #[serde(default, skip_serializing_if = "Flag::is_absent")]
    pub ignore: Flag,
    #[serde(rename = "reviewDone", default, skip_serializing_if = "Flag::is_absent")]
    pub reviewed: Flag,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl MediaRecord {
    /// Reviewed and explicitly ignored media never gets planned or moved.
    pub fn is_ignored_media(&self) -> bool {
        self.ignore.is_set() && self.reviewed.is_set()
    }

    pub fn original_path(&self) -> Option<&str> {
        self.paths.first().map(|p| p.as_str())
    }
}

pub type Records = BTreeMap<String, MediaRecord>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Database {
    pub media: Records,
    #[serde(rename = "updated", default)]
    pub last_updated: i64,
}

impl Database {
    pub fn new(media: Records) -> Self {
        Database {
            media,
            last_updated: Utc::now().timestamp_millis(),
        }
    }

    /// Files written by this tool carry a top-level `media` mapping; older
    /// ones are a bare hash to record map.
    pub fn from_yaml(text: &str) -> Result<Self> {
        let value: serde_yaml::Value = serde_yaml::from_str(text)?;
        let is_container = value
            .get("media")
            .map_or(false, |media| media.is_mapping());
        if is_container {
            return Ok(serde_yaml::from_str(text)?);
        }
        let media: Records = serde_yaml::from_str(text)?;
        Ok(Database {
            media,
            last_updated: 0,
        })
    }

    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).context("Could not prepare database yaml")
    }

    /// Writes the database as `pic-man.db` inside `dir`, creating `dir` if needed.
    pub fn write_to(&self, dir: &Path) -> Result<()> {
        let yaml = self.to_yaml()?;
        fs::create_dir_all(dir).with_context(|| format!("Failed to create {:?}", dir))?;
        let dest = dir.join(DB_FILE_NAME);
        fs::write(&dest, yaml).with_context(|| format!("Failed to write database {:?}", dest))
    }
}

/// Reads `pic-man.db` from the managed directory.
pub fn load_records(managed: &Path) -> Result<Database> {
    let path = managed.join(DB_FILE_NAME);
    let text =
        fs::read_to_string(&path).with_context(|| format!("Failed to read database {:?}", path))?;
    Database::from_yaml(&text).with_context(|| format!("Failed to parse database {:?}", path))
}
