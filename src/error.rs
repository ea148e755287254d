use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReorgError {
    #[error("database at {0:?} holds no records, nothing to reorganize")]
    EmptyDatabase(PathBuf),
    #[error("target directory {0:?} must not exist")]
    TargetExists(PathBuf),
    #[error("record {hash} points at a directory instead of a file: {path:?}")]
    NotAFile { hash: String, path: PathBuf },
    #[error("record {hash} is stored at {path:?}, which does not exist")]
    MissingSource { hash: String, path: PathBuf },
    #[error("record {0} has no original path to derive a file name from")]
    NoOriginalPath(String),
    #[error("record {hash} has an original path without a file name: {path:?}")]
    NoFileName { hash: String, path: String },
    #[error("record {hash} has an out of range capture timestamp {millis}")]
    InvalidTimestamp { hash: String, millis: i64 },
    #[error("no destination planned for {hash}, currently stored at {from:?}")]
    MissingDestination { hash: String, from: PathBuf },
    #[error("refusing to overwrite {0:?}")]
    DestinationExists(PathBuf),
}
