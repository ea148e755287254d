use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "pic_reorg")]
#[command(about = "reorganize a managed media library into YYYY/MM/DD directories")]
pub struct Cli {
    /// Read capture dates in the local time zone instead of UTC
    #[arg(long, global = true, default_value_t = false)]
    pub local_dates: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Move every tracked file into the target directory, laid out by capture date
    Reorg {
        /// Path to managed media directory
        #[arg(short = 'm', long, default_value = ".")]
        managed: PathBuf,
        /// Path to target reorg directory, must not exist yet
        #[arg(short = 't', long, required = true)]
        target: PathBuf,
        /// Only report what would happen, no side effects
        #[arg(short = 'd', long = "dryrun", alias = "dry-run", default_value_t = false)]
        dry_run: bool,
        /// Remove directories left empty in the managed directory afterwards
        #[arg(long, default_value_t = false)]
        prune_empty: bool,
    },
    /// Validate the managed directory and summarize the planned layout
    Check {
        /// Path to managed media directory
        #[arg(short = 'm', long, default_value = ".")]
        managed: PathBuf,
    },
}
