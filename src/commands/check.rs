use crate::db::load_records;
use crate::plan::Plan;
use crate::utils::{validate_database, AppConfig};
use anyhow::Result;
use colored::Colorize;
use std::path::Path;
use tracing::debug;

pub fn cmd_check(config: &AppConfig, managed: &Path) -> Result<()> {
    let db = load_records(managed)?;
    validate_database(managed, &db.media)?;
    let plan = Plan::build(&db.media, config.date_basis)?;

    for (hash, dest) in plan.iter() {
        debug!(hash = %hash, dest = %dest, "planned");
    }

    let ignored = db.media.len() - plan.len();
    println!("{}", format!("Database {:?} is valid", managed).bold());
    println!("  records:  {}", db.media.len());
    println!("  eligible: {}", plan.len());
    println!("  ignored:  {}", ignored);
    println!("  renamed:  {}", plan.renamed());
    Ok(())
}
