use std::env;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

pub const LOG_ENV: &str = "PIC_REORG_LOG";

/// Diagnostics go to stderr so stdout stays clean for dry-run reports.
/// The filter comes from `PIC_REORG_LOG`, falling back to `info`.
pub fn init_logger() {
    let filter = env::var(LOG_ENV).unwrap_or_else(|_| "info".to_string());
    let filter_layer = EnvFilter::try_new(&filter).unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .without_time(),
        )
        .with(filter_layer)
        .init();
}
