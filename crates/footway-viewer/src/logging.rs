//! Logging setup for the desktop app

use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, fmt};

/// Filter used when `RUST_LOG` is not set
pub const DEFAULT_FILTER: &str = "info,footway_lib=debug,eframe=warn,walkers=info";

/// Install the fmt subscriber. Call once, before anything logs.
pub fn setup_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    tracing_subscriber::registry()
        .with(fmt::layer().with_filter(filter))
        .init();

    tracing::info!("Logging initialized");
}
