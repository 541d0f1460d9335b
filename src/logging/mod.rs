//! Tracing setup for the engine and its demo binary.
//!
//! Production deployments get JSON lines for log aggregation; everywhere
//! else gets a human-readable ANSI format. `RUST_LOG` overrides the filter.

use crate::config::get_environment;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    if matches!(get_environment().as_str(), "production" | "prod") {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_target(true))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(true).with_ansi(true))
            .init();
    }
}
