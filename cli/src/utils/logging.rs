//! Debug diagnostics via `tracing`.
//!
//! A subscriber is only installed for `--debug` runs that are not also
//! `--quiet`; otherwise every `debug!` event is discarded.

use crate::config::RunConfig;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

pub fn debug_enabled(config: &RunConfig) -> bool {
    config.debug && !config.quiet
}

/// `RUST_LOG` wins over the built-in filter when set.
fn filter() -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("error,{}=debug", env!("CARGO_CRATE_NAME")).into())
}

pub fn init(config: &RunConfig) {
    if !debug_enabled(config) {
        return;
    }

    tracing_subscriber::registry()
        .with(filter())
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stdout)
                .with_target(false),
        )
        .init();
}
