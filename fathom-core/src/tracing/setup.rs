//! Tracing initialization and configuration.

use std::sync::Once;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

static INIT: Once = Once::new();

/// Initialize the Fathom tracing/logging system.
///
/// Reads the `FATHOM_LOG` environment variable for per-subsystem log
/// levels, e.g. `FATHOM_LOG=fathom_analysis=debug,fathom_storage=warn`,
/// falling back to `fathom=info` when unset or invalid.
///
/// Idempotent; calling it multiple times is safe.
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_env("FATHOM_LOG")
            .unwrap_or_else(|_| EnvFilter::new("fathom=info"));

        tracing_subscriber::registry()
            .with(fmt::layer().with_target(true))
            .with(filter)
            .init();
    });
}
