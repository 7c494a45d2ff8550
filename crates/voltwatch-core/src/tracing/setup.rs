//! Tracing initialization and configuration.

use std::sync::Once;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

static INIT: Once = Once::new();

/// Environment variable holding the log filter directives.
pub const LOG_ENV_VAR: &str = "VOLTWATCH_LOG";

/// Filter used when `VOLTWATCH_LOG` is unset or invalid.
pub const DEFAULT_FILTER: &str = "voltwatch=info";

/// Initialize the voltwatch tracing/logging system.
///
/// Reads `VOLTWATCH_LOG` for per-crate log levels.
/// Format: `VOLTWATCH_LOG=voltwatch_analysis=debug,voltwatch_core=warn`
///
/// Idempotent: only the first call installs a subscriber.
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_env(LOG_ENV_VAR)
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

        // A host application may already own the global subscriber.
        let _ = tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_file(true)
                    .with_line_number(true),
            )
            .with(filter)
            .try_init();
    });
}
