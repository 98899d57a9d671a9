//! Tracing subscriber setup.
//!
//! Filter directives come from `DRIFT_LOG` (same syntax as `RUST_LOG`).

use std::sync::Once;

use tracing_subscriber::EnvFilter;

/// Environment variable holding the filter directives.
pub const LOG_ENV_VAR: &str = "DRIFT_LOG";

static INIT: Once = Once::new();

/// Install the global fmt subscriber with a `warn` default level.
pub fn init_tracing() {
    init_tracing_with_default("warn");
}

/// Install the global fmt subscriber. Safe to call more than once; only the
/// first call has an effect, and an already-installed subscriber is kept.
pub fn init_tracing_with_default(default_directive: &str) {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_env(LOG_ENV_VAR)
            .unwrap_or_else(|_| EnvFilter::new(default_directive));
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .try_init();
    });
}
