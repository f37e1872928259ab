//! Logging setup shared by the backend binary and integration tests.

use tracing::{info, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize the tracing subscriber at INFO, unless `RUST_LOG` says otherwise.
pub fn init() {
    init_with_level(Level::INFO);
}

/// Initialize the tracing subscriber with a fallback level.
///
/// `RUST_LOG` takes precedence when set. Calling this more than once is
/// harmless; later calls keep the first subscriber.
pub fn init_with_level(level: Level) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.as_str()));

    let result = tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(true)
                .with_file(true)
                .with_line_number(true)
                .with_thread_ids(true)
                .with_thread_names(true),
        )
        .with(filter)
        .try_init();

    if result.is_ok() {
        info!("Logging initialized at level: {}", level);
    }
}
