//! Logging setup
//!
//! Logs go to stderr; stdout belongs to the plugin host. `RUST_LOG` controls
//! filtering and defaults to `info`. Bindings inputs and outputs are logged at
//! `debug` with sensitive fields masked.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Install the global subscriber
///
/// The provider never installs a subscriber on its own; the plugin host
/// that embeds [`B2Provider`](crate::B2Provider) calls this once at startup,
/// before serving. Returns false when a subscriber was already installed,
/// so calling this more than once is harmless.
pub fn init_logging() -> bool {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_file(false)
                .with_line_number(false),
        )
        .try_init()
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_initialization_is_refused() {
        init_logging();
        assert!(!init_logging());
    }
}
