//! Install a [`tracing_subscriber`] fmt layer honouring `RUST_LOG`.

use std::sync::Once;

static START: Once = Once::new();

/// Install global logging for binaries and tests.
///
/// Calling this more than once is a no-op; only the first caller's filter wins.
pub fn init() {
    START.call_once(|| {
        let filter = tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

        let subscriber = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .finish();

        // If a subscriber is already installed (e.g. by the host application) we defer to it.
        let _ = tracing::subscriber::set_global_default(subscriber);
    });
}
