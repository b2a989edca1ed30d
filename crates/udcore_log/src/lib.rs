//! Text logging for the udcore crates.
//!
//! * `trace`: spammy things
//! * `debug`: things that might be useful when debugging (cache reclaim, chunk eviction, WKT fallback)
//! * `info`: things we want surfaced to users
//! * `warn`: recoverable problems
//! * `error`: problems that lead to loss of functionality or data
//!
//! No component in this workspace calls `println!` directly; they log through here instead.

pub use log_once::{debug_once, error_once, info_once, trace_once, warn_once};
pub use tracing::{debug, error, info, trace, warn};

pub use log::{Level, LevelFilter};

mod setup;
pub use setup::init;

#[cfg(test)]
mod tests {
    #[test]
    fn macros_compile() {
        crate::debug!("chunk evicted");
        crate::warn_once!("WKT datum {} not recognised, added to dynamic registry", "FOO");
    }
}
