//! Process-wide log setup.
//!
//! One JSON line per event on stdout, with event fields flattened so
//! log pipelines can index `user_id`/`equipment_id` directly. The
//! filter comes from `RUST_LOG`; absent that, everything at `info` and
//! up.

use tracing_subscriber::EnvFilter;

const DEFAULT_DIRECTIVES: &str = "info";

/// Install the global subscriber.
///
/// Calling it again is a no-op, which keeps parallel test binaries
/// from fighting over the global default.
pub fn init() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVES));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .json()
        .flatten_event(true)
        .with_target(false)
        .try_init();
}
