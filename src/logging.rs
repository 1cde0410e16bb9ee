//! Logging initialization (`tracing` + `tracing-subscriber`).
//!
//! The library only emits events; binaries and tests decide whether and
//! how to collect them.

use tracing_subscriber::{fmt, EnvFilter};

/// Installs the global fmt subscriber, writing to stderr.
///
/// # Environment
/// - `RUST_LOG`: filter directive (default: `info`),
///   e.g. `RUST_LOG=u_reflow=trace` to see calendar segments.
///
/// # Example
/// ```no_run
/// u_reflow::logging::init();
/// ```
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_ids(false)
        .with_line_number(true)
        .init();
}

/// Installs a `debug`-level subscriber that writes through the test harness.
///
/// Safe to call from every test; only the first call takes effect.
pub fn init_test() {
    let _ = fmt()
        .with_env_filter(EnvFilter::new("debug"))
        .with_test_writer()
        .try_init();
}
