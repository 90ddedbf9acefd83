//! Tracing bootstrap for binaries and tests embedding the state core.
//!
//! The library itself only emits events; it never installs a subscriber.

use tracing_subscriber::{fmt as subscriber_fmt, prelude::*, EnvFilter, Registry};

/// Install a fmt subscriber filtered by `RUST_LOG` (default `info`).
///
/// Safe to call more than once; later calls are no-ops.
pub fn init() {
    let _ = Registry::default()
        .with(env_filter("info"))
        .with(subscriber_fmt::layer())
        .try_init();
}

/// Like [`init`], but writes through the test harness's captured output.
pub fn init_for_tests() {
    let _ = Registry::default()
        .with(env_filter("debug"))
        .with(subscriber_fmt::layer().with_test_writer())
        .try_init();
}

fn env_filter(default: &str) -> EnvFilter {
    let directives = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    filter_from(directives.as_deref(), default)
}

/// `directives` when present and valid, `default` otherwise.
fn filter_from(directives: Option<&str>, default: &str) -> EnvFilter {
    directives
        .filter(|d| !d.trim().is_empty())
        .and_then(|d| EnvFilter::try_new(d).ok())
        .unwrap_or_else(|| EnvFilter::new(default))
}
