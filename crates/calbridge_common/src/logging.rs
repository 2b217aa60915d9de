//! Logging utilities for calbridge.
//!
//! Every crate logs through the `tracing` macros; binaries call [`init`] or
//! [`init_with_level`] once at startup to install a formatted subscriber.

use tracing::{info, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Target prefix shared by all calbridge crates (`calbridge_gcal`, ...).
const CRATE_TARGET: &str = "calbridge";

/// Initialize the tracing subscriber at INFO level.
///
/// ```
/// use calbridge_common::logging;
///
/// logging::init();
/// // A second call is a no-op.
/// logging::init_with_level(tracing::Level::DEBUG);
/// ```
pub fn init() {
    init_with_level(Level::INFO);
}

/// Initialize the tracing subscriber with a specific log level.
///
/// `RUST_LOG` directives are honoured; the given level applies to the
/// calbridge crates on top of them.
pub fn init_with_level(level: Level) {
    let mut filter = EnvFilter::from_default_env();
    match format!("{}={}", CRATE_TARGET, level).parse() {
        Ok(directive) => filter = filter.add_directive(directive),
        Err(err) => eprintln!("invalid log directive for level {}: {}", level, err),
    }

    // try_init: a global subscriber may already be installed (tests, embedding apps)
    let result = tracing_subscriber::registry()
        .with(fmt::layer()
            .with_target(true)
            .with_file(true)
            .with_line_number(true)
            .with_thread_ids(true)
            .with_thread_names(true))
        .with(filter)
        .try_init();

    if result.is_ok() {
        info!("Logging initialized at level: {}", level);
    }
}
