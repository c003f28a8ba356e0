//! Demo driver for the memsize scanner.
//!
//! Builds a small host program exercising every container kind, scans it,
//! and renders the report.

pub mod demo;
pub mod options;

pub use demo::{build, Demo};
pub use options::{parse_options, Options, OptionsError};

use std::sync::Once;

static TRACING_INIT: Once = Once::new();

/// Install a tracing subscriber when `RUST_LOG` is set.
///
/// Safe to call more than once; only the first call has an effect.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_level(true).with_writer(std::io::stderr))
                .with(filter)
                .init();
        }
    });
}
