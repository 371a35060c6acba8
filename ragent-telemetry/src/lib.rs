//! # ragent-telemetry
//!
//! Logging setup for ragent binaries and tests.
//!
//! - [`init_telemetry`] installs a human-readable `fmt` subscriber
//! - [`init_json_telemetry`] installs a JSON subscriber for log shipping
//! - [`SpanCaptureLayer`] records closed spans in memory for assertions
//!
//! Both initializers honor `RUST_LOG` and default to `info`. Calling either
//! more than once returns an error instead of panicking.

pub mod capture;

pub use capture::{CapturedSpan, CapturedSpans, SpanCaptureLayer};
pub use tracing::{debug, error, info, instrument, trace, warn};
pub use tracing_subscriber::util::TryInitError;

use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Filter used when `RUST_LOG` is unset or invalid.
pub const DEFAULT_FILTER: &str = "info";

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Install a human-readable subscriber writing to stderr.
///
/// # Errors
///
/// Returns [`TryInitError`] if a global subscriber is already set.
pub fn init_telemetry() -> Result<(), TryInitError> {
    tracing_subscriber::registry()
        .with(env_filter())
        .with(tracing_subscriber::fmt::layer().with_target(true).with_writer(std::io::stderr))
        .try_init()
}

/// Install a JSON subscriber writing one object per line to stderr.
///
/// # Errors
///
/// Returns [`TryInitError`] if a global subscriber is already set.
pub fn init_json_telemetry() -> Result<(), TryInitError> {
    tracing_subscriber::registry()
        .with(env_filter())
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(true)
                .with_writer(std::io::stderr),
        )
        .try_init()
}
