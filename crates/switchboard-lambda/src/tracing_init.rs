//! Tracing setup for the Lambda process.
//!
//! Emits one JSON object per event so CloudWatch Logs can index the
//! fields directly.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Install the process-wide JSON subscriber.
///
/// Called once from [`run`](crate::run) before the Lambda runtime loop
/// starts. `RUST_LOG` controls the level and defaults to `info`.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let json_layer = fmt::layer()
        .json()
        .flatten_event(true)
        .with_level(true)
        .with_target(true)
        .with_thread_ids(false)
        .with_thread_names(false);

    tracing_subscriber::registry()
        .with(filter)
        .with(json_layer)
        .init();
}
