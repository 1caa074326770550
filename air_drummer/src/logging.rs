//! Console logging setup.

use tracing_subscriber::{filter::EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt, Layer};

use crate::config::LogConfig;

/// Install the global subscriber: human-readable lines on stderr, filtered
/// at the configured level.  `RUST_LOG` takes precedence when set.
///
/// Calling it twice is harmless; the second call leaves the first
/// subscriber in place.
pub fn init(config: &LogConfig) {
    let filter = EnvFilter::builder()
        .with_default_directive(config.parse_level().into())
        .from_env_lossy();

    let console = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_filter(filter);

    if tracing_subscriber::registry().with(console).try_init().is_ok() {
        tracing::debug!(level = %config.level, "logging initialized");
    }
}
