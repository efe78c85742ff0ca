#![forbid(unsafe_code)]

//! Subscriber setup for binaries and demos.
//!
//! The filter comes from `GESTURA_LOG` (same syntax as `RUST_LOG`), falling
//! back to the level passed in. Output goes to stderr so stdout stays free
//! for command results.

use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter directive.
pub const LOG_ENV: &str = "GESTURA_LOG";

/// Output format for log lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Text,
    /// One JSON object per line.
    Json,
}

/// Build a filter from `directive`, or from `default` when the directive is
/// missing or does not parse.
#[must_use]
pub fn build_filter(directive: Option<&str>, default: &str) -> EnvFilter {
    directive
        .filter(|d| !d.trim().is_empty())
        .and_then(|d| EnvFilter::try_new(d).ok())
        .unwrap_or_else(|| EnvFilter::new(default))
}

/// Install the global subscriber. Fails if one is already set.
pub fn try_init(
    format: LogFormat,
    default: &str,
) -> Result<(), Box<dyn std::error::Error + Send + Sync + 'static>> {
    let directive = std::env::var(LOG_ENV).ok();
    let filter = build_filter(directive.as_deref(), default);
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    match format {
        LogFormat::Text => builder.try_init(),
        LogFormat::Json => builder.json().try_init(),
    }
}

/// Install the global subscriber, ignoring a second initialization.
pub fn init(format: LogFormat, default: &str) {
    let _ = try_init(format, default);
}
