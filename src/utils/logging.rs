//! Structured logging and secret redaction.
//!
//! This module configures the `tracing` ecosystem for the application and
//! provides a helper that keeps Google API keys out of log sinks.
//!
//! Author: kelexine (<https://github.com/kelexine>)

use crate::config::LoggingConfig;
use crate::error::Result;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initializes the global tracing subscriber for the application.
///
/// Supports three output formats:
/// - `json`: Structured JSON logs for ingestion.
/// - `pretty`: Multi-line, colorized output for development.
/// - `compact` (default): One line per event.
///
/// Logs go to stderr so stdout carries only the answer. `RUST_LOG`
/// overrides the configured level.
pub fn init(config: &LoggingConfig) -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.level));

    let registry = tracing_subscriber::registry().with(env_filter);
    let layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);

    match config.format.as_str() {
        "json" => registry.with(layer.json()).init(),
        "pretty" => registry.with(layer.pretty()).init(),
        _ => registry.with(layer.compact()).init(),
    }

    Ok(())
}

/// Sanitizes API keys from log messages.
///
/// Replaces Google API keys (`AIza...`) and the value of any `key=` query
/// parameter with a `\[REDACTED\]` placeholder.
pub fn sanitize(input: &str) -> String {
    let mut result = input.to_string();
    redact_all(&mut result, "AIza", "[REDACTED_API_KEY]", 0);
    redact_all(&mut result, "key=", "[REDACTED]", "key=".len());
    result
}

/// Replace every token starting at `marker` (offset by `keep` bytes).
fn redact_all(text: &mut String, marker: &str, placeholder: &str, keep: usize) {
    let mut search_from = 0;
    while let Some(found) = text[search_from..].find(marker) {
        let start = search_from + found + keep;
        let end = text[start..]
            .find(|c: char| c.is_whitespace() || matches!(c, '"' | '\'' | '&' | ','))
            .map(|i| start + i)
            .unwrap_or(text.len());
        if end == start {
            search_from = start;
            continue;
        }
        text.replace_range(start..end, placeholder);
        search_from = start + placeholder.len();
    }
}
