//! Logging setup.
//!
//! Everything goes to stderr: stdout carries the result document and must
//! stay valid JSON.

use tracing_subscriber::{layer::SubscriberExt as _, util::SubscriberInitExt as _, EnvFilter};

use crate::config::DEFAULT_LOG_FILTER;

/// Install the global subscriber. An invalid directive falls back to the default.
pub fn init(directive: &str) {
    let filter = EnvFilter::try_new(directive).unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    // A second init (tests, embedding) keeps the first subscriber.
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(false),
        )
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_is_idempotent_and_tolerates_bad_directives() {
        init("dracut_module=debug");
        init("this is [not a filter");
        tracing::debug!("still logging");
    }
}
