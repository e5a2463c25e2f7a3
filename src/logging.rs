//! Logging initialization and configuration.

use tracing_subscriber::filter::ParseError;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Filter used when neither `RUST_LOG` nor an explicit level is given.
pub const DEFAULT_FILTER: &str = "sessionfile=info";

/// Build the filter, returning the parse error of a rejected explicit level.
fn build_filter(level: Option<&str>) -> (EnvFilter, Option<ParseError>) {
    match level {
        Some(level) => match EnvFilter::try_new(level) {
            Ok(filter) => (filter, None),
            Err(err) => (EnvFilter::new(DEFAULT_FILTER), Some(err)),
        },
        None => (
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER)),
            None,
        ),
    }
}

fn report_rejected(level: Option<&str>, rejected: Option<ParseError>) {
    if let (Some(level), Some(err)) = (level, rejected) {
        tracing::warn!(
            directive = level,
            error = %err,
            "invalid log filter, using {}",
            DEFAULT_FILTER
        );
    }
}

/// Initialize the logging system.
///
/// Uses `level` as the filter directive when given, otherwise the
/// `RUST_LOG` environment variable, falling back to `sessionfile=info`.
/// Log lines go to stderr so command output on stdout stays clean. An
/// invalid `level` falls back to `sessionfile=info` and is reported with a
/// warning once the subscriber is installed.
///
/// # Panics
///
/// Panics if called more than once, or if another tracing subscriber
/// has already been set.
pub fn init(level: Option<&str>) {
    let (filter, rejected) = build_filter(level);
    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .compact()
                .with_writer(std::io::stderr),
        )
        .init();
    report_rejected(level, rejected);
}

/// Try to initialize the logging system.
///
/// Returns `Ok(())` if successful, or `Err` if logging has already been
/// initialized.
pub fn try_init(level: Option<&str>) -> Result<(), tracing_subscriber::util::TryInitError> {
    let (filter, rejected) = build_filter(level);
    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .compact()
                .with_writer(std::io::stderr),
        )
        .try_init()?;
    report_rejected(level, rejected);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_try_init_fails() {
        // First call may or may not succeed depending on test order
        let _ = try_init(None);
        assert!(try_init(Some("debug")).is_err());
    }

    #[test]
    fn test_explicit_level_used() {
        let (filter, rejected) = build_filter(Some("sessionfile=debug"));
        assert!(filter.to_string().contains("debug"));
        assert!(rejected.is_none());
    }

    #[test]
    fn test_invalid_level_reported() {
        let (filter, rejected) = build_filter(Some("sessionfile=bogus"));
        assert!(rejected.is_some());
        assert!(filter.to_string().contains("info"));
    }

    #[test]
    fn test_logging_works() {
        let _ = try_init(None);

        tracing::info!("test info message");
        tracing::debug!("test debug message");
        tracing::warn!("test warn message");
    }
}
