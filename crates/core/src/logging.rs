//! Logging and observability
//!
//! Structured logging via tracing-subscriber with either text or JSON
//! formatting, controlled by a CLI flag or environment variables. All logging
//! output goes to stderr so stdout stays reserved for command output.

use crate::errors::Result;
use std::{io, sync::Once};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

static INIT: Once = Once::new();

/// Initialize the logging system with an optional format specification
///
/// Supports `None` or `"text"` for human-readable output and `"json"` for
/// structured output. Safe to call multiple times; subsequent calls are
/// no-ops.
///
/// ## Environment Variables
///
/// * `GROUNDWORK_LOG_FORMAT` - output format ("json" for JSON, anything else for text)
/// * `GROUNDWORK_LOG` - logging filter specification
/// * `RUST_LOG` - standard fallback filter
pub fn init(format: Option<&str>) -> Result<()> {
    INIT.call_once(|| {
        let filter = create_env_filter();

        let env_format = std::env::var("GROUNDWORK_LOG_FORMAT").ok();
        let effective_format = format.or(env_format.as_deref()).unwrap_or("text");

        match effective_format {
            "json" => {
                tracing_subscriber::registry()
                    .with(
                        fmt::layer()
                            .json()
                            .with_target(true)
                            .with_writer(io::stderr),
                    )
                    .with(filter)
                    .init();
            }
            _ => {
                tracing_subscriber::registry()
                    .with(fmt::layer().with_target(true).with_writer(io::stderr))
                    .with(filter)
                    .init();
            }
        }

        tracing::debug!("Logging initialized with format: {}", effective_format);
    });

    Ok(())
}

/// Create an EnvFilter from `GROUNDWORK_LOG`, falling back to `RUST_LOG`, then "info"
fn create_env_filter() -> EnvFilter {
    if let Ok(spec) = std::env::var("GROUNDWORK_LOG") {
        EnvFilter::try_new(&spec).unwrap_or_else(|_| {
            tracing::warn!(
                "Invalid GROUNDWORK_LOG specification '{}', using default 'info'",
                spec
            );
            EnvFilter::new("info")
        })
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    }
}

/// Check if logging has been initialized
///
/// Primarily useful for testing scenarios.
pub fn is_initialized() -> bool {
    INIT.is_completed()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    static TEST_MUTEX: Mutex<()> = Mutex::new(());

    #[test]
    fn test_init_multiple_calls_safe() {
        let _guard = TEST_MUTEX.lock().unwrap();

        assert!(init(None).is_ok());
        assert!(init(Some("json")).is_ok());
        assert!(init(Some("text")).is_ok());
    }

    #[test]
    fn test_is_initialized() {
        let _guard = TEST_MUTEX.lock().unwrap();

        let _ = init(None);
        assert!(is_initialized());
    }

    #[test]
    fn test_env_filter_creation_does_not_panic() {
        let _filter = create_env_filter();
    }
}
