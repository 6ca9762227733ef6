//! Tracing subscriber setup.

use tracing_subscriber::EnvFilter;

/// Filter used when neither `RUST_LOG` nor the config names one.
pub const DEFAULT_LOG_FILTER: &str = "info,till=debug,sqlx=warn";

/// Installs a `fmt` subscriber.
///
/// `RUST_LOG` wins over `filter`; an unparseable filter falls back to
/// [`DEFAULT_LOG_FILTER`]. Returns false if a global subscriber was
/// already set (tests, embedding hosts), which is not an error.
pub fn init_tracing(filter: Option<&str>) -> bool {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(filter.unwrap_or(DEFAULT_LOG_FILTER)))
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init()
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_init_is_harmless() {
        let _ = init_tracing(Some("not a [valid filter"));
        assert!(!init_tracing(None));
    }
}
