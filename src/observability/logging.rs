//! Structured logging.
//!
//! # Responsibilities
//! - Initialize the tracing subscriber once per process
//! - Take the filter from `RUST_LOG`, else from configuration
//!
//! # Design Decisions
//! - Human-readable fmt layer on stdout
//! - Library code only emits events; binaries own initialization

use tracing_subscriber::util::TryInitError;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::ObservabilityConfig;

/// Filter directive used when `RUST_LOG` is not set.
pub fn default_directive(config: &ObservabilityConfig) -> String {
    format!("quire={level},tower_http={level}", level = config.log_level)
}

/// Install the global subscriber. Fails if one is already installed.
pub fn init_logging(config: &ObservabilityConfig) -> Result<(), TryInitError> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(config)));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .try_init()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_directive_uses_level() {
        let config = ObservabilityConfig {
            log_level: "debug".into(),
            ..ObservabilityConfig::default()
        };
        assert_eq!(default_directive(&config), "quire=debug,tower_http=debug");
    }
}
