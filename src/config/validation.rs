//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate scanner settings (delimiter, rooted prefix)
//! - Validate addresses, paths and timeouts
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: SiteConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use thiserror::Error;

use crate::config::schema::SiteConfig;

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("scanner.delimiter {0:?} can not be whitespace or a line break")]
    WhitespaceDelimiter(char),

    #[error("scanner.rooted_prefix can not be empty")]
    EmptyRootedPrefix,

    #[error("scanner.rooted_prefix {prefix:?} can not contain the delimiter {delimiter:?}")]
    PrefixContainsDelimiter { prefix: String, delimiter: char },

    #[error("app.virtual_path {0:?} must start with '/'")]
    RelativeVirtualPath(String),

    #[error("{field} {value:?} is not a valid socket address")]
    InvalidAddress { field: &'static str, value: String },

    #[error("server.request_timeout_secs must be greater than zero")]
    ZeroTimeout,
}

/// Check a configuration, collecting every problem found.
pub fn validate_config(config: &SiteConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    let delimiter = config.scanner.delimiter;
    if delimiter.is_whitespace() {
        errors.push(ValidationError::WhitespaceDelimiter(delimiter));
    }

    let prefix = &config.scanner.rooted_prefix;
    if prefix.is_empty() {
        errors.push(ValidationError::EmptyRootedPrefix);
    } else if prefix.contains(delimiter) {
        errors.push(ValidationError::PrefixContainsDelimiter {
            prefix: prefix.clone(),
            delimiter,
        });
    }

    if !config.app.virtual_path.starts_with('/') {
        errors.push(ValidationError::RelativeVirtualPath(
            config.app.virtual_path.clone(),
        ));
    }

    if config.server.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidAddress {
            field: "server.bind_address",
            value: config.server.bind_address.clone(),
        });
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::InvalidAddress {
            field: "observability.metrics_address",
            value: config.observability.metrics_address.clone(),
        });
    }

    if config.server.request_timeout_secs == 0 {
        errors.push(ValidationError::ZeroTimeout);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
