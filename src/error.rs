//! Engine error types.
//!
//! # Design Decisions
//! - Every error carries a kind so hosting code can map it without matching variants
//! - Configuration errors are fatal at startup, or surfaced to the caller of `create`
//! - Unresolved tags and malformed tag syntax are never errors
//! - No retries anywhere in the engine

use std::path::PathBuf;

use thiserror::Error;

use crate::registry::Signature;

/// Coarse classification of engine failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Bad registration or route declarations.
    Configuration,
    /// A named template could not be located.
    TemplateNotFound,
    /// A template exists but could not be used.
    Template,
    /// The output sink rejected a write.
    Output,
}

/// Errors raised while assembling registries and the route table.
#[derive(Debug, Error)]
pub enum ConfigurationError {
    /// Two route declarations produced the same pattern string.
    #[error("the builder `{type_name}` has registered the route pattern `{pattern}` that has already been registered")]
    DuplicatePattern { type_name: String, pattern: String },

    /// A route pattern failed to compile.
    #[error("the route pattern `{pattern}` declared by `{type_name}` is invalid: {source}")]
    InvalidPattern {
        type_name: String,
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// Lookup of an identifier nobody registered.
    #[error("no {kind} has been registered with the identifier `{identifier}`")]
    UnknownIdentifier {
        kind: &'static str,
        identifier: String,
    },

    /// Registration or lookup with an empty identifier.
    #[error("{kind} identifier can not be empty")]
    EmptyIdentifier { kind: &'static str },

    /// The implementation has no constructor for the requested call shape.
    #[error("`{type_name}` has no constructor matching {signature}")]
    MissingConstructor {
        type_name: String,
        signature: Signature,
    },
}

/// Errors raised while composing and rendering pages.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    #[error(
        "the template `{name}` could not be found; the root path `{}` and all sub folders were searched",
        root.display()
    )]
    TemplateNotFound { name: String, root: PathBuf },

    #[error("`{builder}` has no master template; assign a template file or template text")]
    MissingMasterTemplate { builder: String },

    #[error("failed to read template `{name}`: {source}")]
    TemplateRead {
        name: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write rendered output")]
    Output(#[from] std::fmt::Error),
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Configuration(_) => ErrorKind::Configuration,
            Error::TemplateNotFound { .. } => ErrorKind::TemplateNotFound,
            Error::MissingMasterTemplate { .. } | Error::TemplateRead { .. } => ErrorKind::Template,
            Error::Output(_) => ErrorKind::Output,
        }
    }
}

/// Result type for engine operations.
pub type Result<T, E = Error> = std::result::Result<T, E>;
