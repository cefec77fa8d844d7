//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → SiteConfig (validated, immutable)
//!     → handed to SiteBuilder, then owned by the Site
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; registries and routes are built from it once
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, parse_config, ConfigError};
pub use schema::{
    AppConfig, ObservabilityConfig, RoutingConfig, ScannerConfig, ServerConfig, SiteConfig,
    TemplateConfig,
};
pub use validation::{validate_config, ValidationError};
