//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for a site.
//! All types derive Serde traits for deserialization from config files.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Root configuration for a composed site.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct SiteConfig {
    /// HTTP hosting settings.
    pub server: ServerConfig,

    /// Application identity (virtual root).
    pub app: AppConfig,

    /// Template lookup settings.
    pub templates: TemplateConfig,

    /// Placeholder scanner settings.
    pub scanner: ScannerConfig,

    /// Route matching settings.
    pub routing: RoutingConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// HTTP hosting configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,

    /// Request timeout in seconds.
    pub request_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
            request_timeout_secs: 30,
        }
    }
}

/// Application configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    /// Virtual path the application is mounted under. Rooted-path tags
    /// (`@~/x@`) and route patterns (`^~/x`) are relative to it.
    pub virtual_path: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            virtual_path: "/".to_string(),
        }
    }
}

/// Template lookup configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct TemplateConfig {
    /// Folder searched (with all sub folders) when no `root_folder` is set.
    pub search_root: PathBuf,

    /// Folder that overrides `search_root` for every lookup.
    pub root_folder: Option<PathBuf>,
}

impl Default for TemplateConfig {
    fn default() -> Self {
        Self {
            search_root: PathBuf::from("."),
            root_folder: None,
        }
    }
}

/// Placeholder scanner configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ScannerConfig {
    /// Character that opens and closes a placeholder tag.
    pub delimiter: char,

    /// Prefix marking rooted-path tags.
    pub rooted_prefix: String,

    /// Drop `\r`/`\n` when scanning inline template text.
    pub strip_line_breaks_in_text: bool,

    /// Drop `\r`/`\n` when scanning template files.
    pub strip_line_breaks_in_templates: bool,
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            delimiter: '@',
            rooted_prefix: "~/".to_string(),
            // Historical behaviour: only inline text strips line breaks.
            strip_line_breaks_in_text: true,
            strip_line_breaks_in_templates: false,
        }
    }
}

/// Route matching configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct RoutingConfig {
    /// Lower-case request paths before matching (captured values come back lower-cased).
    pub lowercase_paths: bool,
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            lowercase_paths: true,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SiteConfig::default();
        assert_eq!(config.scanner.delimiter, '@');
        assert_eq!(config.scanner.rooted_prefix, "~/");
        assert!(config.scanner.strip_line_breaks_in_text);
        assert!(!config.scanner.strip_line_breaks_in_templates);
        assert_eq!(config.app.virtual_path, "/");
        assert!(config.routing.lowercase_paths);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: SiteConfig = toml::from_str(
            r#"
            [app]
            virtual_path = "/shop/"

            [scanner]
            delimiter = "%"

            [templates]
            root_folder = "templates"
            "#,
        )
        .unwrap();

        assert_eq!(config.app.virtual_path, "/shop/");
        assert_eq!(config.scanner.delimiter, '%');
        assert_eq!(config.scanner.rooted_prefix, "~/");
        assert_eq!(config.templates.root_folder, Some(PathBuf::from("templates")));
        assert_eq!(config.server, ServerConfig::default());
    }
}
