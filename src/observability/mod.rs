//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → logging.rs (structured log events via tracing)
//!     → metrics.rs (counters and histograms)
//!
//! Consumers:
//!     → stdout (fmt layer, filtered by RUST_LOG or config)
//!     → Metrics endpoint (Prometheus scrape, optional)
//! ```
//!
//! # Design Decisions
//! - Request ID flows in from the HTTP layer as a span field
//! - Metrics are cheap; recording without an installed exporter is a no-op

pub mod logging;
pub mod metrics;

pub use logging::init_logging;
pub use metrics::init_metrics;
