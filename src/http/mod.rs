//! HTTP hosting subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware: trace, request ID, timeout)
//!     → page_handler (method, path, query, host → RequestContext)
//!     → Site::handle on the blocking pool (buffered sink)
//!     → status from the outcome, body from the sink
//! ```

pub mod server;

pub use server::{AppState, HttpServer, X_REQUEST_ID};
