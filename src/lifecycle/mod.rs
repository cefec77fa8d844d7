//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → Shutdown::trigger
//!
//! Shutdown (shutdown.rs):
//!     trigger → every subscriber (HTTP server) → stop accepting → drain → exit
//! ```
//!
//! # Design Decisions
//! - One broadcast channel; any task may subscribe
//! - Site assembly happens in `site::startup` before any listener is bound

pub mod shutdown;
pub mod signals;

pub use shutdown::Shutdown;
pub use signals::shutdown_signal;
