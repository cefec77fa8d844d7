//! Type registry and factory layer.
//!
//! # Data Flow
//! ```text
//! Startup:
//!     Implementation::of::<T>() + constructors
//!     → Registry::register(identifier, implementation)
//!     → copy-on-write snapshot swapped in
//!
//! Per request:
//!     Registry::create(identifier, args)
//!     → snapshot lookup (lock-free)
//!     → constructor cache (descriptor, signature) → construct
//! ```
//!
//! # Design Decisions
//! - One registry per capability (views, builders), same generic code
//! - Explicit registration replaces type discovery
//! - Constructors are plain closures; caching only skips the signature lookup

pub mod factory;
pub mod implementation;

pub use factory::Registry;
pub use implementation::{Constructor, CreateArgs, Implementation, Signature};
