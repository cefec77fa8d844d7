//! Template subsystem.
//!
//! # Data Flow
//! ```text
//! template name
//!     → provider.rs (locate + open byte stream)
//!     → chars.rs (UTF-8 decode, one char at a time)
//!     → scanner.rs (literal runs + tag events)
//!     → compose (resolve each tag, write to the sink)
//!
//! inline text
//!     → scanner.rs directly (line breaks stripped by default)
//! ```

pub mod chars;
pub mod provider;
pub mod scanner;

pub use provider::{FileTemplateProvider, MemoryTemplateProvider, TemplateProvider};
pub use scanner::{scan_reader, scan_text, Event, ScanOptions, Scanner};
