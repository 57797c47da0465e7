//! umltrace Sources
//!
//! Generated source code as seen by the design→code pass: files, bundles
//! and the names each file declares.
//!
//! # Architecture
//!
//! ```text
//! marked model output ─┐
//!                      ├→ SourceBundle → SourceParser → [ParsedSource]
//! directory on disk ───┘
//! ```
//!
//! [`SourceParser`] is an interface boundary; [`TreeSitterSourceParser`]
//! is the bundled implementation for Java, Rust, TypeScript, Python and Go.

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod bundle;
pub mod declarations;
pub mod error;
pub mod language;
pub mod parser;

// Re-exports for convenience
pub use bundle::{SourceBundle, SourceFile};
pub use declarations::{DeclarationIndex, DeclarationKind};
pub use error::{SourceError, SourceResult};
pub use language::Language;
pub use parser::{parse_bundle, ParsedSource, SourceParser, TreeSitterSourceParser};

#[cfg(any(test, feature = "mocks"))]
pub use parser::MockSourceParser;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
