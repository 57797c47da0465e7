//! umltrace Reconciliation
//!
//! The two traceability passes of the design loop.
//!
//! # Passes
//!
//! - Requirement→design: [`missing_requirement_links`] reduces the trace
//!   links of a [`SemanticMatcher`] to the items neither diagram covers.
//! - Design→code: [`CodeReconciler`] links classes through parsed
//!   declarations and sequence elements through filename and content
//!   heuristics.
//!
//! Neither pass fails on missing coverage. Gaps are the report.
//!
//! # Example
//!
//! ```rust
//! use umltrace_diagram::{ClassDiagram, SequenceDiagram};
//! use umltrace_reconcile::{CodeReconciler, DesignDiagrams};
//! use umltrace_source::{DeclarationIndex, DeclarationKind, ParsedSource, SourceFile};
//!
//! let design = DesignDiagrams {
//!     class_diagram: ClassDiagram::parse("class Cart {\n  total() : int\n}"),
//!     sequence_diagram: SequenceDiagram::default(),
//! };
//! let sources = vec![ParsedSource::new(
//!     SourceFile::new("Cart.java", "class Cart { int total() { return 0; } }"),
//!     DeclarationIndex::new()
//!         .with(DeclarationKind::Type, "Cart")
//!         .with(DeclarationKind::Method, "total"),
//! )];
//!
//! let traceability = CodeReconciler::new().reconcile(&design, &sources);
//! assert!(traceability.is_converged());
//! assert!(traceability.report(&design).is_empty());
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod code;
pub mod design;
pub mod error;
pub mod links;

// Re-exports for convenience
pub use code::{
    ClassGap, CodeLinkRecord, CodeReconciler, CodeTraceReport, CodeTraceability, MissingMember,
    SequenceGap,
};
pub use design::{missing_requirement_links, MissingLinkReport};
pub use error::{ReconcileError, ReconcileResult};
pub use links::{DesignDiagrams, DiagramKind, JsonTraceLinks, SemanticMatcher, TraceLink};

#[cfg(any(test, feature = "mocks"))]
pub use links::MockSemanticMatcher;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
