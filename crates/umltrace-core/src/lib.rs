//! umltrace Core - Traceability Engine
//!
//! Ties the workspace together for the iteration loop that drives design
//! and code generation:
//! - Loads configuration from TOML or YAML
//! - Initialises structured logging
//! - Runs requirement→design and design→code rounds
//! - Reports whether another iteration is required
//!
//! # Example
//!
//! ```rust
//! use umltrace_core::{TraceConfig, TraceEngine};
//! use umltrace_reconcile::JsonTraceLinks;
//! use umltrace_source::SourceBundle;
//!
//! let use_case = "\
//! UsecaseName: Login
//! Description: The goal of this use case is to allow a user to sign in in order to access the portal
//! Actors: User
//! Entry Conditions:
//! The user IS registered
//! Flow of Events:
//! 1. The user enters credentials
//! Exit Conditions:
//! The user is signed in
//! Quality Requirement:
//! Sign-in completes within one second
//! ";
//! let response = "@startuml\nclass Session {\n  open() : void\n}\n@enduml\n@startuml\nUser -> Session : open()\n@enduml";
//! let matcher = JsonTraceLinks::new(r#"[{"requirement": "req_0", "links": ["Session"]}]"#, "[]");
//! let sources = SourceBundle::from_marked_text("=== File: Session.java ===\nclass Session { void open() {} }");
//!
//! let engine = TraceEngine::new(TraceConfig::new());
//! let outcome = engine.run_round(use_case, response, &sources, &matcher)?;
//! assert!(!outcome.is_converged());
//! assert_eq!(outcome.design_round.missing.class_diagram.len(), 5);
//! assert!(outcome.code_round.report.class_diagram.is_empty());
//! # Ok::<(), umltrace_core::TraceError>(())
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod config;
pub mod engine;
pub mod error;
pub mod telemetry;

// Re-exports for convenience
pub use config::{LoggingConfig, ReconcileConfig, SourceConfig, TraceConfig};
pub use engine::{CodeRound, DesignRound, RoundOutcome, TraceEngine};
pub use error::{ConfigError, TraceError, TraceResult};
pub use telemetry::init_tracing;

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for running traceability rounds
    pub use crate::{init_tracing, RoundOutcome, TraceConfig, TraceEngine, TraceError};
    pub use umltrace_reconcile::{DesignDiagrams, JsonTraceLinks, SemanticMatcher};
    pub use umltrace_source::SourceBundle;
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
