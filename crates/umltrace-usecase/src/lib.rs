//! umltrace Use Cases
//!
//! Structured requirement documents: grammar validation and itemization.
//!
//! # Pipeline
//!
//! ```text
//! requirement text → UseCaseValidator → RequirementDocument → RequirementItemizer → [RequirementItem]
//! ```
//!
//! Validation checks structure only, never meaning. Item ids (`req_<i>`)
//! are positional and are the join keys used by trace links.
//!
//! # Example
//!
//! ```rust
//! use umltrace_usecase::RequirementDocument;
//!
//! let text = "\
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
//! let doc = RequirementDocument::parse(text).unwrap();
//! let items = doc.itemize();
//! assert_eq!(items[0].id.to_string(), "req_0");
//! assert_eq!(items.len(), 6);
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod document;
pub mod error;
pub mod grammar;
pub mod itemizer;

// Re-exports for convenience
pub use document::{Description, FlowStep, RequirementDocument, Section};
pub use error::{Expected, GrammarError, UseCaseResult, END_OF_DOCUMENT};
pub use grammar::UseCaseValidator;
pub use itemizer::{InvalidRequirementId, RequirementId, RequirementItem, RequirementItemizer};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
