//! umltrace Diagrams
//!
//! Line-oriented parsers that turn textual UML into typed graphs.
//!
//! # Parsers
//!
//! - [`ClassDiagramParser`]: class, interface, abstract and enum
//!   declarations with their attributes, methods and enum values
//! - [`SequenceDiagramParser`]: participants, messages and nested
//!   control-flow blocks
//!
//! Both are infallible. Content no rule recognizes is kept in an `others`
//! bucket so callers can judge diagram quality. Each parser is consumed by
//! its `parse` call; build one per document.
//!
//! # Example
//!
//! ```rust
//! use umltrace_diagram::{ClassDiagram, MessageKind, SequenceDiagram};
//!
//! let classes = ClassDiagram::parse("class Foo {\n  attr1 : int\n  doStuff(x : int) : bool\n}");
//! let foo = classes.node("Foo").unwrap();
//! assert_eq!(foo.methods[0].return_type, "bool");
//!
//! let sequence = SequenceDiagram::parse("Alice ->> Bob : hello()");
//! assert_eq!(sequence.messages[0].kind, MessageKind::Async);
//!
//! // rendering round-trips every recognized field
//! assert_eq!(ClassDiagram::parse(&classes.to_plantuml()), classes);
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod class;
pub mod extract;
mod render;
pub mod sequence;
mod text;

// Re-exports for convenience
pub use class::{
    Attribute, ClassDiagram, ClassDiagramParser, ClassKind, ClassNode, Method, Parameter,
    Visibility,
};
pub use extract::{extract_diagrams, uml_blocks, ExtractedDiagrams};
pub use sequence::{
    BlockKind, Branch, ControlFlowBlock, Message, MessageId, MessageKind, SequenceDiagram,
    SequenceDiagramParser, SequenceNode,
};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for working with parsed diagrams
    pub use crate::class::{ClassDiagram, ClassKind, ClassNode};
    pub use crate::extract::extract_diagrams;
    pub use crate::sequence::{ControlFlowBlock, Message, MessageKind, SequenceDiagram, SequenceNode};
}
