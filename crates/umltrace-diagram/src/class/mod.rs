//! Class diagrams: graph model and parser

pub mod model;
pub mod parser;

pub use model::{Attribute, ClassDiagram, ClassKind, ClassNode, Method, Parameter, Visibility};
pub use parser::ClassDiagramParser;
