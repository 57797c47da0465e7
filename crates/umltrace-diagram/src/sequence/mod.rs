//! Sequence diagrams: graph model and parser

mod arrow;
pub mod model;
pub mod parser;

pub use model::{
    BlockKind, Branch, ControlFlowBlock, Message, MessageId, MessageKind, SequenceDiagram,
    SequenceNode, PARTICIPANT_KEYWORDS,
};
pub use parser::SequenceDiagramParser;
