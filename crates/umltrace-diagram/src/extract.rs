//! Diagram extraction from free-form model output

use crate::class::ClassDiagram;
use crate::sequence::SequenceDiagram;

/// Diagram sources found in a response
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedDiagrams {
    /// First `@startuml` block
    pub class: Option<String>,
    /// Second `@startuml` block
    pub sequence: Option<String>,
}

impl ExtractedDiagrams {
    /// Parse the class block, if present
    #[must_use]
    pub fn class_diagram(&self) -> Option<ClassDiagram> {
        self.class.as_deref().map(ClassDiagram::parse)
    }

    /// Parse the sequence block, if present
    #[must_use]
    pub fn sequence_diagram(&self) -> Option<SequenceDiagram> {
        self.sequence.as_deref().map(SequenceDiagram::parse)
    }
}

/// Every `@startuml … @enduml` block, delimiter lines included
///
/// Delimiters count only at the start of a (trimmed) line. A second
/// `@startuml` before an `@enduml` restarts the block.
#[must_use]
pub fn uml_blocks(text: &str) -> Vec<&str> {
    let mut blocks = Vec::new();
    let mut start = None;
    let mut offset = 0;
    for line in text.split_inclusive('\n') {
        let trimmed = line.trim();
        if trimmed.starts_with("@startuml") {
            start = Some(offset);
        } else if trimmed.starts_with("@enduml") {
            if let Some(begin) = start.take() {
                blocks.push(&text[begin..offset + line.trim_end().len()]);
            }
        }
        offset += line.len();
    }
    blocks
}

/// Split a response into its class and sequence diagram blocks
///
/// The first block is taken as the class diagram and the second as the
/// sequence diagram. Further blocks are ignored.
#[must_use]
pub fn extract_diagrams(text: &str) -> ExtractedDiagrams {
    let mut blocks = uml_blocks(text).into_iter().map(str::to_string);
    let extracted = ExtractedDiagrams {
        class: blocks.next(),
        sequence: blocks.next(),
    };
    tracing::debug!(
        class = extracted.class.is_some(),
        sequence = extracted.sequence.is_some(),
        "diagram blocks extracted"
    );
    extracted
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn takes_first_two_blocks_in_order() {
        let text = "Here is the design:\n```\n@startuml\nclass A {\n}\n@enduml\n```\nand\n@startuml\nA -> B : go\n@enduml\n@startuml\n@enduml";
        let extracted = extract_diagrams(text);

        assert_eq!(extracted.class.as_deref(), Some("@startuml\nclass A {\n}\n@enduml"));
        assert!(extracted.sequence.as_deref().unwrap().contains("A -> B"));
        assert_eq!(extracted.class_diagram().unwrap().len(), 1);
        assert_eq!(extracted.sequence_diagram().unwrap().messages.len(), 1);
        assert_eq!(uml_blocks(text).len(), 3);
    }

    #[test]
    fn delimiters_only_count_at_line_start() {
        let text = "see @startuml inline @enduml\n@startuml\nclass Draft\n  @startuml\nclass A\n@enduml trailing\nafter";
        assert_eq!(uml_blocks(text), vec!["  @startuml\nclass A\n@enduml trailing"]);

        let unterminated = "@startuml\nclass A\n";
        assert!(uml_blocks(unterminated).is_empty());
        assert_eq!(uml_blocks("@startuml\r\nA -> B\r\n@enduml\r\n"), vec!["@startuml\r\nA -> B\r\n@enduml"]);
    }

    #[test]
    fn missing_blocks_are_none() {
        assert_eq!(extract_diagrams("no diagrams here"), ExtractedDiagrams::default());

        let only_one = extract_diagrams("@startuml\nclass A\n@enduml");
        assert!(only_one.class.is_some());
        assert!(only_one.sequence.is_none());
    }
}
