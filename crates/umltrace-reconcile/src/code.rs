//! Design→code pass
//!
//! Classes are linked through declarations: the first source file that
//! declares a type named like the class becomes its linked file, and
//! every attribute and method must then be declared in that file.
//!
//! Participants and messages use deliberately permissive text heuristics:
//! a participant's display name (whitespace and `:` removed) must occur in
//! some filename, a message label (cut at the first `(`, whitespace and `:`
//! removed) somewhere in some file's content. False positives are accepted.

use crate::links::DesignDiagrams;
use serde::{Deserialize, Serialize};
use umltrace_diagram::{Attribute, ClassNode, Message, MessageKind, Method, SequenceNode};
use umltrace_source::ParsedSource;

/// Class member absent from the linked file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "member", rename_all = "lowercase")]
pub enum MissingMember {
    /// Attribute without a field declaration
    Attribute(Attribute),
    /// Method without a method declaration
    Method(Method),
}

impl MissingMember {
    /// Member name
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            MissingMember::Attribute(a) => &a.name,
            MissingMember::Method(m) => &m.name,
        }
    }
}

/// Coverage of one diagram element by source code
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeLinkRecord {
    /// Class id, participant id or message id
    pub element_id: String,
    /// File the element was matched to
    pub linked_file: Option<String>,
    /// Matched and, for classes, complete
    pub linked: bool,
    /// Members missing from the linked file, classes only
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub missing_members: Vec<MissingMember>,
}

impl CodeLinkRecord {
    fn matched(element_id: impl Into<String>, linked_file: Option<&str>) -> Self {
        Self {
            element_id: element_id.into(),
            linked: linked_file.is_some(),
            linked_file: linked_file.map(str::to_string),
            missing_members: Vec::new(),
        }
    }

    /// Linked to a file but with members missing
    #[inline]
    #[must_use]
    pub fn is_incomplete(&self) -> bool {
        self.linked_file.is_some() && !self.linked
    }
}

/// Class that is unlinked or incomplete
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassGap {
    /// The diagram class
    #[serde(flatten)]
    pub node: ClassNode,
    /// File declaring the class, if any
    pub linked_file: Option<String>,
    /// Members the linked file lacks
    pub missing_members: Vec<MissingMember>,
}

/// Unlinked sequence-diagram element
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SequenceGap {
    /// Participant whose name occurs in no filename
    Participant(SequenceNode),
    /// Message whose label occurs in no file
    Message(Message),
}

/// Only the elements that still lack code coverage
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CodeTraceReport {
    /// Unlinked or incomplete classes
    pub class_diagram: Vec<ClassGap>,
    /// Unlinked participants, then unlinked messages
    pub sequence_diagram: Vec<SequenceGap>,
}

impl CodeTraceReport {
    /// Check if every element is covered
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.class_diagram.is_empty() && self.sequence_diagram.is_empty()
    }
}

/// Records for every class, participant and message
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CodeTraceability {
    /// One record per class node
    pub classes: Vec<CodeLinkRecord>,
    /// One record per participant
    pub participants: Vec<CodeLinkRecord>,
    /// One record per reconciled message
    pub messages: Vec<CodeLinkRecord>,
}

impl CodeTraceability {
    /// Check if every record is linked
    #[must_use]
    pub fn is_converged(&self) -> bool {
        self.classes
            .iter()
            .chain(&self.participants)
            .chain(&self.messages)
            .all(|r| r.linked)
    }

    /// Find the record of an element
    #[must_use]
    pub fn record(&self, element_id: &str) -> Option<&CodeLinkRecord> {
        self.classes
            .iter()
            .chain(&self.participants)
            .chain(&self.messages)
            .find(|r| r.element_id == element_id)
    }

    /// Reduce to the unlinked elements of `design`
    #[must_use]
    pub fn report(&self, design: &DesignDiagrams) -> CodeTraceReport {
        let class_diagram = design
            .class_diagram
            .nodes
            .iter()
            .zip(&self.classes)
            .filter(|(_, r)| !r.linked)
            .map(|(node, r)| ClassGap {
                node: node.clone(),
                linked_file: r.linked_file.clone(),
                missing_members: r.missing_members.clone(),
            })
            .collect();

        let participants = design
            .sequence_diagram
            .nodes
            .iter()
            .zip(&self.participants)
            .filter(|(_, r)| !r.linked)
            .map(|(node, _)| SequenceGap::Participant(node.clone()));
        let messages = self
            .messages
            .iter()
            .filter(|r| !r.linked)
            .filter_map(|r| {
                design
                    .sequence_diagram
                    .messages
                    .iter()
                    .find(|m| m.id.to_string() == r.element_id)
            })
            .map(|m| SequenceGap::Message(m.clone()));

        CodeTraceReport {
            class_diagram,
            sequence_diagram: participants.chain(messages).collect(),
        }
    }
}

/// Strip whitespace and `:` from a heuristic key
fn squash(s: &str) -> String {
    s.chars().filter(|c| !c.is_whitespace() && *c != ':').collect()
}

/// Design→code reconciler
#[derive(Debug, Clone, Copy)]
pub struct CodeReconciler {
    include_notes: bool,
}

impl Default for CodeReconciler {
    fn default() -> Self {
        Self::new()
    }
}

impl CodeReconciler {
    /// Create reconciler that also checks note messages
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self {
            include_notes: true,
        }
    }

    /// Choose whether note messages take part in the content heuristic
    #[inline]
    #[must_use]
    pub fn with_include_notes(mut self, include_notes: bool) -> Self {
        self.include_notes = include_notes;
        self
    }

    /// Link every design element to the given sources
    #[must_use]
    pub fn reconcile(&self, design: &DesignDiagrams, sources: &[ParsedSource]) -> CodeTraceability {
        let classes: Vec<CodeLinkRecord> = design
            .class_diagram
            .nodes
            .iter()
            .map(|node| link_class(node, sources))
            .collect();
        let participants: Vec<CodeLinkRecord> = design
            .sequence_diagram
            .nodes
            .iter()
            .map(|node| link_participant(node, sources))
            .collect();
        let messages: Vec<CodeLinkRecord> = design
            .sequence_diagram
            .messages
            .iter()
            .filter(|m| self.include_notes || m.kind != MessageKind::Note)
            .map(|m| link_message(m, sources))
            .collect();

        let traceability = CodeTraceability {
            classes,
            participants,
            messages,
        };
        tracing::info!(
            files = sources.len(),
            classes = traceability.classes.len(),
            participants = traceability.participants.len(),
            messages = traceability.messages.len(),
            converged = traceability.is_converged(),
            "design to code reconciled"
        );
        traceability
    }
}

fn link_class(node: &ClassNode, sources: &[ParsedSource]) -> CodeLinkRecord {
    let Some(source) = sources
        .iter()
        .find(|s| s.declarations.declares_type(&node.id))
    else {
        tracing::debug!(class = %node.id, "class not declared in any source file");
        return CodeLinkRecord::matched(&node.id, None);
    };

    let declared = &source.declarations;
    let missing_members: Vec<MissingMember> = node
        .attributes
        .iter()
        .filter(|a| !declared.declares_field(&a.name))
        .cloned()
        .map(MissingMember::Attribute)
        .chain(
            node.methods
                .iter()
                .filter(|m| !declared.declares_method(&m.name))
                .cloned()
                .map(MissingMember::Method),
        )
        .collect();

    if !missing_members.is_empty() {
        tracing::debug!(
            class = %node.id,
            file = %source.file.filename,
            missing = missing_members.len(),
            "class linked but incomplete"
        );
    }
    CodeLinkRecord {
        element_id: node.id.clone(),
        linked_file: Some(source.file.filename.clone()),
        linked: missing_members.is_empty(),
        missing_members,
    }
}

fn link_participant(node: &SequenceNode, sources: &[ParsedSource]) -> CodeLinkRecord {
    let key = squash(&node.reference);
    let file = sources
        .iter()
        .find(|s| s.file.filename.contains(&key))
        .map(|s| s.file.filename.as_str());
    CodeLinkRecord::matched(&node.id, file)
}

fn link_message(message: &Message, sources: &[ParsedSource]) -> CodeLinkRecord {
    let label = message
        .text
        .split_once('(')
        .map_or(message.text.as_str(), |(head, _)| head);
    let key = squash(label);
    let file = sources
        .iter()
        .find(|s| s.file.content.contains(&key))
        .map(|s| s.file.filename.as_str());
    CodeLinkRecord::matched(message.id.to_string(), file)
}
