//! Sequence-diagram graph types
//!
//! Messages live in one arena ([`SequenceDiagram::messages`]) in source
//! order; control-flow blocks only hold [`MessageId`]s. Absolute creation
//! order is therefore recoverable by comparing ids.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Participant declaration keywords
pub const PARTICIPANT_KEYWORDS: [&str; 17] = [
    "actor",
    "participant",
    "boundary",
    "control",
    "entity",
    "database",
    "collections",
    "queue",
    "utility",
    "node",
    "cloud",
    "storage",
    "agent",
    "file",
    "folder",
    "frame",
    "card",
];

/// Diagram participant
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SequenceNode {
    /// Identifier used by message lines
    pub id: String,
    /// Declaration keyword, e.g. `actor`
    pub keyword: String,
    /// Display name
    #[serde(rename = "ref")]
    pub reference: String,
}

/// Kind of a message line, derived from its arrow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    /// `->`
    Sync,
    /// `->>`
    Async,
    /// `-->`
    Return,
    /// `->x`
    Lost,
    /// `note ... : text`
    Note,
}

impl MessageKind {
    /// Classify an arrow token with style hints already removed
    #[must_use]
    pub fn from_arrow(arrow: &str) -> Self {
        if arrow.contains('x') {
            Self::Lost
        } else if arrow.contains(">>") || arrow.contains("<<") {
            Self::Async
        } else if arrow.contains("--") {
            Self::Return
        } else {
            Self::Sync
        }
    }

    /// Canonical left-to-right arrow for rendering
    #[inline]
    #[must_use]
    pub fn arrow(&self) -> &'static str {
        match self {
            Self::Sync | Self::Note => "->",
            Self::Async => "->>",
            Self::Return => "-->",
            Self::Lost => "->x",
        }
    }
}

impl fmt::Display for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Sync => "sync",
            Self::Async => "async",
            Self::Return => "return",
            Self::Lost => "lost",
            Self::Note => "note",
        };
        f.write_str(name)
    }
}

/// Message id, rendered `m<N>` and drawn from one counter per parse
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MessageId(u32);

impl MessageId {
    /// Create id from its sequence number
    #[inline]
    #[must_use]
    pub fn new(seq: u32) -> Self {
        Self(seq)
    }

    /// Sequence number, starting at 1
    #[inline]
    #[must_use]
    pub fn seq(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "m{}", self.0)
    }
}

impl FromStr for MessageId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.strip_prefix('m')
            .and_then(|n| n.parse().ok())
            .map(Self)
            .ok_or_else(|| format!("invalid message id: '{s}'"))
    }
}

impl TryFrom<String> for MessageId {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<MessageId> for String {
    fn from(id: MessageId) -> Self {
        id.to_string()
    }
}

/// Arrow or note line
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Global id
    pub id: MessageId,
    /// Message kind
    pub kind: MessageKind,
    /// Sending participant
    pub sender: String,
    /// Receiving participant
    pub receiver: String,
    /// Label after `:`, may be empty
    pub text: String,
}

/// Control-flow keyword
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockKind {
    /// `alt`
    Alt,
    /// `opt`
    Opt,
    /// `loop`
    Loop,
    /// `group`
    Group,
    /// `break`
    Break,
    /// `par`
    Par,
    /// `critical`
    Critical,
}

impl BlockKind {
    /// All kinds in keyword-match order
    pub const ALL: [BlockKind; 7] = [
        Self::Alt,
        Self::Opt,
        Self::Loop,
        Self::Group,
        Self::Break,
        Self::Par,
        Self::Critical,
    ];

    /// Opening keyword
    #[inline]
    #[must_use]
    pub fn keyword(&self) -> &'static str {
        match self {
            Self::Alt => "alt",
            Self::Opt => "opt",
            Self::Loop => "loop",
            Self::Group => "group",
            Self::Break => "break",
            Self::Par => "par",
            Self::Critical => "critical",
        }
    }

    /// Kind whose keyword equals `word`
    #[must_use]
    pub fn from_keyword(word: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.keyword() == word)
    }
}

/// One branch of a control-flow block
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Branch {
    /// Branch id, `b<N>`
    pub id: String,
    /// Guard text; the opening line's remainder for the first branch
    pub condition: String,
    /// Messages directly inside this branch
    pub message_ids: Vec<MessageId>,
    /// Blocks nested directly inside this branch
    pub nested_control_flows: Vec<ControlFlowBlock>,
}

impl Branch {
    /// Create empty branch
    #[inline]
    #[must_use]
    pub fn new(id: impl Into<String>, condition: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            condition: condition.into(),
            message_ids: Vec::new(),
            nested_control_flows: Vec::new(),
        }
    }
}

/// Nested alt/opt/loop/group/break/par/critical region
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControlFlowBlock {
    /// Block keyword
    pub kind: BlockKind,
    /// Number of messages created before the opening line
    #[serde(rename = "openedAfter", default)]
    pub opened_after: u32,
    /// Text after the opening keyword
    pub description: String,
    /// Branches, at least one
    pub branches: Vec<Branch>,
}

impl ControlFlowBlock {
    /// Every message id in this block and its descendants, ascending
    #[must_use]
    pub fn message_ids(&self) -> Vec<MessageId> {
        let mut ids = Vec::new();
        self.collect_ids(&mut ids);
        ids.sort_unstable();
        ids
    }

    fn collect_ids(&self, out: &mut Vec<MessageId>) {
        for branch in &self.branches {
            out.extend_from_slice(&branch.message_ids);
            for nested in &branch.nested_control_flows {
                nested.collect_ids(out);
            }
        }
    }

    /// Smallest message id in the block, if it contains any message
    #[must_use]
    pub fn first_message_id(&self) -> Option<MessageId> {
        self.message_ids().into_iter().next()
    }
}

/// Parsed sequence diagram
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SequenceDiagram {
    /// Participants in declaration order
    pub nodes: Vec<SequenceNode>,
    /// Every message and note in source order
    pub messages: Vec<Message>,
    /// Top-level control-flow forest
    pub control_flows: Vec<ControlFlowBlock>,
    /// Lines no rule recognized, kept verbatim
    pub others: Vec<String>,
}

impl SequenceDiagram {
    /// Parse diagram text with a fresh parser
    #[inline]
    #[must_use]
    pub fn parse(text: &str) -> Self {
        super::SequenceDiagramParser::new().parse(text)
    }

    /// Find participant by id
    #[must_use]
    pub fn node(&self, id: &str) -> Option<&SequenceNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    /// Find message by id
    #[must_use]
    pub fn message(&self, id: MessageId) -> Option<&Message> {
        self.messages.iter().find(|m| m.id == id)
    }

    /// Check if nothing was recognized
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.messages.is_empty() && self.control_flows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arrow_classification() {
        assert_eq!(MessageKind::from_arrow("->"), MessageKind::Sync);
        assert_eq!(MessageKind::from_arrow("->>"), MessageKind::Async);
        assert_eq!(MessageKind::from_arrow("-->"), MessageKind::Return);
        assert_eq!(MessageKind::from_arrow("-->>"), MessageKind::Async);
        assert_eq!(MessageKind::from_arrow("->x"), MessageKind::Lost);
        assert_eq!(MessageKind::from_arrow("x<--"), MessageKind::Lost);
    }

    #[test]
    fn message_id_format() {
        let id = MessageId::new(3);
        assert_eq!(id.to_string(), "m3");
        assert_eq!("m3".parse::<MessageId>().unwrap(), id);
        assert!("3".parse::<MessageId>().is_err());
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"m3\"");
    }

    #[test]
    fn block_ids_are_recursive() {
        let mut inner = Branch::new("b2", "x");
        inner.message_ids.push(MessageId::new(2));
        let mut outer = Branch::new("b1", "");
        outer.message_ids.push(MessageId::new(3));
        outer.nested_control_flows.push(ControlFlowBlock {
            kind: BlockKind::Alt,
            opened_after: 1,
            description: "x".into(),
            branches: vec![inner],
        });
        let block = ControlFlowBlock {
            kind: BlockKind::Loop,
            opened_after: 0,
            description: String::new(),
            branches: vec![outer],
        };

        assert_eq!(block.message_ids(), vec![MessageId::new(2), MessageId::new(3)]);
        assert_eq!(block.first_message_id(), Some(MessageId::new(2)));
    }

    #[test]
    fn serializes_with_wire_names() {
        let node = SequenceNode {
            id: "A".into(),
            keyword: "actor".into(),
            reference: "Alice".into(),
        };
        let json = serde_json::to_value(&node).unwrap();
        assert_eq!(json["ref"], "Alice");

        let diagram = SequenceDiagram::default();
        let json = serde_json::to_value(&diagram).unwrap();
        assert!(json.get("controlFlows").is_some());
    }
}
