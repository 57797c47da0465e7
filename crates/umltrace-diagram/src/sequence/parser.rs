//! Stack-based sequence-diagram parser
//!
//! Lines are classified, first match wins, as: participant declaration,
//! message, note, block opener, `else`, `end`, ignored directive. Anything
//! else is kept in [`SequenceDiagram::others`].
//!
//! Open control-flow blocks live on a frame stack. A block is attached to
//! its parent's current branch (or the top-level forest) when its `end` is
//! seen; blocks still open at end of input are closed implicitly.

use super::arrow::scan_message;
use super::model::{
    BlockKind, Branch, ControlFlowBlock, Message, MessageId, MessageKind, SequenceDiagram,
    SequenceNode, PARTICIPANT_KEYWORDS,
};
use crate::text::unquote;
use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::Regex;

static PARTICIPANT: Lazy<Regex> = Lazy::new(|| {
    let keywords = PARTICIPANT_KEYWORDS.join("|");
    Regex::new(&format!(r"^(?P<keyword>{keywords})\s+(?P<rest>.+)$"))
        .expect("participant pattern is valid")
});

static NOTE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^[hr]?note\s+(?:left|right|over)(?:\s+of)?\s+(?P<who>[^:]+?)\s*(?::\s*(?P<text>.*))?$",
    )
    .expect("note pattern is valid")
});

/// Line prefixes that are valid notation but carry nothing we model
const IGNORED_PREFIXES: [&str; 21] = [
    "activate",
    "deactivate",
    "destroy",
    "create",
    "autonumber",
    "autoactivate",
    "skinparam",
    "title",
    "hide",
    "show",
    "header",
    "footer",
    "newpage",
    "box",
    "end box",
    "end note",
    "==",
    "...",
    "|||",
    "||",
    "!",
];

/// Scan state between lines
#[derive(Debug)]
enum ScanMode {
    Lines,
    /// Inside a multi-line note, collecting its body
    Note(PendingNote),
}

#[derive(Debug)]
struct PendingNote {
    sender: String,
    receiver: String,
    lines: Vec<String>,
}

/// One open control-flow block
#[derive(Debug)]
struct Frame {
    block: ControlFlowBlock,
}

impl Frame {
    fn current_branch(&mut self) -> Option<&mut Branch> {
        self.block.branches.last_mut()
    }
}

/// Sequence-diagram parser
///
/// Consumed by [`parse`](Self::parse); build a new one per document.
#[derive(Debug)]
pub struct SequenceDiagramParser {
    mode: ScanMode,
    next_message: u32,
    next_branch: u32,
    stack: Vec<Frame>,
    nodes: IndexMap<String, SequenceNode>,
    messages: Vec<Message>,
    control_flows: Vec<ControlFlowBlock>,
    others: Vec<String>,
}

impl Default for SequenceDiagramParser {
    fn default() -> Self {
        Self::new()
    }
}

impl SequenceDiagramParser {
    /// Create parser with empty state
    #[must_use]
    pub fn new() -> Self {
        Self {
            mode: ScanMode::Lines,
            next_message: 1,
            next_branch: 1,
            stack: Vec::new(),
            nodes: IndexMap::new(),
            messages: Vec::new(),
            control_flows: Vec::new(),
            others: Vec::new(),
        }
    }

    /// Parse diagram text into a graph. Never fails.
    #[must_use]
    pub fn parse(mut self, text: &str) -> SequenceDiagram {
        for raw in text.lines() {
            let line = raw.trim();
            match &mut self.mode {
                ScanMode::Note(note) => {
                    if line == "end note" || line == "endnote" {
                        self.close_note();
                    } else {
                        note.lines.push(line.to_string());
                    }
                }
                ScanMode::Lines => self.classify(line),
            }
        }
        self.finish();

        tracing::debug!(
            participants = self.nodes.len(),
            messages = self.messages.len(),
            blocks = self.control_flows.len(),
            others = self.others.len(),
            "sequence diagram parsed"
        );
        SequenceDiagram {
            nodes: self.nodes.into_values().collect(),
            messages: self.messages,
            control_flows: self.control_flows,
            others: self.others,
        }
    }

    fn classify(&mut self, line: &str) {
        if line.is_empty()
            || line.starts_with('\'')
            || line.starts_with("@startuml")
            || line.starts_with("@enduml")
        {
            return;
        }

        if let Some(caps) = PARTICIPANT.captures(line) {
            if let Some(node) = participant(&caps["keyword"], &caps["rest"]) {
                self.declare(node);
                return;
            }
        }
        if let Some(arrow) = scan_message(line) {
            let (sender, receiver) = if arrow.is_reversed() {
                (arrow.receiver, arrow.sender)
            } else {
                (arrow.sender, arrow.receiver)
            };
            let kind = MessageKind::from_arrow(&arrow.arrow);
            self.push_message(kind, sender.to_string(), receiver.to_string(), arrow.text.to_string());
            return;
        }
        if let Some(caps) = NOTE.captures(line) {
            self.open_note(&caps["who"], caps.name("text").map(|m| m.as_str().trim()));
            return;
        }

        let (word, rest) = line
            .split_once(char::is_whitespace)
            .map_or((line, ""), |(w, r)| (w, r.trim()));
        // `alt#Gold` carries a background colour
        let word = word.split_once('#').map_or(word, |(keyword, _)| keyword);
        if let Some(kind) = BlockKind::from_keyword(word) {
            self.open_block(kind, rest);
        } else if word == "else" {
            self.add_branch(line, rest);
        } else if line == "end" {
            self.close_block();
        } else if IGNORED_PREFIXES.iter().any(|p| line.starts_with(p)) {
            tracing::trace!(line, "ignored sequence directive");
        } else {
            tracing::trace!(line, "unrecognized sequence diagram line");
            self.others.push(line.to_string());
        }
    }

    fn declare(&mut self, node: SequenceNode) {
        if self.nodes.contains_key(&node.id) {
            tracing::debug!(participant = %node.id, "duplicate participant ignored");
            return;
        }
        self.nodes.insert(node.id.clone(), node);
    }

    fn push_message(&mut self, kind: MessageKind, sender: String, receiver: String, text: String) {
        let id = MessageId::new(self.next_message);
        self.next_message += 1;
        if let Some(branch) = self.stack.last_mut().and_then(Frame::current_branch) {
            branch.message_ids.push(id);
        }
        self.messages.push(Message {
            id,
            kind,
            sender,
            receiver,
            text,
        });
    }

    fn open_note(&mut self, who: &str, text: Option<&str>) {
        // drop a trailing #color
        let who = who.split('#').next().unwrap_or(who);
        let mut targets = who.split(',').map(|w| unquote(w).to_string());
        let sender = targets.next().unwrap_or_default();
        let receiver = targets.next().unwrap_or_else(|| sender.clone());

        match text {
            Some(text) => self.push_message(MessageKind::Note, sender, receiver, text.to_string()),
            None => {
                self.mode = ScanMode::Note(PendingNote {
                    sender,
                    receiver,
                    lines: Vec::new(),
                });
            }
        }
    }

    fn close_note(&mut self) {
        if let ScanMode::Note(note) = std::mem::replace(&mut self.mode, ScanMode::Lines) {
            let text = note.lines.join("\n").trim().to_string();
            self.push_message(MessageKind::Note, note.sender, note.receiver, text);
        }
    }

    fn new_branch(&mut self, condition: &str) -> Branch {
        let branch = Branch::new(format!("b{}", self.next_branch), condition);
        self.next_branch += 1;
        branch
    }

    fn open_block(&mut self, kind: BlockKind, rest: &str) {
        let branch = self.new_branch(rest);
        self.stack.push(Frame {
            block: ControlFlowBlock {
                kind,
                opened_after: self.next_message - 1,
                description: rest.to_string(),
                branches: vec![branch],
            },
        });
    }

    fn add_branch(&mut self, line: &str, condition: &str) {
        if self.stack.is_empty() {
            tracing::warn!(line, "'else' without an open block");
            self.others.push(line.to_string());
            return;
        }
        let branch = self.new_branch(condition);
        if let Some(frame) = self.stack.last_mut() {
            frame.block.branches.push(branch);
        }
    }

    fn close_block(&mut self) {
        let Some(frame) = self.stack.pop() else {
            tracing::debug!("'end' without an open block ignored");
            return;
        };
        match self.stack.last_mut().and_then(Frame::current_branch) {
            Some(parent) => parent.nested_control_flows.push(frame.block),
            None => self.control_flows.push(frame.block),
        }
    }

    fn finish(&mut self) {
        if matches!(self.mode, ScanMode::Note(_)) {
            tracing::warn!("note not terminated by 'end note' at end of input");
            self.close_note();
        }
        if !self.stack.is_empty() {
            tracing::warn!(open = self.stack.len(), "control-flow blocks closed at end of input");
        }
        while !self.stack.is_empty() {
            self.close_block();
        }
    }
}

/// Resolve the declaration remainder into id and display name
///
/// `X as Y` makes `Y` the id unless only `Y` is quoted, in which case `X`
/// is the id and `Y` the display name.
fn participant(keyword: &str, rest: &str) -> Option<SequenceNode> {
    let (first, first_quoted, tail) = take_name(rest)?;
    if !first_quoted && first.starts_with(['-', '<', '>']) {
        // `queue -> B` is a message from a participant named `queue`
        return None;
    }
    let tail = tail.trim_start();
    let alias = tail
        .strip_prefix("as")
        .filter(|t| t.starts_with(char::is_whitespace))
        .and_then(|t| take_name(t.trim_start()));

    let (id, reference) = match alias {
        Some((second, true, _)) if !first_quoted => (first, second),
        Some((second, _, _)) => (second, first),
        None => (first, first),
    };
    Some(SequenceNode {
        id: id.to_string(),
        keyword: keyword.to_string(),
        reference: reference.to_string(),
    })
}

/// Quoted string or bare name, stopping before `#color` and `<<stereotype>>`
fn take_name(s: &str) -> Option<(&str, bool, &str)> {
    if let Some(inner) = s.strip_prefix('"') {
        let close = inner.find('"')?;
        return Some((&inner[..close], true, &inner[close + 1..]));
    }
    let end = s
        .find(|c: char| c.is_whitespace() || c == '#' || c == '<')
        .unwrap_or(s.len());
    (end > 0).then(|| (&s[..end], false, &s[end..]))
}
