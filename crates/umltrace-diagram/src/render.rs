//! PlantUML rendering of parsed graphs
//!
//! Every recognized field is written back, so parsing the rendered text
//! yields the same graph. Lines kept in `others` are not rendered.

use crate::class::{ClassDiagram, ClassNode, Method};
use crate::sequence::{ControlFlowBlock, Message, MessageId, MessageKind, SequenceDiagram};
use crate::text::quote_if_needed;
use std::collections::{HashMap, HashSet};
use std::fmt::{self, Write};

impl ClassDiagram {
    /// Render as a `@startuml` block
    #[must_use]
    pub fn to_plantuml(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for ClassDiagram {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "@startuml")?;
        for node in &self.nodes {
            write_class(f, node)?;
        }
        write!(f, "@enduml")
    }
}

fn write_class(f: &mut impl Write, node: &ClassNode) -> fmt::Result {
    write!(f, "{} {}", node.kind.keyword(), quote_if_needed(&node.id))?;
    if let Some(stereotype) = &node.stereotype {
        write!(f, " <<{stereotype}>>")?;
    }
    writeln!(f, " {{")?;
    for value in &node.enum_values {
        writeln!(f, "  {value}")?;
    }
    for attr in &node.attributes {
        writeln!(f, "  {}{} : {}", attr.visibility, attr.name, attr.ty)?;
    }
    for method in &node.methods {
        write_method(f, method)?;
    }
    writeln!(f, "}}")
}

fn write_method(f: &mut impl Write, method: &Method) -> fmt::Result {
    let params: Vec<String> = method
        .parameters
        .iter()
        .map(|p| match (p.name.is_empty(), p.ty.is_empty()) {
            (true, _) => p.ty.clone(),
            (false, true) => format!("{} :", p.name),
            (false, false) => format!("{} : {}", p.name, p.ty),
        })
        .collect();
    writeln!(
        f,
        "  {}{}({}) : {}",
        method.visibility,
        method.name,
        params.join(", "),
        method.return_type
    )
}

impl SequenceDiagram {
    /// Render as a `@startuml` block
    #[must_use]
    pub fn to_plantuml(&self) -> String {
        self.to_string()
    }
}

/// Body entry ordered by source position
enum Entry<'a> {
    Message(&'a Message),
    Block(&'a ControlFlowBlock),
}

impl Entry<'_> {
    /// A block sorts right after the message preceding its opening line
    fn key(&self) -> (u32, bool) {
        match self {
            Entry::Message(m) => (m.id.seq(), false),
            Entry::Block(b) => (b.opened_after, true),
        }
    }
}

struct SequenceWriter<'a> {
    messages: HashMap<MessageId, &'a Message>,
}

impl<'a> SequenceWriter<'a> {
    fn entries(
        &self,
        ids: impl IntoIterator<Item = MessageId>,
        blocks: &'a [ControlFlowBlock],
    ) -> Vec<Entry<'a>> {
        let mut entries: Vec<Entry<'a>> = ids
            .into_iter()
            .filter_map(|id| self.messages.get(&id).copied())
            .map(Entry::Message)
            .chain(blocks.iter().map(Entry::Block))
            .collect();
        entries.sort_by_key(Entry::key);
        entries
    }

    fn write_entries(&self, f: &mut impl Write, entries: &[Entry<'a>], depth: usize) -> fmt::Result {
        for entry in entries {
            match entry {
                Entry::Message(m) => write_message(f, m, depth)?,
                Entry::Block(b) => self.write_block(f, b, depth)?,
            }
        }
        Ok(())
    }

    fn write_block(&self, f: &mut impl Write, block: &'a ControlFlowBlock, depth: usize) -> fmt::Result {
        let indent = "  ".repeat(depth);
        for (index, branch) in block.branches.iter().enumerate() {
            if index == 0 {
                writeln!(f, "{indent}{} {}", block.kind.keyword(), block.description)?;
            } else {
                writeln!(f, "{indent}else {}", branch.condition)?;
            }
            let entries = self.entries(branch.message_ids.iter().copied(), &branch.nested_control_flows);
            self.write_entries(f, &entries, depth + 1)?;
        }
        writeln!(f, "{indent}end")
    }
}

fn write_message(f: &mut impl Write, message: &Message, depth: usize) -> fmt::Result {
    let indent = "  ".repeat(depth);
    let sender = quote_if_needed(&message.sender);
    let receiver = quote_if_needed(&message.receiver);

    if message.kind == MessageKind::Note {
        let who = if message.sender == message.receiver {
            sender
        } else {
            format!("{sender}, {receiver}")
        };
        if message.text.contains('\n') {
            writeln!(f, "{indent}note over {who}")?;
            for line in message.text.lines() {
                writeln!(f, "{indent}{line}")?;
            }
            return writeln!(f, "{indent}end note");
        }
        return writeln!(f, "{indent}note over {who} : {}", message.text);
    }

    write!(f, "{indent}{sender} {} {receiver}", message.kind.arrow())?;
    if message.text.is_empty() {
        writeln!(f)
    } else {
        writeln!(f, " : {}", message.text)
    }
}

impl fmt::Display for SequenceDiagram {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "@startuml")?;
        for node in &self.nodes {
            if node.id == node.reference {
                writeln!(f, "{} {}", node.keyword, quote_if_needed(&node.id))?;
            } else {
                writeln!(
                    f,
                    "{} \"{}\" as {}",
                    node.keyword,
                    node.reference,
                    quote_if_needed(&node.id)
                )?;
            }
        }

        let nested: HashSet<MessageId> = self
            .control_flows
            .iter()
            .flat_map(ControlFlowBlock::message_ids)
            .collect();
        let writer = SequenceWriter {
            messages: self.messages.iter().map(|m| (m.id, m)).collect(),
        };
        let top_level = self
            .messages
            .iter()
            .map(|m| m.id)
            .filter(|id| !nested.contains(id));
        let entries = writer.entries(top_level, &self.control_flows);
        writer.write_entries(f, &entries, 0)?;
        write!(f, "@enduml")
    }
}

#[cfg(test)]
mod tests {
    use crate::class::ClassDiagram;
    use crate::sequence::SequenceDiagram;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    #[test]
    fn class_round_trip() {
        let text = "\
class Order <<entity>> {
  - id : long
  + items : List<Item>
  + total(currency : String, Map<K,V>) : Money
  ~ reset()
}
enum Status {
  OPEN, CLOSED
}
interface Repository
";
        let first = ClassDiagram::parse(text);
        let rendered = first.to_plantuml();
        assert_eq!(ClassDiagram::parse(&rendered), first);
        assert!(rendered.contains("+total(currency : String, Map<K,V>) : Money"));
    }

    #[test]
    fn sequence_round_trip_with_nesting() {
        let text = "\
actor User
participant \"Order Service\" as OS
User -> OS : place(order)
loop each line
  OS -> OS : price()
  alt in stock
    OS --> User : ok
  else missing
    note over OS, User
    out of stock
    retry later
    end note
    OS ->x User : cancel
  end
  OS ->> User : progress
end
User -> OS : done
";
        let first = SequenceDiagram::parse(text);
        let rendered = first.to_plantuml();
        assert_eq!(SequenceDiagram::parse(&rendered), first);
    }

    #[test]
    fn empty_blocks_keep_their_position() {
        let text = "alt nothing here\nend\nA -> B : one\nloop again\nA -> B : two\nopt\nend\nend\ngroup tail\nend";
        let first = SequenceDiagram::parse(text);
        let rendered = first.to_plantuml();
        let again = SequenceDiagram::parse(&rendered);

        assert_eq!(again, first);
        let kinds: Vec<&str> = again.control_flows.iter().map(|b| b.kind.keyword()).collect();
        assert_eq!(kinds, vec!["alt", "loop", "group"]);
        assert_eq!(again.control_flows[0].branches[0].id, "b1");
        assert!(rendered.find("alt nothing here").unwrap() < rendered.find("A -> B : one").unwrap());
    }

    fn ident() -> impl Strategy<Value = String> {
        "[A-Z][a-z]{1,6}".prop_map(|s| format!("P{s}"))
    }

    fn class_text() -> impl Strategy<Value = String> {
        let member = (ident(), ident(), prop::bool::ANY).prop_map(|(name, ty, method)| {
            if method {
                format!("  -{}(arg : {ty}) : {ty}", name.to_lowercase())
            } else {
                format!("  #{} : {ty}", name.to_lowercase())
            }
        });
        prop::collection::vec((ident(), prop::collection::vec(member, 0..5)), 1..5).prop_map(
            |classes| {
                classes
                    .into_iter()
                    .map(|(name, members)| format!("class {name} {{\n{}\n}}\n", members.join("\n")))
                    .collect()
            },
        )
    }

    #[derive(Debug, Clone)]
    enum Stmt {
        Call(String, String, String),
        Note(String, String),
        Block(&'static str, Vec<Vec<Stmt>>),
    }

    fn stmt() -> impl Strategy<Value = Stmt> {
        let leaf = prop_oneof![
            (ident(), ident(), "[a-z]{1,8}").prop_map(|(a, b, t)| Stmt::Call(a, b, t)),
            (ident(), "[a-z ]{1,12}").prop_map(|(a, t)| Stmt::Note(a, t)),
        ];
        leaf.prop_recursive(3, 24, 4, |inner| {
            (
                prop::sample::select(vec!["alt", "opt", "loop", "par", "critical"]),
                prop::collection::vec(prop::collection::vec(inner, 0..4), 1..3),
            )
                .prop_map(|(kind, branches)| Stmt::Block(kind, branches))
        })
    }

    fn write_stmt(out: &mut String, stmt: &Stmt) {
        match stmt {
            Stmt::Call(a, b, t) => out.push_str(&format!("{a} -> {b} : {t}\n")),
            Stmt::Note(a, t) => out.push_str(&format!("note over {a} : {}\n", t.trim())),
            Stmt::Block(kind, branches) => {
                for (i, branch) in branches.iter().enumerate() {
                    if i == 0 {
                        out.push_str(&format!("{kind} guard\n"));
                    } else {
                        out.push_str(&format!("else other{i}\n"));
                    }
                    for s in branch {
                        write_stmt(out, s);
                    }
                }
                out.push_str("end\n");
            }
        }
    }

    proptest! {
        #[test]
        fn class_parse_render_parse_is_identity(text in class_text()) {
            let first = ClassDiagram::parse(&text);
            let second = ClassDiagram::parse(&first.to_plantuml());
            prop_assert_eq!(first, second);
        }

        #[test]
        fn sequence_parse_render_parse_is_identity(stmts in prop::collection::vec(stmt(), 1..6)) {
            let mut text = String::new();
            for s in &stmts {
                write_stmt(&mut text, s);
            }
            let first = SequenceDiagram::parse(&text);
            let second = SequenceDiagram::parse(&first.to_plantuml());
            prop_assert_eq!(first, second);
        }
    }
}
