//! Line-oriented class-diagram parser
//!
//! The parser is a small state machine over [`ScanMode`]. A header such as
//! `class Name <<stereotype>> {` opens a body; every body line is tried as,
//! in order:
//!
//! 1. a method: `[vis] [Type] name(params) [: ReturnType]`
//! 2. a colon-typed attribute: `[vis] name : Type`
//! 3. a space-typed attribute: `[vis] Type name`
//! 4. inside enums only, one or more bare constants
//!
//! Separators (`--`, `..`, `==`, `__`) are skipped and any other body line is
//! dropped. Unrecognized top-level lines land in [`ClassDiagram::others`].
//! A later declaration with an already-seen name replaces the earlier one.

use super::model::{Attribute, ClassDiagram, ClassKind, ClassNode, Method, Parameter, Visibility};
use crate::text::{find_top_level, is_identifier, split_top_level, unquote};
use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::Regex;

static HEADER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"^(?P<kind>abstract\s+class|abstract|class|interface|enum)\s+(?P<name>"[^"]+"|[A-Za-z_$][\w$.]*)(?:<[^<>]+>)?(?:\s*<<\s*(?P<stereo>[^>]*?)\s*>>)?[^{]*?(?P<brace>\{(?P<rest>.*))?$"#,
    )
    .expect("class header pattern is valid")
});

static METHOD: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(?:(?P<prefix>[^()]*?)\s+)?(?P<name>[A-Za-z_$][\w$]*)\s*\((?P<params>.*)\)\s*(?::\s*(?P<ret>.*?))?\s*;?$",
    )
    .expect("method pattern is valid")
});

static COLON_ATTRIBUTE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?P<name>[A-Za-z_$][\w$]*)\s*:\s*(?P<ty>.+?)\s*;?$")
        .expect("attribute pattern is valid")
});

const SEPARATORS: [&str; 4] = ["--", "..", "==", "__"];

const JAVA_MODIFIERS: [&str; 10] = [
    "public",
    "private",
    "protected",
    "static",
    "final",
    "abstract",
    "synchronized",
    "default",
    "transient",
    "volatile",
];

/// Scan state between lines
#[derive(Debug)]
enum ScanMode {
    /// Outside any class body
    TopLevel,
    /// Header seen without `{`; a lone `{` on the next line opens the body
    AwaitingBrace(ClassNode),
    /// Inside a class body
    InClass(ClassNode),
}

/// Class-diagram parser
///
/// Consumed by [`parse`](Self::parse); build a new one per document.
#[derive(Debug)]
pub struct ClassDiagramParser {
    mode: ScanMode,
    nodes: IndexMap<String, ClassNode>,
    others: Vec<String>,
}

impl Default for ClassDiagramParser {
    fn default() -> Self {
        Self::new()
    }
}

impl ClassDiagramParser {
    /// Create parser with empty state
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self {
            mode: ScanMode::TopLevel,
            nodes: IndexMap::new(),
            others: Vec::new(),
        }
    }

    /// Parse diagram text into a graph. Never fails.
    #[must_use]
    pub fn parse(mut self, text: &str) -> ClassDiagram {
        for raw in text.lines() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('\'') {
                continue;
            }
            self.scan_line(line);
        }
        self.flush();

        tracing::debug!(
            classes = self.nodes.len(),
            others = self.others.len(),
            "class diagram parsed"
        );
        ClassDiagram {
            nodes: self.nodes.into_values().collect(),
            others: self.others,
        }
    }

    fn scan_line(&mut self, line: &str) {
        match std::mem::replace(&mut self.mode, ScanMode::TopLevel) {
            ScanMode::TopLevel => self.top_level_line(line),
            ScanMode::AwaitingBrace(node) => {
                if line == "{" {
                    self.mode = ScanMode::InClass(node);
                } else {
                    self.finish(node);
                    self.top_level_line(line);
                }
            }
            ScanMode::InClass(mut node) => {
                if opens_nested_header(line) {
                    tracing::warn!(class = %node.id, "class body not closed before next header");
                    self.finish(node);
                    self.top_level_line(line);
                } else if line == "}" {
                    self.finish(node);
                } else if let Some(member) = line.strip_suffix('}') {
                    Self::body_line(&mut node, member.trim());
                    self.finish(node);
                } else {
                    Self::body_line(&mut node, line);
                    self.mode = ScanMode::InClass(node);
                }
            }
        }
    }

    fn top_level_line(&mut self, line: &str) {
        if line.starts_with("@startuml") || line.starts_with("@enduml") {
            return;
        }
        let Some(caps) = HEADER.captures(line) else {
            tracing::trace!(line, "unrecognized class diagram line");
            self.others.push(line.to_string());
            return;
        };

        let kind = match &caps["kind"] {
            "class" => ClassKind::Class,
            "interface" => ClassKind::Interface,
            "enum" => ClassKind::Enum,
            _ => ClassKind::Abstract,
        };
        let mut node = ClassNode::new(unquote(&caps["name"]), kind);
        node.stereotype = caps
            .name("stereo")
            .map(|m| m.as_str().to_string())
            .filter(|s| !s.is_empty());

        if caps.name("brace").is_none() {
            self.mode = ScanMode::AwaitingBrace(node);
            return;
        }
        let rest = caps.name("rest").map_or("", |m| m.as_str()).trim();
        self.mode = ScanMode::InClass(node);
        if !rest.is_empty() {
            self.scan_line(rest);
        }
    }

    fn flush(&mut self) {
        match std::mem::replace(&mut self.mode, ScanMode::TopLevel) {
            ScanMode::TopLevel => {}
            ScanMode::AwaitingBrace(node) => self.finish(node),
            ScanMode::InClass(node) => {
                tracing::warn!(class = %node.id, "class body not closed at end of input");
                self.finish(node);
            }
        }
    }

    fn finish(&mut self, node: ClassNode) {
        if self.nodes.contains_key(&node.id) {
            tracing::debug!(class = %node.id, "duplicate class declaration replaces earlier one");
        }
        self.nodes.insert(node.id.clone(), node);
    }

    fn body_line(node: &mut ClassNode, line: &str) {
        if line.is_empty() || SEPARATORS.iter().any(|sep| line.starts_with(sep)) {
            return;
        }
        let (marker, body) = split_visibility(line);

        if let Some(method) = parse_method(marker, body) {
            node.methods.push(method);
        } else if let Some(attribute) = parse_colon_attribute(marker, body) {
            node.attributes.push(attribute);
        } else if let Some(attribute) = parse_typed_attribute(marker, body) {
            node.attributes.push(attribute);
        } else if node.kind == ClassKind::Enum {
            match parse_enum_values(line) {
                Some(values) => node.enum_values.extend(values),
                None => tracing::trace!(class = %node.id, line, "dropped enum body line"),
            }
        } else {
            tracing::trace!(class = %node.id, line, "dropped class body line");
        }
    }
}

/// Header line met inside an open body
///
/// A bare `abstract` there is a member modifier, as in `abstract area() : double`.
fn opens_nested_header(line: &str) -> bool {
    HEADER
        .captures(line)
        .is_some_and(|caps| &caps["kind"] != "abstract")
}

/// Skip `{static}`-style modifiers, returning the remainder
fn skip_modifiers(s: &str) -> &str {
    let mut s = s.trim_start();
    while s.starts_with('{') {
        match s.find('}') {
            Some(end) => s = s[end + 1..].trim_start(),
            None => break,
        }
    }
    s
}

/// Split the optional visibility marker off a member line
fn split_visibility(line: &str) -> (Option<Visibility>, &str) {
    let rest = skip_modifiers(line);
    match rest.chars().next().and_then(Visibility::from_marker) {
        Some(vis) => (Some(vis), skip_modifiers(&rest[1..])),
        None => (None, rest),
    }
}

/// Drop leading Java keywords, returning any visibility they implied
fn strip_java_modifiers(s: &str) -> (Option<Visibility>, &str) {
    let mut vis = None;
    let mut rest = s.trim();
    loop {
        let (word, tail) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));
        if word.is_empty() || !JAVA_MODIFIERS.contains(&word) {
            break;
        }
        vis = match word {
            "public" => Some(Visibility::Public),
            "private" => Some(Visibility::Private),
            "protected" => Some(Visibility::Protected),
            _ => vis,
        };
        rest = tail.trim_start();
    }
    (vis, rest)
}

fn parse_method(marker: Option<Visibility>, body: &str) -> Option<Method> {
    let caps = METHOD.captures(body)?;
    let (implied, prefix_type) = caps
        .name("prefix")
        .map_or((None, ""), |m| strip_java_modifiers(m.as_str()));
    let return_type = caps
        .name("ret")
        .map(|m| m.as_str().trim())
        .filter(|r| !r.is_empty())
        .or(Some(prefix_type).filter(|p| !p.is_empty()))
        .unwrap_or("void");

    Some(Method {
        name: caps["name"].to_string(),
        parameters: parse_parameters(&caps["params"]),
        return_type: return_type.to_string(),
        visibility: marker.or(implied).unwrap_or_default(),
    })
}

/// Parameters split on top-level commas, each `name : Type`, `Type name` or `Type`
fn parse_parameters(list: &str) -> Vec<Parameter> {
    split_top_level(list, ',')
        .into_iter()
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(|p| {
            if let Some(idx) = find_top_level(p, ':') {
                return Parameter {
                    name: p[..idx].trim().to_string(),
                    ty: p[idx + 1..].trim().to_string(),
                };
            }
            match p.rsplit_once(char::is_whitespace) {
                Some((ty, name)) if is_identifier(name) && !ty.trim().is_empty() => Parameter {
                    name: name.to_string(),
                    ty: ty.trim().to_string(),
                },
                _ => Parameter {
                    name: String::new(),
                    ty: p.to_string(),
                },
            }
        })
        .collect()
}

/// Type without a trailing `= default`
fn strip_default(ty: &str) -> &str {
    match find_top_level(ty, '=') {
        Some(idx) => ty[..idx].trim(),
        None => ty.trim(),
    }
}

fn parse_colon_attribute(marker: Option<Visibility>, body: &str) -> Option<Attribute> {
    let caps = COLON_ATTRIBUTE.captures(body)?;
    let ty = strip_default(&caps["ty"]);
    if ty.is_empty() {
        return None;
    }
    Some(Attribute {
        name: caps["name"].to_string(),
        ty: ty.to_string(),
        visibility: marker.unwrap_or_default(),
    })
}

fn parse_typed_attribute(marker: Option<Visibility>, body: &str) -> Option<Attribute> {
    let body = strip_default(body.trim_end_matches(';'));
    if body.contains(':') || body.contains('(') {
        return None;
    }
    let (ty, name) = body.rsplit_once(char::is_whitespace)?;
    let (implied, ty) = strip_java_modifiers(ty);
    if !is_identifier(name) || ty.is_empty() || ty.ends_with(',') {
        return None;
    }
    Some(Attribute {
        name: name.to_string(),
        ty: ty.to_string(),
        visibility: marker.or(implied).unwrap_or_default(),
    })
}

/// One or more comma-separated bare constants
fn parse_enum_values(line: &str) -> Option<Vec<String>> {
    let values: Vec<String> = line
        .split(',')
        .map(|v| v.trim().trim_end_matches(';').trim())
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .collect();
    let bare = !values.is_empty()
        && values
            .iter()
            .all(|v| !v.contains(char::is_whitespace) && !v.contains(':'));
    bare.then_some(values)
}
