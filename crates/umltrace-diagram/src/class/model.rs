//! Class-diagram graph types

use serde::{Deserialize, Serialize};
use std::fmt;

/// Declaration keyword of a class node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClassKind {
    /// `class`
    Class,
    /// `interface`
    Interface,
    /// `abstract` or `abstract class`
    Abstract,
    /// `enum`
    Enum,
}

impl ClassKind {
    /// Keyword used when rendering the header
    #[inline]
    #[must_use]
    pub fn keyword(&self) -> &'static str {
        match self {
            ClassKind::Class => "class",
            ClassKind::Interface => "interface",
            ClassKind::Abstract => "abstract class",
            ClassKind::Enum => "enum",
        }
    }
}

/// Member visibility marker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Visibility {
    /// `+`, also the default for unmarked members
    #[default]
    #[serde(rename = "+")]
    Public,
    /// `-`
    #[serde(rename = "-")]
    Private,
    /// `#`
    #[serde(rename = "#")]
    Protected,
    /// `~`
    #[serde(rename = "~")]
    Package,
}

impl Visibility {
    /// Parse a marker character
    #[inline]
    #[must_use]
    pub fn from_marker(marker: char) -> Option<Self> {
        match marker {
            '+' => Some(Self::Public),
            '-' => Some(Self::Private),
            '#' => Some(Self::Protected),
            '~' => Some(Self::Package),
            _ => None,
        }
    }

    /// Marker character
    #[inline]
    #[must_use]
    pub fn marker(&self) -> char {
        match self {
            Self::Public => '+',
            Self::Private => '-',
            Self::Protected => '#',
            Self::Package => '~',
        }
    }
}

impl fmt::Display for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.marker())
    }
}

/// Attribute declared in a class body
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Attribute {
    /// Attribute name
    pub name: String,
    /// Declared type
    #[serde(rename = "type")]
    pub ty: String,
    /// Visibility marker
    pub visibility: Visibility,
}

/// Method parameter
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Parameter {
    /// Parameter name, empty when only a type was written
    pub name: String,
    /// Parameter type, empty when only a name was written
    #[serde(rename = "type")]
    pub ty: String,
}

/// Method declared in a class body
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Method {
    /// Method name
    pub name: String,
    /// Parameters in declaration order
    pub parameters: Vec<Parameter>,
    /// Return type, `void` when omitted
    pub return_type: String,
    /// Visibility marker
    pub visibility: Visibility,
}

/// Class, interface, abstract class or enum
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassNode {
    /// Declared name, unique per diagram
    pub id: String,
    /// Declaration keyword
    pub kind: ClassKind,
    /// `<<stereotype>>` from the header
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stereotype: Option<String>,
    /// Attributes in body order
    pub attributes: Vec<Attribute>,
    /// Methods in body order
    pub methods: Vec<Method>,
    /// Enum constants, only for enum nodes
    pub enum_values: Vec<String>,
}

impl ClassNode {
    /// Create empty node
    #[inline]
    #[must_use]
    pub fn new(id: impl Into<String>, kind: ClassKind) -> Self {
        Self {
            id: id.into(),
            kind,
            stereotype: None,
            attributes: Vec::new(),
            methods: Vec::new(),
            enum_values: Vec::new(),
        }
    }

    /// Find attribute by name
    #[inline]
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.iter().find(|a| a.name == name)
    }

    /// Find first method with the given name
    #[inline]
    #[must_use]
    pub fn method(&self, name: &str) -> Option<&Method> {
        self.methods.iter().find(|m| m.name == name)
    }
}

/// Parsed class diagram
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ClassDiagram {
    /// Class nodes, unique by id
    pub nodes: Vec<ClassNode>,
    /// Top-level lines no rule recognized, kept verbatim
    pub others: Vec<String>,
}

impl ClassDiagram {
    /// Parse diagram text with a fresh parser
    #[inline]
    #[must_use]
    pub fn parse(text: &str) -> Self {
        super::ClassDiagramParser::new().parse(text)
    }

    /// Find node by id
    #[inline]
    #[must_use]
    pub fn node(&self, id: &str) -> Option<&ClassNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    /// Number of nodes
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if no node was recognized
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
