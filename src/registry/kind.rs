//! Document node kinds that can carry a render override.

use std::fmt;
use std::str::FromStr;

use super::ConfigurationError;

/// A markdown construct eligible for a custom render unit.
///
/// The set is fixed by the markdown grammar. Headings are parameterized by
/// level; only levels 1 through 6 are recognized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum NodeKind {
    Heading(u8),
    Link,
    Image,
    CodeBlock,
    InlineCode,
    Strong,
}

/// The capability a render unit must provide for a node kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    Heading,
    Link,
    Image,
    CodeBlock,
    InlineCode,
    Strong,
}

impl NodeKind {
    /// Every recognized kind, in canonical order.
    pub const ALL: [NodeKind; 11] = [
        NodeKind::Heading(1),
        NodeKind::Heading(2),
        NodeKind::Heading(3),
        NodeKind::Heading(4),
        NodeKind::Heading(5),
        NodeKind::Heading(6),
        NodeKind::Link,
        NodeKind::Image,
        NodeKind::CodeBlock,
        NodeKind::InlineCode,
        NodeKind::Strong,
    ];

    /// Heading kind for a level, if the level exists in markdown.
    pub fn heading(level: u8) -> Option<Self> {
        (1..=6).contains(&level).then_some(NodeKind::Heading(level))
    }

    /// Returns true if this kind can be overridden.
    pub fn is_recognized(&self) -> bool {
        match self {
            NodeKind::Heading(level) => (1..=6).contains(level),
            _ => true,
        }
    }

    /// The capability category a render unit needs to serve this kind.
    pub fn capability(&self) -> Capability {
        match self {
            NodeKind::Heading(_) => Capability::Heading,
            NodeKind::Link => Capability::Link,
            NodeKind::Image => Capability::Image,
            NodeKind::CodeBlock => Capability::CodeBlock,
            NodeKind::InlineCode => Capability::InlineCode,
            NodeKind::Strong => Capability::Strong,
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeKind::Heading(level) => write!(f, "h{level}"),
            NodeKind::Link => f.write_str("a"),
            NodeKind::Image => f.write_str("img"),
            NodeKind::CodeBlock => f.write_str("pre"),
            NodeKind::InlineCode => f.write_str("code"),
            NodeKind::Strong => f.write_str("strong"),
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Capability::Heading => "heading",
            Capability::Link => "link",
            Capability::Image => "image",
            Capability::CodeBlock => "code block",
            Capability::InlineCode => "inline code",
            Capability::Strong => "strong",
        };
        f.write_str(name)
    }
}

impl FromStr for NodeKind {
    type Err = ConfigurationError;

    /// Parse a node kind identifier such as `h2`, `heading-3`, `a` or `pre`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let ident = s.trim().to_ascii_lowercase();

        let kind = match ident.as_str() {
            "a" | "link" => Some(NodeKind::Link),
            "img" | "image" => Some(NodeKind::Image),
            "pre" | "code-block" | "codeblock" => Some(NodeKind::CodeBlock),
            "code" | "inline-code" => Some(NodeKind::InlineCode),
            "strong" | "bold" => Some(NodeKind::Strong),
            other => heading_level(other).and_then(NodeKind::heading),
        };

        kind.ok_or_else(|| ConfigurationError::UnknownNodeKind(s.to_string()))
    }
}

/// Extract the level from `h2`, `heading2` or `heading-2`.
fn heading_level(ident: &str) -> Option<u8> {
    let digits = ident
        .strip_prefix("heading-")
        .or_else(|| ident.strip_prefix("heading"))
        .or_else(|| ident.strip_prefix('h'))?;

    if digits.len() != 1 {
        return None;
    }
    digits.parse().ok()
}
