//! Inline node kinds
//!
//! This module defines inline-level kinds that appear inside blocks,
//! such as text, formatting, anchors, cross references and footnotes.

use serde::{Deserialize, Serialize};

/// Inline-level content kind
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InlineKind {
    /// Plain text content
    Text(String),
    /// Formatted content; the formatted inlines are the node's children
    Format(FormatType),
    /// An inline anchor; the anchor id is the node's `id`
    Anchor,
    /// A bibliography entry anchor; the entry id is the node's `id`
    Bibref,
    /// A cross reference to an anchor, possibly in another chapter
    Xref {
        /// Raw target expression: `anchor` or `chapter#anchor`
        target: String,
        /// Author-supplied link text
        #[serde(default, skip_serializing_if = "Option::is_none")]
        text: Option<String>,
    },
    /// A footnote marker; the first occurrence carrying children defines the body
    Footnote {
        /// Footnote number assigned by the parser
        index: u32,
    },
    /// An external hyperlink; link text is the node's children
    Link {
        /// The URL target
        url: String,
    },
    /// A hard line break
    LineBreak,
}

/// Text formatting types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormatType {
    /// Bold text
    Strong,
    /// Italic text
    Emphasis,
    /// Monospace/code text
    Monospace,
    /// Highlighted text
    Mark,
    /// Superscript text
    Superscript,
    /// Subscript text
    Subscript,
}

impl FormatType {
    /// XHTML element name for this format
    pub fn tag(self) -> &'static str {
        match self {
            FormatType::Strong => "strong",
            FormatType::Emphasis => "em",
            FormatType::Monospace => "code",
            FormatType::Mark => "mark",
            FormatType::Superscript => "sup",
            FormatType::Subscript => "sub",
        }
    }
}
