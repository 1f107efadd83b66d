//! Block-level node kinds
//!
//! Blocks hold either inline children (paragraphs, listings) or further
//! blocks (sidebars, lists, tables). Sections are not blocks; see
//! [`crate::NodeKind::Section`].

use serde::{Deserialize, Serialize};

/// Block-level content kind
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockKind {
    /// A paragraph of inline content
    Paragraph,
    /// Source code or preformatted listing
    Listing,
    /// Literal block (preformatted, no highlighting)
    Literal,
    /// Quotation; attribution is read from the `attribution` attribute
    Quote,
    /// Sidebar aside
    Sidebar,
    /// Example block
    Example,
    /// Open block (generic container)
    Open,
    /// An admonition block (note, warning, etc.)
    Admonition(AdmonitionType),
    /// An ordered or unordered list; children are list items
    List(ListType),
    /// A single list item
    ListItem,
    /// A table; children are rows
    Table,
    /// A table row; children are cells
    TableRow {
        /// Whether this is a header row
        #[serde(default)]
        header: bool,
    },
    /// A table cell
    TableCell,
    /// A block image
    Image {
        /// Image path relative to the content documents
        target: String,
        /// Alternative text for accessibility
        #[serde(default, skip_serializing_if = "Option::is_none")]
        alt: Option<String>,
    },
    /// Forced page break
    PageBreak,
    /// Horizontal rule
    ThematicBreak,
}

/// List type variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ListType {
    /// Unordered/bullet list
    Unordered,
    /// Ordered/numbered list
    Ordered,
}

/// Admonition type variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdmonitionType {
    Note,
    Tip,
    Important,
    Warning,
    Caution,
}

impl AdmonitionType {
    /// Lowercase name used for CSS classes
    pub fn name(self) -> &'static str {
        match self {
            AdmonitionType::Note => "note",
            AdmonitionType::Tip => "tip",
            AdmonitionType::Important => "important",
            AdmonitionType::Warning => "warning",
            AdmonitionType::Caution => "caution",
        }
    }

    /// EPUB structural semantic for the rendered aside
    pub fn epub_type(self) -> &'static str {
        match self {
            AdmonitionType::Tip => "help",
            AdmonitionType::Note => "note",
            AdmonitionType::Important | AdmonitionType::Warning | AdmonitionType::Caution => {
                "warning"
            }
        }
    }
}
