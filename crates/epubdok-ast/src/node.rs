//! Document node tree
//!
//! This module defines [`Node`], the single node type of the parsed
//! document tree, and [`NodeKind`], the closed set of node kinds.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::block::BlockKind;
use crate::inline::{FormatType, InlineKind};
use crate::section::SectionRole;

/// Kind of a node in the document tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    /// The document root
    Document,
    /// Content between the document header and the first section
    Preamble,
    /// A titled section
    Section {
        /// Structural role (appendix, glossary, ...)
        #[serde(default)]
        role: SectionRole,
    },
    /// Block-level content
    Block(BlockKind),
    /// Inline content
    Inline(InlineKind),
}

/// A node in the parsed document tree
///
/// Children are owned exclusively by their parent, so the tree never
/// shares or cycles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    /// Node kind
    pub kind: NodeKind,
    /// Nesting depth (0 = document root, n = section level)
    #[serde(default)]
    pub level: u8,
    /// Stable identifier, unique across the tree once assigned
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Display title
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Precomputed reference text used when an xref supplies none
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reftext: Option<String>,
    /// Ordered child nodes
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Node>,
    /// Author metadata and annotations
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub attributes: HashMap<String, String>,
}

impl Node {
    /// Create a bare node of the given kind and level
    pub fn new(kind: NodeKind, level: u8) -> Self {
        Self {
            kind,
            level,
            id: None,
            title: None,
            reftext: None,
            children: Vec::new(),
            attributes: HashMap::new(),
        }
    }

    /// Create a document root with a title
    pub fn document(title: impl Into<String>) -> Self {
        Self::new(NodeKind::Document, 0).with_title(title)
    }

    /// Create an untitled document root
    pub fn untitled_document() -> Self {
        Self::new(NodeKind::Document, 0)
    }

    /// Create a preamble
    pub fn preamble() -> Self {
        Self::new(NodeKind::Preamble, 0)
    }

    /// Create a regular section
    pub fn section(level: u8, title: impl Into<String>) -> Self {
        Self::new(
            NodeKind::Section {
                role: SectionRole::Chapter,
            },
            level,
        )
        .with_title(title)
    }

    /// Create a block node
    pub fn block(kind: BlockKind) -> Self {
        Self::new(NodeKind::Block(kind), 0)
    }

    /// Create a paragraph holding a single text inline
    pub fn paragraph(text: impl Into<String>) -> Self {
        Self::block(BlockKind::Paragraph).with_child(Self::text(text))
    }

    /// Create a text inline
    pub fn text(text: impl Into<String>) -> Self {
        Self::inline(InlineKind::Text(text.into()))
    }

    /// Create an inline node
    pub fn inline(kind: InlineKind) -> Self {
        Self::new(NodeKind::Inline(kind), 0)
    }

    /// Create a formatted inline wrapping text
    pub fn format(format: FormatType, text: impl Into<String>) -> Self {
        Self::inline(InlineKind::Format(format)).with_child(Self::text(text))
    }

    /// Create an inline anchor
    pub fn anchor(id: impl Into<String>) -> Self {
        Self::inline(InlineKind::Anchor).with_id(id)
    }

    /// Create a bibliography entry anchor
    pub fn bibref(id: impl Into<String>) -> Self {
        Self::inline(InlineKind::Bibref).with_id(id)
    }

    /// Create a cross reference without explicit text
    pub fn xref(target: impl Into<String>) -> Self {
        Self::inline(InlineKind::Xref {
            target: target.into(),
            text: None,
        })
    }

    /// Create a cross reference with explicit link text
    pub fn xref_with_text(target: impl Into<String>, text: impl Into<String>) -> Self {
        Self::inline(InlineKind::Xref {
            target: target.into(),
            text: Some(text.into()),
        })
    }

    /// Create a footnote definition with a text body
    pub fn footnote(index: u32, body: impl Into<String>) -> Self {
        Self::inline(InlineKind::Footnote { index }).with_child(Self::text(body))
    }

    /// Create a reference back to an already defined footnote
    pub fn footnote_ref(index: u32) -> Self {
        Self::inline(InlineKind::Footnote { index })
    }

    /// Set the id
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Set the title
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set the reference text
    pub fn with_reftext(mut self, reftext: impl Into<String>) -> Self {
        self.reftext = Some(reftext.into());
        self
    }

    /// Set the section role; no effect on non-section nodes
    pub fn with_role(mut self, new_role: SectionRole) -> Self {
        if let NodeKind::Section { role } = &mut self.kind {
            *role = new_role;
        }
        self
    }

    /// Append a child
    pub fn with_child(mut self, child: Node) -> Self {
        self.children.push(child);
        self
    }

    /// Set an attribute
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_attribute(key, value);
        self
    }

    /// Append a child
    pub fn push(&mut self, child: Node) {
        self.children.push(child);
    }

    /// Set an attribute
    pub fn set_attribute(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.attributes.insert(key.into(), value.into());
    }

    /// Get an attribute
    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(|s| s.as_str())
    }

    /// Check if the node is the document root
    pub fn is_document(&self) -> bool {
        matches!(self.kind, NodeKind::Document)
    }

    /// Check if the node is a section
    pub fn is_section(&self) -> bool {
        matches!(self.kind, NodeKind::Section { .. })
    }

    /// Section role, if the node is a section
    pub fn section_role(&self) -> Option<SectionRole> {
        match self.kind {
            NodeKind::Section { role } => Some(role),
            _ => None,
        }
    }

    /// Direct child sections, in document order
    pub fn child_sections(&self) -> impl Iterator<Item = &Node> {
        self.children.iter().filter(|child| child.is_section())
    }

    /// Concatenated text of all text inlines below this node
    pub fn plain_text(&self) -> String {
        let mut out = String::new();
        self.walk(&mut |node| {
            if let NodeKind::Inline(InlineKind::Text(text)) = &node.kind {
                out.push_str(text);
            }
        });
        out
    }

    /// Visit this node and all descendants in depth-first pre-order
    pub fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a Node)) {
        visit(self);
        for child in &self.children {
            child.walk(visit);
        }
    }

    /// Check if the node has no children
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_with_title() {
        let doc = Node::document("My Document");
        assert!(doc.is_document());
        assert_eq!(doc.title, Some("My Document".to_string()));
        assert_eq!(doc.level, 0);
        assert!(doc.is_empty());
    }

    #[test]
    fn test_section_role() {
        let appendix = Node::section(1, "Extras").with_role(SectionRole::Appendix);
        assert_eq!(appendix.section_role(), Some(SectionRole::Appendix));

        let para = Node::paragraph("x").with_role(SectionRole::Appendix);
        assert_eq!(para.section_role(), None);
    }

    #[test]
    fn test_child_sections_skips_blocks() {
        let section = Node::section(1, "A")
            .with_child(Node::paragraph("intro"))
            .with_child(Node::section(2, "A.1"))
            .with_child(Node::section(2, "A.2"));
        let titles: Vec<_> = section
            .child_sections()
            .map(|s| s.title.as_deref().unwrap())
            .collect();
        assert_eq!(titles, vec!["A.1", "A.2"]);
    }

    #[test]
    fn test_walk_is_preorder() {
        let doc = Node::document("D")
            .with_child(Node::section(1, "A").with_child(Node::section(2, "A.1")))
            .with_child(Node::section(1, "B"));
        let mut titles = Vec::new();
        doc.walk(&mut |node| {
            if let Some(title) = &node.title {
                titles.push(title.clone());
            }
        });
        assert_eq!(titles, vec!["D", "A", "A.1", "B"]);
    }

    #[test]
    fn test_plain_text() {
        let para = Node::block(BlockKind::Paragraph)
            .with_child(Node::text("Hello "))
            .with_child(Node::format(FormatType::Strong, "world"));
        assert_eq!(para.plain_text(), "Hello world");
    }

    #[test]
    fn test_attributes() {
        let mut doc = Node::document("D");
        doc.set_attribute("lang", "fr");
        assert_eq!(doc.attribute("lang"), Some("fr"));
        assert_eq!(doc.attribute("missing"), None);
    }

    #[test]
    fn test_json_round_trip_of_tree() {
        let json = r#"{
            "kind": "document",
            "title": "Book",
            "children": [
                {"kind": {"section": {"role": "appendix"}}, "level": 1, "title": "Extras"},
                {"kind": {"block": "paragraph"}, "children": [
                    {"kind": {"inline": {"text": "Hi"}}}
                ]}
            ]
        }"#;
        let doc: Node = serde_json::from_str(json).unwrap();
        assert!(doc.is_document());
        assert_eq!(doc.children.len(), 2);
        assert_eq!(doc.children[0].section_role(), Some(SectionRole::Appendix));
        assert_eq!(doc.children[1].plain_text(), "Hi");
    }
}
