//! epubdok-ast - Document node tree definitions
//!
//! This crate provides the node tree handed to epubdok by the parsing
//! layer. The tree is a strict tree: every node is owned by exactly one
//! parent, and node kinds form a closed set so renderers can match on
//! them exhaustively.
//!
//! # Example
//!
//! ```
//! use epubdok_ast::{Node, SectionRole};
//!
//! let doc = Node::document("My Book")
//!     .with_child(Node::section(1, "Chapter A"))
//!     .with_child(Node::section(1, "Appendix").with_role(SectionRole::Appendix));
//!
//! assert_eq!(doc.child_sections().count(), 2);
//! ```

pub mod block;
pub mod inline;
pub mod node;
pub mod section;

pub use block::{AdmonitionType, BlockKind, ListType};
pub use inline::{FormatType, InlineKind};
pub use node::{Node, NodeKind};
pub use section::SectionRole;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
