//! epubdok-core - Document trees to multi-file EPUB content
//!
//! Core library for epubdok: splits a parsed document into chapter files,
//! assigns stable ids, resolves cross references across file boundaries,
//! places every footnote exactly once and builds the `nav.xhtml` and
//! `toc.ncx` navigation documents.
//!
//! # Example
//!
//! ```
//! use epubdok_ast::{Node, BlockKind};
//! use epubdok_core::{ConversionConfig, EpubConverter};
//!
//! let mut doc = Node::document("Book")
//!     .with_child(
//!         Node::section(1, "Chapter A").with_child(
//!             Node::block(BlockKind::Paragraph).with_child(Node::xref("Chapter B")),
//!         ),
//!     )
//!     .with_child(Node::section(1, "Chapter B").with_child(Node::section(2, "Setup")));
//!
//! let publication = EpubConverter::new(ConversionConfig::default())
//!     .convert(&mut doc)
//!     .unwrap();
//!
//! assert_eq!(publication.spine(), vec!["chapter-a.xhtml", "chapter-b.xhtml"]);
//! assert!(publication.chapters[0].markup.contains(r#"href="chapter-b.xhtml""#));
//! assert_eq!(publication.nav_points[1].children[0].play_order, 3);
//! ```

pub mod config;
pub mod converter;
pub mod diagnostics;
pub mod error;
pub mod footnotes;
pub mod ids;
pub mod markup;
pub mod nav;
pub mod partition;
pub mod render;
pub mod xref;

// Re-export main types and functions
pub use config::{ConversionConfig, Doctype, IdSettings};
pub use converter::{ChapterDocument, EpubConverter, Publication};
pub use diagnostics::{Diagnostic, Diagnostics, Location, Severity};
pub use error::{ConvertError, Result};
pub use footnotes::{FootnoteAggregator, FootnoteRecord, FootnoteRegistry};
pub use ids::{slugify, IdAssigner};
pub use nav::{Landmark, LandmarkKind, NavEntry, NavPoint, NavigationBuilder};
pub use partition::{ChapterPartitioner, ChapterRecord, DocumentIndex, Partition};
pub use render::ChapterRenderer;
pub use xref::{ReferenceTarget, ResolvedLink, Resolution, XrefResolver};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert_eq!(VERSION, "1.0.0");
    }
}
