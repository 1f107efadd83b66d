//! Chapter partitioning
//!
//! One depth-first pre-order walk over the document decides which nodes
//! start their own output file. The order chapters are discovered in is
//! the reading order and the spine order of the publication.
//!
//! The same walk builds the [`DocumentIndex`]: every id mapped to its
//! node and to the chapter that renders it, so cross references resolve
//! their enclosing chapter without walking back up the tree.

use std::collections::HashMap;

use epubdok_ast::{InlineKind, Node, NodeKind, SectionRole};

use crate::config::{ConversionConfig, Doctype};
use crate::diagnostics::{Diagnostic, Diagnostics, Location};
use crate::error::{ConvertError, Result};
use crate::ids::{strip_tags, IdAssigner};

/// A chapter: one output file rooted at a node
#[derive(Debug, Clone)]
pub struct ChapterRecord<'a> {
    /// The chapter root
    pub node: &'a Node,
    /// Chapter id (file name stem)
    pub id: String,
    /// Output file name
    pub filename: String,
    /// Position in the spine, starting at 0
    pub ordinal: usize,
}

impl<'a> ChapterRecord<'a> {
    /// Sanitized title, if the chapter root has one
    pub fn title(&self) -> Option<String> {
        self.node
            .title
            .as_deref()
            .or(self.node.reftext.as_deref())
            .map(strip_tags)
    }

    /// Title or the given fallback label
    pub fn label(&self, untitled: &str) -> String {
        self.title().unwrap_or_else(|| untitled.to_string())
    }

    /// Section role of the chapter root, if it is a section
    pub fn role(&self) -> Option<SectionRole> {
        self.node.section_role()
    }

    /// Whether this chapter holds regular body content
    pub fn is_body_matter(&self) -> bool {
        match self.node.kind {
            NodeKind::Document => true,
            NodeKind::Section { role } => role == SectionRole::Chapter,
            _ => false,
        }
    }
}

/// Index entry for an id
#[derive(Debug, Clone, Copy)]
pub struct IndexEntry<'a> {
    /// Node carrying the id
    pub node: &'a Node,
    /// Ordinal of the chapter that renders the node
    pub chapter: usize,
    /// The id names a whole chapter file rather than a point inside it
    pub chapter_root: bool,
}

/// Lookup tables built while partitioning
#[derive(Debug, Default)]
pub struct DocumentIndex<'a> {
    ids: HashMap<&'a str, IndexEntry<'a>>,
    labels: HashMap<String, &'a str>,
    footnotes: HashMap<u32, &'a Node>,
    roots: HashMap<*const Node, usize>,
}

impl<'a> DocumentIndex<'a> {
    /// Look up a node by id
    pub fn get(&self, id: &str) -> Option<&IndexEntry<'a>> {
        self.ids.get(id)
    }

    /// Look up a node by id, returning the stored key
    pub fn get_key_value(&self, id: &str) -> Option<(&'a str, IndexEntry<'a>)> {
        self.ids.get_key_value(id).map(|(key, entry)| (*key, *entry))
    }

    /// Look up an id by reference text or title
    pub fn id_for_label(&self, label: &str) -> Option<&'a str> {
        self.labels.get(label).copied()
    }

    /// Chapter ordinal rendering the given id
    pub fn chapter_of(&self, id: &str) -> Option<usize> {
        self.ids.get(id).map(|entry| entry.chapter)
    }

    /// Footnote definition for an index
    pub fn footnote(&self, index: u32) -> Option<&'a Node> {
        self.footnotes.get(&index).copied()
    }

    /// Chapter ordinal if the node is a chapter root
    pub fn chapter_root_ordinal(&self, node: &Node) -> Option<usize> {
        self.roots.get(&(node as *const Node)).copied()
    }

    /// Number of indexed ids
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Check if no ids are indexed
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

/// Result of partitioning: the spine plus the lookup index
#[derive(Debug)]
pub struct Partition<'a> {
    /// Chapters in spine order
    pub chapters: Vec<ChapterRecord<'a>>,
    /// Id index
    pub index: DocumentIndex<'a>,
}

impl<'a> Partition<'a> {
    /// Chapter by id
    pub fn chapter_by_id(&self, id: &str) -> Option<&ChapterRecord<'a>> {
        self.chapters.iter().find(|c| c.id == id)
    }

    /// Chapter ids in spine order
    pub fn chapter_ids(&self) -> Vec<&str> {
        self.chapters.iter().map(|c| c.id.as_str()).collect()
    }

    /// Visit the nodes rendered in a chapter's own file, in document order
    ///
    /// Nested chapter roots and everything below them are skipped.
    pub fn walk_chapter(&self, chapter: &ChapterRecord<'a>, visit: &mut impl FnMut(&'a Node)) {
        self.walk_inline(chapter.node, visit);
    }

    fn walk_inline(&self, node: &'a Node, visit: &mut impl FnMut(&'a Node)) {
        visit(node);
        for child in &node.children {
            if self.index.chapter_root_ordinal(child).is_none() {
                self.walk_inline(child, visit);
            }
        }
    }
}

/// Splits a document into chapter files
pub struct ChapterPartitioner<'c> {
    config: &'c ConversionConfig,
}

impl<'c> ChapterPartitioner<'c> {
    /// Create a partitioner
    pub fn new(config: &'c ConversionConfig) -> Self {
        Self { config }
    }

    /// Partition the document into chapters in reading order
    ///
    /// A document without any qualifying section still yields exactly one
    /// chapter: the document itself.
    pub fn partition<'a>(
        &self,
        root: &'a Node,
        ids: &mut IdAssigner<'_>,
        diagnostics: &mut Diagnostics,
    ) -> Result<Partition<'a>> {
        if !root.is_document() {
            return Err(ConvertError::NotADocument(format!("{:?}", root.kind)));
        }

        let mut walk = Walk {
            partitioner: self,
            document_is_chapter: self.document_is_chapter(root),
            ids,
            diagnostics,
            chapters: Vec::new(),
            index: DocumentIndex::default(),
        };
        walk.visit(root, None, 0);

        let Walk {
            chapters, index, ..
        } = walk;

        if chapters.is_empty() {
            return Err(ConvertError::EmptyPartition);
        }

        tracing::debug!(
            chapters = chapters.len(),
            ids = index.len(),
            "partitioned document"
        );
        Ok(Partition { chapters, index })
    }

    /// Check if a node starts a chapter (the document root is decided separately)
    fn qualifies(&self, node: &Node, parent_is_document: bool) -> bool {
        if self.config.doctype == Doctype::Article {
            return false;
        }
        match node.kind {
            NodeKind::Preamble => parent_is_document,
            NodeKind::Section { .. } => node.level <= self.config.effective_chapter_level(),
            NodeKind::Document | NodeKind::Block(_) | NodeKind::Inline(_) => false,
        }
    }

    fn document_is_chapter(&self, root: &Node) -> bool {
        if self.config.doctype == Doctype::Article {
            return true;
        }
        let has_loose_content = root
            .children
            .iter()
            .any(|c| matches!(c.kind, NodeKind::Block(_) | NodeKind::Inline(_)));
        has_loose_content || !self.has_qualifying_descendant(root, true)
    }

    fn has_qualifying_descendant(&self, node: &Node, parent_is_document: bool) -> bool {
        node.children.iter().any(|child| {
            self.qualifies(child, parent_is_document)
                || self.has_qualifying_descendant(child, false)
        })
    }
}

struct Walk<'p, 'c, 'a, 'i, 'x> {
    partitioner: &'p ChapterPartitioner<'c>,
    document_is_chapter: bool,
    ids: &'i mut IdAssigner<'x>,
    diagnostics: &'i mut Diagnostics,
    chapters: Vec<ChapterRecord<'a>>,
    index: DocumentIndex<'a>,
}

impl<'p, 'c, 'a, 'i, 'x> Walk<'p, 'c, 'a, 'i, 'x> {
    fn visit(&mut self, node: &'a Node, current: Option<usize>, depth: usize) {
        let starts_chapter = if depth == 0 {
            self.document_is_chapter
        } else {
            let top_level = depth == 1;
            self.partitioner.qualifies(node, top_level)
                || (!self.document_is_chapter && top_level && node.is_section())
        };

        let chapter = if starts_chapter {
            let ordinal = self.chapters.len();
            let id = self.ids.assign(node, self.diagnostics);
            let filename = self.partitioner.config.chapter_filename(&id);
            tracing::debug!(ordinal, %filename, "chapter root");
            self.index.roots.insert(node as *const Node, ordinal);
            self.chapters.push(ChapterRecord {
                node,
                id,
                filename,
                ordinal,
            });
            Some(ordinal)
        } else {
            current
        };

        // A document root that is not a chapter itself stands for the
        // first chapter file, which is always discovered below it
        self.register(node, chapter.unwrap_or(0), starts_chapter || depth == 0);

        for child in &node.children {
            self.visit(child, chapter, depth + 1);
        }
    }

    fn register(&mut self, node: &'a Node, chapter: usize, chapter_root: bool) {
        if let NodeKind::Inline(InlineKind::Footnote { index }) = node.kind {
            if !node.children.is_empty() {
                self.index.footnotes.entry(index).or_insert(node);
            }
        }

        let Some(id) = node.id.as_deref() else {
            return;
        };

        if self.index.ids.contains_key(id) {
            self.diagnostics.push(
                Diagnostic::warning(format!("duplicate id '{}'; later definition ignored", id))
                    .with_code("IDX001")
                    .with_location(Location::node(id)),
            );
            return;
        }
        self.index.ids.insert(
            id,
            IndexEntry {
                node,
                chapter,
                chapter_root,
            },
        );

        for label in [node.reftext.as_deref(), node.title.as_deref()]
            .into_iter()
            .flatten()
        {
            self.index.labels.entry(strip_tags(label)).or_insert(id);
        }
    }
}
