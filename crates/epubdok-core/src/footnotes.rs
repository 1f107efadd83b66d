//! Footnote aggregation
//!
//! Footnotes are numbered once for the whole document. A footnote body is
//! written into the first chapter (in spine order) that references it;
//! later chapters only link back to it.

use std::collections::HashMap;

use epubdok_ast::{InlineKind, Node, NodeKind};

use crate::diagnostics::{Diagnostic, Diagnostics, Location};
use crate::partition::{ChapterRecord, Partition};

/// Append-only record of which chapter owns each footnote
#[derive(Debug, Default, Clone)]
pub struct FootnoteRegistry {
    owners: HashMap<u32, usize>,
    order: Vec<u32>,
}

impl FootnoteRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Chapter ordinal that renders the footnote body
    pub fn owner(&self, index: u32) -> Option<usize> {
        self.owners.get(&index).copied()
    }

    /// Claim a footnote for a chapter; returns false if already owned
    pub fn claim(&mut self, index: u32, chapter: usize) -> bool {
        if self.owners.contains_key(&index) {
            return false;
        }
        self.owners.insert(index, chapter);
        self.order.push(index);
        true
    }

    /// Footnote indices in the order they were claimed
    pub fn claimed(&self) -> &[u32] {
        &self.order
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

/// A footnote to be written in a chapter's footer
#[derive(Debug, Clone, Copy)]
pub struct FootnoteRecord<'a> {
    /// Footnote number
    pub index: u32,
    /// Defining node; its children are the footnote body
    pub definition: &'a Node,
}

/// Collects the footnotes each chapter has to render
pub struct FootnoteAggregator<'p, 'a> {
    partition: &'p Partition<'a>,
    registry: FootnoteRegistry,
}

impl<'p, 'a> FootnoteAggregator<'p, 'a> {
    /// Create an aggregator with an empty registry
    pub fn new(partition: &'p Partition<'a>) -> Self {
        Self {
            partition,
            registry: FootnoteRegistry::new(),
        }
    }

    /// Footnotes first referenced in `chapter`, in reference order
    ///
    /// Chapters must be collected in spine order. Each footnote is returned
    /// for exactly one chapter over the whole run.
    pub fn collect_new(
        &mut self,
        chapter: &ChapterRecord<'a>,
        diagnostics: &mut Diagnostics,
    ) -> Vec<FootnoteRecord<'a>> {
        let mut referenced = Vec::new();
        self.partition.walk_chapter(chapter, &mut |node| {
            if let NodeKind::Inline(InlineKind::Footnote { index }) = node.kind {
                referenced.push(index);
            }
        });

        let mut records = Vec::new();
        for index in referenced {
            if !self.registry.claim(index, chapter.ordinal) {
                continue;
            }
            match self.partition.index.footnote(index) {
                Some(definition) => records.push(FootnoteRecord { index, definition }),
                None => diagnostics.push(
                    Diagnostic::warning(format!("footnote {} is referenced but never defined", index))
                        .with_code("FN001")
                        .with_location(Location::chapter(&chapter.filename)),
                ),
            }
        }

        tracing::debug!(
            chapter = %chapter.filename,
            footnotes = records.len(),
            "collected footnotes"
        );
        records
    }

    /// Chapter ordinal that renders the footnote body
    pub fn owner(&self, index: u32) -> Option<usize> {
        self.registry.owner(index)
    }

    /// Footnote definition, if one exists
    pub fn definition(&self, index: u32) -> Option<&'a Node> {
        self.partition.index.footnote(index)
    }

    /// Registry built so far
    pub fn registry(&self) -> &FootnoteRegistry {
        &self.registry
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConversionConfig;
    use crate::ids::IdAssigner;
    use crate::partition::ChapterPartitioner;
    use epubdok_ast::BlockKind;

    fn para(children: Vec<Node>) -> Node {
        children
            .into_iter()
            .fold(Node::block(BlockKind::Paragraph), Node::with_child)
    }

    fn book() -> Node {
        Node::document("Book")
            .with_id("book")
            .with_child(
                Node::section(1, "A")
                    .with_id("a")
                    .with_child(para(vec![
                        Node::text("one"),
                        Node::footnote(1, "First note"),
                        Node::footnote(2, "Second note"),
                    ])),
            )
            .with_child(
                Node::section(1, "B")
                    .with_id("b")
                    .with_child(para(vec![Node::footnote_ref(1), Node::footnote(3, "Third")])),
            )
    }

    #[test]
    fn test_each_footnote_collected_once() {
        let doc = book();
        let config = ConversionConfig::default();
        let mut diags = Diagnostics::new();
        let mut ids = IdAssigner::new(&config.ids);
        let partition = ChapterPartitioner::new(&config)
            .partition(&doc, &mut ids, &mut diags)
            .unwrap();

        let mut aggregator = FootnoteAggregator::new(&partition);
        let in_a = aggregator.collect_new(&partition.chapters[0], &mut diags);
        let in_b = aggregator.collect_new(&partition.chapters[1], &mut diags);

        let a: Vec<u32> = in_a.iter().map(|r| r.index).collect();
        let b: Vec<u32> = in_b.iter().map(|r| r.index).collect();
        assert_eq!(a, vec![1, 2]);
        assert_eq!(b, vec![3]);
        assert_eq!(aggregator.owner(1), Some(0));
        assert_eq!(aggregator.owner(3), Some(1));
        assert_eq!(in_a[0].definition.plain_text(), "First note");
        assert_eq!(aggregator.registry().claimed(), &[1, 2, 3]);
        assert!(diags.is_empty());
    }

    #[test]
    fn test_reference_before_definition_owns_footnote() {
        let doc = Node::document("Book")
            .with_child(
                Node::section(1, "A")
                    .with_id("a")
                    .with_child(para(vec![Node::footnote_ref(7)])),
            )
            .with_child(
                Node::section(1, "B")
                    .with_id("b")
                    .with_child(para(vec![Node::footnote(7, "Late body")])),
            );
        let config = ConversionConfig::default();
        let mut diags = Diagnostics::new();
        let mut ids = IdAssigner::new(&config.ids);
        let partition = ChapterPartitioner::new(&config)
            .partition(&doc, &mut ids, &mut diags)
            .unwrap();

        let mut aggregator = FootnoteAggregator::new(&partition);
        let in_a = aggregator.collect_new(&partition.chapters[0], &mut diags);
        let in_b = aggregator.collect_new(&partition.chapters[1], &mut diags);

        assert_eq!(in_a.len(), 1);
        assert_eq!(in_a[0].definition.plain_text(), "Late body");
        assert!(in_b.is_empty());
    }

    #[test]
    fn test_undefined_footnote_is_reported_once() {
        let doc = Node::document("Book")
            .with_child(
                Node::section(1, "A")
                    .with_id("a")
                    .with_child(para(vec![Node::footnote_ref(9), Node::footnote_ref(9)])),
            )
            .with_child(
                Node::section(1, "B")
                    .with_id("b")
                    .with_child(para(vec![Node::footnote_ref(9)])),
            );
        let config = ConversionConfig::default();
        let mut diags = Diagnostics::new();
        let mut ids = IdAssigner::new(&config.ids);
        let partition = ChapterPartitioner::new(&config)
            .partition(&doc, &mut ids, &mut diags)
            .unwrap();

        let mut aggregator = FootnoteAggregator::new(&partition);
        assert!(aggregator.collect_new(&partition.chapters[0], &mut diags).is_empty());
        assert!(aggregator.collect_new(&partition.chapters[1], &mut diags).is_empty());
        assert_eq!(diags.with_code("FN001").count(), 1);
    }

    #[test]
    fn test_registry_claim() {
        let mut registry = FootnoteRegistry::new();
        assert!(registry.claim(1, 0));
        assert!(!registry.claim(1, 2));
        assert_eq!(registry.owner(1), Some(0));
        assert_eq!(registry.len(), 1);
    }
}
