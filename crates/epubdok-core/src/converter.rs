//! Conversion pipeline
//!
//! Runs the stages in their fixed order: id assignment, partitioning,
//! chapter rendering in spine order, then navigation from the chapter
//! list. All per-run state lives inside [`EpubConverter::convert`], so one
//! converter can be reused for any number of documents.

use std::fs;
use std::path::{Path, PathBuf};

use epubdok_ast::Node;

use crate::config::ConversionConfig;
use crate::diagnostics::Diagnostics;
use crate::error::Result;
use crate::ids::{strip_tags, IdAssigner};
use crate::nav::{Landmark, NavEntry, NavPoint, NavigationBuilder, NAV_FILENAME, NCX_FILENAME};
use crate::partition::ChapterPartitioner;
use crate::render::ChapterRenderer;

/// A rendered chapter file
#[derive(Debug, Clone)]
pub struct ChapterDocument {
    pub id: String,
    pub filename: String,
    /// Position in the spine, starting at 0
    pub ordinal: usize,
    pub title: Option<String>,
    /// Complete XHTML content document
    pub markup: String,
}

/// Everything the packaging layer needs
#[derive(Debug)]
pub struct Publication {
    /// Sanitized document title
    pub title: String,
    /// Unique identifier written to the NCX
    pub identifier: String,
    /// Chapters in spine order
    pub chapters: Vec<ChapterDocument>,
    /// Flat navigation tree
    pub nav: Vec<NavEntry>,
    /// Numbered navigation tree
    pub nav_points: Vec<NavPoint>,
    pub landmarks: Vec<Landmark>,
    /// Rendered `nav.xhtml`
    pub nav_document: String,
    /// Rendered `toc.ncx`
    pub ncx_document: String,
    /// Non-fatal problems found during conversion
    pub diagnostics: Diagnostics,
}

impl Publication {
    /// Chapter file names in reading order
    pub fn spine(&self) -> Vec<&str> {
        self.chapters.iter().map(|c| c.filename.as_str()).collect()
    }

    /// Chapter by id
    pub fn chapter(&self, id: &str) -> Option<&ChapterDocument> {
        self.chapters.iter().find(|c| c.id == id)
    }

    /// Write chapter files and navigation documents into `dir`
    pub fn write_to(&self, dir: &Path) -> Result<Vec<PathBuf>> {
        fs::create_dir_all(dir)?;

        let mut written = Vec::with_capacity(self.chapters.len() + 2);
        let files = self
            .chapters
            .iter()
            .map(|c| (c.filename.as_str(), c.markup.as_str()))
            .chain([
                (NAV_FILENAME, self.nav_document.as_str()),
                (NCX_FILENAME, self.ncx_document.as_str()),
            ]);

        for (name, contents) in files {
            let path = dir.join(name);
            fs::write(&path, contents)?;
            tracing::debug!(path = %path.display(), "wrote file");
            written.push(path);
        }
        Ok(written)
    }
}

/// Converts a document tree into a multi-file publication
///
/// # Example
///
/// ```
/// use epubdok_ast::Node;
/// use epubdok_core::{ConversionConfig, EpubConverter};
///
/// let mut doc = Node::document("Book")
///     .with_child(Node::section(1, "Chapter A"))
///     .with_child(Node::section(1, "Chapter B"));
///
/// let publication = EpubConverter::new(ConversionConfig::default())
///     .convert(&mut doc)
///     .unwrap();
/// assert_eq!(publication.spine(), vec!["chapter-a.xhtml", "chapter-b.xhtml"]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct EpubConverter {
    config: ConversionConfig,
}

impl EpubConverter {
    pub fn new(config: ConversionConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ConversionConfig {
        &self.config
    }

    /// Convert a document
    ///
    /// Missing ids are written into the tree; everything else is read
    /// only. Problems in the content are returned as diagnostics on the
    /// publication; only internal failures are errors.
    pub fn convert(&self, document: &mut Node) -> Result<Publication> {
        let config = self.config.clone().with_document_attributes(document);
        let mut diagnostics = Diagnostics::new();

        let mut ids = IdAssigner::new(&config.ids);
        ids.assign_tree(document, &mut diagnostics);
        let document: &Node = document;

        let partition =
            ChapterPartitioner::new(&config).partition(document, &mut ids, &mut diagnostics)?;

        let mut renderer = ChapterRenderer::new(&partition, &config);
        let mut chapters = Vec::with_capacity(partition.chapters.len());
        for record in &partition.chapters {
            let markup = renderer.render(record, &mut diagnostics)?;
            chapters.push(ChapterDocument {
                id: record.id.clone(),
                filename: record.filename.clone(),
                ordinal: record.ordinal,
                title: record.title(),
                markup,
            });
        }

        let title = document
            .title
            .as_deref()
            .map(strip_tags)
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| config.untitled_label.clone());
        let identifier = config
            .identifier
            .clone()
            .or_else(|| document.id.clone())
            .unwrap_or_else(|| title.clone());

        let builder = NavigationBuilder::new(&partition, &config);
        let nav = builder.build_flat_nav(config.toc_levels);
        let nav_points = builder.build_numbered_nav(config.toc_levels);
        let landmarks = builder.build_landmarks();
        let nav_document = builder.nav_document(&title, &nav, &landmarks)?;
        let ncx_document = builder.ncx_document(&title, &identifier, &nav_points)?;

        tracing::debug!(
            chapters = chapters.len(),
            warnings = diagnostics.warning_count(),
            "conversion finished"
        );

        Ok(Publication {
            title,
            identifier,
            chapters,
            nav,
            nav_points,
            landmarks,
            nav_document,
            ncx_document,
            diagnostics,
        })
    }
}
