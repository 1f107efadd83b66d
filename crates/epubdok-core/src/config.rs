//! Conversion configuration
//!
//! Settings are loaded from an `epubdok.toml` file and then overridden by
//! attributes set on the document itself:
//!
//! ```toml
//! chapter_level = 2
//! toc_levels = 2
//! doctype = "book"
//! toc_title = "Contents"
//! stylesheets = ["styles/epub3.css"]
//!
//! [ids]
//! prefix = "_"
//! separator = "_"
//! reserved = ["cover", "nav", "ncx"]
//! ```

use serde::{Deserialize, Serialize};

use epubdok_ast::Node;

use crate::error::Result;

/// Whether the document is split into chapters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Doctype {
    /// Sections up to the chapter level become their own files
    #[default]
    Book,
    /// The whole document is a single chapter
    Article,
}

/// Top-level conversion settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ConversionConfig {
    /// Deepest section level that still starts a new chapter file
    pub chapter_level: u8,
    /// Section levels below a chapter listed in the navigation documents
    pub toc_levels: u8,
    /// Document type
    pub doctype: Doctype,
    /// Whether the table of contents is listed as a landmark
    pub toc: bool,
    /// Heading of the table of contents
    pub toc_title: String,
    /// Publication language
    pub lang: String,
    /// Unique publication identifier (defaults to the document id)
    pub identifier: Option<String>,
    /// Extension of chapter files
    pub outfilesuffix: String,
    /// Stylesheets linked from every content document
    pub stylesheets: Vec<String>,
    /// Href of the cover page, if the package has one
    pub cover: Option<String>,
    /// Label used for chapters without a title
    pub untitled_label: String,
    /// Identifier generation settings
    pub ids: IdSettings,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            chapter_level: 1,
            toc_levels: 1,
            doctype: Doctype::Book,
            toc: true,
            toc_title: "Table of Contents".to_string(),
            lang: "en".to_string(),
            identifier: None,
            outfilesuffix: ".xhtml".to_string(),
            stylesheets: vec!["styles/epub3.css".to_string()],
            cover: None,
            untitled_label: "Untitled".to_string(),
            ids: IdSettings::default(),
        }
    }
}

/// Identifier generation settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IdSettings {
    /// Prefix for generated ids
    pub prefix: String,
    /// Word separator for generated ids
    pub separator: String,
    /// Ids that collide with package-internal file names
    pub reserved: Vec<String>,
}

impl Default for IdSettings {
    fn default() -> Self {
        Self {
            prefix: String::new(),
            separator: "-".to_string(),
            reserved: default_reserved_ids(),
        }
    }
}

/// Names used by the package's own navigation and cover files
fn default_reserved_ids() -> Vec<String> {
    ["cover", "front-matter", "nav", "ncx", "toc"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

impl ConversionConfig {
    /// Parse settings from a TOML string
    pub fn from_toml_str(toml_str: &str) -> Result<Self> {
        Ok(toml::from_str(toml_str)?)
    }

    /// Override settings with attributes set on the document root
    pub fn with_document_attributes(mut self, doc: &Node) -> Self {
        if let Some(level) = parse_level(doc.attribute("epub-chapter-level")) {
            self.chapter_level = level;
        }
        if let Some(levels) = parse_level(doc.attribute("toclevels")) {
            self.toc_levels = levels;
        }
        if let Some(title) = doc.attribute("toc-title") {
            self.toc_title = title.to_string();
        }
        if let Some(toc) = doc.attribute("toc") {
            self.toc = !matches!(toc, "false" | "no" | "0");
        }
        if let Some(lang) = doc.attribute("lang") {
            self.lang = lang.to_string();
        }
        match doc.attribute("doctype") {
            Some("article") => self.doctype = Doctype::Article,
            Some("book") => self.doctype = Doctype::Book,
            _ => {}
        }
        if let Some(uuid) = doc.attribute("uuid") {
            self.identifier = Some(uuid.to_string());
        }
        if let Some(prefix) = doc.attribute("idprefix") {
            self.ids.prefix = prefix.to_string();
        }
        if let Some(separator) = doc.attribute("idseparator") {
            self.ids.separator = separator.to_string();
        }
        if let Some(cover) = doc.attribute("front-cover-page") {
            self.cover = Some(cover.to_string());
        }
        self
    }

    /// Chapter level clamped to at least 1
    pub fn effective_chapter_level(&self) -> u8 {
        self.chapter_level.max(1)
    }

    /// File name for a chapter id
    pub fn chapter_filename(&self, id: &str) -> String {
        format!("{}{}", id, self.outfilesuffix)
    }
}

fn parse_level(value: Option<&str>) -> Option<u8> {
    value.and_then(|v| v.trim().parse().ok())
}
