//! Navigation structures
//!
//! Both tables of contents come from the same bounded-depth descent over
//! the chapter list: the flat `nav.xhtml` list and the numbered `toc.ncx`
//! tree. The NCX variant numbers entries with a `playOrder` that keeps
//! counting across chapters. Landmarks are a flat list of structural entry
//! points built from the same chapters.

use serde::Serialize;

use epubdok_ast::{Node, SectionRole};

use crate::config::ConversionConfig;
use crate::error::Result;
use crate::ids::strip_tags;
use crate::markup::{Element, XmlDocument};
use crate::partition::{ChapterRecord, Partition};
use crate::render::xhtml_page;

/// File name of the navigation document
pub const NAV_FILENAME: &str = "nav.xhtml";

/// File name of the NCX document
pub const NCX_FILENAME: &str = "toc.ncx";

const NCX_NS: &str = "http://www.daisy.org/z3986/2005/ncx/";

/// An entry of the flat navigation list
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavEntry {
    pub label: String,
    pub href: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<NavEntry>,
}

/// An entry of the numbered navigation tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavPoint {
    pub label: String,
    pub href: String,
    /// Position in reading order, starting at 1
    pub play_order: u32,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<NavPoint>,
}

impl From<NavPoint> for NavEntry {
    fn from(point: NavPoint) -> Self {
        Self {
            label: point.label,
            href: point.href,
            children: point.children.into_iter().map(NavEntry::from).collect(),
        }
    }
}

impl NavPoint {
    /// Element id used in the NCX
    pub fn id(&self) -> String {
        format!("nav_{}", self.play_order)
    }
}

/// Kind of a landmark entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LandmarkKind {
    Cover,
    Toc,
    Bodymatter,
    Preface,
    Appendix,
    Bibliography,
    Glossary,
    Index,
}

impl LandmarkKind {
    /// EPUB structural semantic
    pub fn epub_type(self) -> &'static str {
        match self {
            LandmarkKind::Cover => "cover",
            LandmarkKind::Toc => "toc",
            LandmarkKind::Bodymatter => "bodymatter",
            LandmarkKind::Preface => "preface",
            LandmarkKind::Appendix => "appendix",
            LandmarkKind::Bibliography => "bibliography",
            LandmarkKind::Glossary => "glossary",
            LandmarkKind::Index => "index",
        }
    }

    /// Landmark kind for a section role, if the role is a landmark
    pub fn from_role(role: SectionRole) -> Option<Self> {
        match role {
            SectionRole::Preface => Some(LandmarkKind::Preface),
            SectionRole::Appendix => Some(LandmarkKind::Appendix),
            SectionRole::Bibliography => Some(LandmarkKind::Bibliography),
            SectionRole::Glossary => Some(LandmarkKind::Glossary),
            SectionRole::Index => Some(LandmarkKind::Index),
            _ => None,
        }
    }
}

/// A structural entry point
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Landmark {
    pub kind: LandmarkKind,
    pub href: String,
    pub label: String,
}

/// Builds navigation structures from the chapter list
pub struct NavigationBuilder<'p, 'a, 'c> {
    partition: &'p Partition<'a>,
    config: &'c ConversionConfig,
}

impl<'p, 'a, 'c> NavigationBuilder<'p, 'a, 'c> {
    pub fn new(partition: &'p Partition<'a>, config: &'c ConversionConfig) -> Self {
        Self { partition, config }
    }

    /// Flat navigation list
    ///
    /// Chapters form the top level. `max_depth` is the number of section
    /// levels below each chapter root that get their own entries.
    pub fn build_flat_nav(&self, max_depth: u8) -> Vec<NavEntry> {
        self.build_numbered_nav(max_depth)
            .into_iter()
            .map(NavEntry::from)
            .collect()
    }

    /// Numbered navigation tree
    ///
    /// Entries are numbered in pre-order starting at 1.
    pub fn build_numbered_nav(&self, max_depth: u8) -> Vec<NavPoint> {
        let mut play_order = 0;
        let mut points = Vec::with_capacity(self.partition.chapters.len());
        for chapter in &self.partition.chapters {
            play_order += 1;
            let mut point = NavPoint {
                label: chapter.label(&self.config.untitled_label),
                href: chapter.filename.clone(),
                play_order,
                children: Vec::new(),
            };
            point.children =
                self.numbered_sections(chapter, chapter.node, 1, max_depth, &mut play_order);
            points.push(point);
        }
        tracing::debug!(entries = play_order, max_depth, "built numbered navigation");
        points
    }

    fn numbered_sections(
        &self,
        chapter: &ChapterRecord<'a>,
        parent: &'a Node,
        depth: u8,
        max_depth: u8,
        play_order: &mut u32,
    ) -> Vec<NavPoint> {
        if depth > max_depth {
            return Vec::new();
        }
        let mut points = Vec::new();
        for section in self.own_sections(parent) {
            *play_order += 1;
            let mut point = NavPoint {
                label: self.section_label(section),
                href: section_href(chapter, section),
                play_order: *play_order,
                children: Vec::new(),
            };
            point.children =
                self.numbered_sections(chapter, section, depth + 1, max_depth, play_order);
            points.push(point);
        }
        points
    }

    /// Landmarks in reading order
    pub fn build_landmarks(&self) -> Vec<Landmark> {
        let mut landmarks = Vec::new();

        if let Some(cover) = &self.config.cover {
            landmarks.push(Landmark {
                kind: LandmarkKind::Cover,
                href: cover.clone(),
                label: "Cover".to_string(),
            });
        }

        if self.config.toc {
            landmarks.push(Landmark {
                kind: LandmarkKind::Toc,
                href: format!("{}#toc", NAV_FILENAME),
                label: self.config.toc_title.clone(),
            });
        }

        let chapters = &self.partition.chapters;
        if let Some(start) = chapters
            .iter()
            .find(|c| c.is_body_matter())
            .or_else(|| chapters.first())
        {
            landmarks.push(Landmark {
                kind: LandmarkKind::Bodymatter,
                href: start.filename.clone(),
                label: "Start of Content".to_string(),
            });
        }

        for chapter in chapters {
            self.partition.walk_chapter(chapter, &mut |node| {
                let Some(kind) = node.section_role().and_then(LandmarkKind::from_role) else {
                    return;
                };
                let href = if std::ptr::eq(node, chapter.node) {
                    chapter.filename.clone()
                } else {
                    section_href(chapter, node)
                };
                landmarks.push(Landmark {
                    kind,
                    href,
                    label: self.section_label(node),
                });
            });
        }

        landmarks
    }

    /// Render `nav.xhtml`
    pub fn nav_document(
        &self,
        title: &str,
        entries: &[NavEntry],
        landmarks: &[Landmark],
    ) -> Result<String> {
        let mut toc = Element::block("nav")
            .attr("epub:type", "toc")
            .attr("id", "toc")
            .child(Element::block("h2").text(self.config.toc_title.as_str()));
        if let Some(list) = nav_list(entries) {
            toc.push(list);
        }

        let mut body = Element::block("body")
            .child(Element::block("h1").text(title))
            .child(toc);

        if !landmarks.is_empty() {
            let mut list = Element::block("ol");
            for landmark in landmarks {
                list.push(
                    Element::block("li").child(
                        Element::new("a")
                            .attr("epub:type", landmark.kind.epub_type())
                            .attr("href", landmark.href.as_str())
                            .text(landmark.label.as_str()),
                    ),
                );
            }
            body.push(
                Element::block("nav")
                    .attr("epub:type", "landmarks")
                    .attr("id", "landmarks")
                    .attr("hidden", "hidden")
                    .child(Element::block("h2").text("Landmarks"))
                    .child(list),
            );
        }

        xhtml_page(self.config, title, body)
    }

    /// Render `toc.ncx`
    pub fn ncx_document(&self, title: &str, uid: &str, points: &[NavPoint]) -> Result<String> {
        let meta = |name: &str, content: String| {
            Element::block("meta")
                .attr("name", name)
                .attr("content", content)
        };

        let head = Element::block("head")
            .child(meta("dtb:uid", uid.to_string()))
            .child(meta("dtb:depth", ncx_depth(points).to_string()))
            .child(meta("dtb:totalPageCount", "0".to_string()))
            .child(meta("dtb:maxPageNumber", "0".to_string()));

        let mut nav_map = Element::block("navMap");
        nav_map.extend(points.iter().map(|p| nav_point(p).into()));

        let ncx = Element::block("ncx")
            .attr("xmlns", NCX_NS)
            .attr("version", "2005-1")
            .attr("xml:lang", self.config.lang.as_str())
            .child(head)
            .child(Element::block("docTitle").child(Element::new("text").text(title)))
            .child(nav_map);

        XmlDocument::xml(ncx).to_xml_string()
    }

    /// Direct child sections that render inside the parent's file
    fn own_sections(&self, parent: &'a Node) -> Vec<&'a Node> {
        parent
            .child_sections()
            .filter(|s| self.partition.index.chapter_root_ordinal(s).is_none())
            .collect()
    }

    fn section_label(&self, node: &Node) -> String {
        node.title
            .as_deref()
            .or(node.reftext.as_deref())
            .map(strip_tags)
            .filter(|label| !label.is_empty())
            .unwrap_or_else(|| self.config.untitled_label.clone())
    }
}

fn section_href(chapter: &ChapterRecord<'_>, section: &Node) -> String {
    match &section.id {
        Some(id) => format!("{}#{}", chapter.filename, id),
        None => chapter.filename.clone(),
    }
}

fn nav_list(entries: &[NavEntry]) -> Option<Element> {
    if entries.is_empty() {
        return None;
    }
    let mut list = Element::block("ol");
    for entry in entries {
        let mut item = Element::block("li").child(
            Element::new("a")
                .attr("href", entry.href.as_str())
                .text(entry.label.as_str()),
        );
        if let Some(children) = nav_list(&entry.children) {
            item.push(children);
        }
        list.push(item);
    }
    Some(list)
}

fn nav_point(point: &NavPoint) -> Element {
    let mut element = Element::block("navPoint")
        .attr("id", point.id())
        .attr("playOrder", point.play_order.to_string())
        .child(Element::block("navLabel").child(Element::new("text").text(point.label.as_str())))
        .child(Element::block("content").attr("src", point.href.as_str()));
    for child in &point.children {
        element.push(nav_point(child));
    }
    element
}

/// Deepest level present in a navigation tree
pub fn ncx_depth(points: &[NavPoint]) -> usize {
    points
        .iter()
        .map(|p| 1 + ncx_depth(&p.children))
        .max()
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::Diagnostics;
    use crate::ids::IdAssigner;
    use crate::partition::ChapterPartitioner;

    fn book() -> Node {
        let mut doc = Node::document("Book")
            .with_child(Node::section(1, "Chapter A"))
            .with_child(
                Node::section(1, "Chapter B").with_child(
                    Node::section(2, "Setup").with_child(Node::section(3, "Linux")),
                ),
            )
            .with_child(Node::section(1, "Extras").with_role(SectionRole::Appendix))
            .with_child(Node::section(1, "Terms").with_role(SectionRole::Glossary));
        let config = ConversionConfig::default();
        let mut diags = Diagnostics::new();
        IdAssigner::new(&config.ids).assign_tree(&mut doc, &mut diags);
        doc
    }

    fn with_builder(
        doc: &Node,
        config: &ConversionConfig,
        test: impl FnOnce(&NavigationBuilder<'_, '_, '_>),
    ) {
        let mut diags = Diagnostics::new();
        let mut ids = IdAssigner::new(&config.ids);
        let partition = ChapterPartitioner::new(config)
            .partition(doc, &mut ids, &mut diags)
            .unwrap();
        test(&NavigationBuilder::new(&partition, config));
    }

    fn labels(entries: &[NavEntry]) -> Vec<&str> {
        entries.iter().map(|e| e.label.as_str()).collect()
    }

    #[test]
    fn test_flat_nav_depth_zero_lists_only_chapters() {
        let doc = book();
        let config = ConversionConfig::default();
        with_builder(&doc, &config, |builder| {
            let nav = builder.build_flat_nav(0);
            assert_eq!(labels(&nav), vec!["Chapter A", "Chapter B", "Extras", "Terms"]);
            assert!(nav.iter().all(|e| e.children.is_empty()));
        });
    }

    #[test]
    fn test_flat_nav_depth_one_stops_below_children() {
        let doc = book();
        let config = ConversionConfig::default();
        with_builder(&doc, &config, |builder| {
            let nav = builder.build_flat_nav(1);
            let setup = &nav[1].children;
            assert_eq!(labels(setup), vec!["Setup"]);
            assert_eq!(setup[0].href, "chapter-b.xhtml#setup");
            assert!(setup[0].children.is_empty());

            let deep = builder.build_flat_nav(2);
            assert_eq!(labels(&deep[1].children[0].children), vec!["Linux"]);
        });
    }

    #[test]
    fn test_flat_and_numbered_nav_share_entries() {
        fn outline(points: &[NavPoint]) -> Vec<(String, String, usize)> {
            let mut rows = Vec::new();
            for point in points {
                rows.push((point.label.clone(), point.href.clone(), point.children.len()));
                rows.extend(outline(&point.children));
            }
            rows
        }
        fn flat_outline(entries: &[NavEntry]) -> Vec<(String, String, usize)> {
            let mut rows = Vec::new();
            for entry in entries {
                rows.push((entry.label.clone(), entry.href.clone(), entry.children.len()));
                rows.extend(flat_outline(&entry.children));
            }
            rows
        }

        let doc = book();
        let config = ConversionConfig::default();
        with_builder(&doc, &config, |builder| {
            for depth in 0..=3 {
                let flat = flat_outline(&builder.build_flat_nav(depth));
                let numbered = outline(&builder.build_numbered_nav(depth));
                assert_eq!(flat, numbered, "depth {}", depth);
            }
        });
    }

    #[test]
    fn test_numbered_nav_play_order_spans_chapters() {
        let doc = book();
        let config = ConversionConfig::default();
        with_builder(&doc, &config, |builder| {
            let points = builder.build_numbered_nav(1);
            assert_eq!(points[0].play_order, 1);
            assert_eq!(points[1].play_order, 2);
            assert_eq!(points[1].children[0].play_order, 3);
            assert_eq!(points[1].children[0].label, "Setup");
            assert_eq!(points[2].play_order, 4);
            assert_eq!(points[2].id(), "nav_4");
            assert_eq!(ncx_depth(&points), 2);
        });
    }

    #[test]
    fn test_nested_chapters_are_not_repeated_as_sections() {
        let doc = book();
        let config = ConversionConfig {
            chapter_level: 2,
            ..Default::default()
        };
        with_builder(&doc, &config, |builder| {
            let nav = builder.build_flat_nav(1);
            assert_eq!(
                labels(&nav),
                vec!["Chapter A", "Chapter B", "Setup", "Extras", "Terms"]
            );
            assert!(nav[1].children.is_empty());
            assert_eq!(labels(&nav[2].children), vec!["Linux"]);
            assert_eq!(nav[2].children[0].href, "setup.xhtml#linux");
        });
    }

    #[test]
    fn test_landmarks_order() {
        let doc = book();
        let config = ConversionConfig {
            cover: Some("cover.xhtml".to_string()),
            ..Default::default()
        };
        with_builder(&doc, &config, |builder| {
            let landmarks = builder.build_landmarks();
            let kinds: Vec<LandmarkKind> = landmarks.iter().map(|l| l.kind).collect();
            assert_eq!(
                kinds,
                vec![
                    LandmarkKind::Cover,
                    LandmarkKind::Toc,
                    LandmarkKind::Bodymatter,
                    LandmarkKind::Appendix,
                    LandmarkKind::Glossary,
                ]
            );
            assert_eq!(landmarks[1].href, "nav.xhtml#toc");
            assert_eq!(landmarks[2].href, "chapter-a.xhtml");
            assert_eq!(landmarks[3].href, "extras.xhtml");
        });
    }

    #[test]
    fn test_landmarks_without_toc() {
        let doc = book();
        let config = ConversionConfig {
            toc: false,
            ..Default::default()
        };
        with_builder(&doc, &config, |builder| {
            let landmarks = builder.build_landmarks();
            assert_eq!(landmarks[0].kind, LandmarkKind::Bodymatter);
            assert!(landmarks.iter().all(|l| l.kind != LandmarkKind::Toc));
        });
    }

    #[test]
    fn test_nav_document_markup() {
        let doc = book();
        let config = ConversionConfig::default();
        with_builder(&doc, &config, |builder| {
            let nav = builder.build_flat_nav(1);
            let landmarks = builder.build_landmarks();
            let xhtml = builder.nav_document("Book", &nav, &landmarks).unwrap();

            assert!(xhtml.contains(r#"<nav epub:type="toc" id="toc">"#));
            assert!(xhtml.contains(r#"<li><a href="chapter-a.xhtml">Chapter A</a></li>"#));
            assert!(xhtml.contains(r#"<a href="chapter-b.xhtml#setup">Setup</a>"#));
            assert!(xhtml.contains(r#"<a epub:type="bodymatter" href="chapter-a.xhtml">"#));
            assert!(!xhtml.contains("<ol>\n</ol>"));
        });
    }

    #[test]
    fn test_ncx_document_markup() {
        let doc = book();
        let config = ConversionConfig::default();
        with_builder(&doc, &config, |builder| {
            let points = builder.build_numbered_nav(1);
            let ncx = builder.ncx_document("Book", "urn:uuid:1", &points).unwrap();

            assert!(ncx.contains(r#"<meta name="dtb:uid" content="urn:uuid:1"/>"#));
            assert!(ncx.contains(r#"<meta name="dtb:depth" content="2"/>"#));
            assert!(ncx.contains(r#"<navPoint id="nav_3" playOrder="3">"#));
            assert!(ncx.contains(r#"<content src="chapter-b.xhtml#setup"/>"#));
            assert!(ncx.contains("<navLabel><text>Setup</text></navLabel>"));
        });
    }
}
