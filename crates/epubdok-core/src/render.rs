//! Chapter rendering
//!
//! Writes one XHTML content document per chapter. Rendering visits the
//! chapter's content strictly left to right, depth first; the xref
//! resolver relies on that order to decide which reference to a target
//! carries the `id` attribute.

use std::collections::HashSet;

use epubdok_ast::{BlockKind, InlineKind, ListType, Node, NodeKind};

use crate::config::ConversionConfig;
use crate::diagnostics::{Diagnostic, Diagnostics, Location};
use crate::error::Result;
use crate::footnotes::{FootnoteAggregator, FootnoteRecord};
use crate::ids::strip_tags;
use crate::markup::{Element, Markup, XmlDocument};
use crate::partition::{ChapterRecord, Partition};
use crate::xref::XrefResolver;

const XHTML_NS: &str = "http://www.w3.org/1999/xhtml";
const EPUB_NS: &str = "http://www.idpf.org/2007/ops";

/// Wrap a body in an XHTML5 content document
pub(crate) fn xhtml_page(config: &ConversionConfig, title: &str, body: Element) -> Result<String> {
    let mut head = Element::block("head")
        .child(Element::block("meta").attr("charset", "UTF-8"))
        .child(Element::block("title").text(title));
    for stylesheet in &config.stylesheets {
        head.push(
            Element::block("link")
                .attr("rel", "stylesheet")
                .attr("type", "text/css")
                .attr("href", stylesheet.as_str()),
        );
    }

    let lang = config.lang.as_str();
    let html = Element::block("html")
        .attr("xmlns", XHTML_NS)
        .attr("xmlns:epub", EPUB_NS)
        .attr("xml:lang", lang)
        .attr("lang", lang)
        .child(head)
        .child(body);

    XmlDocument::xhtml(html).to_xml_string()
}

/// Renders chapters in spine order
///
/// Owns the per-run mutable state: the xref resolver's per-chapter id set
/// and the footnote registry.
pub struct ChapterRenderer<'p, 'a, 'c> {
    partition: &'p Partition<'a>,
    config: &'c ConversionConfig,
    xrefs: XrefResolver<'p, 'a>,
    footnotes: FootnoteAggregator<'p, 'a>,
}

struct ChapterState<'s, 'a> {
    chapter: &'s ChapterRecord<'a>,
    /// Footnote markers that already carry their `noteref-N` id
    noterefs: HashSet<u32>,
    diagnostics: &'s mut Diagnostics,
}

impl<'p, 'a, 'c> ChapterRenderer<'p, 'a, 'c> {
    pub fn new(partition: &'p Partition<'a>, config: &'c ConversionConfig) -> Self {
        Self {
            partition,
            config,
            xrefs: XrefResolver::new(partition),
            footnotes: FootnoteAggregator::new(partition),
        }
    }

    /// Render a chapter into a complete content document
    ///
    /// Chapters must be rendered in spine order so footnotes land in the
    /// first chapter that references them.
    pub fn render(
        &mut self,
        chapter: &ChapterRecord<'a>,
        diagnostics: &mut Diagnostics,
    ) -> Result<String> {
        self.xrefs.begin_chapter(chapter);
        let notes = self.footnotes.collect_new(chapter, diagnostics);

        let mut state = ChapterState {
            chapter,
            noterefs: HashSet::new(),
            diagnostics,
        };

        let title = chapter.label(&self.config.untitled_label);
        let epub_type = match chapter.node.section_role() {
            Some(role) => role.epub_type(),
            None => "chapter",
        };

        let mut section = Element::block("section")
            .class("chapter")
            .attr("title", title.as_str())
            .attr("epub:type", epub_type)
            .attr("id", chapter.id.as_str());

        if let Some(heading) = chapter.title() {
            section.push(
                Element::block("header").child(
                    Element::block("div").class("chapter-header").child(
                        Element::block("h1").class("chapter-title").text(heading),
                    ),
                ),
            );
        }

        let content = self.children(chapter.node, &mut state);
        section.extend(content);

        if !notes.is_empty() {
            section.push(self.footer(&notes, &mut state));
        }

        let markup = xhtml_page(self.config, &title, Element::block("body").child(section))?;
        tracing::debug!(
            chapter = %chapter.filename,
            bytes = markup.len(),
            "rendered chapter"
        );
        Ok(markup)
    }

    fn footer(&mut self, notes: &[FootnoteRecord<'a>], state: &mut ChapterState<'_, 'a>) -> Element {
        let mut list = Element::block("div").class("footnotes");
        for note in notes {
            let mut paragraph = Element::new("p").child(
                Element::new("sup").class("noteref").child(
                    Element::new("a")
                        .attr("href", format!("#noteref-{}", note.index))
                        .text(note.index.to_string()),
                ),
            );
            paragraph.push_text(" ");
            let body = self.children(note.definition, state);
            paragraph.extend(body);

            list.push(
                Element::block("aside")
                    .attr("id", format!("note-{}", note.index))
                    .attr("epub:type", "footnote")
                    .child(paragraph),
            );
        }
        Element::block("footer").child(Element::block("div").class("chapter-footer").child(list))
    }

    fn children(&mut self, node: &'a Node, state: &mut ChapterState<'_, 'a>) -> Vec<Markup> {
        let mut out = Vec::with_capacity(node.children.len());
        for child in &node.children {
            if self.partition.index.chapter_root_ordinal(child).is_some() {
                continue;
            }
            if let Some(markup) = self.node(child, state) {
                out.push(markup);
            }
        }
        out
    }

    fn node(&mut self, node: &'a Node, state: &mut ChapterState<'_, 'a>) -> Option<Markup> {
        match &node.kind {
            NodeKind::Document => None,
            NodeKind::Preamble => {
                let mut div = Element::block("div")
                    .class("preamble")
                    .opt_attr("id", node.id.as_deref());
                let content = self.children(node, state);
                div.extend(content);
                Some(div.into())
            }
            NodeKind::Section { role } => {
                let level = node.level.clamp(1, 5);
                let title = node.title.as_deref().map(strip_tags).unwrap_or_default();
                let heading = Element::block(format!("h{}", level + 1))
                    .opt_attr("id", node.id.as_deref())
                    .text(title.as_str());

                let mut section = Element::block("section")
                    .class(format!("sect{}", level))
                    .attr("title", title.as_str())
                    .opt_attr("epub:type", role.is_special().then(|| role.epub_type()))
                    .child(heading);
                let content = self.children(node, state);
                section.extend(content);
                Some(section.into())
            }
            NodeKind::Block(kind) => Some(self.block(node, kind, state).into()),
            NodeKind::Inline(kind) => self.inline(node, kind, state),
        }
    }

    fn block(
        &mut self,
        node: &'a Node,
        kind: &BlockKind,
        state: &mut ChapterState<'_, 'a>,
    ) -> Element {
        let title = node.title.as_deref().map(strip_tags);

        let element = match kind {
            BlockKind::Paragraph => {
                let paragraph = self.container(Element::block("p"), node, state);
                match title {
                    Some(title) => Element::block("div")
                        .class("paragraph")
                        .child(block_title(&title))
                        .child(paragraph),
                    None => paragraph,
                }
            }
            BlockKind::Listing => {
                let code = self.container(Element::new("code"), node, state);
                let mut figure = Element::block("figure").class("listing");
                if let Some(title) = &title {
                    figure.push(Element::block("figcaption").text(title.as_str()));
                }
                figure.child(Element::block("pre").child(code))
            }
            BlockKind::Literal => self.container(Element::block("pre").class("literal"), node, state),
            BlockKind::Quote => {
                let mut quote = self.titled(Element::block("blockquote"), title.as_deref());
                let content = self.children(node, state);
                quote.extend(content);
                if let Some(attribution) = node.attribute("attribution") {
                    quote.push(Element::block("footer").text(format!("~ {}", attribution)));
                }
                quote
            }
            BlockKind::Sidebar => {
                let aside = Element::block("aside")
                    .class("sidebar")
                    .attr("epub:type", "sidebar");
                let aside = self.titled(aside, title.as_deref());
                self.container(aside, node, state)
            }
            BlockKind::Example => {
                let div = self.titled(Element::block("div").class("example"), title.as_deref());
                self.container(div, node, state)
            }
            BlockKind::Open => self.container(Element::block("div").class("open"), node, state),
            BlockKind::Admonition(admonition) => {
                let label = capitalize(admonition.name());
                let aside = Element::block("aside")
                    .class(format!("admonition {}", admonition.name()))
                    .attr("title", label.as_str())
                    .attr("epub:type", admonition.epub_type());
                let aside = self.titled(aside, title.as_deref());
                let content = self.container(Element::block("div").class("content"), node, state);
                aside.child(content)
            }
            BlockKind::List(list_type) => {
                let name = match list_type {
                    ListType::Unordered => "ul",
                    ListType::Ordered => "ol",
                };
                self.container(Element::block(name), node, state)
            }
            BlockKind::ListItem => self.container(Element::block("li"), node, state),
            BlockKind::Table => self.table(node, title.as_deref(), state),
            BlockKind::TableRow { header } => self.row(node, *header, state),
            BlockKind::TableCell => self.container(Element::block("td"), node, state),
            BlockKind::Image { target, alt } => {
                let alt = alt.clone().or_else(|| title.clone()).unwrap_or_default();
                let mut figure = Element::block("figure").class("image").child(
                    Element::block("div")
                        .class("content")
                        .child(Element::new("img").attr("src", target.as_str()).attr("alt", alt)),
                );
                if let Some(title) = &title {
                    figure.push(Element::block("figcaption").text(title.as_str()));
                }
                figure
            }
            BlockKind::PageBreak => Element::block("hr")
                .attr("epub:type", "pagebreak")
                .class("pagebreak"),
            BlockKind::ThematicBreak => Element::block("hr"),
        };

        match &node.id {
            Some(id) if element.get_attr("id").is_none() => element.attr("id", id.as_str()),
            _ => element,
        }
    }

    fn table(
        &mut self,
        node: &'a Node,
        title: Option<&str>,
        state: &mut ChapterState<'_, 'a>,
    ) -> Element {
        let mut table = Element::block("table").class("table");
        if let Some(title) = title {
            table.push(Element::block("caption").text(title));
        }

        let is_header =
            |row: &Node| matches!(row.kind, NodeKind::Block(BlockKind::TableRow { header: true }));
        let (head, body): (Vec<&'a Node>, Vec<&'a Node>) =
            node.children.iter().partition(|&row| is_header(row));

        for (name, rows) in [("thead", head), ("tbody", body)] {
            if rows.is_empty() {
                continue;
            }
            let mut group = Element::block(name);
            for row in rows {
                if let Some(markup) = self.node(row, state) {
                    group.push(markup);
                }
            }
            table.push(group);
        }
        table
    }

    fn row(&mut self, node: &'a Node, header: bool, state: &mut ChapterState<'_, 'a>) -> Element {
        let cell_name = if header { "th" } else { "td" };
        let mut row = Element::block("tr");
        for cell in &node.children {
            let cell_element = self.container(Element::block(cell_name), cell, state);
            row.push(cell_element.opt_attr("id", cell.id.as_deref()));
        }
        row
    }

    fn inline(
        &mut self,
        node: &'a Node,
        kind: &InlineKind,
        state: &mut ChapterState<'_, 'a>,
    ) -> Option<Markup> {
        let markup = match kind {
            InlineKind::Text(text) => Markup::Text(text.clone()),
            InlineKind::Format(format) => self.container(Element::new(format.tag()), node, state).into(),
            InlineKind::Anchor => match &node.id {
                Some(id) => Element::new("a").attr("id", id.as_str()).into(),
                None => {
                    state.diagnostics.push(
                        Diagnostic::warning("inline anchor without an id")
                            .with_code("ID003")
                            .with_location(Location::chapter(&state.chapter.filename)),
                    );
                    return None;
                }
            },
            InlineKind::Bibref => match &node.id {
                Some(id) => Element::new("a")
                    .attr("id", id.as_str())
                    .attr("href", format!("#xref-{}", id))
                    .text(format!("[{}]", id))
                    .into(),
                None => {
                    state.diagnostics.push(
                        Diagnostic::warning("bibliography anchor without an id")
                            .with_code("ID003")
                            .with_location(Location::chapter(&state.chapter.filename)),
                    );
                    return None;
                }
            },
            InlineKind::Xref { target, text } => {
                let link = self.xrefs.resolve(
                    state.chapter,
                    target,
                    text.as_deref(),
                    state.diagnostics,
                );
                let class = if link.is_unresolved() {
                    "xref unresolved"
                } else {
                    "xref"
                };
                Element::new("a")
                    .opt_attr("id", link.id_attr)
                    .attr("href", link.href)
                    .class(class)
                    .text(link.text)
                    .into()
            }
            InlineKind::Footnote { index } => self.footnote_marker(*index, state).into(),
            InlineKind::Link { url } => {
                let link = Element::new("a").attr("href", url.as_str()).class("link");
                if node.children.is_empty() {
                    link.text(url.as_str()).into()
                } else {
                    self.container(link, node, state).into()
                }
            }
            InlineKind::LineBreak => Element::new("br").into(),
        };
        Some(markup)
    }

    fn footnote_marker(&mut self, index: u32, state: &mut ChapterState<'_, 'a>) -> Element {
        let owner = self.footnotes.owner(index);
        let owner_file = owner.and_then(|ordinal| self.partition.chapters.get(ordinal));

        match (self.footnotes.definition(index), owner_file) {
            (Some(_), Some(owner_file)) => {
                let href = if owner_file.ordinal == state.chapter.ordinal {
                    format!("#note-{}", index)
                } else {
                    format!("{}#note-{}", owner_file.filename, index)
                };
                let id = state
                    .noterefs
                    .insert(index)
                    .then(|| format!("noteref-{}", index));

                let mut sup = Element::new("sup").class("noteref");
                sup.push_text("[");
                sup.push(
                    Element::new("a")
                        .opt_attr("id", id)
                        .attr("href", href)
                        .attr("epub:type", "noteref")
                        .text(index.to_string()),
                );
                sup.push_text("]");
                sup
            }
            _ => Element::new("mark")
                .class("noteref")
                .attr("title", "Unresolved note reference")
                .text(format!("[{}]", index)),
        }
    }

    /// Append the rendered children of `node` to `element`
    fn container(
        &mut self,
        mut element: Element,
        node: &'a Node,
        state: &mut ChapterState<'_, 'a>,
    ) -> Element {
        let content = self.children(node, state);
        element.extend(content);
        element
    }

    fn titled(&self, element: Element, title: Option<&str>) -> Element {
        match title {
            Some(title) => element.child(block_title(title)),
            None => element,
        }
    }
}

fn block_title(title: &str) -> Element {
    Element::block("h4").class("block-title").text(title)
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::IdAssigner;
    use crate::partition::ChapterPartitioner;
    use epubdok_ast::{AdmonitionType, FormatType};

    fn render_all(mut doc: Node, config: &ConversionConfig) -> (Vec<String>, Diagnostics) {
        let mut diags = Diagnostics::new();
        IdAssigner::new(&config.ids).assign_tree(&mut doc, &mut diags);
        let mut ids = IdAssigner::new(&config.ids);
        let partition = ChapterPartitioner::new(config)
            .partition(&doc, &mut ids, &mut diags)
            .unwrap();
        let mut renderer = ChapterRenderer::new(&partition, config);
        let pages = partition
            .chapters
            .iter()
            .map(|chapter| renderer.render(chapter, &mut diags).unwrap())
            .collect();
        (pages, diags)
    }

    fn para(children: Vec<Node>) -> Node {
        children
            .into_iter()
            .fold(Node::block(BlockKind::Paragraph), Node::with_child)
    }

    #[test]
    fn test_chapter_shell() {
        let doc = Node::document("Book")
            .with_child(Node::section(1, "Chapter A").with_child(Node::paragraph("Hello & bye")));
        let (pages, diags) = render_all(doc, &ConversionConfig::default());

        assert_eq!(pages.len(), 1);
        let page = &pages[0];
        assert!(page.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<!DOCTYPE html>\n"));
        assert!(page.contains(
            r#"<section class="chapter" title="Chapter A" epub:type="chapter" id="chapter-a">"#
        ));
        assert!(page.contains(r#"<h1 class="chapter-title">Chapter A</h1>"#));
        assert!(page.contains("<p>Hello &amp; bye</p>"));
        assert!(page.contains(r#"<link rel="stylesheet" type="text/css" href="styles/epub3.css"/>"#));
        assert!(diags.is_empty());
    }

    #[test]
    fn test_nested_section_markup() {
        let doc = Node::document("Book").with_child(
            Node::section(1, "Chapter B").with_child(
                Node::section(2, "Setup").with_child(Node::paragraph("Install it")),
            ),
        );
        let (pages, _) = render_all(doc, &ConversionConfig::default());

        assert!(pages[0].contains(r#"<section class="sect2" title="Setup">"#));
        assert!(pages[0].contains(r#"<h3 id="setup">Setup</h3>"#));
    }

    #[test]
    fn test_nested_chapter_is_not_inlined() {
        let doc = Node::document("Book").with_child(
            Node::section(1, "Chapter B")
                .with_child(Node::section(2, "Setup").with_child(Node::paragraph("Install it"))),
        );
        let config = ConversionConfig {
            chapter_level: 2,
            ..Default::default()
        };
        let (pages, _) = render_all(doc, &config);

        assert_eq!(pages.len(), 2);
        assert!(!pages[0].contains("Install it"));
        assert!(pages[1].contains("Install it"));
    }

    #[test]
    fn test_xref_first_occurrence_gets_id() {
        let doc = Node::document("Book").with_child(
            Node::section(1, "Chapter A")
                .with_child(para(vec![
                    Node::xref("target"),
                    Node::text(" and "),
                    Node::xref("target"),
                ]))
                .with_child(para(vec![Node::anchor("target")])),
        );
        let (pages, _) = render_all(doc, &ConversionConfig::default());

        assert!(pages[0].contains(r##"<a id="xref-target" href="#target" class="xref">[target]</a>"##));
        assert!(pages[0].contains(r##"and <a href="#target" class="xref">[target]</a>"##));
        assert_eq!(pages[0].matches(r#"id="xref-target""#).count(), 1);
        assert!(pages[0].contains(r#"<a id="target"></a>"#));
    }

    #[test]
    fn test_unresolved_xref_is_marked() {
        let doc = Node::document("Book").with_child(
            Node::section(1, "Chapter A").with_child(para(vec![Node::xref("missing-id")])),
        );
        let (pages, diags) = render_all(doc, &ConversionConfig::default());

        assert!(pages[0].contains(r##"<a href="#missing-id" class="xref unresolved">[missing-id]</a>"##));
        assert_eq!(diags.warning_count(), 1);
    }

    #[test]
    fn test_footnote_marker_and_footer() {
        let doc = Node::document("Book")
            .with_child(
                Node::section(1, "A")
                    .with_child(para(vec![Node::footnote(1, "A note"), Node::footnote_ref(1)])),
            )
            .with_child(Node::section(1, "B").with_child(para(vec![Node::footnote_ref(1)])));
        let (pages, _) = render_all(doc, &ConversionConfig::default());

        assert!(pages[0].contains(
            r##"<sup class="noteref">[<a id="noteref-1" href="#note-1" epub:type="noteref">1</a>]</sup>"##
        ));
        assert!(pages[0].contains(r##"<sup class="noteref">[<a href="#note-1" epub:type="noteref">1</a>]</sup>"##));
        assert!(pages[0].contains(r#"<aside id="note-1" epub:type="footnote">"#));
        assert!(pages[0].contains(r##"<p><sup class="noteref"><a href="#noteref-1">1</a></sup> A note</p>"##));

        assert!(pages[1].contains(r#"href="a.xhtml#note-1""#));
        assert!(!pages[1].contains("A note"));
        assert!(!pages[1].contains("<footer>"));
    }

    #[test]
    fn test_unresolved_footnote_reference() {
        let doc = Node::document("Book")
            .with_child(Node::section(1, "A").with_child(para(vec![Node::footnote_ref(4)])));
        let (pages, diags) = render_all(doc, &ConversionConfig::default());

        assert!(pages[0].contains(
            r#"<mark class="noteref" title="Unresolved note reference">[4]</mark>"#
        ));
        assert_eq!(diags.with_code("FN001").count(), 1);
    }

    #[test]
    fn test_block_markup() {
        let doc = Node::document("Book").with_child(
            Node::section(1, "A")
                .with_child(
                    Node::block(BlockKind::Admonition(AdmonitionType::Tip))
                        .with_child(Node::paragraph("Try it")),
                )
                .with_child(Node::block(BlockKind::PageBreak))
                .with_child(
                    Node::block(BlockKind::Image {
                        target: "images/a.png".to_string(),
                        alt: Some("Diagram".to_string()),
                    })
                    .with_title("Overview"),
                )
                .with_child(para(vec![
                    Node::format(FormatType::Strong, "bold"),
                    Node::inline(InlineKind::Link {
                        url: "https://example.org".to_string(),
                    }),
                ])),
        );
        let (pages, _) = render_all(doc, &ConversionConfig::default());
        let page = &pages[0];

        assert!(page.contains(r#"<aside class="admonition tip" title="Tip" epub:type="help">"#));
        assert!(page.contains(r#"<hr epub:type="pagebreak" class="pagebreak"/>"#));
        assert!(page.contains(r#"<img src="images/a.png" alt="Diagram"/>"#));
        assert!(page.contains("<figcaption>Overview</figcaption>"));
        assert!(page.contains("<strong>bold</strong>"));
        assert!(page.contains(
            r#"<a href="https://example.org" class="link">https://example.org</a>"#
        ));
    }

    #[test]
    fn test_table_groups_header_rows() {
        let cell = |text: &str| Node::block(BlockKind::TableCell).with_child(Node::text(text));
        let doc = Node::document("Book").with_child(
            Node::section(1, "A").with_child(
                Node::block(BlockKind::Table)
                    .with_child(
                        Node::block(BlockKind::TableRow { header: true }).with_child(cell("Name")),
                    )
                    .with_child(
                        Node::block(BlockKind::TableRow { header: false }).with_child(cell("epub")),
                    ),
            ),
        );
        let (pages, _) = render_all(doc, &ConversionConfig::default());

        assert!(pages[0].contains("<thead>\n<tr>\n<th>Name</th>\n</tr>\n</thead>"));
        assert!(pages[0].contains("<tbody>\n<tr>\n<td>epub</td>\n</tr>\n</tbody>"));
    }

    #[test]
    fn test_bibref_links_back_to_first_citation() {
        let doc = Node::document("Book").with_child(
            Node::section(1, "Chapter A")
                .with_child(para(vec![Node::text("As shown in "), Node::xref("knuth")]))
                .with_child(
                    Node::section(2, "Bibliography")
                        .with_child(para(vec![Node::bibref("knuth"), Node::text(" The Art")])),
                ),
        );
        let (pages, diags) = render_all(doc, &ConversionConfig::default());

        assert!(pages[0].contains(r##"<a id="xref-knuth" href="#knuth" class="xref">[knuth]</a>"##));
        assert!(pages[0].contains(r##"<a id="knuth" href="#xref-knuth">[knuth]</a> The Art"##));
        assert!(diags.is_empty());
    }

    #[test]
    fn test_bibref_without_id_is_reported() {
        let doc = Node::document("Book").with_child(
            Node::section(1, "A").with_child(para(vec![Node::inline(InlineKind::Bibref)])),
        );
        let (pages, diags) = render_all(doc, &ConversionConfig::default());
        assert_eq!(diags.with_code("ID003").count(), 1);
        assert!(!pages[0].contains("xref-"));
    }

    #[test]
    fn test_xref_first_occurrence_inside_list_item() {
        let doc = Node::document("Book").with_child(
            Node::section(1, "Chapter A")
                .with_child(
                    Node::block(BlockKind::List(ListType::Unordered)).with_child(
                        Node::block(BlockKind::ListItem)
                            .with_child(para(vec![Node::xref("target")])),
                    ),
                )
                .with_child(para(vec![Node::text("Again "), Node::xref("target")]))
                .with_child(para(vec![Node::anchor("target")])),
        );
        let (pages, _) = render_all(doc, &ConversionConfig::default());
        let page = &pages[0];

        assert_eq!(page.matches(r#"id="xref-target""#).count(), 1);
        let first = page.find(r#"id="xref-target""#).unwrap();
        let second = page.find(r##"Again <a href="#target" class="xref">"##).unwrap();
        assert!(first < second);
        assert!(page[..second].contains("<li>"));
    }

    #[test]
    fn test_anchor_without_id_is_reported() {
        let doc = Node::document("Book").with_child(
            Node::section(1, "A").with_child(para(vec![Node::inline(InlineKind::Anchor)])),
        );
        let (_, diags) = render_all(doc, &ConversionConfig::default());
        assert_eq!(diags.with_code("ID003").count(), 1);
    }
}
