//! Identifier assignment
//!
//! Chapter file names are derived from node ids, so every document,
//! preamble and section needs one. [`IdAssigner`] fills in the missing
//! ids, keeps generated ids unique across the tree, and reports
//! author-supplied ids that collide with package-internal file names.

use std::collections::HashSet;
use std::sync::OnceLock;

use regex::Regex;

use epubdok_ast::{Node, NodeKind};

use crate::config::IdSettings;
use crate::diagnostics::{Diagnostic, Diagnostics, Location};

/// Assigns stable, collision-free ids to structural nodes
///
/// # Example
///
/// ```
/// use epubdok_ast::Node;
/// use epubdok_core::config::IdSettings;
/// use epubdok_core::diagnostics::Diagnostics;
/// use epubdok_core::ids::IdAssigner;
///
/// let settings = IdSettings::default();
/// let mut doc = Node::document("My Book").with_child(Node::section(1, "Chapter A"));
/// let mut diagnostics = Diagnostics::new();
///
/// IdAssigner::new(&settings).assign_tree(&mut doc, &mut diagnostics);
/// assert_eq!(doc.id.as_deref(), Some("my-book"));
/// assert_eq!(doc.children[0].id.as_deref(), Some("chapter-a"));
/// ```
pub struct IdAssigner<'c> {
    settings: &'c IdSettings,
    /// Every id present in the tree or handed out so far
    taken: HashSet<String>,
    synthetic_counter: usize,
}

impl<'c> IdAssigner<'c> {
    /// Create an assigner for one conversion run
    pub fn new(settings: &'c IdSettings) -> Self {
        Self {
            settings,
            taken: HashSet::new(),
            synthetic_counter: 0,
        }
    }

    /// Check if an id collides with a package-internal name
    pub fn is_reserved(&self, id: &str) -> bool {
        self.settings.reserved.iter().any(|r| r == id)
    }

    /// Give every document, preamble and section node an id
    ///
    /// Ids already present in the tree are left untouched and are never
    /// handed out again.
    pub fn assign_tree(&mut self, root: &mut Node, diagnostics: &mut Diagnostics) {
        root.walk(&mut |node| {
            if let Some(id) = &node.id {
                self.taken.insert(id.clone());
            }
        });
        self.fill_missing(root, diagnostics);
    }

    fn fill_missing(&mut self, node: &mut Node, diagnostics: &mut Diagnostics) {
        let structural = matches!(
            node.kind,
            NodeKind::Document | NodeKind::Preamble | NodeKind::Section { .. }
        );
        if structural && node.id.is_none() {
            let id = self.generate(node, diagnostics);
            node.id = Some(id);
        }
        for child in &mut node.children {
            self.fill_missing(child, diagnostics);
        }
    }

    /// Id of a chapter root node
    ///
    /// An author-supplied id is returned unchanged. A reserved id is
    /// reported and still used as-is, since renaming it would break links
    /// written against it.
    pub fn assign(&mut self, node: &Node, diagnostics: &mut Diagnostics) -> String {
        match &node.id {
            Some(id) => {
                if self.is_reserved(id) {
                    diagnostics.push(
                        Diagnostic::warning(format!(
                            "id '{}' collides with a reserved package file name",
                            id
                        ))
                        .with_code("ID001")
                        .with_location(Location::node(id.clone()))
                        .with_help("Choose another id; the chapter file may overwrite a package file"),
                    );
                }
                id.clone()
            }
            None => self.generate(node, diagnostics),
        }
    }

    fn generate(&mut self, node: &Node, diagnostics: &mut Diagnostics) -> String {
        let derived = match node.kind {
            NodeKind::Document | NodeKind::Section { .. } => node
                .title
                .as_deref()
                .and_then(|title| slugify(title, self.settings)),
            NodeKind::Preamble | NodeKind::Block(_) | NodeKind::Inline(_) => {
                first_titled_descendant(node).and_then(|descendant| match &descendant.id {
                    Some(id) => Some(id.clone()),
                    None => descendant
                        .title
                        .as_deref()
                        .and_then(|title| slugify(title, self.settings)),
                })
            }
        };

        match derived {
            Some(candidate) => self.unique(candidate),
            None => {
                let id = self.synthetic(kind_name(&node.kind));
                if !matches!(node.kind, NodeKind::Preamble) {
                    diagnostics.push(
                        Diagnostic::warning(format!(
                            "cannot derive an id from the title; using synthetic id '{}'",
                            id
                        ))
                        .with_code("ID002")
                        .with_location(Location::node(id.clone()))
                        .with_help("Give the node a title or an explicit id"),
                    );
                }
                id
            }
        }
    }

    /// Reserve an id for a generated node; reserved names are never handed out
    fn claim(&mut self, candidate: &str) -> bool {
        !self.is_reserved(candidate) && self.taken.insert(candidate.to_string())
    }

    fn unique(&mut self, candidate: String) -> String {
        if self.claim(&candidate) {
            return candidate;
        }
        let mut n = 2;
        loop {
            let attempt = format!("{}{}{}", candidate, self.settings.separator, n);
            if self.claim(&attempt) {
                return attempt;
            }
            n += 1;
        }
    }

    fn synthetic(&mut self, kind: &str) -> String {
        loop {
            self.synthetic_counter += 1;
            let attempt = format!(
                "{}{}{}{}",
                self.settings.prefix, kind, self.settings.separator, self.synthetic_counter
            );
            if self.claim(&attempt) {
                return attempt;
            }
        }
    }
}

fn kind_name(kind: &NodeKind) -> &'static str {
    match kind {
        NodeKind::Document => "document",
        NodeKind::Preamble => "preamble",
        NodeKind::Section { .. } => "section",
        NodeKind::Block(_) => "block",
        NodeKind::Inline(_) => "inline",
    }
}

fn first_titled_descendant(node: &Node) -> Option<&Node> {
    node.children.iter().find_map(|child| {
        if child.title.is_some() {
            Some(child)
        } else {
            first_titled_descendant(child)
        }
    })
}

/// Derive an id from a display title
///
/// Markup tags are stripped, character references transliterated, the
/// text lowercased, non-word characters dropped and runs of spaces, dots
/// and hyphens collapsed into one separator. Returns `None` when nothing
/// usable is left.
pub fn slugify(title: &str, settings: &IdSettings) -> Option<String> {
    static INVALID_RE: OnceLock<Regex> = OnceLock::new();
    static SPACING_RE: OnceLock<Regex> = OnceLock::new();

    let text = decode_char_refs(&strip_tags(title)).to_lowercase();

    let invalid = INVALID_RE.get_or_init(|| Regex::new(r"[^\w\s.\-]+").unwrap());
    let text = invalid.replace_all(&text, "");

    let spacing = SPACING_RE.get_or_init(|| Regex::new(r"[\s.\-]+").unwrap());
    let separator = settings.separator.as_str();
    let mut slug = spacing.replace_all(&text, separator).into_owned();

    if !separator.is_empty() {
        let doubled = format!("{}{}", separator, separator);
        while slug.contains(&doubled) {
            slug = slug.replace(&doubled, separator);
        }
        slug = slug
            .trim_start_matches(separator)
            .trim_end_matches(separator)
            .to_string();
    }

    if slug.is_empty() {
        return None;
    }

    let mut id = format!("{}{}", settings.prefix, slug);
    if id.starts_with(|c: char| c.is_ascii_digit()) {
        id.insert(0, '_');
    }
    Some(id)
}

/// Remove markup tags and collapse whitespace
pub fn strip_tags(text: &str) -> String {
    static TAG_RE: OnceLock<Regex> = OnceLock::new();
    let tag = TAG_RE.get_or_init(|| Regex::new(r"</?[^>]+>").unwrap());
    let stripped = tag.replace_all(text, "");
    stripped.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Transliterate numeric and basic named character references
pub fn decode_char_refs(text: &str) -> String {
    static REF_RE: OnceLock<Regex> = OnceLock::new();
    let re = REF_RE.get_or_init(|| Regex::new(r"&(#x[0-9a-fA-F]{1,6}|#\d{1,7}|[a-zA-Z]+);").unwrap());

    re.replace_all(text, |caps: &regex::Captures<'_>| {
        let entity = &caps[1];
        let decoded = if let Some(hex) = entity.strip_prefix("#x") {
            u32::from_str_radix(hex, 16).ok().and_then(char::from_u32)
        } else if let Some(dec) = entity.strip_prefix('#') {
            dec.parse().ok().and_then(char::from_u32)
        } else {
            match entity {
                "amp" => Some('&'),
                "lt" => Some('<'),
                "gt" => Some('>'),
                "quot" => Some('"'),
                "apos" => Some('\''),
                "nbsp" => Some(' '),
                _ => None,
            }
        };
        match decoded {
            Some(c) => c.to_string(),
            None => caps[0].to_string(),
        }
    })
    .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use epubdok_ast::{BlockKind, SectionRole};
    use proptest::prelude::*;

    fn settings() -> IdSettings {
        IdSettings::default()
    }

    #[test]
    fn test_slugify_basic() {
        assert_eq!(slugify("Chapter A", &settings()).as_deref(), Some("chapter-a"));
        assert_eq!(slugify("What's New?", &settings()).as_deref(), Some("whats-new"));
        assert_eq!(
            slugify("  Getting   Started  ", &settings()).as_deref(),
            Some("getting-started")
        );
    }

    #[test]
    fn test_slugify_keeps_unicode_words() {
        assert_eq!(slugify("Test é", &settings()).as_deref(), Some("test-é"));
        assert_eq!(slugify("Test &#233;", &settings()).as_deref(), Some("test-é"));
    }

    #[test]
    fn test_slugify_strips_markup_and_entities() {
        assert_eq!(
            slugify("The <em>Rust</em> &amp; C++ Book", &settings()).as_deref(),
            Some("the-rust-c-book")
        );
    }

    #[test]
    fn test_slugify_collapses_separators() {
        assert_eq!(slugify("a - b -- c", &settings()).as_deref(), Some("a-b-c"));
        assert_eq!(slugify("v1.2.3 notes", &settings()).as_deref(), Some("v1-2-3-notes"));
    }

    #[test]
    fn test_slugify_leading_digit_is_prefixed() {
        assert_eq!(slugify("1. Intro", &settings()).as_deref(), Some("_1-intro"));
    }

    #[test]
    fn test_slugify_custom_prefix_and_separator() {
        let custom = IdSettings {
            prefix: "_".to_string(),
            separator: "_".to_string(),
            ..IdSettings::default()
        };
        assert_eq!(
            slugify("Getting Started", &custom).as_deref(),
            Some("_getting_started")
        );
    }

    #[test]
    fn test_slugify_empty() {
        assert_eq!(slugify("", &settings()), None);
        assert_eq!(slugify("?!*", &settings()), None);
    }

    #[test]
    fn test_assign_tree_fills_missing_ids() {
        let settings = settings();
        let mut doc = Node::document("My Book")
            .with_child(Node::section(1, "Chapter A").with_child(Node::section(2, "Setup")))
            .with_child(Node::section(1, "Chapter B").with_id("custom-b"));
        let mut diags = Diagnostics::new();

        IdAssigner::new(&settings).assign_tree(&mut doc, &mut diags);

        assert_eq!(doc.id.as_deref(), Some("my-book"));
        assert_eq!(doc.children[0].id.as_deref(), Some("chapter-a"));
        assert_eq!(doc.children[0].children[0].id.as_deref(), Some("setup"));
        assert_eq!(doc.children[1].id.as_deref(), Some("custom-b"));
        assert!(diags.is_empty());
    }

    #[test]
    fn test_generated_ids_avoid_existing_ids() {
        let settings = settings();
        let mut doc = Node::document("Book")
            .with_child(Node::section(1, "Setup"))
            .with_child(Node::section(1, "Other").with_child(Node::anchor("setup")))
            .with_child(Node::section(1, "Setup"));
        let mut diags = Diagnostics::new();

        IdAssigner::new(&settings).assign_tree(&mut doc, &mut diags);

        assert_eq!(doc.children[0].id.as_deref(), Some("setup-2"));
        assert_eq!(doc.children[2].id.as_deref(), Some("setup-3"));
    }

    #[test]
    fn test_untitled_document_gets_synthetic_id() {
        let settings = settings();
        let mut doc = Node::untitled_document().with_child(Node::paragraph("text"));
        let mut diags = Diagnostics::new();

        IdAssigner::new(&settings).assign_tree(&mut doc, &mut diags);

        assert_eq!(doc.id.as_deref(), Some("document-1"));
        assert_eq!(diags.with_code("ID002").count(), 1);
    }

    #[test]
    fn test_preamble_uses_first_titled_descendant() {
        let settings = settings();
        let mut doc = Node::document("Book").with_child(
            Node::preamble().with_child(
                Node::block(BlockKind::Sidebar)
                    .with_title("About This Book")
                    .with_id("about"),
            ),
        );
        let mut diags = Diagnostics::new();

        IdAssigner::new(&settings).assign_tree(&mut doc, &mut diags);

        // The descendant keeps its id, so the preamble gets a unique variant
        assert_eq!(doc.children[0].id.as_deref(), Some("about-2"));
        assert!(diags.is_empty());
    }

    #[test]
    fn test_untitled_preamble_gets_synthetic_id_quietly() {
        let settings = settings();
        let mut doc =
            Node::document("Book").with_child(Node::preamble().with_child(Node::paragraph("hi")));
        let mut diags = Diagnostics::new();

        IdAssigner::new(&settings).assign_tree(&mut doc, &mut diags);

        assert_eq!(doc.children[0].id.as_deref(), Some("preamble-1"));
        assert!(diags.is_empty());
    }

    #[test]
    fn test_reserved_id_is_reported_not_renamed() {
        let settings = settings();
        let section = Node::section(1, "Navigation")
            .with_id("nav")
            .with_role(SectionRole::Appendix);
        let mut diags = Diagnostics::new();

        let id = IdAssigner::new(&settings).assign(&section, &mut diags);

        assert_eq!(id, "nav");
        assert_eq!(diags.with_code("ID001").count(), 1);
        assert!(!diags.has_errors());
    }

    #[test]
    fn test_generated_ids_skip_reserved_names() {
        let settings = settings();
        let mut doc = Node::document("Book")
            .with_child(Node::section(1, "Nav"))
            .with_child(Node::section(1, "TOC"));
        let mut diags = Diagnostics::new();

        IdAssigner::new(&settings).assign_tree(&mut doc, &mut diags);

        assert_eq!(doc.children[0].id.as_deref(), Some("nav-2"));
        assert_eq!(doc.children[1].id.as_deref(), Some("toc-2"));
        assert_eq!(diags.with_code("ID001").count(), 0);
    }

    #[test]
    fn test_generated_chapter_id_is_not_reported_as_reserved() {
        let settings = settings();
        let mut assigner = IdAssigner::new(&settings);
        let mut diags = Diagnostics::new();

        let id = assigner.assign(&Node::section(1, "Cover"), &mut diags);

        assert_eq!(id, "cover-2");
        assert!(diags.is_empty());
    }

    #[test]
    fn test_decode_char_refs() {
        assert_eq!(decode_char_refs("caf&#233; &#x263A;"), "café ☺");
        assert_eq!(decode_char_refs("a &amp; b &bogus;"), "a & b &bogus;");
    }

    #[test]
    fn test_strip_tags() {
        assert_eq!(strip_tags("<b>Bold</b>   title\n"), "Bold title");
    }

    proptest! {
        #[test]
        fn prop_generated_section_ids_are_unique(titles in proptest::collection::vec("[a-zA-Z0-9 ?.-]{0,12}", 1..20)) {
            let settings = IdSettings::default();
            let mut doc = Node::document("Book");
            for title in &titles {
                doc.push(Node::section(1, title.clone()));
            }
            let mut diags = Diagnostics::new();
            IdAssigner::new(&settings).assign_tree(&mut doc, &mut diags);

            let mut seen = HashSet::new();
            for section in &doc.children {
                let id = section.id.clone().unwrap();
                prop_assert!(!id.is_empty());
                prop_assert!(seen.insert(id));
            }
        }
    }
}
