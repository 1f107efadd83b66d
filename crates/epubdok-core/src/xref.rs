//! Cross reference resolution
//!
//! Turns the raw target of an xref into a link that works from the chapter
//! file it is rendered in. Lookups go through the [`DocumentIndex`] built
//! by the partitioner; the only mutable state is the per-chapter set of
//! targets that already received an `id` attribute.
//!
//! [`DocumentIndex`]: crate::partition::DocumentIndex

use std::collections::HashSet;

use crate::diagnostics::{Diagnostic, Diagnostics, Location};
use crate::ids::strip_tags;
use crate::partition::{ChapterRecord, IndexEntry, Partition};

/// File extensions accepted on the chapter part of a qualified target
const CHAPTER_EXTENSIONS: &[&str] = &[".adoc", ".asciidoc", ".xhtml", ".html"];

/// Parsed form of an xref target
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReferenceTarget {
    /// Bare anchor, looked up across the whole document
    Local { anchor: String },
    /// Explicit `chapter#anchor` form
    Qualified { chapter: String, anchor: String },
    /// Empty target or a chapter with no anchor (`chapter#`)
    Malformed { raw: String },
}

impl ReferenceTarget {
    /// Parse a raw target expression
    ///
    /// ```
    /// use epubdok_core::xref::ReferenceTarget;
    ///
    /// assert_eq!(
    ///     ReferenceTarget::parse("chapter-b#setup"),
    ///     ReferenceTarget::Qualified { chapter: "chapter-b".into(), anchor: "setup".into() }
    /// );
    /// assert_eq!(
    ///     ReferenceTarget::parse("#setup"),
    ///     ReferenceTarget::Local { anchor: "setup".into() }
    /// );
    /// ```
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        let malformed = || ReferenceTarget::Malformed {
            raw: raw.to_string(),
        };

        match trimmed.split_once('#') {
            None if trimmed.is_empty() => malformed(),
            None => ReferenceTarget::Local {
                anchor: trimmed.to_string(),
            },
            Some((_, anchor)) if anchor.trim().is_empty() => malformed(),
            Some((chapter, anchor)) if chapter.trim().is_empty() => ReferenceTarget::Local {
                anchor: anchor.trim().to_string(),
            },
            Some((chapter, anchor)) => {
                let chapter = chapter.trim();
                let chapter = CHAPTER_EXTENSIONS
                    .iter()
                    .find_map(|ext| chapter.strip_suffix(ext))
                    .unwrap_or(chapter);
                ReferenceTarget::Qualified {
                    chapter: chapter.to_string(),
                    anchor: anchor.trim().to_string(),
                }
            }
        }
    }

    /// Anchor part, or the raw text for a malformed target
    pub fn anchor(&self) -> &str {
        match self {
            ReferenceTarget::Local { anchor } | ReferenceTarget::Qualified { anchor, .. } => {
                anchor
            }
            ReferenceTarget::Malformed { raw } => raw.trim().trim_end_matches('#'),
        }
    }
}

/// How a link was resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// Target lives in the chapter being rendered
    SameChapter,
    /// Target lives in another chapter file
    CrossChapter,
    /// Target could not be found; the link is a visible placeholder
    Unresolved,
}

/// A link ready to be written into a chapter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedLink {
    /// Link target relative to the current chapter file
    pub href: String,
    /// Id for the link element, only on the first reference to a target
    pub id_attr: Option<String>,
    /// Display text
    pub text: String,
    /// Resolution outcome
    pub resolution: Resolution,
}

impl ResolvedLink {
    /// Check if the target could not be found
    pub fn is_unresolved(&self) -> bool {
        self.resolution == Resolution::Unresolved
    }
}

/// Resolves xref targets against the partitioned document
pub struct XrefResolver<'p, 'a> {
    partition: &'p Partition<'a>,
    current: Option<usize>,
    /// Targets that already received an id attribute in the current chapter
    seen: HashSet<String>,
}

impl<'p, 'a> XrefResolver<'p, 'a> {
    /// Create a resolver over a partition
    pub fn new(partition: &'p Partition<'a>) -> Self {
        Self {
            partition,
            current: None,
            seen: HashSet::new(),
        }
    }

    /// Start rendering a new chapter
    pub fn begin_chapter(&mut self, chapter: &ChapterRecord<'_>) {
        self.current = Some(chapter.ordinal);
        self.seen.clear();
    }

    /// Resolve a target as seen from `chapter`
    ///
    /// Calls must follow the document order of the chapter's content: the
    /// first reference to a target gets the id attribute.
    pub fn resolve(
        &mut self,
        chapter: &ChapterRecord<'_>,
        target: &str,
        text: Option<&str>,
        diagnostics: &mut Diagnostics,
    ) -> ResolvedLink {
        if self.current != Some(chapter.ordinal) {
            self.begin_chapter(chapter);
        }
        let partition = self.partition;

        match ReferenceTarget::parse(target) {
            ReferenceTarget::Malformed { raw } => {
                diagnostics.push(
                    Diagnostic::warning(format!("malformed cross reference '{}'", raw))
                        .with_code("XREF003")
                        .with_location(Location::chapter(&chapter.filename).with_node(raw.clone()))
                        .with_help("Use 'anchor' or 'chapter#anchor'"),
                );
                let anchor = ReferenceTarget::Malformed { raw }.anchor().to_string();
                placeholder(&anchor, text)
            }
            ReferenceTarget::Qualified {
                chapter: target_chapter,
                anchor,
            } => {
                let Some(record) = partition.chapter_by_id(&target_chapter) else {
                    diagnostics.push(
                        Diagnostic::warning(format!(
                            "cross reference '{}' names unknown chapter '{}'",
                            target, target_chapter
                        ))
                        .with_code("XREF002")
                        .with_location(
                            Location::chapter(&chapter.filename).with_node(target.to_string()),
                        ),
                    );
                    return placeholder(&anchor, text);
                };

                match self.lookup(&anchor) {
                    Some((id, entry)) if entry.chapter == record.ordinal => {
                        self.link(chapter, id, entry, text)
                    }
                    _ => {
                        diagnostics.push(
                            Diagnostic::warning(format!(
                                "cannot resolve cross reference to '{}' in chapter '{}'",
                                anchor, target_chapter
                            ))
                            .with_code("XREF001")
                            .with_location(
                                Location::chapter(&chapter.filename).with_node(target.to_string()),
                            )
                            .with_help("Check that the anchor is defined in the named chapter"),
                        );
                        placeholder(&anchor, text)
                    }
                }
            }
            ReferenceTarget::Local { anchor } => match self.lookup(&anchor) {
                Some((id, entry)) => self.link(chapter, id, entry, text),
                None => {
                    diagnostics.push(
                        Diagnostic::warning(format!(
                            "cannot resolve cross reference to '{}'",
                            target
                        ))
                        .with_code("XREF001")
                        .with_location(
                            Location::chapter(&chapter.filename).with_node(target.to_string()),
                        )
                        .with_help("Check that the target anchor exists"),
                    );
                    placeholder(&anchor, text)
                }
            },
        }
    }

    /// Find an anchor by id, then by reference text or title
    fn lookup(&self, anchor: &str) -> Option<(&'a str, IndexEntry<'a>)> {
        let index = &self.partition.index;
        index
            .get_key_value(anchor)
            .or_else(|| index.id_for_label(anchor).and_then(|id| index.get_key_value(id)))
    }

    fn link(
        &mut self,
        chapter: &ChapterRecord<'_>,
        id: &str,
        entry: IndexEntry<'a>,
        text: Option<&str>,
    ) -> ResolvedLink {
        let partition = self.partition;
        let Some(record) = partition.chapters.get(entry.chapter) else {
            return placeholder(id, text);
        };
        // An id naming a whole chapter file links to the file itself
        let anchor = if entry.chapter_root {
            record.id.as_str()
        } else {
            id
        };
        let display = self.display_text(id, text);

        if entry.chapter == chapter.ordinal {
            let id_attr = self
                .seen
                .insert(anchor.to_string())
                .then(|| format!("xref-{}", anchor));
            return ResolvedLink {
                href: format!("#{}", anchor),
                id_attr,
                text: display,
                resolution: Resolution::SameChapter,
            };
        }

        let (href, id_attr) = if entry.chapter_root {
            (record.filename.clone(), format!("xref--{}", record.id))
        } else {
            (
                format!("{}#{}", record.filename, anchor),
                format!("xref--{}--{}", record.id, anchor),
            )
        };
        let key = format!("{}#{}", record.id, anchor);
        let id_attr = self.seen.insert(key).then_some(id_attr);

        ResolvedLink {
            href,
            id_attr,
            text: display,
            resolution: Resolution::CrossChapter,
        }
    }

    fn display_text(&self, id: &str, text: Option<&str>) -> String {
        if let Some(text) = text {
            return text.to_string();
        }
        self.partition
            .index
            .get(id)
            .and_then(|entry| {
                entry
                    .node
                    .reftext
                    .as_deref()
                    .or(entry.node.title.as_deref())
            })
            .map(strip_tags)
            .filter(|label| !label.is_empty())
            .unwrap_or_else(|| format!("[{}]", id))
    }
}

fn placeholder(anchor: &str, text: Option<&str>) -> ResolvedLink {
    ResolvedLink {
        href: format!("#{}", anchor),
        id_attr: None,
        text: text
            .map(str::to_string)
            .unwrap_or_else(|| format!("[{}]", anchor)),
        resolution: Resolution::Unresolved,
    }
}
