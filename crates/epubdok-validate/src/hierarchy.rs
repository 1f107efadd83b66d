//! Section hierarchy validator
//!
//! This module validates that sections nest without skipping levels
//! (e.g., a level 4 section directly inside a level 2 section).

use epubdok_ast::{Node, NodeKind};
use epubdok_core::diagnostics::{Diagnostic, Location};

use crate::Validator;

/// Validates section nesting
///
/// This validator checks that:
/// - A section is at most one level deeper than its parent section
/// - Top-level sections don't start too deep (should typically be level 1)
///
/// # Diagnostic Codes
///
/// - `DOC101`: Section level jump detected
///
/// # Example
///
/// ```
/// use epubdok_validate::{Validator, SectionHierarchyValidator};
/// use epubdok_ast::Node;
///
/// let validator = SectionHierarchyValidator;
///
/// let doc = Node::document("Book")
///     .with_child(Node::section(1, "Chapter").with_child(Node::section(2, "Section")));
///
/// assert!(validator.validate(&doc).is_empty());
/// ```
pub struct SectionHierarchyValidator;

impl Validator for SectionHierarchyValidator {
    fn code(&self) -> &'static str {
        "DOC1"
    }

    fn name(&self) -> &'static str {
        "section-hierarchy"
    }

    fn validate(&self, doc: &Node) -> Vec<Diagnostic> {
        let mut diagnostics = Vec::new();
        check_children(doc, 0, &mut diagnostics);
        diagnostics
    }
}

fn check_children(parent: &Node, parent_level: u8, diagnostics: &mut Vec<Diagnostic>) {
    for child in &parent.children {
        let level = match child.kind {
            NodeKind::Section { .. } => child.level,
            // Preambles and blocks don't change the section depth
            NodeKind::Preamble | NodeKind::Block(_) => {
                check_children(child, parent_level, diagnostics);
                continue;
            }
            NodeKind::Document | NodeKind::Inline(_) => continue,
        };

        if level > parent_level.saturating_add(1) {
            let message = if parent_level == 0 {
                format!(
                    "Document starts at section level {} (expected level 1). \
                     Consider starting with a level 1 section.",
                    level
                )
            } else {
                format!(
                    "Section level jump detected (Level {} -> Level {}). \
                     Missing Level {}?",
                    parent_level,
                    level,
                    parent_level + 1
                )
            };

            let title = child.title.as_deref().unwrap_or("<untitled>");
            let mut diagnostic = Diagnostic::warning(message)
                .with_code("DOC101")
                .with_help(
                    "Section hierarchy should not skip levels. \
                     Add intermediate section(s) or adjust the level.",
                )
                .with_note(format!("Found at section '{}'", title));
            if let Some(id) = &child.id {
                diagnostic = diagnostic.with_location(Location::node(id.clone()));
            }
            diagnostics.push(diagnostic);
        }

        check_children(child, level, diagnostics);
    }
}
