//! Duplicate id validator
//!
//! Explicit ids must be unique across the whole document, since a
//! reference may point at any of them from any chapter.

use std::collections::HashMap;

use epubdok_ast::Node;
use epubdok_core::diagnostics::{Diagnostic, Location};

use crate::Validator;

/// Reports explicit ids used by more than one node
///
/// # Diagnostic Codes
///
/// - `DOC102`: Duplicate id
pub struct DuplicateIdValidator;

impl Validator for DuplicateIdValidator {
    fn code(&self) -> &'static str {
        "DOC1"
    }

    fn name(&self) -> &'static str {
        "duplicate-ids"
    }

    fn validate(&self, doc: &Node) -> Vec<Diagnostic> {
        let mut counts: HashMap<&str, usize> = HashMap::new();
        let mut order = Vec::new();

        doc.walk(&mut |node| {
            if let Some(id) = node.id.as_deref() {
                let count = counts.entry(id).or_insert(0);
                if *count == 0 {
                    order.push(id);
                }
                *count += 1;
            }
        });

        order
            .into_iter()
            .filter_map(|id| {
                let count = counts[id];
                (count > 1).then(|| {
                    Diagnostic::warning(format!("Id '{}' is used {} times", id, count))
                        .with_code("DOC102")
                        .with_location(Location::node(id))
                        .with_help("Only the first occurrence can be referenced; rename the others.")
                })
            })
            .collect()
    }
}
