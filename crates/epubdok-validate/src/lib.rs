//! epubdok-validate - Document tree validation
//!
//! This crate provides a pluggable validation engine that checks a parsed
//! document tree before it is converted.
//!
//! # Architecture
//!
//! Individual validators implement the `Validator` trait. The
//! `ValidationEngine` runs all registered validators and collects their
//! diagnostics.
//!
//! # Example
//!
//! ```
//! use epubdok_validate::{ValidationEngine, SectionHierarchyValidator};
//! use epubdok_ast::Node;
//!
//! let mut engine = ValidationEngine::new();
//! engine.add_validator(Box::new(SectionHierarchyValidator));
//!
//! let doc = Node::document("Book");
//! let diagnostics = engine.validate(&doc);
//! assert!(diagnostics.is_empty());
//! ```

pub mod duplicate_ids;
pub mod hierarchy;

use epubdok_ast::Node;
use epubdok_core::diagnostics::Diagnostic;

// Re-export validators
pub use duplicate_ids::DuplicateIdValidator;
pub use hierarchy::SectionHierarchyValidator;

/// Trait for document validators
///
/// Validators inspect a document tree and return a list of diagnostics
/// for any issues found. Each validator has a unique code prefix
/// for its diagnostics.
pub trait Validator: Send + Sync {
    /// Get the validator's unique code (e.g., "DOC1" for document structure)
    fn code(&self) -> &'static str;

    /// Get a human-readable name for this validator
    fn name(&self) -> &'static str {
        "unnamed"
    }

    /// Validate the document and return any diagnostics
    fn validate(&self, doc: &Node) -> Vec<Diagnostic>;
}

/// Validation engine that orchestrates multiple validators
pub struct ValidationEngine {
    /// Registered validators
    validators: Vec<Box<dyn Validator>>,
}

impl Default for ValidationEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl ValidationEngine {
    /// Create a new empty validation engine
    pub fn new() -> Self {
        Self {
            validators: Vec::new(),
        }
    }

    /// Create an engine with default validators
    pub fn with_defaults() -> Self {
        let mut engine = Self::new();
        engine.add_validator(Box::new(SectionHierarchyValidator));
        engine.add_validator(Box::new(DuplicateIdValidator));
        engine
    }

    /// Add a validator to the engine
    pub fn add_validator(&mut self, validator: Box<dyn Validator>) {
        self.validators.push(validator);
    }

    /// Get the number of registered validators
    pub fn validator_count(&self) -> usize {
        self.validators.len()
    }

    /// Get the names of all registered validators
    pub fn validator_names(&self) -> Vec<&'static str> {
        self.validators.iter().map(|v| v.name()).collect()
    }

    /// Validate a document using all registered validators
    pub fn validate(&self, doc: &Node) -> Vec<Diagnostic> {
        let mut diagnostics = Vec::new();

        for validator in &self.validators {
            let found = validator.validate(doc);
            tracing::debug!(
                validator = validator.name(),
                issues = found.len(),
                "validator finished"
            );
            diagnostics.extend(found);
        }

        diagnostics
    }

    /// Check if a document has any errors
    pub fn has_errors(&self, doc: &Node) -> bool {
        self.validate(doc).iter().any(|d| d.is_error())
    }

    /// Check if a document has any warnings or errors
    pub fn has_issues(&self, doc: &Node) -> bool {
        !self.validate(doc).is_empty()
    }
}

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
