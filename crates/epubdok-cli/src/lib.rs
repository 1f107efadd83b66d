//! epubdok CLI - Command-line interface library
//!
//! This library provides the CLI functionality for epubdok:
//! - Convert: Split a document tree into EPUB chapter and navigation files
//! - Check: Validate a document tree and report conversion diagnostics
//!
//! Input documents are parsed trees serialized as JSON.
//!
//! # Library Usage
//!
//! ```ignore
//! use epubdok_cli::{convert_command, ConvertOptions, OutputFormat};
//!
//! let report = convert_command(&input, &ConvertOptions::new("out"))?;
//! println!("{} chapters", report.chapters.len());
//! ```
//!
//! # Binary Usage
//!
//! ```bash
//! # Write chapter files, nav.xhtml and toc.ncx into book/
//! epubdok convert book.json --output book/
//!
//! # Split on level 2 sections as well
//! epubdok convert book.json --chapter-level 2
//!
//! # Check a document for issues
//! epubdok check book.json --format json
//! ```

pub mod app;

// Re-export main entry point and types
pub use app::{check_command, convert_command, load_config, load_document};
pub use app::{run_cli, CheckReport, ConvertOptions, ConvertReport, OutputFormat};
