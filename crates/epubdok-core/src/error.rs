//! Error types for conversion

use thiserror::Error;

/// Fatal conversion errors
///
/// Problems in user content are reported as diagnostics instead; these
/// variants mean the conversion itself could not complete.
#[derive(Error, Debug)]
pub enum ConvertError {
    /// The partitioner produced no chapter for a document with content
    #[error("Chapter partition produced no chapters for a non-empty document")]
    EmptyPartition,

    /// The conversion root is not a document node
    #[error("Conversion root must be a document node, found {0}")]
    NotADocument(String),

    /// Writing markup failed
    #[error("Markup serialization error: {0}")]
    Markup(String),

    /// Configuration file could not be parsed
    #[error("Configuration error: {0}")]
    Config(#[from] toml::de::Error),

    /// Error reading or writing files
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for conversion operations
pub type Result<T> = std::result::Result<T, ConvertError>;
