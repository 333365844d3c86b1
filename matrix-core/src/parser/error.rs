// Parser error types
// Structured failures for the strategy-document translation layer

use std::io;
use thiserror::Error;

/// Errors surfaced while turning a strategy document into a typed
/// `MatrixDeclaration`. The resolution engine itself never fails; anything
/// that can go wrong happens here, before it runs.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("failed to read file: {0}")]
    Io(#[from] io::Error),

    /// YAML syntax or schema violation; the underlying error carries the
    /// source location where serde_yaml knows it
    #[error("invalid strategy document: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("dimension '{name}' declares no values")]
    EmptyDimension { name: String },
}

/// Result type for parser operations
pub type ParseResult<T> = Result<T, ParseError>;
