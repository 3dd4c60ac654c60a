use thiserror::Error;

use crate::path::NodePath;

/// Errors surfaced by the document and edit layers.
#[derive(Debug, Error)]
pub enum Error {
    /// Input text is not valid JSON. Terminal for the current render pass
    /// only; the previously rendered document stays intact.
    #[error("parse error: {0}")]
    Parse(String),

    /// A path does not resolve against the current document. Callers clear
    /// the stale selection or abort the operation; never fatal.
    #[error("path not found: {0}")]
    PathNotFound(NodePath),

    /// A user-entered replacement value could not be interpreted. The
    /// document is left unchanged.
    #[error("invalid value: {0}")]
    InvalidValue(String),

    /// A path string could not be parsed into steps.
    #[error("invalid path: {0}")]
    InvalidPath(String),
}

pub type Result<T> = std::result::Result<T, Error>;
