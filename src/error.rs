//! Error types for the scoretally library

use std::io;
use std::path::PathBuf;

/// Library error type for scoretally operations
#[derive(Debug, thiserror::Error)]
pub enum ScoreError {
    /// The score file does not exist
    #[error("file not found: {0:?}")]
    FileNotFound(PathBuf),

    /// The score bytes could not be decoded to text
    #[error("invalid encoding: {0}")]
    InvalidEncoding(String),

    /// The text is not a well-formed XML document
    #[error("malformed document: {0}")]
    MalformedDocument(String),

    /// The document is well-formed but holds no `<measure>` element
    #[error("no measures found in document")]
    NoMeasuresFound,

    /// A caller-supplied note duration label is not known
    #[error("unknown note duration: {0}")]
    UnknownNoteDuration(String),

    /// Configuration error
    #[error("configuration error: {0}")]
    ConfigError(String),

    /// I/O error
    #[error("I/O error: {0}")]
    IoError(String),
}

impl From<io::Error> for ScoreError {
    fn from(error: io::Error) -> Self {
        Self::IoError(error.to_string())
    }
}

impl From<quick_xml::Error> for ScoreError {
    fn from(error: quick_xml::Error) -> Self {
        Self::MalformedDocument(error.to_string())
    }
}

impl From<quick_xml::events::attributes::AttrError> for ScoreError {
    fn from(error: quick_xml::events::attributes::AttrError) -> Self {
        Self::MalformedDocument(error.to_string())
    }
}

impl From<roxmltree::Error> for ScoreError {
    fn from(error: roxmltree::Error) -> Self {
        Self::MalformedDocument(error.to_string())
    }
}
