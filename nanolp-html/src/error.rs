//! Error types for document publishing

use nanolp_refs::RefsError;
use std::fmt;
use std::path::PathBuf;

/// Errors that can occur while publishing a document
#[derive(Debug)]
pub enum PublishError {
    /// Reading or writing a file failed
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    /// The rewritten DOM could not be serialized
    SerializationError(String),
    /// The document already carries the generator mark of a previous run
    AlreadyProcessed,
    /// A chunk source lies outside the output directory and no URL can reach it
    UnreachableSource(PathBuf),
    /// The resolution config is unusable
    Refs(RefsError),
}

impl fmt::Display for PublishError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PublishError::Io { path, source } => {
                write!(f, "I/O error on '{}': {}", path.display(), source)
            }
            PublishError::SerializationError(msg) => write!(f, "Serialization error: {}", msg),
            PublishError::AlreadyProcessed => {
                write!(f, "This document is already processed")
            }
            PublishError::UnreachableSource(path) => write!(
                f,
                "Can not generate URL for '{}': it is outside the output directory",
                path.display()
            ),
            PublishError::Refs(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for PublishError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PublishError::Io { source, .. } => Some(source),
            PublishError::Refs(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RefsError> for PublishError {
    fn from(err: RefsError) -> Self {
        PublishError::Refs(err)
    }
}
