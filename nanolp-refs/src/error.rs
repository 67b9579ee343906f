//! Configuration errors for reference resolution

use std::fmt;

/// Errors raised while building a resolver configuration.
///
/// Marker-level problems never surface here, see the crate docs.
#[derive(Debug, Clone)]
pub enum RefsError {
    /// A marker delimiter was empty; carries which side ("left" or "right").
    EmptyDelimiter(&'static str),
    /// The marker regex could not be built from the delimiters.
    InvalidMarker(regex::Error),
    /// The command map was not a JSON object of strings.
    InvalidCommandMap(String),
}

impl fmt::Display for RefsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RefsError::EmptyDelimiter(side) => write!(f, "The {} delimiter is empty", side),
            RefsError::InvalidMarker(err) => write!(f, "Invalid marker delimiters: {}", err),
            RefsError::InvalidCommandMap(msg) => write!(f, "Invalid command map: {}", msg),
        }
    }
}

impl std::error::Error for RefsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RefsError::InvalidMarker(err) => Some(err),
            _ => None,
        }
    }
}

impl From<regex::Error> for RefsError {
    fn from(err: regex::Error) -> Self {
        RefsError::InvalidMarker(err)
    }
}
