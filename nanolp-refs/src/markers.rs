//! Marker syntax
//!
//! With the default delimiters the two marker shapes are:
//!
//! ```text
//! <<name>>            definition of chunk `name`
//! <<name,note>>       definition with an annotation
//! <<=name>>           paste of chunk `name`
//! <<=name.*,note>>    paste of every chunk matching `name.*`
//! ```
//!
//! A definition name can't contain `=` and a paste always starts with one, so the two regexes
//! never match the same text. The annotation is everything from the first `,` to the right
//! delimiter, comma included.

use crate::config::Delimiters;
use crate::error::RefsError;
use crate::glob;
use regex::{Captures, Regex};

/// The two marker regexes for one pair of delimiters.
#[derive(Debug, Clone)]
pub struct Markers {
    definition: Regex,
    paste: Regex,
}

impl Markers {
    pub fn new(delimiters: &Delimiters) -> Result<Self, RefsError> {
        if delimiters.left.is_empty() {
            return Err(RefsError::EmptyDelimiter("left"));
        }
        if delimiters.right.is_empty() {
            return Err(RefsError::EmptyDelimiter("right"));
        }

        let left = regex::escape(&delimiters.left);
        let right = regex::escape(&delimiters.right);

        Ok(Self {
            definition: Regex::new(&format!("{left}([^=]+?)(,.*?)?{right}"))?,
            paste: Regex::new(&format!("{left}=(.+?)(,.*?)?{right}"))?,
        })
    }

    pub fn definition(&self) -> &Regex {
        &self.definition
    }

    pub fn paste(&self) -> &Regex {
        &self.paste
    }
}

/// A matched definition marker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefinitionMarker {
    pub name: String,
    pub annotation: Option<String>,
}

impl DefinitionMarker {
    pub(crate) fn from_captures(caps: &Captures<'_>) -> Self {
        Self {
            name: caps[1].to_string(),
            annotation: caps.get(2).map(|m| m.as_str().to_string()),
        }
    }

    /// Visible text of the definition, `(name,note)`.
    pub fn label(&self) -> String {
        format!("({}{})", self.name, self.annotation.as_deref().unwrap_or(""))
    }
}

/// A matched paste marker, classified once when it is read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PasteMarker {
    Exact {
        name: String,
        annotation: Option<String>,
    },
    Wildcard {
        pattern: String,
        annotation: Option<String>,
    },
}

impl PasteMarker {
    /// Classify the text of a paste marker by the presence of wildcard syntax.
    pub fn parse(text: &str, annotation: Option<&str>) -> Self {
        let annotation = annotation.map(str::to_string);
        if glob::is_wildcard(text) {
            PasteMarker::Wildcard {
                pattern: text.to_string(),
                annotation,
            }
        } else {
            PasteMarker::Exact {
                name: text.to_string(),
                annotation,
            }
        }
    }

    pub(crate) fn from_captures(caps: &Captures<'_>) -> Self {
        Self::parse(&caps[1], caps.get(2).map(|m| m.as_str()))
    }

    /// The chunk name or pattern as written.
    pub fn text(&self) -> &str {
        match self {
            PasteMarker::Exact { name, .. } => name,
            PasteMarker::Wildcard { pattern, .. } => pattern,
        }
    }

    pub fn annotation(&self) -> Option<&str> {
        match self {
            PasteMarker::Exact { annotation, .. } | PasteMarker::Wildcard { annotation, .. } => {
                annotation.as_deref()
            }
        }
    }

    /// Visible text of the paste, `=text,note`.
    pub fn label(&self) -> String {
        format!("={}{}", self.text(), self.annotation().unwrap_or(""))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn markers() -> Markers {
        Markers::new(&Delimiters::default()).unwrap()
    }

    #[test]
    fn test_definition_captures() {
        let m = markers();
        let caps = m.definition().captures("x <<foo,first>> y").unwrap();
        let def = DefinitionMarker::from_captures(&caps);
        assert_eq!(def.name, "foo");
        assert_eq!(def.annotation.as_deref(), Some(",first"));
        assert_eq!(def.label(), "(foo,first)");
    }

    #[test]
    fn test_definition_does_not_match_paste() {
        let m = markers();
        assert!(!m.definition().is_match("<<=foo>>"));
        assert!(!m.definition().is_match("<<a=b>>"));
    }

    #[test]
    fn test_paste_does_not_match_definition() {
        assert!(!markers().paste().is_match("<<foo>>"));
    }

    #[test]
    fn test_non_greedy_markers() {
        let m = markers();
        let names: Vec<_> = m
            .definition()
            .captures_iter("<<a>> and <<b,x>>")
            .map(|c| c[1].to_string())
            .collect();
        assert_eq!(names, vec!["a", "b"]);
    }

    #[test]
    fn test_custom_delimiters_are_literal() {
        let m = Markers::new(&Delimiters::new("[[", "]]")).unwrap();
        let caps = m.paste().captures("see [[=a.*]]").unwrap();
        assert_eq!(&caps[1], "a.*");
        assert!(!m.definition().is_match("<<a>>"));
    }

    #[test]
    fn test_empty_delimiters_are_rejected() {
        assert!(matches!(
            Markers::new(&Delimiters::new("", ">>")),
            Err(RefsError::EmptyDelimiter("left"))
        ));
        assert!(matches!(
            Markers::new(&Delimiters::new("<<", "")),
            Err(RefsError::EmptyDelimiter("right"))
        ));
    }

    #[test]
    fn test_paste_classification() {
        assert!(matches!(
            PasteMarker::parse("foo", None),
            PasteMarker::Exact { .. }
        ));
        assert!(matches!(
            PasteMarker::parse("foo.*", None),
            PasteMarker::Wildcard { .. }
        ));
        assert!(matches!(
            PasteMarker::parse("foo.[01]", None),
            PasteMarker::Wildcard { .. }
        ));
        assert_eq!(PasteMarker::parse("f?", Some(",n")).label(), "=f?,n");
    }
}
