//! Publishing a document
//!
//! Parse, refuse documents already marked as processed, link, mark, serialize, then write to a
//! file or hand the text back.

use crate::dom::{
    append_child, attribute, create_element, create_text, find_element, find_elements, parse_html,
    serialize_html,
};
use crate::error::PublishError;
use crate::walker::{DocumentWalker, LinkReport};
use markup5ever_rcdom::{Handle, RcDom};
use nanolp_refs::{ReferenceMatcher, ResolveConfig};
use std::fs;
use std::path::{Path, PathBuf};

/// Content of the generator meta marking processed documents.
pub const GENERATOR: &str = "nanolp-pub";

/// File name of the default stylesheet.
pub const STYLESHEET_NAME: &str = "nanolp-pub.css";

const DEFAULT_STYLESHEET: &str = include_str!("../css/nanolp-pub.css");

#[derive(Debug)]
pub struct PublishSpec<'a> {
    pub source: &'a str,
    pub config: &'a ResolveConfig,
    pub output: Option<PathBuf>,
    pub stylesheet: Option<String>,
    pub force: bool,
}

impl<'a> PublishSpec<'a> {
    pub fn new(source: &'a str, config: &'a ResolveConfig) -> Self {
        Self {
            source,
            config,
            output: None,
            stylesheet: None,
            force: false,
        }
    }

    pub fn with_output_path(mut self, path: impl AsRef<Path>) -> Self {
        self.output = Some(path.as_ref().to_path_buf());
        self
    }

    /// Link a stylesheet from `<head>`. An empty href links nothing.
    pub fn with_stylesheet(mut self, href: impl Into<String>) -> Self {
        let href = href.into();
        self.stylesheet = (!href.is_empty()).then_some(href);
        self
    }

    /// Process documents that already carry the generator meta.
    pub fn force(mut self, force: bool) -> Self {
        self.force = force;
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PublishArtifact {
    InMemory(String),
    File(PathBuf),
}

#[derive(Debug, Clone, PartialEq)]
pub struct PublishResult {
    pub artifact: PublishArtifact,
    pub report: LinkReport,
}

pub fn publish(spec: PublishSpec<'_>) -> Result<PublishResult, PublishError> {
    let matcher = ReferenceMatcher::new(spec.config)?;
    let dom = parse_html(spec.source);

    if is_processed(&dom) {
        if !spec.force {
            return Err(PublishError::AlreadyProcessed);
        }
        tracing::warn!("document was already processed, linking it again");
    }

    let report = DocumentWalker::new(&matcher).link(&dom.document);
    mark_processed(&dom, spec.stylesheet.as_deref());

    let text = serialize_html(&dom)?;
    let artifact = write_or_return_text(text, spec.output)?;
    Ok(PublishResult { artifact, report })
}

/// Read an input document.
pub fn read_source(path: &Path) -> Result<String, PublishError> {
    fs::read_to_string(path).map_err(|source| PublishError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Write the default stylesheet into `dir` unless a file of that name is already there.
///
/// Returns the path written, if any.
pub fn write_default_stylesheet(dir: &Path) -> Result<Option<PathBuf>, PublishError> {
    let path = dir.join(STYLESHEET_NAME);
    if path.exists() {
        tracing::debug!(path = %path.display(), "stylesheet exists, leaving it alone");
        return Ok(None);
    }
    write_to_path(path, DEFAULT_STYLESHEET).map(Some)
}

/// Whether `<head>` carries the generator meta.
pub fn is_processed(dom: &RcDom) -> bool {
    find_elements(&dom.document, "meta").iter().any(|meta| {
        attribute(meta, "name").as_deref() == Some("generator")
            && attribute(meta, "content").as_deref() == Some(GENERATOR)
    })
}

fn mark_processed(dom: &RcDom, stylesheet: Option<&str>) {
    let Some(head) = find_element(&dom.document, "head") else {
        tracing::warn!("document has no head, it will not be marked as processed");
        return;
    };

    if !is_processed(dom) {
        append_head(
            &head,
            create_element("meta", vec![("name", "generator"), ("content", GENERATOR)]),
        );
    }

    if let Some(href) = stylesheet {
        let linked = find_elements(&head, "link")
            .iter()
            .any(|link| attribute(link, "href").as_deref() == Some(href));
        if !linked {
            append_head(
                &head,
                create_element(
                    "link",
                    vec![("rel", "stylesheet"), ("type", "text/css"), ("href", href)],
                ),
            );
        }
    }
}

/// Append to `<head>`, keeping the line break that precedes `</head>` last.
fn append_head(head: &Handle, node: Handle) {
    append_child(head, node);
    append_child(head, create_text("\n"));
}

fn write_or_return_text(
    text: String,
    output: Option<PathBuf>,
) -> Result<PublishArtifact, PublishError> {
    match output {
        Some(path) => write_to_path(path, &text).map(PublishArtifact::File),
        None => Ok(PublishArtifact::InMemory(text)),
    }
}

fn write_to_path(path: PathBuf, text: &str) -> Result<PathBuf, PublishError> {
    match fs::write(&path, text) {
        Ok(()) => Ok(path),
        Err(source) => Err(PublishError::Io { path, source }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    const SAMPLE: &str =
        "<!DOCTYPE html><html><head></head><body><p>&lt;&lt;main&gt;&gt;</p></body></html>";

    fn in_memory(result: PublishResult) -> String {
        match result.artifact {
            PublishArtifact::InMemory(content) => content,
            PublishArtifact::File(_) => panic!("expected in-memory artifact"),
        }
    }

    #[test]
    fn publishes_to_memory_when_no_output_path() {
        let config = ResolveConfig::default();
        let result = publish(PublishSpec::new(SAMPLE, &config)).expect("publish");
        assert_eq!(result.report.definitions, 1);
        let content = in_memory(result);
        assert!(content.contains(r#"<a name="main">"#));
        assert!(content.contains(r#"<meta name="generator" content="nanolp-pub">"#));
    }

    #[test]
    fn writes_to_disk_when_output_path_provided() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("output.html");
        let config = ResolveConfig::default();
        let result =
            publish(PublishSpec::new(SAMPLE, &config).with_output_path(&path)).expect("publish");
        match result.artifact {
            PublishArtifact::File(p) => assert_eq!(p, path),
            PublishArtifact::InMemory(_) => panic!("expected file artifact"),
        }
        let contents = fs::read_to_string(path).unwrap();
        assert!(contents.contains(r#"<span class="lpdefine">(main)</span>"#));
    }

    #[test]
    fn refuses_processed_documents_unless_forced() {
        let config = ResolveConfig::default();
        let once = in_memory(publish(PublishSpec::new(SAMPLE, &config)).unwrap());

        let err = publish(PublishSpec::new(&once, &config)).unwrap_err();
        assert!(matches!(err, PublishError::AlreadyProcessed));

        let twice = in_memory(publish(PublishSpec::new(&once, &config).force(true)).unwrap());
        assert_eq!(twice, once);
    }

    #[test]
    fn links_stylesheet_once() {
        let config = ResolveConfig::default();
        let spec = PublishSpec::new(SAMPLE, &config).with_stylesheet("nanolp-pub.css");
        let once = in_memory(publish(spec).unwrap());

        let spec = PublishSpec::new(&once, &config)
            .with_stylesheet("nanolp-pub.css")
            .force(true);
        let twice = in_memory(publish(spec).unwrap());

        assert_eq!(twice.matches("nanolp-pub.css").count(), 1);
        assert!(twice.contains(
            r#"<link rel="stylesheet" type="text/css" href="nanolp-pub.css">"#
        ));
    }

    #[test]
    fn empty_stylesheet_links_nothing() {
        let config = ResolveConfig::default();
        let spec = PublishSpec::new(SAMPLE, &config).with_stylesheet("");
        assert!(!in_memory(publish(spec).unwrap()).contains("<link"));
    }

    #[test]
    fn writes_default_stylesheet_only_when_missing() {
        let dir = tempdir().unwrap();
        let written = write_default_stylesheet(dir.path()).unwrap();
        assert_eq!(written, Some(dir.path().join(STYLESHEET_NAME)));

        fs::write(dir.path().join(STYLESHEET_NAME), "/* mine */").unwrap();
        assert_eq!(write_default_stylesheet(dir.path()).unwrap(), None);
        let kept = fs::read_to_string(dir.path().join(STYLESHEET_NAME)).unwrap();
        assert_eq!(kept, "/* mine */");
    }

    #[test]
    fn read_source_reports_the_path() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("missing.html");
        let err = read_source(&missing).unwrap_err();
        assert!(err.to_string().contains("missing.html"));
    }
}
