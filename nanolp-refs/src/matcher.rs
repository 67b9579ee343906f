//! The two substitution passes
//!
//! Every text blob of a document goes through the definitions pass first, then, once the whole
//! document has been scanned, through the pastes pass:
//!
//! ```text
//! <<foo,part one>>   →  <a name="foo"><span class="lpdefine">(foo,part one)</span></a>
//! <<=foo>>           →  <a href="#foo">=foo</a>
//! ```
//!
//! Input is decoded text, the content of a text node: `a & b <<x&y>>` names the chunk `x&y`.
//! A scan returns a [`Rewrite`]: the untouched stretches of the input as borrowed text and the
//! replacements as [`Markup`]. Rendering it gives HTML with every stretch escaped; a DOM adapter
//! can graft the segments as nodes instead. Generated markup never contains a marker, so
//! scanning rendered output finds nothing to replace.

use crate::config::ResolveConfig;
use crate::error::RefsError;
use crate::markers::{DefinitionMarker, Markers, PasteMarker};
use crate::markup::Markup;
use crate::resolver::LinkResolver;
use crate::symbols::SymbolTable;
use regex::{Captures, Regex};

/// One piece of a rewritten blob.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment<'t> {
    /// Input text outside any marker, unchanged.
    Text(&'t str),
    /// Replacement of one marker.
    Markup(Markup),
}

/// Result of scanning one blob.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rewrite<'t> {
    segments: Vec<Segment<'t>>,
    substitutions: usize,
}

impl<'t> Rewrite<'t> {
    /// Number of markers replaced.
    pub fn substitutions(&self) -> usize {
        self.substitutions
    }

    pub fn is_unchanged(&self) -> bool {
        self.substitutions == 0
    }

    pub fn segments(&self) -> &[Segment<'t>] {
        &self.segments
    }

    pub fn into_segments(self) -> Vec<Segment<'t>> {
        self.segments
    }

    /// The rewritten blob as HTML. Text between replacements is escaped like the text inside
    /// them.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Text(text) => out.push_str(&html_escape::encode_text(text)),
                Segment::Markup(markup) => markup.render_into(&mut out),
            }
        }
        out
    }
}

/// Marker scanner bound to one resolution config.
#[derive(Debug, Clone)]
pub struct ReferenceMatcher<'c> {
    config: &'c ResolveConfig,
    markers: Markers,
}

impl<'c> ReferenceMatcher<'c> {
    pub fn new(config: &'c ResolveConfig) -> Result<Self, RefsError> {
        Ok(Self {
            config,
            markers: Markers::new(&config.delimiters)?,
        })
    }

    pub fn config(&self) -> &'c ResolveConfig {
        self.config
    }

    /// Replace definition markers with anchors, recording the names when the policy needs them.
    pub fn scan_definitions<'t>(&self, text: &'t str, symbols: &mut SymbolTable) -> Rewrite<'t> {
        let collect = self.config.policy.collects_definitions();
        rewrite(self.markers.definition(), text, |caps| {
            let marker = DefinitionMarker::from_captures(caps);
            if collect {
                symbols.insert(&marker.name);
            }
            anchor(&marker)
        })
    }

    /// Replace paste markers with links.
    pub fn scan_pastes<'t>(&self, text: &'t str, symbols: &SymbolTable) -> Rewrite<'t> {
        let resolver = LinkResolver::new(&self.config.policy, symbols);
        rewrite(self.markers.paste(), text, |caps| {
            resolver.resolve(&PasteMarker::from_captures(caps))
        })
    }

    /// Decoded text in, HTML out: `&` and `<` are escaped inside and outside the anchors alike.
    pub fn substitute_definitions(&self, text: &str, symbols: &mut SymbolTable) -> String {
        self.scan_definitions(text, symbols).render()
    }

    /// Decoded text in, HTML out, like [`Self::substitute_definitions`]. Paste markers are
    /// looked for in the original text, not in the output of the definitions pass.
    pub fn substitute_pastes(&self, text: &str, symbols: &SymbolTable) -> String {
        self.scan_pastes(text, symbols).render()
    }
}

fn anchor(marker: &DefinitionMarker) -> Markup {
    Markup::element(
        "a",
        vec![("name", marker.name.clone())],
        vec![Markup::element(
            "span",
            vec![("class", "lpdefine".to_string())],
            vec![Markup::text(marker.label())],
        )],
    )
}

fn rewrite<'t>(
    re: &Regex,
    text: &'t str,
    mut replace: impl FnMut(&Captures<'t>) -> Markup,
) -> Rewrite<'t> {
    let mut segments = Vec::new();
    let mut substitutions = 0;
    let mut last = 0;

    for caps in re.captures_iter(text) {
        let Some(whole) = caps.get(0) else {
            continue;
        };
        if whole.start() > last {
            segments.push(Segment::Text(&text[last..whole.start()]));
        }
        segments.push(Segment::Markup(replace(&caps)));
        substitutions += 1;
        last = whole.end();
    }
    if last < text.len() || segments.is_empty() {
        segments.push(Segment::Text(&text[last..]));
    }

    Rewrite {
        segments,
        substitutions,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Delimiters;

    #[test]
    fn test_definition_markup() {
        let config = ResolveConfig::default();
        let matcher = ReferenceMatcher::new(&config).unwrap();
        let mut symbols = SymbolTable::new();

        let out = matcher.substitute_definitions("<<foo>>", &mut symbols);
        assert_eq!(out, r#"<a name="foo"><span class="lpdefine">(foo)</span></a>"#);
        assert_eq!(symbols.names().collect::<Vec<_>>(), vec!["foo"]);
    }

    #[test]
    fn test_definition_with_annotation() {
        let config = ResolveConfig::default();
        let matcher = ReferenceMatcher::new(&config).unwrap();
        let mut symbols = SymbolTable::new();

        let out = matcher.substitute_definitions("x <<foo,init>> y", &mut symbols);
        assert_eq!(
            out,
            r#"x <a name="foo"><span class="lpdefine">(foo,init)</span></a> y"#
        );
    }

    #[test]
    fn test_segments_keep_surrounding_text() {
        let config = ResolveConfig::default();
        let matcher = ReferenceMatcher::new(&config).unwrap();
        let mut symbols = SymbolTable::new();

        let rewrite = matcher.scan_definitions("a <<x>> b <<y>>", &mut symbols);
        assert_eq!(rewrite.substitutions(), 2);
        let texts: Vec<_> = rewrite
            .segments()
            .iter()
            .filter_map(|s| match s {
                Segment::Text(t) => Some(*t),
                Segment::Markup(_) => None,
            })
            .collect();
        assert_eq!(texts, vec!["a ", " b "]);
    }

    #[test]
    fn test_unchanged_text() {
        let config = ResolveConfig::default();
        let matcher = ReferenceMatcher::new(&config).unwrap();
        let rewrite = matcher.scan_pastes("no markers << here >>", &SymbolTable::new());
        assert!(rewrite.is_unchanged());
        assert_eq!(rewrite.render(), "no markers &lt;&lt; here &gt;&gt;");
    }

    #[test]
    fn test_escapes_inside_and_outside_markers_alike() {
        let config = ResolveConfig::default();
        let matcher = ReferenceMatcher::new(&config).unwrap();
        let mut symbols = SymbolTable::new();

        let out = matcher.substitute_definitions("a & b <<x&y>>", &mut symbols);
        assert_eq!(
            out,
            r#"a &amp; b <a name="x&amp;y"><span class="lpdefine">(x&amp;y)</span></a>"#
        );
        assert_eq!(symbols.names().collect::<Vec<_>>(), vec!["x&y"]);

        let out = matcher.substitute_pastes("<<=x&y>> & <<=x&y>>", &symbols);
        assert_eq!(
            out,
            r##"<a href="#x&amp;y">=x&amp;y</a> &amp; <a href="#x&amp;y">=x&amp;y</a>"##
        );
    }

    #[test]
    fn test_mapped_policy_does_not_collect() {
        let config = ResolveConfig::mapped(Delimiters::default(), Default::default());
        let matcher = ReferenceMatcher::new(&config).unwrap();
        let mut symbols = SymbolTable::new();
        matcher.substitute_definitions("<<foo>>", &mut symbols);
        assert!(symbols.is_empty());
    }

    #[test]
    fn test_forward_references_resolve() {
        let config = ResolveConfig::default();
        let matcher = ReferenceMatcher::new(&config).unwrap();
        let text = "<<=part.*>> then <<part.0>> <<part.1>>";
        let mut symbols = SymbolTable::new();
        matcher.scan_definitions(text, &mut symbols);
        let out = matcher.substitute_pastes(text, &symbols);
        assert!(out.starts_with(r#"<span class="popup">=part.*<div>"#));
        assert!(out.contains(r##"<a href="#part">part.0</a><a href="#part">part.1</a>"##));
    }
}
