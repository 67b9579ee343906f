//! Link targets for paste markers
//!
//! # Targets
//!
//! | Policy  | Location of `name`      | href          |
//! |---------|-------------------------|---------------|
//! | in-page | -                       | `#name`       |
//! | mapped  | `""`                    | `#name`       |
//! | mapped  | `file.html` (htm/shtml) | `file.html#name` |
//! | mapped  | anything else           | the location  |
//!
//! # Wildcards
//!
//! A wildcard paste lists every known name matching the pattern: the symbol table for the
//! in-page policy, the command map for the mapped policy, in their own order. Links to
//! fragments (`name.N`) point at the parent anchor `name`, the label keeps the full name.
//!
//! ```text
//! <span class="popup">=foo.*<div><span id="caption">Matched:</span>
//!     <a href="#foo">foo.0</a><a href="#foo">foo.1</a></div></span>
//! ```

use crate::chunk;
use crate::config::Policy;
use crate::glob;
use crate::markers::PasteMarker;
use crate::markup::Markup;
use crate::symbols::SymbolTable;
use std::path::Path;

/// Extensions of files that carry chunk anchors.
const HTML_EXTENSIONS: &[&str] = &["htm", "html", "shtml"];

/// Where a link points.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkTarget {
    /// `#name` in the current document.
    Anchor(String),
    /// `file#name`, or the whole file when there is no anchor.
    External {
        file: String,
        anchor: Option<String>,
    },
}

impl LinkTarget {
    pub fn href(&self) -> String {
        match self {
            LinkTarget::Anchor(name) => format!("#{}", name),
            LinkTarget::External {
                file,
                anchor: Some(name),
            } => format!("{}#{}", file, name),
            LinkTarget::External { file, anchor: None } => file.clone(),
        }
    }
}

/// Turns paste markers into link markup.
#[derive(Debug, Clone, Copy)]
pub struct LinkResolver<'a> {
    policy: &'a Policy,
    symbols: &'a SymbolTable,
}

impl<'a> LinkResolver<'a> {
    /// `symbols` is only consulted by the in-page policy.
    pub fn new(policy: &'a Policy, symbols: &'a SymbolTable) -> Self {
        Self { policy, symbols }
    }

    pub fn resolve(&self, marker: &PasteMarker) -> Markup {
        match marker {
            PasteMarker::Exact { name, .. } => Markup::link(self.target(name).href(), marker.label()),
            PasteMarker::Wildcard { pattern, .. } => {
                let links = self
                    .matches(pattern)
                    .into_iter()
                    .map(|(name, target)| Markup::link(target.href(), name))
                    .collect();
                popup(marker.label(), links)
            }
        }
    }

    /// Target of an exact paste.
    pub fn target(&self, name: &str) -> LinkTarget {
        self.locate(name, name)
    }

    /// Known names matching `pattern`, each with its (parent) target.
    pub fn matches(&self, pattern: &str) -> Vec<(String, LinkTarget)> {
        let re = match glob::compile(pattern) {
            Ok(re) => re,
            Err(err) => {
                tracing::warn!(pattern, error = %err, "wildcard paste matches nothing");
                return Vec::new();
            }
        };

        self.universe()
            .filter(|name| re.is_match(name))
            .map(|name| {
                let target = self.locate(name, chunk::strip_ordinal(name));
                (name.to_string(), target)
            })
            .collect()
    }

    fn universe(&self) -> Box<dyn Iterator<Item = &'a str> + 'a> {
        match self.policy {
            Policy::InPage => Box::new(self.symbols.names()),
            Policy::Mapped(commands) => Box::new(commands.names()),
        }
    }

    /// Target for chunk `name`, pointing at `anchor` when it points inside a document.
    fn locate(&self, name: &str, anchor: &str) -> LinkTarget {
        let commands = match self.policy {
            Policy::InPage => return LinkTarget::Anchor(anchor.to_string()),
            Policy::Mapped(commands) => commands,
        };

        match commands.get(name) {
            None => {
                tracing::warn!(name, "chunk is missing from the command map");
                LinkTarget::Anchor(anchor.to_string())
            }
            Some("") => LinkTarget::Anchor(anchor.to_string()),
            Some(file) if is_html_file(file) => LinkTarget::External {
                file: file.to_string(),
                anchor: Some(anchor.to_string()),
            },
            Some(file) => LinkTarget::External {
                file: file.to_string(),
                anchor: None,
            },
        }
    }
}

fn is_html_file(location: &str) -> bool {
    Path::new(location)
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            HTML_EXTENSIONS
                .iter()
                .any(|known| ext.eq_ignore_ascii_case(known))
        })
}

fn popup(label: String, links: Vec<Markup>) -> Markup {
    let caption = Markup::element(
        "span",
        vec![("id", "caption".to_string())],
        vec![Markup::text("Matched:")],
    );
    let mut list = vec![caption];
    list.extend(links);

    Markup::element(
        "span",
        vec![("class", "popup".to_string())],
        vec![Markup::text(label), Markup::element("div", vec![], list)],
    )
}
