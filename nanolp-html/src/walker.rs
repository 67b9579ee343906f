//! Document traversal
//!
//! The walker visits text nodes depth-first (first child, then next sibling) and hands each one
//! to the reference matcher. A text node holding markers is replaced in its parent by the
//! segments of the rewrite: plain text nodes for the untouched stretches, element nodes for the
//! generated markup. Element and attribute markup around the text is never looked at.
//!
//! Linking a document is two full traversals: all definitions first, so that pastes anywhere in
//! the document can see every chunk, then all pastes.

use crate::dom::{create_text, markup_to_node};
use markup5ever_rcdom::{Handle, NodeData};
use nanolp_refs::{ReferenceMatcher, Rewrite, Segment, SymbolTable};
use std::rc::Rc;

/// Elements whose text is not rendered markup.
const SKIPPED_ELEMENTS: &[&str] = &["script", "style", "textarea", "title", "template"];

/// What one linking run changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LinkReport {
    /// Definition markers replaced
    pub definitions: usize,
    /// Paste markers replaced
    pub pastes: usize,
    /// Distinct chunk names collected (in-page policy only)
    pub chunks: usize,
    /// Text nodes replaced, over both passes
    pub nodes_rewritten: usize,
}

pub struct DocumentWalker<'m, 'c> {
    matcher: &'m ReferenceMatcher<'c>,
}

impl<'m, 'c> DocumentWalker<'m, 'c> {
    pub fn new(matcher: &'m ReferenceMatcher<'c>) -> Self {
        Self { matcher }
    }

    /// Link every marker below `root`, with a fresh symbol table.
    pub fn link(&self, root: &Handle) -> LinkReport {
        let mut symbols = SymbolTable::new();
        let mut definitions = 0;
        let mut pastes = 0;

        let defined = rewrite_text_nodes(root, &mut |text: &str| {
            let rewrite = self.matcher.scan_definitions(text, &mut symbols);
            definitions += rewrite.substitutions();
            into_nodes(rewrite)
        });
        let pasted = rewrite_text_nodes(root, &mut |text: &str| {
            let rewrite = self.matcher.scan_pastes(text, &symbols);
            pastes += rewrite.substitutions();
            into_nodes(rewrite)
        });

        tracing::debug!(
            policy = self.matcher.config().policy.name(),
            definitions,
            pastes,
            chunks = symbols.len(),
            "linked chunk references"
        );

        LinkReport {
            definitions,
            pastes,
            chunks: symbols.len(),
            nodes_rewritten: defined + pasted,
        }
    }
}

/// Offer every text node below `parent` to `visit`, replacing the node with the returned nodes.
///
/// Returns the number of text nodes replaced. Replacement nodes are not visited again.
pub fn rewrite_text_nodes<F>(parent: &Handle, visit: &mut F) -> usize
where
    F: FnMut(&str) -> Option<Vec<Handle>>,
{
    let children: Vec<Handle> = parent.children.borrow().clone();
    let mut rebuilt: Option<Vec<Handle>> = None;
    let mut rewritten = 0;

    for (i, child) in children.iter().enumerate() {
        let replacement = match &child.data {
            NodeData::Text { contents } => {
                let text = contents.borrow().to_string();
                visit(&text)
            }
            NodeData::Element { name, .. } => {
                if !SKIPPED_ELEMENTS.contains(&&*name.local) {
                    rewritten += rewrite_text_nodes(child, visit);
                }
                None
            }
            _ => None,
        };

        match replacement {
            Some(nodes) => {
                let out = rebuilt.get_or_insert_with(|| children[..i].to_vec());
                for node in nodes {
                    node.parent.set(Some(Rc::downgrade(parent)));
                    out.push(node);
                }
                rewritten += 1;
            }
            None => {
                if let Some(out) = rebuilt.as_mut() {
                    out.push(child.clone());
                }
            }
        }
    }

    if let Some(out) = rebuilt {
        *parent.children.borrow_mut() = out;
    }
    rewritten
}

fn into_nodes(rewrite: Rewrite<'_>) -> Option<Vec<Handle>> {
    if rewrite.is_unchanged() {
        return None;
    }
    let nodes = rewrite
        .into_segments()
        .into_iter()
        .filter_map(|segment| match segment {
            Segment::Text("") => None,
            Segment::Text(text) => Some(create_text(text)),
            Segment::Markup(markup) => Some(markup_to_node(&markup)),
        })
        .collect();
    Some(nodes)
}
