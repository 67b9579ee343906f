//! Generated markup
//!
//! Replacements are built as a tiny element tree instead of strings so that the same output can
//! be rendered to text or grafted into a DOM (see `nanolp-html`). Rendering escapes text and
//! attribute values.

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Markup {
    Element {
        tag: &'static str,
        attrs: Vec<(&'static str, String)>,
        children: Vec<Markup>,
    },
    Text(String),
}

impl Markup {
    pub fn element(
        tag: &'static str,
        attrs: Vec<(&'static str, String)>,
        children: Vec<Markup>,
    ) -> Self {
        Markup::Element {
            tag,
            attrs,
            children,
        }
    }

    pub fn text(text: impl Into<String>) -> Self {
        Markup::Text(text.into())
    }

    /// `<a href="href">text</a>`
    pub fn link(href: impl Into<String>, text: impl Into<String>) -> Self {
        Self::element("a", vec![("href", href.into())], vec![Self::text(text)])
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        self.render_into(&mut out);
        out
    }

    pub fn render_into(&self, out: &mut String) {
        match self {
            Markup::Text(text) => out.push_str(&html_escape::encode_text(text)),
            Markup::Element {
                tag,
                attrs,
                children,
            } => {
                out.push('<');
                out.push_str(tag);
                for (name, value) in attrs {
                    out.push(' ');
                    out.push_str(name);
                    out.push_str("=\"");
                    out.push_str(&html_escape::encode_double_quoted_attribute(value));
                    out.push('"');
                }
                out.push('>');
                for child in children {
                    child.render_into(out);
                }
                out.push_str("</");
                out.push_str(tag);
                out.push('>');
            }
        }
    }
}

impl fmt::Display for Markup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}
