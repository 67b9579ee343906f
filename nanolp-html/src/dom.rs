//! RcDom helpers: parsing, serialization and node construction

use crate::error::PublishError;
use html5ever::tendril::TendrilSink;
use html5ever::{
    ns, parse_document, serialize, serialize::SerializeOpts, Attribute, LocalName, ParseOpts,
    QualName,
};
use markup5ever_rcdom::{Handle, Node, NodeData, RcDom, SerializableHandle};
use nanolp_refs::Markup;
use std::cell::{Cell, RefCell};
use std::default::Default;
use std::rc::Rc;

/// Parse a complete HTML document. HTML parsing never fails; broken markup is repaired the way
/// browsers repair it.
pub fn parse_html(source: &str) -> RcDom {
    parse_document(RcDom::default(), ParseOpts::default()).one(source)
}

/// Serialize a complete document, doctype included.
pub fn serialize_html(dom: &RcDom) -> Result<String, PublishError> {
    let mut output = Vec::new();
    let document = SerializableHandle::from(dom.document.clone());

    serialize(&mut output, &document, SerializeOpts::default()).map_err(|e| {
        PublishError::SerializationError(format!("HTML serialization failed: {}", e))
    })?;

    String::from_utf8(output)
        .map_err(|e| PublishError::SerializationError(format!("UTF-8 conversion failed: {}", e)))
}

/// Create an HTML element with attributes
pub fn create_element(tag: &str, attrs: Vec<(&str, &str)>) -> Handle {
    let qual_name = QualName::new(None, ns!(html), LocalName::from(tag));
    let attributes = attrs
        .into_iter()
        .map(|(name, value)| Attribute {
            name: QualName::new(None, ns!(), LocalName::from(name)),
            value: value.to_string().into(),
        })
        .collect();

    Rc::new(Node {
        parent: Cell::new(None),
        children: RefCell::new(Vec::new()),
        data: NodeData::Element {
            name: qual_name,
            attrs: RefCell::new(attributes),
            template_contents: Default::default(),
            mathml_annotation_xml_integration_point: false,
        },
    })
}

/// Create a text node
pub fn create_text(text: &str) -> Handle {
    Rc::new(Node {
        parent: Cell::new(None),
        children: RefCell::new(Vec::new()),
        data: NodeData::Text {
            contents: RefCell::new(text.to_string().into()),
        },
    })
}

/// Build the nodes for generated markup.
pub fn markup_to_node(markup: &Markup) -> Handle {
    match markup {
        Markup::Text(text) => create_text(text),
        Markup::Element {
            tag,
            attrs,
            children,
        } => {
            let element = create_element(
                tag,
                attrs
                    .iter()
                    .map(|(name, value)| (*name, value.as_str()))
                    .collect(),
            );
            for child in children {
                append_child(&element, markup_to_node(child));
            }
            element
        }
    }
}

pub fn append_child(parent: &Handle, child: Handle) {
    child.parent.set(Some(Rc::downgrade(parent)));
    parent.children.borrow_mut().push(child);
}

/// Local name of an element node.
pub fn tag_name(node: &Handle) -> Option<&str> {
    match &node.data {
        NodeData::Element { name, .. } => Some(&*name.local),
        _ => None,
    }
}

/// Value of an attribute of an element node.
pub fn attribute(node: &Handle, attr: &str) -> Option<String> {
    match &node.data {
        NodeData::Element { attrs, .. } => attrs
            .borrow()
            .iter()
            .find(|a| &*a.name.local == attr)
            .map(|a| a.value.to_string()),
        _ => None,
    }
}

/// First element named `tag`, depth-first.
pub fn find_element(root: &Handle, tag: &str) -> Option<Handle> {
    if tag_name(root) == Some(tag) {
        return Some(root.clone());
    }
    root.children
        .borrow()
        .iter()
        .find_map(|child| find_element(child, tag))
}

/// All elements named `tag` below `root`, in document order.
pub fn find_elements(root: &Handle, tag: &str) -> Vec<Handle> {
    let mut found = Vec::new();
    collect_elements(root, tag, &mut found);
    found
}

fn collect_elements(node: &Handle, tag: &str, found: &mut Vec<Handle>) {
    if tag_name(node) == Some(tag) {
        found.push(node.clone());
    }
    for child in node.children.borrow().iter() {
        collect_elements(child, tag, found);
    }
}
