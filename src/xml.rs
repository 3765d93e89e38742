//! Element tree helpers for DataCite XML
//!
//! Thin lookups over a parsed `roxmltree` document. Child elements are
//! matched by local name within their parent's namespace, so documents
//! using the kernel-4 default namespace and unqualified documents are read
//! the same way.

use roxmltree::Node;
use serde_json::{Map, Value};

use crate::vocab::{AttributeTable, XML_NS};

/// A JSON object under construction
pub type Record = Map<String, Value>;

/// Trimmed text of an element, or `None` when the element is missing or its
/// text is empty or whitespace only
pub fn text(node: Option<Node>) -> Option<String> {
    node.and_then(|n| n.text())
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(String::from)
}

/// Child elements of `parent` with the given local name, in document order
pub fn children<'a, 'input>(
    parent: Node<'a, 'input>,
    name: &'static str,
) -> impl Iterator<Item = Node<'a, 'input>> {
    let namespace = parent.tag_name().namespace();
    parent.children().filter(move |n| {
        n.is_element() && n.tag_name().name() == name && n.tag_name().namespace() == namespace
    })
}

/// First child element of `parent` with the given local name
pub fn child<'a, 'input>(parent: Node<'a, 'input>, name: &'static str) -> Option<Node<'a, 'input>> {
    children(parent, name).next()
}

/// Items of a repeatable section, e.g. `titles/title`
///
/// Items from every occurrence of the section element are returned, in
/// document order.
pub fn section_items<'a, 'input>(
    parent: Node<'a, 'input>,
    section: &'static str,
    item: &'static str,
) -> impl Iterator<Item = Node<'a, 'input>> {
    children(parent, section).flat_map(move |s| children(s, item))
}

/// Trimmed attribute value; blank values count as absent
pub fn attribute(node: Node, name: &str) -> Option<String> {
    node.attribute(name)
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(String::from)
}

/// The `xml:lang` attribute, which lives in the XML namespace rather than
/// with the element's own attributes
pub fn lang(node: Node) -> Option<String> {
    node.attribute((XML_NS, "lang"))
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(String::from)
}

/// Copy every attribute listed in `table` that is present on `node`
pub fn map_attributes(node: Node, table: AttributeTable, record: &mut Record) {
    for (source, field) in table {
        insert_opt(record, field, attribute(node, source));
    }
}

/// Copy the text of every child element listed in `table` that has text
pub fn map_child_text(node: Node, table: AttributeTable, record: &mut Record) {
    for (element, field) in table {
        insert_opt(record, field, text(child(node, element)));
    }
}

/// Insert a string field when a value is present
pub fn insert_opt(record: &mut Record, key: &str, value: Option<String>) {
    if let Some(value) = value {
        record.insert(key.to_string(), Value::String(value));
    }
}

/// Wrap a record as a JSON object, or `None` when it has no fields
pub fn non_empty(record: Record) -> Option<Value> {
    if record.is_empty() {
        None
    } else {
        Some(Value::Object(record))
    }
}

/// Collect values into a JSON array, or `None` when there are none
pub fn non_empty_list(values: impl IntoIterator<Item = Value>) -> Option<Value> {
    let values: Vec<Value> = values.into_iter().collect();
    if values.is_empty() {
        None
    } else {
        Some(Value::Array(values))
    }
}
