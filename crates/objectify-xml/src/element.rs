//! Mutable element trees with parent back-references.
//!
//! [`Element`] is a shared handle to a tagged tree node. Nodes own their
//! children and hold a weak back-reference to the node that last appended
//! them, so trees can be walked in both directions without reference cycles.
//! The intended usage is build-once-then-read: populate a tree with
//! [`Element::append`], then traverse it. Handles are cheap to clone;
//! concurrent appends are not supported.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use crate::error::{Error, Result};

/// A runtime-typed payload for [`Element::from_payload`].
///
/// Only text payloads are valid element content. The other variants exist so
/// that callers handing over dynamically-typed data get a construction error
/// naming the offending type instead of silently mangled content.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    Null,
    Text(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    List(Vec<Payload>),
}

impl Payload {
    /// Coarse runtime type name, used in construction error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Payload::Null => "null",
            Payload::Text(_) => "string",
            Payload::Int(_) => "int",
            Payload::Float(_) => "float",
            Payload::Bool(_) => "bool",
            Payload::List(_) => "list",
        }
    }
}

impl From<&str> for Payload {
    fn from(value: &str) -> Self {
        Payload::Text(value.to_string())
    }
}

impl From<String> for Payload {
    fn from(value: String) -> Self {
        Payload::Text(value)
    }
}

impl From<i64> for Payload {
    fn from(value: i64) -> Self {
        Payload::Int(value)
    }
}

impl From<f64> for Payload {
    fn from(value: f64) -> Self {
        Payload::Float(value)
    }
}

impl From<bool> for Payload {
    fn from(value: bool) -> Self {
        Payload::Bool(value)
    }
}

impl From<Vec<Payload>> for Payload {
    fn from(value: Vec<Payload>) -> Self {
        Payload::List(value)
    }
}

struct ElementData {
    tag: String,
    text: Option<String>,
    children: Vec<Element>,
    parent: Weak<RefCell<ElementData>>,
}

/// A shared handle to a mutable tagged tree node.
///
/// Cloning an `Element` clones the handle, not the node; all clones observe
/// the same tag, text, and children. Node identity is checked with
/// [`Element::same_node`].
#[derive(Clone)]
pub struct Element {
    data: Rc<RefCell<ElementData>>,
}

impl Element {
    /// Create a node with the given tag and no text.
    pub fn new(tag: impl Into<String>) -> Self {
        Self::from_data(ElementData {
            tag: tag.into(),
            text: None,
            children: Vec::new(),
            parent: Weak::new(),
        })
    }

    /// Create a node with the given tag and text content.
    pub fn with_text(tag: impl Into<String>, text: impl Into<String>) -> Self {
        Self::from_data(ElementData {
            tag: tag.into(),
            text: Some(text.into()),
            children: Vec::new(),
            parent: Weak::new(),
        })
    }

    /// Create a node from a runtime-typed payload.
    ///
    /// Only text payloads are accepted; any other payload kind fails with
    /// [`Error::InvalidChildType`] naming the payload's type.
    pub fn from_payload(tag: impl Into<String>, payload: impl Into<Payload>) -> Result<Self> {
        match payload.into() {
            Payload::Text(text) => Ok(Self::with_text(tag, text)),
            other => Err(Error::InvalidChildType {
                found: other.type_name(),
            }),
        }
    }

    fn from_data(data: ElementData) -> Self {
        Self {
            data: Rc::new(RefCell::new(data)),
        }
    }

    /// The node's tag name.
    pub fn tag(&self) -> String {
        self.data.borrow().tag.clone()
    }

    /// Reassign the tag name. Tags are freely mutable.
    pub fn set_tag(&self, tag: impl Into<String>) {
        self.data.borrow_mut().tag = tag.into();
    }

    /// The node's text content, set at construction.
    pub fn text(&self) -> Option<String> {
        self.data.borrow().text.clone()
    }

    /// Text is immutable after construction; this always fails with
    /// [`Error::NotWritable`].
    pub fn set_text(&self, _value: &str) -> Result<()> {
        Err(Error::NotWritable {
            attribute: "text",
            type_name: "Element",
        })
    }

    /// Append a text fragment during parsing. Not part of the public
    /// contract; parsed text arrives after the node is created.
    pub(crate) fn push_text(&self, fragment: &str) {
        let mut data = self.data.borrow_mut();
        match &mut data.text {
            Some(text) => text.push_str(fragment),
            None => data.text = Some(fragment.to_string()),
        }
    }

    /// Drop indentation picked up between child elements. A leaf keeps its
    /// text even when it is all whitespace.
    pub(crate) fn discard_whitespace_text(&self) {
        let mut data = self.data.borrow_mut();
        if !data.children.is_empty()
            && data.text.as_ref().is_some_and(|t| t.trim().is_empty())
        {
            data.text = None;
        }
    }

    /// Append `child` to this node's children and point the child's parent
    /// back-reference at this node.
    ///
    /// There is no detachment or cycle detection; each node is expected to be
    /// appended to a single parent once.
    pub fn append(&self, child: &Element) {
        child.data.borrow_mut().parent = Rc::downgrade(&self.data);
        self.data.borrow_mut().children.push(child.clone());
    }

    /// The node that last appended this node, if it is still alive.
    pub fn parent(&self) -> Option<Element> {
        self.data
            .borrow()
            .parent
            .upgrade()
            .map(|data| Element { data })
    }

    /// Handles to this node's children, in append order.
    pub fn children(&self) -> Vec<Element> {
        self.data.borrow().children.clone()
    }

    /// Number of children.
    pub fn count_children(&self) -> usize {
        self.data.borrow().children.len()
    }

    /// Whether two handles refer to the same node.
    pub fn same_node(&self, other: &Element) -> bool {
        Rc::ptr_eq(&self.data, &other.data)
    }
}

impl Default for Element {
    fn default() -> Self {
        Element::new("Element")
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.text() {
            Some(text) => f.write_str(&text),
            None => Ok(()),
        }
    }
}

// Debug embeds the tag in a fixed template so dumps of mixed trees stay
// readable without printing the whole subtree.
impl fmt::Debug for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<Element {}>", self.tag())
    }
}

/// A string-typed leaf element.
///
/// Behaves like [`Element`] but its debug representation shows the quoted
/// text value instead of the generic element template.
#[derive(Clone)]
pub struct StringElement {
    inner: Element,
}

impl StringElement {
    /// Create a string element holding `text`.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            inner: Element::with_text("StringElement", text),
        }
    }

    /// Create a string element with no text.
    pub fn empty() -> Self {
        Self {
            inner: Element::new("StringElement"),
        }
    }

    /// The underlying element.
    pub fn element(&self) -> &Element {
        &self.inner
    }

    /// The text content.
    pub fn text(&self) -> Option<String> {
        self.inner.text()
    }

    /// Text is immutable after construction; this always fails with
    /// [`Error::NotWritable`].
    pub fn set_text(&self, _value: &str) -> Result<()> {
        Err(Error::NotWritable {
            attribute: "text",
            type_name: "StringElement",
        })
    }
}

impl fmt::Display for StringElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.inner, f)
    }
}

impl fmt::Debug for StringElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.text() {
            Some(text) => write!(f, "{:?}", text),
            None => write!(f, "{:?}", ""),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_element_has_no_text() {
        let element = Element::new("root");
        assert_eq!(element.text(), None);
        assert_eq!(element.to_string(), "");
    }

    #[test]
    fn test_default_tag_is_type_name() {
        let element = Element::default();
        assert_eq!(element.tag(), "Element");
        assert_eq!(element.text(), None);
    }

    #[test]
    fn test_with_text() {
        let element = Element::with_text("name", "Marianne");
        assert_eq!(element.text(), Some("Marianne".to_string()));
        assert_eq!(element.to_string(), "Marianne");
    }

    #[test]
    fn test_from_payload_text() {
        let element = Element::from_payload("name", "Marianne").unwrap();
        assert_eq!(element.text(), Some("Marianne".to_string()));
    }

    #[test]
    fn test_from_payload_rejects_non_text() {
        for (payload, type_name) in [
            (Payload::Float(1.5), "float"),
            (Payload::Int(7), "int"),
            (Payload::List(vec![Payload::Int(1), Payload::Int(2)]), "list"),
            (Payload::Null, "null"),
            (Payload::Bool(true), "bool"),
        ] {
            let err = Element::from_payload("name", payload).unwrap_err();
            assert_eq!(err, Error::InvalidChildType { found: type_name });
            assert_eq!(err.to_string(), format!("Invalid child type: {}", type_name));
        }
    }

    #[test]
    fn test_text_is_not_writable() {
        let element = Element::with_text("name", "before");
        let err = element.set_text("after").unwrap_err();
        assert_eq!(
            err.to_string(),
            "attribute \"text\" of \"Element\" objects is not writable"
        );
        // A second attempt fails the same way, and the text is untouched.
        assert!(element.set_text("again").is_err());
        assert_eq!(element.text(), Some("before".to_string()));
    }

    #[test]
    fn test_tag_is_mutable() {
        let element = Element::new("before");
        element.set_tag("after");
        assert_eq!(element.tag(), "after");
    }

    #[test]
    fn test_append_links_parent_and_children() {
        let parent = Element::new("parent");
        let first = Element::new("first");
        let second = Element::new("second");

        parent.append(&first);
        parent.append(&second);

        let children = parent.children();
        assert_eq!(children.len(), 2);
        assert!(children[0].same_node(&first));
        assert!(children[1].same_node(&second));
        assert_eq!(parent.count_children(), 2);

        assert!(first.parent().unwrap().same_node(&parent));
        assert!(second.parent().unwrap().same_node(&parent));
        assert!(parent.parent().is_none());
    }

    #[test]
    fn test_debug_template() {
        let element = Element::new("root");
        assert_eq!(format!("{:?}", element), "<Element root>");
    }

    #[test]
    fn test_string_element_debug_shows_quoted_text() {
        let named = StringElement::new("Marianne");
        assert_eq!(format!("{:?}", named), "\"Marianne\"");
        assert_eq!(named.to_string(), "Marianne");

        let unset = StringElement::empty();
        assert_eq!(format!("{:?}", unset), "\"\"");
    }

    #[test]
    fn test_string_element_text_is_not_writable() {
        let element = StringElement::new("before");
        let err = element.set_text("after").unwrap_err();
        assert_eq!(
            err.to_string(),
            "attribute \"text\" of \"StringElement\" objects is not writable"
        );
    }
}
