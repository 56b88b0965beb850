//! XML parser that builds [`Element`] trees.

use quick_xml::Reader;
use quick_xml::events::{BytesCData, BytesEnd, BytesText, Event};

use crate::element::Element;
use crate::error::{Error, Result};

/// Parse XML from a string, producing the root [`Element`] of the document.
///
/// # Example
///
/// ```rust
/// use objectify_xml::parse;
///
/// let root = parse("<root><child/></root>").unwrap();
/// assert_eq!(root.tag(), "root");
/// assert_eq!(root.count_children(), 1);
/// ```
///
/// # Errors
///
/// Returns an error if the XML is malformed or if parsing fails.
pub fn parse(content: &str) -> Result<Element> {
    let mut parser = XmlParser::new(content);
    parser.parse()
}

/// Internal parser state.
struct XmlParser<'a> {
    /// The quick-xml reader.
    reader: Reader<&'a [u8]>,

    /// Stack of open elements.
    stack: Vec<Element>,
}

impl<'a> XmlParser<'a> {
    fn new(source: &'a str) -> Self {
        let mut reader = Reader::from_str(source);
        reader.config_mut().trim_text_start = false;
        reader.config_mut().trim_text_end = false;

        Self {
            reader,
            stack: Vec::new(),
        }
    }

    fn parse(&mut self) -> Result<Element> {
        let mut root: Option<Element> = None;

        loop {
            match self.reader.read_event() {
                Ok(Event::Start(e)) => {
                    self.stack.push(Element::new(local_name(e.name().as_ref())));
                }
                Ok(Event::End(e)) => {
                    let element = self.handle_end(e)?;
                    self.attach(element, &mut root)?;
                }
                Ok(Event::Empty(e)) => {
                    let element = Element::new(local_name(e.name().as_ref()));
                    self.attach(element, &mut root)?;
                }
                Ok(Event::Text(e)) => {
                    self.handle_text(e)?;
                }
                Ok(Event::CData(e)) => {
                    self.handle_cdata(e);
                }
                Ok(Event::Comment(_) | Event::PI(_) | Event::Decl(_)) => {
                    // Skip comments, processing instructions, and XML declarations
                }
                Ok(Event::DocType(_)) => {
                    // Skip DOCTYPE declarations
                }
                Ok(Event::Eof) => break,
                Err(e) => {
                    return Err(Error::XmlSyntax {
                        message: e.to_string(),
                        position: Some(self.reader.error_position()),
                    });
                }
            }
        }

        // Check for unclosed elements
        if let Some(open) = self.stack.last() {
            return Err(Error::UnexpectedEof { tag: open.tag() });
        }

        root.ok_or(Error::EmptyDocument)
    }

    /// Append a finished element to the element currently open, or make it
    /// the document root when the stack is empty.
    fn attach(&mut self, element: Element, root: &mut Option<Element>) -> Result<()> {
        if let Some(parent) = self.stack.last() {
            parent.append(&element);
        } else if root.is_some() {
            return Err(Error::MultipleRoots);
        } else {
            *root = Some(element);
        }
        Ok(())
    }

    fn handle_end(&mut self, e: BytesEnd<'_>) -> Result<Element> {
        let end_name = String::from_utf8_lossy(e.name().as_ref()).to_string();
        let end_local_name = local_name(e.name().as_ref());

        let element = self.stack.pop().ok_or_else(|| Error::InvalidStructure {
            message: format!("unexpected closing tag </{}>", end_name),
        })?;

        // Verify tag names match
        if element.tag() != end_local_name {
            return Err(Error::MismatchedEndTag {
                expected: element.tag(),
                found: end_local_name,
            });
        }

        // Indentation between children is noise; a leaf's text is content
        // even when it is all whitespace.
        element.discard_whitespace_text();

        Ok(element)
    }

    fn handle_text(&mut self, e: BytesText<'_>) -> Result<()> {
        let text = e.unescape().map_err(|err| Error::XmlSyntax {
            message: format!("invalid text content: {}", err),
            position: Some(self.reader.error_position()),
        })?;

        if let Some(node) = self.stack.last() {
            node.push_text(&text);
        }
        Ok(())
    }

    fn handle_cdata(&mut self, e: BytesCData<'_>) {
        let text = String::from_utf8_lossy(e.as_ref()).to_string();
        if let Some(node) = self.stack.last() {
            node.push_text(&text);
        }
    }
}

/// Strip the namespace prefix off a qualified name.
///
/// Namespace URIs are not resolved; the prefix is dropped so tags remain
/// usable as plain field names.
fn local_name(qualified: &[u8]) -> String {
    let name = String::from_utf8_lossy(qualified);
    match name.rfind(':') {
        Some(pos) => name[pos + 1..].to_string(),
        None => name.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_element() {
        let root = parse("<root/>").unwrap();
        assert_eq!(root.tag(), "root");
        assert_eq!(root.count_children(), 0);
        assert_eq!(root.text(), None);
    }

    #[test]
    fn test_parse_nested_elements() {
        let root = parse("<root><child/></root>").unwrap();
        assert_eq!(root.tag(), "root");

        let children = root.children();
        assert_eq!(children.len(), 1);
        assert_eq!(children[0].tag(), "child");
        assert!(children[0].parent().unwrap().same_node(&root));
    }

    #[test]
    fn test_parse_text_content() {
        let root = parse("<root>Hello, world!</root>").unwrap();
        assert_eq!(root.text(), Some("Hello, world!".to_string()));
    }

    #[test]
    fn test_parse_cdata() {
        let root = parse("<root><![CDATA[1 < 2]]></root>").unwrap();
        assert_eq!(root.text(), Some("1 < 2".to_string()));
    }

    #[test]
    fn test_parse_entity_unescaping() {
        let root = parse("<root>a &amp; b</root>").unwrap();
        assert_eq!(root.text(), Some("a & b".to_string()));
    }

    #[test]
    fn test_whitespace_between_elements_is_skipped() {
        let root = parse("<root>\n  <child/>\n  <child/>\n</root>").unwrap();
        assert_eq!(root.text(), None);
        assert_eq!(root.count_children(), 2);
    }

    #[test]
    fn test_whitespace_only_leaf_keeps_text() {
        let root = parse("<pad>   </pad>").unwrap();
        assert_eq!(root.text(), Some("   ".to_string()));
    }

    #[test]
    fn test_parse_namespace_prefix() {
        let root = parse(r#"<csl:style xmlns:csl="http://example.org"/>"#).unwrap();
        assert_eq!(root.tag(), "style");
    }

    #[test]
    fn test_document_order_preserved() {
        let root = parse("<root><a/><b/><a/></root>").unwrap();
        let tags: Vec<String> = root.children().iter().map(|c| c.tag()).collect();
        assert_eq!(tags, vec!["a", "b", "a"]);
    }

    #[test]
    fn test_empty_document_error() {
        assert_eq!(parse("").unwrap_err(), Error::EmptyDocument);
    }

    #[test]
    fn test_multiple_roots_error() {
        assert_eq!(parse("<root/><another/>").unwrap_err(), Error::MultipleRoots);
    }

    #[test]
    fn test_unclosed_element_error() {
        assert_eq!(
            parse("<root>").unwrap_err(),
            Error::UnexpectedEof {
                tag: "root".to_string()
            }
        );
    }

    #[test]
    fn test_mismatched_tags_error() {
        let result = parse("<root></wrong>");
        // quick-xml catches mismatched tags itself when check_end_names is
        // enabled (default) and reports them as syntax errors.
        assert!(
            matches!(
                result,
                Err(Error::MismatchedEndTag { .. } | Error::XmlSyntax { .. })
            ),
            "Expected MismatchedEndTag or XmlSyntax error, got: {:?}",
            result
        );
    }

    #[test]
    fn test_stray_closing_tag_error() {
        let result = parse("</root>");
        assert!(
            matches!(
                result,
                Err(Error::InvalidStructure { .. } | Error::XmlSyntax { .. })
            ),
            "Expected InvalidStructure or XmlSyntax error, got: {:?}",
            result
        );
    }

    #[test]
    fn test_declaration_and_comments_skipped() {
        let root = parse(
            r#"<?xml version="1.0" encoding="utf-8"?>
<!-- a comment -->
<root><child>7</child></root>"#,
        )
        .unwrap();
        assert_eq!(root.tag(), "root");
        assert_eq!(root.children()[0].text(), Some("7".to_string()));
    }
}
