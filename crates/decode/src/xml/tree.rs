//! A generic parsed document tree.
//!
//! Both XML dialect decoders operate on this owned tree (tag, attributes,
//! children, text) rather than on a parser's event API directly, keeping the
//! dialect-specific selection logic as pure functions. Tags and attribute
//! keys are lowercased on construction because the simple dialect is
//! case-insensitive; attribute *values* are preserved as written.

use crate::error::{ErrorKind, Result};
use exn::{OptionExt, ResultExt};
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

/// One node in the parsed document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Element(Element),
    Text(String),
}

/// An element with its attributes and mixed child content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    /// Lowercased tag name.
    pub tag: String,
    attrs: Vec<(String, String)>,
    pub children: Vec<Node>,
}

impl Element {
    fn new(tag: String, attrs: Vec<(String, String)>) -> Self {
        Self { tag, attrs, children: Vec::new() }
    }

    /// First attribute value found under any of the given (lowercase) keys.
    pub fn attr(&self, keys: &[&str]) -> Option<&str> {
        keys.iter().find_map(|key| {
            self.attrs.iter().find(|(name, _)| name == key).map(|(_, value)| value.as_str())
        })
    }

    /// Direct child elements, in document order.
    pub fn child_elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|node| match node {
            Node::Element(element) => Some(element),
            Node::Text(_) => None,
        })
    }

    /// Every descendant element (self excluded), in document order.
    pub fn descendants(&self) -> Vec<&Element> {
        let mut out = Vec::new();
        self.collect_descendants(&mut out);
        out
    }

    fn collect_descendants<'a>(&'a self, out: &mut Vec<&'a Element>) {
        for child in self.child_elements() {
            out.push(child);
            child.collect_descendants(out);
        }
    }

    /// Concatenated text content of self and all descendants.
    pub fn text(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        for child in &self.children {
            match child {
                Node::Text(text) => out.push_str(text),
                Node::Element(element) => element.collect_text(out),
            }
        }
    }
}

fn open_element(start: &BytesStart<'_>) -> Result<Element> {
    let tag = String::from_utf8_lossy(start.name().as_ref()).to_lowercase();
    let mut attrs = Vec::new();
    for attr in start.attributes() {
        let attr = attr.or_raise(|| ErrorKind::DecodeFailure("malformed XML attribute".into()))?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).to_lowercase();
        let value = attr
            .unescape_value()
            .or_raise(|| ErrorKind::DecodeFailure("malformed XML attribute value".into()))?
            .into_owned();
        attrs.push((key, value));
    }
    Ok(Element::new(tag, attrs))
}

/// Parse an XML document into its root element.
pub fn parse(xml: &str) -> Result<Element> {
    let mut reader = Reader::from_str(xml);
    // Open elements, outermost first. The root lands back in `stack[0]`'s
    // place once its end tag closes it.
    let mut stack: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;
    loop {
        let event = reader.read_event().or_raise(|| ErrorKind::DecodeFailure("malformed XML".into()))?;
        match event {
            Event::Start(start) => {
                stack.push(open_element(&start)?);
            },
            Event::Empty(start) => {
                let element = open_element(&start)?;
                match stack.last_mut() {
                    Some(parent) => parent.children.push(Node::Element(element)),
                    None if root.is_none() => root = Some(element),
                    None => {},
                }
            },
            Event::End(_) => {
                let element =
                    stack.pop().ok_or_raise(|| ErrorKind::DecodeFailure("unbalanced XML end tag".into()))?;
                match stack.last_mut() {
                    Some(parent) => parent.children.push(Node::Element(element)),
                    None if root.is_none() => root = Some(element),
                    // Trailing sibling after the root closed: ignored.
                    None => {},
                }
            },
            Event::Text(text) => {
                let text = text
                    .unescape()
                    .or_raise(|| ErrorKind::DecodeFailure("malformed XML text".into()))?
                    .into_owned();
                if let Some(parent) = stack.last_mut()
                    && !text.trim().is_empty()
                {
                    parent.children.push(Node::Text(text));
                }
            },
            Event::CData(data) => {
                let text = String::from_utf8_lossy(&data.into_inner()).into_owned();
                if let Some(parent) = stack.last_mut()
                    && !text.trim().is_empty()
                {
                    parent.children.push(Node::Text(text));
                }
            },
            Event::Eof => break,
            // Declarations, comments, processing instructions, doctypes.
            _ => {},
        }
    }
    root.ok_or_raise(|| ErrorKind::DecodeFailure("document has no root element".into()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_nested() {
        let root = parse(r#"<bible name="Test"><book n="1"><c n="1"><v n="1">Hi</v></c></book></bible>"#).unwrap();
        assert_eq!(root.tag, "bible");
        assert_eq!(root.attr(&["name"]), Some("Test"));
        let book = root.child_elements().next().unwrap();
        assert_eq!(book.tag, "book");
        assert_eq!(book.text(), "Hi");
    }

    #[test]
    fn test_tags_and_attr_keys_lowercased() {
        let root = parse(r#"<BIBLEBOOK bName="Genesis"/>"#).unwrap();
        assert_eq!(root.tag, "biblebook");
        assert_eq!(root.attr(&["bname"]), Some("Genesis"));
    }

    #[test]
    fn test_mixed_content_preserves_order() {
        let root = parse(r#"<p>before<verse sID="Gen.1.1"/>text<verse eID="Gen.1.1"/>after</p>"#).unwrap();
        assert_eq!(root.children.len(), 5);
        assert!(matches!(&root.children[1], Node::Element(e) if e.attr(&["sid"]) == Some("Gen.1.1")));
        assert!(matches!(&root.children[2], Node::Text(t) if t == "text"));
    }

    #[test]
    fn test_unbalanced_end_tag_is_an_error() {
        assert!(parse("<a></a></b>").is_err());
    }
}
