//! Markup decoding into a generic element tree.
//!
//! The model builder only needs element names, attributes, text and
//! ordered children. Repeated sibling elements are always kept as a list
//! in source order, so a lone child and many children look the same to
//! the code that walks the tree.

use indexmap::IndexMap;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::io::BufRead;

use crate::error::{ImportError, Result};

const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];

/// One decoded markup element.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct XmlNode {
    /// Element name.
    pub name: String,
    /// Attributes in source order.
    pub attributes: IndexMap<String, String>,
    /// Concatenated non-blank text content.
    pub text: String,
    /// Child elements in source order.
    pub children: Vec<XmlNode>,
}

impl XmlNode {
    /// Create an element with no attributes or children.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Builder: add an attribute.
    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    /// Builder: append a child element.
    pub fn with_child(mut self, child: XmlNode) -> Self {
        self.children.push(child);
        self
    }

    /// Builder: set the text content.
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    /// Get an attribute value.
    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(|s| s.as_str())
    }

    /// First child element with the given name.
    pub fn child(&self, name: &str) -> Option<&XmlNode> {
        self.children.iter().find(|c| c.name == name)
    }

    /// All child elements with the given name, in source order.
    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a XmlNode> {
        self.children.iter().filter(move |c| c.name == name)
    }

    /// Read a named field, from an attribute or else a child's text.
    ///
    /// `<Point x="1"/>` and `<Point><x>1</x></Point>` both give `x = "1"`.
    pub fn field(&self, name: &str) -> Option<&str> {
        self.attr(name).or_else(|| {
            self.child(name)
                .map(|c| c.text.trim())
                .filter(|t| !t.is_empty())
        })
    }

    /// Read a numeric field.
    pub fn number(&self, name: &str) -> Option<f64> {
        self.field(name)?.trim().parse().ok()
    }
}

/// Turns markup bytes into an element tree.
pub trait MarkupDecoder {
    /// Decode markup and return its root element.
    fn decode(&self, markup: &[u8]) -> Result<XmlNode>;
}

/// XML decoder backed by quick-xml.
#[derive(Debug, Clone, Copy, Default)]
pub struct XmlDecoder;

impl MarkupDecoder for XmlDecoder {
    fn decode(&self, markup: &[u8]) -> Result<XmlNode> {
        let markup = markup.strip_prefix(UTF8_BOM).unwrap_or(markup);

        let mut reader = Reader::from_reader(markup);
        reader.trim_text(true);

        let mut buf = Vec::new();

        loop {
            buf.clear();
            let event = reader.read_event_into(&mut buf)?;
            let maybe_root = match event {
                Event::Start(start) => Some((start.into_owned(), false)),
                Event::Empty(start) => Some((start.into_owned(), true)),
                Event::Eof => {
                    return Err(ImportError::invalid_format("markup has no root element"));
                }
                _ => None,
            };

            if let Some((start, self_closing)) = maybe_root {
                // Anything after the root element is ignored.
                return parse_node(&mut reader, start, self_closing);
            }
        }
    }
}

fn parse_node<R: BufRead>(
    reader: &mut Reader<R>,
    start: BytesStart<'static>,
    self_closing: bool,
) -> Result<XmlNode> {
    let name_bytes = start.name().as_ref().to_vec();
    let mut node = XmlNode::new(String::from_utf8_lossy(&name_bytes));

    for attr in start.attributes() {
        let attr = attr?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).to_string();
        let value = attr.unescape_value()?.to_string();
        node.attributes.insert(key, value);
    }

    if self_closing {
        return Ok(node);
    }

    let mut buf = Vec::new();
    loop {
        buf.clear();
        let event = reader.read_event_into(&mut buf)?;
        match event {
            Event::Start(child_start) => {
                let child = parse_node(reader, child_start.into_owned(), false)?;
                node.children.push(child);
            }
            Event::Empty(child_start) => {
                let child = parse_node(reader, child_start.into_owned(), true)?;
                node.children.push(child);
            }
            Event::Text(text) => {
                let value = text.unescape()?;
                if !value.trim().is_empty() {
                    node.text.push_str(&value);
                }
            }
            Event::CData(data) => {
                let value = String::from_utf8_lossy(&data);
                if !value.trim().is_empty() {
                    node.text.push_str(&value);
                }
            }
            Event::End(end) => {
                if end.name().as_ref() != name_bytes.as_slice() {
                    return Err(ImportError::invalid_format(format!(
                        "unexpected closing tag '</{}>' while parsing '<{}>'",
                        String::from_utf8_lossy(end.name().as_ref()),
                        node.name
                    )));
                }
                return Ok(node);
            }
            Event::Eof => {
                return Err(ImportError::invalid_format(format!(
                    "unexpected end of markup inside '<{}>'",
                    node.name
                )));
            }
            _ => {}
        }
    }
}
