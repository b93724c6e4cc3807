//! XML tree handling
//!
//! This module provides the XML node representation consumed by the
//! marshaling layer: ordered child elements, an insertion-ordered attribute
//! map, and optional text content. A convenience reader builds trees from
//! literal XML using quick-xml.
//!
//! Namespace prefixes are not allocated here; namespaced attributes (such
//! as `xsi:type`) are written with Clark-notation keys.

use indexmap::IndexMap;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::error::{Error, Result};
use crate::limits::Limits;
use crate::names::QName;

/// XML element node
#[derive(Debug, Clone, PartialEq)]
pub struct XmlNode {
    /// Element qualified name
    pub name: QName,
    attributes: IndexMap<String, String>,
    text: Option<String>,
    children: Vec<XmlNode>,
}

impl XmlNode {
    /// Create a new element node with a local name
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: QName::local(name),
            attributes: IndexMap::new(),
            text: None,
            children: Vec::new(),
        }
    }

    /// Create a new element node with a qualified name
    pub fn with_qname(name: QName) -> Self {
        Self {
            name,
            attributes: IndexMap::new(),
            text: None,
            children: Vec::new(),
        }
    }

    /// Get the local name of the element
    pub fn local_name(&self) -> &str {
        &self.name.local_name
    }

    /// Get the text content (if any)
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    /// Set the text content
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = Some(text.into());
    }

    /// Get an attribute value by name
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(|s| s.as_str())
    }

    /// Set an attribute value
    pub fn set_attribute(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.attributes.insert(name.into(), value.into());
    }

    /// Set a namespaced attribute, keyed in Clark notation
    pub fn set_attribute_ns(
        &mut self,
        namespace: &str,
        local_name: &str,
        value: impl Into<String>,
    ) {
        self.attributes
            .insert(format!("{{{}}}{}", namespace, local_name), value.into());
    }

    /// The attribute map, in insertion order
    pub fn attributes(&self) -> &IndexMap<String, String> {
        &self.attributes
    }

    /// Add a child element
    pub fn append_child(&mut self, child: XmlNode) {
        self.children.push(child);
    }

    /// The ordered child elements
    pub fn children(&self) -> &[XmlNode] {
        &self.children
    }

    /// Find child elements by local name
    pub fn find_children(&self, local_name: &str) -> Vec<&XmlNode> {
        self.children
            .iter()
            .filter(|e| e.local_name() == local_name)
            .collect()
    }

    /// Read a tree from literal XML with default limits
    pub fn from_str(xml: &str) -> Result<XmlNode> {
        Self::from_str_with_limits(xml, &Limits::default())
    }

    /// Read a tree from literal XML
    pub fn from_str_with_limits(xml: &str, limits: &Limits) -> Result<XmlNode> {
        limits.check_size(xml.len())?;

        let mut reader = Reader::from_reader(xml.as_bytes());
        reader.trim_text(true);

        let mut stack: Vec<XmlNode> = Vec::new();
        let mut root: Option<XmlNode> = None;
        let mut buf = Vec::new();

        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Start(e)) => {
                    limits.check_depth(stack.len() + 1)?;
                    stack.push(Self::read_element(&e)?);
                }
                Ok(Event::Empty(e)) => {
                    limits.check_depth(stack.len() + 1)?;
                    let node = Self::read_element(&e)?;
                    Self::close_element(node, &mut stack, &mut root, limits)?;
                }
                Ok(Event::Text(t)) => {
                    let text = t
                        .unescape()
                        .map_err(|e| Error::Xml(e.to_string()))?
                        .into_owned();
                    if let Some(current) = stack.last_mut() {
                        if !text.is_empty() {
                            current.set_text(text);
                        }
                    }
                }
                Ok(Event::End(_)) => {
                    let node = stack
                        .pop()
                        .ok_or_else(|| Error::Xml("unbalanced end tag".to_string()))?;
                    Self::close_element(node, &mut stack, &mut root, limits)?;
                }
                Ok(Event::Eof) => break,
                Ok(_) => {}
                Err(e) => return Err(Error::Xml(e.to_string())),
            }
            buf.clear();
        }

        if !stack.is_empty() {
            return Err(Error::Xml("unclosed element".to_string()));
        }

        root.ok_or_else(|| Error::Xml("no root element".to_string()))
    }

    fn read_element(start: &BytesStart<'_>) -> Result<XmlNode> {
        let local = String::from_utf8_lossy(start.local_name().as_ref()).into_owned();
        let mut node = XmlNode::new(local);

        for attr in start.attributes() {
            let attr = attr.map_err(|e| Error::Xml(e.to_string()))?;
            // xmlns declarations are prefix bookkeeping, not data attributes
            if attr.key.as_ref().starts_with(b"xmlns") {
                continue;
            }
            let key = String::from_utf8_lossy(attr.key.local_name().as_ref()).into_owned();
            let value = attr
                .unescape_value()
                .map_err(|e| Error::Xml(e.to_string()))?
                .into_owned();
            node.set_attribute(key, value);
        }

        Ok(node)
    }

    fn close_element(
        node: XmlNode,
        stack: &mut Vec<XmlNode>,
        root: &mut Option<XmlNode>,
        limits: &Limits,
    ) -> Result<()> {
        match stack.last_mut() {
            Some(parent) => {
                limits.check_children(parent.children.len() + 1)?;
                parent.append_child(node);
            }
            None => {
                if root.is_some() {
                    return Err(Error::Xml("multiple root elements".to_string()));
                }
                *root = Some(node);
            }
        }
        Ok(())
    }
}
