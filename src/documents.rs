//! XML document handling
//!
//! This module provides the in-memory document tree the wrappers bind to.
//! Nodes are shared: an [`Element`] is a cheap reference to a node, and every
//! clone of it observes (and performs) the same mutations. The tree is
//! single-threaded; callers serialize access.

use crate::error::{Error, Result};
use indexmap::IndexMap;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};
use std::cell::RefCell;
use std::fs;
use std::io::Write;
use std::path::Path;
use std::rc::Rc;

/// Node contents behind an [`Element`] reference
#[derive(Debug, Default)]
struct ElementData {
    tag: String,
    attributes: IndexMap<String, String>,
    text: Option<String>,
    children: Vec<Element>,
}

/// Shared reference to one element node in the document tree
#[derive(Debug, Clone)]
pub struct Element(Rc<RefCell<ElementData>>);

impl Element {
    /// Create a new detached element
    pub fn new(tag: impl Into<String>) -> Self {
        Self(Rc::new(RefCell::new(ElementData {
            tag: tag.into(),
            ..ElementData::default()
        })))
    }

    /// Builder-style text setter
    pub fn with_text(self, text: impl Into<String>) -> Self {
        self.set_text(Some(text.into()));
        self
    }

    /// Builder-style attribute setter
    pub fn with_attribute(self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_attribute(key, value);
        self
    }

    /// Builder-style child append
    pub fn with_child(self, child: Element) -> Self {
        self.append_child(&child);
        self
    }

    /// Returns true if both references point at the same node
    pub fn same_node(&self, other: &Element) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    /// Get the tag name
    pub fn tag(&self) -> String {
        self.0.borrow().tag.clone()
    }

    /// Check the tag name without cloning it
    pub fn has_tag(&self, tag: &str) -> bool {
        self.0.borrow().tag == tag
    }

    /// Rename the element
    pub fn set_tag(&self, tag: impl Into<String>) {
        self.0.borrow_mut().tag = tag.into();
    }

    /// Get the text content (if any)
    pub fn text(&self) -> Option<String> {
        self.0.borrow().text.clone()
    }

    /// Set or clear the text content
    pub fn set_text(&self, text: Option<String>) {
        self.0.borrow_mut().text = text;
    }

    /// Get an attribute value by name
    pub fn attribute(&self, key: &str) -> Option<String> {
        self.0.borrow().attributes.get(key).cloned()
    }

    /// Check whether an attribute key exists
    pub fn has_attribute(&self, key: &str) -> bool {
        self.0.borrow().attributes.contains_key(key)
    }

    /// Set an attribute, keeping the position of an existing key
    pub fn set_attribute(&self, key: impl Into<String>, value: impl Into<String>) {
        self.0.borrow_mut().attributes.insert(key.into(), value.into());
    }

    /// Remove an attribute, returning its old value
    pub fn remove_attribute(&self, key: &str) -> Option<String> {
        self.0.borrow_mut().attributes.shift_remove(key)
    }

    /// Attribute keys in document order
    pub fn attribute_names(&self) -> Vec<String> {
        self.0.borrow().attributes.keys().cloned().collect()
    }

    /// Snapshot of the element children in document order
    pub fn children(&self) -> Vec<Element> {
        self.0.borrow().children.clone()
    }

    /// Number of element children
    pub fn element_children_len(&self) -> usize {
        self.0.borrow().children.len()
    }

    /// Find child elements by tag
    pub fn find_children(&self, tag: &str) -> Vec<Element> {
        self.0
            .borrow()
            .children
            .iter()
            .filter(|child| child.has_tag(tag))
            .cloned()
            .collect()
    }

    /// Append a child as the last element child
    pub fn append_child(&self, child: &Element) {
        self.0.borrow_mut().children.push(child.clone());
    }

    /// Remove a child node. Returns false if it was not a child of this element.
    pub fn remove_child(&self, child: &Element) -> bool {
        let mut data = self.0.borrow_mut();
        let before = data.children.len();
        data.children.retain(|c| !c.same_node(child));
        data.children.len() != before
    }

    /// Remove every element child
    pub fn clear_children(&self) {
        self.0.borrow_mut().children.clear();
    }

    /// Copy this node and its whole subtree into new, detached nodes
    pub fn deep_copy(&self) -> Element {
        let data = self.0.borrow();
        Element(Rc::new(RefCell::new(ElementData {
            tag: data.tag.clone(),
            attributes: data.attributes.clone(),
            text: data.text.clone(),
            children: data.children.iter().map(Element::deep_copy).collect(),
        })))
    }
}

/// XML document: an optional root element
#[derive(Debug, Default)]
pub struct Document {
    root: Option<Element>,
}

impl Document {
    /// Create a new empty document
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a document around an existing root element
    pub fn with_root(root: Element) -> Self {
        Self { root: Some(root) }
    }

    /// Parse an XML document from a string
    pub fn from_string(xml: &str) -> Result<Self> {
        Self::parse(xml.as_bytes())
    }

    /// Parse an XML document from a file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read(path).map_err(|e| {
            Error::Io(std::io::Error::new(
                e.kind(),
                format!("Failed to read '{}': {}", path.display(), e),
            ))
        })?;
        Self::parse(&content)
    }

    /// Parse an XML document from bytes
    pub fn parse(xml: &[u8]) -> Result<Self> {
        let mut reader = Reader::from_reader(xml);
        reader.trim_text(false);

        let mut doc = Document::new();
        let mut element_stack: Vec<Element> = Vec::new();
        let mut buf = Vec::new();

        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Start(e)) => {
                    element_stack.push(Self::parse_element(&e)?);
                }
                Ok(Event::End(_)) => {
                    if let Some(current) = element_stack.pop() {
                        Self::finish_element(&current);
                        match element_stack.last() {
                            Some(parent) => parent.append_child(&current),
                            None => doc.root = Some(current),
                        }
                    }
                }
                Ok(Event::Empty(e)) => {
                    let element = Self::parse_element(&e)?;
                    match element_stack.last() {
                        Some(parent) => parent.append_child(&element),
                        None => doc.root = Some(element),
                    }
                }
                Ok(Event::Text(e)) => {
                    if let Some(current) = element_stack.last() {
                        let text = e
                            .unescape()
                            .map_err(|e| Error::Xml(format!("Failed to unescape text: {}", e)))?;
                        Self::push_text(current, &text);
                    }
                }
                Ok(Event::CData(e)) => {
                    if let Some(current) = element_stack.last() {
                        let raw = e.into_inner();
                        let text = std::str::from_utf8(&raw)
                            .map_err(|e| Error::Xml(format!("Invalid CDATA section: {}", e)))?;
                        Self::push_text(current, text);
                    }
                }
                Ok(Event::Eof) => break,
                Err(e) => {
                    return Err(Error::Xml(format!(
                        "Error parsing XML at position {}: {}",
                        reader.buffer_position(),
                        e
                    )))
                }
                _ => {} // Ignore other events (comments, processing instructions, etc.)
            }
            buf.clear();
        }

        if !element_stack.is_empty() {
            return Err(Error::Xml("Unexpected end of document".to_string()));
        }

        Ok(doc)
    }

    /// Parse element from BytesStart event
    fn parse_element(start: &BytesStart) -> Result<Element> {
        let name = std::str::from_utf8(start.name().as_ref())
            .map_err(|e| Error::Xml(format!("Invalid element name: {}", e)))?
            .to_string();

        let element = Element::new(name);

        for attr_result in start.attributes() {
            let attr = attr_result
                .map_err(|e| Error::Xml(format!("Failed to parse attribute: {}", e)))?;

            let attr_name = std::str::from_utf8(attr.key.as_ref())
                .map_err(|e| Error::Xml(format!("Invalid attribute name: {}", e)))?
                .to_string();

            let attr_value = attr
                .unescape_value()
                .map_err(|e| Error::Xml(format!("Failed to unescape attribute value: {}", e)))?
                .to_string();

            element.set_attribute(attr_name, attr_value);
        }

        Ok(element)
    }

    fn push_text(element: &Element, text: &str) {
        let mut data = element.0.borrow_mut();
        match data.text.as_mut() {
            Some(existing) => existing.push_str(text),
            None => data.text = Some(text.to_string()),
        }
    }

    /// Indentation between child elements is not content
    fn finish_element(element: &Element) {
        let mut data = element.0.borrow_mut();
        let blank = data.text.as_deref().map_or(false, |t| t.trim().is_empty());
        if blank && !data.children.is_empty() {
            data.text = None;
        }
    }

    /// Get the root element
    pub fn root(&self) -> Option<&Element> {
        self.root.as_ref()
    }

    /// Replace (or clear) the root element
    pub fn set_root(&mut self, root: Option<Element>) {
        self.root = root;
    }

    /// Serialize the document; `indent` of 0 writes it on a single line
    pub fn to_bytes(&self, indent: usize) -> Result<Vec<u8>> {
        let mut writer = if indent > 0 {
            Writer::new_with_indent(Vec::new(), b' ', indent)
        } else {
            Writer::new(Vec::new())
        };

        writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
        if let Some(root) = &self.root {
            Self::write_element(&mut writer, root)?;
        }

        let mut bytes = writer.into_inner();
        bytes.push(b'\n');
        Ok(bytes)
    }

    /// Serialize the document to a string
    pub fn to_string(&self, indent: usize) -> Result<String> {
        let bytes = self.to_bytes(indent)?;
        String::from_utf8(bytes).map_err(|e| Error::Xml(format!("Invalid UTF-8 output: {}", e)))
    }

    /// Serialize the document into a file, replacing its content
    pub fn write_to_file(&self, path: impl AsRef<Path>, indent: usize) -> Result<()> {
        let bytes = self.to_bytes(indent)?;
        let mut file = fs::File::create(path)?;
        file.write_all(&bytes)?;
        Ok(())
    }

    fn write_element<W: Write>(writer: &mut Writer<W>, element: &Element) -> Result<()> {
        let data = element.0.borrow();

        let mut start = BytesStart::new(data.tag.as_str());
        for (key, value) in &data.attributes {
            start.push_attribute((key.as_str(), value.as_str()));
        }

        if data.children.is_empty() && data.text.is_none() {
            writer.write_event(Event::Empty(start))?;
            return Ok(());
        }

        writer.write_event(Event::Start(start))?;
        if let Some(text) = data.text.as_deref() {
            if !text.is_empty() {
                writer.write_event(Event::Text(BytesText::new(text)))?;
            }
        }
        for child in &data.children {
            Self::write_element(writer, child)?;
        }
        writer.write_event(Event::End(BytesEnd::new(data.tag.as_str())))?;

        Ok(())
    }
}
