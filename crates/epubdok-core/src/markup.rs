//! Structured markup builder
//!
//! Content and navigation documents are assembled as a tree of
//! [`Element`]s and serialized once through `quick-xml`, so ids, hrefs and
//! text are escaped at write time instead of being spliced into strings.
//!
//! # Example
//!
//! ```
//! use epubdok_core::markup::Element;
//!
//! let link = Element::new("a")
//!     .attr("href", "chapter-b.xhtml#setup")
//!     .class("xref")
//!     .text("Setup & Install");
//! assert_eq!(
//!     link.to_xml_string().unwrap(),
//!     r#"<a href="chapter-b.xhtml#setup" class="xref">Setup &amp; Install</a>"#
//! );
//! ```

use std::borrow::Cow;

use quick_xml::escape::partial_escape;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

use crate::error::{ConvertError, Result};

/// Elements written as `<name/>` when they have no children
const VOID_ELEMENTS: &[&str] = &["br", "col", "content", "hr", "img", "link", "meta"];

/// A markup node
#[derive(Debug, Clone, PartialEq)]
pub enum Markup {
    Element(Element),
    Text(String),
}

/// Whether an element starts on its own line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    Inline,
    Block,
}

/// An element with ordered attributes and children
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    name: Cow<'static, str>,
    attributes: Vec<(String, String)>,
    children: Vec<Markup>,
    layout: Layout,
}

impl Element {
    /// Create an inline element
    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            children: Vec::new(),
            layout: Layout::Inline,
        }
    }

    /// Create a block element, written on its own line
    pub fn block(name: impl Into<Cow<'static, str>>) -> Self {
        Self {
            layout: Layout::Block,
            ..Self::new(name)
        }
    }

    /// Element name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Add an attribute
    pub fn attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_attr(key, value);
        self
    }

    /// Add an attribute when a value is present
    pub fn opt_attr(self, key: impl Into<String>, value: Option<impl Into<String>>) -> Self {
        match value {
            Some(value) => self.attr(key, value),
            None => self,
        }
    }

    /// Add a `class` attribute
    pub fn class(self, class: impl Into<String>) -> Self {
        self.attr("class", class)
    }

    /// Set or replace an attribute
    pub fn set_attr(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.attributes.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.attributes.push((key, value)),
        }
    }

    /// Get an attribute value
    pub fn get_attr(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Append a child element
    pub fn child(mut self, child: Element) -> Self {
        self.children.push(Markup::Element(child));
        self
    }

    /// Append a text child
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.push_text(text);
        self
    }

    /// Append a markup child
    pub fn push(&mut self, child: impl Into<Markup>) {
        self.children.push(child.into());
    }

    /// Append a text child
    pub fn push_text(&mut self, text: impl Into<String>) {
        let text = text.into();
        if !text.is_empty() {
            self.children.push(Markup::Text(text));
        }
    }

    /// Append several children
    pub fn extend(&mut self, children: impl IntoIterator<Item = Markup>) {
        self.children.extend(children);
    }

    /// Child nodes
    pub fn children(&self) -> &[Markup] {
        &self.children
    }

    /// Check if the element has no children
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Serialize this element as an XML fragment
    pub fn to_xml_string(&self) -> Result<String> {
        let mut writer = Writer::new(Vec::new());
        self.write(&mut writer)?;
        into_string(writer)
    }

    fn write(&self, writer: &mut Writer<Vec<u8>>) -> Result<()> {
        let mut start = BytesStart::new(self.name.as_ref());
        for (key, value) in &self.attributes {
            start.push_attribute((key.as_str(), value.as_str()));
        }

        if self.children.is_empty() && VOID_ELEMENTS.contains(&self.name.as_ref()) {
            emit(writer, Event::Empty(start))?;
        } else {
            emit(writer, Event::Start(start))?;
            if self.has_block_children() {
                newline(writer)?;
            }
            for child in &self.children {
                match child {
                    Markup::Element(element) => element.write(writer)?,
                    Markup::Text(text) => {
                        emit(writer, Event::Text(BytesText::from_escaped(partial_escape(text))))?
                    }
                }
            }
            emit(writer, Event::End(BytesEnd::new(self.name.as_ref())))?;
        }

        if self.layout == Layout::Block {
            newline(writer)?;
        }
        Ok(())
    }

    fn has_block_children(&self) -> bool {
        self.children
            .iter()
            .any(|c| matches!(c, Markup::Element(e) if e.layout == Layout::Block))
    }
}

impl From<Element> for Markup {
    fn from(element: Element) -> Self {
        Markup::Element(element)
    }
}

impl From<String> for Markup {
    fn from(text: String) -> Self {
        Markup::Text(text)
    }
}

impl From<&str> for Markup {
    fn from(text: &str) -> Self {
        Markup::Text(text.to_string())
    }
}

/// A complete XML document: prolog plus root element
#[derive(Debug, Clone)]
pub struct XmlDocument {
    /// Emit `<?xml version="1.0" encoding="UTF-8"?>`
    pub declaration: bool,
    /// Doctype content, e.g. `html`
    pub doctype: Option<String>,
    /// Root element
    pub root: Element,
}

impl XmlDocument {
    /// An XHTML5 content document
    pub fn xhtml(root: Element) -> Self {
        Self {
            declaration: true,
            doctype: Some("html".to_string()),
            root,
        }
    }

    /// A plain XML document
    pub fn xml(root: Element) -> Self {
        Self {
            declaration: true,
            doctype: None,
            root,
        }
    }

    /// Serialize the document
    pub fn to_xml_string(&self) -> Result<String> {
        let mut writer = Writer::new(Vec::new());
        if self.declaration {
            emit(
                &mut writer,
                Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)),
            )?;
            newline(&mut writer)?;
        }
        if let Some(doctype) = &self.doctype {
            emit(
                &mut writer,
                Event::DocType(BytesText::from_escaped(doctype.as_str())),
            )?;
            newline(&mut writer)?;
        }
        self.root.write(&mut writer)?;
        into_string(writer)
    }
}

fn emit(writer: &mut Writer<Vec<u8>>, event: Event<'_>) -> Result<()> {
    writer
        .write_event(event)
        .map_err(|e| ConvertError::Markup(e.to_string()))
}

fn newline(writer: &mut Writer<Vec<u8>>) -> Result<()> {
    emit(writer, Event::Text(BytesText::from_escaped("\n")))
}

fn into_string(writer: Writer<Vec<u8>>) -> Result<String> {
    String::from_utf8(writer.into_inner()).map_err(|e| ConvertError::Markup(e.to_string()))
}
