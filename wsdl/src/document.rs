//! Owned XML element tree.
//!
//! Schema resolution walks documents by children and attributes, so every
//! fetched document is read once with `quick_xml` into this small tree.

use quick_xml::{
    events::{BytesStart, Event},
    Reader,
};
use std::io::BufRead;

use super::{
    error::{self, Error},
    namespaces::split_qualified,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlElement {
    pub prefix: Option<String>,
    pub name: String,
    pub attributes: Vec<(String, String)>,
    pub children: Vec<XmlElement>,
    pub text: Option<String>,
}

#[derive(Debug, Clone)]
pub struct XmlDocument {
    pub identifier: String,
    pub root: XmlElement,
}

impl XmlElement {
    pub fn new<S: Into<String>>(prefix: Option<S>, name: S) -> Self {
        Self {
            prefix: prefix.map(Into::into),
            name: name.into(),
            attributes: Vec::new(),
            children: Vec::new(),
            text: None,
        }
    }

    /// Attribute by its full key as written (`name`, `xmlns:tns`).
    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(name, _)| name == key)
            .map(|(_, value)| value.as_str())
    }

    /// Attribute that must be present for the construct to make sense.
    pub fn required_attribute(&self, key: &'static str) -> Result<&str, Error> {
        self.attribute(key).ok_or_else(|| Error::MissingAttribute {
            element: self.name.clone(),
            attribute: key,
        })
    }

    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a XmlElement> {
        self.children.iter().filter(move |child| child.name == name)
    }

    pub fn child(&self, name: &str) -> Option<&XmlElement> {
        self.children.iter().find(|child| child.name == name)
    }

    /// `(prefix, uri)` pairs declared on this element; the default namespace
    /// is reported with an empty prefix.
    pub fn namespace_declarations(&self) -> impl Iterator<Item = (&str, &str)> {
        self.attributes.iter().filter_map(|(key, value)| {
            match split_qualified(key) {
                (Some("xmlns"), prefix) => Some((prefix, value.as_str())),
                (None, "xmlns") => Some(("", value.as_str())),
                _ => None,
            }
        })
    }

    fn push_text(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }

        match &mut self.text {
            Some(existing) => existing.push_str(text),
            None => self.text = Some(text.to_owned()),
        }
    }
}

impl XmlDocument {
    pub fn parse_str<S: Into<String>>(identifier: S, xml: &str) -> Result<Self, Error> {
        Self::parse_reader(identifier, Reader::from_str(xml))
    }

    pub fn parse_reader<S: Into<String>, B: BufRead>(
        identifier: S,
        mut reader: Reader<B>,
    ) -> Result<Self, Error> {
        let identifier = identifier.into();
        reader.trim_text(true);

        let mut stack: Vec<XmlElement> = Vec::new();
        let mut root = None;
        let mut buffer = Vec::new();

        loop {
            match reader.read_event(&mut buffer)? {
                Event::Start(start) => stack.push(element_from_start(&reader, &start)?),

                Event::Empty(start) => {
                    let element = element_from_start(&reader, &start)?;
                    close_element(&mut stack, &mut root, element);
                }

                Event::End(..) => {
                    if let Some(element) = stack.pop() {
                        close_element(&mut stack, &mut root, element);
                    }
                }

                Event::Text(text) => {
                    let unescaped = text.unescaped()?;
                    let text = reader.decode(&unescaped)?;

                    if let Some(current) = stack.last_mut() {
                        current.push_text(text.trim());
                    }
                }

                Event::CData(data) => {
                    let text = reader.decode(&data)?;

                    if let Some(current) = stack.last_mut() {
                        current.push_text(text.trim());
                    }
                }

                Event::Eof => break,

                _ => (),
            }

            buffer.clear();
        }

        match root {
            Some(root) => Ok(Self { identifier, root }),
            None => Err(Error::EmptyDocument(identifier)),
        }
    }
}

fn element_from_start<B: BufRead>(
    reader: &Reader<B>,
    start: &BytesStart<'_>,
) -> error::Result<XmlElement> {
    let (prefix, local_name) = split_qualified(reader.decode(start.name())?);
    let mut element = XmlElement::new(prefix, local_name);

    for attribute in start.attributes() {
        let attribute = attribute?;
        let key = reader.decode(attribute.key)?.to_owned();
        let value = attribute.unescaped_value()?;
        let value = reader.decode(&value)?.to_owned();

        element.attributes.push((key, value));
    }

    Ok(element)
}

fn close_element(stack: &mut Vec<XmlElement>, root: &mut Option<XmlElement>, element: XmlElement) {
    match stack.last_mut() {
        Some(parent) => parent.children.push(element),
        None => *root = Some(element),
    }
}
