//! A minimal element tree on top of `quick-xml`, just enough to find the
//! `viewBox` of the root element and the `d` attribute of one path.

use std::fmt;
use std::str;

use log::trace;
use quick_xml::events::{BytesStart, Event};

use crate::Error;

/// The default path position: the root's third child, then its first child.
const DEFAULT_POSITION: [usize; 2] = [2, 0];

/// An SVG element with its attributes and child elements.
///
/// Text content is not retained.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub name: String,
    pub attributes: Vec<(String, String)>,
    pub children: Vec<Element>,
}

impl Element {
    fn from_start(start: &BytesStart) -> Result<Self, Error> {
        let name = str::from_utf8(start.name())
            .map_err(|e| Error::SvgParse(format!("Invalid element name: {}", e)))?
            .to_string();
        let mut attributes = Vec::new();
        // Duplicated attributes are kept, lookups return the first one.
        let mut raw = start.attributes();
        raw.with_checks(false);
        for attr in raw {
            let attr = attr.map_err(|e| Error::SvgParse(format!("Invalid attribute: {}", e)))?;
            let key = str::from_utf8(attr.key)
                .map_err(|e| Error::SvgParse(format!("Invalid attribute name: {}", e)))?
                .to_string();
            let value = attr
                .unescaped_value()
                .map_err(|e| Error::SvgParse(format!("Invalid attribute value: {}", e)))?;
            let value = str::from_utf8(&value)
                .map_err(|e| Error::SvgParse(format!("Invalid attribute value: {}", e)))?
                .to_string();
            attributes.push((key, value));
        }
        Ok(Self {
            name,
            attributes,
            children: Vec::new(),
        })
    }

    /// Return the value of the attribute `name`. If the attribute is
    /// duplicated, the first one wins.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Like [`Element::attribute`], but a missing attribute is an error.
    pub fn require_attribute(&self, name: &str) -> Result<&str, Error> {
        self.attribute(name).ok_or_else(|| Error::MissingAttribute {
            element: self.name.clone(),
            attribute: name.to_string(),
        })
    }

    /// Depth-first search (self included) for an element with the given `id`.
    pub fn find_by_id(&self, id: &str) -> Option<&Element> {
        if self.attribute("id") == Some(id) {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find_by_id(id))
    }
}

/// Push a completed element either onto its parent or into the root slot.
fn attach(stack: &mut Vec<Element>, root: &mut Option<Element>, element: Element) -> Result<(), Error> {
    if let Some(parent) = stack.last_mut() {
        parent.children.push(element);
        Ok(())
    } else if root.is_none() {
        *root = Some(element);
        Ok(())
    } else {
        Err(Error::SvgParse(format!(
            "Unexpected second root element <{}>",
            element.name
        )))
    }
}

/// Parse an SVG string into its root element.
pub fn parse_document(svg: &str) -> Result<Element, Error> {
    trace!("parse_document");

    let mut reader = quick_xml::Reader::from_str(svg);
    reader.trim_text(true);

    let mut stack: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;
    let mut buf = Vec::new();
    loop {
        match reader.read_event(&mut buf) {
            Ok(Event::Start(ref e)) => {
                let element = Element::from_start(e)?;
                trace!("parse_document: Start of <{}>", element.name);
                stack.push(element);
            }
            Ok(Event::Empty(ref e)) => {
                let element = Element::from_start(e)?;
                trace!("parse_document: Empty <{}/>", element.name);
                attach(&mut stack, &mut root, element)?;
            }
            Ok(Event::End(_)) => {
                let element = stack
                    .pop()
                    .ok_or_else(|| Error::SvgParse("Unexpected closing tag".into()))?;
                attach(&mut stack, &mut root, element)?;
            }
            Ok(Event::Eof) => {
                trace!("parse_document: EOF");
                break;
            }
            Ok(_) => {}
            Err(e) => return Err(Error::SvgParse(format!("Error when parsing XML: {}", e))),
        }
        buf.clear();
    }

    if let Some(open) = stack.last() {
        return Err(Error::SvgParse(format!("Unclosed element <{}>", open.name)));
    }
    root.ok_or_else(|| Error::SvgParse("Document has no root element".into()))
}

/// How to find the path element whose line segments get encoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSelector {
    /// Child indices, walked from the root element.
    Position(Vec<usize>),
    /// The first element in document order with this `id` attribute.
    Id(String),
}

impl Default for PathSelector {
    fn default() -> Self {
        PathSelector::Position(DEFAULT_POSITION.to_vec())
    }
}

impl fmt::Display for PathSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathSelector::Position(indices) => {
                let parts: Vec<String> = indices.iter().map(ToString::to_string).collect();
                write!(f, "position {}", parts.join("/"))
            }
            PathSelector::Id(id) => write!(f, "id \"{}\"", id),
        }
    }
}

impl PathSelector {
    /// Parse a position such as `2/0`.
    pub fn parse_position(expr: &str) -> Result<Self, String> {
        let indices = expr
            .split('/')
            .map(|part| {
                part.trim()
                    .parse::<usize>()
                    .map_err(|_| format!("Invalid child index \"{}\" in \"{}\"", part, expr))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(PathSelector::Position(indices))
    }

    /// Locate the selected element below `root`.
    pub fn locate<'a>(&self, root: &'a Element) -> Result<&'a Element, Error> {
        trace!("locate: {}", self);
        match self {
            PathSelector::Position(indices) => {
                let mut current = root;
                for (depth, &index) in indices.iter().enumerate() {
                    current = current.children.get(index).ok_or_else(|| {
                        Error::PathNotFound(format!(
                            "<{}> at depth {} has {} children, no child {} ({})",
                            current.name,
                            depth,
                            current.children.len(),
                            index,
                            self
                        ))
                    })?;
                }
                Ok(current)
            }
            PathSelector::Id(id) => root
                .find_by_id(id)
                .ok_or_else(|| Error::PathNotFound(format!("no element with {}", self))),
        }
    }
}
