// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! FetchXML-specific test helpers and custom assertions
//!
//! Every helper parses its input with `quick_xml::Reader`, so malformed markup
//! fails the assertion instead of being miscounted.

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

/// One element of a parsed document, attribute values unescaped
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlElement {
    pub name: String,
    pub attributes: Vec<(String, String)>,
}

impl XmlElement {
    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// Custom assertion helpers for generated FetchXML
pub struct FetchXmlAssertions;

impl FetchXmlAssertions {
    /// Parse `xml` and return its elements in document order
    ///
    /// Panics unless `xml` is a single well-formed root element: matched end
    /// tags, quoted and unescapable attribute values, valid text content.
    pub fn parse_elements(xml: &str) -> Vec<XmlElement> {
        let mut reader = Reader::from_str(xml);
        let mut open: Vec<String> = Vec::new();
        let mut elements = Vec::new();
        let mut roots = 0;

        loop {
            let event = match reader.read_event() {
                Ok(event) => event,
                Err(err) => panic!(
                    "malformed XML at byte {}: {} in:\n{}",
                    reader.error_position(),
                    err,
                    xml
                ),
            };
            match event {
                Event::Start(start) => {
                    roots += usize::from(open.is_empty());
                    let element = parse_element(&start, xml);
                    open.push(element.name.clone());
                    elements.push(element);
                }
                Event::Empty(start) => {
                    roots += usize::from(open.is_empty());
                    elements.push(parse_element(&start, xml));
                }
                Event::End(_) => {
                    open.pop();
                }
                Event::Text(text) => {
                    let content = match text.unescape() {
                        Ok(content) => content,
                        Err(err) => panic!("bad text content: {} in:\n{}", err, xml),
                    };
                    assert!(
                        !open.is_empty() || content.trim().is_empty(),
                        "text outside the root element in:\n{}",
                        xml
                    );
                }
                Event::Eof => break,
                _ => {}
            }
        }

        assert!(open.is_empty(), "unclosed elements {:?} in:\n{}", open, xml);
        assert_eq!(roots, 1, "expected exactly one root element in:\n{}", xml);
        elements
    }

    /// Number of `name` elements, self-closing included
    pub fn count_elements(xml: &str, name: &str) -> usize {
        Self::parse_elements(xml)
            .iter()
            .filter(|e| e.name == name)
            .count()
    }

    /// Assert that `xml` is a well-formed document
    pub fn assert_well_formed(xml: &str) {
        Self::parse_elements(xml);
    }

    /// Assert that exactly one `<attribute>` element has `name="attribute"`
    pub fn assert_attribute_once(xml: &str, attribute: &str) {
        let count = Self::parse_elements(xml)
            .iter()
            .filter(|e| e.name == "attribute" && e.attribute("name") == Some(attribute))
            .count();
        assert_eq!(
            count, 1,
            "expected exactly one <attribute name=\"{}\"> in:\n{}",
            attribute, xml
        );
    }
}

fn parse_element(start: &BytesStart<'_>, xml: &str) -> XmlElement {
    let name = String::from_utf8_lossy(start.name().as_ref()).into_owned();
    let attributes = start
        .attributes()
        .map(|attr| {
            let attr = match attr {
                Ok(attr) => attr,
                Err(err) => panic!("bad attribute on <{}>: {} in:\n{}", name, err, xml),
            };
            let value = match attr.unescape_value() {
                Ok(value) => value.into_owned(),
                Err(err) => panic!("bad attribute value on <{}>: {} in:\n{}", name, err, xml),
            };
            (String::from_utf8_lossy(attr.key.as_ref()).into_owned(), value)
        })
        .collect();
    XmlElement { name, attributes }
}
