// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # FetchXML completion context
//!
//! Walks the text before the cursor keeping a stack of open elements, then
//! classifies the cursor by where it sits inside the nearest unclosed `<`:
//! in the tag name, in the attribute area, or inside a quoted value.
//!
//! Malformed input never aborts the walk. A start tag that is interrupted by
//! another `<` stays open, closing tags pop back to their nearest matching
//! opener and unmatched closers are ignored.

use std::collections::HashMap;

use serde::Serialize;
use tracing::trace;

use crate::fetchxml_schema::{child_elements, element_attributes};
use crate::sql_context::clamp_offset;

/// What to complete at a FetchXML cursor position
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum FetchXmlContext {
    /// Element name after `<`
    #[serde(rename_all = "camelCase")]
    Element { suggested_elements: Vec<String> },
    /// Attribute name inside a start tag
    #[serde(rename_all = "camelCase")]
    AttributeName {
        element: String,
        suggested_attributes: Vec<String>,
    },
    /// Quoted attribute value
    #[serde(rename_all = "camelCase")]
    AttributeValue {
        element: String,
        attribute: String,
        /// Entity whose attributes apply here, if its name has been typed
        entity_context: Option<String>,
    },
    /// Text content, closing tags, comments and declarations
    None,
}

#[derive(Debug, Clone)]
struct OpenElement {
    name: String,
    attributes: Vec<(String, String)>,
}

impl OpenElement {
    fn attribute(&self, name: &str) -> Option<&str> {
        lookup(&self.attributes, name)
    }

    fn is_entity(&self) -> bool {
        self.name == "entity" || self.name == "link-entity"
    }
}

fn lookup<'a>(attributes: &'a [(String, String)], name: &str) -> Option<&'a str> {
    attributes
        .iter()
        .find(|(key, _)| key == name)
        .map(|(_, value)| value.as_str())
}

fn is_name_char(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, '-' | '_' | ':' | '.')
}

enum TagEnd {
    /// Index of the closing `>`
    Closed(usize),
    /// Interrupted by a `<` at this index
    Broken(usize),
    /// Ran to the end of the scanned text
    Open,
}

/// Find the end of a start tag body, skipping quoted values
fn find_tag_end(body: &str) -> TagEnd {
    let mut quote: Option<char> = None;
    for (i, c) in body.char_indices() {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '"' | '\'') => quote = Some(c),
            (None, '>') => return TagEnd::Closed(i),
            (None, '<') => return TagEnd::Broken(i),
            _ => {}
        }
    }
    TagEnd::Open
}

/// Element name and attributes of a start tag body (text after `<`)
///
/// An unterminated value runs to the end of `body`.
fn parse_tag(body: &str) -> (String, Vec<(String, String)>) {
    let name_end = body
        .char_indices()
        .find(|&(_, c)| !is_name_char(c))
        .map_or(body.len(), |(i, _)| i);
    let name = body[..name_end].to_string();

    let mut attributes = Vec::new();
    let mut rest = &body[name_end..];
    loop {
        rest = rest.trim_start_matches(|c: char| c.is_whitespace() || c == '/');
        let key_end = rest
            .char_indices()
            .find(|&(_, c)| !is_name_char(c))
            .map_or(rest.len(), |(i, _)| i);
        if key_end == 0 {
            break;
        }
        let key = rest[..key_end].to_string();
        rest = rest[key_end..].trim_start();
        let Some(after_eq) = rest.strip_prefix('=') else {
            continue;
        };
        rest = after_eq.trim_start();
        let Some(quote) = rest.chars().next().filter(|c| *c == '"' || *c == '\'') else {
            break;
        };
        let value_body = &rest[1..];
        match value_body.find(quote) {
            Some(end) => {
                attributes.push((key, value_body[..end].to_string()));
                rest = &value_body[end + 1..];
            }
            None => {
                attributes.push((key, value_body.to_string()));
                break;
            }
        }
    }
    (name, attributes)
}

/// Where the cursor sits inside a start tag body
enum TagPosition {
    Name,
    AttributeName { present: Vec<String> },
    AttributeValue { attribute: String },
    /// After `=` with no opening quote
    Unquoted,
}

fn classify_in_tag(partial: &str) -> TagPosition {
    if partial.chars().all(is_name_char) {
        return TagPosition::Name;
    }
    let name_end = partial
        .char_indices()
        .find(|&(_, c)| !is_name_char(c))
        .map_or(partial.len(), |(i, _)| i);

    let mut present = Vec::new();
    let mut rest = &partial[name_end..];
    loop {
        rest = rest.trim_start_matches(|c: char| c.is_whitespace() || c == '/');
        let key_end = rest
            .char_indices()
            .find(|&(_, c)| !is_name_char(c))
            .map_or(rest.len(), |(i, _)| i);
        let key = &rest[..key_end];
        rest = &rest[key_end..];
        if rest.is_empty() {
            // Typing an attribute name, or between attributes
            return TagPosition::AttributeName { present };
        }
        let trimmed = rest.trim_start();
        let Some(after_eq) = trimmed.strip_prefix('=') else {
            if key.is_empty() {
                // Stray character; skip it
                let mut chars = trimmed.chars();
                chars.next();
                rest = chars.as_str();
            } else {
                present.push(key.to_string());
                rest = trimmed;
                if rest.is_empty() {
                    return TagPosition::AttributeName { present };
                }
            }
            continue;
        };
        let value = after_eq.trim_start();
        let Some(quote) = value.chars().next() else {
            return TagPosition::Unquoted;
        };
        if quote != '"' && quote != '\'' {
            return TagPosition::Unquoted;
        }
        match value[1..].find(quote) {
            Some(end) => {
                present.push(key.to_string());
                rest = &value[1 + end + 1..];
            }
            None => {
                return TagPosition::AttributeValue {
                    attribute: key.to_string(),
                };
            }
        }
    }
}

/// Detect the completion context at byte `offset` of `text`
///
/// Total: any text and any offset yield a context.
pub fn detect_fetchxml_context(text: &str, offset: usize) -> FetchXmlContext {
    let offset = clamp_offset(text, offset);
    let scanned = &text[..offset];

    let mut stack: Vec<OpenElement> = Vec::new();
    // link-entity alias -> entity name
    let mut aliases: HashMap<String, String> = HashMap::new();
    let mut pos = 0;

    while let Some(found) = scanned[pos..].find('<') {
        let start = pos + found;
        let rest = &scanned[start..];

        let skip_past = |terminator: &str| rest.find(terminator).map(|i| start + i + terminator.len());
        if rest.starts_with("<!--") {
            match skip_past("-->") {
                Some(next) => pos = next,
                None => return FetchXmlContext::None,
            }
            continue;
        }
        if rest.starts_with("<![CDATA[") {
            match skip_past("]]>") {
                Some(next) => pos = next,
                None => return FetchXmlContext::None,
            }
            continue;
        }
        if rest.starts_with("<?") || rest.starts_with("<!") {
            match skip_past(">") {
                Some(next) => pos = next,
                None => return FetchXmlContext::None,
            }
            continue;
        }
        if let Some(closing) = rest.strip_prefix("</") {
            let Some(end) = closing.find('>') else {
                return FetchXmlContext::None;
            };
            let name = closing[..end].trim();
            if let Some(index) = stack.iter().rposition(|e| e.name == name) {
                stack.truncate(index);
            }
            pos = start + 2 + end + 1;
            continue;
        }

        let body = &rest[1..];
        match find_tag_end(body) {
            TagEnd::Closed(end) => {
                let self_closing = body[..end].trim_end().ends_with('/');
                let element = open_element(&body[..end], &mut aliases);
                if !self_closing {
                    stack.push(element);
                }
                pos = start + 1 + end + 1;
            }
            TagEnd::Broken(end) => {
                stack.push(open_element(&body[..end], &mut aliases));
                pos = start + 1 + end;
            }
            TagEnd::Open => {
                return classify_open_tag(text, start, body, &stack, &aliases);
            }
        }
    }

    trace!(offset, "cursor in FetchXML text content");
    FetchXmlContext::None
}

fn open_element(body: &str, aliases: &mut HashMap<String, String>) -> OpenElement {
    let (name, attributes) = parse_tag(body);
    if name == "link-entity" {
        if let (Some(alias), Some(entity)) = (lookup(&attributes, "alias"), lookup(&attributes, "name")) {
            aliases.insert(alias.to_string(), entity.to_string());
        }
    }
    OpenElement { name, attributes }
}

fn classify_open_tag(
    text: &str,
    tag_start: usize,
    partial: &str,
    stack: &[OpenElement],
    aliases: &HashMap<String, String>,
) -> FetchXmlContext {
    let parent = stack.last().map(|e| e.name.as_str());

    match classify_in_tag(partial) {
        TagPosition::Name => FetchXmlContext::Element {
            suggested_elements: child_elements(parent)
                .iter()
                .map(|s| s.to_string())
                .collect(),
        },
        TagPosition::AttributeName { present } => {
            let (element, _) = parse_tag(partial);
            let suggested_attributes = element_attributes(&element)
                .iter()
                .filter(|a| !present.iter().any(|p| p == *a))
                .map(|s| s.to_string())
                .collect();
            FetchXmlContext::AttributeName {
                element,
                suggested_attributes,
            }
        }
        TagPosition::AttributeValue { attribute } => {
            // Read the whole tag, including what follows the cursor
            let whole = &text[tag_start + 1..];
            let whole = match find_tag_end(whole) {
                TagEnd::Closed(end) | TagEnd::Broken(end) => &whole[..end],
                TagEnd::Open => whole,
            };
            let (element, attributes) = parse_tag(whole);
            let entity_context = resolve_entity(&element, &attribute, &attributes, stack, aliases);
            trace!(%element, %attribute, ?entity_context, "cursor in FetchXML attribute value");
            FetchXmlContext::AttributeValue {
                element,
                attribute,
                entity_context,
            }
        }
        TagPosition::Unquoted => FetchXmlContext::None,
    }
}

fn resolve_entity(
    element: &str,
    attribute: &str,
    attributes: &[(String, String)],
    stack: &[OpenElement],
    aliases: &HashMap<String, String>,
) -> Option<String> {
    let nearest = || {
        stack
            .iter()
            .rev()
            .find(|e| e.is_entity())
            .and_then(|e| e.attribute("name"))
            .filter(|name| !name.is_empty())
            .map(str::to_string)
    };

    match (element, attribute) {
        ("link-entity", "from") => lookup(attributes, "name")
            .filter(|name| !name.is_empty())
            .map(str::to_string),
        ("condition", _) => match lookup(attributes, "entityname") {
            Some(alias) if attribute != "entityname" => aliases.get(alias).cloned(),
            _ => nearest(),
        },
        _ => nearest(),
    }
}

/// The partially typed name or value ending at the cursor
pub fn fetchxml_completion_prefix(text: &str, offset: usize) -> &str {
    let offset = clamp_offset(text, offset);
    let start = text[..offset]
        .char_indices()
        .rev()
        .take_while(|&(_, c)| !c.is_whitespace() && !matches!(c, '<' | '>' | '"' | '\'' | '=' | '/'))
        .last()
        .map_or(offset, |(i, _)| i);
    &text[start..offset]
}
