// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Completion rendering
//!
//! This module converts catalog entries, keywords and FetchXML schema names
//! into editor-agnostic completion items.

use dataverse_sql_catalog::{AttributeSuggestion, EntitySuggestion};
use dataverse_sql_context::SqlKeyword;
use serde::Serialize;

use crate::config::KeywordCasing;

/// What a completion item inserts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum CompletionItemKind {
    Entity,
    Attribute,
    Keyword,
    Element,
    XmlAttribute,
    Value,
}

/// One completion candidate, already in display order
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletionItem {
    pub label: String,
    pub kind: CompletionItemKind,
    pub detail: Option<String>,
    pub documentation: Option<String>,
    /// Zero-padded position, so clients that re-sort keep our order
    pub sort_text: String,
}

impl CompletionItem {
    pub fn new(label: impl Into<String>, kind: CompletionItemKind) -> Self {
        Self {
            label: label.into(),
            kind,
            detail: None,
            documentation: None,
            sort_text: String::new(),
        }
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    pub fn with_documentation(mut self, documentation: impl Into<String>) -> Self {
        self.documentation = Some(documentation.into());
        self
    }
}

/// Completion renderer
///
/// Converts ranked candidates to [`CompletionItem`]s.
pub struct CompletionRenderer;

impl CompletionRenderer {
    /// Render entity completion items
    ///
    /// The detail shows the display name and marks custom entities.
    pub fn render_entities(entities: &[EntitySuggestion]) -> Vec<CompletionItem> {
        entities
            .iter()
            .map(|entity| {
                let mut item = CompletionItem::new(&entity.logical_name, CompletionItemKind::Entity);
                let detail = match (&entity.display_name, entity.is_custom) {
                    (Some(display), true) => Some(format!("{} (custom)", display)),
                    (Some(display), false) => Some(display.clone()),
                    (None, true) => Some("custom".to_string()),
                    (None, false) => None,
                };
                item.detail = detail;
                item
            })
            .collect()
    }

    /// Render attribute completion items
    ///
    /// # Examples
    ///
    /// ```ignore
    /// let items = CompletionRenderer::render_attributes(&attributes);
    /// assert_eq!(items[0].detail.as_deref(), Some("String"));
    /// ```
    pub fn render_attributes(attributes: &[AttributeSuggestion]) -> Vec<CompletionItem> {
        attributes
            .iter()
            .map(|attribute| {
                let item = CompletionItem::new(&attribute.logical_name, CompletionItemKind::Attribute)
                    .with_detail(attribute.attribute_type.label());
                let documentation = match (&attribute.display_name, &attribute.attribute_of) {
                    (Some(display), Some(parent)) => Some(format!("{}\n\nName of lookup '{}'", display, parent)),
                    (None, Some(parent)) => Some(format!("Name of lookup '{}'", parent)),
                    (Some(display), None) => Some(display.clone()),
                    (None, None) => None,
                };
                CompletionItem {
                    documentation,
                    ..item
                }
            })
            .collect()
    }

    /// Render keyword completion items, ordered by `sort_priority`
    pub fn render_keywords(keywords: &[SqlKeyword], casing: KeywordCasing) -> Vec<CompletionItem> {
        let mut keywords: Vec<&SqlKeyword> = keywords.iter().collect();
        keywords.sort_by_key(|k| k.sort_priority);
        keywords
            .into_iter()
            .map(|keyword| {
                let item = CompletionItem::new(casing.apply(&keyword.label), CompletionItemKind::Keyword);
                match &keyword.description {
                    Some(description) => item.with_documentation(description),
                    None => item,
                }
            })
            .collect()
    }

    /// Render plain names (elements, XML attributes, enumerated values)
    pub fn render_names<S: AsRef<str>>(names: &[S], kind: CompletionItemKind) -> Vec<CompletionItem> {
        names
            .iter()
            .map(|name| CompletionItem::new(name.as_ref(), kind))
            .collect()
    }

    /// Truncate to `max` items and number them
    pub fn finish(mut items: Vec<CompletionItem>, max: usize) -> Vec<CompletionItem> {
        items.truncate(max);
        for (index, item) in items.iter_mut().enumerate() {
            item.sort_text = format!("{:04}", index);
        }
        items
    }
}
