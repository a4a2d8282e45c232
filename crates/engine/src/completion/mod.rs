// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Completion module
//!
//! This module turns a detected context into ranked completion items.
//!
//! ## Architecture
//!
//! - `ranking`: exact / prefix / other tiers, alphabetical inside a tier
//! - `render`: converts catalog entries and keywords to completion items
//! - `tracker`: per-document last-write-wins cancellation
//! - `error`: Error types for completion operations
//!
//! ## Flow
//!
//! ```text
//! 1. Editor sends (text, offset, environment) with a cancellation token
//!    ↓
//! 2. detect_sql_context / detect_fetchxml_context (sync, total)
//!    ↓
//! 3. Metadata lookup if the context needs one (async; cancellation
//!    checked before and after)
//!    ↓
//! 4. rank + render
//! ```

pub mod error;
pub mod ranking;
pub mod render;
pub mod tracker;

use std::sync::Arc;

use dataverse_sql_catalog::{AttributeSuggestion, EntitySuggestion, MetadataCatalog};
use dataverse_sql_context::{
    FetchXmlContext, SqlContext, ValueKind, detect_fetchxml_context, detect_sql_context,
    fetchxml_completion_prefix, sql_completion_prefix, value_kind, value_suggestions,
};
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};

use crate::config::EngineConfig;

pub use error::{CompletionError, CompletionResult};
pub use ranking::{MatchTier, match_tier, rank, rank_names};
pub use render::{CompletionItem, CompletionItemKind, CompletionRenderer};
pub use tracker::{CompletionRequestTracker, RequestTicket};

/// One keystroke-driven completion request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletionRequest {
    pub document_text: String,
    /// Byte offset of the cursor in `document_text`
    pub cursor_offset: usize,
    /// Empty to use the configured default environment
    #[serde(default)]
    pub environment_id: String,
}

impl CompletionRequest {
    pub fn new(document_text: impl Into<String>, cursor_offset: usize) -> Self {
        Self {
            document_text: document_text.into(),
            cursor_offset,
            environment_id: String::new(),
        }
    }

    /// Cursor at the end of the text
    pub fn at_end(document_text: impl Into<String>) -> Self {
        let document_text = document_text.into();
        let cursor_offset = document_text.len();
        Self::new(document_text, cursor_offset)
    }

    pub fn with_environment(mut self, environment_id: impl Into<String>) -> Self {
        self.environment_id = environment_id.into();
        self
    }
}

/// Completion engine
///
/// Orchestrates the completion flow from context detection to rendering.
pub struct CompletionEngine {
    catalog: Arc<dyn MetadataCatalog>,
    config: EngineConfig,
}

impl CompletionEngine {
    /// Create a new completion engine
    ///
    /// # Arguments
    ///
    /// * `catalog` - The catalog to use for fetching metadata
    pub fn new(catalog: Arc<dyn MetadataCatalog>) -> Self {
        Self::with_config(catalog, EngineConfig::default())
    }

    /// Create an engine with explicit configuration
    ///
    /// The catalog is wrapped in a cache when `config.cache_enabled` is set.
    pub fn with_config(catalog: Arc<dyn MetadataCatalog>, config: EngineConfig) -> Self {
        Self {
            catalog: config.catalog(catalog),
            config,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Complete at the cursor of a SQL document
    ///
    /// # Returns
    ///
    /// - `Ok(items)` - Ranked items, possibly empty
    /// - `Err(CompletionError::Cancelled)` - A newer request superseded this one
    /// - `Err(e)` - Metadata lookup failed
    ///
    /// # Examples
    ///
    /// ```ignore
    /// let engine = CompletionEngine::new(catalog);
    /// let request = CompletionRequest::at_end("SELECT name FROM ").with_environment("env-1");
    /// match engine.complete_sql(&request, &CancellationToken::new()).await {
    ///     Ok(items) => { /* show items */ }
    ///     Err(e) if e.should_return_empty() => { /* show nothing */ }
    ///     Err(e) => { /* report */ }
    /// }
    /// ```
    pub async fn complete_sql(
        &self,
        request: &CompletionRequest,
        cancel: &CancellationToken,
    ) -> CompletionResult<Vec<CompletionItem>> {
        ensure_live(cancel)?;

        let text = &request.document_text;
        let context = detect_sql_context(text, request.cursor_offset);
        let prefix = sql_completion_prefix(text, request.cursor_offset);
        debug!(?context, prefix, "SQL completion context");

        let items = match context {
            SqlContext::Entity => {
                let entities = self.fetch_entities(request, cancel).await?;
                self.entity_items(entities, prefix)
            }
            SqlContext::Attribute { entity_name } => {
                let attributes = self.fetch_attributes(request, &entity_name, cancel).await?;
                attribute_items(attributes, prefix)
            }
            SqlContext::Keyword { suggested_keywords } => {
                let keywords: Vec<_> = suggested_keywords
                    .into_iter()
                    .filter(|k| k.label.to_lowercase().starts_with(&prefix.to_lowercase()))
                    .collect();
                CompletionRenderer::render_keywords(&keywords, self.config.keyword_casing)
            }
        };

        Ok(CompletionRenderer::finish(items, self.config.max_completion_items))
    }

    /// Complete at the cursor of a FetchXML document
    pub async fn complete_fetchxml(
        &self,
        request: &CompletionRequest,
        cancel: &CancellationToken,
    ) -> CompletionResult<Vec<CompletionItem>> {
        ensure_live(cancel)?;

        let text = &request.document_text;
        let context = detect_fetchxml_context(text, request.cursor_offset);
        let prefix = fetchxml_completion_prefix(text, request.cursor_offset);
        debug!(?context, prefix, "FetchXML completion context");

        let items = match context {
            FetchXmlContext::Element { suggested_elements } => CompletionRenderer::render_names(
                &rank_names(suggested_elements, prefix),
                CompletionItemKind::Element,
            ),
            FetchXmlContext::AttributeName {
                suggested_attributes,
                ..
            } => CompletionRenderer::render_names(
                &rank_names(suggested_attributes, prefix),
                CompletionItemKind::XmlAttribute,
            ),
            FetchXmlContext::AttributeValue {
                element,
                attribute,
                entity_context,
            } => match value_kind(&element, &attribute) {
                ValueKind::Entity => {
                    let entities = self.fetch_entities(request, cancel).await?;
                    self.entity_items(entities, prefix)
                }
                ValueKind::Attribute => match entity_context {
                    Some(entity) => {
                        let attributes = self.fetch_attributes(request, &entity, cancel).await?;
                        attribute_items(attributes, prefix)
                    }
                    None => {
                        trace!(%element, %attribute, "no entity context for attribute value");
                        Vec::new()
                    }
                },
                ValueKind::Enumerated => {
                    // Enumerations keep their schema order
                    let values: Vec<&str> = value_suggestions(&element, &attribute)
                        .iter()
                        .copied()
                        .filter(|v| match_tier(prefix, v, None).is_some())
                        .collect();
                    CompletionRenderer::render_names(&values, CompletionItemKind::Value)
                }
                ValueKind::Free => Vec::new(),
            },
            FetchXmlContext::None => Vec::new(),
        };

        Ok(CompletionRenderer::finish(items, self.config.max_completion_items))
    }

    fn environment<'a>(&'a self, request: &'a CompletionRequest) -> CompletionResult<&'a str> {
        self.config
            .resolve_environment(&request.environment_id)
            .ok_or(CompletionError::NoEnvironment)
    }

    async fn fetch_entities(
        &self,
        request: &CompletionRequest,
        cancel: &CancellationToken,
    ) -> CompletionResult<Vec<EntitySuggestion>> {
        let environment = self.environment(request)?;
        ensure_live(cancel)?;
        let entities = self.catalog.get_entity_suggestions(environment).await?;
        ensure_live(cancel)?;
        Ok(entities)
    }

    async fn fetch_attributes(
        &self,
        request: &CompletionRequest,
        entity: &str,
        cancel: &CancellationToken,
    ) -> CompletionResult<Vec<AttributeSuggestion>> {
        let environment = self.environment(request)?;
        ensure_live(cancel)?;
        let attributes = self
            .catalog
            .get_attribute_suggestions(environment, entity)
            .await?;
        ensure_live(cancel)?;
        Ok(attributes)
    }

    fn entity_items(&self, entities: Vec<EntitySuggestion>, prefix: &str) -> Vec<CompletionItem> {
        let entities: Vec<_> = entities
            .into_iter()
            .filter(|e| !self.config.custom_entities_only || e.is_custom)
            .collect();
        let ranked = rank(entities, prefix, |e| {
            (e.logical_name.as_str(), e.display_name.as_deref())
        });
        CompletionRenderer::render_entities(&ranked)
    }
}

fn attribute_items(attributes: Vec<AttributeSuggestion>, prefix: &str) -> Vec<CompletionItem> {
    let ranked = rank(attributes, prefix, |a| {
        (a.logical_name.as_str(), a.display_name.as_deref())
    });
    CompletionRenderer::render_attributes(&ranked)
}

fn ensure_live(cancel: &CancellationToken) -> CompletionResult<()> {
    if cancel.is_cancelled() {
        debug!("completion request cancelled");
        return Err(CompletionError::Cancelled);
    }
    Ok(())
}
