// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Catalog trait for Dataverse metadata
//!
//! This module defines the async read contract of the metadata cache.

use crate::error::CatalogResult;
use crate::metadata::{AttributeSuggestion, EntitySuggestion};

/// Read contract of the metadata cache
///
/// Implementations are expected to memoize; callers treat each returned list
/// as a read-only catalog valid for the duration of one request.
///
/// # Examples
///
/// ```rust,ignore
/// use dataverse_sql_catalog::{MetadataCatalog, CatalogError};
///
/// async fn custom_entities(catalog: &impl MetadataCatalog) -> Result<Vec<String>, CatalogError> {
///     let entities = catalog.get_entity_suggestions("env-1").await?;
///     Ok(entities.into_iter()
///         .filter(|e| e.is_custom)
///         .map(|e| e.logical_name)
///         .collect())
/// }
/// ```
#[async_trait::async_trait]
pub trait MetadataCatalog: Send + Sync {
    /// List all entities of an environment
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::ConnectionFailed` if the metadata endpoint is
    /// unreachable, `CatalogError::Timeout` if it does not answer in time.
    async fn get_entity_suggestions(
        &self,
        environment_id: &str,
    ) -> CatalogResult<Vec<EntitySuggestion>>;

    /// List the attributes of one entity
    ///
    /// # Arguments
    ///
    /// * `environment_id` - Environment the entity lives in
    /// * `entity_logical_name` - Entity logical name (matched case-insensitively)
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::EntityNotFound` if the entity doesn't exist.
    async fn get_attribute_suggestions(
        &self,
        environment_id: &str,
        entity_logical_name: &str,
    ) -> CatalogResult<Vec<AttributeSuggestion>>;
}
