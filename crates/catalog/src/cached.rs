// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Cached Catalog
//!
//! Memoizing wrapper around another [`MetadataCatalog`]. Entity lists are cached
//! per environment, attribute lists per (environment, entity). Failed lookups
//! are never cached.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

use crate::metadata::{AttributeSuggestion, EntitySuggestion};
use crate::{CatalogResult, MetadataCatalog};

type AttributeKey = (String, String);

/// Memoizing catalog wrapper
pub struct CachedCatalog {
    inner: Arc<dyn MetadataCatalog>,
    entities: RwLock<HashMap<String, Arc<Vec<EntitySuggestion>>>>,
    attributes: RwLock<HashMap<AttributeKey, Arc<Vec<AttributeSuggestion>>>>,
}

impl CachedCatalog {
    pub fn new(inner: Arc<dyn MetadataCatalog>) -> Self {
        Self {
            inner,
            entities: RwLock::new(HashMap::new()),
            attributes: RwLock::new(HashMap::new()),
        }
    }

    fn attribute_key(environment_id: &str, entity_logical_name: &str) -> AttributeKey {
        (
            environment_id.to_string(),
            entity_logical_name.to_ascii_lowercase(),
        )
    }

    /// Drop everything cached for one environment
    pub async fn invalidate_environment(&self, environment_id: &str) {
        self.entities.write().await.remove(environment_id);
        self.attributes
            .write()
            .await
            .retain(|(env, _), _| env != environment_id);
    }

    /// Drop the cached attributes of one entity
    pub async fn invalidate_entity(&self, environment_id: &str, entity_logical_name: &str) {
        self.attributes
            .write()
            .await
            .remove(&Self::attribute_key(environment_id, entity_logical_name));
    }

    /// Drop the whole cache
    pub async fn clear(&self) {
        self.entities.write().await.clear();
        self.attributes.write().await.clear();
    }
}

#[async_trait]
impl MetadataCatalog for CachedCatalog {
    async fn get_entity_suggestions(
        &self,
        environment_id: &str,
    ) -> CatalogResult<Vec<EntitySuggestion>> {
        if let Some(cached) = self.entities.read().await.get(environment_id) {
            return Ok(cached.as_ref().clone());
        }

        debug!(environment_id, "entity cache miss");
        let fetched = Arc::new(self.inner.get_entity_suggestions(environment_id).await?);
        self.entities
            .write()
            .await
            .insert(environment_id.to_string(), fetched.clone());
        Ok(fetched.as_ref().clone())
    }

    async fn get_attribute_suggestions(
        &self,
        environment_id: &str,
        entity_logical_name: &str,
    ) -> CatalogResult<Vec<AttributeSuggestion>> {
        let key = Self::attribute_key(environment_id, entity_logical_name);
        if let Some(cached) = self.attributes.read().await.get(&key) {
            return Ok(cached.as_ref().clone());
        }

        debug!(environment_id, entity = entity_logical_name, "attribute cache miss");
        let fetched = Arc::new(
            self.inner
                .get_attribute_suggestions(environment_id, entity_logical_name)
                .await?,
        );
        self.attributes.write().await.insert(key, fetched.clone());
        Ok(fetched.as_ref().clone())
    }
}
