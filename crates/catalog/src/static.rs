// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Static Catalog
//!
//! This module provides a static catalog backed by predefined schema data,
//! either the built-in sample schema or a JSON/YAML schema file.
//!
//! ## Schema file format
//!
//! ```yaml
//! entities:
//!   - logicalName: account
//!     displayName: Account
//!     primaryIdAttribute: accountid
//!     attributes:
//!       - logicalName: primarycontactid
//!         attributeType: Lookup
//!       - logicalName: primarycontactidname
//!         attributeType: Virtual
//!         attributeOf: primarycontactid
//! ```
//!
//! The same schema is served for every environment id.

use async_trait::async_trait;
use serde::Deserialize;
use std::path::Path;

use crate::metadata::{AttributeSuggestion, AttributeType, EntitySuggestion};
use crate::{CatalogError, CatalogResult, MetadataCatalog};

#[derive(Debug, Clone, Deserialize)]
struct SchemaFile {
    #[serde(default)]
    entities: Vec<SchemaEntity>,
}

#[derive(Debug, Clone, Deserialize)]
struct SchemaEntity {
    #[serde(flatten)]
    entity: EntitySuggestion,
    #[serde(default)]
    attributes: Vec<AttributeSuggestion>,
}

/// Static catalog with predefined schema data
///
/// Used by the CLI and by tests that don't need a live environment.
#[derive(Debug, Clone, Default)]
pub struct StaticCatalog {
    entities: Vec<SchemaEntity>,
}

impl StaticCatalog {
    /// Create an empty catalog
    pub fn empty() -> Self {
        Self::default()
    }

    /// Create a catalog with the built-in sample schema (account, contact)
    pub fn sample() -> Self {
        let account = SchemaEntity {
            entity: EntitySuggestion::new("account")
                .with_display_name("Account")
                .with_primary_id("accountid")
                .with_primary_name("name"),
            attributes: vec![
                AttributeSuggestion::new("accountid", AttributeType::Uniqueidentifier)
                    .with_display_name("Account"),
                AttributeSuggestion::new("name", AttributeType::String)
                    .with_display_name("Account Name"),
                AttributeSuggestion::new("revenue", AttributeType::Money)
                    .with_display_name("Annual Revenue"),
                AttributeSuggestion::new("primarycontactid", AttributeType::Lookup)
                    .with_display_name("Primary Contact"),
                AttributeSuggestion::new("primarycontactidname", AttributeType::Virtual)
                    .virtual_of("primarycontactid"),
                AttributeSuggestion::new("industrycode", AttributeType::Picklist)
                    .with_display_name("Industry"),
                AttributeSuggestion::new("industrycodename", AttributeType::Virtual)
                    .virtual_of("industrycode"),
                AttributeSuggestion::new("statecode", AttributeType::State)
                    .with_display_name("Status"),
                AttributeSuggestion::new("createdon", AttributeType::DateTime)
                    .with_display_name("Created On"),
            ],
        };

        let contact = SchemaEntity {
            entity: EntitySuggestion::new("contact")
                .with_display_name("Contact")
                .with_primary_id("contactid")
                .with_primary_name("fullname"),
            attributes: vec![
                AttributeSuggestion::new("contactid", AttributeType::Uniqueidentifier)
                    .with_display_name("Contact"),
                AttributeSuggestion::new("fullname", AttributeType::String)
                    .with_display_name("Full Name"),
                AttributeSuggestion::new("emailaddress1", AttributeType::String)
                    .with_display_name("Email"),
                AttributeSuggestion::new("parentcustomerid", AttributeType::Customer)
                    .with_display_name("Company Name"),
                AttributeSuggestion::new("parentcustomeridname", AttributeType::Virtual)
                    .virtual_of("parentcustomerid"),
            ],
        };

        Self {
            entities: vec![account, contact],
        }
    }

    /// Load a catalog from JSON schema text
    pub fn from_json(text: &str) -> CatalogResult<Self> {
        let schema: SchemaFile = serde_json::from_str(text)
            .map_err(|e| CatalogError::SerializationError(e.to_string()))?;
        Ok(Self {
            entities: schema.entities,
        })
    }

    /// Load a catalog from YAML schema text
    pub fn from_yaml(text: &str) -> CatalogResult<Self> {
        let schema: SchemaFile = serde_yaml::from_str(text)
            .map_err(|e| CatalogError::SerializationError(e.to_string()))?;
        Ok(Self {
            entities: schema.entities,
        })
    }

    /// Load a catalog from a `.json`, `.yaml` or `.yml` file
    pub fn from_file(path: impl AsRef<Path>) -> CatalogResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| CatalogError::SerializationError(format!("{}: {}", path.display(), e)))?;

        match path.extension().and_then(|e| e.to_str()) {
            Some("yaml") | Some("yml") => Self::from_yaml(&text),
            _ => Self::from_json(&text),
        }
    }

    fn find_entity(&self, logical_name: &str) -> Option<&SchemaEntity> {
        self.entities
            .iter()
            .find(|e| e.entity.logical_name.eq_ignore_ascii_case(logical_name))
    }
}

#[async_trait]
impl MetadataCatalog for StaticCatalog {
    async fn get_entity_suggestions(
        &self,
        _environment_id: &str,
    ) -> CatalogResult<Vec<EntitySuggestion>> {
        Ok(self.entities.iter().map(|e| e.entity.clone()).collect())
    }

    async fn get_attribute_suggestions(
        &self,
        environment_id: &str,
        entity_logical_name: &str,
    ) -> CatalogResult<Vec<AttributeSuggestion>> {
        self.find_entity(entity_logical_name)
            .map(|e| e.attributes.clone())
            .ok_or_else(|| {
                CatalogError::EntityNotFound(
                    entity_logical_name.to_string(),
                    environment_id.to_string(),
                )
            })
    }
}
