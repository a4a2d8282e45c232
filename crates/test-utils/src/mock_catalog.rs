// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Mock metadata catalog for testing
//!
//! Provides an in-memory catalog with builder pattern for easy test setup

use std::sync::atomic::{AtomicUsize, Ordering};

use dataverse_sql_catalog::{
    AttributeSuggestion, AttributeType, CatalogError, CatalogResult, EntitySuggestion,
    MetadataCatalog,
};

#[derive(Debug, Clone)]
struct MockEntity {
    entity: EntitySuggestion,
    attributes: Vec<AttributeSuggestion>,
}

/// In-memory mock catalog for testing
///
/// Serves the same schema for every environment and counts metadata calls.
#[derive(Debug, Default)]
pub struct MockCatalog {
    entities: Vec<MockEntity>,
    failure: Option<CatalogError>,
    calls: AtomicUsize,
}

impl MockCatalog {
    /// Create a new empty mock catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an entity with its attributes, replacing one of the same name
    pub fn add_entity(mut self, entity: EntitySuggestion, attributes: Vec<AttributeSuggestion>) -> Self {
        self.entities
            .retain(|e| !e.entity.logical_name.eq_ignore_ascii_case(&entity.logical_name));
        self.entities.push(MockEntity { entity, attributes });
        self
    }

    /// Number of metadata requests served (including failed ones)
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn record_call(&self) -> CatalogResult<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.failure {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }
}

#[async_trait::async_trait]
impl MetadataCatalog for MockCatalog {
    async fn get_entity_suggestions(
        &self,
        _environment_id: &str,
    ) -> CatalogResult<Vec<EntitySuggestion>> {
        self.record_call()?;
        Ok(self.entities.iter().map(|e| e.entity.clone()).collect())
    }

    async fn get_attribute_suggestions(
        &self,
        environment_id: &str,
        entity_logical_name: &str,
    ) -> CatalogResult<Vec<AttributeSuggestion>> {
        self.record_call()?;
        self.entities
            .iter()
            .find(|e| e.entity.logical_name.eq_ignore_ascii_case(entity_logical_name))
            .map(|e| e.attributes.clone())
            .ok_or_else(|| {
                CatalogError::EntityNotFound(
                    entity_logical_name.to_string(),
                    environment_id.to_string(),
                )
            })
    }
}

/// Builder for creating mock catalogs with a fluent API
pub struct MockCatalogBuilder {
    catalog: MockCatalog,
}

impl Default for MockCatalogBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl MockCatalogBuilder {
    /// Create a new builder
    pub fn new() -> Self {
        Self {
            catalog: MockCatalog::new(),
        }
    }

    /// Add the standard test schema (account, contact and systemuser)
    ///
    /// `account` carries two virtual columns: `primarycontactidname` and
    /// `industrycodename`.
    pub fn with_standard_schema(mut self) -> Self {
        self.catalog = self
            .catalog
            .add_entity(
                EntitySuggestion::new("account")
                    .with_display_name("Account")
                    .with_primary_id("accountid")
                    .with_primary_name("name"),
                vec![
                    AttributeSuggestion::new("accountid", AttributeType::Uniqueidentifier)
                        .with_display_name("Account"),
                    AttributeSuggestion::new("name", AttributeType::String)
                        .with_display_name("Account Name"),
                    AttributeSuggestion::new("accountnumber", AttributeType::String)
                        .with_display_name("Account Number"),
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
                    AttributeSuggestion::new("ownerid", AttributeType::Owner)
                        .with_display_name("Owner"),
                ],
            )
            .add_entity(
                EntitySuggestion::new("contact")
                    .with_display_name("Contact")
                    .with_primary_id("contactid")
                    .with_primary_name("fullname"),
                vec![
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
            )
            .add_entity(
                EntitySuggestion::new("systemuser")
                    .with_display_name("User")
                    .with_primary_id("systemuserid")
                    .with_primary_name("fullname"),
                vec![
                    AttributeSuggestion::new("systemuserid", AttributeType::Uniqueidentifier)
                        .with_display_name("User"),
                    AttributeSuggestion::new("fullname", AttributeType::String)
                        .with_display_name("Full Name"),
                    AttributeSuggestion::new("domainname", AttributeType::String)
                        .with_display_name("User Name"),
                ],
            );

        self
    }

    /// Add a custom entity
    pub fn with_entity(
        mut self,
        entity: EntitySuggestion,
        attributes: Vec<AttributeSuggestion>,
    ) -> Self {
        self.catalog = self.catalog.add_entity(entity, attributes);
        self
    }

    /// Add bare entities by logical name, without attributes
    pub fn with_entity_names(mut self, names: &[&str]) -> Self {
        for name in names {
            self.catalog = self.catalog.add_entity(EntitySuggestion::new(*name), Vec::new());
        }
        self
    }

    /// Make every metadata request fail with `error`
    pub fn with_failure(mut self, error: CatalogError) -> Self {
        self.catalog.failure = Some(error);
        self
    }

    /// Build the mock catalog
    pub fn build(self) -> MockCatalog {
        self.catalog
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_catalog_entities() {
        let catalog = MockCatalogBuilder::new().with_standard_schema().build();

        let entities = catalog.get_entity_suggestions("env").await.unwrap();
        let names: Vec<&str> = entities.iter().map(|e| e.logical_name.as_str()).collect();
        assert_eq!(names, vec!["account", "contact", "systemuser"]);
        assert_eq!(catalog.call_count(), 1);
    }

    #[tokio::test]
    async fn test_mock_catalog_virtual_columns() {
        let catalog = MockCatalogBuilder::new().with_standard_schema().build();

        let attributes = catalog.get_attribute_suggestions("env", "ACCOUNT").await.unwrap();
        let virtuals: Vec<_> = attributes
            .iter()
            .filter(|a| a.is_virtual())
            .map(|a| a.attribute_of.as_deref())
            .collect();
        assert_eq!(virtuals, vec![Some("primarycontactid"), Some("industrycode")]);
    }

    #[tokio::test]
    async fn test_mock_catalog_unknown_entity() {
        let catalog = MockCatalogBuilder::new().with_standard_schema().build();
        let err = catalog.get_attribute_suggestions("env", "lead").await.unwrap_err();
        assert_eq!(err, CatalogError::EntityNotFound("lead".into(), "env".into()));
    }

    #[tokio::test]
    async fn test_mock_catalog_failure() {
        let catalog = MockCatalogBuilder::new()
            .with_standard_schema()
            .with_failure(CatalogError::Timeout(5))
            .build();

        assert_eq!(
            catalog.get_entity_suggestions("env").await,
            Err(CatalogError::Timeout(5))
        );
        assert_eq!(catalog.call_count(), 1);
    }
}
