// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Metadata types for Dataverse schema information
//!
//! This module defines the read-only catalog entries supplied by the metadata
//! cache: entities (queryable record types) and their attributes. The parser,
//! detectors and the virtual column pass only ever read these.

use serde::{Deserialize, Serialize};

/// Dataverse attribute type hint
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[non_exhaustive]
pub enum AttributeType {
    String,
    Memo,
    Integer,
    BigInt,
    Decimal,
    Double,
    Money,
    Boolean,
    DateTime,
    Lookup,
    Owner,
    Customer,
    Picklist,
    State,
    Status,
    Uniqueidentifier,
    /// Computed column with no storage of its own (e.g. a lookup's name)
    Virtual,
    /// Unknown/other type (with original type name)
    Other(String),
}

impl AttributeType {
    /// Short label shown next to completion items
    pub fn label(&self) -> &str {
        match self {
            AttributeType::String => "String",
            AttributeType::Memo => "Memo",
            AttributeType::Integer => "Integer",
            AttributeType::BigInt => "BigInt",
            AttributeType::Decimal => "Decimal",
            AttributeType::Double => "Double",
            AttributeType::Money => "Money",
            AttributeType::Boolean => "Boolean",
            AttributeType::DateTime => "DateTime",
            AttributeType::Lookup => "Lookup",
            AttributeType::Owner => "Owner",
            AttributeType::Customer => "Customer",
            AttributeType::Picklist => "Picklist",
            AttributeType::State => "State",
            AttributeType::Status => "Status",
            AttributeType::Uniqueidentifier => "Uniqueidentifier",
            AttributeType::Virtual => "Virtual",
            AttributeType::Other(name) => name,
        }
    }
}

/// Catalog entry for an entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntitySuggestion {
    pub logical_name: String,
    pub display_name: Option<String>,
    #[serde(default)]
    pub is_custom: bool,
    /// Primary key attribute (`accountid`)
    #[serde(default)]
    pub primary_id_attribute: Option<String>,
    /// Primary name attribute (`name`)
    #[serde(default)]
    pub primary_name_attribute: Option<String>,
}

impl EntitySuggestion {
    pub fn new(logical_name: impl Into<String>) -> Self {
        Self {
            logical_name: logical_name.into(),
            display_name: None,
            is_custom: false,
            primary_id_attribute: None,
            primary_name_attribute: None,
        }
    }

    pub fn with_display_name(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = Some(display_name.into());
        self
    }

    pub fn with_custom(mut self, is_custom: bool) -> Self {
        self.is_custom = is_custom;
        self
    }

    pub fn with_primary_id(mut self, attribute: impl Into<String>) -> Self {
        self.primary_id_attribute = Some(attribute.into());
        self
    }

    pub fn with_primary_name(mut self, attribute: impl Into<String>) -> Self {
        self.primary_name_attribute = Some(attribute.into());
        self
    }
}

/// Catalog entry for an attribute of an entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttributeSuggestion {
    pub logical_name: String,
    pub display_name: Option<String>,
    pub attribute_type: AttributeType,
    #[serde(default)]
    pub is_custom: bool,
    /// For a virtual column: the physical attribute it is derived from.
    ///
    /// `createdbyname` carries `Some("createdby")`. The query API cannot
    /// select the virtual column itself; its value arrives as formatted-value
    /// annotation data on the parent.
    #[serde(default)]
    pub attribute_of: Option<String>,
}

impl AttributeSuggestion {
    pub fn new(logical_name: impl Into<String>, attribute_type: AttributeType) -> Self {
        Self {
            logical_name: logical_name.into(),
            display_name: None,
            attribute_type,
            is_custom: false,
            attribute_of: None,
        }
    }

    pub fn with_display_name(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = Some(display_name.into());
        self
    }

    pub fn with_custom(mut self, is_custom: bool) -> Self {
        self.is_custom = is_custom;
        self
    }

    /// Mark this attribute as a virtual column of `parent`
    pub fn virtual_of(mut self, parent: impl Into<String>) -> Self {
        self.attribute_of = Some(parent.into());
        self
    }

    pub fn is_virtual(&self) -> bool {
        self.attribute_of.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attribute_builder() {
        let attr = AttributeSuggestion::new("createdbyname", AttributeType::Virtual)
            .with_display_name("Created By (Name)")
            .virtual_of("createdby");
        assert!(attr.is_virtual());
        assert_eq!(attr.attribute_of.as_deref(), Some("createdby"));
        assert_eq!(attr.attribute_type.label(), "Virtual");
    }

    #[test]
    fn test_entity_deserializes_camel_case() {
        let json = r#"{"logicalName":"account","displayName":"Account","primaryIdAttribute":"accountid"}"#;
        let entity: EntitySuggestion = serde_json::from_str(json).unwrap();
        assert_eq!(entity.logical_name, "account");
        assert_eq!(entity.primary_id_attribute.as_deref(), Some("accountid"));
        assert!(!entity.is_custom);
    }

    #[test]
    fn test_other_type_label() {
        let ty = AttributeType::Other("MultiSelectPicklist".to_string());
        assert_eq!(ty.label(), "MultiSelectPicklist");
    }
}
