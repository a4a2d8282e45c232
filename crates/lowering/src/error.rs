// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Error types for the rewrite passes
//!
//! The transpiler itself is infallible; only the virtual column pass can fail,
//! either on catalog metadata or on a virtual column it cannot rewrite.

use dataverse_sql_catalog::CatalogError;
use serde::Serialize;

/// Result type alias for rewrite operations
pub type TransformationResult<T> = Result<T, TransformationError>;

#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq, Serialize)]
pub enum TransformationError {
    /// Attribute metadata for the FROM entity could not be loaded
    #[error("Failed to load attribute metadata for '{entity}': {source}")]
    Metadata {
        entity: String,
        #[source]
        source: CatalogError,
    },

    /// A virtual column where it cannot be replaced by its parent
    #[error("Virtual column '{column}' cannot be used in {clause} unless it is selected")]
    UnsupportedVirtualColumn { column: String, clause: &'static str },
}

impl TransformationError {
    pub fn metadata(entity: impl Into<String>, source: CatalogError) -> Self {
        TransformationError::Metadata {
            entity: entity.into(),
            source,
        }
    }

    pub fn unsupported_virtual_column(column: impl Into<String>, clause: &'static str) -> Self {
        TransformationError::UnsupportedVirtualColumn {
            column: column.into(),
            clause,
        }
    }

    /// Whether retrying the same query may succeed
    pub fn is_transient(&self) -> bool {
        match self {
            TransformationError::Metadata { source, .. } => source.is_transient(),
            TransformationError::UnsupportedVirtualColumn { .. } => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metadata_error_display() {
        let err = TransformationError::metadata("account", CatalogError::Timeout(30));
        let msg = err.to_string();
        assert!(msg.contains("'account'"));
        assert!(msg.contains("30"));
        assert!(err.is_transient());
    }

    #[test]
    fn test_not_found_is_not_transient() {
        let err = TransformationError::metadata(
            "lead",
            CatalogError::EntityNotFound("lead".to_string(), "env".to_string()),
        );
        assert!(!err.is_transient());
    }
}
