// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Completion error types
//!
//! This module defines error types for the completion system.

use dataverse_sql_catalog::CatalogError;

/// Result type alias for completion operations
pub type CompletionResult<T> = Result<T, CompletionError>;

/// Errors that can occur during completion
#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum CompletionError {
    /// A newer request for the same document superseded this one
    #[error("Completion request cancelled")]
    Cancelled,

    /// No environment on the request and none configured
    #[error("No environment selected")]
    NoEnvironment,

    /// Catalog-related error
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),
}

impl CompletionError {
    /// Check if this error should result in an empty completion list
    /// (vs. propagating the error to the client)
    pub fn should_return_empty(&self) -> bool {
        matches!(
            self,
            CompletionError::Cancelled
                | CompletionError::NoEnvironment
                | CompletionError::Catalog(CatalogError::EntityNotFound(..))
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_completion_error_display() {
        assert_eq!(
            CompletionError::Cancelled.to_string(),
            "Completion request cancelled"
        );

        let err = CompletionError::from(CatalogError::Timeout(10));
        assert!(err.to_string().starts_with("Catalog error"));
    }

    #[test]
    fn test_should_return_empty() {
        assert!(CompletionError::Cancelled.should_return_empty());
        assert!(CompletionError::NoEnvironment.should_return_empty());

        // Typo in the FROM entity: nothing to offer, not a failure
        let not_found = CatalogError::EntityNotFound("acount".to_string(), "env".to_string());
        assert!(CompletionError::Catalog(not_found).should_return_empty());

        // Connection problems should propagate
        let catalog_err = CatalogError::ConnectionFailed("env".to_string());
        assert!(!CompletionError::Catalog(catalog_err).should_return_empty());
    }
}
