// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Error types for Catalog operations
//!
//! This module defines the error types used throughout the catalog layer.

use serde::Serialize;
use thiserror::Error;

/// Result type alias for Catalog operations
pub type CatalogResult<T> = Result<T, CatalogError>;

/// Errors that can occur during Catalog operations
#[derive(Debug, Error, Clone, PartialEq, Eq, Serialize)]
pub enum CatalogError {
    /// Failed to reach the environment's metadata endpoint
    #[error("Failed to connect to environment '{0}'")]
    ConnectionFailed(String),

    /// Metadata request timed out
    #[error("Metadata request timed out after {0}s")]
    Timeout(u64),

    /// Requested entity was not found
    #[error("Entity '{0}' not found in environment '{1}'")]
    EntityNotFound(String, String),

    /// Failed to serialize or deserialize schema data
    #[error("Failed to read schema data: {0}")]
    SerializationError(String),
}

impl CatalogError {
    /// Whether retrying the same request later may succeed
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            CatalogError::ConnectionFailed(_) | CatalogError::Timeout(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CatalogError::EntityNotFound("acount".to_string(), "env-1".to_string());
        assert_eq!(
            err.to_string(),
            "Entity 'acount' not found in environment 'env-1'"
        );
    }

    #[test]
    fn test_transient_errors() {
        assert!(CatalogError::Timeout(30).is_transient());
        assert!(CatalogError::ConnectionFailed("env-1".to_string()).is_transient());
        assert!(!CatalogError::SerializationError("bad yaml".to_string()).is_transient());
    }
}
