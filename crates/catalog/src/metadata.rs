// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Metadata types for Dataverse schema information
//!
//! This module re-exports metadata types from the `dataverse-sql-ir` crate.

// Re-export all metadata types from the ir crate
pub use dataverse_sql_ir::{AttributeSuggestion, AttributeType, EntitySuggestion};
