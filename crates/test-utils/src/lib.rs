// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Testing utilities for Dataverse SQL
//!
//! This crate provides common testing components including:
//! - Mock metadata catalog and query executor
//! - Cursor markers for context detection tests
//! - FetchXML assertions
//! - Test fixtures and sample queries

pub mod assertions;
pub mod cursor;
pub mod fixtures;
pub mod mock_catalog;
pub mod mock_executor;

// Re-exports for convenience
pub use assertions::{FetchXmlAssertions, XmlElement};
pub use cursor::{CURSOR_MARKER, get_cursor_position, remove_cursor_marker, split_cursor};
pub use fixtures::{FetchXmlFixtures, SqlFixtures};
pub use mock_catalog::{MockCatalog, MockCatalogBuilder};
pub use mock_executor::{ExecutedQuery, MockQueryExecutor};
