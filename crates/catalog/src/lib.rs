// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Dataverse SQL - Catalog Layer
//!
//! This crate provides the metadata contract consumed by the query frontend.
//! It defines the `MetadataCatalog` trait and the catalogs built on top of it:
//!
//! - **Static Catalogs**: Entity/attribute definitions from files (JSON/YAML)
//! - **Cached Catalogs**: Memoizing wrapper keyed by environment
//!
//! The detectors, the virtual column pass and the completion engine treat the
//! returned catalogs as read-only snapshots valid for one request.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use dataverse_sql_catalog::{MetadataCatalog, CatalogError};
//!
//! async fn print_entities(catalog: &impl MetadataCatalog) -> Result<(), CatalogError> {
//!     for entity in catalog.get_entity_suggestions("env-1").await? {
//!         println!("{}", entity.logical_name);
//!     }
//!     Ok(())
//! }
//! ```

pub mod cached;
pub mod error;
pub mod metadata;
pub mod r#static;
pub mod r#trait;

// Re-exports
pub use cached::CachedCatalog;
pub use error::{CatalogError, CatalogResult};
pub use metadata::{AttributeSuggestion, AttributeType, EntitySuggestion};
pub use r#static::StaticCatalog;
pub use r#trait::MetadataCatalog;
