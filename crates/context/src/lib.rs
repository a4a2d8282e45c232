// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Dataverse SQL - Context Detection Layer
//!
//! Decides what kind of completion applies at a cursor position in partially
//! typed SQL or FetchXML.
//!
//! ## Overview
//!
//! Both detectors are synchronous, total functions: any text and any byte
//! offset produce a context, and ambiguous positions resolve to the least
//! specific one instead of a guessed entity or attribute. Resolving the
//! context into candidates (which may require a metadata fetch) is the job of
//! the completion engine.
//!
//! - [`sql_context`]: entity, attribute or keyword position in SQL
//! - [`fetchxml_context`]: element, attribute name or attribute value in FetchXML
//! - [`keywords`]: keyword tables per SQL position
//! - [`fetchxml_schema`]: FetchXML element, attribute and enumeration tables
//!
//! ## Examples
//!
//! ```rust
//! use dataverse_sql_context::{SqlContext, detect_sql_context};
//!
//! let text = "SELECT name FROM account WHERE ";
//! assert_eq!(
//!     detect_sql_context(text, text.len()),
//!     SqlContext::Attribute { entity_name: "account".to_string() }
//! );
//! ```

pub mod fetchxml_context;
pub mod fetchxml_schema;
pub mod keywords;
pub mod sql_context;

// Re-export commonly used types
pub use fetchxml_context::{FetchXmlContext, detect_fetchxml_context, fetchxml_completion_prefix};
pub use fetchxml_schema::{ValueKind, child_elements, element_attributes, value_kind, value_suggestions};
pub use keywords::{KeywordPosition, KeywordProvider, KeywordSet, SqlKeyword};
pub use sql_context::{SqlContext, detect_sql_context, sql_completion_prefix};
