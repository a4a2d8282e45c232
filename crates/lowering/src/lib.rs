// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Dataverse SQL - Lowering Layer
//!
//! Turns parsed statements into something the Dataverse query API accepts:
//!
//! ```text
//! SqlSelectStatement → virtual column rewrite → transpile → FetchXML
//! ```
//!
//! - [`transpile`] is a pure, infallible mapping to FetchXML.
//! - [`virtual_columns`] swaps computed columns for their physical parents
//!   and records the mapping needed to restore them in results. It is the
//!   only step that needs catalog metadata, and the only one that can fail.
//!
//! ## Usage
//!
//! ```rust
//! use dataverse_sql_ir::{ColumnRef, SelectColumn, SqlSelectStatement};
//! use dataverse_sql_lowering::transpile;
//!
//! let stmt = SqlSelectStatement::new("account")
//!     .with_columns(vec![SelectColumn::Column(ColumnRef::new("name"))])
//!     .with_row_limit(5);
//! let xml = transpile(&stmt);
//! assert!(xml.starts_with("<fetch top=\"5\">"));
//! ```

pub mod error;
pub mod transpiler;
pub mod virtual_columns;

pub use error::{TransformationError, TransformationResult};
pub use transpiler::transpile;
pub use virtual_columns::{
    RequestedColumn, VirtualColumnDetector, VirtualColumnMapping, VirtualColumnTransformation,
    apply, detect, requested_columns,
};
