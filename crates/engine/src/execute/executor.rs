// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Query execution transport
//!
//! The transport that sends FetchXML to an environment lives outside this
//! crate; it plugs in through [`QueryExecutor`].

use serde_json::{Map, Value};

use super::error::ExecuteResult;

/// One result record as returned by the query service
///
/// Keys are attribute logical names (or aliases), plus OData annotations such
/// as `primarycontactid@OData.Community.Display.V1.FormattedValue`.
pub type Row = Map<String, Value>;

/// Annotation key suffix carrying the display value of a lookup or option set
pub const FORMATTED_VALUE_SUFFIX: &str = "@OData.Community.Display.V1.FormattedValue";

/// Sends FetchXML to an environment and returns the raw rows
///
/// # Examples
///
/// ```rust,ignore
/// use dataverse_sql_engine::{QueryExecutor, Row, ExecuteResult};
///
/// struct WebApiExecutor { /* http client */ }
///
/// #[async_trait::async_trait]
/// impl QueryExecutor for WebApiExecutor {
///     async fn execute_fetch_xml(&self, env: &str, entity: &str, fetch_xml: &str) -> ExecuteResult<Vec<Row>> {
///         // GET {env}/api/data/v9.2/{entity set}?fetchXml=...
///         todo!()
///     }
/// }
/// ```
#[async_trait::async_trait]
pub trait QueryExecutor: Send + Sync {
    /// Run `fetch_xml` against `entity_logical_name` in an environment
    ///
    /// # Errors
    ///
    /// Returns `ExecuteError::Execution` if the service rejects the query or
    /// cannot be reached.
    async fn execute_fetch_xml(
        &self,
        environment_id: &str,
        entity_logical_name: &str,
        fetch_xml: &str,
    ) -> ExecuteResult<Vec<Row>>;
}
