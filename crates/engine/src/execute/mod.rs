// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Execute path
//!
//! ```text
//! SQL ─parse─▶ AST ─fetch attributes─▶ detect virtual columns ─rewrite─▶ AST'
//!     ─transpile─▶ FetchXML ─QueryExecutor─▶ raw rows ─ResultMapper─▶ rows
//! ```
//!
//! Any failure before the executor aborts the run; a partially rewritten
//! query is never sent.

pub mod error;
pub mod executor;
pub mod mapper;

use std::sync::Arc;

use dataverse_sql_catalog::MetadataCatalog;
use dataverse_sql_ir::SqlSelectStatement;
use dataverse_sql_lowering::{VirtualColumnDetector, VirtualColumnTransformation, apply, transpile};
use serde::Serialize;
use tracing::{debug, info};

pub use error::{ExecuteError, ExecuteResult};
pub use executor::{FORMATTED_VALUE_SUFFIX, QueryExecutor, Row};
pub use mapper::ResultMapper;

/// A query ready to send
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PreparedQuery {
    /// Statement as parsed
    pub statement: SqlSelectStatement,
    /// Statement after the virtual column rewrite
    pub rewritten: SqlSelectStatement,
    pub transformation: VirtualColumnTransformation,
    pub fetch_xml: String,
}

impl PreparedQuery {
    pub fn mapper(&self) -> ResultMapper {
        ResultMapper::new(&self.statement, &self.transformation)
    }
}

/// Rows of an executed query
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryResult {
    /// Output columns in SELECT order; empty for `SELECT *`
    pub columns: Vec<String>,
    pub rows: Vec<Row>,
    pub fetch_xml: String,
}

/// Parse, rewrite virtual columns and transpile `sql`
///
/// # Errors
///
/// - `ExecuteError::Parse` for malformed SQL
/// - `ExecuteError::Transformation` when attribute metadata is unavailable
pub async fn prepare_query(
    detector: &VirtualColumnDetector,
    environment_id: &str,
    sql: &str,
) -> ExecuteResult<PreparedQuery> {
    let statement = dataverse_sql_parser::parse(sql)?;

    let transformation = detector
        .detect_for_statement(environment_id, &statement)
        .await?;
    if transformation.needs_transformation {
        debug!(
            virtual_columns = transformation.virtual_columns.len(),
            parents = ?transformation.parents_to_add,
            "rewriting virtual columns"
        );
    }

    let rewritten = apply(&statement, &transformation);
    let fetch_xml = transpile(&rewritten);

    Ok(PreparedQuery {
        statement,
        rewritten,
        transformation,
        fetch_xml,
    })
}

/// Use case: run a SQL query against an environment
pub struct ExecuteSqlQuery {
    detector: VirtualColumnDetector,
    executor: Arc<dyn QueryExecutor>,
}

impl ExecuteSqlQuery {
    pub fn new(catalog: Arc<dyn MetadataCatalog>, executor: Arc<dyn QueryExecutor>) -> Self {
        Self {
            detector: VirtualColumnDetector::new(catalog),
            executor,
        }
    }

    /// See [`prepare_query`]
    pub async fn prepare(&self, environment_id: &str, sql: &str) -> ExecuteResult<PreparedQuery> {
        prepare_query(&self.detector, environment_id, sql).await
    }

    /// Prepare and run `sql`, returning rows with exactly the requested columns
    pub async fn execute(&self, environment_id: &str, sql: &str) -> ExecuteResult<QueryResult> {
        if environment_id.trim().is_empty() {
            return Err(ExecuteError::NoEnvironment);
        }

        let prepared = self.prepare(environment_id, sql).await?;
        info!(
            environment_id,
            entity = %prepared.statement.entity_name,
            "executing FetchXML query"
        );

        let raw = self
            .executor
            .execute_fetch_xml(environment_id, &prepared.statement.entity_name, &prepared.fetch_xml)
            .await?;

        let mapper = prepared.mapper();
        let rows = mapper.map_rows(&raw);
        info!(rows = rows.len(), "query finished");

        Ok(QueryResult {
            columns: mapper.columns().to_vec(),
            rows,
            fetch_xml: prepared.fetch_xml,
        })
    }
}
