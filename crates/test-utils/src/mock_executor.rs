// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Mock query executor for execute-path tests
//!
//! Returns canned rows and records every FetchXML document it receives.

use std::sync::{Mutex, PoisonError};

use dataverse_sql_engine::{ExecuteError, ExecuteResult, QueryExecutor, Row};
use serde_json::Value;

/// One call received by [`MockQueryExecutor`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutedQuery {
    pub environment_id: String,
    pub entity_logical_name: String,
    pub fetch_xml: String,
}

/// In-memory query executor
#[derive(Debug, Default)]
pub struct MockQueryExecutor {
    rows: Vec<Row>,
    failure: Option<String>,
    executed: Mutex<Vec<ExecutedQuery>>,
}

impl MockQueryExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rows returned for every query
    ///
    /// # Panics
    ///
    /// Panics if a value is not a JSON object.
    pub fn with_rows(mut self, rows: Vec<Value>) -> Self {
        self.rows = rows
            .into_iter()
            .map(|value| match value {
                Value::Object(map) => map,
                other => panic!("mock row must be an object, got {}", other),
            })
            .collect();
        self
    }

    /// Fail every query with `ExecuteError::Execution(message)`
    pub fn with_failure(mut self, message: impl Into<String>) -> Self {
        self.failure = Some(message.into());
        self
    }

    /// Queries received so far, oldest first
    pub fn executed(&self) -> Vec<ExecutedQuery> {
        self.executed
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn call_count(&self) -> usize {
        self.executed
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// FetchXML of the most recent query
    pub fn last_fetch_xml(&self) -> Option<String> {
        self.executed
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .last()
            .map(|q| q.fetch_xml.clone())
    }
}

#[async_trait::async_trait]
impl QueryExecutor for MockQueryExecutor {
    async fn execute_fetch_xml(
        &self,
        environment_id: &str,
        entity_logical_name: &str,
        fetch_xml: &str,
    ) -> ExecuteResult<Vec<Row>> {
        self.executed
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(ExecutedQuery {
                environment_id: environment_id.to_string(),
                entity_logical_name: entity_logical_name.to_string(),
                fetch_xml: fetch_xml.to_string(),
            });

        match &self.failure {
            Some(message) => Err(ExecuteError::Execution(message.clone())),
            None => Ok(self.rows.clone()),
        }
    }
}
