// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Error types for the execute path

use dataverse_sql_lowering::TransformationError;
use dataverse_sql_parser::ParseError;
use serde::Serialize;

/// Result type alias for execute operations
pub type ExecuteResult<T> = Result<T, ExecuteError>;

/// Why a query was not executed, or failed while executing
///
/// No FetchXML is sent once parsing or the virtual column pass has failed.
#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq, Serialize)]
pub enum ExecuteError {
    /// Malformed SQL, surfaced to the user as-is
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// The virtual column rewrite failed, on metadata or on an unsupported use
    #[error(transparent)]
    Transformation(#[from] TransformationError),

    /// No environment on the call and none configured
    #[error("No environment selected")]
    NoEnvironment,

    /// The query service rejected or failed the request
    #[error("Query execution failed: {0}")]
    Execution(String),
}

impl ExecuteError {
    /// Byte offset into the SQL text, for parse errors that carry one
    pub fn offset(&self) -> Option<usize> {
        match self {
            ExecuteError::Parse(err) => err.offset,
            _ => None,
        }
    }
}
