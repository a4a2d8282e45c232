// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Dataverse SQL - Intermediate Representation
//!
//! This crate provides the typed AST produced by the SQL parser and the
//! read-only metadata types supplied by the metadata catalog.
//!
//! The AST is designed to:
//! - Cover exactly the restricted SELECT dialect (no subqueries, no arbitrary expressions)
//! - Model the projection as a closed sum type so every consumer matches exhaustively
//! - Stay immutable after parsing; rewrites produce new statements

pub mod expr;
pub mod metadata;
pub mod query;

// Re-export commonly used types
pub use expr::{ColumnRef, Condition, ConditionOperator, Literal, LogicalOperator, WhereClause};
pub use metadata::{AttributeSuggestion, AttributeType, EntitySuggestion};
pub use query::{
    AggregateColumn, AggregateFunction, JoinClause, JoinType, OrderByItem, SelectColumn,
    SqlSelectStatement,
};
