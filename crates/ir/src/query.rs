// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Statement Representation
//!
//! This module represents the restricted SELECT statement accepted by the
//! parser.
//!
//! ## Statement Structure
//!
//! A [`SqlSelectStatement`] consists of:
//!
//! - **Columns**: `*`, plain/aliased/qualified columns and aggregate calls
//! - **Entity**: exactly one FROM entity with an optional alias
//! - **Joins**: simple equality joins (`JOIN contact c ON a.primarycontactid = c.contactid`)
//! - **WHERE**: a flat predicate list
//! - **GROUP BY / ORDER BY**: column lists
//! - **Row limit**: `TOP n` or `LIMIT n`
//!
//! ## Projection Items
//!
//! [`SelectColumn`] is a closed sum type; the transpiler matches on it
//! exhaustively:
//!
//! ```sql
//! SELECT name, a.revenue AS rev, COUNT(*) AS total
//! ```
//!
//! ## Builder Pattern
//!
//! ```rust
//! use dataverse_sql_ir::{ColumnRef, SelectColumn, SqlSelectStatement};
//!
//! let stmt = SqlSelectStatement::new("account")
//!     .with_columns(vec![SelectColumn::Column(ColumnRef::new("name"))])
//!     .with_row_limit(10);
//! assert!(!stmt.is_select_all());
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::expr::{ColumnRef, WhereClause};

/// Aggregate function allowed in the projection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AggregateFunction {
    Count,
    Sum,
    Avg,
    Min,
    Max,
}

impl AggregateFunction {
    pub fn as_str(&self) -> &'static str {
        match self {
            AggregateFunction::Count => "count",
            AggregateFunction::Sum => "sum",
            AggregateFunction::Avg => "avg",
            AggregateFunction::Min => "min",
            AggregateFunction::Max => "max",
        }
    }
}

impl FromStr for AggregateFunction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "count" => Ok(AggregateFunction::Count),
            "sum" => Ok(AggregateFunction::Sum),
            "avg" => Ok(AggregateFunction::Avg),
            "min" => Ok(AggregateFunction::Min),
            "max" => Ok(AggregateFunction::Max),
            other => Err(format!("unknown aggregate function '{}'", other)),
        }
    }
}

impl fmt::Display for AggregateFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Aggregate call in the projection (`COUNT(*)`, `SUM(revenue) AS total`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregateColumn {
    pub function: AggregateFunction,
    /// Aggregated column; `*` for `COUNT(*)`
    pub column_name: String,
    /// Optional table qualifier of the aggregated column
    pub table_name: Option<String>,
    /// Result alias. The parser always fills one in since FetchXML requires it.
    pub alias: String,
    /// `COUNT(DISTINCT x)`
    pub distinct: bool,
}

impl AggregateColumn {
    pub fn new(
        function: AggregateFunction,
        column_name: impl Into<String>,
        alias: impl Into<String>,
    ) -> Self {
        Self {
            function,
            column_name: column_name.into(),
            table_name: None,
            alias: alias.into(),
            distinct: false,
        }
    }

    pub fn is_count_star(&self) -> bool {
        self.function == AggregateFunction::Count && self.column_name == "*"
    }
}

/// Projection item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SelectColumn {
    Column(ColumnRef),
    Aggregate(AggregateColumn),
}

impl SelectColumn {
    /// Name the item is presented under in results
    pub fn output_name(&self) -> &str {
        match self {
            SelectColumn::Column(col) => col.output_name(),
            SelectColumn::Aggregate(agg) => &agg.alias,
        }
    }

    pub fn is_aggregate(&self) -> bool {
        matches!(self, SelectColumn::Aggregate(_))
    }
}

/// Join type supported by FetchXML link-entities
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum JoinType {
    #[default]
    Inner,
    LeftOuter,
}

impl JoinType {
    /// FetchXML `link-type` value
    pub fn link_type(&self) -> &'static str {
        match self {
            JoinType::Inner => "inner",
            JoinType::LeftOuter => "outer",
        }
    }
}

/// Equality join: `JOIN contact c ON a.primarycontactid = c.contactid`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JoinClause {
    pub join_type: JoinType,
    pub entity_name: String,
    pub alias: Option<String>,
    /// Side of the ON equality that names an earlier table (FetchXML `to`)
    pub left: ColumnRef,
    /// Side of the ON equality that names this join (FetchXML `from`)
    pub right: ColumnRef,
}

impl JoinClause {
    /// Name columns use to refer to this join (alias, else entity name)
    pub fn reference_name(&self) -> &str {
        self.alias.as_deref().unwrap_or(&self.entity_name)
    }

    /// Whether `qualifier` designates this join
    pub fn is_referenced_by(&self, qualifier: &str) -> bool {
        self.reference_name().eq_ignore_ascii_case(qualifier)
            || self.entity_name.eq_ignore_ascii_case(qualifier)
    }
}

/// ORDER BY item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderByItem {
    pub column: ColumnRef,
    pub descending: bool,
}

/// Root of the AST
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SqlSelectStatement {
    pub columns: Vec<SelectColumn>,
    pub entity_name: String,
    pub entity_alias: Option<String>,
    pub distinct: bool,
    pub joins: Vec<JoinClause>,
    pub where_conditions: Option<WhereClause>,
    pub group_by: Vec<ColumnRef>,
    pub order_by: Vec<OrderByItem>,
    pub row_limit: Option<u32>,
}

impl SqlSelectStatement {
    pub fn new(entity_name: impl Into<String>) -> Self {
        Self {
            columns: Vec::new(),
            entity_name: entity_name.into(),
            entity_alias: None,
            distinct: false,
            joins: Vec::new(),
            where_conditions: None,
            group_by: Vec::new(),
            order_by: Vec::new(),
            row_limit: None,
        }
    }

    pub fn with_columns(mut self, columns: Vec<SelectColumn>) -> Self {
        self.columns = columns;
        self
    }

    pub fn with_row_limit(mut self, limit: u32) -> Self {
        self.row_limit = Some(limit);
        self
    }

    pub fn with_where(mut self, clause: WhereClause) -> Self {
        self.where_conditions = Some(clause);
        self
    }

    pub fn with_joins(mut self, joins: Vec<JoinClause>) -> Self {
        self.joins = joins;
        self
    }

    pub fn with_order_by(mut self, order_by: Vec<OrderByItem>) -> Self {
        self.order_by = order_by;
        self
    }

    /// True when the projection is a bare `*`
    pub fn is_select_all(&self) -> bool {
        self.columns.iter().any(|c| {
            matches!(c, SelectColumn::Column(col) if col.is_wildcard && col.table_name.is_none())
        })
    }

    /// True when any projection item is an aggregate or a GROUP BY is present
    pub fn is_aggregate(&self) -> bool {
        !self.group_by.is_empty() || self.columns.iter().any(SelectColumn::is_aggregate)
    }

    /// Name columns use to refer to the FROM entity (alias, else entity name)
    pub fn entity_reference_name(&self) -> &str {
        self.entity_alias.as_deref().unwrap_or(&self.entity_name)
    }

    /// Whether `qualifier` designates the FROM entity
    pub fn is_main_entity_qualifier(&self, qualifier: &str) -> bool {
        self.entity_name.eq_ignore_ascii_case(qualifier)
            || self
                .entity_alias
                .as_deref()
                .is_some_and(|a| a.eq_ignore_ascii_case(qualifier))
    }

    /// Join designated by `qualifier`, if any
    pub fn find_join(&self, qualifier: &str) -> Option<&JoinClause> {
        self.joins.iter().find(|j| j.is_referenced_by(qualifier))
    }

    /// Non-aggregate column references of the projection
    pub fn column_refs(&self) -> impl Iterator<Item = &ColumnRef> {
        self.columns.iter().filter_map(|c| match c {
            SelectColumn::Column(col) => Some(col),
            SelectColumn::Aggregate(_) => None,
        })
    }
}
