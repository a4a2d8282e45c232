// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Column references and predicates
//!
//! The dialect is intentionally flat: a WHERE clause is a list of simple
//! predicates joined by a single logical operator, and every predicate compares
//! one column against literal values.
//!
//! ```sql
//! WHERE statecode = 0 AND name LIKE 'Contoso%'
//! WHERE industrycode IN (1, 2, 3) OR revenue IS NULL
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

/// Column reference, optionally qualified by a table name or alias
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnRef {
    /// Column name as written in the source (case preserved)
    pub column_name: String,
    /// Optional column alias (`name AS account_name`)
    pub alias: Option<String>,
    /// Optional table qualifier (`a.name`)
    pub table_name: Option<String>,
    /// True for `*` and `a.*`
    pub is_wildcard: bool,
}

impl ColumnRef {
    pub fn new(column_name: impl Into<String>) -> Self {
        Self {
            column_name: column_name.into(),
            alias: None,
            table_name: None,
            is_wildcard: false,
        }
    }

    /// Unqualified `*`
    pub fn wildcard() -> Self {
        Self {
            column_name: "*".to_string(),
            alias: None,
            table_name: None,
            is_wildcard: true,
        }
    }

    pub fn qualified(table_name: impl Into<String>, column_name: impl Into<String>) -> Self {
        Self::new(column_name).with_table(table_name)
    }

    pub fn with_table(mut self, table_name: impl Into<String>) -> Self {
        self.table_name = Some(table_name.into());
        self
    }

    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    /// Two references are the same logical selection iff the column name and
    /// the table qualifier match case-insensitively.
    pub fn same_selection(&self, other: &ColumnRef) -> bool {
        let tables_match = match (&self.table_name, &other.table_name) {
            (Some(a), Some(b)) => a.eq_ignore_ascii_case(b),
            (None, None) => true,
            _ => false,
        };
        tables_match && self.column_name.eq_ignore_ascii_case(&other.column_name)
    }

    /// Name the column is presented under in results
    pub fn output_name(&self) -> &str {
        self.alias.as_deref().unwrap_or(&self.column_name)
    }
}

impl fmt::Display for ColumnRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(table) = &self.table_name {
            write!(f, "{}.", table)?;
        }
        write!(f, "{}", self.column_name)
    }
}

/// Literal value on the right-hand side of a predicate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Literal {
    Null,
    Boolean(bool),
    Integer(i64),
    /// Decimal kept as source text so no precision is lost on the way to FetchXML
    Decimal(String),
    String(String),
}

impl Literal {
    /// Value as it appears in a FetchXML `value` attribute
    pub fn to_fetch_value(&self) -> String {
        match self {
            Literal::Null => String::new(),
            Literal::Boolean(b) => u8::from(*b).to_string(),
            Literal::Integer(i) => i.to_string(),
            Literal::Decimal(d) => d.clone(),
            Literal::String(s) => s.clone(),
        }
    }
}

/// Comparison operator of a predicate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConditionOperator {
    Eq,
    NotEq,
    Gt,
    GtEq,
    Lt,
    LtEq,
    Like,
    NotLike,
    In,
    NotIn,
    IsNull,
    IsNotNull,
}

impl ConditionOperator {
    /// FetchXML `operator` attribute value
    pub fn fetch_operator(&self) -> &'static str {
        match self {
            ConditionOperator::Eq => "eq",
            ConditionOperator::NotEq => "ne",
            ConditionOperator::Gt => "gt",
            ConditionOperator::GtEq => "ge",
            ConditionOperator::Lt => "lt",
            ConditionOperator::LtEq => "le",
            ConditionOperator::Like => "like",
            ConditionOperator::NotLike => "not-like",
            ConditionOperator::In => "in",
            ConditionOperator::NotIn => "not-in",
            ConditionOperator::IsNull => "null",
            ConditionOperator::IsNotNull => "not-null",
        }
    }

    /// Whether the operator takes a value list instead of a single value
    pub fn is_list(&self) -> bool {
        matches!(self, ConditionOperator::In | ConditionOperator::NotIn)
    }

    /// Whether the operator takes no value at all
    pub fn is_unary(&self) -> bool {
        matches!(self, ConditionOperator::IsNull | ConditionOperator::IsNotNull)
    }
}

/// A single `column op value(s)` predicate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    pub column: ColumnRef,
    pub operator: ConditionOperator,
    /// Empty for IS [NOT] NULL, one value for comparisons, one or more for IN lists
    pub values: Vec<Literal>,
}

impl Condition {
    pub fn new(column: ColumnRef, operator: ConditionOperator, values: Vec<Literal>) -> Self {
        Self {
            column,
            operator,
            values,
        }
    }
}

/// Connective joining the predicates of a WHERE clause
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum LogicalOperator {
    #[default]
    And,
    Or,
}

impl LogicalOperator {
    /// FetchXML `filter@type` value
    pub fn fetch_type(&self) -> &'static str {
        match self {
            LogicalOperator::And => "and",
            LogicalOperator::Or => "or",
        }
    }
}

/// Flat WHERE clause
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WhereClause {
    pub operator: LogicalOperator,
    pub conditions: Vec<Condition>,
}
