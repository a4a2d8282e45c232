// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Error types for the SQL parser

use serde::Serialize;

/// Result type alias for parse operations
pub type ParseResult<T> = Result<T, ParseError>;

/// What went wrong while parsing
#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq, Serialize)]
pub enum ParseErrorKind {
    /// A different token was expected
    #[error("Expected {expected}, found '{found}'")]
    UnexpectedToken { expected: String, found: String },

    /// Input ended early
    #[error("Expected {expected}, found end of input")]
    UnexpectedEnd { expected: String },

    /// `SELECT FROM account`
    #[error("SELECT requires at least one column")]
    EmptyColumnList,

    /// `SELECT * account`
    #[error("Missing FROM clause")]
    MissingFrom,

    /// `SELECT MEDIAN(x) ...`
    #[error("Unknown aggregate function '{0}'")]
    UnknownAggregate(String),

    /// `TOP 0`, `LIMIT -1`, `LIMIT 2.5`
    #[error("Row limit must be a positive integer, found '{0}'")]
    InvalidRowLimit(String),

    /// Both TOP and LIMIT given
    #[error("Row limit specified twice (TOP and LIMIT)")]
    DuplicateRowLimit,

    /// `'abc` with no closing quote
    #[error("Unterminated string literal")]
    UnterminatedString,

    /// `[name` with no closing bracket/quote
    #[error("Unterminated quoted identifier")]
    UnterminatedIdentifier,

    /// `/* ...` with no closing `*/`
    #[error("Unterminated block comment")]
    UnterminatedComment,

    /// Character outside the dialect
    #[error("Unexpected character '{0}'")]
    UnexpectedCharacter(char),

    /// `a = 1 AND b = 2 OR c = 3`
    #[error("Mixing AND and OR requires parentheses, which are not supported")]
    MixedLogicalOperators,

    /// `x.name` where `x` is neither the FROM entity nor a join
    #[error("Unknown table or alias '{0}'")]
    UnknownQualifier(String),

    /// ON clause that does not link the joined entity to an earlier one
    #[error("Invalid join condition: {0}")]
    InvalidJoinCondition(String),

    /// `*` combined with other columns or used in an aggregate query
    #[error("Wildcard not allowed here: {0}")]
    WildcardNotAllowed(String),

    /// `x = NULL`
    #[error("Use IS NULL / IS NOT NULL to compare with NULL")]
    NullComparison,

    /// FetchXML can only group by attributes that are also selected
    #[error("GROUP BY column '{0}' must also appear in the SELECT list")]
    GroupByNotSelected(String),

    /// `SELECT name, revenue AS name`
    #[error("Duplicate output column '{0}'; give one of them an alias")]
    DuplicateOutputName(String),
}

/// Parse failure with the byte offset it was detected at, when known
#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq, Serialize)]
#[error("{kind}{}", .offset.map(|o| format!(" (at offset {})", o)).unwrap_or_default())]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub offset: Option<usize>,
}

impl ParseError {
    pub fn new(kind: ParseErrorKind, offset: Option<usize>) -> Self {
        Self { kind, offset }
    }

    pub fn at(kind: ParseErrorKind, offset: usize) -> Self {
        Self::new(kind, Some(offset))
    }

    /// Message without the offset suffix
    pub fn message(&self) -> String {
        self.kind.to_string()
    }
}
