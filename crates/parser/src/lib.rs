// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Dataverse SQL - Parser
//!
//! Hand-written lexer and recursive-descent parser for the restricted SELECT
//! dialect. The parser either returns a complete [`SqlSelectStatement`] or a
//! [`ParseError`]; it never produces a partial tree. Completion on invalid
//! input is the job of the context detectors, which do not use this crate.
//!
//! ```text
//! SELECT [DISTINCT] [TOP n] columns FROM entity [alias]
//!   { [INNER | LEFT [OUTER]] JOIN entity [alias] ON a.x = b.y }
//!   [WHERE predicate { AND | OR predicate }]
//!   [GROUP BY columns] [ORDER BY column [ASC | DESC], ...] [LIMIT n]
//! ```
//!
//! Both lexing and parsing are single linear passes with one token of
//! lookahead.
//!
//! ## Example
//!
//! ```rust
//! use dataverse_sql_parser::parse;
//!
//! let stmt = parse("SELECT name, revenue FROM account WHERE statecode = 0 LIMIT 50").unwrap();
//! assert_eq!(stmt.entity_name, "account");
//! assert_eq!(stmt.row_limit, Some(50));
//! ```

pub mod error;
pub mod lexer;
pub mod parser;

pub use dataverse_sql_ir::SqlSelectStatement;
pub use error::{ParseError, ParseErrorKind, ParseResult};
pub use lexer::{Lexer, Token, TokenKind};
pub use parser::{Parser, parse};
