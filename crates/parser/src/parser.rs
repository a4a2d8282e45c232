// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Recursive-descent parser producing [`SqlSelectStatement`].
//!
//! Keywords are bare words compared case-insensitively. Reserved words can
//! only be used as identifiers when quoted (`[from]`, `"order"`).

use dataverse_sql_ir::{
    AggregateColumn, AggregateFunction, ColumnRef, Condition, ConditionOperator, JoinClause,
    JoinType, Literal, LogicalOperator, OrderByItem, SelectColumn, SqlSelectStatement,
    WhereClause,
};
use tracing::debug;

use crate::error::{ParseError, ParseErrorKind, ParseResult};
use crate::lexer::{Lexer, Token, TokenKind};

const RESERVED: &[&str] = &[
    "SELECT", "FROM", "WHERE", "ORDER", "GROUP", "BY", "LIMIT", "TOP", "JOIN", "INNER", "LEFT",
    "OUTER", "ON", "AND", "OR", "NOT", "IN", "IS", "NULL", "LIKE", "AS", "ASC", "DESC",
    "DISTINCT",
];

fn is_reserved(word: &str) -> bool {
    RESERVED.iter().any(|k| k.eq_ignore_ascii_case(word))
}

/// Parse a single SELECT statement
pub fn parse(sql: &str) -> ParseResult<SqlSelectStatement> {
    Parser::new(sql)?.parse_statement()
}

/// Which table a qualifier resolves to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TableSlot {
    Main,
    Join(usize),
}

pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    pub fn new(sql: &str) -> ParseResult<Self> {
        Ok(Self {
            tokens: Lexer::new(sql).tokenize()?,
            pos: 0,
        })
    }

    /// Parse the whole input as one statement; trailing tokens are an error
    pub fn parse_statement(mut self) -> ParseResult<SqlSelectStatement> {
        self.expect_keyword("SELECT")?;

        let distinct = self.eat_keyword("DISTINCT");
        let mut row_limit = None;
        if self.eat_keyword("TOP") {
            row_limit = Some(self.parse_row_limit()?);
        }

        if self.peek().is_keyword("FROM") {
            return Err(ParseError::at(
                ParseErrorKind::EmptyColumnList,
                self.peek().start,
            ));
        }
        let columns = self.parse_select_list()?;

        if !self.peek().is_keyword("FROM") {
            return Err(ParseError::at(ParseErrorKind::MissingFrom, self.peek().start));
        }
        self.advance();

        let entity_name = self.parse_identifier("entity name")?;
        let entity_alias = self.parse_optional_alias()?;

        let mut stmt = SqlSelectStatement::new(entity_name);
        stmt.entity_alias = entity_alias;
        stmt.distinct = distinct;
        stmt.columns = columns;

        while self.at_join() {
            let join = self.parse_join(&stmt)?;
            stmt.joins.push(join);
        }

        if self.eat_keyword("WHERE") {
            stmt.where_conditions = Some(self.parse_where()?);
        }

        if self.eat_keyword("GROUP") {
            self.expect_keyword("BY")?;
            stmt.group_by = self.parse_column_list()?;
        }

        if self.eat_keyword("ORDER") {
            self.expect_keyword("BY")?;
            stmt.order_by = self.parse_order_by()?;
        }

        if self.peek().is_keyword("LIMIT") {
            let limit_offset = self.advance().start;
            if row_limit.is_some() {
                return Err(ParseError::at(
                    ParseErrorKind::DuplicateRowLimit,
                    limit_offset,
                ));
            }
            row_limit = Some(self.parse_row_limit()?);
        }
        stmt.row_limit = row_limit;

        self.eat(&TokenKind::Semicolon);
        if self.peek().kind != TokenKind::Eof {
            return Err(self.unexpected("end of statement"));
        }

        validate_wildcards(&stmt)?;
        validate_qualifiers(&stmt)?;
        validate_group_by(&stmt)?;
        validate_output_names(&stmt)?;

        debug!(
            entity = %stmt.entity_name,
            columns = stmt.columns.len(),
            joins = stmt.joins.len(),
            "parsed statement"
        );
        Ok(stmt)
    }

    // Token cursor

    fn peek(&self) -> &Token {
        let last = self.tokens.len() - 1;
        &self.tokens[self.pos.min(last)]
    }

    fn peek_nth(&self, n: usize) -> &Token {
        let last = self.tokens.len() - 1;
        &self.tokens[(self.pos + n).min(last)]
    }

    fn advance(&mut self) -> Token {
        let token = self.peek().clone();
        if token.kind != TokenKind::Eof {
            self.pos += 1;
        }
        token
    }

    fn eat(&mut self, kind: &TokenKind) -> bool {
        if &self.peek().kind == kind {
            self.advance();
            true
        } else {
            false
        }
    }

    fn eat_keyword(&mut self, keyword: &str) -> bool {
        if self.peek().is_keyword(keyword) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, kind: TokenKind, expected: &str) -> ParseResult<Token> {
        if self.peek().kind == kind {
            Ok(self.advance())
        } else {
            Err(self.unexpected(expected))
        }
    }

    fn expect_keyword(&mut self, keyword: &str) -> ParseResult<Token> {
        if self.peek().is_keyword(keyword) {
            Ok(self.advance())
        } else {
            Err(self.unexpected(keyword))
        }
    }

    fn unexpected(&self, expected: &str) -> ParseError {
        let token = self.peek();
        let kind = match token.kind {
            TokenKind::Eof => ParseErrorKind::UnexpectedEnd {
                expected: expected.to_string(),
            },
            _ => ParseErrorKind::UnexpectedToken {
                expected: expected.to_string(),
                found: token.kind.describe(),
            },
        };
        ParseError::at(kind, token.start)
    }

    // Identifiers

    fn at_identifier(&self) -> bool {
        match &self.peek().kind {
            TokenKind::Word(w) => !is_reserved(w),
            TokenKind::QuotedIdent(_) => true,
            _ => false,
        }
    }

    fn parse_identifier(&mut self, expected: &str) -> ParseResult<String> {
        if !self.at_identifier() {
            return Err(self.unexpected(expected));
        }
        match self.advance().kind {
            TokenKind::Word(w) | TokenKind::QuotedIdent(w) => Ok(w),
            _ => unreachable!("at_identifier checked the token kind"),
        }
    }

    /// `[AS] alias`
    fn parse_optional_alias(&mut self) -> ParseResult<Option<String>> {
        if self.eat_keyword("AS") {
            return self.parse_identifier("alias").map(Some);
        }
        if self.at_identifier() {
            return self.parse_identifier("alias").map(Some);
        }
        Ok(None)
    }

    // SELECT list

    fn parse_select_list(&mut self) -> ParseResult<Vec<SelectColumn>> {
        let mut items = vec![self.parse_select_item()?];
        while self.eat(&TokenKind::Comma) {
            items.push(self.parse_select_item()?);
        }
        Ok(assign_default_aliases(items))
    }

    /// A select item, and whether it is an aggregate named by default
    fn parse_select_item(&mut self) -> ParseResult<(SelectColumn, bool)> {
        if self.eat(&TokenKind::Star) {
            return Ok((SelectColumn::Column(ColumnRef::wildcard()), false));
        }

        if self.at_identifier() && self.peek_nth(1).kind == TokenKind::LParen {
            let (aggregate, default_alias) = self.parse_aggregate()?;
            return Ok((SelectColumn::Aggregate(aggregate), default_alias));
        }

        let column = self.parse_column_ref(true)?;
        if column.is_wildcard {
            return Ok((SelectColumn::Column(column), false));
        }
        let alias = self.parse_optional_alias()?;
        Ok((SelectColumn::Column(ColumnRef { alias, ..column }), false))
    }

    fn parse_aggregate(&mut self) -> ParseResult<(AggregateColumn, bool)> {
        let name_token = self.advance();
        let name = match name_token.kind {
            TokenKind::Word(w) | TokenKind::QuotedIdent(w) => w,
            _ => unreachable!("caller checked for an identifier"),
        };
        let function: AggregateFunction = name.parse().map_err(|_| {
            ParseError::at(ParseErrorKind::UnknownAggregate(name.clone()), name_token.start)
        })?;

        self.expect(TokenKind::LParen, "(")?;
        let distinct = self.eat_keyword("DISTINCT");

        let (column_name, table_name) = if self.peek().kind == TokenKind::Star {
            let star = self.advance();
            if function != AggregateFunction::Count || distinct {
                return Err(ParseError::at(
                    ParseErrorKind::WildcardNotAllowed(format!("{}(*)", name.to_uppercase())),
                    star.start,
                ));
            }
            ("*".to_string(), None)
        } else {
            let column = self.parse_column_ref(false)?;
            (column.column_name, column.table_name)
        };
        self.expect(TokenKind::RParen, ")")?;

        let explicit = self.parse_optional_alias()?;
        let default_alias = explicit.is_none();
        let alias = match explicit {
            Some(alias) => alias,
            None if column_name == "*" => function.as_str().to_string(),
            None => format!("{}_{}", function.as_str(), column_name.to_lowercase()),
        };

        let aggregate = AggregateColumn {
            function,
            column_name,
            table_name,
            alias,
            distinct,
        };
        Ok((aggregate, default_alias))
    }

    /// `ident`, `ident.ident` or (when allowed) `ident.*`
    fn parse_column_ref(&mut self, allow_wildcard: bool) -> ParseResult<ColumnRef> {
        let first = self.parse_identifier("column name")?;
        if !self.eat(&TokenKind::Dot) {
            return Ok(ColumnRef::new(first));
        }

        if self.peek().kind == TokenKind::Star {
            let star = self.advance();
            if !allow_wildcard {
                return Err(ParseError::at(
                    ParseErrorKind::WildcardNotAllowed(format!("{}.*", first)),
                    star.start,
                ));
            }
            return Ok(ColumnRef {
                is_wildcard: true,
                ..ColumnRef::qualified(first, "*")
            });
        }

        let column = self.parse_identifier("column name")?;
        Ok(ColumnRef::qualified(first, column))
    }

    fn parse_column_list(&mut self) -> ParseResult<Vec<ColumnRef>> {
        let mut columns = vec![self.parse_column_ref(false)?];
        while self.eat(&TokenKind::Comma) {
            columns.push(self.parse_column_ref(false)?);
        }
        Ok(columns)
    }

    // JOIN

    fn at_join(&self) -> bool {
        let token = self.peek();
        token.is_keyword("JOIN") || token.is_keyword("INNER") || token.is_keyword("LEFT")
    }

    fn parse_join(&mut self, stmt: &SqlSelectStatement) -> ParseResult<JoinClause> {
        let join_type = if self.eat_keyword("LEFT") {
            self.eat_keyword("OUTER");
            JoinType::LeftOuter
        } else {
            self.eat_keyword("INNER");
            JoinType::Inner
        };
        self.expect_keyword("JOIN")?;

        let entity_name = self.parse_identifier("entity name")?;
        let alias = self.parse_optional_alias()?;
        let on = self.expect_keyword("ON")?;

        let first = self.parse_column_ref(false)?;
        self.expect(TokenKind::Eq, "=")?;
        let second = self.parse_column_ref(false)?;

        let mut join = JoinClause {
            join_type,
            entity_name,
            alias,
            left: first,
            right: second,
        };

        let names_join = |col: &ColumnRef| {
            col.table_name
                .as_deref()
                .is_some_and(|t| join.is_referenced_by(t))
        };
        let names_earlier = |col: &ColumnRef| {
            col.table_name
                .as_deref()
                .is_some_and(|t| resolve_qualifier(stmt, t).is_some())
        };
        let reversed = names_join(&join.left) && names_earlier(&join.right);
        let forward = names_earlier(&join.left) && names_join(&join.right);

        if reversed {
            std::mem::swap(&mut join.left, &mut join.right);
        } else if !forward {
            return Err(ParseError::at(
                ParseErrorKind::InvalidJoinCondition(format!(
                    "ON {} = {} must link {} to an earlier table with qualified columns",
                    join.left,
                    join.right,
                    join.reference_name()
                )),
                on.start,
            ));
        }

        Ok(join)
    }

    // WHERE

    fn parse_where(&mut self) -> ParseResult<WhereClause> {
        let mut conditions = vec![self.parse_predicate()?];
        let mut operator = None;

        loop {
            let next = if self.peek().is_keyword("AND") {
                LogicalOperator::And
            } else if self.peek().is_keyword("OR") {
                LogicalOperator::Or
            } else {
                break;
            };
            let token = self.advance();
            match operator {
                Some(current) if current != next => {
                    return Err(ParseError::at(
                        ParseErrorKind::MixedLogicalOperators,
                        token.start,
                    ));
                }
                _ => operator = Some(next),
            }
            conditions.push(self.parse_predicate()?);
        }

        Ok(WhereClause {
            operator: operator.unwrap_or_default(),
            conditions,
        })
    }

    fn parse_predicate(&mut self) -> ParseResult<Condition> {
        let column = self.parse_column_ref(false)?;

        let comparison = match self.peek().kind {
            TokenKind::Eq => Some(ConditionOperator::Eq),
            TokenKind::NotEq => Some(ConditionOperator::NotEq),
            TokenKind::Lt => Some(ConditionOperator::Lt),
            TokenKind::LtEq => Some(ConditionOperator::LtEq),
            TokenKind::Gt => Some(ConditionOperator::Gt),
            TokenKind::GtEq => Some(ConditionOperator::GtEq),
            _ => None,
        };
        if let Some(operator) = comparison {
            self.advance();
            let (value, offset) = self.parse_literal()?;
            if value == Literal::Null {
                return Err(ParseError::at(ParseErrorKind::NullComparison, offset));
            }
            return Ok(Condition::new(column, operator, vec![value]));
        }

        if self.eat_keyword("IS") {
            let operator = if self.eat_keyword("NOT") {
                ConditionOperator::IsNotNull
            } else {
                ConditionOperator::IsNull
            };
            self.expect_keyword("NULL")?;
            return Ok(Condition::new(column, operator, Vec::new()));
        }

        let negated = self.eat_keyword("NOT");
        if self.eat_keyword("LIKE") {
            let pattern = match self.peek().kind.clone() {
                TokenKind::StringLit(s) => {
                    self.advance();
                    s
                }
                _ => return Err(self.unexpected("string pattern")),
            };
            let operator = if negated {
                ConditionOperator::NotLike
            } else {
                ConditionOperator::Like
            };
            return Ok(Condition::new(column, operator, vec![Literal::String(pattern)]));
        }

        if self.eat_keyword("IN") {
            self.expect(TokenKind::LParen, "(")?;
            let mut values = Vec::new();
            loop {
                let (value, offset) = self.parse_literal()?;
                if value == Literal::Null {
                    return Err(ParseError::at(ParseErrorKind::NullComparison, offset));
                }
                values.push(value);
                if !self.eat(&TokenKind::Comma) {
                    break;
                }
            }
            self.expect(TokenKind::RParen, ")")?;
            let operator = if negated {
                ConditionOperator::NotIn
            } else {
                ConditionOperator::In
            };
            return Ok(Condition::new(column, operator, values));
        }

        Err(self.unexpected(if negated {
            "LIKE or IN"
        } else {
            "comparison operator"
        }))
    }

    /// Literal value and the offset it starts at
    fn parse_literal(&mut self) -> ParseResult<(Literal, usize)> {
        let token = self.peek().clone();
        let literal = match &token.kind {
            TokenKind::StringLit(s) => Literal::String(s.clone()),
            TokenKind::Number(n) => number_literal(n, false),
            TokenKind::Minus => {
                self.advance();
                match self.peek().kind.clone() {
                    TokenKind::Number(n) => number_literal(&n, true),
                    _ => return Err(self.unexpected("number")),
                }
            }
            TokenKind::Word(w) if w.eq_ignore_ascii_case("NULL") => Literal::Null,
            TokenKind::Word(w) if w.eq_ignore_ascii_case("TRUE") => Literal::Boolean(true),
            TokenKind::Word(w) if w.eq_ignore_ascii_case("FALSE") => Literal::Boolean(false),
            _ => return Err(self.unexpected("literal value")),
        };
        self.advance();
        Ok((literal, token.start))
    }

    // ORDER BY / limits

    fn parse_order_by(&mut self) -> ParseResult<Vec<OrderByItem>> {
        let mut items = Vec::new();
        loop {
            let column = self.parse_column_ref(false)?;
            let descending = if self.eat_keyword("DESC") {
                true
            } else {
                self.eat_keyword("ASC");
                false
            };
            items.push(OrderByItem { column, descending });
            if !self.eat(&TokenKind::Comma) {
                return Ok(items);
            }
        }
    }

    fn parse_row_limit(&mut self) -> ParseResult<u32> {
        let token = self.peek().clone();
        match &token.kind {
            TokenKind::Number(n) => {
                self.advance();
                match n.parse::<u32>() {
                    Ok(limit) if limit > 0 => Ok(limit),
                    _ => Err(ParseError::at(
                        ParseErrorKind::InvalidRowLimit(n.clone()),
                        token.start,
                    )),
                }
            }
            TokenKind::Minus => {
                self.advance();
                let found = match &self.peek().kind {
                    TokenKind::Number(n) => format!("-{}", n),
                    other => format!("-{}", other.describe()),
                };
                Err(ParseError::at(
                    ParseErrorKind::InvalidRowLimit(found),
                    token.start,
                ))
            }
            _ => Err(self.unexpected("row limit")),
        }
    }
}

fn number_literal(text: &str, negative: bool) -> Literal {
    let signed = if negative {
        format!("-{}", text)
    } else {
        text.to_string()
    };
    if text.contains('.') {
        return Literal::Decimal(signed);
    }
    // Integers beyond i64 keep their digits as a decimal
    signed
        .parse::<i64>()
        .map(Literal::Integer)
        .unwrap_or(Literal::Decimal(signed))
}

fn resolve_qualifier(stmt: &SqlSelectStatement, qualifier: &str) -> Option<TableSlot> {
    if stmt.is_main_entity_qualifier(qualifier) {
        return Some(TableSlot::Main);
    }
    stmt.joins
        .iter()
        .position(|j| j.is_referenced_by(qualifier))
        .map(TableSlot::Join)
}

fn table_of(stmt: &SqlSelectStatement, column: &ColumnRef) -> Option<TableSlot> {
    match column.table_name.as_deref() {
        None => Some(TableSlot::Main),
        Some(q) => resolve_qualifier(stmt, q),
    }
}

/// A wildcard may not share its table with other columns and may not appear
/// in an aggregate query.
fn validate_wildcards(stmt: &SqlSelectStatement) -> ParseResult<()> {
    let aggregate = stmt.is_aggregate();
    for wildcard in stmt.column_refs().filter(|c| c.is_wildcard) {
        if aggregate {
            return Err(ParseError::new(
                ParseErrorKind::WildcardNotAllowed(format!(
                    "'{}' in an aggregate query",
                    wildcard
                )),
                None,
            ));
        }
        let slot = table_of(stmt, wildcard);
        let shared = stmt
            .column_refs()
            .filter(|c| !std::ptr::eq(*c, wildcard))
            .any(|c| table_of(stmt, c) == slot);
        if shared {
            return Err(ParseError::new(
                ParseErrorKind::WildcardNotAllowed(format!(
                    "'{}' cannot be combined with other columns of the same table",
                    wildcard
                )),
                None,
            ));
        }
    }
    Ok(())
}

/// Every qualifier must name the FROM entity or a join
fn validate_qualifiers(stmt: &SqlSelectStatement) -> ParseResult<()> {
    let aggregate_tables = stmt.columns.iter().filter_map(|c| match c {
        SelectColumn::Aggregate(agg) => agg.table_name.as_deref(),
        SelectColumn::Column(_) => None,
    });
    let column_tables = stmt
        .column_refs()
        .chain(
            stmt.where_conditions
                .iter()
                .flat_map(|w| w.conditions.iter().map(|c| &c.column)),
        )
        .chain(stmt.group_by.iter())
        .chain(stmt.order_by.iter().map(|o| &o.column))
        .filter_map(|c| c.table_name.as_deref());

    for qualifier in aggregate_tables.chain(column_tables) {
        if resolve_qualifier(stmt, qualifier).is_none() {
            return Err(ParseError::new(
                ParseErrorKind::UnknownQualifier(qualifier.to_string()),
                None,
            ));
        }
    }
    Ok(())
}

/// Give repeated default aggregate names a numeric suffix (`count`, `count_2`)
///
/// Names written with `AS` are never changed and are reserved up front.
fn assign_default_aliases(items: Vec<(SelectColumn, bool)>) -> Vec<SelectColumn> {
    let mut taken: Vec<String> = items
        .iter()
        .filter(|(_, default_alias)| !default_alias)
        .map(|(column, _)| column.output_name().to_string())
        .collect();

    items
        .into_iter()
        .map(|(mut column, default_alias)| {
            if let (SelectColumn::Aggregate(agg), true) = (&mut column, default_alias) {
                let base = agg.alias.clone();
                let mut suffix = 2;
                while taken.iter().any(|t| t.eq_ignore_ascii_case(&agg.alias)) {
                    agg.alias = format!("{}_{}", base, suffix);
                    suffix += 1;
                }
                taken.push(agg.alias.clone());
            }
            column
        })
        .collect()
}

/// No two select items may come back under the same key
///
/// Keys compare case-insensitively: the alias, else the column name for the
/// FROM entity, else `joinalias.column`.
fn validate_output_names(stmt: &SqlSelectStatement) -> ParseResult<()> {
    let mut seen: Vec<String> = Vec::new();
    for column in &stmt.columns {
        let key = match column {
            SelectColumn::Aggregate(agg) => agg.alias.clone(),
            SelectColumn::Column(col) if col.is_wildcard => continue,
            SelectColumn::Column(col) => match (&col.alias, col.table_name.as_deref()) {
                (Some(alias), _) => alias.clone(),
                (None, Some(table)) if !stmt.is_main_entity_qualifier(table) => {
                    let link = stmt.find_join(table).map_or(table, |j| j.reference_name());
                    format!("{}.{}", link, col.column_name)
                }
                (None, _) => col.column_name.clone(),
            },
        };
        if seen.iter().any(|k| k.eq_ignore_ascii_case(&key)) {
            return Err(ParseError::new(ParseErrorKind::DuplicateOutputName(key), None));
        }
        seen.push(key);
    }
    Ok(())
}

fn validate_group_by(stmt: &SqlSelectStatement) -> ParseResult<()> {
    for grouped in &stmt.group_by {
        if !stmt.column_refs().any(|c| c.same_selection(grouped)) {
            return Err(ParseError::new(
                ParseErrorKind::GroupByNotSelected(grouped.to_string()),
                None,
            ));
        }
    }
    Ok(())
}
