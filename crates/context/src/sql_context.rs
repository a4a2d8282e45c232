// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # SQL completion context
//!
//! Classifies a cursor position in possibly incomplete SQL as an entity
//! position, an attribute position or a keyword position. This is a
//! position-anchored scan over a forgiving tokenizer, not a parse, so it
//! works on text the parser would reject.
//!
//! Rules, first match wins:
//!
//! 1. The token before the cursor is `FROM`/`JOIN` (or the cursor is inside
//!    the identifier that follows one) → [`SqlContext::Entity`].
//! 2. The cursor is in an attribute position (SELECT list, after
//!    `WHERE`/`AND`/`OR`/`ON`, after `GROUP BY`/`ORDER BY` or a comma there)
//!    and an entity is known → [`SqlContext::Attribute`]. `alias.` resolves
//!    to the aliased entity.
//! 3. Otherwise → [`SqlContext::Keyword`] with the keywords valid there.
//!
//! An entity is never guessed: if none has been typed the result is a
//! keyword context.

use serde::Serialize;
use tracing::trace;

use crate::keywords::{KeywordPosition, KeywordProvider, SqlKeyword};

/// What to complete at a SQL cursor position
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum SqlContext {
    /// Entity (table) name
    Entity,
    /// Attribute (column) of `entity_name`
    #[serde(rename_all = "camelCase")]
    Attribute { entity_name: String },
    /// Keywords valid at the position; may be empty
    #[serde(rename_all = "camelCase")]
    Keyword { suggested_keywords: Vec<SqlKeyword> },
}

impl SqlContext {
    pub fn is_entity(&self) -> bool {
        matches!(self, SqlContext::Entity)
    }

    pub fn is_attribute(&self) -> bool {
        matches!(self, SqlContext::Attribute { .. })
    }

    pub fn is_keyword(&self) -> bool {
        matches!(self, SqlContext::Keyword { .. })
    }

    fn keywords(position: KeywordPosition) -> Self {
        SqlContext::Keyword {
            suggested_keywords: KeywordProvider::new().keywords_for(position),
        }
    }
}

const RESERVED: &[&str] = &[
    "SELECT", "FROM", "WHERE", "ORDER", "GROUP", "BY", "LIMIT", "TOP", "JOIN", "INNER", "LEFT",
    "OUTER", "ON", "AND", "OR", "NOT", "IN", "IS", "NULL", "LIKE", "AS", "ASC", "DESC",
    "DISTINCT",
];

#[derive(Debug, Clone, PartialEq, Eq)]
enum Kind {
    Word(String),
    Quoted(String),
    Number,
    Str,
    Comma,
    Dot,
    LParen,
    RParen,
    Semicolon,
    /// `*` and comparison operators
    Operator,
}

#[derive(Debug, Clone)]
struct Tok {
    kind: Kind,
    start: usize,
    end: usize,
}

impl Tok {
    fn is_keyword(&self, keyword: &str) -> bool {
        matches!(&self.kind, Kind::Word(w) if w.eq_ignore_ascii_case(keyword))
    }

    fn is_any_keyword(&self, keywords: &[&str]) -> bool {
        keywords.iter().any(|k| self.is_keyword(k))
    }

    /// Identifier usable as an entity, alias or column name
    fn identifier(&self) -> Option<&str> {
        match &self.kind {
            Kind::Word(w) if !RESERVED.iter().any(|r| r.eq_ignore_ascii_case(w)) => Some(w),
            Kind::Quoted(q) => Some(q),
            _ => None,
        }
    }

    fn is_word_like(&self) -> bool {
        matches!(self.kind, Kind::Word(_) | Kind::Quoted(_) | Kind::Number)
    }
}

/// Byte range the cursor must not complete inside (strings, comments)
#[derive(Debug, Clone, Copy)]
struct Opaque {
    start: usize,
    end: usize,
    terminated: bool,
    line_comment: bool,
}

impl Opaque {
    fn contains(&self, offset: usize) -> bool {
        if offset <= self.start {
            return false;
        }
        if !self.terminated || self.line_comment {
            return offset <= self.end;
        }
        offset < self.end
    }
}

fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, '_' | '@' | '#' | '$')
}

/// Forgiving tokenizer: never fails, unterminated constructs run to the end
fn scan(text: &str) -> (Vec<Tok>, Vec<Opaque>) {
    let mut tokens = Vec::new();
    let mut opaque = Vec::new();
    let mut chars = text.char_indices().peekable();

    while let Some((start, c)) = chars.next() {
        let rest = &text[start..];
        let kind = match c {
            c if c.is_whitespace() => continue,
            '-' if rest.starts_with("--") => {
                let end = rest.find('\n').map_or(text.len(), |i| start + i);
                while chars.peek().is_some_and(|&(i, _)| i < end) {
                    chars.next();
                }
                opaque.push(Opaque {
                    start,
                    end,
                    terminated: true,
                    line_comment: true,
                });
                continue;
            }
            '/' if rest.starts_with("/*") => {
                let (end, terminated) = match rest[2..].find("*/") {
                    Some(i) => (start + 2 + i + 2, true),
                    None => (text.len(), false),
                };
                while chars.peek().is_some_and(|&(i, _)| i < end) {
                    chars.next();
                }
                opaque.push(Opaque {
                    start,
                    end,
                    terminated,
                    line_comment: false,
                });
                continue;
            }
            '\'' => {
                let mut end = text.len();
                let mut terminated = false;
                while let Some((i, ch)) = chars.next() {
                    if ch == '\'' {
                        if chars.peek().is_some_and(|&(_, n)| n == '\'') {
                            chars.next();
                            continue;
                        }
                        end = i + 1;
                        terminated = true;
                        break;
                    }
                }
                opaque.push(Opaque {
                    start,
                    end,
                    terminated,
                    line_comment: false,
                });
                tokens.push(Tok {
                    kind: Kind::Str,
                    start,
                    end,
                });
                continue;
            }
            '[' | '"' => {
                let close = if c == '[' { ']' } else { '"' };
                let mut end = text.len();
                let mut name = String::new();
                for (i, ch) in chars.by_ref() {
                    if ch == close {
                        end = i + 1;
                        break;
                    }
                    name.push(ch);
                }
                tokens.push(Tok {
                    kind: Kind::Quoted(name),
                    start,
                    end,
                });
                continue;
            }
            ',' => Kind::Comma,
            '.' => Kind::Dot,
            '(' => Kind::LParen,
            ')' => Kind::RParen,
            ';' => Kind::Semicolon,
            c if c.is_ascii_digit() => {
                while chars
                    .peek()
                    .is_some_and(|&(_, n)| n.is_ascii_digit() || n == '.')
                {
                    chars.next();
                }
                Kind::Number
            }
            c if is_ident_char(c) => {
                let mut end = start + c.len_utf8();
                while let Some(&(i, n)) = chars.peek() {
                    if !is_ident_char(n) {
                        break;
                    }
                    end = i + n.len_utf8();
                    chars.next();
                }
                tokens.push(Tok {
                    kind: Kind::Word(text[start..end].to_string()),
                    start,
                    end,
                });
                continue;
            }
            '<' | '>' | '!' | '=' => {
                while chars.peek().is_some_and(|&(_, n)| matches!(n, '<' | '>' | '=')) {
                    chars.next();
                }
                Kind::Operator
            }
            _ => Kind::Operator,
        };
        let end = chars.peek().map_or(text.len(), |&(i, _)| i);
        tokens.push(Tok { kind, start, end });
    }

    (tokens, opaque)
}

/// Clamp to the text and back onto a char boundary
pub(crate) fn clamp_offset(text: &str, offset: usize) -> usize {
    let mut offset = offset.min(text.len());
    while !text.is_char_boundary(offset) {
        offset -= 1;
    }
    offset
}

/// The partially typed identifier ending at the cursor
pub fn sql_completion_prefix(text: &str, offset: usize) -> &str {
    let offset = clamp_offset(text, offset);
    let start = text[..offset]
        .char_indices()
        .rev()
        .take_while(|&(_, c)| is_ident_char(c))
        .last()
        .map_or(offset, |(i, _)| i);
    &text[start..offset]
}

#[derive(Debug, Clone)]
struct TableRef {
    entity: String,
    alias: Option<String>,
    is_from: bool,
    /// Index of the FROM/JOIN keyword
    at: usize,
}

/// Where the cursor sits, before entity resolution
#[derive(Debug, Clone, PartialEq, Eq)]
enum Slot {
    Entity,
    /// Attribute of the FROM entity; `select_list` allows a FROM after the cursor
    MainAttribute { select_list: bool },
    /// Attribute inside an ON clause; the entity joined by that clause
    JoinAttribute { join_at: usize },
    Keyword(KeywordPosition),
}

/// Detect the completion context at byte `offset` of `text`
///
/// Total: any text and any offset yield a context.
pub fn detect_sql_context(text: &str, offset: usize) -> SqlContext {
    let offset = clamp_offset(text, offset);
    let (all_tokens, opaque) = scan(text);

    if opaque.iter().any(|o| o.contains(offset)) {
        trace!(offset, "cursor inside string or comment");
        return SqlContext::keywords(KeywordPosition::Nothing);
    }

    // Restrict to the statement around the cursor
    let stmt_start = all_tokens
        .iter()
        .rposition(|t| t.kind == Kind::Semicolon && t.end <= offset)
        .map_or(0, |i| i + 1);
    let stmt_end = all_tokens
        .iter()
        .position(|t| t.kind == Kind::Semicolon && t.start >= offset)
        .unwrap_or(all_tokens.len());
    let tokens = &all_tokens[stmt_start..stmt_end.max(stmt_start)];

    // Identifier under the cursor is the prefix being typed
    let current = tokens
        .iter()
        .position(|t| t.is_word_like() && t.start < offset && offset <= t.end);
    let split = current.unwrap_or_else(|| tokens.iter().take_while(|t| t.end <= offset).count());
    let before = &tokens[..split];
    let tables = collect_tables(tokens);

    // `alias.` qualifier
    if let [.., qualifier, dot] = before {
        if dot.kind == Kind::Dot {
            let Some(qualifier) = qualifier.identifier() else {
                return SqlContext::keywords(KeywordPosition::Nothing);
            };
            let slot = classify(&before[..before.len() - 2]);
            let attribute_position =
                matches!(slot, Slot::MainAttribute { .. } | Slot::JoinAttribute { .. });
            if !attribute_position {
                return SqlContext::keywords(KeywordPosition::Nothing);
            }
            return match resolve_qualifier(&tables, qualifier) {
                Some(entity) => SqlContext::Attribute {
                    entity_name: entity.to_string(),
                },
                None => SqlContext::keywords(KeywordPosition::Nothing),
            };
        }
    }

    let slot = classify(before);
    trace!(offset, ?slot, "classified SQL cursor position");

    match slot {
        Slot::Entity => SqlContext::Entity,
        Slot::MainAttribute { select_list } => {
            let from = tables
                .iter()
                .filter(|t| t.is_from && t.at < split)
                .last()
                .or_else(|| {
                    select_list
                        .then(|| tables.iter().find(|t| t.is_from && t.at >= split))
                        .flatten()
                });
            match from {
                Some(table) => SqlContext::Attribute {
                    entity_name: table.entity.clone(),
                },
                None if select_list => SqlContext::keywords(KeywordPosition::SelectListStart),
                None => SqlContext::keywords(KeywordPosition::Nothing),
            }
        }
        Slot::JoinAttribute { join_at } => match tables.iter().find(|t| t.at == join_at) {
            Some(table) => SqlContext::Attribute {
                entity_name: table.entity.clone(),
            },
            None => SqlContext::keywords(KeywordPosition::Nothing),
        },
        Slot::Keyword(position) => SqlContext::keywords(position),
    }
}

fn collect_tables(tokens: &[Tok]) -> Vec<TableRef> {
    let mut tables = Vec::new();
    for (at, token) in tokens.iter().enumerate() {
        let is_from = token.is_keyword("FROM");
        if !is_from && !token.is_keyword("JOIN") {
            continue;
        }
        let Some(entity) = tokens.get(at + 1).and_then(Tok::identifier) else {
            continue;
        };
        let mut next = at + 2;
        if tokens.get(next).is_some_and(|t| t.is_keyword("AS")) {
            next += 1;
        }
        let alias = tokens
            .get(next)
            .and_then(Tok::identifier)
            .map(str::to_string);
        tables.push(TableRef {
            entity: entity.to_string(),
            alias,
            is_from,
            at,
        });
    }
    tables
}

fn resolve_qualifier<'a>(tables: &'a [TableRef], qualifier: &str) -> Option<&'a str> {
    tables
        .iter()
        .find(|t| {
            t.alias
                .as_deref()
                .is_some_and(|a| a.eq_ignore_ascii_case(qualifier))
        })
        .or_else(|| {
            tables
                .iter()
                .find(|t| t.entity.eq_ignore_ascii_case(qualifier))
        })
        .map(|t| t.entity.as_str())
}

const CLAUSE_KEYWORDS: &[&str] = &["SELECT", "FROM", "JOIN", "ON", "WHERE", "BY", "LIMIT"];

/// Classify the position right after `before`
fn classify(before: &[Tok]) -> Slot {
    let Some(prev) = before.last() else {
        return Slot::Keyword(KeywordPosition::StatementStart);
    };

    if prev.is_any_keyword(&["FROM", "JOIN"]) {
        return Slot::Entity;
    }
    if prev.is_any_keyword(&["GROUP", "ORDER"]) {
        return Slot::Keyword(KeywordPosition::ExpectBy);
    }
    if prev.is_any_keyword(&["INNER", "LEFT", "OUTER"]) {
        return Slot::Keyword(KeywordPosition::JoinModifier);
    }
    if prev.is_keyword("AS") {
        return Slot::Keyword(KeywordPosition::Nothing);
    }

    let Some(clause_at) = before
        .iter()
        .rposition(|t| t.is_any_keyword(CLAUSE_KEYWORDS))
    else {
        return Slot::Keyword(KeywordPosition::StatementStart);
    };
    let clause = &before[clause_at];
    let rest = &before[clause_at + 1..];

    if clause.is_keyword("SELECT") {
        classify_select(rest)
    } else if clause.is_keyword("FROM") {
        Slot::Keyword(KeywordPosition::AfterFromEntity {
            has_alias: identifier_count(rest) >= 2,
        })
    } else if clause.is_keyword("JOIN") {
        Slot::Keyword(KeywordPosition::AfterJoinEntity {
            has_alias: identifier_count(rest) >= 2,
        })
    } else if clause.is_keyword("ON") {
        classify_on(before, clause_at, rest)
    } else if clause.is_keyword("WHERE") {
        classify_where(before, rest)
    } else if clause.is_keyword("BY") {
        let ordering = clause_at
            .checked_sub(1)
            .and_then(|i| before.get(i))
            .is_some_and(|t| t.is_keyword("ORDER"));
        classify_by(prev, ordering)
    } else {
        // LIMIT
        Slot::Keyword(KeywordPosition::Nothing)
    }
}

fn identifier_count(tokens: &[Tok]) -> usize {
    tokens.iter().filter(|t| t.identifier().is_some()).count()
}

fn classify_select(rest: &[Tok]) -> Slot {
    let list = Slot::MainAttribute { select_list: true };
    let Some(prev) = rest.last() else {
        return list;
    };

    match prev.kind {
        Kind::Comma | Kind::LParen => return list,
        Kind::Number if rest.len() >= 2 && rest[rest.len() - 2].is_keyword("TOP") => {
            return list;
        }
        _ => {}
    }
    if prev.is_keyword("DISTINCT") {
        return list;
    }
    if prev.is_keyword("TOP") {
        return Slot::Keyword(KeywordPosition::Nothing);
    }
    Slot::Keyword(KeywordPosition::AfterSelectColumn)
}

fn classify_on(before: &[Tok], on_at: usize, rest: &[Tok]) -> Slot {
    let join_at = before[..on_at]
        .iter()
        .rposition(|t| t.is_keyword("JOIN"))
        .unwrap_or(usize::MAX);
    let attribute = Slot::JoinAttribute { join_at };

    let Some(prev) = rest.last() else {
        return attribute;
    };
    if prev.kind == Kind::Operator || prev.is_keyword("AND") {
        return attribute;
    }
    let has_operator = rest.iter().any(|t| t.kind == Kind::Operator);
    if prev.identifier().is_some() && has_operator {
        return Slot::Keyword(KeywordPosition::AfterJoinCondition);
    }
    Slot::Keyword(KeywordPosition::Nothing)
}

fn classify_where(before: &[Tok], rest: &[Tok]) -> Slot {
    let attribute = Slot::MainAttribute { select_list: false };
    let Some(prev) = rest.last() else {
        return attribute;
    };

    if prev.is_any_keyword(&["AND", "OR"]) {
        return attribute;
    }
    if prev.is_keyword("NOT") {
        return Slot::Keyword(KeywordPosition::AfterNot);
    }
    if prev.is_keyword("IS") {
        return Slot::Keyword(KeywordPosition::AfterIs);
    }
    if prev.is_keyword("NULL") {
        return Slot::Keyword(KeywordPosition::AfterPredicate);
    }
    if prev.is_any_keyword(&["LIKE", "IN"]) {
        return Slot::Keyword(KeywordPosition::Nothing);
    }

    let open_parens = rest.iter().filter(|t| t.kind == Kind::LParen).count();
    let close_parens = rest.iter().filter(|t| t.kind == Kind::RParen).count();
    if open_parens > close_parens {
        // Inside an IN list
        return Slot::Keyword(KeywordPosition::Nothing);
    }

    match prev.kind {
        Kind::Operator | Kind::Comma | Kind::LParen | Kind::Dot => {
            Slot::Keyword(KeywordPosition::Nothing)
        }
        Kind::RParen | Kind::Str | Kind::Number => {
            Slot::Keyword(KeywordPosition::AfterPredicate)
        }
        _ => {
            // A column directly after WHERE/AND/OR still needs its operator
            let mut column_start = before.len() - 1;
            if column_start >= 2 && before[column_start - 1].kind == Kind::Dot {
                column_start -= 2;
            }
            let opener = column_start.checked_sub(1).map(|i| &before[i]);
            if opener.is_some_and(|t| t.is_any_keyword(&["WHERE", "AND", "OR"])) {
                Slot::Keyword(KeywordPosition::AfterPredicateColumn)
            } else {
                Slot::Keyword(KeywordPosition::AfterPredicate)
            }
        }
    }
}

fn classify_by(prev: &Tok, ordering: bool) -> Slot {
    if prev.is_keyword("BY") || prev.kind == Kind::Comma {
        return Slot::MainAttribute { select_list: false };
    }
    if !ordering {
        return Slot::Keyword(KeywordPosition::AfterGroupByColumn);
    }
    if prev.is_any_keyword(&["ASC", "DESC"]) {
        Slot::Keyword(KeywordPosition::AfterSortDirection)
    } else {
        Slot::Keyword(KeywordPosition::AfterOrderByColumn)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn at_end(text: &str) -> SqlContext {
        detect_sql_context(text, text.len())
    }

    fn attribute(entity: &str) -> SqlContext {
        SqlContext::Attribute {
            entity_name: entity.to_string(),
        }
    }

    fn labels(ctx: &SqlContext) -> Vec<String> {
        match ctx {
            SqlContext::Keyword { suggested_keywords } => {
                suggested_keywords.iter().map(|k| k.label.clone()).collect()
            }
            other => panic!("expected keyword context, got {:?}", other),
        }
    }

    #[test]
    fn test_entity_after_from() {
        assert_eq!(at_end("SELECT name FROM "), SqlContext::Entity);
        assert_eq!(at_end("SELECT name FROM acc"), SqlContext::Entity);
        assert_eq!(at_end("select name from "), SqlContext::Entity);
        // `from` with no trailing space is still the keyword being typed
        assert!(labels(&at_end("select name from")).contains(&"FROM".to_string()));
    }

    #[test]
    fn test_entity_after_join() {
        assert_eq!(
            at_end("SELECT a.name FROM account a LEFT JOIN "),
            SqlContext::Entity
        );
    }

    #[test]
    fn test_select_without_from_is_keyword() {
        let ctx = at_end("SELECT na");
        assert!(ctx.is_keyword());
        assert!(labels(&ctx).is_empty());
        assert!(labels(&at_end("SELECT ")).is_empty());
    }

    #[test]
    fn test_select_list_with_from_after_cursor() {
        let text = "SELECT na FROM account";
        assert_eq!(detect_sql_context(text, 9), attribute("account"));
        assert_eq!(detect_sql_context("SELECT  FROM account", 7), attribute("account"));
    }

    #[test]
    fn test_where_attribute() {
        assert_eq!(at_end("SELECT name FROM account WHERE "), attribute("account"));
        assert_eq!(
            at_end("SELECT name FROM account WHERE statecode = 0 AND na"),
            attribute("account")
        );
    }

    #[test]
    fn test_alias_qualifier_resolves_join() {
        let text = "SELECT a.name FROM account a JOIN contact c ON a.primarycontactid = c.contactid WHERE c.";
        assert_eq!(at_end(text), attribute("contact"));

        let select = "SELECT c. FROM account a JOIN contact c ON a.primarycontactid = c.contactid";
        assert_eq!(detect_sql_context(select, 9), attribute("contact"));
    }

    #[test]
    fn test_unknown_qualifier_never_guesses() {
        let ctx = at_end("SELECT name FROM account WHERE x.");
        assert_eq!(labels(&ctx), Vec::<String>::new());
    }

    #[test]
    fn test_on_clause_uses_joined_entity() {
        assert_eq!(
            at_end("SELECT name FROM account a JOIN contact c ON "),
            attribute("contact")
        );
        assert_eq!(
            at_end("SELECT name FROM account a JOIN contact c ON a."),
            attribute("account")
        );
    }

    #[test]
    fn test_keywords_after_from_entity() {
        let after_entity = labels(&at_end("SELECT name FROM account "));
        assert!(after_entity.contains(&"WHERE".to_string()));
        assert!(after_entity.contains(&"AS".to_string()));

        let after_alias = labels(&at_end("SELECT name FROM account a "));
        assert!(after_alias.contains(&"JOIN".to_string()));
        assert!(!after_alias.contains(&"AS".to_string()));
    }

    #[test]
    fn test_keywords_after_select_column() {
        assert_eq!(labels(&at_end("SELECT name ")), vec!["FROM", "AS"]);
    }

    #[test]
    fn test_predicate_positions() {
        assert!(labels(&at_end("SELECT name FROM account WHERE name ")).contains(&"LIKE".to_string()));
        assert!(labels(&at_end("SELECT name FROM account WHERE name = 'x' ")).contains(&"AND".to_string()));
        assert!(labels(&at_end("SELECT name FROM account WHERE revenue IS ")).contains(&"NULL".to_string()));
        assert!(labels(&at_end("SELECT name FROM account WHERE name = ")).is_empty());
        assert!(labels(&at_end("SELECT name FROM account WHERE code IN (1, ")).is_empty());
    }

    #[test]
    fn test_order_and_group_by() {
        assert_eq!(
            at_end("SELECT name FROM account ORDER BY "),
            attribute("account")
        );
        assert_eq!(
            at_end("SELECT name FROM account GROUP BY name, "),
            attribute("account")
        );
        assert_eq!(labels(&at_end("SELECT name FROM account ORDER ")), vec!["BY"]);
        assert!(labels(&at_end("SELECT name FROM account ORDER BY name ")).contains(&"DESC".to_string()));
    }

    #[test]
    fn test_statement_start() {
        assert_eq!(labels(&at_end("")), vec!["SELECT"]);
        assert_eq!(labels(&at_end("  SEL")), vec!["SELECT"]);
        assert_eq!(labels(&at_end("SELECT name FROM account; ")), vec!["SELECT"]);
    }

    #[test]
    fn test_inside_string_and_comment() {
        assert!(labels(&at_end("SELECT name FROM account WHERE name = 'Con")).is_empty());
        assert!(labels(&at_end("SELECT name FROM account -- FROM ")).is_empty());
        assert!(labels(&detect_sql_context("SELECT /* FROM */ name FROM account", 12)).is_empty());
    }

    #[test]
    fn test_offsets_are_clamped() {
        assert_eq!(detect_sql_context("SELECT name FROM ", 1000), SqlContext::Entity);
        // Inside the two-byte 'é'
        assert!(detect_sql_context("SELECT é", 8).is_keyword());
    }

    #[test]
    fn test_completion_prefix() {
        assert_eq!(sql_completion_prefix("SELECT na", 9), "na");
        assert_eq!(sql_completion_prefix("SELECT a.na", 11), "na");
        assert_eq!(sql_completion_prefix("SELECT ", 7), "");
        assert_eq!(sql_completion_prefix("SELECT größe", 100), "größe");
    }
}
