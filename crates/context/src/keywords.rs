// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # SQL Keywords for Completion
//!
//! This module defines the keywords of the Dataverse SQL dialect, organized by
//! the syntactic position they may follow.

use serde::Serialize;

/// SQL keyword with metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SqlKeyword {
    /// The keyword text
    pub label: String,
    /// Optional description/documentation
    pub description: Option<String>,
    /// Position in the completion list (lower comes first)
    pub sort_priority: i32,
}

impl SqlKeyword {
    /// Create a new SQL keyword
    pub fn new(label: &str, description: Option<&str>, sort_priority: i32) -> Self {
        Self {
            label: label.to_uppercase(),
            description: description.map(|d| d.to_string()),
            sort_priority,
        }
    }

    /// Create a simple keyword without description
    pub fn simple(label: &str, sort_priority: i32) -> Self {
        Self::new(label, None, sort_priority)
    }
}

/// Keyword set for a specific context
#[derive(Debug, Clone, Default)]
pub struct KeywordSet {
    /// Keywords in this set
    pub keywords: Vec<SqlKeyword>,
}

impl KeywordSet {
    /// Create a new keyword set
    pub fn new(keywords: Vec<SqlKeyword>) -> Self {
        Self { keywords }
    }
}

/// Position a keyword list is requested for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeywordPosition {
    /// Nothing typed yet
    StatementStart,
    /// Right after `SELECT`, `DISTINCT` or a comma with no entity known
    SelectListStart,
    /// After a complete projection item
    AfterSelectColumn,
    /// After `FROM entity`; `has_alias` once the alias is typed too
    AfterFromEntity { has_alias: bool },
    /// After `INNER` / `LEFT` / `OUTER`
    JoinModifier,
    /// After `JOIN entity [alias]`
    AfterJoinEntity { has_alias: bool },
    /// After a complete `ON a.x = b.y`
    AfterJoinCondition,
    /// After the column of a predicate
    AfterPredicateColumn,
    /// After `IS`
    AfterIs,
    /// After `NOT` inside a predicate
    AfterNot,
    /// After a complete predicate
    AfterPredicate,
    /// After `GROUP` or `ORDER`
    ExpectBy,
    /// After a GROUP BY column
    AfterGroupByColumn,
    /// After an ORDER BY column
    AfterOrderByColumn,
    /// After `ASC` / `DESC`
    AfterSortDirection,
    /// Value positions, string literals, comments, after LIMIT
    Nothing,
}

/// Keyword provider for the Dataverse SQL dialect
#[derive(Debug, Clone, Default)]
pub struct KeywordProvider;

impl KeywordProvider {
    /// Create a new keyword provider
    pub fn new() -> Self {
        Self
    }

    /// Get statement keywords (for start of statement)
    pub fn statement_keywords(&self) -> KeywordSet {
        KeywordSet::new(vec![SqlKeyword::new(
            "SELECT",
            Some("Retrieve records from an entity"),
            1,
        )])
    }

    /// Keywords that may follow a complete FROM or JOIN clause
    pub fn clause_keywords(&self) -> KeywordSet {
        KeywordSet::new(vec![
            SqlKeyword::new("WHERE", Some("Filter records"), 1),
            SqlKeyword::new("JOIN", Some("Link another entity"), 2),
            SqlKeyword::new("INNER JOIN", Some("Link another entity (inner)"), 3),
            SqlKeyword::new("LEFT JOIN", Some("Link another entity (outer)"), 4),
            SqlKeyword::new("GROUP BY", Some("Group records by values"), 5),
            SqlKeyword::new("ORDER BY", Some("Sort result records"), 6),
            SqlKeyword::new("LIMIT", Some("Limit number of records"), 7),
        ])
    }

    /// Get predicate operator keywords
    pub fn predicate_keywords(&self) -> KeywordSet {
        KeywordSet::new(vec![
            SqlKeyword::new("LIKE", Some("Pattern matching"), 1),
            SqlKeyword::new("NOT LIKE", Some("Negated pattern matching"), 2),
            SqlKeyword::new("IN", Some("Value in list"), 3),
            SqlKeyword::new("NOT IN", Some("Value not in list"), 4),
            SqlKeyword::new("IS NULL", Some("Check if value is NULL"), 5),
            SqlKeyword::new("IS NOT NULL", Some("Check if value is not NULL"), 6),
        ])
    }

    /// Get sort direction keywords (ASC, DESC)
    pub fn sort_direction_keywords(&self) -> KeywordSet {
        KeywordSet::new(vec![
            SqlKeyword::new("ASC", Some("Ascending order"), 1),
            SqlKeyword::new("DESC", Some("Descending order"), 2),
        ])
    }

    /// Get keywords valid at a position
    pub fn keywords_for(&self, position: KeywordPosition) -> Vec<SqlKeyword> {
        match position {
            KeywordPosition::StatementStart => self.statement_keywords().keywords,
            // Column names come first here; keywords would only be noise
            KeywordPosition::SelectListStart => Vec::new(),
            KeywordPosition::AfterSelectColumn => vec![
                SqlKeyword::new("FROM", Some("Specify the entity to query"), 1),
                SqlKeyword::new("AS", Some("Alias for the column"), 2),
            ],
            KeywordPosition::AfterFromEntity { has_alias } => {
                let mut keywords = self.clause_keywords().keywords;
                if !has_alias {
                    keywords.push(SqlKeyword::new("AS", Some("Alias for the entity"), 8));
                }
                keywords
            }
            KeywordPosition::JoinModifier => vec![
                SqlKeyword::new("JOIN", Some("Link another entity"), 1),
                SqlKeyword::new("OUTER JOIN", Some("Link another entity (outer)"), 2),
            ],
            KeywordPosition::AfterJoinEntity { has_alias } => {
                let mut keywords = vec![SqlKeyword::new("ON", Some("Join condition"), 1)];
                if !has_alias {
                    keywords.push(SqlKeyword::new("AS", Some("Alias for the entity"), 2));
                }
                keywords
            }
            KeywordPosition::AfterJoinCondition => self.clause_keywords().keywords,
            KeywordPosition::AfterPredicateColumn => self.predicate_keywords().keywords,
            KeywordPosition::AfterIs => vec![
                SqlKeyword::new("NULL", Some("Check if value is NULL"), 1),
                SqlKeyword::new("NOT NULL", Some("Check if value is not NULL"), 2),
            ],
            KeywordPosition::AfterNot => vec![
                SqlKeyword::new("LIKE", Some("Negated pattern matching"), 1),
                SqlKeyword::new("IN", Some("Value not in list"), 2),
            ],
            KeywordPosition::AfterPredicate => vec![
                SqlKeyword::new("AND", Some("Logical AND"), 1),
                SqlKeyword::new("OR", Some("Logical OR"), 2),
                SqlKeyword::new("GROUP BY", Some("Group records by values"), 3),
                SqlKeyword::new("ORDER BY", Some("Sort result records"), 4),
                SqlKeyword::new("LIMIT", Some("Limit number of records"), 5),
            ],
            KeywordPosition::ExpectBy => vec![SqlKeyword::simple("BY", 1)],
            KeywordPosition::AfterGroupByColumn => vec![
                SqlKeyword::new("ORDER BY", Some("Sort result records"), 1),
                SqlKeyword::new("LIMIT", Some("Limit number of records"), 2),
            ],
            KeywordPosition::AfterOrderByColumn => {
                let mut keywords = self.sort_direction_keywords().keywords;
                keywords.push(SqlKeyword::new("LIMIT", Some("Limit number of records"), 3));
                keywords
            }
            KeywordPosition::AfterSortDirection => {
                vec![SqlKeyword::new("LIMIT", Some("Limit number of records"), 1)]
            }
            KeywordPosition::Nothing => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sql_keyword_creation() {
        let kw = SqlKeyword::new("select", Some("Test description"), 1);
        assert_eq!(kw.label, "SELECT");
        assert_eq!(kw.description, Some("Test description".to_string()));
        assert_eq!(kw.sort_priority, 1);
    }

    #[test]
    fn test_after_from_entity() {
        let provider = KeywordProvider::new();
        let without_alias = provider.keywords_for(KeywordPosition::AfterFromEntity { has_alias: false });
        assert!(without_alias.iter().any(|k| k.label == "WHERE"));
        assert!(without_alias.iter().any(|k| k.label == "AS"));

        let with_alias = provider.keywords_for(KeywordPosition::AfterFromEntity { has_alias: true });
        assert!(!with_alias.iter().any(|k| k.label == "AS"));
    }

    #[test]
    fn test_nothing_after_select() {
        let provider = KeywordProvider::new();
        assert!(provider.keywords_for(KeywordPosition::SelectListStart).is_empty());
        assert!(provider.keywords_for(KeywordPosition::Nothing).is_empty());
    }

    #[test]
    fn test_statement_start_offers_select() {
        let provider = KeywordProvider::new();
        let keywords = provider.keywords_for(KeywordPosition::StatementStart);
        assert_eq!(keywords.len(), 1);
        assert_eq!(keywords[0].label, "SELECT");
    }
}
