// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Virtual column rewrite
//!
//! Dataverse cannot select computed columns such as `primarycontactidname`
//! directly. Only the physical parent (`primarycontactid`) can be selected;
//! the readable value arrives as a formatted-value annotation on the parent.
//!
//! This pass detects virtual columns in the projection, swaps them for their
//! parents and records what it did so that results can be mapped back to the
//! columns the user asked for.
//!
//! A column is virtual when the catalog has an attribute with the same logical
//! name whose `attribute_of` names a parent. Only columns of the FROM entity
//! are checked; join-qualified columns pass through unchanged.
//!
//! GROUP BY and ORDER BY items that name a selected virtual column (or its
//! alias) are swapped for the parent as well. A virtual column in WHERE, or
//! in ORDER BY without being selected, is rejected.

use std::sync::Arc;

use dataverse_sql_catalog::MetadataCatalog;
use dataverse_sql_ir::{
    AttributeSuggestion, ColumnRef, OrderByItem, SelectColumn, SqlSelectStatement,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{TransformationError, TransformationResult};

/// One projection column as the detector sees it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestedColumn {
    pub name: String,
    pub alias: Option<String>,
    /// Join qualifier; `None` for columns of the FROM entity
    pub table_prefix: Option<String>,
}

impl RequestedColumn {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            alias: None,
            table_prefix: None,
        }
    }

    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    pub fn with_table_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.table_prefix = Some(prefix.into());
        self
    }

    /// Key the column's value is returned under
    pub fn output_name(&self) -> String {
        match (&self.alias, &self.table_prefix) {
            (Some(alias), _) => alias.clone(),
            (None, Some(prefix)) => format!("{}.{}", prefix, self.name),
            (None, None) => self.name.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VirtualColumnMapping {
    pub virtual_column: String,
    pub parent_column: String,
    /// Key the virtual column must appear under in results
    pub output_name: String,
}

/// Outcome of detection. Built per query, never cached.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct VirtualColumnTransformation {
    pub needs_transformation: bool,
    pub virtual_columns: Vec<VirtualColumnMapping>,
    /// Parent attributes to select instead, deduplicated, first-seen order
    pub parents_to_add: Vec<String>,
    /// Names of the columns passed in, in order
    pub original_columns: Vec<String>,
}

impl VirtualColumnTransformation {
    /// Parent replacing `column`, if it is virtual
    pub fn parent_of(&self, column: &str) -> Option<&str> {
        self.virtual_columns
            .iter()
            .find(|m| m.virtual_column.eq_ignore_ascii_case(column))
            .map(|m| m.parent_column.as_str())
    }

    /// Parent replacing an unqualified sort or group key, matched by column
    /// name or by the alias the virtual column was selected under
    fn parent_of_key(&self, key: &str) -> Option<&str> {
        self.virtual_columns
            .iter()
            .find(|m| {
                m.virtual_column.eq_ignore_ascii_case(key) || m.output_name.eq_ignore_ascii_case(key)
            })
            .map(|m| m.parent_column.as_str())
    }
}

/// Detector input for a statement
///
/// Wildcards are skipped. Columns qualified with the FROM entity are reported
/// without a prefix.
pub fn requested_columns(statement: &SqlSelectStatement) -> Vec<RequestedColumn> {
    statement
        .column_refs()
        .filter(|c| !c.is_wildcard)
        .map(|c| RequestedColumn {
            name: c.column_name.clone(),
            alias: c.alias.clone(),
            table_prefix: c
                .table_name
                .clone()
                .filter(|t| !statement.is_main_entity_qualifier(t)),
        })
        .collect()
}

/// Match requested columns against the FROM entity's attributes
pub fn detect(
    columns: &[RequestedColumn],
    catalog: &[AttributeSuggestion],
) -> VirtualColumnTransformation {
    let mut virtual_columns = Vec::new();
    let mut parents_to_add: Vec<String> = Vec::new();

    for column in columns.iter().filter(|c| c.table_prefix.is_none()) {
        let parent = catalog
            .iter()
            .find(|a| a.logical_name.eq_ignore_ascii_case(&column.name))
            .and_then(|a| a.attribute_of.as_deref());

        let Some(parent) = parent else {
            continue;
        };

        debug!(column = %column.name, parent, "virtual column detected");
        virtual_columns.push(VirtualColumnMapping {
            virtual_column: column.name.clone(),
            parent_column: parent.to_string(),
            output_name: column.output_name(),
        });
        if !parents_to_add.iter().any(|p| p.eq_ignore_ascii_case(parent)) {
            parents_to_add.push(parent.to_string());
        }
    }

    VirtualColumnTransformation {
        needs_transformation: !virtual_columns.is_empty(),
        virtual_columns,
        parents_to_add,
        original_columns: columns.iter().map(|c| c.name.clone()).collect(),
    }
}

/// Rewritten copy of `statement` with virtual columns replaced by parents
///
/// Unaliased plain columns are deduplicated, so requesting both a virtual
/// column and its parent selects the parent once.
pub fn apply(
    statement: &SqlSelectStatement,
    transformation: &VirtualColumnTransformation,
) -> SqlSelectStatement {
    if !transformation.needs_transformation {
        return statement.clone();
    }

    let mut columns: Vec<SelectColumn> = Vec::with_capacity(statement.columns.len());
    for column in &statement.columns {
        let replacement = match column {
            SelectColumn::Column(col) if is_main_plain_column(statement, col) => {
                match transformation.parent_of(&col.column_name) {
                    Some(parent) => ColumnRef {
                        column_name: parent.to_string(),
                        alias: None,
                        table_name: col.table_name.clone(),
                        is_wildcard: false,
                    },
                    None => col.clone(),
                }
            }
            other => {
                columns.push(other.clone());
                continue;
            }
        };

        let duplicate = replacement.alias.is_none()
            && columns.iter().any(|c| match c {
                SelectColumn::Column(existing) => {
                    existing.alias.is_none()
                        && same_main_column(statement, existing, &replacement)
                }
                SelectColumn::Aggregate(_) => false,
            });
        if !duplicate {
            columns.push(SelectColumn::Column(replacement));
        }
    }

    let group_by = statement
        .group_by
        .iter()
        .map(|col| rewrite_key(statement, transformation, col))
        .collect();
    let order_by = statement
        .order_by
        .iter()
        .map(|item| OrderByItem {
            column: rewrite_key(statement, transformation, &item.column),
            ..item.clone()
        })
        .collect();

    SqlSelectStatement {
        columns,
        group_by,
        order_by,
        ..statement.clone()
    }
}

/// Swap a GROUP BY / ORDER BY key for its parent when it names a virtual column
fn rewrite_key(
    statement: &SqlSelectStatement,
    transformation: &VirtualColumnTransformation,
    col: &ColumnRef,
) -> ColumnRef {
    if !is_main_plain_column(statement, col) {
        return col.clone();
    }
    let parent = if col.table_name.is_none() {
        transformation.parent_of_key(&col.column_name)
    } else {
        transformation.parent_of(&col.column_name)
    };
    match parent {
        Some(parent) => ColumnRef {
            column_name: parent.to_string(),
            ..col.clone()
        },
        None => col.clone(),
    }
}

/// Reject virtual columns the rewrite cannot swap for a parent
fn check_clauses(
    statement: &SqlSelectStatement,
    transformation: &VirtualColumnTransformation,
    attributes: &[AttributeSuggestion],
) -> TransformationResult<()> {
    let is_virtual = |col: &ColumnRef| {
        is_main_plain_column(statement, col)
            && attributes.iter().any(|a| {
                a.attribute_of.is_some() && a.logical_name.eq_ignore_ascii_case(&col.column_name)
            })
    };

    if let Some(clause) = &statement.where_conditions {
        if let Some(condition) = clause.conditions.iter().find(|c| is_virtual(&c.column)) {
            return Err(TransformationError::unsupported_virtual_column(
                &condition.column.column_name,
                "WHERE",
            ));
        }
    }

    let unselected = statement
        .order_by
        .iter()
        .map(|item| &item.column)
        .find(|&col| is_virtual(col) && transformation.parent_of(&col.column_name).is_none());
    if let Some(col) = unselected {
        return Err(TransformationError::unsupported_virtual_column(
            &col.column_name,
            "ORDER BY",
        ));
    }
    Ok(())
}

fn is_main_plain_column(statement: &SqlSelectStatement, col: &ColumnRef) -> bool {
    !col.is_wildcard
        && col
            .table_name
            .as_deref()
            .is_none_or(|t| statement.is_main_entity_qualifier(t))
}

/// `name` and `a.name` are the same column when `a` is the FROM alias
fn same_main_column(statement: &SqlSelectStatement, a: &ColumnRef, b: &ColumnRef) -> bool {
    is_main_plain_column(statement, a)
        && is_main_plain_column(statement, b)
        && a.column_name.eq_ignore_ascii_case(&b.column_name)
}

/// Catalog-backed detection for whole statements
pub struct VirtualColumnDetector {
    catalog: Arc<dyn MetadataCatalog>,
}

impl VirtualColumnDetector {
    pub fn new(catalog: Arc<dyn MetadataCatalog>) -> Self {
        Self { catalog }
    }

    /// Fetch the FROM entity's attributes and run [`detect`]
    ///
    /// The catalog is not consulted when no column could be virtual.
    ///
    /// # Errors
    ///
    /// - `TransformationError::Metadata` when the attributes cannot be loaded
    /// - `TransformationError::UnsupportedVirtualColumn` for a virtual column
    ///   in WHERE, or in ORDER BY without being selected
    pub async fn detect_for_statement(
        &self,
        environment_id: &str,
        statement: &SqlSelectStatement,
    ) -> TransformationResult<VirtualColumnTransformation> {
        let columns = requested_columns(statement);
        let main_keys = statement
            .where_conditions
            .iter()
            .flat_map(|clause| clause.conditions.iter().map(|c| &c.column))
            .chain(statement.order_by.iter().map(|item| &item.column))
            .any(|col| is_main_plain_column(statement, col));
        if columns.iter().all(|c| c.table_prefix.is_some()) && !main_keys {
            return Ok(detect(&columns, &[]));
        }

        let attributes = self
            .catalog
            .get_attribute_suggestions(environment_id, &statement.entity_name)
            .await
            .map_err(|e| TransformationError::metadata(&statement.entity_name, e))?;

        let transformation = detect(&columns, &attributes);
        check_clauses(statement, &transformation, &attributes)?;
        Ok(transformation)
    }
}
