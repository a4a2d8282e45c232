// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Maps raw query rows back to the columns the user asked for.
//!
//! Virtual columns were replaced by their parents before the query was sent,
//! so their values are read from the parent's formatted-value annotation.
//! Parents that were only added for that purpose are not returned.

use dataverse_sql_ir::{SelectColumn, SqlSelectStatement};
use dataverse_sql_lowering::{VirtualColumnMapping, VirtualColumnTransformation};
use serde_json::Value;

use super::executor::{FORMATTED_VALUE_SUFFIX, Row};

/// Projection of raw rows onto the requested output columns
#[derive(Debug, Clone, PartialEq)]
pub struct ResultMapper {
    columns: Vec<String>,
    virtual_columns: Vec<VirtualColumnMapping>,
    passthrough: bool,
}

impl ResultMapper {
    /// Build a mapper for `statement` as the user wrote it
    pub fn new(statement: &SqlSelectStatement, transformation: &VirtualColumnTransformation) -> Self {
        let passthrough = statement
            .column_refs()
            .any(|c| c.is_wildcard);
        let columns = if passthrough {
            Vec::new()
        } else {
            statement
                .columns
                .iter()
                .map(|c| output_key(statement, c))
                .collect()
        };

        Self {
            columns,
            virtual_columns: transformation.virtual_columns.clone(),
            passthrough,
        }
    }

    /// Output column names in SELECT order; empty for `SELECT *`
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn is_passthrough(&self) -> bool {
        self.passthrough
    }

    /// Project one raw row
    ///
    /// Missing values become `null` so every row has every column.
    pub fn map_row(&self, row: &Row) -> Row {
        if self.passthrough {
            return row.clone();
        }

        self.columns
            .iter()
            .map(|column| {
                let value = match self
                    .virtual_columns
                    .iter()
                    .find(|m| m.output_name == *column)
                {
                    Some(mapping) => formatted_value(row, &mapping.parent_column),
                    None => plain_value(row, column),
                };
                (column.clone(), value.unwrap_or(Value::Null))
            })
            .collect()
    }

    pub fn map_rows(&self, rows: &[Row]) -> Vec<Row> {
        rows.iter().map(|row| self.map_row(row)).collect()
    }
}

/// Key a selected item comes back under
///
/// Link-entity attributes are returned as `linkalias.attribute`.
fn output_key(statement: &SqlSelectStatement, column: &SelectColumn) -> String {
    match column {
        SelectColumn::Aggregate(agg) => agg.alias.clone(),
        SelectColumn::Column(col) => {
            if let Some(alias) = &col.alias {
                return alias.clone();
            }
            match col.table_name.as_deref() {
                Some(table) if !statement.is_main_entity_qualifier(table) => {
                    let link = statement
                        .find_join(table)
                        .map_or(table, |join| join.reference_name());
                    format!("{}.{}", link, col.column_name)
                }
                _ => col.column_name.clone(),
            }
        }
    }
}

/// Lookups come back from the Web API as `_name_value`
fn lookup_key(column: &str) -> String {
    format!("_{}_value", column)
}

fn plain_value(row: &Row, column: &str) -> Option<Value> {
    row.get(column)
        .or_else(|| row.get(&lookup_key(column)))
        .cloned()
}

fn formatted_value(row: &Row, parent: &str) -> Option<Value> {
    row.get(&format!("{}{}", parent, FORMATTED_VALUE_SUFFIX))
        .or_else(|| row.get(&format!("{}{}", lookup_key(parent), FORMATTED_VALUE_SUFFIX)))
        .cloned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use dataverse_sql_lowering::{RequestedColumn, detect};
    use dataverse_sql_catalog::{AttributeSuggestion, AttributeType};
    use dataverse_sql_parser::parse;
    use serde_json::json;

    fn row(value: Value) -> Row {
        match value {
            Value::Object(map) => map,
            other => panic!("not an object: {other}"),
        }
    }

    fn account_attributes() -> Vec<AttributeSuggestion> {
        vec![
            AttributeSuggestion::new("name", AttributeType::String),
            AttributeSuggestion::new("primarycontactid", AttributeType::Lookup),
            AttributeSuggestion::new("primarycontactidname", AttributeType::Virtual)
                .virtual_of("primarycontactid"),
        ]
    }

    fn mapper_for(sql: &str) -> ResultMapper {
        let statement = parse(sql).unwrap();
        let columns = dataverse_sql_lowering::requested_columns(&statement);
        let transformation = detect(&columns, &account_attributes());
        ResultMapper::new(&statement, &transformation)
    }

    #[test]
    fn test_virtual_column_filled_from_annotation() {
        let mapper = mapper_for("SELECT name, primarycontactidname FROM account");
        let raw = row(json!({
            "name": "Contoso",
            "accountid": "a1",
            "primarycontactid": "c1",
            "primarycontactid@OData.Community.Display.V1.FormattedValue": "Yvonne McKay"
        }));

        let mapped = mapper.map_row(&raw);
        assert_eq!(mapper.columns(), &["name", "primarycontactidname"]);
        assert_eq!(mapped.len(), 2);
        assert_eq!(mapped["primarycontactidname"], json!("Yvonne McKay"));
        assert!(!mapped.contains_key("primarycontactid"));
    }

    #[test]
    fn test_requested_parent_is_kept() {
        let mapper = mapper_for("SELECT primarycontactid, primarycontactidname AS contact FROM account");
        let raw = row(json!({
            "_primarycontactid_value": "c1",
            "_primarycontactid_value@OData.Community.Display.V1.FormattedValue": "Yvonne McKay"
        }));

        let mapped = mapper.map_row(&raw);
        assert_eq!(mapped["primarycontactid"], json!("c1"));
        assert_eq!(mapped["contact"], json!("Yvonne McKay"));
    }

    #[test]
    fn test_missing_values_are_null() {
        let mapper = mapper_for("SELECT name, primarycontactidname FROM account");
        let mapped = mapper.map_row(&Row::new());
        assert_eq!(mapped["name"], Value::Null);
        assert_eq!(mapped["primarycontactidname"], Value::Null);
    }

    #[test]
    fn test_select_all_passes_rows_through() {
        let mapper = mapper_for("SELECT * FROM account");
        assert!(mapper.is_passthrough());
        let raw = row(json!({ "name": "Contoso", "revenue": 10 }));
        assert_eq!(mapper.map_row(&raw), raw);
    }

    #[test]
    fn test_join_columns_use_link_alias() {
        let statement = parse(
            "SELECT a.name, c.fullname FROM account a INNER JOIN contact c ON a.primarycontactid = c.contactid",
        )
        .unwrap();
        let transformation = detect(&[RequestedColumn::new("name")], &[]);
        let mapper = ResultMapper::new(&statement, &transformation);
        assert_eq!(mapper.columns(), &["name", "c.fullname"]);
    }

    #[test]
    fn test_aggregate_alias() {
        let mapper = mapper_for("SELECT industrycode, COUNT(*) AS total FROM account GROUP BY industrycode");
        assert_eq!(mapper.columns(), &["industrycode", "total"]);
    }
}
