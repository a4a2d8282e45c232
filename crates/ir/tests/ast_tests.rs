// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Tests for the SELECT statement AST

use dataverse_sql_ir::{
    AggregateColumn, AggregateFunction, ColumnRef, Condition, ConditionOperator, JoinClause,
    JoinType, Literal, LogicalOperator, OrderByItem, SelectColumn, SqlSelectStatement,
    WhereClause,
};

fn joined_statement() -> SqlSelectStatement {
    let mut stmt = SqlSelectStatement::new("account")
        .with_columns(vec![
            SelectColumn::Column(ColumnRef::qualified("a", "name")),
            SelectColumn::Column(ColumnRef::qualified("c", "fullname").with_alias("contact")),
        ])
        .with_joins(vec![JoinClause {
            join_type: JoinType::LeftOuter,
            entity_name: "contact".to_string(),
            alias: Some("c".to_string()),
            left: ColumnRef::qualified("a", "primarycontactid"),
            right: ColumnRef::qualified("c", "contactid"),
        }]);
    stmt.entity_alias = Some("a".to_string());
    stmt
}

#[test]
fn test_qualifier_resolution() {
    let stmt = joined_statement();

    assert!(stmt.is_main_entity_qualifier("A"));
    assert!(stmt.is_main_entity_qualifier("account"));
    assert!(!stmt.is_main_entity_qualifier("c"));

    let join = stmt.find_join("C").unwrap();
    assert_eq!(join.entity_name, "contact");
    assert_eq!(join.join_type.link_type(), "outer");
    assert!(stmt.find_join("contact").is_some());
    assert!(stmt.find_join("x").is_none());
}

#[test]
fn test_output_names() {
    let stmt = joined_statement();
    let names: Vec<&str> = stmt.columns.iter().map(SelectColumn::output_name).collect();
    assert_eq!(names, vec!["name", "contact"]);
}

#[test]
fn test_aggregate_detection() {
    let stmt = SqlSelectStatement::new("account").with_columns(vec![
        SelectColumn::Column(ColumnRef::new("industrycode")),
        SelectColumn::Aggregate(AggregateColumn::new(AggregateFunction::Count, "*", "total")),
    ]);

    assert!(stmt.is_aggregate());
    assert_eq!(stmt.column_refs().count(), 1);
    assert_eq!(
        "SUM".parse::<AggregateFunction>(),
        Ok(AggregateFunction::Sum)
    );
    assert!("median".parse::<AggregateFunction>().is_err());
}

#[test]
fn test_condition_operators() {
    let clause = WhereClause {
        operator: LogicalOperator::Or,
        conditions: vec![
            Condition::new(
                ColumnRef::new("industrycode"),
                ConditionOperator::NotIn,
                vec![Literal::Integer(1), Literal::Integer(2)],
            ),
            Condition::new(ColumnRef::new("revenue"), ConditionOperator::IsNotNull, vec![]),
        ],
    };

    assert_eq!(clause.operator.fetch_type(), "or");
    assert!(clause.conditions[0].operator.is_list());
    assert_eq!(clause.conditions[0].operator.fetch_operator(), "not-in");
    assert!(clause.conditions[1].operator.is_unary());
    assert_eq!(Literal::Boolean(true).to_fetch_value(), "1");
    assert_eq!(Literal::Decimal("0.10".into()).to_fetch_value(), "0.10");
}

#[test]
fn test_statement_serializes_for_tooling() {
    let stmt = SqlSelectStatement::new("account")
        .with_columns(vec![SelectColumn::Column(ColumnRef::new("name"))])
        .with_order_by(vec![OrderByItem {
            column: ColumnRef::new("name"),
            descending: true,
        }])
        .with_row_limit(5);

    let json = serde_json::to_value(&stmt).unwrap();
    assert_eq!(json["entity_name"], "account");
    assert_eq!(json["row_limit"], 5);
    assert_eq!(json["order_by"][0]["descending"], true);
}
