// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Virtual column detection against a mock catalog

use std::sync::Arc;

use dataverse_sql_catalog::CatalogError;
use dataverse_sql_lowering::{
    TransformationError, VirtualColumnDetector, apply, requested_columns, transpile,
};
use dataverse_sql_test_utils::FetchXmlAssertions;
use dataverse_sql_parser::parse;
use dataverse_sql_test_utils::{MockCatalogBuilder, SqlFixtures};
use pretty_assertions::assert_eq;

fn detector() -> (VirtualColumnDetector, Arc<dataverse_sql_test_utils::MockCatalog>) {
    let catalog = Arc::new(MockCatalogBuilder::new().with_standard_schema().build());
    (VirtualColumnDetector::new(catalog.clone()), catalog)
}

#[tokio::test]
async fn test_invariant_holds_for_all_fixtures() {
    let (detector, _) = detector();
    for sql in SqlFixtures::valid_queries() {
        let stmt = parse(sql).unwrap();
        let t = detector.detect_for_statement("env", &stmt).await.unwrap();

        let expected: Vec<String> = requested_columns(&stmt)
            .into_iter()
            .map(|c| c.name)
            .collect();
        assert_eq!(t.original_columns, expected, "{}", sql);
        for mapping in &t.virtual_columns {
            assert!(t.parents_to_add.contains(&mapping.parent_column), "{}", sql);
        }
        assert_eq!(t.needs_transformation, !t.virtual_columns.is_empty());
    }
}

#[tokio::test]
async fn test_rewritten_query_selects_parent() {
    let (detector, _) = detector();
    let stmt = parse(SqlFixtures::virtual_columns()).unwrap();
    let t = detector.detect_for_statement("env", &stmt).await.unwrap();

    assert!(t.needs_transformation);
    assert_eq!(t.parents_to_add, vec!["primarycontactid"]);
    assert_eq!(t.original_columns, vec!["name", "primarycontactidname"]);

    let xml = transpile(&apply(&stmt, &t));
    FetchXmlAssertions::assert_attribute_once(&xml, "primarycontactid");
    assert!(!xml.contains("primarycontactidname"));
}

#[tokio::test]
async fn test_virtual_and_parent_selected_once() {
    let (detector, _) = detector();
    let stmt = parse(SqlFixtures::virtual_and_parent()).unwrap();
    let t = detector.detect_for_statement("env", &stmt).await.unwrap();
    let xml = transpile(&apply(&stmt, &t));
    assert_eq!(xml.matches("name=\"primarycontactid\"").count(), 1);
}

#[tokio::test]
async fn test_wildcard_and_join_only_queries_skip_catalog() {
    let (detector, catalog) = detector();
    let stmt = parse("SELECT * FROM account").unwrap();
    let t = detector.detect_for_statement("env", &stmt).await.unwrap();
    assert!(!t.needs_transformation);
    assert_eq!(catalog.call_count(), 0);
}

#[tokio::test]
async fn test_metadata_failure_propagates() {
    let catalog = Arc::new(
        MockCatalogBuilder::new()
            .with_standard_schema()
            .with_failure(CatalogError::Timeout(30))
            .build(),
    );
    let detector = VirtualColumnDetector::new(catalog);
    let stmt = parse(SqlFixtures::virtual_columns()).unwrap();

    let err = detector.detect_for_statement("env", &stmt).await.unwrap_err();
    assert!(matches!(
        err,
        TransformationError::Metadata { ref entity, source: CatalogError::Timeout(30) } if entity == "account"
    ));
}

#[tokio::test]
async fn test_unknown_entity_is_an_error() {
    let (detector, _) = detector();
    let stmt = parse("SELECT subject FROM lead").unwrap();
    let err = detector.detect_for_statement("env", &stmt).await.unwrap_err();
    assert!(!err.is_transient());
}

#[tokio::test]
async fn test_original_columns_ignore_aliases_and_prefixes() {
    let (detector, _) = detector();
    let stmt = parse(
        "SELECT a.primarycontactidname AS contact, c.fullname
         FROM account a JOIN contact c ON a.primarycontactid = c.contactid",
    )
    .unwrap();
    let t = detector.detect_for_statement("env", &stmt).await.unwrap();

    let mut names = t.original_columns.clone();
    names.sort();
    assert_eq!(names, vec!["fullname", "primarycontactidname"]);
    assert_eq!(t.virtual_columns[0].output_name, "contact");
}

#[tokio::test]
async fn test_order_by_virtual_column_sorts_on_parent() {
    let (detector, _) = detector();
    for sql in [
        "SELECT primarycontactidname FROM account ORDER BY primarycontactidname",
        "SELECT primarycontactidname AS contact FROM account ORDER BY contact DESC",
    ] {
        let stmt = parse(sql).unwrap();
        let t = detector.detect_for_statement("env", &stmt).await.unwrap();
        let xml = transpile(&apply(&stmt, &t));

        assert!(!xml.contains("primarycontactidname"), "{}", xml);
        let orders: Vec<_> = FetchXmlAssertions::parse_elements(&xml)
            .into_iter()
            .filter(|e| e.name == "order")
            .collect();
        assert_eq!(orders.len(), 1, "{}", xml);
        assert_eq!(orders[0].attribute("attribute"), Some("primarycontactid"));
    }
}

#[tokio::test]
async fn test_grouped_virtual_column_orders_by_alias() {
    let (detector, _) = detector();
    let stmt = parse(
        "SELECT primarycontactidname, COUNT(*) AS total FROM account
         GROUP BY primarycontactidname ORDER BY primarycontactidname",
    )
    .unwrap();
    let t = detector.detect_for_statement("env", &stmt).await.unwrap();
    let xml = transpile(&apply(&stmt, &t));

    assert!(!xml.contains("primarycontactidname"), "{}", xml);
    assert!(xml.contains("<order alias=\"primarycontactid\" descending=\"false\"/>"), "{}", xml);
}

#[tokio::test]
async fn test_virtual_column_in_where_is_rejected() {
    let (detector, _) = detector();
    let stmt = parse("SELECT name FROM account WHERE primarycontactidname LIKE 'Y%'").unwrap();
    let err = detector.detect_for_statement("env", &stmt).await.unwrap_err();
    assert_eq!(
        err,
        TransformationError::UnsupportedVirtualColumn {
            column: "primarycontactidname".to_string(),
            clause: "WHERE",
        }
    );
    assert!(!err.is_transient());
}

#[tokio::test]
async fn test_unselected_virtual_sort_is_rejected() {
    let (detector, _) = detector();
    let stmt = parse("SELECT name FROM account ORDER BY primarycontactidname").unwrap();
    let err = detector.detect_for_statement("env", &stmt).await.unwrap_err();
    assert!(matches!(
        err,
        TransformationError::UnsupportedVirtualColumn { clause: "ORDER BY", .. }
    ));
}
