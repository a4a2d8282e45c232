// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Cursor-position tests for both context detectors

use dataverse_sql_context::{
    FetchXmlContext, SqlContext, ValueKind, detect_fetchxml_context, detect_sql_context, value_kind,
    value_suggestions,
};
use dataverse_sql_test_utils::split_cursor;
use pretty_assertions::assert_eq;

fn sql(marked: &str) -> SqlContext {
    let (text, offset) = split_cursor(marked);
    detect_sql_context(&text, offset)
}

fn fetchxml(marked: &str) -> FetchXmlContext {
    let (text, offset) = split_cursor(marked);
    detect_fetchxml_context(&text, offset)
}

fn attribute_of(entity: &str) -> SqlContext {
    SqlContext::Attribute {
        entity_name: entity.to_string(),
    }
}

#[test]
fn test_classification_boundaries() {
    assert_eq!(sql("SELECT name FROM |"), SqlContext::Entity);
    assert!(sql("SELECT na|").is_keyword());
    assert_eq!(sql("SELECT name FROM account WHERE |"), attribute_of("account"));
}

#[test]
fn test_cursor_in_middle_of_statement() {
    assert_eq!(sql("SELECT na| FROM account WHERE statecode = 0"), attribute_of("account"));
    assert_eq!(sql("SELECT name FROM acc| WHERE statecode = 0"), SqlContext::Entity);
    assert_eq!(
        sql("SELECT name FROM account WHERE st| = 0 ORDER BY name"),
        attribute_of("account")
    );
}

#[test]
fn test_multiple_statements() {
    let marked = "SELECT name FROM contact;\nSELECT | FROM account";
    assert_eq!(sql(marked), attribute_of("account"));

    let marked = "SELECT name FROM contact WHERE |;\nSELECT name FROM account";
    assert_eq!(sql(marked), attribute_of("contact"));
}

#[test]
fn test_join_aliases() {
    let marked = "SELECT a.name, c.| FROM account a LEFT OUTER JOIN contact AS c ON a.primarycontactid = c.contactid";
    assert_eq!(sql(marked), attribute_of("contact"));

    let marked = "SELECT a.name FROM account a JOIN contact c ON a.primarycontactid = c.contactid ORDER BY a.|";
    assert_eq!(sql(marked), attribute_of("account"));
}

#[test]
fn test_never_guesses_entity() {
    for marked in ["SELECT |", "SELECT name, |", "SELECT x.|", "|"] {
        assert!(sql(marked).is_keyword(), "{marked} should be a keyword context");
    }
}

#[test]
fn test_serialized_shape() {
    let json = serde_json::to_value(attribute_of("account")).unwrap();
    assert_eq!(json["kind"], "attribute");
    assert_eq!(json["entityName"], "account");

    let json = serde_json::to_value(fetchxml(r#"<fetch><entity name="account"><attribute name="|"#)).unwrap();
    assert_eq!(json["kind"], "attributeValue");
    assert_eq!(json["entityContext"], "account");
}

#[test]
fn test_fetchxml_nesting() {
    assert_eq!(
        fetchxml(r#"<fetch><entity name="account"><attribute name="|"#),
        FetchXmlContext::AttributeValue {
            element: "attribute".to_string(),
            attribute: "name".to_string(),
            entity_context: Some("account".to_string()),
        }
    );
}

#[test]
fn test_fetchxml_cursor_inside_document() {
    let marked = r#"<fetch>
  <entity name="account">
    <attribute name="name" />
    <filter type="and">
      <condition attribute="|" operator="eq" value="1" />
    </filter>
  </entity>
</fetch>"#;
    assert_eq!(
        fetchxml(marked),
        FetchXmlContext::AttributeValue {
            element: "condition".to_string(),
            attribute: "attribute".to_string(),
            entity_context: Some("account".to_string()),
        }
    );
}

#[test]
fn test_fetchxml_value_kinds_for_positions() {
    let FetchXmlContext::AttributeValue { element, attribute, .. } =
        fetchxml(r#"<fetch><entity name="account"><filter type="|"#)
    else {
        panic!("expected attribute value");
    };
    assert_eq!(value_kind(&element, &attribute), ValueKind::Enumerated);
    assert_eq!(value_suggestions(&element, &attribute), &["and", "or"]);
}
