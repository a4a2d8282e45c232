// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! End-to-end completion tests against the mock catalog

use std::sync::Arc;

use dataverse_sql_catalog::{
    AttributeSuggestion, CatalogError, CatalogResult, EntitySuggestion, MetadataCatalog,
};
use dataverse_sql_engine::{
    CompletionEngine, CompletionError, CompletionItem, CompletionItemKind, CompletionRequest,
    CompletionRequestTracker, EngineConfig, KeywordCasing,
};
use dataverse_sql_test_utils::{MockCatalog, MockCatalogBuilder, split_cursor};
use pretty_assertions::assert_eq;
use tokio_util::sync::CancellationToken;

fn engine_with(catalog: Arc<MockCatalog>) -> CompletionEngine {
    let config = EngineConfig {
        cache_enabled: false,
        ..EngineConfig::new("env-1")
    };
    CompletionEngine::with_config(catalog, config)
}

fn standard_engine() -> CompletionEngine {
    engine_with(Arc::new(MockCatalogBuilder::new().with_standard_schema().build()))
}

fn labels(items: &[CompletionItem]) -> Vec<&str> {
    items.iter().map(|i| i.label.as_str()).collect()
}

async fn complete_sql(engine: &CompletionEngine, marked: &str) -> Vec<CompletionItem> {
    let (text, offset) = split_cursor(marked);
    engine
        .complete_sql(&CompletionRequest::new(text, offset), &CancellationToken::new())
        .await
        .unwrap()
}

async fn complete_fetchxml(engine: &CompletionEngine, marked: &str) -> Vec<CompletionItem> {
    let (text, offset) = split_cursor(marked);
    engine
        .complete_fetchxml(&CompletionRequest::new(text, offset), &CancellationToken::new())
        .await
        .unwrap()
}

// ===== Ranking =====

#[tokio::test]
async fn test_exact_match_before_prefix_match() {
    let catalog = MockCatalogBuilder::new()
        .with_entity_names(&["accounthistory", "account"])
        .build();
    let items = complete_sql(&engine_with(Arc::new(catalog)), "SELECT name FROM account|").await;
    assert_eq!(labels(&items), vec!["account", "accounthistory"]);
}

#[tokio::test]
async fn test_prefix_match_before_display_name_match() {
    let catalog = MockCatalogBuilder::new()
        .with_entity(
            EntitySuggestion::new("myaccount").with_display_name("My Account"),
            Vec::new(),
        )
        .with_entity(EntitySuggestion::new("account"), Vec::new())
        .build();
    let items = complete_sql(&engine_with(Arc::new(catalog)), "SELECT name FROM acc|").await;
    assert_eq!(labels(&items), vec!["account", "myaccount"]);
}

#[tokio::test]
async fn test_sort_text_follows_rank() {
    let items = complete_sql(&standard_engine(), "SELECT | FROM account").await;
    let sort_texts: Vec<&str> = items.iter().map(|i| i.sort_text.as_str()).collect();
    let mut sorted = sort_texts.clone();
    sorted.sort();
    assert_eq!(sort_texts, sorted);
}

// ===== SQL contexts =====

#[tokio::test]
async fn test_select_list_suggests_main_entity_attributes() {
    let items = complete_sql(&standard_engine(), "SELECT pri| FROM account").await;
    assert_eq!(labels(&items), vec!["primarycontactid", "primarycontactidname"]);
    assert!(items.iter().all(|i| i.kind == CompletionItemKind::Attribute));
}

#[tokio::test]
async fn test_alias_qualifier_resolves_join_entity() {
    let items = complete_sql(
        &standard_engine(),
        "SELECT c.full| FROM account a INNER JOIN contact c ON a.primarycontactid = c.contactid",
    )
    .await;
    assert_eq!(labels(&items), vec!["fullname"]);
}

#[tokio::test]
async fn test_virtual_column_documentation() {
    let items = complete_sql(&standard_engine(), "SELECT primarycontactidn| FROM account").await;
    assert_eq!(items.len(), 1);
    let doc = items[0].documentation.as_deref().unwrap_or_default();
    assert!(doc.contains("primarycontactid"), "{}", doc);
}

#[tokio::test]
async fn test_keywords_respect_casing() {
    let catalog = Arc::new(MockCatalogBuilder::new().with_standard_schema().build());
    let config = EngineConfig {
        keyword_casing: KeywordCasing::Lower,
        ..EngineConfig::new("env-1")
    };
    let engine = CompletionEngine::with_config(catalog, config);
    let items = complete_sql(&engine, "SELECT name FROM account ord|").await;
    assert_eq!(labels(&items), vec!["order by"]);
}

#[tokio::test]
async fn test_unknown_entity_yields_soft_error() {
    let err = standard_engine()
        .complete_sql(
            &CompletionRequest::at_end("SELECT name FROM lead WHERE "),
            &CancellationToken::new(),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, CompletionError::Catalog(CatalogError::EntityNotFound(..))));
    assert!(err.should_return_empty());
}

#[tokio::test]
async fn test_transient_catalog_failure_is_reported() {
    let catalog = MockCatalogBuilder::new()
        .with_failure(CatalogError::ConnectionFailed("env-1".into()))
        .build();
    let err = engine_with(Arc::new(catalog))
        .complete_sql(&CompletionRequest::at_end("SELECT name FROM "), &CancellationToken::new())
        .await
        .unwrap_err();
    assert!(!err.should_return_empty());
}

#[tokio::test]
async fn test_request_environment_overrides_config() {
    let catalog = Arc::new(MockCatalogBuilder::new().with_standard_schema().build());
    let engine = CompletionEngine::new(catalog);
    let request = CompletionRequest::at_end("SELECT name FROM sys").with_environment("env-2");
    let items = engine
        .complete_sql(&request, &CancellationToken::new())
        .await
        .unwrap();
    assert_eq!(labels(&items), vec!["systemuser"]);
}

#[tokio::test]
async fn test_custom_entities_only() {
    let catalog = MockCatalogBuilder::new()
        .with_standard_schema()
        .with_entity(EntitySuggestion::new("new_project").with_custom(true), Vec::new())
        .build();
    let config = EngineConfig {
        custom_entities_only: true,
        ..EngineConfig::new("env-1")
    };
    let engine = CompletionEngine::with_config(Arc::new(catalog), config);
    let items = complete_sql(&engine, "SELECT name FROM |").await;
    assert_eq!(labels(&items), vec!["new_project"]);
}

#[tokio::test]
async fn test_max_completion_items() {
    let config = EngineConfig {
        max_completion_items: 2,
        ..EngineConfig::new("env-1")
    };
    let catalog = Arc::new(MockCatalogBuilder::new().with_standard_schema().build());
    let engine = CompletionEngine::with_config(catalog, config);
    let items = complete_sql(&engine, "SELECT | FROM account").await;
    assert_eq!(items.len(), 2);
}

#[tokio::test]
async fn test_cache_serves_repeated_lookups() {
    let catalog = Arc::new(MockCatalogBuilder::new().with_standard_schema().build());
    let engine = CompletionEngine::with_config(catalog.clone(), EngineConfig::new("env-1"));

    complete_sql(&engine, "SELECT n| FROM account").await;
    complete_sql(&engine, "SELECT na| FROM account").await;
    assert_eq!(catalog.call_count(), 1);
}

// ===== FetchXML contexts =====

#[tokio::test]
async fn test_fetchxml_elements_under_entity() {
    let items = complete_fetchxml(&standard_engine(), r#"<fetch><entity name="account"><fil|"#).await;
    assert_eq!(labels(&items), vec!["filter"]);
    assert_eq!(items[0].kind, CompletionItemKind::Element);
}

#[tokio::test]
async fn test_fetchxml_entity_name_value() {
    let items = complete_fetchxml(&standard_engine(), r#"<fetch><entity name="con|"#).await;
    assert_eq!(labels(&items), vec!["contact"]);
}

#[tokio::test]
async fn test_fetchxml_attribute_value_uses_entity_context() {
    let items = complete_fetchxml(
        &standard_engine(),
        r#"<fetch><entity name="contact"><attribute name="full|" /></entity></fetch>"#,
    )
    .await;
    assert_eq!(labels(&items), vec!["fullname"]);
}

#[tokio::test]
async fn test_fetchxml_link_entity_from_uses_linked_entity() {
    let items = complete_fetchxml(
        &standard_engine(),
        r#"<fetch><entity name="account"><link-entity name="contact" from="contact|" to="primarycontactid">"#,
    )
    .await;
    assert_eq!(labels(&items), vec!["contactid"]);
}

#[tokio::test]
async fn test_fetchxml_inside_comment_is_empty() {
    let items = complete_fetchxml(&standard_engine(), "<fetch><!-- <entity name=\"|").await;
    assert!(items.is_empty());
}

// ===== Cancellation =====

/// Catalog that supersedes the running request while it is "in flight"
struct SupersedingCatalog {
    inner: MockCatalog,
    tracker: Arc<CompletionRequestTracker>,
}

#[async_trait::async_trait]
impl MetadataCatalog for SupersedingCatalog {
    async fn get_entity_suggestions(
        &self,
        environment_id: &str,
    ) -> CatalogResult<Vec<EntitySuggestion>> {
        self.tracker.begin("file:///query.sql");
        self.inner.get_entity_suggestions(environment_id).await
    }

    async fn get_attribute_suggestions(
        &self,
        environment_id: &str,
        entity_logical_name: &str,
    ) -> CatalogResult<Vec<AttributeSuggestion>> {
        self.inner
            .get_attribute_suggestions(environment_id, entity_logical_name)
            .await
    }
}

#[tokio::test]
async fn test_superseded_request_is_cancelled_after_fetch() {
    let tracker = Arc::new(CompletionRequestTracker::new());
    let catalog = SupersedingCatalog {
        inner: MockCatalogBuilder::new().with_standard_schema().build(),
        tracker: tracker.clone(),
    };
    let config = EngineConfig {
        cache_enabled: false,
        ..EngineConfig::new("env-1")
    };
    let engine = CompletionEngine::with_config(Arc::new(catalog), config);

    let ticket = tracker.begin("file:///query.sql");
    let result = engine
        .complete_sql(&CompletionRequest::at_end("SELECT name FROM "), &ticket.token)
        .await;

    assert_eq!(result, Err(CompletionError::Cancelled));
    assert!(!tracker.is_current("file:///query.sql", &ticket));
}

#[tokio::test]
async fn test_latest_request_wins() {
    let tracker = CompletionRequestTracker::new();
    let engine = standard_engine();

    let stale = tracker.begin("doc");
    let fresh = tracker.begin("doc");

    let stale_result = engine
        .complete_sql(&CompletionRequest::at_end("SELECT name FROM a"), &stale.token)
        .await;
    let fresh_result = engine
        .complete_sql(&CompletionRequest::at_end("SELECT name FROM ac"), &fresh.token)
        .await
        .unwrap();
    tracker.finish("doc", &fresh);

    assert_eq!(stale_result, Err(CompletionError::Cancelled));
    assert_eq!(labels(&fresh_result), vec!["account"]);
    assert_eq!(tracker.in_flight(), 0);
}
