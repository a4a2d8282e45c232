// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Dataverse SQL - Engine
//!
//! Ties the frontend crates together for an editor host.
//!
//! ## Overview
//!
//! - [`completion`]: keystroke-driven completion for SQL and FetchXML, with
//!   cancellation and per-document last-write-wins tracking
//! - [`execute`]: parse → virtual column rewrite → transpile → execute → map
//! - [`config`]: engine settings read from client configuration
//! - [`logging`]: tracing subscriber setup
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │        Editor host / CLI binary         │
//! └──────────────┬──────────────────────────┘
//!                │ (text, offset, environment, cancel)
//!                ↓
//! ┌─────────────────────────────────────────┐
//! │      CompletionEngine / ExecuteSqlQuery │
//! └──────┬────────────┬─────────────┬───────┘
//!        ↓            ↓             ↓
//! ┌────────────┐ ┌──────────┐ ┌────────────────┐
//! │  context   │ │  parser  │ │ MetadataCatalog│
//! │  detectors │ │ lowering │ │ QueryExecutor  │
//! └────────────┘ └──────────┘ └────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use dataverse_sql_catalog::StaticCatalog;
//! use dataverse_sql_engine::{CompletionEngine, CompletionRequest, EngineConfig};
//! use tokio_util::sync::CancellationToken;
//!
//! let engine = CompletionEngine::with_config(
//!     Arc::new(StaticCatalog::sample()),
//!     EngineConfig::new("env-1"),
//! );
//! let items = engine
//!     .complete_sql(&CompletionRequest::at_end("SELECT name FROM "), &CancellationToken::new())
//!     .await?;
//! ```

pub mod completion;
pub mod config;
pub mod execute;
pub mod logging;

pub use completion::{
    CompletionEngine, CompletionError, CompletionItem, CompletionItemKind, CompletionRequest,
    CompletionRequestTracker, CompletionResult, RequestTicket,
};
pub use config::{ConfigError, EngineConfig, KeywordCasing};
pub use execute::{
    ExecuteError, ExecuteResult, ExecuteSqlQuery, PreparedQuery, QueryExecutor, QueryResult,
    ResultMapper, Row, prepare_query,
};
pub use logging::init_tracing;
