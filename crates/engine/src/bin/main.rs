// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

use std::io::Read;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use dataverse_sql_catalog::{MetadataCatalog, StaticCatalog};
use dataverse_sql_context::{detect_fetchxml_context, detect_sql_context};
use dataverse_sql_engine::{
    CompletionEngine, CompletionRequest, EngineConfig, init_tracing, prepare_query,
};
use dataverse_sql_lowering::VirtualColumnDetector;
use tokio_util::sync::CancellationToken;

const DEFAULT_ENVIRONMENT: &str = "local";

#[derive(Debug, Parser)]
#[command(name = "dataverse-sql", version, about = "Dataverse SQL to FetchXML tooling")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print the FetchXML for a SQL query
    Transpile {
        /// SQL text, or `-` to read stdin
        sql: String,
        #[command(flatten)]
        catalog: CatalogArgs,
    },
    /// Print the completion context at an offset as JSON
    Context {
        /// Document text, or `-` to read stdin
        text: String,
        #[command(flatten)]
        cursor: CursorArgs,
    },
    /// Print completion items at an offset as JSON
    Complete {
        /// Document text, or `-` to read stdin
        text: String,
        #[command(flatten)]
        cursor: CursorArgs,
        #[command(flatten)]
        catalog: CatalogArgs,
    },
}

#[derive(Debug, Args)]
struct CursorArgs {
    /// Byte offset of the cursor; defaults to the end of the text
    #[arg(long)]
    offset: Option<usize>,
    /// Treat the text as FetchXML instead of SQL
    #[arg(long)]
    fetchxml: bool,
}

#[derive(Debug, Args)]
struct CatalogArgs {
    /// JSON or YAML schema file; the built-in sample schema otherwise
    #[arg(long)]
    schema: Option<PathBuf>,
    #[arg(long, default_value = DEFAULT_ENVIRONMENT)]
    environment: String,
}

impl CatalogArgs {
    fn load(&self) -> Result<Arc<dyn MetadataCatalog>> {
        let catalog = match &self.schema {
            Some(path) => StaticCatalog::from_file(path)
                .with_context(|| format!("Failed to load schema {}", path.display()))?,
            None => StaticCatalog::sample(),
        };
        Ok(Arc::new(catalog))
    }
}

fn read_input(arg: &str) -> Result<String> {
    if arg != "-" {
        return Ok(arg.to_string());
    }
    let mut text = String::new();
    std::io::stdin()
        .read_to_string(&mut text)
        .context("Failed to read stdin")?;
    Ok(text)
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Command::Transpile { sql, catalog } => {
            let sql = read_input(&sql)?;
            let detector = VirtualColumnDetector::new(catalog.load()?);
            let prepared = prepare_query(&detector, &catalog.environment, &sql).await?;
            println!("{}", prepared.fetch_xml);
        }
        Command::Context { text, cursor } => {
            let text = read_input(&text)?;
            let offset = cursor.offset.unwrap_or(text.len());
            let json = if cursor.fetchxml {
                serde_json::to_string_pretty(&detect_fetchxml_context(&text, offset))?
            } else {
                serde_json::to_string_pretty(&detect_sql_context(&text, offset))?
            };
            println!("{}", json);
        }
        Command::Complete {
            text,
            cursor,
            catalog,
        } => {
            let text = read_input(&text)?;
            let offset = cursor.offset.unwrap_or(text.len());
            let engine = CompletionEngine::with_config(
                catalog.load()?,
                EngineConfig::new(catalog.environment.clone()),
            );
            let request = CompletionRequest::new(text, offset);
            let cancel = CancellationToken::new();
            let items = if cursor.fetchxml {
                engine.complete_fetchxml(&request, &cancel).await?
            } else {
                engine.complete_sql(&request, &cancel).await?
            };
            println!("{}", serde_json::to_string_pretty(&items)?);
        }
    }

    Ok(())
}
