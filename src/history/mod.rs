pub mod memory;
pub mod sqlite;

use async_trait::async_trait;
use chrono::Local;
use log::info;
use serde::{ Deserialize, Serialize };
use std::sync::Arc;
use thiserror::Error;

use crate::cli::Args;

#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("history writer task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
    #[error("history store lock poisoned")]
    Poisoned,
    #[error("unsupported history store type: {0}")]
    UnsupportedType(String),
}

/// One handled request, successful or not.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationLogEntry {
    pub timestamp: String,
    pub username: String,
    pub query: String,
    pub response: String,
    pub context: String,
}

impl ConversationLogEntry {
    pub fn now(
        username: impl Into<String>,
        query: impl Into<String>,
        response: impl Into<String>,
        context: impl Into<String>
    ) -> Self {
        Self {
            timestamp: Local::now().to_rfc3339(),
            username: username.into(),
            query: query.into(),
            response: response.into(),
            context: context.into(),
        }
    }
}

/// Append-only sink for handled requests. Implementations serialize
/// concurrent writers themselves.
#[async_trait]
pub trait ConversationLog: Send + Sync {
    async fn append(&self, entry: ConversationLogEntry) -> Result<(), HistoryError>;
}

pub fn create_history_store(args: &Args) -> Result<Arc<dyn ConversationLog>, HistoryError> {
    match args.history_type.to_lowercase().as_str() {
        "sqlite" => {
            let store = sqlite::SqliteConversationLog::open(&args.history_path)?;
            Ok(Arc::new(store))
        }
        "memory" => Ok(Arc::new(memory::InMemoryConversationLog::new())),
        other => Err(HistoryError::UnsupportedType(other.to_string())),
    }
}

pub fn initialize_history_store(args: &Args) -> Result<Arc<dyn ConversationLog>, HistoryError> {
    info!("Conversations will be logged to: {} at {}", args.history_type, args.history_path);
    create_history_store(args)
}
