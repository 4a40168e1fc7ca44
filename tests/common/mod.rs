#![allow(dead_code)]

use async_trait::async_trait;
use perfume_advisor::agent::PerfumeAdvisor;
use perfume_advisor::catalog::CatalogStore;
use perfume_advisor::config::prompt::PromptConfig;
use perfume_advisor::history::{ ConversationLog, ConversationLogEntry, HistoryError };
use perfume_advisor::history::memory::InMemoryConversationLog;
use perfume_advisor::llm::chat::{ ChatClient, CompletionResponse, LlmError };
use perfume_advisor::models::chat::ChatTurn;
use std::sync::{ Arc, Mutex };

/// Twelve rows, so a default sample of ten never returns the whole catalog.
pub fn catalog_csv() -> String {
    let mut csv = String::from("name,brand,family,price\n");
    for i in 0..12 {
        csv.push_str(&format!("عطر {},دار {},شرقي,{}\n", i, i % 3, 100 + i));
    }
    csv
}

pub fn catalog() -> Arc<CatalogStore> {
    Arc::new(CatalogStore::from_reader(catalog_csv().as_bytes()).expect("catalog"))
}

pub fn prompts() -> Arc<PromptConfig> {
    Arc::new(PromptConfig::builtin().expect("builtin prompts"))
}

/// Returns a fixed reply and remembers every message list it was sent.
pub struct RecordingChat {
    reply: String,
    seen: Mutex<Vec<Vec<ChatTurn>>>,
}

impl RecordingChat {
    pub fn new(reply: &str) -> Arc<Self> {
        Arc::new(Self { reply: reply.to_string(), seen: Mutex::new(Vec::new()) })
    }

    pub fn calls(&self) -> Vec<Vec<ChatTurn>> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatClient for RecordingChat {
    async fn complete(&self, messages: &[ChatTurn]) -> Result<CompletionResponse, LlmError> {
        self.seen.lock().unwrap().push(messages.to_vec());
        Ok(CompletionResponse { response: self.reply.clone() })
    }

    fn get_model(&self) -> String {
        "recording".to_string()
    }
}

pub struct FailingChat;

#[async_trait]
impl ChatClient for FailingChat {
    async fn complete(&self, _messages: &[ChatTurn]) -> Result<CompletionResponse, LlmError> {
        Err(LlmError::Api { status: 503, body: "upstream down".to_string() })
    }

    fn get_model(&self) -> String {
        "failing".to_string()
    }
}

/// Panics inside the completion call, taking the request task down with it.
pub struct PanickingChat;

#[async_trait]
impl ChatClient for PanickingChat {
    async fn complete(&self, _messages: &[ChatTurn]) -> Result<CompletionResponse, LlmError> {
        panic!("completion task crashed")
    }

    fn get_model(&self) -> String {
        "panicking".to_string()
    }
}

pub struct BrokenLog;

#[async_trait]
impl ConversationLog for BrokenLog {
    async fn append(&self, _entry: ConversationLogEntry) -> Result<(), HistoryError> {
        Err(HistoryError::Poisoned)
    }
}

pub fn advisor_with(
    chat: Option<Arc<dyn ChatClient>>,
    catalog: Arc<CatalogStore>,
    log: Arc<dyn ConversationLog>
) -> PerfumeAdvisor {
    PerfumeAdvisor::from_parts(chat, catalog, prompts(), log, 10)
}

pub fn memory_log() -> Arc<InMemoryConversationLog> {
    Arc::new(InMemoryConversationLog::new())
}
