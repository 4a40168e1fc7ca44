pub mod groq;

use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

use self::groq::GroqChatClient;
use super::LlmConfig;
use crate::models::chat::ChatTurn;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("completion credential is not configured")]
    MissingApiKey,
    #[error("invalid API key format: {0}")]
    InvalidApiKey(String),
    #[error("request to completion API failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("completion API returned {status}: {body}")]
    Api {
        status: u16,
        body: String,
    },
    #[error("completion API returned no choices")]
    EmptyResponse,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionResponse {
    pub response: String,
}

/// A chat-completion backend. Model and sampling parameters are fixed by the
/// implementation; callers only supply the ordered message list.
#[async_trait]
pub trait ChatClient: Send + Sync {
    async fn complete(&self, messages: &[ChatTurn]) -> Result<CompletionResponse, LlmError>;

    fn get_model(&self) -> String;
}

pub fn new_client(config: &LlmConfig) -> Result<Arc<dyn ChatClient>, LlmError> {
    let client = GroqChatClient::from_config(config)?;
    Ok(Arc::new(client))
}
