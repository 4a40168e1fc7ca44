pub mod chat;

use std::time::Duration;

use crate::cli::Args;

pub const DEFAULT_BASE_URL: &str = "https://api.groq.com/openai/v1";
pub const DEFAULT_MODEL: &str = "llama-3.1-8b-instant";

/// Generation parameters fixed for the lifetime of the deployment.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionSettings {
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub timeout: Option<Duration>,
}

impl Default for CompletionSettings {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            temperature: 0.6,
            max_tokens: 500,
            timeout: Some(Duration::from_secs(30)),
        }
    }
}

#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub settings: CompletionSettings,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            settings: CompletionSettings::default(),
        }
    }
}

impl LlmConfig {
    pub fn from_args(args: &Args) -> Self {
        let api_key = Some(args.chat_api_key.trim().to_string()).filter(|k| !k.is_empty());
        let timeout = Some(args.request_timeout_secs)
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs);
        Self {
            api_key,
            base_url: args.chat_base_url.clone(),
            settings: CompletionSettings {
                model: args.chat_model.clone(),
                temperature: args.temperature,
                max_tokens: args.max_tokens,
                timeout,
            },
        }
    }
}
