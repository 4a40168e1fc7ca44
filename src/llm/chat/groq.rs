use async_trait::async_trait;
use log::{ debug, info };
use reqwest::{ Client as HttpClient, header::{ HeaderMap, HeaderValue, CONTENT_TYPE, AUTHORIZATION } };
use serde::{ Deserialize, Serialize };

use super::{ ChatClient, CompletionResponse, LlmError };
use crate::llm::{ CompletionSettings, LlmConfig };
use crate::models::chat::ChatTurn;

pub struct GroqChatClient {
    http: HttpClient,
    settings: CompletionSettings,
    base_url: String,
}

#[derive(Serialize)]
struct GroqMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct GroqRequest<'a> {
    messages: Vec<GroqMessage<'a>>,
    model: &'a str,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Deserialize)]
struct GroqResponse {
    choices: Vec<GroqChoice>,
}

#[derive(Deserialize)]
struct GroqChoice {
    message: GroqResponseMessage,
}

#[derive(Deserialize)]
struct GroqResponseMessage {
    content: Option<String>,
}

impl GroqChatClient {
    pub fn new(
        api_key: &str,
        base_url: String,
        settings: CompletionSettings
    ) -> Result<Self, LlmError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        let mut auth = HeaderValue::from_str(&format!("Bearer {}", api_key)).map_err(|e|
            LlmError::InvalidApiKey(e.to_string())
        )?;
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);

        let mut builder = HttpClient::builder().default_headers(headers);
        if let Some(timeout) = settings.timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build()?;

        Ok(Self { http, settings, base_url })
    }

    pub fn from_config(config: &LlmConfig) -> Result<Self, LlmError> {
        let api_key = config.api_key.as_deref().ok_or(LlmError::MissingApiKey)?;
        Self::new(api_key, config.base_url.clone(), config.settings.clone())
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl ChatClient for GroqChatClient {
    async fn complete(&self, messages: &[ChatTurn]) -> Result<CompletionResponse, LlmError> {
        let url = self.completions_url();
        let req = GroqRequest {
            messages: messages
                .iter()
                .map(|m| GroqMessage { role: m.role.as_str(), content: &m.content })
                .collect(),
            model: &self.settings.model,
            temperature: self.settings.temperature,
            max_tokens: self.settings.max_tokens,
        };

        debug!("Sending {} messages to {} (model {})", messages.len(), url, self.settings.model);
        let resp = self.http.post(&url).json(&req).send().await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(LlmError::Api { status: status.as_u16(), body });
        }

        let parsed = resp.json::<GroqResponse>().await?;
        let content = parsed.choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or(LlmError::EmptyResponse)?;

        info!("Groq completion received ({} chars)", content.chars().count());
        Ok(CompletionResponse { response: content })
    }

    fn get_model(&self) -> String {
        self.settings.model.clone()
    }
}
