use crate::catalog::CatalogStore;
use crate::cli::Args;
use crate::config::prompt::{ self, FixedMessages, PromptConfig };
use crate::history::{ initialize_history_store, ConversationLog, ConversationLogEntry };
use crate::intent::{ self, Intent };
use crate::llm::LlmConfig;
use crate::llm::chat::{ ChatClient, LlmError, new_client as new_chat_client };
use crate::models::recommendation::{ RecommendationRequest, RecommendationResponse };

use log::{ info, warn, error };
use std::error::Error;
use std::sync::Arc;

pub const DEFAULT_SAMPLE_SIZE: usize = 10;

/// Result of handling one recommendation request, before it is flattened
/// into the wire response.
#[derive(Debug)]
pub enum Outcome {
    Answered {
        intent: Intent,
        recommendation: String,
        context: String,
    },
    /// Missing credential or catalog. Nothing was logged.
    ConfigurationUnavailable,
    UpstreamFailure {
        intent: Intent,
        error: LlmError,
        context: String,
    },
}

impl Outcome {
    pub fn context(&self) -> &str {
        match self {
            Outcome::Answered { context, .. } | Outcome::UpstreamFailure { context, .. } => context,
            Outcome::ConfigurationUnavailable => "",
        }
    }

    pub fn into_response(self, messages: &FixedMessages) -> RecommendationResponse {
        match self {
            Outcome::Answered { recommendation, context, .. } => {
                RecommendationResponse { recommendation, context }
            }
            Outcome::ConfigurationUnavailable => {
                RecommendationResponse {
                    recommendation: messages.configuration_error.clone(),
                    context: String::new(),
                }
            }
            Outcome::UpstreamFailure { error, context, .. } => {
                RecommendationResponse {
                    recommendation: messages.upstream_error(&error),
                    context,
                }
            }
        }
    }
}

#[derive(Clone)]
pub struct PerfumeAdvisor {
    chat_client: Option<Arc<dyn ChatClient>>,
    catalog: Arc<CatalogStore>,
    prompt_config: Arc<PromptConfig>,
    history_store: Arc<dyn ConversationLog>,
    sample_size: usize,
}

impl PerfumeAdvisor {
    fn initialize_chat_client(
        args: &Args
    ) -> Result<Option<Arc<dyn ChatClient>>, Box<dyn Error + Send + Sync>> {
        let config = LlmConfig::from_args(args);
        if config.api_key.is_none() {
            warn!("GROQ_API_KEY is not set. Every request will get the configuration error.");
            return Ok(None);
        }
        let client = new_chat_client(&config)?;
        info!(
            "Chat client configured: Model={}, BaseURL={}, Temperature={}, MaxTokens={}, Timeout={:?}",
            client.get_model(),
            config.base_url,
            config.settings.temperature,
            config.settings.max_tokens,
            config.settings.timeout
        );
        Ok(Some(client))
    }

    fn load_prompt_config(args: &Args) -> Result<Arc<PromptConfig>, Box<dyn Error + Send + Sync>> {
        match &args.prompts_path {
            Some(path) => Ok(prompt::load_prompts(path)?),
            None => {
                info!("Using built-in prompt configuration");
                Ok(Arc::new(PromptConfig::builtin()?))
            }
        }
    }

    pub async fn new(args: Args) -> Result<Self, Box<dyn Error + Send + Sync>> {
        let chat_client = Self::initialize_chat_client(&args)?;
        let catalog = Arc::new(CatalogStore::load(&args.catalog_path));
        let prompt_config = Self::load_prompt_config(&args)?;
        let history_store = initialize_history_store(&args)?;

        Ok(Self::from_parts(chat_client, catalog, prompt_config, history_store, args.sample_size))
    }

    pub fn from_parts(
        chat_client: Option<Arc<dyn ChatClient>>,
        catalog: Arc<CatalogStore>,
        prompt_config: Arc<PromptConfig>,
        history_store: Arc<dyn ConversationLog>,
        sample_size: usize
    ) -> Self {
        Self {
            chat_client,
            catalog,
            prompt_config,
            history_store,
            sample_size,
        }
    }

    pub fn prompt_config(&self) -> &PromptConfig {
        &self.prompt_config
    }

    /// Handles one request and converts the outcome to the wire shape.
    pub async fn handle(&self, request: &RecommendationRequest) -> RecommendationResponse {
        let outcome = self.recommend(request).await;
        outcome.into_response(&self.prompt_config.messages)
    }

    pub async fn recommend(&self, request: &RecommendationRequest) -> Outcome {
        let chat_client = match &self.chat_client {
            Some(client) if self.catalog.is_available() => client,
            Some(_) => {
                warn!("Catalog unavailable; refusing request from '{}'", request.username);
                return Outcome::ConfigurationUnavailable;
            }
            None => {
                warn!("Completion credential missing; refusing request from '{}'", request.username);
                return Outcome::ConfigurationUnavailable;
            }
        };

        let perfumes_context = self.resolve_context(request);
        let intent = intent::classify(&self.prompt_config, &request.query);
        info!(
            "User '{}' query classified as {} ({} history turns)",
            request.username,
            intent,
            request.history.len()
        );

        let messages = prompt::compose_messages(
            &self.prompt_config,
            intent,
            &request.query,
            &perfumes_context,
            &request.history
        );

        let (outcome, response_text) = match chat_client.complete(&messages).await {
            Ok(resp) => {
                let text = resp.response.clone();
                let outcome = Outcome::Answered {
                    intent,
                    recommendation: resp.response,
                    context: perfumes_context,
                };
                (outcome, text)
            }
            Err(e) => {
                error!("Completion failed for user '{}': {}", request.username, e);
                let text = self.prompt_config.messages.upstream_error(&e);
                let outcome = Outcome::UpstreamFailure {
                    intent,
                    error: e,
                    context: perfumes_context,
                };
                (outcome, text)
            }
        };
        self.log_exchange(request, response_text, outcome.context()).await;

        outcome
    }

    fn resolve_context(&self, request: &RecommendationRequest) -> String {
        if let Some(context) = request.reusable_context() {
            info!("Reusing caller-supplied catalog context ({} bytes)", context.len());
            return context.to_string();
        }

        match self.catalog.sample_context(self.sample_size) {
            Ok(context) => {
                info!(
                    "Sampled {} catalog records for a new conversation",
                    self.sample_size.min(self.catalog.len())
                );
                context
            }
            Err(e) => {
                error!("Failed to serialize catalog sample: {}", e);
                String::new()
            }
        }
    }

    async fn log_exchange(&self, request: &RecommendationRequest, response: String, context: &str) {
        let entry = ConversationLogEntry::now(
            request.username.as_str(),
            request.query.as_str(),
            response,
            context
        );
        if let Err(e) = self.history_store.append(entry).await {
            error!("Failed to persist conversation for user '{}': {}", request.username, e);
        }
    }
}
