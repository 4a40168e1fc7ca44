use serde::{ Deserialize, Serialize };

use super::chat::ChatTurn;

pub const DEFAULT_USERNAME: &str = "guest";

fn default_username() -> String {
    DEFAULT_USERNAME.to_string()
}

/// Inbound body of `POST /get-recommendation`.
///
/// `history` is owned by the caller and sent again on every turn; `context`
/// is the catalog context returned by a previous response.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RecommendationRequest {
    pub query: String,
    #[serde(default)]
    pub history: Vec<ChatTurn>,
    #[serde(default)]
    pub context: Option<String>,
    #[serde(default = "default_username")]
    pub username: String,
}

impl RecommendationRequest {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            history: Vec::new(),
            context: None,
            username: default_username(),
        }
    }

    pub fn with_history(mut self, history: Vec<ChatTurn>) -> Self {
        self.history = history;
        self
    }

    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    pub fn with_username(mut self, username: impl Into<String>) -> Self {
        self.username = username.into();
        self
    }

    /// Caller context, if one was supplied and is non-empty.
    pub fn reusable_context(&self) -> Option<&str> {
        self.context.as_deref().filter(|c| !c.is_empty())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecommendationResponse {
    pub recommendation: String,
    pub context: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}
