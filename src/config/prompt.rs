use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use log::info;
use thiserror::Error;

use crate::intent::Intent;
use crate::models::chat::ChatTurn;

const BUILTIN_PROMPTS: &str = include_str!("../../json/prompts.json");

#[derive(Debug, Error)]
pub enum PromptError {
    #[error("Prompt template '{0}' is missing placeholder '{1}'")]
    MissingPlaceholder(&'static str, &'static str),
    #[error("Prompt file IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Prompt JSON parsing error: {0}")]
    JsonError(#[from] serde_json::Error),
}

#[derive(Deserialize, Debug, Clone)]
pub struct KeywordSets {
    pub greeting: Vec<String>,
    pub information: Vec<String>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct PromptTemplates {
    pub system: String,
    pub greeting: String,
    pub information: String,
    pub recommendation: String,
}

#[derive(Deserialize, Debug, Clone)]
pub struct FixedMessages {
    pub configuration_error: String,
    pub upstream_error_prefix: String,
}

#[derive(Deserialize, Debug, Clone)]
pub struct PromptConfig {
    pub response_language: String,
    pub greeting_max_words: usize,
    pub keywords: KeywordSets,
    pub templates: PromptTemplates,
    pub messages: FixedMessages,
}

impl FixedMessages {
    pub fn upstream_error(&self, error: &dyn std::fmt::Display) -> String {
        format!("{}{}", self.upstream_error_prefix, error)
    }
}

impl PromptConfig {
    /// Configuration compiled into the binary from `json/prompts.json`.
    pub fn builtin() -> Result<Self, PromptError> {
        Self::from_json(BUILTIN_PROMPTS)
    }

    pub fn from_json(raw: &str) -> Result<Self, PromptError> {
        let config: PromptConfig = serde_json::from_str(raw)?;
        let config = config.case_folded();
        config.validate()?;
        Ok(config)
    }

    fn case_folded(mut self) -> Self {
        for keyword in self.keywords.greeting.iter_mut().chain(self.keywords.information.iter_mut()) {
            *keyword = keyword.to_lowercase();
        }
        self
    }

    fn validate(&self) -> Result<(), PromptError> {
        let required = [
            ("system", &self.templates.system, "{context}"),
            ("greeting", &self.templates.greeting, "{query}"),
            ("information", &self.templates.information, "{query}"),
            ("recommendation", &self.templates.recommendation, "{query}"),
        ];
        for (name, template, placeholder) in required {
            if !template.contains(placeholder) {
                return Err(PromptError::MissingPlaceholder(name, placeholder));
            }
        }
        Ok(())
    }

    fn user_template(&self, intent: Intent) -> &str {
        match intent {
            Intent::Greeting => &self.templates.greeting,
            Intent::Information => &self.templates.information,
            Intent::Recommendation => &self.templates.recommendation,
        }
    }
}

pub fn load_prompts<P: AsRef<Path>>(path: P) -> Result<Arc<PromptConfig>, PromptError> {
    let path = path.as_ref();
    let file_content = fs::read_to_string(path)?;
    let config = PromptConfig::from_json(&file_content)?;
    info!("Loaded prompt configuration from {}", path.display());
    Ok(Arc::new(config))
}

pub fn system_message(config: &PromptConfig, perfumes_context: &str) -> ChatTurn {
    ChatTurn::system(config.templates.system.replace("{context}", perfumes_context))
}

// `{query}` goes in last so the caller's text is never itself rewritten.
pub fn user_message(config: &PromptConfig, intent: Intent, query: &str) -> ChatTurn {
    let content = config
        .user_template(intent)
        .replace("{language}", &config.response_language)
        .replace("{query}", query);
    ChatTurn::user(content)
}

/// Full message list for one completion: system prompt, the caller's
/// history in order, then the intent-specific instruction.
pub fn compose_messages(
    config: &PromptConfig,
    intent: Intent,
    query: &str,
    perfumes_context: &str,
    history: &[ChatTurn]
) -> Vec<ChatTurn> {
    let mut messages = Vec::with_capacity(history.len() + 2);
    messages.push(system_message(config, perfumes_context));
    messages.extend(history.iter().cloned());
    messages.push(user_message(config, intent, query));
    messages
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::chat::Role;
    use pretty_assertions::assert_eq;

    #[test]
    fn builtin_config_parses_and_validates() {
        let config = PromptConfig::builtin().unwrap();
        assert_eq!(config.response_language, "Arabic");
        assert_eq!(config.greeting_max_words, 3);
        assert_eq!(config.keywords.greeting.len(), 9);
        assert_eq!(config.keywords.information.len(), 4);
        assert_eq!(config.messages.configuration_error, "خطأ في الإعدادات الداخلية.");
    }

    #[test]
    fn recommendation_prompt_matches_template() {
        let config = PromptConfig::builtin().unwrap();
        let messages = compose_messages(
            &config,
            Intent::Recommendation,
            "أعطني عطر صيفي",
            "[]",
            &[]
        );

        assert_eq!(messages.len(), 2);
        assert_eq!(
            messages[0],
            ChatTurn::system(
                "You are an AI assistant for a perfume store. Answer using only the perfumes in the list below.\n\
                 PERFUME LIST: []"
            )
        );
        assert_eq!(
            messages[1],
            ChatTurn::user(
                "Based on the JSON list provided, answer this customer request: \"أعطني عطر صيفي\"\n\n\
                 **CRITICAL INSTRUCTIONS:**\n\
                 1. **Primary Choice:** Select the single best perfume from the list that matches the request.\n\
                 2. **Alternative Choice:** Select a second, different perfume from the list that is also a good alternative.\n\
                 3. **Format (MANDATORY):** Respond in Arabic using exactly this format:\n\
                 الاختيار الأساسي: <perfume name> - <why it matches>\n\
                 البديل: <perfume name> - <why it is a good alternative>"
            )
        );
    }

    #[test]
    fn greeting_prompt_forbids_recommendation() {
        let config = PromptConfig::builtin().unwrap();
        let message = user_message(&config, Intent::Greeting, "مرحبا");
        assert_eq!(message.role, Role::User);
        assert!(message.content.contains("The user has just said: \"مرحبا\""));
        assert!(message.content.contains("DO NOT recommend a perfume"));
        assert!(message.content.contains("in Arabic"));
    }

    #[test]
    fn information_prompt_forbids_new_suggestion() {
        let config = PromptConfig::builtin().unwrap();
        let message = user_message(&config, Intent::Information, "ما هو مكون العود");
        assert!(message.content.contains("answer this specific question: \"ما هو مكون العود\""));
        assert!(message.content.contains("DO NOT suggest another perfume"));
    }

    #[test]
    fn query_is_rendered_verbatim() {
        let config = PromptConfig::builtin().unwrap();
        let query = "  \"quoted\" {language} {context}\nsecond line  ";
        for intent in [Intent::Greeting, Intent::Information, Intent::Recommendation] {
            let message = user_message(&config, intent, query);
            assert!(message.content.contains(query), "{:?} lost the query", intent);
        }
    }

    #[test]
    fn history_sits_between_system_and_instruction() {
        let config = PromptConfig::builtin().unwrap();
        let history = vec![ChatTurn::user("أريد عطرا"), ChatTurn::assistant("بالتأكيد")];
        let messages = compose_messages(&config, Intent::Information, "ما هو", "[]", &history);
        assert_eq!(messages.len(), 4);
        assert_eq!(messages[0].role, Role::System);
        assert_eq!(&messages[1..3], history.as_slice());
        assert_eq!(messages[3].role, Role::User);
    }

    #[test]
    fn keywords_are_case_folded() {
        let raw = BUILTIN_PROMPTS.replace("\"مكونات\"", "\"NOTES\"");
        let config = PromptConfig::from_json(&raw).unwrap();
        assert!(config.keywords.information.contains(&"notes".to_string()));
    }

    #[test]
    fn template_without_query_placeholder_is_rejected() {
        let raw = BUILTIN_PROMPTS.replace("request: \\\"{query}\\\"", "request");
        let err = PromptConfig::from_json(&raw).unwrap_err();
        assert!(matches!(err, PromptError::MissingPlaceholder("recommendation", "{query}")));
    }

    #[test]
    fn load_prompts_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prompts.json");
        std::fs::write(&path, BUILTIN_PROMPTS.replace("\"Arabic\"", "\"English\"")).unwrap();
        let config = load_prompts(&path).unwrap();
        assert_eq!(config.response_language, "English");
    }
}
