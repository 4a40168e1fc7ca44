use clap::Parser;

use crate::agent::DEFAULT_SAMPLE_SIZE;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    // --- History Store Args ---
    /// Conversation log store type (sqlite, memory)
    #[arg(long, env = "HISTORY_TYPE", default_value = "sqlite")]
    pub history_type: String,

    /// Path of the SQLite database holding the conversation log.
    #[arg(long, env = "HISTORY_PATH", default_value = "chat_history.db")]
    pub history_path: String,

    // --- Chat LLM Provider Args ---
    /// Base URL of the OpenAI-compatible chat completion API.
    #[arg(long, env = "CHAT_BASE_URL", default_value = "https://api.groq.com/openai/v1")]
    pub chat_base_url: String,

    /// API Key for the chat completion provider. Requests are refused while this is empty.
    #[arg(long, env = "GROQ_API_KEY", default_value = "", hide_env_values = true)]
    pub chat_api_key: String,

    /// Model name for chat completion.
    #[arg(long, env = "CHAT_MODEL", default_value = "llama-3.1-8b-instant")]
    pub chat_model: String,

    /// Sampling temperature sent with every completion request.
    #[arg(long, env = "CHAT_TEMPERATURE", default_value = "0.6")]
    pub temperature: f32,

    /// Upper bound on generated tokens per completion.
    #[arg(long, env = "CHAT_MAX_TOKENS", default_value = "500")]
    pub max_tokens: u32,

    /// Timeout in seconds for a single completion call. 0 disables the timeout.
    #[arg(long, env = "CHAT_TIMEOUT_SECS", default_value = "30")]
    pub request_timeout_secs: u64,

    // --- Catalog Args ---
    /// Path to the perfume catalog CSV file.
    #[arg(long, env = "CATALOG_PATH", default_value = "perfumes.csv")]
    pub catalog_path: String,

    /// Number of catalog records embedded as context on a fresh conversation.
    #[arg(long, env = "CATALOG_SAMPLE_SIZE", default_value_t = DEFAULT_SAMPLE_SIZE)]
    pub sample_size: usize,

    // --- General App Args ---
    /// Optional path to a prompt configuration file (keywords and templates).
    /// The built-in configuration is used when unset.
    #[arg(long, env = "PROMPTS_PATH")]
    pub prompts_path: Option<String>,

    /// Host address and port for the server to listen on.
    #[arg(long, env = "SERVER_ADDR", default_value = "127.0.0.1:8000")]
    pub server_addr: String,

    /// Optional path to the TLS certificate file (PEM format). Requires --tls-key-path.
    #[arg(long, env = "TLS_CERT_PATH")]
    pub tls_cert_path: Option<String>,

    /// Optional path to the TLS private key file (PEM format). Requires --tls-cert-path.
    #[arg(long, env = "TLS_KEY_PATH")]
    pub tls_key_path: Option<String>,

    #[arg(long, env = "ENABLE_TLS", default_value = "false")]
    pub enable_tls: bool,
}
