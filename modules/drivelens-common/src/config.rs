use std::env;

use tracing::info;

/// Which chat-model vendor backs the summarize and synthesize calls.
/// The vendor is a configuration option, not a design variable: both
/// expose the same `ChatModel` surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelProvider {
    Claude,
    OpenAi,
}

impl ModelProvider {
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "claude" | "anthropic" => Some(ModelProvider::Claude),
            "openai" => Some(ModelProvider::OpenAi),
            _ => None,
        }
    }
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    // Chat models
    pub provider: ModelProvider,
    pub anthropic_api_key: String,
    pub openai_api_key: String,
    pub summary_model: String,
    pub synthesis_model: String,

    // Token budgets
    pub summary_max_tokens: u32,
    pub synthesis_max_tokens: u32,
    /// Input budget for one summarization request, in bytes of document text.
    pub summary_input_bytes: usize,
    /// Estimated-token ceiling for the synthesis payload.
    pub context_budget_tokens: usize,

    // Google Drive
    pub google_client_id: String,
    pub google_client_secret: String,
    pub google_refresh_token: Option<String>,
    pub google_access_token: Option<String>,
}

impl Config {
    /// Load configuration from environment variables.
    /// Panics with a clear message if required vars are missing.
    pub fn from_env() -> Self {
        let provider = env::var("AI_PROVIDER")
            .ok()
            .map(|v| {
                ModelProvider::parse(&v)
                    .unwrap_or_else(|| panic!("AI_PROVIDER must be 'claude' or 'openai', got {v}"))
            })
            .unwrap_or(ModelProvider::Claude);

        let (anthropic_api_key, openai_api_key) = match provider {
            ModelProvider::Claude => (required_env("ANTHROPIC_API_KEY"), optional_env("OPENAI_API_KEY")),
            ModelProvider::OpenAi => (optional_env("ANTHROPIC_API_KEY"), required_env("OPENAI_API_KEY")),
        };

        let (default_summary, default_synthesis) = match provider {
            ModelProvider::Claude => ("claude-haiku-4-5-20251001", "claude-sonnet-4-20250514"),
            ModelProvider::OpenAi => ("gpt-4o-mini", "gpt-4o"),
        };

        Self {
            provider,
            anthropic_api_key,
            openai_api_key,
            summary_model: env::var("SUMMARY_MODEL").unwrap_or_else(|_| default_summary.to_string()),
            synthesis_model: env::var("SYNTHESIS_MODEL")
                .unwrap_or_else(|_| default_synthesis.to_string()),
            summary_max_tokens: parsed_env("SUMMARY_MAX_TOKENS", 500),
            synthesis_max_tokens: parsed_env("SYNTHESIS_MAX_TOKENS", 4000),
            summary_input_bytes: parsed_env("SUMMARY_INPUT_BYTES", 30_000),
            context_budget_tokens: parsed_env("CONTEXT_BUDGET_TOKENS", 100_000),
            google_client_id: required_env("GOOGLE_CLIENT_ID"),
            google_client_secret: required_env("GOOGLE_CLIENT_SECRET"),
            google_refresh_token: env::var("GOOGLE_REFRESH_TOKEN").ok(),
            google_access_token: env::var("GOOGLE_ACCESS_TOKEN").ok(),
        }
    }

    /// Log the loaded configuration without exposing secrets.
    pub fn log_redacted(&self) {
        info!(
            provider = ?self.provider,
            summary_model = %self.summary_model,
            synthesis_model = %self.synthesis_model,
            summary_max_tokens = self.summary_max_tokens,
            synthesis_max_tokens = self.synthesis_max_tokens,
            context_budget_tokens = self.context_budget_tokens,
            has_anthropic_key = !self.anthropic_api_key.is_empty(),
            has_openai_key = !self.openai_api_key.is_empty(),
            has_refresh_token = self.google_refresh_token.is_some(),
            has_access_token = self.google_access_token.is_some(),
            "Configuration loaded"
        );
    }
}

fn required_env(key: &str) -> String {
    env::var(key).unwrap_or_else(|_| panic!("{key} environment variable is required"))
}

fn optional_env(key: &str) -> String {
    env::var(key).unwrap_or_default()
}

fn parsed_env<T: std::str::FromStr>(key: &str, default: T) -> T {
    match env::var(key) {
        Ok(raw) => raw
            .parse()
            .unwrap_or_else(|_| panic!("{key} must be a number, got {raw}")),
        Err(_) => default,
    }
}
