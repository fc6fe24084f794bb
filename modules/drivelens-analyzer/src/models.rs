//! Vendor selection: both providers expose the same `ChatModel` surface,
//! so the rest of the pipeline never branches on the vendor.

use std::sync::Arc;

use ai_client::{ChatModel, Claude, OpenAi};
use drivelens_common::{Config, ModelProvider};

pub struct ModelPair {
    pub summary: Arc<dyn ChatModel>,
    pub synthesis: Arc<dyn ChatModel>,
}

pub fn build_models(config: &Config) -> ModelPair {
    match config.provider {
        ModelProvider::Claude => ModelPair {
            summary: Arc::new(Claude::new(
                config.anthropic_api_key.clone(),
                config.summary_model.clone(),
            )),
            synthesis: Arc::new(Claude::new(
                config.anthropic_api_key.clone(),
                config.synthesis_model.clone(),
            )),
        },
        ModelProvider::OpenAi => ModelPair {
            summary: Arc::new(OpenAi::new(
                config.openai_api_key.clone(),
                config.summary_model.clone(),
            )),
            synthesis: Arc::new(OpenAi::new(
                config.openai_api_key.clone(),
                config.synthesis_model.clone(),
            )),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(provider: ModelProvider) -> Config {
        Config {
            provider,
            anthropic_api_key: "sk-ant-test".to_string(),
            openai_api_key: "sk-test".to_string(),
            summary_model: "summary-model".to_string(),
            synthesis_model: "synthesis-model".to_string(),
            summary_max_tokens: 500,
            synthesis_max_tokens: 4000,
            summary_input_bytes: 30_000,
            context_budget_tokens: 100_000,
            google_client_id: "cid".to_string(),
            google_client_secret: "secret".to_string(),
            google_refresh_token: None,
            google_access_token: Some("tok".to_string()),
        }
    }

    #[test]
    fn models_carry_their_configured_ids() {
        let pair = build_models(&config(ModelProvider::Claude));
        assert_eq!(pair.summary.model(), "summary-model");
        assert_eq!(pair.synthesis.model(), "synthesis-model");

        let pair = build_models(&config(ModelProvider::OpenAi));
        assert_eq!(pair.summary.model(), "summary-model");
        assert_eq!(pair.synthesis.model(), "synthesis-model");
    }
}
