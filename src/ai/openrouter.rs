// src/ai/openrouter.rs
//! Client for the OpenRouter chat-completions API. Used both for article
//! generation (plain mode) and chat-message extraction (JSON mode).

use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use super::{classify_status, CompletionError};
use crate::config::OpenRouterConfig;

const API_URL: &str = "https://openrouter.ai/api/v1/chat/completions";
const REQUEST_TIMEOUT_SECS: u64 = 60;
// Optional attribution headers, used by OpenRouter for rankings.
const REFERER: &str = "http://localhost:3000";
const APP_TITLE: &str = "Job Publisher Bot";

pub struct OpenRouterClient {
    client: reqwest::Client,
    api_key: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: String,
}

#[derive(Deserialize)]
struct ApiErrorResponse {
    error: ApiErrorBody,
}

#[derive(Deserialize)]
struct ApiErrorBody {
    message: String,
}

impl OpenRouterClient {
    pub fn new(config: OpenRouterConfig) -> Result<Self, CompletionError> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;
        Ok(Self {
            client,
            api_key: config.api_key,
        })
    }

    pub fn from_env() -> Result<Self, CompletionError> {
        let config =
            OpenRouterConfig::from_env().map_err(|err| CompletionError::Config(err.to_string()))?;
        Self::new(config)
    }

    /// Free-form completion.
    pub async fn complete(&self, model: &str, prompt: &str) -> Result<String, CompletionError> {
        self.request(model, prompt, false).await
    }

    /// Completion constrained to a JSON object response.
    pub async fn complete_json(&self, model: &str, prompt: &str) -> Result<String, CompletionError> {
        self.request(model, prompt, true).await
    }

    async fn request(
        &self,
        model: &str,
        prompt: &str,
        json_mode: bool,
    ) -> Result<String, CompletionError> {
        let mut body = json!({
            "model": model,
            "messages": [{ "role": "user", "content": prompt }],
        });
        if json_mode {
            body["response_format"] = json!({ "type": "json_object" });
        }

        debug!("calling openrouter chat completion for model {}", model);
        let response = self
            .client
            .post(API_URL)
            .bearer_auth(&self.api_key)
            .header("HTTP-Referer", REFERER)
            .header("X-Title", APP_TITLE)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<ApiErrorResponse>(&text)
                .map(|parsed| parsed.error.message)
                .unwrap_or(text);
            return Err(classify_status(status.as_u16(), message));
        }

        let parsed: ChatResponse =
            serde_json::from_str(&text).map_err(|_| CompletionError::MissingContent)?;
        parsed
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .filter(|content| !content.is_empty())
            .ok_or(CompletionError::MissingContent)
    }
}
