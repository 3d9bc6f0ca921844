// src/ai/gemini.rs
//! Direct client for the Gemini `generateContent` REST API, plus the model
//! listing used by the key diagnostics.

use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use super::{classify_status, CompletionError};
use crate::config::GeminiConfig;

const BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
const REQUEST_TIMEOUT_SECS: u64 = 60;

pub struct GeminiClient {
    client: reqwest::Client,
    api_key: String,
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<ResponseCandidate>,
}

#[derive(Deserialize)]
struct ResponseCandidate {
    content: CandidateContent,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ContentPart>,
}

#[derive(Deserialize)]
struct ContentPart {
    #[serde(default)]
    text: String,
}

#[derive(Deserialize)]
struct ListModelsResponse {
    #[serde(default)]
    models: Vec<ModelInfo>,
}

#[derive(Deserialize)]
struct ModelInfo {
    name: String,
}

impl GeminiClient {
    pub fn new(config: GeminiConfig) -> Result<Self, CompletionError> {
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
            GeminiConfig::from_env().map_err(|err| CompletionError::Config(err.to_string()))?;
        Self::new(config)
    }

    /// One-shot completion against a named model.
    pub async fn complete(&self, model: &str, prompt: &str) -> Result<String, CompletionError> {
        let url = format!(
            "{}/models/{}:generateContent?key={}",
            BASE_URL, model, self.api_key
        );
        let body = json!({
            "contents": [{ "parts": [{ "text": prompt }] }]
        });

        debug!("calling gemini generateContent for model {}", model);
        let response = self.client.post(&url).json(&body).send().await?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            return Err(classify_status(status.as_u16(), message));
        }

        let parsed: GenerateContentResponse = response.json().await?;
        parsed
            .candidates
            .into_iter()
            .next()
            .and_then(|candidate| candidate.content.parts.into_iter().next())
            .map(|part| part.text)
            .filter(|text| !text.is_empty())
            .ok_or(CompletionError::MissingContent)
    }

    /// Names of the models visible to this key, used by `check-key`.
    pub async fn list_models(&self) -> Result<Vec<String>, CompletionError> {
        let url = format!("{}/models?key={}", BASE_URL, self.api_key);
        let response = self.client.get(&url).send().await?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            return Err(classify_status(status.as_u16(), message));
        }

        let parsed: ListModelsResponse = response.json().await?;
        Ok(parsed.models.into_iter().map(|model| model.name).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_content_response_shape() {
        let json = r#"{
            "candidates": [
                { "content": { "parts": [{ "text": "<h1>Job</h1>" }], "role": "model" } }
            ]
        }"#;
        let parsed: GenerateContentResponse = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.candidates[0].content.parts[0].text, "<h1>Job</h1>");
    }

    #[test]
    fn test_list_models_response_shape() {
        let json = r#"{ "models": [{ "name": "models/gemini-2.0-flash" }] }"#;
        let parsed: ListModelsResponse = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.models[0].name, "models/gemini-2.0-flash");
    }
}
