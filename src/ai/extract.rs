// src/ai/extract.rs
//! Free-text to structured job fields via one JSON-mode completion.

use async_trait::async_trait;
use tracing::warn;

use super::openrouter::OpenRouterClient;
use super::{prompts, strip_code_fences};
use crate::types::JobFields;

/// Model used for field extraction. Extraction is a single fixed request, no
/// fallback chain: a failure here is a user-input problem, not a system fault.
pub const EXTRACTION_MODEL: &str = "google/gemini-2.0-flash-001";

/// Seam for chat dispatch: turn a raw message into job fields, or nothing.
#[async_trait]
pub trait JobExtractor: Send + Sync {
    async fn parse(&self, raw: &str) -> Option<JobFields>;
}

pub struct LlmExtractor;

#[async_trait]
impl JobExtractor for LlmExtractor {
    async fn parse(&self, raw: &str) -> Option<JobFields> {
        let client = match OpenRouterClient::from_env() {
            Ok(client) => client,
            Err(err) => {
                warn!("job extraction unavailable: {}", err);
                return None;
            }
        };

        let prompt = prompts::extraction_prompt(raw);
        let text = match client.complete_json(EXTRACTION_MODEL, &prompt).await {
            Ok(text) => text,
            Err(err) => {
                warn!("job extraction request failed: {}", err);
                return None;
            }
        };

        match serde_json::from_str::<JobFields>(&strip_code_fences(&text)) {
            Ok(fields) => Some(fields),
            Err(err) => {
                warn!("could not parse extracted job fields: {}", err);
                None
            }
        }
    }
}
