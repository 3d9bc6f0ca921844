// src/ai/mod.rs
//! Article generation with an ordered provider/model fallback chain.

pub mod extract;
pub mod gemini;
pub mod openrouter;
pub mod prompts;

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use tracing::{error, info, warn};

use crate::types::JobFields;
use gemini::GeminiClient;
use openrouter::OpenRouterClient;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    Gemini,
    OpenRouter,
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Provider::Gemini => write!(f, "gemini"),
            Provider::OpenRouter => write!(f, "openrouter"),
        }
    }
}

/// One named endpoint in the fallback sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModelCandidate {
    pub provider: Provider,
    pub model: &'static str,
}

/// Ordered preference list for article generation. Append new entries here;
/// the fallback loop never needs to change.
pub const CONTENT_MODELS: &[ModelCandidate] = &[
    ModelCandidate {
        provider: Provider::OpenRouter,
        model: "google/gemini-2.0-flash-001",
    },
    ModelCandidate {
        provider: Provider::Gemini,
        model: "gemini-2.0-flash",
    },
    ModelCandidate {
        provider: Provider::Gemini,
        model: "gemini-1.5-flash",
    },
];

#[derive(Debug, Error)]
pub enum CompletionError {
    #[error("quota exceeded: {0}")]
    Quota(String),
    #[error("model not found: {0}")]
    NotFound(String),
    #[error("provider returned status {status}: {message}")]
    Api { status: u16, message: String },
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("completion response had no content")]
    MissingContent,
    #[error("{0}")]
    Config(String),
}

/// Map an error status to the skip-vs-abort classification used by the
/// fallback loop: 429 and 404 move on to the next candidate, everything else
/// aborts the chain.
pub(crate) fn classify_status(status: u16, message: String) -> CompletionError {
    match status {
        429 => CompletionError::Quota(message),
        404 => CompletionError::NotFound(message),
        _ => CompletionError::Api { status, message },
    }
}

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("all available AI models are currently overwhelmed or hitting quota, wait a minute and try again")]
    Exhausted,
    #[error("model {model} returned an empty article")]
    Empty { model: String },
    #[error(transparent)]
    Completion(#[from] CompletionError),
}

/// Routes one completion request to whichever provider a candidate names.
#[async_trait]
pub trait CompletionBackend: Send + Sync {
    async fn complete(
        &self,
        candidate: &ModelCandidate,
        prompt: &str,
    ) -> Result<String, CompletionError>;
}

/// Production backend. Clients are built per request so a missing API key
/// surfaces when a provider is first used, not at startup.
pub struct ProviderRouter;

#[async_trait]
impl CompletionBackend for ProviderRouter {
    async fn complete(
        &self,
        candidate: &ModelCandidate,
        prompt: &str,
    ) -> Result<String, CompletionError> {
        match candidate.provider {
            Provider::Gemini => {
                GeminiClient::from_env()?
                    .complete(candidate.model, prompt)
                    .await
            }
            Provider::OpenRouter => {
                OpenRouterClient::from_env()?
                    .complete(candidate.model, prompt)
                    .await
            }
        }
    }
}

/// Drives the fallback chain over [`CONTENT_MODELS`] and cleans up the winning
/// completion into Blogger-ready HTML.
pub struct ContentGenerator {
    backend: Arc<dyn CompletionBackend>,
    candidates: &'static [ModelCandidate],
}

impl ContentGenerator {
    pub fn new() -> Self {
        Self {
            backend: Arc::new(ProviderRouter),
            candidates: CONTENT_MODELS,
        }
    }

    pub fn with_backend(
        backend: Arc<dyn CompletionBackend>,
        candidates: &'static [ModelCandidate],
    ) -> Self {
        Self {
            backend,
            candidates,
        }
    }

    /// Generate the SEO article for a job posting.
    ///
    /// Candidates are attempted once each, in declared order. Quota and
    /// not-found responses skip to the next candidate; any other failure
    /// aborts immediately. An exhausted list is [`GenerationError::Exhausted`].
    pub async fn generate(&self, job: &JobFields) -> Result<String, GenerationError> {
        let prompt = prompts::article_prompt(job);

        for candidate in self.candidates {
            info!(
                "attempting content generation with {} model {}",
                candidate.provider, candidate.model
            );
            match self.backend.complete(candidate, &prompt).await {
                Ok(text) => {
                    let html = strip_code_fences(&text);
                    if html.is_empty() {
                        return Err(GenerationError::Empty {
                            model: candidate.model.to_string(),
                        });
                    }
                    info!("content generated by {}", candidate.model);
                    return Ok(html);
                }
                Err(CompletionError::Quota(message)) => {
                    warn!("{} hit quota limit, trying next model: {}", candidate.model, message);
                }
                Err(CompletionError::NotFound(message)) => {
                    warn!("{} not found, trying next model: {}", candidate.model, message);
                }
                Err(err) => {
                    error!("{} failed: {}", candidate.model, err);
                    return Err(err.into());
                }
            }
        }

        Err(GenerationError::Exhausted)
    }
}

impl Default for ContentGenerator {
    fn default() -> Self {
        Self::new()
    }
}

/// Strip markdown code-fence wrapping the models sometimes add despite the
/// prompt, and trim surrounding whitespace.
pub fn strip_code_fences(text: &str) -> String {
    text.replace("```html", "").replace("```", "").trim().to_string()
}
