// src/config.rs
//! Environment-sourced credentials. Each config is loaded at first use so a
//! missing key only fails the command that actually needs it.

use anyhow::{Context, Result};

fn required_var(name: &'static str) -> Result<String> {
    std::env::var(name).with_context(|| format!("{} is not set in the environment or .env", name))
}

/// OAuth client credentials and target blog for the Blogger API.
#[derive(Debug, Clone)]
pub struct BloggerConfig {
    pub client_id: String,
    pub client_secret: String,
    pub refresh_token: String,
    pub blog_id: String,
}

impl BloggerConfig {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            client_id: required_var("GOOGLE_CLIENT_ID")?,
            client_secret: required_var("GOOGLE_CLIENT_SECRET")?,
            refresh_token: required_var("GOOGLE_REFRESH_TOKEN")?,
            blog_id: required_var("BLOG_ID")?,
        })
    }
}

#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_key: String,
}

impl GeminiConfig {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            api_key: required_var("GEMINI_API_KEY")?,
        })
    }
}

#[derive(Debug, Clone)]
pub struct OpenRouterConfig {
    pub api_key: String,
}

impl OpenRouterConfig {
    pub fn from_env() -> Result<Self> {
        let api_key = required_var("OPENROUTER_API_KEY")?;
        // The template .env ships with this placeholder.
        if api_key == "your_openrouter_api_key" {
            anyhow::bail!("OPENROUTER_API_KEY is missing or not configured in .env");
        }
        Ok(Self { api_key })
    }
}

/// Settings for the chat bridge: status server port and the optional outbound
/// endpoint replies are POSTed to. Without an outbound URL replies are only
/// logged, which keeps local runs usable.
#[derive(Debug, Clone)]
pub struct BotConfig {
    pub port: u16,
    pub outbound_url: Option<String>,
}

impl BotConfig {
    pub fn from_env() -> Result<Self> {
        let port = match std::env::var("PORT") {
            Ok(value) => value
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            Err(_) => 3000,
        };
        Ok(Self {
            port,
            outbound_url: std::env::var("CHAT_OUTBOUND_URL").ok(),
        })
    }
}
