// src/diagnostics.rs
//! `check-key`: validate the Gemini key format, query the provider's model
//! list directly, then probe the content models with a tiny completion.
//! Prints findings and always exits cleanly.

use anyhow::Result;

use crate::ai::gemini::GeminiClient;
use crate::config::GeminiConfig;

const PROBE_MODELS: &[&str] = &["gemini-2.0-flash", "gemini-1.5-flash"];

pub async fn check_gemini_key() -> Result<()> {
    println!("Checking API key format...");
    let config = match GeminiConfig::from_env() {
        Ok(config) => config,
        Err(_) => {
            println!("❌ Error: GEMINI_API_KEY is missing from the environment");
            return Ok(());
        }
    };

    let prefix: String = config.api_key.chars().take(7).collect();
    println!("Key starts with: {}...", prefix);
    println!("Key length: {}", config.api_key.len());

    let client = GeminiClient::new(config)?;
    match client.list_models().await {
        Ok(models) => {
            println!("✅ API key is VALID. Available models:");
            if models.is_empty() {
                println!("No models found in response.");
            } else {
                for model in models.iter().take(5) {
                    println!(" - {}", model);
                }
            }
        }
        Err(err) => {
            println!("❌ API key check FAILED: {}", err);
            return Ok(());
        }
    }

    println!("\nProbing content models...");
    for model in PROBE_MODELS {
        match client.complete(model, "test").await {
            Ok(_) => println!("✅ {} responded", model),
            Err(err) => println!("❌ {} failed: {}", model, err),
        }
    }

    Ok(())
}
