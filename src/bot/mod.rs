// src/bot/mod.rs
//! Chat bridge: command dispatch, replies, and the status web server. The
//! messaging transport itself (session, QR scan, delivery) lives outside this
//! process and talks to us over the webhook routes.

pub mod commands;
pub mod routes;
pub mod status;

use std::sync::Arc;

use anyhow::{Context, Result};
use async_trait::async_trait;
use tracing::{error, info};

use crate::ai::extract::JobExtractor;
use crate::ai::ContentGenerator;
use crate::config::BotConfig;
use crate::pipeline;
use crate::store::PostStore;
use commands::ChatCommand;

const HELP_TEXT: &str = "🤖 *Job Publisher Bot Help*\n\nSend a message starting with `!publish` followed by job details.\n\n*Example:* !publish We need a React Dev in Dubai. 3yrs exp. jobs@tech.com";

const CANNOT_UNDERSTAND: &str = "❌ Could not understand the job details. Please ensure you include the Job Title and Location at a minimum.";

/// Outbound side of the chat transport.
#[async_trait]
pub trait Messenger: Send + Sync {
    async fn reply(&self, to: &str, body: &str) -> Result<()>;
}

/// POSTs replies to the configured gateway endpoint; without one, replies are
/// only logged.
pub struct HttpMessenger {
    client: reqwest::Client,
    outbound_url: Option<String>,
}

impl HttpMessenger {
    pub fn new(outbound_url: Option<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .context("Failed to create HTTP client")?;
        Ok(Self {
            client,
            outbound_url,
        })
    }
}

#[async_trait]
impl Messenger for HttpMessenger {
    async fn reply(&self, to: &str, body: &str) -> Result<()> {
        let Some(url) = self.outbound_url.as_deref() else {
            info!("reply to {}: {}", to, body);
            return Ok(());
        };

        let payload = serde_json::json!({ "to": to, "body": body });
        let response = self
            .client
            .post(url)
            .json(&payload)
            .send()
            .await
            .context("Failed to deliver chat reply")?;
        let status = response.status();
        if !status.is_success() {
            anyhow::bail!("chat gateway returned {}", status);
        }
        Ok(())
    }
}

/// Everything one incoming message needs; shared across the spawned
/// per-message tasks.
pub struct BotContext {
    pub extractor: Arc<dyn JobExtractor>,
    pub generator: Arc<ContentGenerator>,
    pub store: Arc<dyn PostStore>,
    pub messenger: Arc<dyn Messenger>,
}

/// Handle one incoming chat message end to end. Never returns an error:
/// every failure becomes a reply (or a log line when even the reply fails),
/// so a bad message can't take the bot down.
pub async fn handle_message(ctx: &BotContext, from: &str, body: &str) {
    let Some(command) = commands::parse(body) else {
        return;
    };
    info!("received command from {}: {}", from, body);

    let outcome = match command {
        ChatCommand::Ping => ctx.messenger.reply(from, "pong! 🏓 Bot is active.").await,
        ChatCommand::Help => ctx.messenger.reply(from, HELP_TEXT).await,
        ChatCommand::Publish { text } => publish_from_chat(ctx, from, &text).await,
    };

    if let Err(err) = outcome {
        error!("failed to deliver chat reply to {}: {:#}", from, err);
    }
}

async fn publish_from_chat(ctx: &BotContext, from: &str, raw: &str) -> Result<()> {
    ctx.messenger
        .reply(from, "🚀 Processing your job post... Please wait.")
        .await?;

    let Some(fields) = ctx.extractor.parse(raw).await else {
        return ctx.messenger.reply(from, CANNOT_UNDERSTAND).await;
    };
    info!(
        "parsed job fields: {}",
        serde_json::to_string(&fields).unwrap_or_default()
    );

    if fields.title.is_none() || fields.location.is_none() {
        return ctx.messenger.reply(from, CANNOT_UNDERSTAND).await;
    }

    // Chat posts are always drafted, never published directly.
    match pipeline::publish(&ctx.generator, ctx.store.as_ref(), &fields, false).await {
        Ok(post) => {
            info!("drafted post {} from chat", post.id);
            ctx.messenger
                .reply(
                    from,
                    &format!(
                        "🎉 Success! Your job post has been drafted.\n\n📌 Title: {}\n🔗 URL: {}\n🆔 ID: {}",
                        post.title,
                        post.url_or_dash(),
                        post.id
                    ),
                )
                .await
        }
        Err(err) => {
            ctx.messenger
                .reply(from, &format!("❌ Failed to process: {}", err))
                .await
        }
    }
}

/// Run the chat bridge until the process is stopped.
pub async fn run(ctx: BotContext, config: BotConfig) -> Result<()> {
    routes::serve(Arc::new(ctx), config.port).await
}
