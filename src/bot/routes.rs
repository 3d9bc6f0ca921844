// src/bot/routes.rs
//! Web surface of the chat bridge: health and pairing pages, the JSON status
//! record, and the webhooks the external transport calls into.

use std::sync::Arc;

use anyhow::Result;
use rocket::http::Status;
use rocket::response::content::RawHtml;
use rocket::serde::json::Json;
use rocket::{get, post, routes, State};
use serde::Deserialize;
use tokio::sync::RwLock;
use tracing::info;

use super::status::SessionStatus;
use super::BotContext;

type SharedStatus = Arc<RwLock<SessionStatus>>;

/// One message pushed by the transport gateway.
#[derive(Debug, Deserialize)]
pub struct IncomingMessage {
    pub from: String,
    pub body: String,
}

/// Transport lifecycle notifications.
#[derive(Debug, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum SessionEvent {
    Qr { code: String },
    Authenticated,
    Ready,
    AuthFailure { message: String },
}

#[get("/")]
async fn index(status: &State<SharedStatus>) -> (Status, RawHtml<String>) {
    let status = status.read().await;
    match &status.last_error {
        Some(error) => (
            Status::InternalServerError,
            RawHtml(format!(
                "<h1>🚨 Bot Failed to Start</h1><p><strong>Error Details:</strong></p><pre>{}</pre>",
                error
            )),
        ),
        None => (
            Status::Ok,
            RawHtml("Bot is running! 🚀 <br><br> <a href=\"/qr\">View QR Code</a>".to_string()),
        ),
    }
}

#[get("/qr")]
async fn qr_page(status: &State<SharedStatus>) -> (Status, RawHtml<String>) {
    let status = status.read().await;

    if let Some(error) = &status.last_error {
        return (
            Status::InternalServerError,
            RawHtml(format!(
                "<div style=\"font-family:sans-serif; text-align:center; margin-top:50px;\">\
                 <h1>⚠️ Bot Failed to Start</h1><pre>{}</pre></div>",
                error
            )),
        );
    }

    let Some(code) = status.qr() else {
        return (
            Status::Ok,
            RawHtml(
                "<div style=\"font-family:sans-serif; text-align:center; margin-top:50px;\">\
                 <h2>Bot is Starting... ⏳</h2>\
                 <p>Waiting for QR code from the messaging session.</p>\
                 <script>setTimeout(() => location.reload(), 5000);</script></div>"
                    .to_string(),
            ),
        );
    };

    let encoded: String = url::form_urlencoded::byte_serialize(code.as_bytes()).collect();
    let image_url = format!(
        "https://api.qrserver.com/v1/create-qr-code/?size=300x300&data={}",
        encoded
    );
    (
        Status::Ok,
        RawHtml(format!(
            "<div style=\"font-family:sans-serif; text-align:center; margin-top:50px;\">\
             <h2>Scan with your phone</h2>\
             <img src=\"{}\" alt=\"QR Code\">\
             <p>Last updated: {}</p>\
             <script>setTimeout(() => location.reload(), 20000);</script></div>",
            image_url,
            status.updated_at.format("%H:%M:%S"),
        )),
    )
}

#[get("/status")]
async fn status_json(status: &State<SharedStatus>) -> Json<SessionStatus> {
    Json(status.read().await.clone())
}

#[post("/messages", data = "<message>")]
async fn receive_message(message: Json<IncomingMessage>, ctx: &State<Arc<BotContext>>) -> Status {
    let ctx = ctx.inner().clone();
    let IncomingMessage { from, body } = message.into_inner();
    // Each message runs as its own task; slow pipelines never block intake.
    tokio::spawn(async move {
        super::handle_message(&ctx, &from, &body).await;
    });
    Status::Accepted
}

#[post("/events", data = "<event>")]
async fn session_event(event: Json<SessionEvent>, status: &State<SharedStatus>) -> Status {
    let mut status = status.write().await;
    match event.into_inner() {
        SessionEvent::Qr { code } => {
            info!("received new pairing code from transport");
            status.qr_received(code);
        }
        SessionEvent::Authenticated => {
            info!("messaging session authenticated");
            status.authenticated();
        }
        SessionEvent::Ready => {
            info!("messaging session ready, listening for commands");
            status.ready();
        }
        SessionEvent::AuthFailure { message } => {
            status.fail(format!("Authentication Failure: {}", message));
        }
    }
    Status::NoContent
}

/// Mount the routes and serve until shutdown.
pub async fn serve(ctx: Arc<BotContext>, port: u16) -> Result<()> {
    let status: SharedStatus = Arc::new(RwLock::new(SessionStatus::new()));

    info!("status server listening on port {}", port);
    let figment = rocket::Config::figment()
        .merge(("port", port))
        .merge(("address", "0.0.0.0"));

    rocket::custom(figment)
        .manage(status)
        .manage(ctx)
        .mount(
            "/",
            routes![index, qr_page, status_json, receive_message, session_event],
        )
        .launch()
        .await
        .map_err(|err| anyhow::anyhow!("status server failed: {}", err))?;

    Ok(())
}
