//! Chat front end — turns free text into recommendation API calls.
//!
//! The bot never fails a request: API errors become an apology reply that
//! names the API base URL.

pub mod client;
pub mod intents;

use std::sync::Arc;

use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::constants::BOT_DEFAULT_USER_ID;
use crate::product::{Product, ProductId, UserId};
use client::{BotError, RecApi};
use intents::Intent;

const HELP: &str = "I didn't get that. Try: 'recommend me products', \
                    'products similar to 1' or 'info about product 3'.";

pub struct ChatBot {
    api: Box<dyn RecApi>,
    k: usize,
}

impl ChatBot {
    pub fn new(api: Box<dyn RecApi>, k: usize) -> Self {
        Self { api, k }
    }

    /// Text reply for one chat message. Blocking (performs HTTP calls).
    pub fn reply(&self, message: &str, user_id: Option<UserId>) -> String {
        let intent = Intent::parse(message);
        tracing::debug!(intent = ?intent, "Chat intent");

        let result = match intent {
            Intent::Recommend => {
                let user_id = user_id.unwrap_or(BOT_DEFAULT_USER_ID);
                self.api
                    .recommend_for_user(user_id, self.k)
                    .map(|items| render_list("Recommendations:", &items, "No recommendations for now."))
            }
            Intent::Similar(pid) => self
                .api
                .similar_items(pid, self.k)
                .map(|items| render_list(&format!("Similar to {}:", pid), &items, "No similar products found.")),
            Intent::Info(pid) => match self.api.get_product(pid) {
                Ok(p) => Ok(render_info(&p)),
                Err(BotError::NotFound) => Ok(format!("Product {} not found.", pid)),
                Err(e) => Err(e),
            },
            Intent::Unknown => Ok(HELP.to_string()),
        };

        result.unwrap_or_else(|e| {
            tracing::warn!(error = %e, api = %self.api.base_url(), "Recommendation API call failed");
            self.apology(&e)
        })
    }

    fn apology(&self, e: &BotError) -> String {
        format!(
            "Your API did not respond ({}). Is it running at {}?",
            e,
            self.api.base_url()
        )
    }
}

fn price_label(price: Option<f64>) -> String {
    match price {
        Some(v) => format!("${:.2}", v),
        None => "price n/a".to_string(),
    }
}

fn item_line(p: &Product) -> String {
    format!(
        "- ({}) {} – {}",
        p.product_id,
        p.title.as_deref().unwrap_or("untitled"),
        price_label(p.price)
    )
}

fn render_list(header: &str, items: &[Product], empty: &str) -> String {
    if items.is_empty() {
        return empty.to_string();
    }
    std::iter::once(header.to_string())
        .chain(items.iter().map(item_line))
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_info(p: &Product) -> String {
    let head = format!("{} – {}", p.title.as_deref().unwrap_or("untitled"), price_label(p.price));
    match p.description.as_deref() {
        Some(d) if !d.is_empty() => format!("{}\n{}", head, d),
        _ => head,
    }
}

// ============================================================================
// HTTP endpoint
// ============================================================================

#[derive(Deserialize)]
pub struct ReplyRequest {
    pub message: String,
    #[serde(default)]
    pub user_id: Option<UserId>,
}

#[derive(Serialize, Deserialize)]
pub struct ReplyResponse {
    pub reply: String,
}

/// POST /reply
async fn reply(State(bot): State<Arc<ChatBot>>, Json(req): Json<ReplyRequest>) -> Json<ReplyResponse> {
    let worker = Arc::clone(&bot);
    let reply = tokio::task::spawn_blocking(move || worker.reply(req.message.trim(), req.user_id))
        .await
        .unwrap_or_else(|e| {
            tracing::error!(error = %e, "Reply worker panicked");
            format!("Something went wrong ({}). Please try again.", e)
        });
    Json(ReplyResponse { reply })
}

/// GET /health
async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

pub fn build_router(bot: Arc<ChatBot>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/reply", post(reply))
        .with_state(bot)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

/// Bind and serve until Ctrl-C.
pub async fn serve(bot: ChatBot, bind: &str) -> std::io::Result<()> {
    let api_base = bot.api.base_url().to_string();
    let router = build_router(Arc::new(bot));
    let listener = TcpListener::bind(bind).await?;
    tracing::info!(bind = %bind, api = %api_base, "Chat bot listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(crate::api::shutdown_signal())
        .await?;

    tracing::info!("Chat bot shut down");
    Ok(())
}
