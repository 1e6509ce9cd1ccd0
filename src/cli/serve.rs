use std::time::Duration;

use anyhow::{Context, Result};
use product_recs::bot::client::HttpRecApi;
use product_recs::bot::ChatBot;
use product_recs::config::ServiceConfig;
use product_recs::RecommendationEngine;

fn runtime() -> Result<tokio::runtime::Runtime> {
    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("Failed to start tokio runtime")
}

/// Run the recommendation API until Ctrl-C.
pub fn api(config: &ServiceConfig) -> Result<()> {
    // Load before accepting requests so the first caller doesn't pay for it.
    let engine = RecommendationEngine::init_global(&config.artifact_paths());
    let bind = config.api.bind.clone();
    runtime()?
        .block_on(product_recs::api::serve(engine, &bind, config.api.cors))
        .with_context(|| format!("API server on {} failed", bind))
}

/// Run the chat bot endpoint until Ctrl-C.
pub fn bot(config: &ServiceConfig) -> Result<()> {
    let bot = chat_bot(config);
    let bind = config.bot.bind.clone();
    runtime()?
        .block_on(product_recs::bot::serve(bot, &bind))
        .with_context(|| format!("Chat bot on {} failed", bind))
}

pub fn chat_bot(config: &ServiceConfig) -> ChatBot {
    let api = HttpRecApi::new(&config.bot.api_base, Duration::from_secs(config.bot.timeout_secs));
    ChatBot::new(Box::new(api), config.bot.default_k)
}
