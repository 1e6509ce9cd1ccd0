//! Blocking client for the recommendation API.
//!
//! `RecApi` is the seam between intent handling and the network so replies
//! can be rendered against a fake in tests.

use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Deserialize;
use thiserror::Error;

use crate::product::{Product, ProductId, UserId};

#[derive(Error, Debug)]
pub enum BotError {
    /// Connection refused, timeout, non-success status other than 404.
    #[error("{0}")]
    Http(#[from] ureq::Error),

    #[error("not found")]
    NotFound,

    #[error("malformed response: {0}")]
    Malformed(String),
}

pub type BotResult<T> = Result<T, BotError>;

pub trait RecApi: Send + Sync {
    fn base_url(&self) -> &str;
    fn recommend_for_user(&self, user_id: UserId, k: usize) -> BotResult<Vec<Product>>;
    fn similar_items(&self, product_id: ProductId, k: usize) -> BotResult<Vec<Product>>;
    fn get_product(&self, product_id: ProductId) -> BotResult<Product>;
}

#[derive(Deserialize)]
struct Items {
    #[serde(default)]
    items: Vec<Product>,
}

pub struct HttpRecApi {
    base: String,
    agent: ureq::Agent,
}

impl HttpRecApi {
    pub fn new(base: &str, timeout: Duration) -> Self {
        let agent: ureq::Agent = ureq::Agent::config_builder()
            .timeout_global(Some(timeout))
            .build()
            .into();
        Self {
            base: base.trim_end_matches('/').to_string(),
            agent,
        }
    }

    fn get_json<T: DeserializeOwned>(&self, path: &str) -> BotResult<T> {
        let url = format!("{}{}", self.base, path);
        tracing::debug!(url = %url, "Calling recommendation API");
        match self.agent.get(&url).call() {
            Ok(mut response) => response
                .body_mut()
                .read_json::<T>()
                .map_err(|e| BotError::Malformed(e.to_string())),
            Err(ureq::Error::StatusCode(404)) => Err(BotError::NotFound),
            Err(e) => Err(BotError::Http(e)),
        }
    }
}

impl RecApi for HttpRecApi {
    fn base_url(&self) -> &str {
        &self.base
    }

    fn recommend_for_user(&self, user_id: UserId, k: usize) -> BotResult<Vec<Product>> {
        let items: Items = self.get_json(&format!("/recommend/user/{}?k={}", user_id, k))?;
        Ok(items.items)
    }

    fn similar_items(&self, product_id: ProductId, k: usize) -> BotResult<Vec<Product>> {
        let items: Items = self.get_json(&format!("/recommend/similar/{}?k={}", product_id, k))?;
        Ok(items.items)
    }

    fn get_product(&self, product_id: ProductId) -> BotResult<Product> {
        self.get_json(&format!("/products/{}", product_id))
    }
}
