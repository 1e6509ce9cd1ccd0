use thiserror::Error;

use crate::product::ProductId;

#[derive(Error, Debug)]
pub enum RecError {
    /// The catalog could not be loaded, so nothing can be looked up.
    #[error("Product catalog unavailable")]
    CatalogUnavailable,

    #[error("Product not found: {0}")]
    ProductNotFound(ProductId),

    /// Structurally broken or misaligned artifact (bad CSR layout, wrong shape).
    #[error("Invalid artifact {artifact}: {reason}")]
    InvalidArtifact { artifact: &'static str, reason: String },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl RecError {
    pub fn invalid(artifact: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidArtifact {
            artifact,
            reason: reason.into(),
        }
    }
}

pub type RecResult<T> = Result<T, RecError>;
