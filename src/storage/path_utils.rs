use std::path::{Path, PathBuf};

use crate::constants::{
    CATALOG_FILE, POPULARITY_FILE, TFIDF_MATRIX_FILE, USER_IDS_FILE, USER_ITEM_FILE, VECTORIZER_FILE,
};

/// Configuration directory, cross-platform.
/// Linux: ~/.config/product-recs/
/// macOS: ~/Library/Application Support/product-recs/
/// Windows: %APPDATA%/product-recs/
pub fn config_dir() -> PathBuf {
    let base = dirs::config_dir().unwrap_or_else(|| {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".config")
    });
    base.join("product-recs")
}

/// `{config_dir}/config.json`
pub fn config_path() -> PathBuf {
    config_dir().join("config.json")
}

/// Resolved locations of every artifact the engine may load.
#[derive(Debug, Clone, PartialEq)]
pub struct ArtifactPaths {
    pub catalog: PathBuf,
    pub popularity: PathBuf,
    pub user_ids: PathBuf,
    pub tfidf: PathBuf,
    pub user_item: PathBuf,
    pub vectorizer: PathBuf,
}

impl ArtifactPaths {
    /// Catalog lives in `data_dir`, everything derived from it in `models_dir`.
    pub fn new(data_dir: &Path, models_dir: &Path) -> Self {
        Self {
            catalog: data_dir.join(CATALOG_FILE),
            popularity: models_dir.join(POPULARITY_FILE),
            user_ids: models_dir.join(USER_IDS_FILE),
            tfidf: models_dir.join(TFIDF_MATRIX_FILE),
            user_item: models_dir.join(USER_ITEM_FILE),
            vectorizer: models_dir.join(VECTORIZER_FILE),
        }
    }
}
