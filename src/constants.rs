// === Artifact file names ===
pub const CATALOG_FILE: &str = "products.csv";
pub const POPULARITY_FILE: &str = "popularity.csv";
pub const USER_IDS_FILE: &str = "user_ids.csv";
pub const TFIDF_MATRIX_FILE: &str = "product_tfidf.json";
pub const USER_ITEM_FILE: &str = "user_item.json";
pub const VECTORIZER_FILE: &str = "tfidf_vectorizer.json";

// === Query defaults ===
pub const DEFAULT_RECOMMEND_K: usize = 5;
pub const DEFAULT_SIMILAR_K: usize = 5;
pub const DEFAULT_SEARCH_K: usize = 10;
/// Score given to every product when no popularity table is shipped.
pub const UNIFORM_POPULARITY_SCORE: f64 = 1.0;

// === HTTP ===
pub const DEFAULT_API_BIND: &str = "127.0.0.1:8000";
pub const DEFAULT_BOT_BIND: &str = "127.0.0.1:8001";
pub const DEFAULT_API_BASE: &str = "http://localhost:8000";
pub const BOT_REQUEST_TIMEOUT_SECS: u64 = 5;
pub const BOT_DEFAULT_USER_ID: i64 = 1;

// === Environment overrides ===
pub const ENV_DATA_DIR: &str = "PRODUCT_RECS_DATA_DIR";
pub const ENV_MODELS_DIR: &str = "PRODUCT_RECS_MODELS_DIR";
pub const ENV_API_BASE: &str = "REC_API_BASE";

/// Truncate a string to at most `max` chars on a char boundary.
pub fn truncate_safe(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}
