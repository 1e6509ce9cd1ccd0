//! Recommendation Engine — product lookup, personalized recommendations,
//! item similarity and free-text search over static artifacts.
//!
//! Artifacts are loaded once per process through [`RecommendationEngine::init_global`].
//! Every artifact except the catalog is optional; each query degrades to a
//! documented fallback when the data it prefers is missing. `k` is capped at
//! the catalog size.
//!
//! | Query              | Preferred data            | Fallback                    |
//! |--------------------|---------------------------|-----------------------------|
//! | recommend_for_user | user-item + popularity    | popularity ranking          |
//! | similar_items      | TF-IDF cosine             | catalog order               |
//! | search_products    | vectorizer + TF-IDF       | case-insensitive substring  |
//!
//! Matrices are attached only if they line up with the catalog (row `i` is
//! product `i + 1`, shapes match). A misaligned artifact is rejected loudly
//! and the fallback applies.

use std::collections::HashSet;
use std::sync::OnceLock;

use serde::Serialize;

use crate::error::{RecError, RecResult};
use crate::processing::sparse::rank_descending;
use crate::processing::{CsrMatrix, TfidfVectorizer};
use crate::product::{Catalog, Product, ProductId, UserId};
use crate::storage::catalog::load_catalog;
use crate::storage::interactions::{load_user_ids, Interactions};
use crate::storage::models::{load_csr, load_tfidf, load_vectorizer};
use crate::storage::path_utils::ArtifactPaths;
use crate::storage::popularity::{load_popularity, PopularityTable};
use crate::storage::load_optional;

static GLOBAL: OnceLock<RecommendationEngine> = OnceLock::new();

/// Raw artifacts as read from disk, before alignment checks.
#[derive(Debug, Clone, Default)]
pub struct EngineArtifacts {
    pub catalog: Option<Catalog>,
    pub popularity: Option<PopularityTable>,
    pub tfidf: Option<CsrMatrix>,
    pub vectorizer: Option<TfidfVectorizer>,
    pub user_item: Option<CsrMatrix>,
    pub user_ids: Option<Vec<UserId>>,
}

impl EngineArtifacts {
    /// Read every artifact independently; missing or broken ones stay `None`.
    pub fn read(paths: &ArtifactPaths) -> Self {
        Self {
            catalog: load_optional("catalog", &paths.catalog, load_catalog),
            popularity: load_optional("popularity", &paths.popularity, load_popularity),
            tfidf: load_optional("product_tfidf", &paths.tfidf, load_tfidf),
            vectorizer: load_optional("vectorizer", &paths.vectorizer, load_vectorizer),
            user_item: load_optional("user_item", &paths.user_item, |p| load_csr("user_item", p)),
            user_ids: load_optional("user_ids", &paths.user_ids, load_user_ids),
        }
    }
}

/// Which artifacts the engine is actually using.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ArtifactStatus {
    /// Number of catalog products, None when the catalog is unavailable.
    pub catalog_products: Option<usize>,
    /// "file" or "uniform"
    pub popularity: &'static str,
    pub tfidf: bool,
    pub vectorizer: bool,
    /// Number of users with interaction data.
    pub interaction_users: Option<usize>,
}

pub struct RecommendationEngine {
    catalog: Option<Catalog>,
    popularity: PopularityTable,
    tfidf: Option<CsrMatrix>,
    vectorizer: Option<TfidfVectorizer>,
    interactions: Option<Interactions>,
}

impl RecommendationEngine {
    /// Process-wide engine, loaded on first use. Only the first call in a
    /// process decides which artifacts are loaded; later calls share it.
    pub fn init_global(paths: &ArtifactPaths) -> &'static Self {
        GLOBAL.get_or_init(|| Self::load(paths))
    }

    pub fn load(paths: &ArtifactPaths) -> Self {
        Self::from_artifacts(EngineArtifacts::read(paths))
    }

    /// Assemble an engine, dropping artifacts that do not line up with the catalog.
    pub fn from_artifacts(a: EngineArtifacts) -> Self {
        let catalog = a.catalog;
        let n_products = catalog.as_ref().map(Catalog::len).unwrap_or(0);
        let aligned = catalog.as_ref().is_some_and(|c| c.index().is_contiguous());

        let popularity = match (a.popularity, catalog.as_ref()) {
            (Some(p), _) => p,
            (None, Some(c)) => PopularityTable::uniform(c),
            (None, None) => PopularityTable::uniform(&Catalog::default()),
        };

        if catalog.is_none() {
            tracing::error!("Product catalog unavailable, all queries will fail");
        } else if !aligned && (a.tfidf.is_some() || a.user_item.is_some()) {
            tracing::error!("Catalog ids are not contiguous from 1, matrix artifacts disabled");
        }

        let tfidf = a.tfidf.filter(|m| {
            if !aligned {
                return false;
            }
            if m.rows() != n_products {
                tracing::error!(
                    rows = m.rows(),
                    products = n_products,
                    "TF-IDF matrix does not match catalog, similarity disabled"
                );
                return false;
            }
            true
        });

        let vectorizer = match (a.vectorizer, tfidf.as_ref()) {
            (Some(v), Some(m)) if v.dim() != m.cols() => {
                tracing::error!(
                    vectorizer_dim = v.dim(),
                    matrix_cols = m.cols(),
                    "Vectorizer does not match TF-IDF matrix, search falls back to substring"
                );
                None
            }
            (v, _) => v,
        };

        let interactions = match (a.user_ids, a.user_item) {
            (Some(ids), Some(m)) if aligned => match Interactions::new(ids, m, n_products) {
                Ok(i) => Some(i),
                Err(e) => {
                    tracing::error!(error = %e, "User-item data rejected, using popularity only");
                    None
                }
            },
            _ => None,
        };

        let engine = Self {
            catalog,
            popularity,
            tfidf,
            vectorizer,
            interactions,
        };
        let status = engine.status();
        tracing::info!(
            products = ?status.catalog_products,
            popularity = status.popularity,
            tfidf = status.tfidf,
            vectorizer = status.vectorizer,
            users = ?status.interaction_users,
            "Recommendation engine ready"
        );
        engine
    }

    pub fn status(&self) -> ArtifactStatus {
        ArtifactStatus {
            catalog_products: self.catalog.as_ref().map(Catalog::len),
            popularity: if self.popularity.is_synthesized() { "uniform" } else { "file" },
            tfidf: self.tfidf.is_some(),
            vectorizer: self.vectorizer.is_some(),
            interaction_users: self.interactions.as_ref().map(Interactions::n_users),
        }
    }

    fn catalog(&self) -> RecResult<&Catalog> {
        self.catalog.as_ref().ok_or(RecError::CatalogUnavailable)
    }

    /// Exact lookup by id.
    pub fn get_product(&self, product_id: ProductId) -> RecResult<Product> {
        self.catalog()?
            .get(product_id)
            .cloned()
            .ok_or(RecError::ProductNotFound(product_id))
    }

    /// Top-k products for a user, never including products the user already
    /// consumed. Unknown users get the popularity ranking.
    pub fn recommend_for_user(&self, user_id: UserId, k: usize) -> RecResult<Vec<Product>> {
        let catalog = self.catalog()?;
        let k = k.min(catalog.len());

        let consumed = self.interactions.as_ref().and_then(|i| i.consumed(user_id));
        let Some(consumed) = consumed else {
            tracing::debug!(user_id = user_id, k = k, "Cold user, popularity ranking");
            return Ok(self.popular(catalog, k));
        };

        let mut picked: Vec<usize> = Vec::with_capacity(k);
        let mut emitted: HashSet<usize> = HashSet::new();

        // Pass 1: popularity order, skipping consumed products.
        for pid in self.popularity.ranked_ids() {
            if picked.len() >= k {
                break;
            }
            let Some(pos) = catalog.index().position(pid) else {
                continue;
            };
            if !consumed.contains(&pos) && emitted.insert(pos) {
                picked.push(pos);
            }
        }

        // Pass 2: top up from catalog order.
        for pos in 0..catalog.len() {
            if picked.len() >= k {
                break;
            }
            if !consumed.contains(&pos) && emitted.insert(pos) {
                picked.push(pos);
            }
        }

        tracing::debug!(
            user_id = user_id,
            consumed = consumed.len(),
            results = picked.len(),
            "Personalized recommendation"
        );
        Ok(Self::records(catalog, picked))
    }

    /// All catalog products by descending popularity; unscored products
    /// rank last, ties keep catalog order.
    fn popular(&self, catalog: &Catalog, k: usize) -> Vec<Product> {
        let scores = self.popularity.scores();
        let mut order: Vec<&Product> = catalog.products().iter().collect();
        order.sort_by(|a, b| {
            match (scores.get(&a.product_id), scores.get(&b.product_id)) {
                (Some(sa), Some(sb)) => sb.total_cmp(sa),
                (Some(_), None) => std::cmp::Ordering::Less,
                (None, Some(_)) => std::cmp::Ordering::Greater,
                (None, None) => std::cmp::Ordering::Equal,
            }
        });
        order.into_iter().take(k).cloned().collect()
    }

    /// Products most similar to `product_id` by TF-IDF cosine, excluding itself.
    pub fn similar_items(&self, product_id: ProductId, k: usize) -> RecResult<Vec<Product>> {
        let catalog = self.catalog()?;
        let k = k.min(catalog.len());

        let Some(tfidf) = self.tfidf.as_ref() else {
            tracing::debug!(product_id = product_id, "No TF-IDF matrix, catalog order fallback");
            return Ok(catalog
                .products()
                .iter()
                .filter(|p| p.product_id != product_id)
                .take(k)
                .cloned()
                .collect());
        };

        let Some(row) = catalog
            .index()
            .position(product_id)
            .and_then(|pos| tfidf.row(pos).map(|r| (pos, r)))
        else {
            tracing::debug!(product_id = product_id, "Product outside TF-IDF matrix");
            return Ok(Vec::new());
        };
        let (own, query) = row;

        let scores = tfidf.dot_all(query);
        let picked: Vec<usize> = rank_descending(&scores)
            .into_iter()
            .filter(|&i| i != own)
            .take(k)
            .collect();

        tracing::debug!(product_id = product_id, results = picked.len(), "Similar items");
        Ok(Self::records(catalog, picked))
    }

    /// Free-text search: TF-IDF cosine when the vectorizer is available,
    /// otherwise case-insensitive substring match in catalog order.
    pub fn search_products(&self, query: &str, k: usize) -> RecResult<Vec<Product>> {
        let catalog = self.catalog()?;
        let k = k.min(catalog.len());

        if let (Some(vectorizer), Some(tfidf)) = (self.vectorizer.as_ref(), self.tfidf.as_ref()) {
            let q = vectorizer.transform(query);
            let scores = tfidf.dot_all(q.as_row());
            let picked: Vec<usize> = rank_descending(&scores).into_iter().take(k).collect();
            tracing::debug!(query = %query, results = picked.len(), "TF-IDF search");
            return Ok(Self::records(catalog, picked));
        }

        let needle = query.to_lowercase();
        let results: Vec<Product> = catalog
            .products()
            .iter()
            .filter(|p| p.matches_lowercase(&needle))
            .take(k)
            .cloned()
            .collect();
        tracing::debug!(query = %query, results = results.len(), "Substring search");
        Ok(results)
    }

    fn records(catalog: &Catalog, positions: Vec<usize>) -> Vec<Product> {
        positions
            .into_iter()
            .filter_map(|pos| catalog.at(pos).cloned())
            .collect()
    }
}
