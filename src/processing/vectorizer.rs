//! Fitted TF-IDF vectorizer — query side only.
//!
//! The vocabulary and idf weights are produced offline together with the
//! product matrix; this module only applies them to search queries so the
//! query lands in the same space as the product rows.

use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use super::sparse::SparseVector;
use crate::error::{RecError, RecResult};

/// Tokens of two or more word characters.
static TOKEN_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b\w\w+\b").expect("valid token pattern"));

fn default_true() -> bool {
    true
}

fn default_ngram_range() -> (usize, usize) {
    (1, 1)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TfidfVectorizer {
    /// term -> column
    pub vocabulary: HashMap<String, usize>,
    /// idf weight per column
    pub idf: Vec<f64>,
    #[serde(default = "default_true")]
    pub lowercase: bool,
    #[serde(default = "default_ngram_range")]
    pub ngram_range: (usize, usize),
    #[serde(default)]
    pub sublinear_tf: bool,
    #[serde(default)]
    pub stop_words: Option<HashSet<String>>,
}

impl TfidfVectorizer {
    /// Check internal consistency after deserialization.
    pub fn validate(&self) -> RecResult<()> {
        let dim = self.idf.len();
        if let Some((term, col)) = self.vocabulary.iter().find(|(_, &c)| c >= dim) {
            return Err(RecError::invalid(
                "vectorizer",
                format!("term '{}' maps to column {} but idf has {} entries", term, col, dim),
            ));
        }
        let (lo, hi) = self.ngram_range;
        if lo == 0 || lo > hi {
            return Err(RecError::invalid(
                "vectorizer",
                format!("invalid ngram_range ({}, {})", lo, hi),
            ));
        }
        Ok(())
    }

    /// Output dimension (number of vocabulary columns).
    pub fn dim(&self) -> usize {
        self.idf.len()
    }

    /// Split text into the analyzer's terms (n-grams joined by a space).
    pub fn analyze(&self, text: &str) -> Vec<String> {
        let text = if self.lowercase {
            text.to_lowercase()
        } else {
            text.to_string()
        };
        let tokens: Vec<&str> = TOKEN_PATTERN
            .find_iter(&text)
            .map(|m| m.as_str())
            .filter(|t| {
                self.stop_words
                    .as_ref()
                    .is_none_or(|stop| !stop.contains(*t))
            })
            .collect();

        let (lo, hi) = self.ngram_range;
        let mut terms = Vec::new();
        for n in lo..=hi {
            if n > tokens.len() {
                break;
            }
            for window in tokens.windows(n) {
                terms.push(window.join(" "));
            }
        }
        terms
    }

    /// Transform a query into an L2-normalized TF-IDF vector.
    pub fn transform(&self, text: &str) -> SparseVector {
        let mut counts: HashMap<usize, f64> = HashMap::new();
        for term in self.analyze(text) {
            if let Some(&col) = self.vocabulary.get(&term) {
                *counts.entry(col).or_insert(0.0) += 1.0;
            }
        }

        let pairs = counts
            .into_iter()
            .map(|(col, tf)| {
                let tf = if self.sublinear_tf { 1.0 + tf.ln() } else { tf };
                (col, tf * self.idf[col])
            })
            .collect();

        let mut v = SparseVector::from_pairs(self.dim(), pairs);
        v.normalize();
        tracing::debug!(terms = v.indices.len(), "Query vectorized");
        v
    }
}
