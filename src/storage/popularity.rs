//! Popularity table — `popularity.csv` (`product_id,score`).
//!
//! When no table is shipped the engine synthesizes a uniform one so the
//! ranking degenerates to catalog order.

use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::constants::UNIFORM_POPULARITY_SCORE;
use crate::error::RecResult;
use crate::product::{Catalog, ProductId};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PopularityEntry {
    pub product_id: ProductId,
    pub score: f64,
}

#[derive(Debug, Clone, Default)]
pub struct PopularityTable {
    entries: Vec<PopularityEntry>,
    synthesized: bool,
}

impl PopularityTable {
    pub fn new(entries: Vec<PopularityEntry>) -> Self {
        Self {
            entries,
            synthesized: false,
        }
    }

    /// Uniform score for every catalog product, in catalog order.
    pub fn uniform(catalog: &Catalog) -> Self {
        let entries = catalog
            .products()
            .iter()
            .map(|p| PopularityEntry {
                product_id: p.product_id,
                score: UNIFORM_POPULARITY_SCORE,
            })
            .collect();
        Self {
            entries,
            synthesized: true,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn is_synthesized(&self) -> bool {
        self.synthesized
    }

    /// Product ids by descending score; equal scores keep table order.
    pub fn ranked_ids(&self) -> Vec<ProductId> {
        let mut order: Vec<&PopularityEntry> = self.entries.iter().collect();
        order.sort_by(|a, b| b.score.total_cmp(&a.score));
        order.into_iter().map(|e| e.product_id).collect()
    }

    /// Score lookup; the first row wins for duplicated ids.
    pub fn scores(&self) -> HashMap<ProductId, f64> {
        let mut map = HashMap::with_capacity(self.entries.len());
        for e in &self.entries {
            map.entry(e.product_id).or_insert(e.score);
        }
        map
    }
}

pub fn load_popularity(path: &Path) -> RecResult<PopularityTable> {
    let file = std::fs::File::open(path)?;
    read_popularity(file)
}

pub fn read_popularity<R: Read>(reader: R) -> RecResult<PopularityTable> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let entries = rdr
        .deserialize::<PopularityEntry>()
        .collect::<Result<Vec<_>, _>>()?;
    Ok(PopularityTable::new(entries))
}
