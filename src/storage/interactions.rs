//! User-item interactions — `user_ids.csv` + `user_item.json`.
//!
//! Row `i` of the matrix belongs to the i-th user id of the list. The two
//! files are loaded independently and paired by the engine.

use std::collections::{HashMap, HashSet};
use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use crate::error::{RecError, RecResult};
use crate::processing::CsrMatrix;
use crate::product::UserId;

#[derive(Debug, Deserialize)]
struct UserIdRow {
    user_id: UserId,
}

pub fn load_user_ids(path: &Path) -> RecResult<Vec<UserId>> {
    let file = std::fs::File::open(path)?;
    read_user_ids(file)
}

pub fn read_user_ids<R: Read>(reader: R) -> RecResult<Vec<UserId>> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let ids = rdr
        .deserialize::<UserIdRow>()
        .map(|r| r.map(|row| row.user_id))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(ids)
}

/// Validated pairing of the user id list with the user-item matrix.
#[derive(Debug, Clone)]
pub struct Interactions {
    rows: HashMap<UserId, usize>,
    matrix: CsrMatrix,
}

impl Interactions {
    /// `n_products` is the catalog size the matrix columns must match.
    pub fn new(user_ids: Vec<UserId>, matrix: CsrMatrix, n_products: usize) -> RecResult<Self> {
        if matrix.rows() != user_ids.len() {
            return Err(RecError::invalid(
                "user_item",
                format!("{} rows but {} user ids", matrix.rows(), user_ids.len()),
            ));
        }
        if matrix.cols() != n_products {
            return Err(RecError::invalid(
                "user_item",
                format!("{} columns but catalog has {} products", matrix.cols(), n_products),
            ));
        }

        let mut rows = HashMap::with_capacity(user_ids.len());
        for (row, uid) in user_ids.into_iter().enumerate() {
            if rows.contains_key(&uid) {
                tracing::warn!(user_id = uid, row = row, "Duplicate user id, keeping first row");
                continue;
            }
            rows.insert(uid, row);
        }
        Ok(Self { rows, matrix })
    }

    pub fn n_users(&self) -> usize {
        self.rows.len()
    }

    /// Catalog rows (0-based) the user has interacted with, or None for a
    /// cold user.
    pub fn consumed(&self, user_id: UserId) -> Option<HashSet<usize>> {
        let row = *self.rows.get(&user_id)?;
        Some(self.matrix.nonzero_columns(row).into_iter().collect())
    }
}
