//! Compressed sparse row matrices and cosine scoring.
//!
//! Matrices arrive as JSON CSR (`shape`, `indptr`, `indices`, `data`).
//! Rows are sorted by column on load so dot products can merge indices.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::{RecError, RecResult};

/// On-disk CSR layout.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CsrArtifact {
    pub shape: [usize; 2],
    pub indptr: Vec<usize>,
    pub indices: Vec<usize>,
    pub data: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CsrMatrix {
    rows: usize,
    cols: usize,
    indptr: Vec<usize>,
    indices: Vec<usize>,
    data: Vec<f64>,
}

/// Borrowed view of one matrix row.
#[derive(Debug, Clone, Copy)]
pub struct SparseRow<'a> {
    pub indices: &'a [usize],
    pub values: &'a [f64],
}

/// Owned sparse vector, indices strictly increasing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SparseVector {
    pub dim: usize,
    pub indices: Vec<usize>,
    pub values: Vec<f64>,
}

impl CsrMatrix {
    /// Validate an artifact and build a matrix with column-sorted rows;
    /// duplicate column entries within a row are summed.
    pub fn from_artifact(name: &'static str, raw: CsrArtifact) -> RecResult<Self> {
        let [rows, cols] = raw.shape;
        let expected = rows
            .checked_add(1)
            .ok_or_else(|| RecError::invalid(name, format!("row count {} out of range", rows)))?;
        if raw.indptr.len() != expected {
            return Err(RecError::invalid(
                name,
                format!("indptr has {} entries, expected {}", raw.indptr.len(), expected),
            ));
        }
        if raw.indices.len() != raw.data.len() {
            return Err(RecError::invalid(
                name,
                format!("{} indices but {} values", raw.indices.len(), raw.data.len()),
            ));
        }
        if raw.indptr.first().copied() != Some(0) {
            return Err(RecError::invalid(name, "indptr must start at 0"));
        }
        if raw.indptr.windows(2).any(|w| w[0] > w[1]) {
            return Err(RecError::invalid(name, "indptr is not non-decreasing"));
        }
        if raw.indptr[rows] != raw.indices.len() {
            return Err(RecError::invalid(
                name,
                format!("indptr ends at {} but {} entries stored", raw.indptr[rows], raw.indices.len()),
            ));
        }
        if let Some(bad) = raw.indices.iter().find(|&&c| c >= cols) {
            return Err(RecError::invalid(name, format!("column index {} out of bounds ({} columns)", bad, cols)));
        }

        // Canonical rows: sorted columns, duplicate entries summed.
        let mut indptr = Vec::with_capacity(expected);
        let mut indices = Vec::with_capacity(raw.indices.len());
        let mut data = Vec::with_capacity(raw.data.len());
        indptr.push(0);
        for w in raw.indptr.windows(2) {
            let pairs = raw.indices[w[0]..w[1]]
                .iter()
                .copied()
                .zip(raw.data[w[0]..w[1]].iter().copied())
                .collect();
            let row = SparseVector::from_pairs(cols, pairs);
            indices.extend(row.indices);
            data.extend(row.values);
            indptr.push(indices.len());
        }

        Ok(Self {
            rows,
            cols,
            indptr,
            indices,
            data,
        })
    }

    /// Build from dense rows, dropping zeros. Mostly for fixtures.
    pub fn from_dense(rows: &[Vec<f64>], cols: usize) -> Self {
        let mut indptr = Vec::with_capacity(rows.len() + 1);
        let mut indices = Vec::new();
        let mut data = Vec::new();
        indptr.push(0);
        for row in rows {
            for (c, &v) in row.iter().enumerate().take(cols) {
                if v != 0.0 {
                    indices.push(c);
                    data.push(v);
                }
            }
            indptr.push(indices.len());
        }
        Self {
            rows: rows.len(),
            cols,
            indptr,
            indices,
            data,
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn nnz(&self) -> usize {
        self.data.len()
    }

    pub fn row(&self, i: usize) -> Option<SparseRow<'_>> {
        if i >= self.rows {
            return None;
        }
        let (start, end) = (self.indptr[i], self.indptr[i + 1]);
        Some(SparseRow {
            indices: &self.indices[start..end],
            values: &self.data[start..end],
        })
    }

    /// Column indices holding a nonzero value in row `i`.
    pub fn nonzero_columns(&self, i: usize) -> Vec<usize> {
        self.row(i)
            .map(|r| {
                r.indices
                    .iter()
                    .zip(r.values)
                    .filter(|(_, v)| **v != 0.0)
                    .map(|(c, _)| *c)
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Divide every row by its L2 norm. All-zero rows stay as they are.
    pub fn normalize_rows(&mut self) {
        for i in 0..self.rows {
            let (start, end) = (self.indptr[i], self.indptr[i + 1]);
            let norm = self.data[start..end].iter().map(|v| v * v).sum::<f64>().sqrt();
            if norm > 0.0 {
                for v in &mut self.data[start..end] {
                    *v /= norm;
                }
            }
        }
    }

    /// Dot product of `query` with every row. With L2-normalized inputs this
    /// is the cosine similarity.
    pub fn dot_all(&self, query: SparseRow<'_>) -> Vec<f64> {
        (0..self.rows)
            .into_par_iter()
            .map(|i| match self.row(i) {
                Some(row) => sparse_dot(query, row),
                None => 0.0,
            })
            .collect()
    }
}

impl From<&CsrMatrix> for CsrArtifact {
    fn from(m: &CsrMatrix) -> Self {
        Self {
            shape: [m.rows, m.cols],
            indptr: m.indptr.clone(),
            indices: m.indices.clone(),
            data: m.data.clone(),
        }
    }
}

impl SparseVector {
    /// Build from unsorted `(index, value)` pairs, summing duplicates.
    pub fn from_pairs(dim: usize, mut pairs: Vec<(usize, f64)>) -> Self {
        pairs.sort_by_key(|(i, _)| *i);
        let mut indices: Vec<usize> = Vec::with_capacity(pairs.len());
        let mut values: Vec<f64> = Vec::with_capacity(pairs.len());
        for (i, v) in pairs {
            if indices.last() == Some(&i) {
                if let Some(last) = values.last_mut() {
                    *last += v;
                }
            } else {
                indices.push(i);
                values.push(v);
            }
        }
        Self { dim, indices, values }
    }

    pub fn as_row(&self) -> SparseRow<'_> {
        SparseRow {
            indices: &self.indices,
            values: &self.values,
        }
    }

    pub fn norm(&self) -> f64 {
        self.values.iter().map(|v| v * v).sum::<f64>().sqrt()
    }

    pub fn normalize(&mut self) {
        let norm = self.norm();
        if norm > 0.0 {
            for v in &mut self.values {
                *v /= norm;
            }
        }
    }

    pub fn is_zero(&self) -> bool {
        self.values.iter().all(|v| *v == 0.0)
    }
}

/// Merge-join dot product over two column-sorted rows.
pub fn sparse_dot(a: SparseRow<'_>, b: SparseRow<'_>) -> f64 {
    let (mut i, mut j) = (0, 0);
    let mut acc = 0.0;
    while i < a.indices.len() && j < b.indices.len() {
        match a.indices[i].cmp(&b.indices[j]) {
            std::cmp::Ordering::Less => i += 1,
            std::cmp::Ordering::Greater => j += 1,
            std::cmp::Ordering::Equal => {
                acc += a.values[i] * b.values[j];
                i += 1;
                j += 1;
            }
        }
    }
    acc
}

/// Row indices ordered by descending score, ties by ascending index.
pub fn rank_descending(scores: &[f64]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..scores.len()).collect();
    order.sort_by(|&a, &b| scores[b].total_cmp(&scores[a]).then(a.cmp(&b)));
    order
}

#[cfg(test)]
mod tests {
    use super::*;

    fn artifact(shape: [usize; 2], indptr: Vec<usize>, indices: Vec<usize>, data: Vec<f64>) -> CsrArtifact {
        CsrArtifact { shape, indptr, indices, data }
    }

    #[test]
    fn test_from_artifact_sorts_rows() {
        let m = CsrMatrix::from_artifact(
            "t",
            artifact([1, 3], vec![0, 2], vec![2, 0], vec![5.0, 1.0]),
        )
        .unwrap();
        let row = m.row(0).unwrap();
        assert_eq!(row.indices, &[0, 2]);
        assert_eq!(row.values, &[1.0, 5.0]);
    }

    #[test]
    fn test_from_artifact_rejects_bad_layout() {
        assert!(CsrMatrix::from_artifact("t", artifact([2, 2], vec![0, 1], vec![0], vec![1.0])).is_err());
        assert!(CsrMatrix::from_artifact("t", artifact([1, 2], vec![0, 1], vec![5], vec![1.0])).is_err());
        assert!(CsrMatrix::from_artifact("t", artifact([1, 2], vec![0, 2], vec![0], vec![1.0])).is_err());
        assert!(CsrMatrix::from_artifact("t", artifact([1, 2], vec![0, 1], vec![0, 1], vec![1.0])).is_err());
    }

    #[test]
    fn test_normalize_rows_keeps_zero_rows() {
        let mut m = CsrMatrix::from_dense(&[vec![3.0, 4.0], vec![0.0, 0.0]], 2);
        m.normalize_rows();
        let r0 = m.row(0).unwrap();
        assert!((r0.values[0] - 0.6).abs() < 1e-12);
        assert!((r0.values[1] - 0.8).abs() < 1e-12);
        assert!(m.row(1).unwrap().values.is_empty());
    }

    #[test]
    fn test_dot_all_is_cosine_after_normalize() {
        let mut m = CsrMatrix::from_dense(
            &[vec![1.0, 1.0, 0.0], vec![1.0, 0.0, 0.0], vec![0.0, 0.0, 2.0]],
            3,
        );
        m.normalize_rows();
        let q = m.row(0).unwrap();
        let scores = m.dot_all(q);
        assert!((scores[0] - 1.0).abs() < 1e-9);
        assert!((scores[1] - std::f64::consts::FRAC_1_SQRT_2).abs() < 1e-9);
        assert_eq!(scores[2], 0.0);
    }

    #[test]
    fn test_rank_descending_ties_by_index() {
        let order = rank_descending(&[0.5, 0.9, 0.5, 0.1]);
        assert_eq!(order, vec![1, 0, 2, 3]);
    }

    #[test]
    fn test_sparse_vector_sums_duplicates() {
        let mut v = SparseVector::from_pairs(4, vec![(3, 1.0), (1, 2.0), (3, 1.0)]);
        assert_eq!(v.indices, vec![1, 3]);
        assert_eq!(v.values, vec![2.0, 2.0]);
        v.normalize();
        assert!((v.norm() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_nonzero_columns_skips_explicit_zeros() {
        let m = CsrMatrix::from_artifact(
            "ui",
            artifact([1, 4], vec![0, 3], vec![0, 2, 3], vec![1.0, 0.0, 2.0]),
        )
        .unwrap();
        assert_eq!(m.nonzero_columns(0), vec![0, 3]);
        assert!(m.nonzero_columns(7).is_empty());
    }

    #[test]
    fn test_from_artifact_sums_duplicate_columns() {
        let m = CsrMatrix::from_artifact(
            "t",
            artifact([2, 3], vec![0, 3, 4], vec![2, 0, 2, 1], vec![1.0, 1.0, 3.0, 2.0]),
        )
        .unwrap();
        let row = m.row(0).unwrap();
        assert_eq!(row.indices, &[0, 2]);
        assert_eq!(row.values, &[1.0, 4.0]);
        assert_eq!(m.row(1).unwrap().indices, &[1]);
        assert_eq!(m.nnz(), 3);

        // merge-join sees the summed entry once
        let q = SparseVector::from_pairs(3, vec![(2, 1.0)]);
        assert_eq!(sparse_dot(q.as_row(), m.row(0).unwrap()), 4.0);
    }

    #[test]
    fn test_from_artifact_rejects_overflowing_shape() {
        let err = CsrMatrix::from_artifact("t", artifact([usize::MAX, 2], vec![0], vec![], vec![]));
        assert!(err.is_err());
    }
}
