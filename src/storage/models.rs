//! JSON model artifacts — CSR matrices and the fitted vectorizer.

use std::io::BufReader;
use std::path::Path;

use crate::error::RecResult;
use crate::processing::sparse::CsrArtifact;
use crate::processing::{CsrMatrix, TfidfVectorizer};

/// Load a CSR matrix, validating its layout.
pub fn load_csr(name: &'static str, path: &Path) -> RecResult<CsrMatrix> {
    let file = std::fs::File::open(path)?;
    let raw: CsrArtifact = serde_json::from_reader(BufReader::new(file))?;
    CsrMatrix::from_artifact(name, raw)
}

/// Product TF-IDF matrix, L2-row-normalized right after load.
pub fn load_tfidf(path: &Path) -> RecResult<CsrMatrix> {
    let mut m = load_csr("product_tfidf", path)?;
    m.normalize_rows();
    tracing::debug!(rows = m.rows(), cols = m.cols(), nnz = m.nnz(), "TF-IDF matrix normalized");
    Ok(m)
}

pub fn load_vectorizer(path: &Path) -> RecResult<TfidfVectorizer> {
    let file = std::fs::File::open(path)?;
    let vec: TfidfVectorizer = serde_json::from_reader(BufReader::new(file))?;
    vec.validate()?;
    Ok(vec)
}
