pub mod sparse;
pub mod vectorizer;

pub use sparse::{CsrMatrix, SparseVector};
pub use vectorizer::TfidfVectorizer;
