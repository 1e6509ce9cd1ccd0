//! Shared test utilities — product builder, catalogs, model fixtures.
//!
//! Available only under `#[cfg(test)]`.

use std::collections::HashMap;
use std::path::Path;

use crate::processing::sparse::CsrArtifact;
use crate::processing::{CsrMatrix, TfidfVectorizer};
use crate::product::{Catalog, Product, ProductId};
use crate::storage::path_utils::ArtifactPaths;

// ============================================================================
// ProductBuilder
// ============================================================================

pub struct ProductBuilder {
    product: Product,
}

impl ProductBuilder {
    pub fn new(product_id: ProductId) -> Self {
        Self {
            product: Product {
                product_id,
                title: Some(format!("Product {}", product_id)),
                category: None,
                tags: None,
                description: None,
                price: Some(10.0),
                extra: Default::default(),
            },
        }
    }

    pub fn title(mut self, t: &str) -> Self {
        self.product.title = Some(t.to_string());
        self
    }

    pub fn category(mut self, c: &str) -> Self {
        self.product.category = Some(c.to_string());
        self
    }

    pub fn tags(mut self, t: &str) -> Self {
        self.product.tags = Some(t.to_string());
        self
    }

    pub fn description(mut self, d: &str) -> Self {
        self.product.description = Some(d.to_string());
        self
    }

    pub fn price(mut self, p: f64) -> Self {
        self.product.price = Some(p);
        self
    }

    pub fn extra(mut self, column: &str, value: &str) -> Self {
        self.product
            .extra
            .insert(column.to_string(), serde_json::Value::String(value.to_string()));
        self
    }

    pub fn build(self) -> Product {
        self.product
    }
}

// ============================================================================
// Catalogs
// ============================================================================

/// Shirt / Shoe / Hat.
pub fn sample_catalog() -> Catalog {
    Catalog::new(vec![
        ProductBuilder::new(1).title("Shirt").category("tops").price(20.0).build(),
        ProductBuilder::new(2).title("Shoe").category("shoes").price(55.0).build(),
        ProductBuilder::new(3).title("Hat").category("accessories").price(12.5).build(),
    ])
}

/// Six clothing products with enough text overlap to rank.
pub fn clothing_catalog() -> Catalog {
    Catalog::new(vec![
        ProductBuilder::new(1)
            .title("Red Cotton Shirt")
            .category("shirts")
            .tags("red,cotton")
            .description("Classic crew neck shirt")
            .price(19.9)
            .build(),
        ProductBuilder::new(2)
            .title("Red Linen Shirt")
            .category("shirts")
            .tags("red,linen,summer")
            .description("Breathable shirt for warm days")
            .price(29.9)
            .build(),
        ProductBuilder::new(3)
            .title("Blue Cotton Pants")
            .category("pants")
            .tags("blue,cotton")
            .description("Straight fit pants")
            .price(39.0)
            .build(),
        ProductBuilder::new(4)
            .title("Leather Boots")
            .category("shoes")
            .tags("leather,boots,winter")
            .description("Sturdy boots for the cold")
            .price(89.0)
            .build(),
        ProductBuilder::new(5)
            .title("Wool Hat")
            .category("accessories")
            .tags("wool,winter")
            .price(15.0)
            .build(),
        ProductBuilder::new(6)
            .title("Canvas Sneakers")
            .category("shoes")
            .tags("canvas")
            .description("Light everyday sneakers")
            .price(49.0)
            .build(),
    ])
}

// ============================================================================
// Models
// ============================================================================

/// Vectorizer over the clothing titles; "red" carries a higher idf.
pub fn clothing_vectorizer() -> TfidfVectorizer {
    let terms = [
        "red", "cotton", "shirt", "linen", "blue", "pants", "leather", "boots", "wool", "hat",
        "canvas", "sneakers", "shoes",
    ];
    let vocabulary: HashMap<String, usize> = terms
        .iter()
        .enumerate()
        .map(|(i, t)| (t.to_string(), i))
        .collect();
    let mut idf = vec![1.0; terms.len()];
    idf[0] = 1.5;
    TfidfVectorizer {
        vocabulary,
        idf,
        lowercase: true,
        ngram_range: (1, 1),
        sublinear_tf: false,
        stop_words: None,
    }
}

/// L2-normalized TF-IDF rows of the clothing titles, row i = product i + 1.
pub fn clothing_tfidf() -> CsrMatrix {
    let vectorizer = clothing_vectorizer();
    let dim = vectorizer.dim();
    let rows: Vec<Vec<f64>> = clothing_catalog()
        .products()
        .iter()
        .map(|p| {
            let v = vectorizer.transform(p.title.as_deref().unwrap_or_default());
            let mut dense = vec![0.0; dim];
            for (i, val) in v.indices.iter().zip(&v.values) {
                dense[*i] = *val;
            }
            dense
        })
        .collect();
    let mut m = CsrMatrix::from_dense(&rows, dim);
    m.normalize_rows();
    m
}

/// Write the clothing fixture set under `root/data` and `root/models`.
/// Users: 500 consumed product 1; 501 consumed products 5 and 6.
pub fn write_artifacts(root: &Path) -> ArtifactPaths {
    let data_dir = root.join("data");
    let models_dir = root.join("models");
    std::fs::create_dir_all(&data_dir).unwrap();
    std::fs::create_dir_all(&models_dir).unwrap();
    let paths = ArtifactPaths::new(&data_dir, &models_dir);

    let mut wtr = csv::Writer::from_path(&paths.catalog).unwrap();
    wtr.write_record(["product_id", "title", "category", "tags", "description", "price"])
        .unwrap();
    for p in clothing_catalog().products() {
        let price = p.price.map(|v| v.to_string()).unwrap_or_default();
        wtr.write_record([
            p.product_id.to_string().as_str(),
            p.title.as_deref().unwrap_or_default(),
            p.category.as_deref().unwrap_or_default(),
            p.tags.as_deref().unwrap_or_default(),
            p.description.as_deref().unwrap_or_default(),
            price.as_str(),
        ])
        .unwrap();
    }
    wtr.flush().unwrap();

    std::fs::write(
        &paths.popularity,
        "product_id,score\n6,40\n5,35\n1,30\n2,20\n3,10\n4,5\n",
    )
    .unwrap();
    std::fs::write(&paths.user_ids, "user_id\n500\n501\n").unwrap();

    let n = clothing_catalog().len();
    let mut u500 = vec![0.0; n];
    u500[0] = 1.0;
    let mut u501 = vec![0.0; n];
    u501[4] = 2.0;
    u501[5] = 1.0;
    let ui = CsrMatrix::from_dense(&[u500, u501], n);
    std::fs::write(
        &paths.user_item,
        serde_json::to_string(&CsrArtifact::from(&ui)).unwrap(),
    )
    .unwrap();

    std::fs::write(
        &paths.tfidf,
        serde_json::to_string(&CsrArtifact::from(&clothing_tfidf())).unwrap(),
    )
    .unwrap();
    std::fs::write(
        &paths.vectorizer,
        serde_json::to_string(&clothing_vectorizer()).unwrap(),
    )
    .unwrap();

    paths
}
