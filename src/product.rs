//! Product records and the in-memory catalog.
//!
//! The catalog order is the row order of every matrix artifact. The
//! `ProductIndex` makes that mapping explicit instead of relying on
//! `product_id - 1` arithmetic at every call site.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

pub type ProductId = u32;
pub type UserId = i64;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub product_id: ProductId,
    pub title: Option<String>,
    pub category: Option<String>,
    pub tags: Option<String>,
    pub description: Option<String>,
    /// None when the catalog cell is empty or not a number.
    pub price: Option<f64>,
    /// Any further catalog columns, as read. Empty cells are null.
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl Product {
    /// Text fields searched by the substring fallback, in match order.
    pub fn text_fields(&self) -> [Option<&str>; 4] {
        [
            self.title.as_deref(),
            self.category.as_deref(),
            self.tags.as_deref(),
            self.description.as_deref(),
        ]
    }

    /// Case-insensitive literal substring match on any text field.
    /// `needle_lower` must already be lowercased.
    pub fn matches_lowercase(&self, needle_lower: &str) -> bool {
        self.text_fields()
            .into_iter()
            .flatten()
            .any(|field| field.to_lowercase().contains(needle_lower))
    }
}

/// Ordered product catalog with an id -> position index.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    products: Vec<Product>,
    index: ProductIndex,
}

impl Catalog {
    pub fn new(products: Vec<Product>) -> Self {
        let index = ProductIndex::build(&products);
        Self { products, index }
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn get(&self, product_id: ProductId) -> Option<&Product> {
        self.index
            .position(product_id)
            .and_then(|pos| self.products.get(pos))
    }

    pub fn index(&self) -> &ProductIndex {
        &self.index
    }

    /// Product stored at catalog row `pos`.
    pub fn at(&self, pos: usize) -> Option<&Product> {
        self.products.get(pos)
    }
}

/// Explicit product_id <-> catalog row mapping.
#[derive(Debug, Clone, Default)]
pub struct ProductIndex {
    positions: HashMap<ProductId, usize>,
    /// True when row `i` holds `product_id == i + 1` for every row.
    contiguous: bool,
}

impl ProductIndex {
    pub fn build(products: &[Product]) -> Self {
        let mut positions = HashMap::with_capacity(products.len());
        let mut contiguous = true;
        for (pos, p) in products.iter().enumerate() {
            if p.product_id as usize != pos + 1 {
                contiguous = false;
            }
            if positions.insert(p.product_id, pos).is_some() {
                tracing::warn!(product_id = p.product_id, row = pos, "Duplicate product_id in catalog, keeping first row");
                contiguous = false;
            }
        }
        // Re-insert to keep the first occurrence for duplicates.
        for (pos, p) in products.iter().enumerate().rev() {
            positions.insert(p.product_id, pos);
        }
        Self { positions, contiguous }
    }

    pub fn position(&self, product_id: ProductId) -> Option<usize> {
        self.positions.get(&product_id).copied()
    }

    /// Whether matrix rows/columns can be addressed through this catalog.
    pub fn is_contiguous(&self) -> bool {
        self.contiguous
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::ProductBuilder;

    #[test]
    fn test_lookup_by_id() {
        let catalog = Catalog::new(vec![
            ProductBuilder::new(1).title("Shirt").build(),
            ProductBuilder::new(2).title("Shoe").build(),
        ]);
        assert_eq!(catalog.get(2).and_then(|p| p.title.as_deref()), Some("Shoe"));
        assert!(catalog.get(3).is_none());
        assert!(catalog.index().is_contiguous());
    }

    #[test]
    fn test_non_contiguous_ids_flagged() {
        let catalog = Catalog::new(vec![
            ProductBuilder::new(1).build(),
            ProductBuilder::new(5).build(),
        ]);
        assert!(!catalog.index().is_contiguous());
        assert_eq!(catalog.index().position(5), Some(1));
    }

    #[test]
    fn test_duplicate_ids_keep_first_row() {
        let catalog = Catalog::new(vec![
            ProductBuilder::new(1).title("first").build(),
            ProductBuilder::new(1).title("second").build(),
        ]);
        assert_eq!(catalog.get(1).and_then(|p| p.title.as_deref()), Some("first"));
        assert!(!catalog.index().is_contiguous());
    }

    #[test]
    fn test_matches_ignores_missing_fields() {
        let p = ProductBuilder::new(1).title("Linen Shirt").category("red").build();
        assert!(p.matches_lowercase("red"));
        assert!(p.matches_lowercase("linen"));
        assert!(!p.matches_lowercase("blue"));

        let bare = Product {
            product_id: 2,
            title: None,
            category: None,
            tags: None,
            description: None,
            price: None,
            extra: BTreeMap::new(),
        };
        assert!(!bare.matches_lowercase("x"));
    }

    #[test]
    fn test_extra_columns_serialize_flat() {
        let mut p = ProductBuilder::new(1).title("Shirt").price(19.9).build();
        p.extra.insert("brand".to_string(), serde_json::json!("acme"));
        p.extra.insert("color".to_string(), serde_json::Value::Null);

        let json = serde_json::to_value(&p).unwrap();
        assert_eq!(json["brand"], "acme");
        assert!(json["color"].is_null());
        assert_eq!(json["price"], 19.9);

        let back: Product = serde_json::from_value(json).unwrap();
        assert_eq!(back, p);
    }
}
