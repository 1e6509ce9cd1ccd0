//! Catalog loader — `products.csv`.
//!
//! Known columns map onto [`Product`] fields; every other column is kept in
//! `Product::extra`. Only a row without a usable `product_id` is dropped, and
//! a dropped row breaks id contiguity, which in turn disables the matrix
//! artifacts.

use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;

use serde_json::Value;

use crate::error::{RecError, RecResult};
use crate::product::{Catalog, Product, ProductId};

const KNOWN_COLUMNS: [&str; 6] = ["product_id", "title", "category", "tags", "description", "price"];

pub fn load_catalog(path: &Path) -> RecResult<Catalog> {
    let file = std::fs::File::open(path)?;
    read_catalog(file)
}

pub fn read_catalog<R: Read>(reader: R) -> RecResult<Catalog> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::Headers)
        .from_reader(reader);

    let headers = rdr.headers()?.clone();
    let column = |name: &str| headers.iter().position(|h| h == name);
    let Some(id_col) = column("product_id") else {
        return Err(RecError::invalid("catalog", "missing product_id column"));
    };
    let (title_col, category_col, tags_col, description_col, price_col) = (
        column("title"),
        column("category"),
        column("tags"),
        column("description"),
        column("price"),
    );
    let extra_cols: Vec<(usize, &str)> = headers
        .iter()
        .enumerate()
        .filter(|(_, h)| !KNOWN_COLUMNS.contains(h))
        .collect();

    let mut products = Vec::new();
    for (line, record) in rdr.records().enumerate() {
        let row = line + 1;
        let record = match record {
            Ok(r) => r,
            Err(e) => {
                tracing::warn!(row = row, error = %e, "Skipping unreadable catalog row, matrix artifacts will be disabled");
                continue;
            }
        };
        let cell = |col: Option<usize>| col.and_then(|c| record.get(c)).filter(|v| !v.is_empty());

        let product_id = match cell(Some(id_col)).map(|v| v.trim().parse::<ProductId>()) {
            Some(Ok(id)) => id,
            _ => {
                tracing::warn!(
                    row = row,
                    value = record.get(id_col).unwrap_or_default(),
                    "Skipping catalog row without a valid product_id, matrix artifacts will be disabled"
                );
                continue;
            }
        };

        let price = cell(price_col).and_then(|v| match v.trim().parse::<f64>() {
            Ok(p) => Some(p),
            Err(_) => {
                tracing::warn!(product_id = product_id, value = v, "Unparseable price, treated as missing");
                None
            }
        });

        let extra: BTreeMap<String, Value> = extra_cols
            .iter()
            .map(|&(c, name)| {
                let value = cell(Some(c)).map_or(Value::Null, |v| Value::String(v.to_string()));
                (name.to_string(), value)
            })
            .collect();

        products.push(Product {
            product_id,
            title: cell(title_col).map(str::to_string),
            category: cell(category_col).map(str::to_string),
            tags: cell(tags_col).map(str::to_string),
            description: cell(description_col).map(str::to_string),
            price,
            extra,
        });
    }
    Ok(Catalog::new(products))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_catalog_with_missing_fields() {
        let csv = "product_id,title,category,tags,description,price\n\
                   1,Shirt,red,cotton summer,A shirt,19.9\n\
                   2,Shoe,,,,45\n";
        let catalog = read_catalog(csv.as_bytes()).unwrap();
        assert_eq!(catalog.len(), 2);
        let shoe = catalog.get(2).unwrap();
        assert_eq!(shoe.title.as_deref(), Some("Shoe"));
        assert!(shoe.category.is_none());
        assert!(shoe.description.is_none());
        assert_eq!(shoe.price, Some(45.0));
        assert!(shoe.extra.is_empty());
    }

    #[test]
    fn test_extra_columns_are_kept() {
        let csv = "product_id,title,category,tags,description,price,brand,stock\n\
                   1,Shirt,red,,,19.9,acme,\n";
        let catalog = read_catalog(csv.as_bytes()).unwrap();
        let shirt = catalog.get(1).unwrap();
        assert_eq!(shirt.extra.get("brand"), Some(&Value::String("acme".to_string())));
        assert_eq!(shirt.extra.get("stock"), Some(&Value::Null));

        let json = serde_json::to_value(shirt).unwrap();
        assert_eq!(json["brand"], "acme");
        assert!(json["stock"].is_null());
        assert!(json["tags"].is_null());
    }

    #[test]
    fn test_empty_price_keeps_row() {
        let csv = "product_id,title,category,tags,description,price\n\
                   1,Shirt,,,,19.9\n\
                   2,Shoe,,,,\n\
                   3,Hat,,,,not-a-price\n";
        let catalog = read_catalog(csv.as_bytes()).unwrap();
        assert_eq!(catalog.len(), 3);
        assert_eq!(catalog.get(2).unwrap().price, None);
        assert_eq!(catalog.get(3).unwrap().price, None);
        assert!(catalog.index().is_contiguous());
    }

    #[test]
    fn test_read_catalog_skips_rows_without_id() {
        let csv = "product_id,title,category,tags,description,price\n\
                   1,Shirt,red,,,19.9\n\
                   x,Shoe,,,,10\n\
                   3,Hat,,,,5\n";
        let catalog = read_catalog(csv.as_bytes()).unwrap();
        assert_eq!(catalog.len(), 2);
        assert!(catalog.get(3).is_some());
        assert!(!catalog.index().is_contiguous());
    }

    #[test]
    fn test_missing_id_column_is_an_error() {
        let csv = "title,price\nShirt,1\n";
        assert!(read_catalog(csv.as_bytes()).is_err());
    }
}
