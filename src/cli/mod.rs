pub mod chat;
pub mod query;
pub mod serve;
pub mod status;

use std::path::Path;

use anyhow::{Context, Result};
use product_recs::config::ServiceConfig;
use product_recs::constants::truncate_safe;
use product_recs::product::Product;

/// Resolve configuration: file → environment → CLI flags.
pub fn resolve_config(data_dir: Option<&Path>, models_dir: Option<&Path>) -> ServiceConfig {
    let mut config = ServiceConfig::load();
    if let Some(dir) = data_dir {
        config.data_dir = dir.to_path_buf();
    }
    if let Some(dir) = models_dir {
        config.models_dir = dir.to_path_buf();
    }
    config
}

/// Print products as pretty JSON or as a fixed-width table.
pub fn print_products(products: &[Product], json: bool) -> Result<()> {
    if json {
        let out = serde_json::to_string_pretty(products).context("Failed to serialize products")?;
        println!("{}", out);
        return Ok(());
    }

    if products.is_empty() {
        println!("No products.");
        return Ok(());
    }

    println!("{:>6}  {:<32}  {:<16}  {:>10}", "ID", "TITLE", "CATEGORY", "PRICE");
    println!("{}", "-".repeat(70));
    for p in products {
        println!(
            "{:>6}  {:<32}  {:<16}  {:>10}",
            p.product_id,
            ellipsize(p.title.as_deref().unwrap_or("-"), 32),
            ellipsize(p.category.as_deref().unwrap_or("-"), 16),
            price_cell(p.price),
        );
    }
    println!("\n{} product(s)", products.len());
    Ok(())
}

pub fn price_cell(price: Option<f64>) -> String {
    price.map_or_else(|| "-".to_string(), |v| format!("{:.2}", v))
}

fn ellipsize(s: &str, width: usize) -> String {
    if s.chars().count() > width {
        format!("{}...", truncate_safe(s, width - 3))
    } else {
        s.to_string()
    }
}
