//! Local engine queries: the artifacts are loaded in-process, no server needed.

use anyhow::{bail, Context, Result};
use product_recs::config::ServiceConfig;
use product_recs::product::{ProductId, UserId};
use product_recs::RecommendationEngine;

use super::print_products;

fn engine(config: &ServiceConfig) -> &'static RecommendationEngine {
    RecommendationEngine::init_global(&config.artifact_paths())
}

pub fn product(config: &ServiceConfig, product_id: ProductId, json: bool) -> Result<()> {
    let p = engine(config)
        .get_product(product_id)
        .with_context(|| format!("Lookup of product {} failed", product_id))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&p)?);
        return Ok(());
    }

    println!("Product {}", p.product_id);
    println!("  Title:       {}", p.title.as_deref().unwrap_or("-"));
    println!("  Category:    {}", p.category.as_deref().unwrap_or("-"));
    println!("  Tags:        {}", p.tags.as_deref().unwrap_or("-"));
    println!("  Price:       {}", super::price_cell(p.price));
    if let Some(d) = p.description.as_deref() {
        println!("  Description: {}", d);
    }
    for (column, value) in &p.extra {
        match value.as_str() {
            Some(v) => println!("  {}: {}", column, v),
            None => println!("  {}: {}", column, value),
        }
    }
    Ok(())
}

pub fn recommend(config: &ServiceConfig, user_id: UserId, k: usize, json: bool) -> Result<()> {
    let items = engine(config)
        .recommend_for_user(user_id, k)
        .context("Recommendation failed")?;
    print_products(&items, json)
}

pub fn similar(config: &ServiceConfig, product_id: ProductId, k: usize, json: bool) -> Result<()> {
    let items = engine(config)
        .similar_items(product_id, k)
        .context("Similarity query failed")?;
    print_products(&items, json)
}

pub fn search(config: &ServiceConfig, query: &str, k: usize, json: bool) -> Result<()> {
    if query.is_empty() {
        bail!("Search query must not be empty");
    }
    let items = engine(config)
        .search_products(query, k)
        .context("Search failed")?;
    print_products(&items, json)
}
