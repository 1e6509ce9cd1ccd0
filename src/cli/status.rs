use anyhow::Result;
use product_recs::config::ServiceConfig;
use product_recs::storage::path_utils;
use product_recs::RecommendationEngine;

pub fn run(config: &ServiceConfig, json: bool) -> Result<()> {
    let status = RecommendationEngine::init_global(&config.artifact_paths()).status();

    if json {
        println!("{}", serde_json::to_string_pretty(&status)?);
        return Ok(());
    }

    let yes_no = |b: bool| if b { "loaded" } else { "absent" };

    println!("Product Recs Status");
    println!("===================");
    println!("Config:     {}", path_utils::config_path().display());
    println!("Data dir:   {}", config.data_dir.display());
    println!("Models dir: {}", config.models_dir.display());
    println!();
    println!("Artifacts:");
    match status.catalog_products {
        Some(n) => println!("  Catalog:      {:>6} products", n),
        None => println!("  Catalog:      absent"),
    }
    println!("  Popularity:   {}", status.popularity);
    println!("  TF-IDF:       {}", yes_no(status.tfidf));
    println!("  Vectorizer:   {}", yes_no(status.vectorizer));
    match status.interaction_users {
        Some(n) => println!("  Interactions: {:>6} users", n),
        None => println!("  Interactions: absent"),
    }
    println!();
    println!("API bind:   {}", config.api.bind);
    println!("Bot bind:   {}", config.bot.bind);
    println!("Bot → API:  {}", config.bot.api_base);

    Ok(())
}
