mod cli;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use product_recs::constants::{DEFAULT_RECOMMEND_K, DEFAULT_SEARCH_K, DEFAULT_SIMILAR_K};
use product_recs::product::{ProductId, UserId};

#[derive(Parser)]
#[command(name = "product-recs", version, about = "Product Recs — recommendations, similar items and search")]
struct App {
    /// Directory holding products.csv (overrides config and environment)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,
    /// Directory holding the model artifacts (overrides config and environment)
    #[arg(long, global = true)]
    models_dir: Option<PathBuf>,
    /// Print JSON instead of a table
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the recommendation HTTP API
    Serve {
        /// Bind address (defaults to config api.bind)
        #[arg(long)]
        bind: Option<String>,
    },
    /// Run the chat bot endpoint
    Bot {
        /// Bind address (defaults to config bot.bind)
        #[arg(long)]
        bind: Option<String>,
        /// Base URL of the recommendation API
        #[arg(long)]
        api_base: Option<String>,
    },
    /// Send one message to the chat bot and print the reply
    Chat {
        message: String,
        #[arg(long)]
        user_id: Option<UserId>,
        /// Base URL of the recommendation API
        #[arg(long)]
        api_base: Option<String>,
    },
    /// Show one product
    Product { id: ProductId },
    /// Recommend products for a user
    Recommend {
        user_id: UserId,
        #[arg(short, long, default_value_t = DEFAULT_RECOMMEND_K)]
        k: usize,
    },
    /// Products similar to a given product
    Similar {
        product_id: ProductId,
        #[arg(short, long, default_value_t = DEFAULT_SIMILAR_K)]
        k: usize,
    },
    /// Free-text product search
    Search {
        query: String,
        #[arg(short, long, default_value_t = DEFAULT_SEARCH_K)]
        k: usize,
    },
    /// Show which artifacts are loaded
    Status,
}

fn main() {
    let app = App::parse();
    let mut config = cli::resolve_config(app.data_dir.as_deref(), app.models_dir.as_deref());
    product_recs::tracing_init::init_tracing(config.log_file.as_deref());

    let result = match app.command {
        Commands::Serve { bind } => {
            if let Some(bind) = bind {
                config.api.bind = bind;
            }
            cli::serve::api(&config)
        }
        Commands::Bot { bind, api_base } => {
            if let Some(bind) = bind {
                config.bot.bind = bind;
            }
            if let Some(base) = api_base {
                config.bot.api_base = base;
            }
            cli::serve::bot(&config)
        }
        Commands::Chat { message, user_id, api_base } => {
            if let Some(base) = api_base {
                config.bot.api_base = base;
            }
            cli::chat::run(&config, &message, user_id)
        }
        Commands::Product { id } => cli::query::product(&config, id, app.json),
        Commands::Recommend { user_id, k } => cli::query::recommend(&config, user_id, k, app.json),
        Commands::Similar { product_id, k } => cli::query::similar(&config, product_id, k, app.json),
        Commands::Search { query, k } => cli::query::search(&config, &query, k, app.json),
        Commands::Status => cli::status::run(&config, app.json),
    };

    if let Err(e) = result {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
