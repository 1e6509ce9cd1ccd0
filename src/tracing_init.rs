//! Shared tracing initialization for the API server, chat bot and CLI.
//!
//! Logs go to stderr unless a log file is configured, in which case they are
//! appended to it so several processes can share one file.

use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Initialize tracing. `RUST_LOG` overrides the default `info` level.
pub fn init_tracing(log_file: Option<&Path>) {
    if let Some(path) = log_file {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).ok();
        }
        // Append mode: short writes from several processes stay whole.
        match std::fs::OpenOptions::new().create(true).append(true).open(path) {
            Ok(file) => {
                tracing_subscriber::fmt()
                    .with_env_filter(env_filter())
                    .with_writer(Mutex::new(file))
                    .with_target(true)
                    .with_ansi(false)
                    .init();
                return;
            }
            Err(e) => {
                eprintln!("[product-recs] Cannot open log file {}: {} (logging to stderr)", path.display(), e);
            }
        }
    }

    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(std::io::stderr)
        .with_target(true)
        .init();
}
