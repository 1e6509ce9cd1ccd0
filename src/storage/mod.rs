pub mod catalog;
pub mod interactions;
pub mod models;
pub mod path_utils;
pub mod popularity;

use std::path::Path;

use crate::error::RecResult;

/// Load an optional artifact. Absent files are not an error; unreadable or
/// malformed ones are logged and treated as absent.
pub fn load_optional<T>(
    artifact: &'static str,
    path: &Path,
    load: impl FnOnce(&Path) -> RecResult<T>,
) -> Option<T> {
    if !path.exists() {
        tracing::debug!(artifact = artifact, path = %path.display(), "Artifact absent");
        return None;
    }
    match load(path) {
        Ok(value) => {
            tracing::debug!(artifact = artifact, path = %path.display(), "Artifact loaded");
            Some(value)
        }
        Err(e) => {
            tracing::warn!(
                artifact = artifact,
                path = %path.display(),
                error = %e,
                "Artifact unreadable, treating as absent"
            );
            None
        }
    }
}
