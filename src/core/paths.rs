//! Centralized path helpers for config, cache, and data directories.

use std::path::PathBuf;

use crate::core::app;

/// Project directories (config, cache, data) from the standard platform locations.
pub fn project_dirs() -> Option<directories::ProjectDirs> {
    directories::ProjectDirs::from("io", app::VENDOR, app::NAME)
}

/// Override config dir for tests via env var.
#[cfg(test)]
fn test_config_dir_override() -> Option<PathBuf> {
    std::env::var("TEST_CONFIG_DIR").ok().map(PathBuf::from)
}

/// Config directory (~/.config/quizmaster/).
/// In tests, set `TEST_CONFIG_DIR` env var to override.
pub fn config_dir() -> Option<PathBuf> {
    #[cfg(test)]
    if let Some(p) = test_config_dir_override() {
        return Some(p);
    }
    project_dirs().map(|d| d.config_dir().to_path_buf())
}

/// Cache directory (~/.cache/quizmaster/).
pub fn cache_dir() -> Option<PathBuf> {
    project_dirs().map(|d| d.cache_dir().to_path_buf())
}

/// Data directory for quiz results (~/.local/share/quizmaster/results/).
pub fn data_dir() -> Option<PathBuf> {
    project_dirs().map(|d| d.data_dir().join("results"))
}

/// Serializes tests that point `TEST_CONFIG_DIR` at a temp directory.
#[cfg(test)]
pub static TEST_ENV_LOCK: std::sync::Mutex<()> = std::sync::Mutex::new(());
