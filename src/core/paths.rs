//! Platform directories for the log file.

use std::path::PathBuf;

use crate::core::app;

fn project_dirs() -> Option<directories::ProjectDirs> {
    directories::ProjectDirs::from("io", app::VENDOR, app::NAME)
}

/// Cache directory (~/.cache/doc-assistant/).
pub fn cache_dir() -> Option<PathBuf> {
    project_dirs().map(|d| d.cache_dir().to_path_buf())
}

/// Log file used while the terminal shows a live answer preview.
pub fn log_file() -> Option<PathBuf> {
    cache_dir().map(|d| d.join(format!("{}.log", app::NAME)))
}
