//! Content loaders for reading game data from files.
//!
//! Each loader offers `load(path)` for files on disk and `from_str` for
//! embedded or in-memory text. Failures carry the offending path.

pub mod config;
pub mod tables;

pub use config::ConfigLoader;
pub use tables::TablesLoader;

use std::path::Path;

use anyhow::Context;

/// Common result type for loaders.
pub type LoadResult<T> = anyhow::Result<T>;

/// Helper function to read file contents.
pub(crate) fn read_file(path: &Path) -> LoadResult<String> {
    std::fs::read_to_string(path).with_context(|| format!("Failed to read file {}", path.display()))
}
