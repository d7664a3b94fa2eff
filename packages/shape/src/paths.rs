//! Default file locations.
//!
//! Paths are relative to the site root the tool is run from: raw exports
//! live under `data/`, generated files under `static/data/` where the site
//! build picks them up.

use std::path::{Path, PathBuf};

/// Returns the `data/` directory holding raw exports.
#[must_use]
pub fn data_dir() -> PathBuf {
    PathBuf::from("data")
}

/// Returns the `static/data/` directory for generated files.
#[must_use]
pub fn static_data_dir() -> PathBuf {
    Path::new("static").join("data")
}

/// Raw per-lawsuit export.
#[must_use]
pub fn lawsuit_data_path() -> PathBuf {
    data_dir().join("lawsuit_data.csv")
}

/// Shaped region summaries in the compat CSV format.
#[must_use]
pub fn lawsuits_csv_path() -> PathBuf {
    static_data_dir().join("lawsuits.csv")
}

/// Page route manifest for the site build.
#[must_use]
pub fn pages_json_path() -> PathBuf {
    static_data_dir().join("pages.json")
}

/// Ensures the parent directory of `path` exists.
///
/// # Errors
///
/// Returns an I/O error if the directory cannot be created.
pub fn ensure_parent(path: &Path) -> std::io::Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
        && !parent.exists()
    {
        std::fs::create_dir_all(parent)?;
    }
    Ok(())
}
