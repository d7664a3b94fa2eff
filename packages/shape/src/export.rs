//! Output writing.
//!
//! Outputs are written to a sibling temp file and renamed into place, so a
//! failed run never leaves a half-written file behind and the previous
//! output survives.

use std::path::{Path, PathBuf};

use lawsuit_tracker_lawsuit_models::RegionSummary;

use crate::ShapeError;
use crate::paths::ensure_parent;

/// Serializes summaries as a pretty-printed JSON array with nested history
/// and collector records.
///
/// # Errors
///
/// Returns [`ShapeError::Json`] if serialization fails.
pub fn to_json(summaries: &[RegionSummary]) -> Result<String, ShapeError> {
    Ok(serde_json::to_string_pretty(summaries)?)
}

/// An output written to its sibling temp file but not yet renamed into
/// place.
#[derive(Debug)]
pub struct StagedFile {
    tmp: PathBuf,
    path: PathBuf,
}

impl StagedFile {
    /// Renames the temp file over the target. The temp file is removed if
    /// the rename fails.
    ///
    /// # Errors
    ///
    /// Returns [`ShapeError::Io`] if the rename fails.
    pub async fn commit(self) -> Result<(), ShapeError> {
        if let Err(e) = tokio::fs::rename(&self.tmp, &self.path).await {
            self.discard().await;
            return Err(e.into());
        }
        log::debug!("Wrote {}", self.path.display());
        Ok(())
    }

    /// Removes the temp file, leaving the target untouched.
    pub async fn discard(self) {
        tokio::fs::remove_file(&self.tmp).await.ok();
    }
}

/// Writes `contents` to the temp sibling of `path`.
///
/// # Errors
///
/// Returns [`ShapeError::Io`] if `path` is a directory, the parent
/// directory cannot be created, or the temp file cannot be written.
pub async fn stage(path: &Path, contents: impl AsRef<[u8]>) -> Result<StagedFile, ShapeError> {
    if tokio::fs::metadata(path).await.is_ok_and(|m| m.is_dir()) {
        return Err(std::io::Error::new(
            std::io::ErrorKind::IsADirectory,
            format!("{} is a directory", path.display()),
        )
        .into());
    }
    ensure_parent(path)?;

    let tmp = temp_path(path);
    if let Err(e) = tokio::fs::write(&tmp, contents.as_ref()).await {
        tokio::fs::remove_file(&tmp).await.ok();
        return Err(e.into());
    }
    Ok(StagedFile {
        tmp,
        path: path.to_path_buf(),
    })
}

/// Writes every `(path, contents)` pair, renaming into place only once all
/// of them are staged. Files are committed in reverse order, so the first
/// entry is replaced last.
///
/// # Errors
///
/// Returns [`ShapeError::Io`] if any file cannot be staged or renamed.
/// Nothing is replaced when staging fails.
pub async fn write_all_atomic(files: &[(&Path, &[u8])]) -> Result<(), ShapeError> {
    let mut staged = Vec::with_capacity(files.len());
    for (path, contents) in files {
        match stage(path, contents).await {
            Ok(file) => staged.push(file),
            Err(e) => {
                for file in staged {
                    file.discard().await;
                }
                return Err(e);
            }
        }
    }

    while let Some(file) = staged.pop() {
        if let Err(e) = file.commit().await {
            for file in staged {
                file.discard().await;
            }
            return Err(e);
        }
    }
    Ok(())
}

/// Writes `contents` to `path`, replacing any existing file atomically.
///
/// # Errors
///
/// Returns [`ShapeError::Io`] if the directory cannot be created or the
/// file cannot be written or renamed.
pub async fn write_atomic(path: &Path, contents: impl AsRef<[u8]>) -> Result<(), ShapeError> {
    stage(path, contents).await?.commit().await
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(std::ffi::OsStr::to_os_string)
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    use lawsuit_tracker_geography_models::GeoLevel;
    use lawsuit_tracker_lawsuit_models::{Month, MonthCount};

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "lawsuit_tracker_export_{name}_{}",
            std::process::id()
        ));
        std::fs::remove_dir_all(&dir).ok();
        dir
    }

    #[tokio::test]
    async fn write_atomic_creates_parents_and_replaces() {
        let dir = scratch_dir("replace");
        let path = dir.join("static/data/lawsuits.csv");

        write_atomic(&path, "first").await.unwrap();
        write_atomic(&path, "second").await.unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "second");
        assert!(!temp_path(&path).exists());
        std::fs::remove_dir_all(&dir).ok();
    }

    #[tokio::test]
    async fn failed_rename_removes_temp_file() {
        let dir = scratch_dir("rename");
        let path = dir.join("lawsuits.json");

        let staged = stage(&path, "{}").await.unwrap();
        std::fs::create_dir_all(path.join("occupied")).unwrap();

        assert!(staged.commit().await.is_err());
        assert!(!temp_path(&path).exists());
        assert!(path.is_dir());
        std::fs::remove_dir_all(&dir).ok();
    }

    #[tokio::test]
    async fn directory_target_is_rejected_before_writing() {
        let dir = scratch_dir("dir_target");
        std::fs::create_dir_all(&dir).unwrap();

        let err = write_atomic(&dir, "{}").await.unwrap_err();
        assert!(matches!(err, ShapeError::Io(_)), "{err}");
        assert!(!temp_path(&dir).exists());
        std::fs::remove_dir_all(&dir).ok();
    }

    #[tokio::test]
    async fn write_all_atomic_replaces_nothing_when_staging_fails() {
        let dir = scratch_dir("all");
        let csv = dir.join("lawsuits.csv");
        let json = dir.join("lawsuits.json");
        std::fs::create_dir_all(&json).unwrap();
        std::fs::write(&csv, "previous").unwrap();

        let result = write_all_atomic(&[
            (csv.as_path(), b"next".as_slice()),
            (json.as_path(), b"[]".as_slice()),
        ])
        .await;

        assert!(result.is_err());
        assert_eq!(std::fs::read_to_string(&csv).unwrap(), "previous");
        assert!(!temp_path(&csv).exists());
        assert!(!temp_path(&json).exists());
        std::fs::remove_dir_all(&dir).ok();
    }

    #[tokio::test]
    async fn write_all_atomic_writes_every_file() {
        let dir = scratch_dir("all_ok");
        let csv = dir.join("lawsuits.csv");
        let json = dir.join("data/lawsuits.json");

        write_all_atomic(&[
            (csv.as_path(), b"id".as_slice()),
            (json.as_path(), b"[]".as_slice()),
        ])
        .await
        .unwrap();

        assert_eq!(std::fs::read_to_string(&csv).unwrap(), "id");
        assert_eq!(std::fs::read_to_string(&json).unwrap(), "[]");
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn temp_path_is_a_sibling() {
        let path = Path::new("static/data/lawsuits.csv");
        assert_eq!(temp_path(path), Path::new("static/data/lawsuits.csv.tmp"));
    }

    #[test]
    fn json_nests_history() {
        let month: Month = "05/2020".parse().unwrap();
        let summary = RegionSummary {
            id: "06".to_string(),
            name: "California".to_string(),
            level: GeoLevel::State,
            parent_id: None,
            lawsuits: 1,
            lawsuits_date: month,
            lawsuit_history: vec![MonthCount { month, lawsuits: 1 }],
            collectors: Vec::new(),
            collector_total: 0,
            amount: 0.0,
            default_judgement: 0,
            no_rep_percent: 0.0,
            suppressed: false,
        };

        let json = to_json(&[summary]).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value[0]["level"], "state");
        assert_eq!(value[0]["lawsuitHistory"][0]["month"], "05/2020");
        assert_eq!(value[0]["lawsuitsDate"], "05/2020");
    }
}
