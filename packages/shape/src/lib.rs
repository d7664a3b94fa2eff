#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Shapes raw debt-collection lawsuit records into region summaries.
//!
//! The pipeline is a single synchronous pass:
//!
//! 1. [`loader`] reads the raw export (one row per lawsuit).
//! 2. [`aggregate`] rolls records up by state, county, and tract.
//! 3. [`suppress`] blanks out regions whose figures must not be published.
//! 4. [`compat`] encodes the summaries into the CSV the site build reads,
//!    and [`export`] writes it atomically (plus an optional JSON copy).
//!
//! [`hierarchy`] and [`routes`] consume the shaped output to produce the
//! state → county → tract tree and the page route manifest.
//!
//! A malformed input row aborts the run before anything is written, so the
//! previous output stays in place.

pub mod aggregate;
pub mod collectors;
pub mod compat;
pub mod export;
pub mod hierarchy;
pub mod loader;
pub mod paths;
pub mod progress;
pub mod routes;
pub mod suppress;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use lawsuit_tracker_lawsuit_models::{LawsuitRecord, RegionSummary};
use thiserror::Error;

use crate::progress::ProgressCallback;
use crate::suppress::SuppressionRule;

/// Errors that can occur while shaping lawsuit data.
#[derive(Debug, Error)]
pub enum ShapeError {
    /// File I/O failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV reading failed.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// An input row could not be parsed.
    #[error("Malformed row at line {line}: {message}")]
    Row {
        /// 1-based line number in the source file (header is line 1).
        line: u64,
        /// Description of what went wrong.
        message: String,
    },

    /// A region name did not contain the segment its level requires.
    #[error("Cannot derive a display name for region {id} from '{name}'")]
    Name {
        /// Region id.
        id: String,
        /// Raw place name.
        name: String,
    },

    /// A group with no records was summarized.
    #[error("Region {id} has no lawsuits to summarize")]
    EmptyGroup {
        /// Region id.
        id: String,
    },

    /// A compat-encoded field could not be decoded.
    #[error("Decode error: {message}")]
    Decode {
        /// Description of what went wrong.
        message: String,
    },
}

/// Arguments for a full shaping run.
#[derive(Debug, Clone)]
pub struct ShapeArgs {
    /// Raw lawsuit export.
    pub input: PathBuf,
    /// Destination of the compat CSV.
    pub output: PathBuf,
    /// Optional destination of a structured JSON copy.
    pub json: Option<PathBuf>,
    /// Suppression rules applied after aggregation.
    pub suppression: Vec<SuppressionRule>,
}

impl Default for ShapeArgs {
    fn default() -> Self {
        Self {
            input: paths::lawsuit_data_path(),
            output: paths::lawsuits_csv_path(),
            json: None,
            suppression: suppress::default_rules(),
        }
    }
}

/// Outcome of a shaping run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShapeReport {
    /// Rows read from the input.
    pub rows_read: usize,
    /// Rows dropped as sentinels.
    pub rows_dropped: usize,
    /// Summaries written.
    pub summaries: usize,
    /// Summaries replaced by a placeholder.
    pub suppressed: usize,
}

/// Aggregates already-loaded records at every level and applies the
/// suppression rules.
///
/// Summaries are ordered states first, then counties, then tracts.
///
/// # Errors
///
/// Returns [`ShapeError::Name`] if a region's display name cannot be
/// derived.
pub fn shape_records(
    records: &[LawsuitRecord],
    rules: &[SuppressionRule],
    progress: &Arc<dyn ProgressCallback>,
) -> Result<Vec<RegionSummary>, ShapeError> {
    let mut summaries = aggregate::aggregate_all(records, progress)?;
    suppress::apply(&mut summaries, rules);
    Ok(summaries)
}

/// Loads the raw export, shapes it, and writes the compat CSV (and the JSON
/// copy when requested).
///
/// # Errors
///
/// Returns an error if the input cannot be read or parsed, a region name
/// cannot be derived, or an output file cannot be written.
pub async fn run(
    args: &ShapeArgs,
    load_progress: Option<Arc<dyn ProgressCallback>>,
    level_progress: Option<Arc<dyn ProgressCallback>>,
) -> Result<ShapeReport, ShapeError> {
    let load_progress = load_progress.unwrap_or_else(progress::null_progress);
    let level_progress = level_progress.unwrap_or_else(progress::null_progress);

    log::info!("Loading lawsuits from {}", args.input.display());
    let mut records = loader::load_lawsuits(&args.input, &load_progress)?;
    let rows_read = records.len();
    let rows_dropped = loader::retain_valid(&mut records);

    let summaries = shape_records(&records, &args.suppression, &level_progress)?;
    let suppressed = summaries.iter().filter(|s| s.suppressed).count();

    let csv = compat::to_compat_csv(&summaries);
    let json = args
        .json
        .as_deref()
        .map(|path| export::to_json(&summaries).map(|contents| (path, contents)))
        .transpose()?;

    let mut files: Vec<(&Path, &[u8])> = vec![(args.output.as_path(), csv.as_bytes())];
    if let Some((path, contents)) = &json {
        files.push((*path, contents.as_bytes()));
    }
    export::write_all_atomic(&files).await?;

    log::info!("wrote file to {}", args.output.display());
    if let Some((path, _)) = &json {
        log::info!("wrote structured copy to {}", path.display());
    }

    Ok(ShapeReport {
        rows_read,
        rows_dropped,
        summaries: summaries.len(),
        suppressed,
    })
}

/// Reads a compat CSV and writes the page route manifest for it.
///
/// Returns the number of routes written.
///
/// # Errors
///
/// Returns an error if the compat CSV cannot be read or decoded, or the
/// manifest cannot be written.
pub async fn write_pages(input: &Path, output: &Path) -> Result<usize, ShapeError> {
    let file = std::fs::File::open(input)?;
    let summaries = compat::read_compat_csv(file)?;
    let tree = hierarchy::RegionTree::build(&summaries);
    let pages = routes::page_routes(&tree);

    export::write_atomic(output, serde_json::to_string_pretty(&pages)?).await?;
    log::info!("wrote {} page routes to {}", pages.len(), output.display());

    Ok(pages.len())
}
