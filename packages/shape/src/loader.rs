//! Raw lawsuit CSV loading.
//!
//! Reads the per-lawsuit export into [`LawsuitRecord`]s. Parsing is strict:
//! the first row that cannot be parsed aborts the whole load, reporting its
//! line number.

use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::sync::Arc;

use chrono::NaiveDate;
use lawsuit_tracker_lawsuit_models::{LawsuitRecord, Month};
use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::ShapeError;
use crate::progress::ProgressCallback;

/// Date format used by the raw export.
const DATE_FORMAT: &str = "%m/%d/%Y";

/// One row of the raw export, before any field is interpreted.
///
/// Columns beyond these are ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct RawLawsuitRow {
    pub id: String,
    pub name: String,
    pub plaintiff: String,
    pub date: String,
    pub default_judgment: String,
    pub amount: String,
    pub has_representation: String,
}

/// Reads every row of a headed CSV, deserializes it into `T`, and hands it
/// to `parse`.
///
/// # Errors
///
/// Returns [`ShapeError::Csv`] if the CSV itself is unreadable and
/// [`ShapeError::Row`] for the first row that fails to deserialize or
/// parse.
pub fn load_csv<R, T, U, F>(
    reader: R,
    mut parse: F,
    progress: &Arc<dyn ProgressCallback>,
) -> Result<Vec<U>, ShapeError>
where
    R: Read,
    T: DeserializeOwned,
    F: FnMut(T) -> Result<U, String>,
{
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::Headers)
        .from_reader(reader);
    let headers = reader.headers()?.clone();

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result?;
        let line = record.position().map_or(0, csv::Position::line);

        let raw: T = record
            .deserialize(Some(&headers))
            .map_err(|e| ShapeError::Row {
                line,
                message: e.to_string(),
            })?;
        rows.push(parse(raw).map_err(|message| ShapeError::Row { line, message })?);
        progress.inc(1);
    }

    Ok(rows)
}

/// Converts a raw export row into a [`LawsuitRecord`].
///
/// # Errors
///
/// Returns a message if the date is not `month/day/year` or a numeric
/// column holds something other than a number. Blank numeric columns read
/// as zero.
pub fn parse_lawsuit_row(raw: RawLawsuitRow) -> Result<LawsuitRecord, String> {
    let date = parse_month(&raw.date)?;
    let default_judgement = parse_number("default_judgment", &raw.default_judgment)?;
    let amount = parse_number("amount", &raw.amount)?;
    let representation = parse_number("has_representation", &raw.has_representation)?;

    Ok(LawsuitRecord {
        id: raw.id,
        name: raw.name,
        plaintiff: raw.plaintiff,
        date,
        default_judgement: (default_judgement - 1.0).abs() < f64::EPSILON,
        amount,
        has_representation: representation != 0.0,
    })
}

/// Parses a `month/day/year` date and truncates it to its month.
///
/// # Errors
///
/// Returns a message if the date does not match the export format.
pub fn parse_month(value: &str) -> Result<Month, String> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT)
        .map(Month::from_date)
        .map_err(|e| format!("date '{value}' is not month/day/year: {e}"))
}

fn parse_number(field: &str, value: &str) -> Result<f64, String> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(0.0);
    }
    match value.parse::<f64>() {
        Ok(n) if n.is_finite() => Ok(n),
        _ => Err(format!("{field} '{value}' is not a number")),
    }
}

/// Loads the raw export at `path`.
///
/// # Errors
///
/// Returns an error if the file cannot be opened or any row is malformed.
pub fn load_lawsuits(
    path: &Path,
    progress: &Arc<dyn ProgressCallback>,
) -> Result<Vec<LawsuitRecord>, ShapeError> {
    let file = File::open(path)?;
    let records = read_lawsuits(file, progress)?;
    log::info!("Loaded {} lawsuits from {}", records.len(), path.display());
    Ok(records)
}

/// Loads raw export rows from any reader.
///
/// # Errors
///
/// Returns an error if any row is malformed.
pub fn read_lawsuits<R: Read>(
    reader: R,
    progress: &Arc<dyn ProgressCallback>,
) -> Result<Vec<LawsuitRecord>, ShapeError> {
    let records = load_csv(reader, parse_lawsuit_row, progress)?;
    progress.finish(format!("loaded {} lawsuits", records.len()));
    Ok(records)
}

/// Drops sentinel rows (`NA` ids and rows whose name repeats the id).
///
/// Returns the number of rows dropped.
pub fn retain_valid(records: &mut Vec<LawsuitRecord>) -> usize {
    let before = records.len();
    records.retain(LawsuitRecord::is_valid);
    let dropped = before - records.len();
    if dropped > 0 {
        log::debug!("Dropped {dropped} sentinel rows");
    }
    dropped
}
