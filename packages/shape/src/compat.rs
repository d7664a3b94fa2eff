//! Compat CSV encoding of region summaries.
//!
//! The site build reads one flat CSV with a fixed column order. Nested
//! fields are packed into single cells:
//!
//! * `lawsuit_history`: `MM/YYYY;count` entries joined by `|`.
//! * `collectors`: `'name';count;amount` entries joined by `|`, the whole
//!   cell wrapped in double quotes. Suppressed regions leave it empty.
//!
//! Rows are written without CSV escaping; the only quoting is the manual
//! wrap of the collectors cell. A `|` inside a collector name cannot be
//! represented.

use std::io::Read;

use lawsuit_tracker_geography_models::GeoLevel;
use lawsuit_tracker_lawsuit_models::{CollectorCount, Month, MonthCount, RegionSummary};
use serde::Deserialize;

use crate::ShapeError;
use crate::loader::load_csv;
use crate::progress::null_progress;

/// Column order of the compat CSV.
pub const COLUMNS: [&str; 10] = [
    "id",
    "name",
    "lawsuits",
    "lawsuits_date",
    "lawsuit_history",
    "collectors",
    "collector_total",
    "amount",
    "default_judgement",
    "no_rep_percent",
];

const ENTRY_SEPARATOR: char = '|';
const FIELD_SEPARATOR: char = ';';

/// Formats a number in its shortest round-trip form (`1234`, `0.5`),
/// matching JavaScript's `Number#toString`: magnitudes below `1e-6` or from
/// `1e21` up use exponent notation (`5e-7`, `1.5e+21`). Negative zero
/// prints as `0`.
#[must_use]
pub fn format_number(value: f64) -> String {
    if value == 0.0 {
        return "0".to_string();
    }
    let magnitude = value.abs();
    if magnitude < 1e-6 || magnitude >= 1e21 {
        let exponent = format!("{value:e}");
        return match exponent.split_once('e') {
            Some((mantissa, power)) if !power.starts_with('-') => {
                format!("{mantissa}e+{power}")
            }
            _ => exponent,
        };
    }
    value.to_string()
}

/// Encodes a month histogram as `MM/YYYY;count|...`.
#[must_use]
pub fn encode_history(history: &[MonthCount]) -> String {
    history
        .iter()
        .map(|entry| format!("{}{FIELD_SEPARATOR}{}", entry.month, entry.lawsuits))
        .collect::<Vec<_>>()
        .join(&ENTRY_SEPARATOR.to_string())
}

/// Encodes a collector ranking as `"'name';count;amount|..."`.
///
/// An empty ranking encodes as an empty cell.
#[must_use]
pub fn encode_collectors(collectors: &[CollectorCount]) -> String {
    if collectors.is_empty() {
        return String::new();
    }
    let entries = collectors
        .iter()
        .map(|c| {
            format!(
                "'{}'{FIELD_SEPARATOR}{}{FIELD_SEPARATOR}{}",
                c.name,
                c.lawsuits,
                format_number(c.amount)
            )
        })
        .collect::<Vec<_>>()
        .join(&ENTRY_SEPARATOR.to_string());
    format!("\"{entries}\"")
}

/// Encodes one summary as a compat CSV row (no line terminator).
#[must_use]
pub fn encode_row(summary: &RegionSummary) -> String {
    [
        summary.id.clone(),
        summary.name.clone(),
        summary.lawsuits.to_string(),
        summary.lawsuits_date.to_string(),
        encode_history(&summary.lawsuit_history),
        encode_collectors(&summary.collectors),
        summary.collector_total.to_string(),
        format_number(summary.amount),
        summary.default_judgement.to_string(),
        format_number(summary.no_rep_percent),
    ]
    .join(",")
}

/// Encodes summaries as the compat CSV: a header row followed by one row
/// per summary, joined by `\n` with no trailing newline.
#[must_use]
pub fn to_compat_csv(summaries: &[RegionSummary]) -> String {
    let mut out = COLUMNS.join(",");
    for summary in summaries {
        out.push('\n');
        out.push_str(&encode_row(summary));
    }
    out
}

/// One compat CSV row before decoding.
#[derive(Debug, Clone, Deserialize)]
struct CompatRow {
    id: String,
    name: String,
    lawsuits: String,
    lawsuits_date: String,
    lawsuit_history: String,
    collectors: String,
    collector_total: String,
    amount: String,
    default_judgement: String,
    no_rep_percent: String,
}

/// Decodes a `MM/YYYY;count|...` history cell.
///
/// # Errors
///
/// Returns [`ShapeError::Decode`] if an entry is not a month and a count.
pub fn decode_history(cell: &str) -> Result<Vec<MonthCount>, ShapeError> {
    if cell.is_empty() {
        return Ok(Vec::new());
    }
    cell.split(ENTRY_SEPARATOR)
        .map(|entry| {
            let (month, lawsuits) = entry
                .split_once(FIELD_SEPARATOR)
                .ok_or_else(|| decode_error(format!("history entry '{entry}' has no count")))?;
            Ok(MonthCount {
                month: parse_field::<Month>("history month", month)?,
                lawsuits: parse_field("history count", lawsuits)?,
            })
        })
        .collect()
}

/// Decodes a collectors cell, with or without its outer double quotes.
///
/// Count and amount are taken from the right, so a `;` inside a collector
/// name survives.
///
/// # Errors
///
/// Returns [`ShapeError::Decode`] if an entry is not a quoted name, a
/// count, and an amount.
pub fn decode_collectors(cell: &str) -> Result<Vec<CollectorCount>, ShapeError> {
    let cell = cell
        .strip_prefix('"')
        .and_then(|c| c.strip_suffix('"'))
        .unwrap_or(cell);
    if cell.is_empty() {
        return Ok(Vec::new());
    }
    cell.split(ENTRY_SEPARATOR)
        .map(|entry| {
            let mut fields = entry.rsplitn(3, FIELD_SEPARATOR);
            let (Some(amount), Some(lawsuits), Some(name)) =
                (fields.next(), fields.next(), fields.next())
            else {
                return Err(decode_error(format!(
                    "collector entry '{entry}' needs a name, count, and amount"
                )));
            };
            let name = name
                .strip_prefix('\'')
                .and_then(|n| n.strip_suffix('\''))
                .unwrap_or(name);
            Ok(CollectorCount {
                name: name.to_string(),
                lawsuits: parse_field("collector count", lawsuits)?,
                amount: parse_field("collector amount", amount)?,
            })
        })
        .collect()
}

/// Reads a compat CSV back into summaries.
///
/// Level and parent are re-derived from each id. Whether a region was
/// suppressed is not recorded in the compat format, so `suppressed` is
/// always `false`.
///
/// # Errors
///
/// Returns an error if the CSV is unreadable or any cell fails to decode.
pub fn read_compat_csv<R: Read>(reader: R) -> Result<Vec<RegionSummary>, ShapeError> {
    let progress = null_progress();
    load_csv(
        reader,
        |row: CompatRow| decode_row(row).map_err(|e| e.to_string()),
        &progress,
    )
}

fn decode_row(row: CompatRow) -> Result<RegionSummary, ShapeError> {
    Ok(RegionSummary {
        level: GeoLevel::of_id(&row.id),
        parent_id: GeoLevel::parent_id(&row.id),
        lawsuits: parse_field("lawsuits", &row.lawsuits)?,
        lawsuits_date: parse_field::<Month>("lawsuits_date", &row.lawsuits_date)?,
        lawsuit_history: decode_history(&row.lawsuit_history)?,
        collectors: decode_collectors(&row.collectors)?,
        collector_total: parse_field("collector_total", &row.collector_total)?,
        amount: parse_field("amount", &row.amount)?,
        default_judgement: parse_field("default_judgement", &row.default_judgement)?,
        no_rep_percent: parse_field("no_rep_percent", &row.no_rep_percent)?,
        suppressed: false,
        id: row.id,
        name: row.name,
    })
}

fn parse_field<T>(field: &str, value: &str) -> Result<T, ShapeError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    value
        .trim()
        .parse()
        .map_err(|e| decode_error(format!("{field} '{value}': {e}")))
}

const fn decode_error(message: String) -> ShapeError {
    ShapeError::Decode { message }
}
