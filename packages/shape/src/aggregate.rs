//! Region rollups.
//!
//! Records are grouped by a selector over their GEOID (state prefix,
//! county prefix, or the full tract id) and each group is reduced to one
//! [`RegionSummary`]. Groups are emitted in the order their first record
//! appears in the input.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use lawsuit_tracker_geography_models::{COUNTY_ID_LEN, GeoLevel, STATE_ID_LEN};
use lawsuit_tracker_lawsuit_models::{LawsuitRecord, Month, MonthCount, RegionSummary};

use crate::ShapeError;
use crate::collectors::{tally_collectors, top_collectors};
use crate::progress::ProgressCallback;

/// Groups `records` by `selector` and summarizes each group.
///
/// The selector output becomes the summary id. Records themselves are left
/// untouched.
///
/// # Errors
///
/// Returns [`ShapeError::Name`] if a group's display name cannot be
/// derived.
pub fn aggregate_by_selector<'a, F>(
    records: &'a [LawsuitRecord],
    selector: F,
) -> Result<Vec<RegionSummary>, ShapeError>
where
    F: Fn(&'a LawsuitRecord) -> &'a str,
{
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut groups: Vec<(&str, Vec<&LawsuitRecord>)> = Vec::new();

    for record in records {
        let key = selector(record);
        match index.get(key) {
            Some(&slot) => groups[slot].1.push(record),
            None => {
                index.insert(key, groups.len());
                groups.push((key, vec![record]));
            }
        }
    }

    groups
        .into_iter()
        .map(|(id, members)| summarize(id, &members))
        .collect()
}

/// Summarizes `records` at a single geographic level.
///
/// # Errors
///
/// Returns [`ShapeError::Name`] if a group's display name cannot be
/// derived.
pub fn aggregate_by_level(
    records: &[LawsuitRecord],
    level: GeoLevel,
) -> Result<Vec<RegionSummary>, ShapeError> {
    aggregate_by_selector(records, |record| level.key(&record.id))
}

/// Summarizes `records` at every level: states, then counties, then tracts.
///
/// # Errors
///
/// Returns [`ShapeError::Name`] if a group's display name cannot be
/// derived.
pub fn aggregate_all(
    records: &[LawsuitRecord],
    progress: &Arc<dyn ProgressCallback>,
) -> Result<Vec<RegionSummary>, ShapeError> {
    progress.set_total(GeoLevel::ALL.len() as u64);

    let mut summaries = Vec::new();
    for level in GeoLevel::ALL {
        progress.set_message(format!("Aggregating {level} summaries"));
        let level_summaries = aggregate_by_level(records, level)?;
        log::info!("Aggregated {} {level} summaries", level_summaries.len());
        summaries.extend(level_summaries);
        progress.inc(1);
    }

    progress.finish(format!("aggregated {} summaries", summaries.len()));
    Ok(summaries)
}

/// Reduces one non-empty group of records sharing `id`.
///
/// # Errors
///
/// Returns [`ShapeError::Name`] if the display name cannot be derived and
/// [`ShapeError::EmptyGroup`] if `records` is empty.
pub fn summarize(id: &str, records: &[&LawsuitRecord]) -> Result<RegionSummary, ShapeError> {
    let Some(first) = records.first() else {
        return Err(ShapeError::EmptyGroup { id: id.to_string() });
    };
    let name = display_name(id, &first.name)?;

    let lawsuit_history = month_histogram(records);
    let lawsuits_date = lawsuit_history
        .last()
        .map(|entry| entry.month)
        .unwrap_or(first.date);

    let tallies = tally_collectors(records);
    let collector_total = tallies.len() as u64;
    let collectors = top_collectors(tallies);

    let lawsuits = records.len() as u64;
    let amount = records.iter().map(|r| r.amount).sum::<f64>();
    let default_judgement = records.iter().filter(|r| r.default_judgement).count() as u64;
    let unrepresented = records.iter().filter(|r| !r.has_representation).count();

    #[allow(clippy::cast_precision_loss)]
    let no_rep_percent = unrepresented as f64 / records.len() as f64;

    Ok(RegionSummary {
        id: id.to_string(),
        name,
        level: GeoLevel::of_id(id),
        parent_id: GeoLevel::parent_id(id),
        lawsuits,
        lawsuits_date,
        lawsuit_history,
        collectors,
        collector_total,
        amount,
        default_judgement,
        no_rep_percent,
        suppressed: false,
    })
}

/// Counts lawsuits per month, oldest month first.
#[must_use]
pub fn month_histogram(records: &[&LawsuitRecord]) -> Vec<MonthCount> {
    let mut counts: BTreeMap<Month, u64> = BTreeMap::new();
    for record in records {
        *counts.entry(record.date).or_default() += 1;
    }
    counts
        .into_iter()
        .map(|(month, lawsuits)| MonthCount { month, lawsuits })
        .collect()
}

/// Derives a region's display name from its id and the raw place name of
/// one of its records.
///
/// Raw names list the hierarchy smallest first ("Tract, County, State"), so
/// states take the last segment, counties the second, and tracts the first.
/// A region whose id doubles as its raw name only has a zip code to go by.
///
/// # Errors
///
/// Returns [`ShapeError::Name`] if a county name has no second segment.
pub fn display_name(id: &str, raw_name: &str) -> Result<String, ShapeError> {
    if id == raw_name {
        return Ok(format!("Zip {id}"));
    }

    let mut segments = raw_name.split(',');
    let segment = match id.chars().count() {
        STATE_ID_LEN => segments.next_back(),
        COUNTY_ID_LEN => segments.nth(1),
        _ => segments.next(),
    };

    segment
        .map(|s| s.trim().to_string())
        .ok_or_else(|| ShapeError::Name {
            id: id.to_string(),
            name: raw_name.to_string(),
        })
}
