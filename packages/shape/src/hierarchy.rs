//! State → county → tract tree.
//!
//! Built from flat summaries using each summary's `parent_id`. States keep
//! their input order; counties and tracts keep theirs within each parent.

use std::collections::HashMap;

use lawsuit_tracker_geography_models::{GeoLevel, fips};
use lawsuit_tracker_lawsuit_models::RegionSummary;
use serde::Serialize;

/// A county with its tracts.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CountyNode {
    pub summary: RegionSummary,
    /// State name resolved from the county's FIPS prefix.
    pub state: Option<&'static str>,
    pub tracts: Vec<RegionSummary>,
}

/// A state with its counties.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StateNode {
    pub summary: RegionSummary,
    pub counties: Vec<CountyNode>,
}

/// All regions, nested by containment.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegionTree {
    pub states: Vec<StateNode>,
    /// Summaries whose parent was not present.
    pub orphans: usize,
}

impl RegionTree {
    /// Nests `summaries` by their parent ids.
    #[must_use]
    pub fn build(summaries: &[RegionSummary]) -> Self {
        let mut tracts_by_county: HashMap<&str, Vec<RegionSummary>> = HashMap::new();
        let mut counties_by_state: HashMap<&str, Vec<&RegionSummary>> = HashMap::new();
        let mut states: Vec<&RegionSummary> = Vec::new();

        for summary in summaries {
            match (summary.level, summary.parent_id.as_deref()) {
                (GeoLevel::State, _) => states.push(summary),
                (GeoLevel::County, Some(parent)) => {
                    counties_by_state.entry(parent).or_default().push(summary);
                }
                (GeoLevel::Tract, Some(parent)) => {
                    tracts_by_county
                        .entry(parent)
                        .or_default()
                        .push(summary.clone());
                }
                (_, None) => {}
            }
        }

        let placed_tracts: usize = tracts_by_county.values().map(Vec::len).sum();
        let placed_counties: usize = counties_by_state.values().map(Vec::len).sum();

        let states: Vec<StateNode> = states
            .into_iter()
            .map(|state| {
                let counties = counties_by_state
                    .remove(state.id.as_str())
                    .unwrap_or_default()
                    .into_iter()
                    .map(|county| CountyNode {
                        state: fips::state_name_for_geoid(&county.id),
                        tracts: tracts_by_county
                            .remove(county.id.as_str())
                            .unwrap_or_default(),
                        summary: county.clone(),
                    })
                    .collect();
                StateNode {
                    summary: state.clone(),
                    counties,
                }
            })
            .collect();

        let leftover_counties: usize = counties_by_state.values().map(Vec::len).sum();
        let leftover_tracts: usize = tracts_by_county.values().map(Vec::len).sum();
        let unparented = summaries.len()
            - states.len()
            - placed_counties
            - placed_tracts;
        let orphans = leftover_counties + leftover_tracts + unparented;
        if orphans > 0 {
            log::warn!("{orphans} summaries have no parent region");
        }

        Self { states, orphans }
    }

    /// Looks up a county by GEOID.
    #[cfg(test)]
    #[must_use]
    pub fn county(&self, geoid: &str) -> Option<&CountyNode> {
        self.states
            .iter()
            .flat_map(|state| &state.counties)
            .find(|county| county.summary.id == geoid)
    }
}
