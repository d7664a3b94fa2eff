#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Geographic level types for the lawsuit tracker.
//!
//! Lawsuit records are keyed by census GEOIDs. The length of an id encodes
//! its granularity: two digits for a state, five for a county (state FIPS +
//! county FIPS), and the full tract code otherwise. A county or tract id
//! always begins with the id of the region that contains it.

pub mod fips;

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Length of a state GEOID (two-digit FIPS code).
pub const STATE_ID_LEN: usize = 2;

/// Length of a county GEOID (state FIPS + three-digit county FIPS).
pub const COUNTY_ID_LEN: usize = 5;

/// Granularity of a region summary.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum GeoLevel {
    /// Two-digit state FIPS code.
    State,
    /// Five-digit county GEOID.
    County,
    /// Full census tract GEOID.
    Tract,
}

impl GeoLevel {
    /// All levels in aggregation order (coarsest first).
    pub const ALL: [Self; 3] = [Self::State, Self::County, Self::Tract];

    /// Number of leading id characters that identify a region at this
    /// level, or `None` when the full id is used.
    #[must_use]
    pub const fn prefix_len(self) -> Option<usize> {
        match self {
            Self::State => Some(STATE_ID_LEN),
            Self::County => Some(COUNTY_ID_LEN),
            Self::Tract => None,
        }
    }

    /// Returns the grouping key for a raw record id at this level.
    ///
    /// Ids shorter than the prefix are returned whole.
    #[must_use]
    pub fn key(self, id: &str) -> &str {
        self.prefix_len().map_or(id, |len| prefix(id, len))
    }

    /// Classifies an id by its length.
    #[must_use]
    pub fn of_id(id: &str) -> Self {
        match id.chars().count() {
            STATE_ID_LEN => Self::State,
            COUNTY_ID_LEN => Self::County,
            _ => Self::Tract,
        }
    }

    /// The level directly above this one.
    #[must_use]
    pub const fn parent(self) -> Option<Self> {
        match self {
            Self::State => None,
            Self::County => Some(Self::State),
            Self::Tract => Some(Self::County),
        }
    }

    /// Returns the id of the region containing `id`, using the length of
    /// `id` to determine its level.
    #[must_use]
    pub fn parent_id(id: &str) -> Option<String> {
        Self::of_id(id)
            .parent()
            .map(|parent| parent.key(id).to_string())
    }
}

/// Returns the first `len` characters of `s`.
fn prefix(s: &str, len: usize) -> &str {
    s.char_indices().nth(len).map_or(s, |(end, _)| &s[..end])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_truncate_to_level() {
        assert_eq!(GeoLevel::State.key("06037101110"), "06");
        assert_eq!(GeoLevel::County.key("06037101110"), "06037");
        assert_eq!(GeoLevel::Tract.key("06037101110"), "06037101110");
    }

    #[test]
    fn short_ids_are_kept_whole() {
        assert_eq!(GeoLevel::County.key("06"), "06");
        assert_eq!(GeoLevel::State.key("6"), "6");
    }

    #[test]
    fn classifies_by_length() {
        assert_eq!(GeoLevel::of_id("48"), GeoLevel::State);
        assert_eq!(GeoLevel::of_id("48201"), GeoLevel::County);
        assert_eq!(GeoLevel::of_id("48201100000"), GeoLevel::Tract);
        assert_eq!(GeoLevel::of_id("482"), GeoLevel::Tract);
    }

    #[test]
    fn parent_ids_follow_prefixes() {
        assert_eq!(GeoLevel::parent_id("48"), None);
        assert_eq!(GeoLevel::parent_id("48201").as_deref(), Some("48"));
        assert_eq!(
            GeoLevel::parent_id("48201100000").as_deref(),
            Some("48201")
        );
    }

    #[test]
    fn level_names_are_snake_case() {
        assert_eq!(GeoLevel::County.to_string(), "county");
        assert_eq!("tract".parse::<GeoLevel>().ok(), Some(GeoLevel::Tract));
    }
}
