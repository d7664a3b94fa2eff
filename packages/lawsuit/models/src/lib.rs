#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Lawsuit record and region summary types.
//!
//! A [`LawsuitRecord`] is one debt-collection lawsuit as read from the raw
//! data export. A [`RegionSummary`] is the rollup of every lawsuit filed in
//! one state, county, or census tract.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike as _, NaiveDate};
use lawsuit_tracker_geography_models::GeoLevel;
use serde::{Deserialize, Serialize};

/// A calendar month. Lawsuit dates are bucketed to month granularity.
///
/// Orders chronologically. The textual form is `MM/YYYY`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Month {
    year: i32,
    month: u32,
}

impl Month {
    /// Creates a month from a year and a 1-based month number.
    ///
    /// # Errors
    ///
    /// Returns an error if `month` is not in the range 1-12.
    pub fn new(year: i32, month: u32) -> Result<Self, InvalidMonthError> {
        if (1..=12).contains(&month) {
            Ok(Self { year, month })
        } else {
            Err(InvalidMonthError {
                value: format!("{month:02}/{year:04}"),
            })
        }
    }

    /// Truncates a date to its month.
    #[must_use]
    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// Calendar year.
    #[must_use]
    pub const fn year(self) -> i32 {
        self.year
    }

    /// 1-based month of the year.
    #[must_use]
    pub const fn month(self) -> u32 {
        self.month
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}/{:04}", self.month, self.year)
    }
}

impl FromStr for Month {
    type Err = InvalidMonthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || InvalidMonthError {
            value: s.to_string(),
        };
        let (month, year) = s.trim().split_once('/').ok_or_else(invalid)?;
        let month = month.parse::<u32>().map_err(|_| invalid())?;
        let year = year.parse::<i32>().map_err(|_| invalid())?;
        Self::new(year, month).map_err(|_| invalid())
    }
}

impl TryFrom<String> for Month {
    type Error = InvalidMonthError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Month> for String {
    fn from(value: Month) -> Self {
        value.to_string()
    }
}

/// Error returned when a string is not a valid `MM/YYYY` month.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidMonthError {
    /// The rejected input.
    pub value: String,
}

impl fmt::Display for InvalidMonthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid month '{}': expected MM/YYYY", self.value)
    }
}

impl std::error::Error for InvalidMonthError {}

/// A single lawsuit from the raw data export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LawsuitRecord {
    /// Census GEOID of the region the defendant lives in.
    pub id: String,
    /// Place name with comma-separated hierarchy
    /// (e.g. "Census Tract 1, Harris County, Texas").
    pub name: String,
    /// Plaintiff (debt collector) as written in the court record.
    pub plaintiff: String,
    /// Month the lawsuit was filed.
    pub date: Month,
    /// Whether a default judgement was entered.
    pub default_judgement: bool,
    /// Amount sued for.
    pub amount: f64,
    /// Whether the defendant had legal representation.
    pub has_representation: bool,
}

impl LawsuitRecord {
    /// Sentinel rows carry `NA` as their id or repeat the id as the name.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.id != "NA" && self.id != self.name
    }
}

/// Lawsuits filed in one month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthCount {
    /// The month.
    pub month: Month,
    /// Number of lawsuits filed in the month.
    pub lawsuits: u64,
}

/// Lawsuit totals for one debt collector within a region.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectorCount {
    /// Normalized collector name.
    pub name: String,
    /// Number of lawsuits filed by the collector.
    pub lawsuits: u64,
    /// Total amount sued for by the collector.
    pub amount: f64,
}

/// Lawsuit rollup for a single state, county, or census tract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegionSummary {
    /// Region GEOID.
    pub id: String,
    /// Display name (state, county, or tract name).
    pub name: String,
    /// Granularity of the region.
    pub level: GeoLevel,
    /// GEOID of the containing region (`None` for states).
    pub parent_id: Option<String>,
    /// Total lawsuits filed in the region.
    pub lawsuits: u64,
    /// Most recent month with a lawsuit.
    pub lawsuits_date: Month,
    /// Lawsuits per month, oldest first.
    pub lawsuit_history: Vec<MonthCount>,
    /// Top collectors by lawsuit count (at most five).
    pub collectors: Vec<CollectorCount>,
    /// Number of distinct collectors in the region.
    pub collector_total: u64,
    /// Total amount sued for.
    pub amount: f64,
    /// Number of lawsuits ending in a default judgement.
    pub default_judgement: u64,
    /// Fraction of lawsuits where the defendant had no representation.
    pub no_rep_percent: f64,
    /// Whether the region's figures were replaced with a placeholder.
    #[serde(default)]
    pub suppressed: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn month_display_is_zero_padded() {
        let month = Month::new(2021, 4).unwrap();
        assert_eq!(month.to_string(), "04/2021");
    }

    #[test]
    fn month_parse_roundtrip() {
        let month: Month = "01/2018".parse().unwrap();
        assert_eq!(month.year(), 2018);
        assert_eq!(month.month(), 1);
        assert_eq!(month.to_string(), "01/2018");
    }

    #[test]
    fn month_rejects_out_of_range() {
        assert!(Month::new(2020, 0).is_err());
        assert!(Month::new(2020, 13).is_err());
        assert!("13/2020".parse::<Month>().is_err());
        assert!("2020".parse::<Month>().is_err());
    }

    #[test]
    fn months_order_chronologically() {
        let dec: Month = "12/2019".parse().unwrap();
        let jan: Month = "01/2020".parse().unwrap();
        let feb: Month = "02/2020".parse().unwrap();
        let mut months = vec![feb, dec, jan];
        months.sort();
        assert_eq!(months, vec![dec, jan, feb]);
    }

    #[test]
    fn month_from_date_drops_day() {
        let date = NaiveDate::from_ymd_opt(2019, 7, 23).unwrap();
        assert_eq!(Month::from_date(date).to_string(), "07/2019");
    }

    #[test]
    fn month_serializes_as_string() {
        let month = Month::new(2020, 3).unwrap();
        assert_eq!(serde_json::to_string(&month).unwrap(), "\"03/2020\"");
        let back: Month = serde_json::from_str("\"03/2020\"").unwrap();
        assert_eq!(back, month);
    }

    #[test]
    fn sentinel_records_are_invalid() {
        let mut record = LawsuitRecord {
            id: "06037101110".to_string(),
            name: "Census Tract 1011.10, Los Angeles County, California".to_string(),
            plaintiff: "Midland Funding LLC".to_string(),
            date: Month::new(2020, 1).unwrap(),
            default_judgement: false,
            amount: 1200.0,
            has_representation: true,
        };
        assert!(record.is_valid());

        record.name = record.id.clone();
        assert!(!record.is_valid());

        record.id = "NA".to_string();
        record.name = "Somewhere".to_string();
        assert!(!record.is_valid());
    }
}
