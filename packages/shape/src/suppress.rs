//! Region suppression.
//!
//! Some regions must not have their figures published. After aggregation,
//! every summary matching a rule is replaced with a zeroed placeholder that
//! keeps the region's identity (id, name, level, parent) so the site still
//! renders a page for it.

use lawsuit_tracker_lawsuit_models::{Month, MonthCount, RegionSummary};

/// Month shown as the "as of" date of a suppressed region.
const PLACEHOLDER_DATE: (i32, u32) = (2021, 4);

/// Single history entry of a suppressed region.
const PLACEHOLDER_HISTORY: (i32, u32) = (2018, 1);

/// Selects summaries to suppress.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SuppressionRule {
    /// Matches on the derived display name, at any level.
    Name(String),
    /// Matches on the region GEOID.
    Geoid(String),
}

impl SuppressionRule {
    /// Whether `summary` is selected by this rule.
    #[must_use]
    pub fn matches(&self, summary: &RegionSummary) -> bool {
        match self {
            Self::Name(name) => summary.name == *name,
            Self::Geoid(id) => summary.id == *id,
        }
    }
}

/// Rules applied when none are configured: Texas totals are withheld.
#[must_use]
pub fn default_rules() -> Vec<SuppressionRule> {
    vec![SuppressionRule::Name("Texas".to_string())]
}

/// Replaces every summary matched by any rule with a placeholder.
///
/// Returns the number of summaries suppressed.
pub fn apply(summaries: &mut [RegionSummary], rules: &[SuppressionRule]) -> usize {
    let mut count = 0;
    for summary in summaries.iter_mut() {
        if rules.iter().any(|rule| rule.matches(summary)) {
            log::debug!("Suppressing {} ({})", summary.name, summary.id);
            suppress(summary);
            count += 1;
        }
    }
    count
}

/// Zeroes out a summary's figures.
pub fn suppress(summary: &mut RegionSummary) {
    summary.lawsuits = 0;
    summary.lawsuits_date = month(PLACEHOLDER_DATE);
    summary.lawsuit_history = vec![MonthCount {
        month: month(PLACEHOLDER_HISTORY),
        lawsuits: 0,
    }];
    summary.collectors.clear();
    summary.collector_total = 0;
    summary.amount = 0.0;
    summary.default_judgement = 0;
    summary.no_rep_percent = 0.0;
    summary.suppressed = true;
}

fn month((year, month): (i32, u32)) -> Month {
    Month::new(year, month).expect("valid placeholder month")
}

#[cfg(test)]
mod tests {
    use super::*;
    use lawsuit_tracker_geography_models::GeoLevel;
    use lawsuit_tracker_lawsuit_models::CollectorCount;

    fn summary(id: &str, name: &str) -> RegionSummary {
        RegionSummary {
            id: id.to_string(),
            name: name.to_string(),
            level: GeoLevel::of_id(id),
            parent_id: GeoLevel::parent_id(id),
            lawsuits: 12,
            lawsuits_date: Month::new(2020, 6).unwrap(),
            lawsuit_history: vec![MonthCount {
                month: Month::new(2020, 6).unwrap(),
                lawsuits: 12,
            }],
            collectors: vec![CollectorCount {
                name: "midland funding llc".to_string(),
                lawsuits: 12,
                amount: 4800.0,
            }],
            collector_total: 1,
            amount: 4800.0,
            default_judgement: 7,
            no_rep_percent: 0.75,
            suppressed: false,
        }
    }

    #[test]
    fn texas_is_suppressed_by_default() {
        let mut summaries = vec![summary("48", "Texas"), summary("06", "California")];
        assert_eq!(apply(&mut summaries, &default_rules()), 1);

        let texas = &summaries[0];
        assert!(texas.suppressed);
        assert_eq!(texas.id, "48");
        assert_eq!(texas.name, "Texas");
        assert_eq!(texas.lawsuits, 0);
        assert_eq!(texas.lawsuits_date.to_string(), "04/2021");
        assert_eq!(texas.lawsuit_history.len(), 1);
        assert_eq!(texas.lawsuit_history[0].month.to_string(), "01/2018");
        assert_eq!(texas.lawsuit_history[0].lawsuits, 0);
        assert!(texas.collectors.is_empty());
        assert_eq!(texas.collector_total, 0);
        assert_eq!(texas.default_judgement, 0);
        assert!(texas.amount.abs() < f64::EPSILON);
        assert!(texas.no_rep_percent.abs() < f64::EPSILON);

        assert!(!summaries[1].suppressed);
        assert_eq!(summaries[1].lawsuits, 12);
    }

    #[test]
    fn name_rule_requires_exact_match() {
        let mut summaries = vec![summary("29215", "Texas County")];
        assert_eq!(apply(&mut summaries, &default_rules()), 0);
        assert_eq!(summaries[0].lawsuits, 12);
    }

    #[test]
    fn geoid_rule_matches_id() {
        let mut summaries = vec![summary("48201", "Harris County"), summary("48", "Texas")];
        let rules = [SuppressionRule::Geoid("48201".to_string())];
        assert_eq!(apply(&mut summaries, &rules), 1);
        assert!(summaries[0].suppressed);
        assert!(!summaries[1].suppressed);
    }

    #[test]
    fn no_rules_suppress_nothing() {
        let mut summaries = vec![summary("48", "Texas")];
        assert_eq!(apply(&mut summaries, &[]), 0);
    }
}
