//! Debt collector name normalization and ranking.
//!
//! Court records spell the same plaintiff many ways ("Midland Funding,
//! LLC.", "MIDLAND FUNDING LLC"). Names are folded to a single key before
//! lawsuits are counted per collector.

use std::collections::HashMap;
use std::sync::LazyLock;

use lawsuit_tracker_lawsuit_models::{CollectorCount, LawsuitRecord};
use regex::Regex;

/// Number of collectors kept in a region's ranking.
pub const TOP_COLLECTORS: usize = 5;

/// Quotes and commas carry no meaning in plaintiff names.
static PUNCTUATION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"[",]"#).expect("valid regex"));

/// Suffix spellings folded to their unpunctuated form. Only the first
/// occurrence is replaced.
const SUFFIXES: &[(&str, &str)] = &[("inc.", "inc"), ("llc.", "llc")];

/// Templated assignment phrase appended to some filings.
const ASSIGNEE_PHRASE: &str = " assignee of credit one bank n.a.";

/// Folds a plaintiff name to its collector key.
///
/// Lower-cases, strips quotes and commas, folds `inc.`/`llc.`, and removes
/// the Credit One assignment phrase.
#[must_use]
pub fn normalize_collector(plaintiff: &str) -> String {
    let lower = plaintiff.to_lowercase();
    let mut key = PUNCTUATION_RE.replace_all(&lower, "").into_owned();
    for (from, to) in SUFFIXES {
        key = key.replacen(from, to, 1);
    }
    key.replacen(ASSIGNEE_PHRASE, "", 1)
}

/// Counts lawsuits and sums amounts per normalized collector.
///
/// Collectors appear in the order they were first encountered.
#[must_use]
pub fn tally_collectors(records: &[&LawsuitRecord]) -> Vec<CollectorCount> {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut tallies: Vec<CollectorCount> = Vec::new();

    for record in records {
        let key = normalize_collector(&record.plaintiff);
        let slot = *index.entry(key.clone()).or_insert_with(|| {
            tallies.push(CollectorCount {
                name: key,
                lawsuits: 0,
                amount: 0.0,
            });
            tallies.len() - 1
        });
        let tally = &mut tallies[slot];
        tally.lawsuits += 1;
        tally.amount += record.amount;
    }

    tallies
}

/// Orders collectors by lawsuit count (descending) and keeps the top
/// [`TOP_COLLECTORS`]. Ties keep their encounter order.
#[must_use]
pub fn top_collectors(mut tallies: Vec<CollectorCount>) -> Vec<CollectorCount> {
    tallies.sort_by(|a, b| b.lawsuits.cmp(&a.lawsuits));
    tallies.truncate(TOP_COLLECTORS);
    tallies
}

#[cfg(test)]
mod tests {
    use super::*;
    use lawsuit_tracker_lawsuit_models::Month;

    fn record(plaintiff: &str, amount: f64) -> LawsuitRecord {
        LawsuitRecord {
            id: "06037101110".to_string(),
            name: "Census Tract 1011.10, Los Angeles County, California".to_string(),
            plaintiff: plaintiff.to_string(),
            date: Month::new(2020, 1).unwrap(),
            default_judgement: false,
            amount,
            has_representation: true,
        }
    }

    #[test]
    fn normalizes_case_and_punctuation() {
        assert_eq!(
            normalize_collector("Midland Funding, LLC."),
            "midland funding llc"
        );
        assert_eq!(normalize_collector("\"Portfolio Recovery\""), "portfolio recovery");
    }

    #[test]
    fn folds_only_first_suffix_occurrence() {
        assert_eq!(normalize_collector("Acme Inc. Inc."), "acme inc inc.");
    }

    #[test]
    fn strips_assignee_phrase() {
        assert_eq!(
            normalize_collector("LVNV Funding LLC Assignee of Credit One Bank N.A."),
            "lvnv funding llc"
        );
    }

    #[test]
    fn tallies_in_encounter_order() {
        let records = [
            record("Midland Funding LLC", 100.0),
            record("Cavalry SPV I, LLC", 50.0),
            record("MIDLAND FUNDING, LLC", 25.5),
        ];
        let refs: Vec<&LawsuitRecord> = records.iter().collect();

        let tallies = tally_collectors(&refs);
        assert_eq!(tallies.len(), 2);
        assert_eq!(tallies[0].name, "midland funding llc");
        assert_eq!(tallies[0].lawsuits, 2);
        assert!((tallies[0].amount - 125.5).abs() < f64::EPSILON);
        assert_eq!(tallies[1].name, "cavalry spv i llc");
    }

    #[test]
    fn top_collectors_is_stable_and_capped() {
        let tallies: Vec<CollectorCount> = ["a", "b", "c", "d", "e", "f", "g"]
            .iter()
            .zip([1, 3, 1, 3, 2, 1, 1])
            .map(|(name, lawsuits)| CollectorCount {
                name: (*name).to_string(),
                lawsuits,
                amount: 0.0,
            })
            .collect();

        let names: Vec<String> = top_collectors(tallies)
            .into_iter()
            .map(|c| c.name)
            .collect();
        assert_eq!(names, vec!["b", "d", "e", "a", "c"]);
    }
}
