//! Page route manifest for the site build.
//!
//! The site renders an index page, one page per state, and one page per
//! county. County pages are filed under the state resolved from the
//! county's FIPS prefix rather than the state summary's display name, so a
//! suppressed or renamed state does not move its counties.

use serde::Serialize;
use strum_macros::{AsRefStr, Display};

use crate::hierarchy::RegionTree;

/// Root path of every lawsuit tracker page.
pub const ROUTE_ROOT: &str = "/lawsuit-tracker/";

/// Kind of page a route renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display, AsRefStr)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum PageKind {
    Index,
    State,
    County,
}

/// One page to render.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageRoute {
    pub path: String,
    pub kind: PageKind,
    /// URL slug of the page's own region.
    pub slug: Option<String>,
    pub geoid: Option<String>,
    pub state: Option<String>,
    pub county: Option<String>,
}

/// Converts a display name to a URL slug: ASCII letters and digits
/// lower-cased, every other run of characters collapsed to a single `-`.
#[must_use]
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_dash = false;
    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c.to_ascii_lowercase());
        } else {
            pending_dash = true;
        }
    }
    slug
}

/// Lists every page for `tree`: the index, then each named state followed
/// by its named counties.
#[must_use]
pub fn page_routes(tree: &RegionTree) -> Vec<PageRoute> {
    let mut routes = vec![PageRoute {
        path: ROUTE_ROOT.to_string(),
        kind: PageKind::Index,
        slug: None,
        geoid: None,
        state: None,
        county: None,
    }];

    for state in &tree.states {
        let name = &state.summary.name;
        if !name.is_empty() {
            let slug = slugify(name);
            routes.push(PageRoute {
                path: format!("{ROUTE_ROOT}{slug}/"),
                kind: PageKind::State,
                slug: Some(slug),
                geoid: Some(state.summary.id.clone()),
                state: Some(name.clone()),
                county: None,
            });
        }

        for county in &state.counties {
            let name = &county.summary.name;
            if name.is_empty() {
                continue;
            }
            let Some(state_name) = county.state else {
                log::warn!(
                    "No state for county {} ({}), skipping page",
                    name,
                    county.summary.id
                );
                continue;
            };
            let slug = slugify(name);
            routes.push(PageRoute {
                path: format!("{ROUTE_ROOT}{}/{slug}/", slugify(state_name)),
                kind: PageKind::County,
                slug: Some(slug),
                geoid: Some(county.summary.id.clone()),
                state: Some(state_name.to_string()),
                county: Some(name.clone()),
            });
        }
    }

    routes
}

#[cfg(test)]
mod tests {
    use super::*;
    use lawsuit_tracker_geography_models::GeoLevel;
    use lawsuit_tracker_lawsuit_models::{Month, MonthCount, RegionSummary};

    fn summary(id: &str, name: &str) -> RegionSummary {
        let month: Month = "01/2020".parse().unwrap();
        RegionSummary {
            id: id.to_string(),
            name: name.to_string(),
            level: GeoLevel::of_id(id),
            parent_id: GeoLevel::parent_id(id),
            lawsuits: 1,
            lawsuits_date: month,
            lawsuit_history: vec![MonthCount { month, lawsuits: 1 }],
            collectors: Vec::new(),
            collector_total: 1,
            amount: 10.0,
            default_judgement: 0,
            no_rep_percent: 0.0,
            suppressed: false,
        }
    }

    #[test]
    fn slugifies_names() {
        assert_eq!(slugify("Los Angeles County"), "los-angeles-county");
        assert_eq!(slugify("District of Columbia"), "district-of-columbia");
        assert_eq!(slugify("  St. Louis City "), "st-louis-city");
        assert_eq!(slugify("Doña Ana County"), "do-a-ana-county");
        assert_eq!(slugify(""), "");
    }

    #[test]
    fn builds_index_state_and_county_routes() {
        let tree = RegionTree::build(&[
            summary("06", "California"),
            summary("06037", "Los Angeles County"),
            summary("06037101110", "Census Tract 1011.10"),
        ]);

        let routes = page_routes(&tree);
        let paths: Vec<&str> = routes.iter().map(|r| r.path.as_str()).collect();
        assert_eq!(
            paths,
            vec![
                "/lawsuit-tracker/",
                "/lawsuit-tracker/california/",
                "/lawsuit-tracker/california/los-angeles-county/",
            ]
        );
        assert_eq!(routes[2].kind, PageKind::County);
        assert_eq!(routes[2].geoid.as_deref(), Some("06037"));
        assert_eq!(routes[2].state.as_deref(), Some("California"));
    }

    #[test]
    fn skips_unnamed_regions() {
        let tree = RegionTree::build(&[summary("06", ""), summary("06037", "")]);
        let routes = page_routes(&tree);
        assert_eq!(routes.len(), 1);
        assert_eq!(routes[0].kind, PageKind::Index);
    }

    #[test]
    fn page_kind_serializes_snake_case() {
        assert_eq!(PageKind::County.to_string(), "county");
        assert_eq!(
            serde_json::to_string(&PageKind::Index).unwrap(),
            "\"index\""
        );
    }
}
