//! Query engine: free-text search plus categorical filters.
//!
//! Evaluation is pure. A record is kept when the lowercased query, whitespace
//! included, is a substring of its precomputed search text (an empty query
//! matches everything) and it passes every non-empty filter dimension. Results
//! always come back newest first; records with the same date keep archive order
//! and unknown dates sink to the end.

pub mod filters;

pub use filters::{FilterDimension, FilterSelection};

use crate::dataset::{Archive, ArchiveEntry};
use crate::incident::Incident;

/// Lowercased search needle, prepared once per evaluation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextQuery {
    needle: String,
}

impl TextQuery {
    pub fn new(raw: &str) -> Self {
        Self {
            needle: raw.to_lowercase(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.needle.is_empty()
    }

    pub fn matches(&self, entry: &ArchiveEntry) -> bool {
        self.needle.is_empty() || entry.haystack().contains(&self.needle)
    }
}

/// Whether a single entry satisfies the query and the filters
pub fn admits(entry: &ArchiveEntry, query: &TextQuery, filters: &FilterSelection) -> bool {
    query.matches(entry) && filters.admits(entry)
}

/// Archive positions of the matching records, newest first
pub fn matching_indices(archive: &Archive, query: &str, filters: &FilterSelection) -> Vec<usize> {
    let query = TextQuery::new(query);
    let entries = archive.entries();

    let mut indices: Vec<usize> = entries
        .iter()
        .enumerate()
        .filter(|(_, entry)| admits(entry, &query, filters))
        .map(|(position, _)| position)
        .collect();

    // Stable, so equal dates keep their archive order
    indices.sort_by(|&a, &b| entries[b].date().timeline_cmp(entries[a].date()));
    indices
}

/// Matching records themselves, newest first
pub fn apply<'a>(archive: &'a Archive, query: &str, filters: &FilterSelection) -> Vec<&'a Incident> {
    matching_indices(archive, query, filters)
        .into_iter()
        .filter_map(|position| archive.get(position))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::incident::fixtures::incident;

    fn ids<'a>(incidents: &[&'a Incident]) -> Vec<&'a str> {
        incidents.iter().map(|i| i.id.as_str()).collect()
    }

    fn sample() -> Archive {
        Archive::from_incidents(vec![
            incident("old", "2015-03-01", "Central Bank", "Banking", "Critical"),
            incident("mid", "2017-05-01", "Ministry of Health", "Healthcare", "High"),
            incident("new", "2021-09-12", "Rail Operator", "Transportation", "Medium"),
            incident("undated", "2000-0-0", "Savings Bank", "Banking", "Low"),
        ])
    }

    #[test]
    fn empty_query_returns_everything_newest_first() {
        let archive = sample();
        let results = apply(&archive, "", &FilterSelection::new());
        assert_eq!(ids(&results), vec!["new", "mid", "old", "undated"]);
    }

    #[test]
    fn text_search_is_case_insensitive_substring() {
        let archive = sample();
        let results = apply(&archive, "BANK", &FilterSelection::new());
        assert_eq!(ids(&results), vec!["old", "undated"]);

        let results = apply(&archive, "weak pass", &FilterSelection::new());
        assert_eq!(results.len(), 4);

        assert!(apply(&archive, "no such thing", &FilterSelection::new()).is_empty());
    }

    #[test]
    fn whitespace_in_the_query_is_significant() {
        let archive = sample();
        let none = FilterSelection::new();

        // Search text is "<organization> <sector> ... <year>" with single spaces
        assert!(apply(&archive, "2017 ", &none).is_empty());
        assert!(apply(&archive, " central", &none).is_empty());
        assert_eq!(ids(&apply(&archive, "central bank ", &none)), vec!["old"]);
        assert!(apply(&archive, "   ", &none).is_empty());
        assert_eq!(apply(&archive, " ", &none).len(), 4);
    }

    #[test]
    fn year_filter_uses_year_label() {
        let archive = sample();
        let in_2017 = FilterSelection::new().with(FilterDimension::Year, "2017");
        assert_eq!(ids(&apply(&archive, "", &in_2017)), vec!["mid"]);

        let in_2018 = FilterSelection::new().with(FilterDimension::Year, "2018");
        assert!(apply(&archive, "", &in_2018).is_empty());

        let in_2000 = FilterSelection::new().with(FilterDimension::Year, "2000");
        assert_eq!(ids(&apply(&archive, "", &in_2000)), vec!["undated"]);
    }

    #[test]
    fn dimensions_combine_with_and() {
        let archive = sample();
        let filters = FilterSelection::new()
            .with(FilterDimension::Sector, "Banking")
            .with(FilterDimension::Severity, "Critical")
            .with(FilterDimension::Severity, "Low");
        assert_eq!(ids(&apply(&archive, "", &filters)), vec!["old", "undated"]);

        let filters = filters.with(FilterDimension::IncidentType, "Phishing");
        assert!(apply(&archive, "", &filters).is_empty());
    }

    #[test]
    fn severity_membership_is_case_sensitive() {
        let archive = sample();
        let filters = FilterSelection::new().with(FilterDimension::Severity, "critical");
        assert!(apply(&archive, "", &filters).is_empty());
    }

    #[test]
    fn same_day_records_keep_archive_order() {
        let archive = Archive::from_incidents(vec![
            incident("a", "2019-01-01", "A", "Energy", "Low"),
            incident("b", "2019-01-01", "B", "Energy", "Low"),
            incident("c", "2020-01-01", "C", "Energy", "Low"),
        ]);
        assert_eq!(
            ids(&apply(&archive, "", &FilterSelection::new())),
            vec!["c", "a", "b"]
        );
    }

    #[test]
    fn banking_critical_over_250_records() {
        let sectors = ["Banking", "Energy", "Government", "Healthcare", "Telecommunications"];
        let severities = ["Critical", "High", "Medium", "Low"];
        let records: Vec<_> = (0..250)
            .map(|n| {
                let date = if n % 37 == 0 {
                    format!("{}-0-0", 2000 + n % 26)
                } else {
                    format!("{}-{:02}-{:02}", 2000 + n % 26, 1 + n % 12, 1 + n % 28)
                };
                incident(
                    &format!("inc-{:03}", n),
                    &date,
                    &format!("Org {}", n),
                    sectors[n % sectors.len()],
                    severities[n % severities.len()],
                )
            })
            .collect();
        let archive = Archive::from_incidents(records);

        let filters = FilterSelection::new().with(FilterDimension::Severity, "Critical");
        let results = apply(&archive, "Banking", &filters);

        let expected = archive
            .entries()
            .iter()
            .filter(|e| e.haystack().contains("banking") && e.incident().severity == "Critical")
            .count();
        assert_eq!(results.len(), expected);
        assert!(expected > 0);
        assert!(results
            .iter()
            .all(|i| i.sector == "Banking" && i.severity == "Critical"));

        let dates: Vec<_> = results.iter().map(|i| i.parsed_date()).collect();
        for pair in dates.windows(2) {
            assert_ne!(
                pair[0].timeline_cmp(&pair[1]),
                std::cmp::Ordering::Less,
                "results must be newest first"
            );
        }
    }
}
