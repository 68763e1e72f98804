//! Headline counts for the browse header and plain-text output.

use crate::dataset::Archive;
use std::collections::HashSet;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ArchiveStats {
    pub total: usize,
    pub organizations: usize,
    pub sectors: usize,
    /// Distinct calendar years among records with a known date
    pub years: usize,
}

impl ArchiveStats {
    pub fn compute(archive: &Archive) -> Self {
        let mut organizations = HashSet::new();
        let mut sectors = HashSet::new();
        let mut years = HashSet::new();

        for entry in archive.entries() {
            let incident = entry.incident();
            organizations.insert(incident.organization.as_str());
            if !incident.sector.is_empty() {
                sectors.insert(incident.sector.as_str());
            }
            if !entry.date().is_unknown() {
                years.insert(entry.year_label());
            }
        }

        Self {
            total: archive.len(),
            organizations: organizations.len(),
            sectors: sectors.len(),
            years: years.len(),
        }
    }

    pub fn summary(&self) -> String {
        format!(
            "{} incidents · {} organizations · {} sectors · {} years",
            self.total, self.organizations, self.sectors, self.years
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::incident::fixtures::incident;

    #[test]
    fn counts_distinct_values() {
        let archive = Archive::from_incidents(vec![
            incident("a", "2017-05-01", "Bank A", "Banking", "High"),
            incident("b", "2017-06-01", "Bank A", "Banking", "Low"),
            incident("c", "2019-01-01", "Ministry", "Government", "Critical"),
            incident("d", "2005-0-0", "Utility", "Energy", "Medium"),
        ]);
        let stats = ArchiveStats::compute(&archive);
        assert_eq!(
            stats,
            ArchiveStats {
                total: 4,
                organizations: 3,
                sectors: 3,
                years: 2,
            }
        );
        assert_eq!(
            stats.summary(),
            "4 incidents · 3 organizations · 3 sectors · 2 years"
        );
    }

    #[test]
    fn empty_archive() {
        assert_eq!(ArchiveStats::compute(&Archive::default()), ArchiveStats::default());
    }
}
