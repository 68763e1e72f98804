//! Categorical filter selection.

use crate::dataset::ArchiveEntry;
use std::collections::BTreeSet;
use std::fmt;

/// One of the four independent filter dimensions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FilterDimension {
    Year,
    Sector,
    IncidentType,
    Severity,
}

impl FilterDimension {
    pub const ALL: [FilterDimension; 4] = [
        FilterDimension::Year,
        FilterDimension::Sector,
        FilterDimension::IncidentType,
        FilterDimension::Severity,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            FilterDimension::Year => "Year",
            FilterDimension::Sector => "Sector",
            FilterDimension::IncidentType => "Incident Type",
            FilterDimension::Severity => "Severity",
        }
    }

    /// The record value this dimension tests
    pub fn value_of<'a>(&self, entry: &'a ArchiveEntry) -> &'a str {
        let incident = entry.incident();
        match self {
            FilterDimension::Year => entry.year_label(),
            FilterDimension::Sector => &incident.sector,
            FilterDimension::IncidentType => &incident.incident_type,
            FilterDimension::Severity => &incident.severity,
        }
    }

    /// Next dimension in panel order, wrapping around
    pub fn next(&self) -> Self {
        match self {
            FilterDimension::Year => FilterDimension::Sector,
            FilterDimension::Sector => FilterDimension::IncidentType,
            FilterDimension::IncidentType => FilterDimension::Severity,
            FilterDimension::Severity => FilterDimension::Year,
        }
    }

    pub fn previous(&self) -> Self {
        match self {
            FilterDimension::Year => FilterDimension::Severity,
            FilterDimension::Sector => FilterDimension::Year,
            FilterDimension::IncidentType => FilterDimension::Sector,
            FilterDimension::Severity => FilterDimension::IncidentType,
        }
    }
}

impl fmt::Display for FilterDimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Active filter values. An empty set places no restriction on its dimension.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSelection {
    years: BTreeSet<String>,
    sectors: BTreeSet<String>,
    incident_types: BTreeSet<String>,
    severities: BTreeSet<String>,
}

impl FilterSelection {
    pub fn new() -> Self {
        Self::default()
    }

    fn set(&self, dimension: FilterDimension) -> &BTreeSet<String> {
        match dimension {
            FilterDimension::Year => &self.years,
            FilterDimension::Sector => &self.sectors,
            FilterDimension::IncidentType => &self.incident_types,
            FilterDimension::Severity => &self.severities,
        }
    }

    fn set_mut(&mut self, dimension: FilterDimension) -> &mut BTreeSet<String> {
        match dimension {
            FilterDimension::Year => &mut self.years,
            FilterDimension::Sector => &mut self.sectors,
            FilterDimension::IncidentType => &mut self.incident_types,
            FilterDimension::Severity => &mut self.severities,
        }
    }

    /// Add `value` if absent, remove it if present. Returns whether it is now selected.
    pub fn toggle(&mut self, dimension: FilterDimension, value: &str) -> bool {
        let set = self.set_mut(dimension);
        if set.remove(value) {
            false
        } else {
            set.insert(value.to_string());
            true
        }
    }

    /// Builder-style insert, mostly for tests and CLI seeding
    pub fn with(mut self, dimension: FilterDimension, value: impl Into<String>) -> Self {
        self.set_mut(dimension).insert(value.into());
        self
    }

    pub fn contains(&self, dimension: FilterDimension, value: &str) -> bool {
        self.set(dimension).contains(value)
    }

    pub fn values(&self, dimension: FilterDimension) -> impl Iterator<Item = &str> + '_ {
        self.set(dimension).iter().map(String::as_str)
    }

    pub fn clear_dimension(&mut self, dimension: FilterDimension) {
        self.set_mut(dimension).clear();
    }

    pub fn clear(&mut self) {
        for dimension in FilterDimension::ALL {
            self.clear_dimension(dimension);
        }
    }

    /// Number of selected values across all dimensions
    pub fn active_count(&self) -> usize {
        FilterDimension::ALL
            .iter()
            .map(|dimension| self.set(*dimension).len())
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.active_count() == 0
    }

    /// Whether `entry` passes every non-empty dimension
    pub fn admits(&self, entry: &ArchiveEntry) -> bool {
        FilterDimension::ALL.iter().all(|dimension| {
            let set = self.set(*dimension);
            set.is_empty() || set.contains(dimension.value_of(entry))
        })
    }
}
