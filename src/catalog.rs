//! Categorical domains shared by the query engine and the filter panel.
//!
//! Sectors, incident types and severities are open sets: the catalog lists the
//! recognized values (configurable), and [`Catalog::options`] appends anything the
//! loaded archive contains that the catalog does not know about, so every value
//! in the data stays filterable.

use crate::dataset::Archive;
use crate::error::{ChronicleError, Result};
use crate::query::FilterDimension;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::ops::RangeInclusive;

pub const DEFAULT_START_YEAR: u16 = 2000;
pub const DEFAULT_END_YEAR: u16 = 2025;

const DEFAULT_SECTORS: &[&str] = &[
    "Banking",
    "Government",
    "Healthcare",
    "Transportation",
    "Energy",
    "IT Services",
    "Financial Regulation",
    "Telecommunications",
    "Critical Infrastructure",
];

const DEFAULT_INCIDENT_TYPES: &[&str] = &[
    "Phishing",
    "Ransomware",
    "Data Breach",
    "DDoS Attack",
    "APT Attack",
    "Insider Threat",
    "Malware",
    "Web Defacement",
    "SIM Swapping",
];

const DEFAULT_SEVERITIES: &[&str] = &["Critical", "High", "Medium", "Low"];

/// Contiguous, inclusive range of archive years
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YearRange {
    start: u16,
    end: u16,
}

impl YearRange {
    pub fn new(start: u16, end: u16) -> Result<Self> {
        if start > end {
            return Err(ChronicleError::config(format!(
                "start year {} is after end year {}",
                start, end
            )));
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> u16 {
        self.start
    }

    pub fn end(&self) -> u16 {
        self.end
    }

    pub fn len(&self) -> usize {
        usize::from(self.end - self.start) + 1
    }

    /// A validated range always holds at least one year
    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn years(&self) -> RangeInclusive<u16> {
        self.start..=self.end
    }

    pub fn contains(&self, year: u16) -> bool {
        self.years().contains(&year)
    }
}

impl Default for YearRange {
    fn default() -> Self {
        Self {
            start: DEFAULT_START_YEAR,
            end: DEFAULT_END_YEAR,
        }
    }
}

/// Recognized categorical values, as read from the `[catalog]` config table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogLists {
    pub sectors: Vec<String>,
    pub incident_types: Vec<String>,
    pub severities: Vec<String>,
}

impl Default for CatalogLists {
    fn default() -> Self {
        fn owned(values: &[&str]) -> Vec<String> {
            values.iter().map(|v| v.to_string()).collect()
        }
        Self {
            sectors: owned(DEFAULT_SECTORS),
            incident_types: owned(DEFAULT_INCIDENT_TYPES),
            severities: owned(DEFAULT_SEVERITIES),
        }
    }
}

/// The single source of truth for filterable values
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    years: YearRange,
    lists: CatalogLists,
}

impl Catalog {
    pub fn new(years: YearRange, lists: CatalogLists) -> Self {
        Self { years, lists }
    }

    pub fn years(&self) -> YearRange {
        self.years
    }

    /// Recognized values for one dimension. Years are listed newest first.
    pub fn recognized(&self, dimension: FilterDimension) -> Vec<String> {
        match dimension {
            FilterDimension::Year => self
                .years
                .years()
                .rev()
                .map(|year| format!("{:04}", year))
                .collect(),
            FilterDimension::Sector => self.lists.sectors.clone(),
            FilterDimension::IncidentType => self.lists.incident_types.clone(),
            FilterDimension::Severity => self.lists.severities.clone(),
        }
    }

    /// Recognized values followed by any extra values observed in the archive
    /// (sorted; years descending), without duplicates.
    pub fn options(&self, dimension: FilterDimension, archive: Option<&Archive>) -> Vec<String> {
        let mut options = self.recognized(dimension);
        let Some(archive) = archive else {
            return options;
        };

        let known: BTreeSet<String> = options.iter().cloned().collect();
        let mut extras: BTreeSet<String> = BTreeSet::new();
        for entry in archive.entries() {
            let value = dimension.value_of(entry);
            if !value.is_empty() && !known.contains(value) {
                extras.insert(value.to_string());
            }
        }

        match dimension {
            FilterDimension::Year => options.extend(extras.into_iter().rev()),
            _ => options.extend(extras),
        }
        options
    }
}
