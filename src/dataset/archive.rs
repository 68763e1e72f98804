//! The merged, in-memory incident collection.
//!
//! [`Archive::assemble`] folds the tagged per-year outcomes into one collection:
//! chunks are concatenated in year order (within-year order preserved), invalid
//! and duplicate records are dropped, and the result is stable-sorted ascending by
//! date with unknown dates first. Search text and the id index are computed once
//! here so queries and detail lookups never redo that work.

use crate::dataset::source::YearOutcome;
use crate::detail::{IncidentIndex, Resolution};
use crate::incident::{Incident, IncidentDate};
use std::collections::HashSet;

/// An incident together with the values derived from it at load time
#[derive(Debug, Clone, PartialEq)]
pub struct ArchiveEntry {
    incident: Incident,
    date: IncidentDate,
    year_label: String,
    haystack: String,
}

impl ArchiveEntry {
    fn new(incident: Incident) -> Self {
        let date = incident.parsed_date();
        let year_label = date.year_label();
        let haystack = [
            incident.organization.as_str(),
            incident.sector.as_str(),
            incident.incident_type.as_str(),
            incident.attack_method.as_str(),
            incident.root_cause.as_str(),
            year_label.as_str(),
        ]
        .join(" ")
        .to_lowercase();

        Self {
            incident,
            date,
            year_label,
            haystack,
        }
    }

    pub fn incident(&self) -> &Incident {
        &self.incident
    }

    pub fn date(&self) -> &IncidentDate {
        &self.date
    }

    /// Year used by the year filter and text search
    pub fn year_label(&self) -> &str {
        &self.year_label
    }

    /// Lowercased, space-joined searchable fields
    pub fn haystack(&self) -> &str {
        &self.haystack
    }
}

/// What happened to one year during a load
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum YearStatus {
    Loaded(usize),
    Missing,
    Malformed(String),
    Failed(String),
}

impl YearStatus {
    pub fn is_available(&self) -> bool {
        matches!(self, YearStatus::Loaded(_))
    }
}

/// Diagnostics for a completed load
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub years: Vec<(u16, YearStatus)>,
    /// Records dropped because they failed validation
    pub rejected: usize,
    /// Records dropped because their id was already present
    pub duplicates: usize,
}

impl LoadReport {
    pub fn unavailable_years(&self) -> Vec<u16> {
        self.years
            .iter()
            .filter(|(_, status)| !status.is_available())
            .map(|(year, _)| *year)
            .collect()
    }

    /// Short partial-coverage note, `None` when every year loaded cleanly
    pub fn coverage_hint(&self) -> Option<String> {
        let unavailable = self.unavailable_years().len();
        let mut notes = Vec::new();
        if unavailable > 0 {
            notes.push(format!(
                "{} of {} years unavailable",
                unavailable,
                self.years.len()
            ));
        }
        if self.rejected > 0 {
            notes.push(format!("{} invalid records skipped", self.rejected));
        }
        if self.duplicates > 0 {
            notes.push(format!("{} duplicate ids skipped", self.duplicates));
        }
        if notes.is_empty() {
            None
        } else {
            Some(notes.join(", "))
        }
    }
}

/// The merged incident collection, sorted ascending by date
#[derive(Debug, Clone, Default)]
pub struct Archive {
    entries: Vec<ArchiveEntry>,
    index: IncidentIndex,
}

impl Archive {
    /// Merge per-year outcomes (in year order) into an archive plus load report
    pub fn assemble(chunks: Vec<(u16, YearOutcome)>) -> (Self, LoadReport) {
        let mut report = LoadReport::default();
        let mut entries = Vec::new();
        let mut seen: HashSet<String> = HashSet::new();

        for (year, outcome) in chunks {
            let status = match outcome {
                YearOutcome::Loaded(records) => {
                    let count = records.len();
                    for incident in records {
                        if let Err(defect) = incident.validate() {
                            log::warn!(
                                "skipping record {:?} from {}: {}",
                                incident.id,
                                year,
                                defect
                            );
                            report.rejected += 1;
                            continue;
                        }
                        if !seen.insert(incident.id.clone()) {
                            log::warn!("skipping duplicate incident id {:?} from {}", incident.id, year);
                            report.duplicates += 1;
                            continue;
                        }
                        entries.push(ArchiveEntry::new(incident));
                    }
                    YearStatus::Loaded(count)
                }
                YearOutcome::Missing => {
                    log::debug!("no dataset for {}", year);
                    YearStatus::Missing
                }
                YearOutcome::Malformed(cause) => {
                    log::warn!("malformed dataset for {}: {}", year, cause);
                    YearStatus::Malformed(cause)
                }
                YearOutcome::Failed(cause) => {
                    log::warn!("dataset for {} could not be retrieved: {}", year, cause);
                    YearStatus::Failed(cause)
                }
            };
            report.years.push((year, status));
        }

        entries.sort_by(|a, b| a.date.timeline_cmp(&b.date));
        let index = IncidentIndex::build(entries.iter().map(|entry| entry.incident.id.as_str()));

        (Self { entries, index }, report)
    }

    /// Merge per-year outcomes, discarding the report
    pub fn merge(chunks: Vec<(u16, YearOutcome)>) -> Self {
        Self::assemble(chunks).0
    }

    /// Build an archive from a flat list of records (single anonymous chunk)
    pub fn from_incidents(incidents: Vec<Incident>) -> Self {
        Self::merge(vec![(0, YearOutcome::Loaded(incidents))])
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in ascending date order
    pub fn entries(&self) -> &[ArchiveEntry] {
        &self.entries
    }

    pub fn entry(&self, position: usize) -> Option<&ArchiveEntry> {
        self.entries.get(position)
    }

    pub fn get(&self, position: usize) -> Option<&Incident> {
        self.entry(position).map(ArchiveEntry::incident)
    }

    pub fn incidents(&self) -> impl Iterator<Item = &Incident> + '_ {
        self.entries.iter().map(ArchiveEntry::incident)
    }

    /// Position of the record with `id`
    pub fn position_of(&self, id: &str) -> Option<usize> {
        self.index.position(id)
    }

    /// Look up one record by id for the detail view
    pub fn resolve(&self, id: &str) -> Resolution<'_> {
        match self.position_of(id).and_then(|position| self.entry(position)) {
            Some(entry) => Resolution::Found(entry),
            None => Resolution::NotFound { id: id.to_string() },
        }
    }
}
