//! Incident record data model.
//!
//! An [`Incident`] is one documented cyber incident exactly as it appears in the
//! per-year JSON files. Records are immutable once loaded; derived values (parsed
//! date, search text) live in the [`Archive`](crate::dataset::Archive) next to them.

pub mod date;

pub use date::IncidentDate;

use serde::{Deserialize, Serialize};

/// One citation backing an incident record. Citation order is meaningful.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Source {
    pub title: String,
    pub url: String,
    #[serde(rename = "type", default)]
    pub kind: String,
}

/// One documented cyber incident.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Incident {
    pub id: String,
    pub date: String,
    pub organization: String,
    pub sector: String,
    pub incident_type: String,
    #[serde(default)]
    pub attack_method: String,
    #[serde(default)]
    pub root_cause: String,
    #[serde(default)]
    pub impact: String,
    pub severity: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub sources: Vec<Source>,
    #[serde(default)]
    pub verification_status: String,
}

/// Reasons a decoded record is rejected from the archive
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordDefect {
    MissingId,
    MissingOrganization,
}

impl std::fmt::Display for RecordDefect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RecordDefect::MissingId => f.write_str("empty id"),
            RecordDefect::MissingOrganization => f.write_str("empty organization"),
        }
    }
}

impl Incident {
    /// Parse the raw `date` field
    pub fn parsed_date(&self) -> IncidentDate {
        IncidentDate::parse(&self.date)
    }

    /// Check the record-level invariants that the archive relies on
    pub fn validate(&self) -> Result<(), RecordDefect> {
        if self.id.trim().is_empty() {
            return Err(RecordDefect::MissingId);
        }
        if self.organization.trim().is_empty() {
            return Err(RecordDefect::MissingOrganization);
        }
        Ok(())
    }

    pub fn severity_level(&self) -> SeverityLevel {
        SeverityLevel::classify(&self.severity)
    }

    pub fn verification(&self) -> Verification {
        Verification::classify(&self.verification_status)
    }
}

/// Display classification of the free-form `severity` string.
///
/// Storage and filtering stay case-sensitive; only presentation is folded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeverityLevel {
    Critical,
    High,
    Medium,
    Low,
    Unrated,
}

impl SeverityLevel {
    pub fn classify(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "critical" => SeverityLevel::Critical,
            "high" => SeverityLevel::High,
            "medium" => SeverityLevel::Medium,
            "low" => SeverityLevel::Low,
            _ => SeverityLevel::Unrated,
        }
    }
}

/// Display classification of `verificationStatus`, an open set
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verification {
    Verified,
    Unverified,
    Disputed,
    NotStated,
    Other,
}

impl Verification {
    pub fn classify(raw: &str) -> Self {
        let folded = raw.trim().to_ascii_lowercase();
        match folded.as_str() {
            "" => Verification::NotStated,
            "verified" => Verification::Verified,
            "unverified" => Verification::Unverified,
            "disputed" => Verification::Disputed,
            _ => Verification::Other,
        }
    }

    /// Label to show for a raw status; unrecognized values are shown verbatim
    pub fn label(raw: &str) -> &str {
        match Self::classify(raw) {
            Verification::NotStated => "Not stated",
            _ => raw.trim(),
        }
    }
}
