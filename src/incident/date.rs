//! Incident dates, including the "unknown date" sentinel.
//!
//! Archive dates are year-first (`YYYY-MM-DD`). Records whose exact date was never
//! verified carry a sentinel with a zero month and/or day (`2000-0-0`, `2015-06-00`,
//! `0000-00-00`). Those must never be turned into a calendar date, but they still
//! need a year label for searching and filtering and a place in the timeline.

use chrono::{Datelike, NaiveDate};
use std::cmp::Ordering;
use std::fmt;

/// Parsed form of an incident's `date` field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IncidentDate {
    /// A real calendar date
    Known(NaiveDate),
    /// Sentinel or unparsable date; `year` is the literal text before the first `-`
    Unknown { year: String },
}

impl IncidentDate {
    /// Parse a raw date string. Never fails: anything that is not a real calendar
    /// date becomes [`IncidentDate::Unknown`].
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        // Tolerate timestamps such as `2017-05-01T10:00:00Z`
        let date_part = trimmed
            .split(|c: char| c == 'T' || c == ' ')
            .next()
            .unwrap_or(trimmed);

        let mut parts = date_part.splitn(3, '-');
        let year_text = parts.next().unwrap_or("").trim();
        let month = parts.next().and_then(|m| m.trim().parse::<u32>().ok());
        let day = parts.next().and_then(|d| d.trim().parse::<u32>().ok());
        let year = year_text.parse::<i32>().ok();

        match (year, month, day) {
            (Some(y), Some(m), Some(d)) if y > 0 && m > 0 && d > 0 => {
                match NaiveDate::from_ymd_opt(y, m, d) {
                    Some(date) => IncidentDate::Known(date),
                    None => Self::unknown(year_text),
                }
            }
            _ => Self::unknown(year_text),
        }
    }

    fn unknown(year_text: &str) -> Self {
        IncidentDate::Unknown {
            year: year_text.to_string(),
        }
    }

    /// True for the sentinel / unparsable form
    pub fn is_unknown(&self) -> bool {
        matches!(self, IncidentDate::Unknown { .. })
    }

    /// Year used for text search and the year filter.
    ///
    /// Known dates yield a zero-padded four-digit year; unknown dates yield the
    /// literal year portion of the raw string.
    pub fn year_label(&self) -> String {
        match self {
            IncidentDate::Known(date) => format!("{:04}", date.year()),
            IncidentDate::Unknown { year } => year.clone(),
        }
    }

    /// Numeric year of a known date, or of an unknown date whose year portion is a
    /// plausible non-zero number.
    pub fn year(&self) -> Option<i32> {
        match self {
            IncidentDate::Known(date) => Some(date.year()),
            IncidentDate::Unknown { year } => year.parse::<i32>().ok().filter(|y| *y > 0),
        }
    }

    /// Compact form for table cells, e.g. `5 May 2017`
    pub fn short_display(&self) -> String {
        match self {
            IncidentDate::Known(date) => date.format("%-d %b %Y").to_string(),
            IncidentDate::Unknown { .. } => self.unknown_display(),
        }
    }

    /// Long form for the detail view, e.g. `5 May 2017`
    pub fn long_display(&self) -> String {
        match self {
            IncidentDate::Known(date) => date.format("%-d %B %Y").to_string(),
            IncidentDate::Unknown { .. } => self.unknown_display(),
        }
    }

    /// Timeline ordering: every unknown date sorts before every known date and
    /// unknown dates tie with each other, so stable sorts keep their input order.
    pub fn timeline_cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (IncidentDate::Known(a), IncidentDate::Known(b)) => a.cmp(b),
            (IncidentDate::Unknown { .. }, IncidentDate::Unknown { .. }) => Ordering::Equal,
            (IncidentDate::Unknown { .. }, IncidentDate::Known(_)) => Ordering::Less,
            (IncidentDate::Known(_), IncidentDate::Unknown { .. }) => Ordering::Greater,
        }
    }

    fn unknown_display(&self) -> String {
        match self.year() {
            Some(year) => format!("{} (date unverified)", year),
            None => "Date unknown".to_string(),
        }
    }
}

impl fmt::Display for IncidentDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.short_display())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_calendar_dates() {
        let date = IncidentDate::parse("2017-05-01");
        assert_eq!(
            date,
            IncidentDate::Known(NaiveDate::from_ymd_opt(2017, 5, 1).unwrap())
        );
        assert_eq!(date.year_label(), "2017");
        assert_eq!(date.short_display(), "1 May 2017");
        assert_eq!(date.long_display(), "1 May 2017");
    }

    #[test]
    fn sentinel_dates_are_never_calendar_dates() {
        for raw in ["2000-0-0", "2015-06-00", "2015-00-12", "0000-00-00"] {
            assert!(IncidentDate::parse(raw).is_unknown(), "{raw}");
        }
        assert_eq!(IncidentDate::parse("2000-0-0").year_label(), "2000");
        assert_eq!(IncidentDate::parse("0000-00-00").year_label(), "0000");
    }

    #[test]
    fn impossible_and_garbage_dates_degrade() {
        let feb = IncidentDate::parse("2017-02-30");
        assert_eq!(feb, IncidentDate::Unknown { year: "2017".into() });

        let garbage = IncidentDate::parse("sometime");
        assert_eq!(garbage.year_label(), "sometime");
        assert_eq!(garbage.year(), None);
        assert_eq!(garbage.short_display(), "Date unknown");

        assert_eq!(IncidentDate::parse("").year_label(), "");
    }

    #[test]
    fn accepts_timestamps() {
        let date = IncidentDate::parse("2021-11-09T08:30:00Z");
        assert_eq!(date.year_label(), "2021");
        assert!(!date.is_unknown());
    }

    #[test]
    fn unknown_sorts_before_everything() {
        let mut dates = vec![
            IncidentDate::parse("2019-01-01"),
            IncidentDate::parse("2000-0-0"),
            IncidentDate::parse("2001-03-04"),
            IncidentDate::parse("2025-00-00"),
        ];
        dates.sort_by(|a, b| a.timeline_cmp(b));
        assert!(dates[0].is_unknown());
        assert!(dates[1].is_unknown());
        assert_eq!(dates[2].year_label(), "2001");
        assert_eq!(dates[3].year_label(), "2019");
    }

    #[test]
    fn unknown_display_uses_plausible_year() {
        assert_eq!(
            IncidentDate::parse("2015-06-00").long_display(),
            "2015 (date unverified)"
        );
        assert_eq!(IncidentDate::parse("0000-00-00").long_display(), "Date unknown");
    }
}
