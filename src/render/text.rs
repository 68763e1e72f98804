//! Plain-text rendering for `--print` mode.

use crate::dataset::{Archive, ArchiveEntry, LoadReport};
use crate::detail::{format_description, Block, Inline};
use crate::incident::Verification;
use crate::stats::ArchiveStats;

fn inline_text(runs: &[Inline]) -> String {
    runs.iter()
        .map(|run| match run {
            Inline::Text(text) => text.as_str(),
            Inline::Bold(text) => text.as_str(),
        })
        .collect()
}

fn or_dash(value: &str) -> &str {
    if value.trim().is_empty() {
        "-"
    } else {
        value
    }
}

/// Join lines into newline-terminated output
fn finish(lines: Vec<String>) -> String {
    let mut out = lines.join("\n");
    out.push('\n');
    out
}

/// Statistics, counts and one line per matching incident
pub fn render_listing(archive: &Archive, results: &[usize], report: &LoadReport) -> String {
    let mut lines = vec![ArchiveStats::compute(archive).summary()];
    if let Some(hint) = report.coverage_hint() {
        lines.push(format!("note: {}", hint));
    }
    lines.push(format!("{} of {} incidents match", results.len(), archive.len()));

    lines.extend(
        results
            .iter()
            .filter_map(|position| archive.entry(*position))
            .map(|entry| {
                let incident = entry.incident();
                format!(
                    "{:<12}  {}  [{}]  {}  {}  ({})",
                    entry.date().short_display(),
                    incident.organization,
                    or_dash(&incident.sector),
                    or_dash(&incident.incident_type),
                    or_dash(&incident.severity),
                    incident.id
                )
            }),
    );
    finish(lines)
}

/// Full detail of one incident
pub fn render_detail(entry: &ArchiveEntry) -> String {
    let incident = entry.incident();
    let mut lines = vec![
        incident.organization.clone(),
        format!(
            "Severity: {}    Verification: {}",
            or_dash(&incident.severity),
            Verification::label(&incident.verification_status)
        ),
        String::new(),
        format!("Date:          {}", entry.date().long_display()),
        format!("Sector:        {}", or_dash(&incident.sector)),
        format!("Incident type: {}", or_dash(&incident.incident_type)),
        format!("Attack method: {}", or_dash(&incident.attack_method)),
        format!("Root cause:    {}", or_dash(&incident.root_cause)),
        String::new(),
        "Description".to_string(),
    ];

    let blocks = format_description(&incident.description);
    if blocks.is_empty() {
        lines.push("No description available.".to_string());
    }
    lines.extend(blocks.iter().map(|block| match block {
        Block::Paragraph(runs) => inline_text(runs),
        Block::ListItem { marker, content } => format!("  {} {}", marker, inline_text(content)),
    }));

    if !incident.impact.trim().is_empty() {
        lines.extend([String::new(), "Impact".to_string(), incident.impact.clone()]);
    }

    lines.extend([String::new(), "Sources".to_string()]);
    if incident.sources.is_empty() {
        lines.push("No sources listed.".to_string());
    }
    for (number, source) in incident.sources.iter().enumerate() {
        if source.kind.is_empty() {
            lines.push(format!("{}. {}", number + 1, source.title));
        } else {
            lines.push(format!("{}. {} ({})", number + 1, source.title, source.kind));
        }
        lines.push(format!("   {}", source.url));
    }

    lines.extend([String::new(), format!("Incident ID: {}", incident.id)]);
    finish(lines)
}

pub fn render_not_found(id: &str) -> String {
    format!("No incident with id \"{}\" exists in the archive.\n", id)
}
