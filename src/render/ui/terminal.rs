//! Terminal UI implementation using ratatui
//!
//! Concrete [`UIRenderer`] that draws the loading/failure screens, the browse
//! table with its filter panel and pager footer, and the incident detail screen.
//! It reads everything from [`ViewState`] and never mutates session data.

use crate::dataset::ArchiveEntry;
use crate::detail::{format_description, Block as DescriptionBlock, Inline, Resolution};
use crate::error::{ChronicleError, Result};
use crate::incident::{SeverityLevel, Verification};
use crate::pager::PageLink;
use crate::query::FilterDimension;
use crate::render::ui::state::{DatasetStatus, Screen, ViewState};
use crate::render::ui::{ColorTheme, UIRenderer};
use ratatui::crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, List, ListItem, ListState, Paragraph, Row, Table, TableState, Wrap},
    Frame, Terminal,
};
use std::io::{self, Stdout};

type CrosstermTerminal = Terminal<CrosstermBackend<Stdout>>;

const FILTER_PANEL_WIDTH: u16 = 34;

/// Terminal UI implementation with ratatui backend
pub struct TerminalUI {
    terminal: Option<CrosstermTerminal>,
    theme: ColorTheme,
}

impl TerminalUI {
    pub fn new() -> Result<Self> {
        Self::with_theme(ColorTheme::default())
    }

    pub fn with_theme(theme: ColorTheme) -> Result<Self> {
        Ok(Self {
            terminal: None,
            theme,
        })
    }

    fn render_loading(frame: &mut Frame, area: Rect, source: &str, theme: &ColorTheme) {
        let text = vec![
            Line::from(Span::styled("Loading incidents…", theme.header)),
            Line::from(Span::styled(
                source.to_string(),
                Style::default().fg(theme.muted),
            )),
        ];
        frame.render_widget(
            Paragraph::new(text).alignment(Alignment::Center),
            centered(area, 3),
        );
    }

    fn render_failed(frame: &mut Frame, area: Rect, message: &str, theme: &ColorTheme) {
        let text = vec![
            Line::from(Span::styled(
                "The incident archive could not be loaded.",
                Style::default()
                    .fg(theme.error_text)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(message.to_string()),
            Line::default(),
            Line::from(Span::styled("Press q to quit.", Style::default().fg(theme.muted))),
        ];
        frame.render_widget(
            Paragraph::new(text)
                .alignment(Alignment::Center)
                .wrap(Wrap { trim: true }),
            centered(area, 5),
        );
    }

    fn render_browse(frame: &mut Frame, area: Rect, view_state: &ViewState, theme: &ColorTheme) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Min(3),
                Constraint::Length(1),
            ])
            .split(area);

        Self::render_header(frame, chunks[0], view_state, theme);
        Self::render_query_line(frame, chunks[1], view_state, theme);

        let body = if view_state.filter_panel.open {
            let columns = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Min(20), Constraint::Length(FILTER_PANEL_WIDTH)])
                .split(chunks[2]);
            Self::render_filter_panel(frame, columns[1], view_state, theme);
            columns[0]
        } else {
            chunks[2]
        };
        Self::render_table(frame, body, view_state, theme);
        Self::render_pager(frame, chunks[3], view_state, theme);
    }

    fn render_header(frame: &mut Frame, area: Rect, view_state: &ViewState, theme: &ColorTheme) {
        let mut spans = vec![Span::styled("Incident Chronicle", theme.header)];
        if let DatasetStatus::Ready { stats, .. } = &view_state.dataset {
            spans.push(Span::raw("  "));
            spans.push(Span::styled(stats.summary(), Style::default().fg(theme.muted)));
        }
        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }

    fn render_query_line(frame: &mut Frame, area: Rect, view_state: &ViewState, theme: &ColorTheme) {
        let browse = &view_state.browse;
        let total = view_state.archive().map(|a| a.len()).unwrap_or(0);
        let query = if browse.query.is_empty() {
            Span::styled("(none, press / to search)", Style::default().fg(theme.muted))
        } else {
            Span::styled(browse.query.clone(), theme.accent)
        };
        let mut spans = vec![Span::raw("Search: "), query];
        let active = browse.filters.active_count();
        if active > 0 {
            spans.push(Span::raw("  Filters: "));
            spans.push(Span::styled(format!("{} active", active), theme.accent));
        }
        spans.push(Span::raw(format!(
            "  {} of {} incidents",
            browse.results.len(),
            total
        )));
        frame.render_widget(Paragraph::new(Line::from(spans)).style(theme.text()), area);
    }

    fn render_table(frame: &mut Frame, area: Rect, view_state: &ViewState, theme: &ColorTheme) {
        let Some(archive) = view_state.archive() else {
            return;
        };
        let browse = &view_state.browse;

        if browse.results.is_empty() {
            let message = Paragraph::new("No incidents match the current search and filters.")
                .alignment(Alignment::Center)
                .block(Block::default().borders(Borders::ALL));
            frame.render_widget(message, area);
            return;
        }

        let header = Row::new(vec![
            "Date",
            "Organization",
            "Sector",
            "Type",
            "Attack Method",
            "Root Cause",
            "Severity",
            "Src",
        ])
        .style(theme.header);

        let rows: Vec<Row> = browse
            .visible()
            .iter()
            .filter_map(|position| archive.entry(*position))
            .map(|entry| Self::table_row(entry, theme))
            .collect();

        let widths = [
            Constraint::Length(12),
            Constraint::Min(16),
            Constraint::Length(16),
            Constraint::Length(15),
            Constraint::Length(18),
            Constraint::Length(18),
            Constraint::Length(10),
            Constraint::Length(3),
        ];

        let table = Table::new(rows, widths)
            .header(header)
            .block(Block::default().borders(Borders::ALL))
            .highlight_style(theme.selection)
            .highlight_symbol("▶ ");

        let mut state = TableState::default();
        if !view_state.filter_panel.open {
            state.select(Some(browse.selected));
        }
        frame.render_stateful_widget(table, area, &mut state);
    }

    fn table_row<'a>(entry: &'a ArchiveEntry, theme: &ColorTheme) -> Row<'a> {
        let incident = entry.incident();
        Row::new(vec![
            Cell::from(Span::styled(
                entry.date().short_display(),
                Style::default().fg(theme.muted),
            )),
            Cell::from(incident.organization.as_str()),
            Cell::from(incident.sector.as_str()),
            Cell::from(incident.incident_type.as_str()),
            Cell::from(incident.attack_method.as_str()),
            Cell::from(incident.root_cause.as_str()),
            Cell::from(severity_badge(&incident.severity, incident.severity_level(), theme)),
            Cell::from(incident.sources.len().to_string()),
        ])
        .style(theme.text())
    }

    fn render_filter_panel(frame: &mut Frame, area: Rect, view_state: &ViewState, theme: &ColorTheme) {
        let panel = &view_state.filter_panel;
        let filters = &view_state.browse.filters;

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(FilterDimension::ALL.len() as u16 + 2), Constraint::Min(3)])
            .split(area);

        let dimensions: Vec<Line> = FilterDimension::ALL
            .iter()
            .map(|dimension| {
                let count = filters.values(*dimension).count();
                let label = if count > 0 {
                    format!("{} ({})", dimension.label(), count)
                } else {
                    dimension.label().to_string()
                };
                if *dimension == panel.dimension {
                    Line::from(Span::styled(format!("▸ {}", label), theme.accent))
                } else {
                    Line::from(format!("  {}", label))
                }
            })
            .collect();
        frame.render_widget(
            Paragraph::new(dimensions).block(
                Block::default()
                    .borders(Borders::ALL)
                    .title("Filters (Tab)"),
            ),
            chunks[0],
        );

        let items: Vec<ListItem> = panel
            .current_options()
            .iter()
            .map(|value| {
                let checked = filters.contains(panel.dimension, value);
                let mark = if checked { "[x] " } else { "[ ] " };
                let style = if checked { theme.accent } else { theme.text() };
                ListItem::new(Line::from(Span::styled(format!("{}{}", mark, value), style)))
            })
            .collect();
        let list = List::new(items)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title("Space toggle · c clear"),
            )
            .highlight_style(theme.selection);
        let mut state = ListState::default();
        state.select(Some(panel.cursor));
        frame.render_stateful_widget(list, chunks[1], &mut state);
    }

    fn render_pager(frame: &mut Frame, area: Rect, view_state: &ViewState, theme: &ColorTheme) {
        let pager = &view_state.browse.pager;
        let mut spans = Vec::new();
        match pager.showing() {
            Some((first, last, total)) => spans.push(Span::raw(format!(
                "Showing {} to {} of {} incidents   ",
                first, last, total
            ))),
            None => spans.push(Span::raw("No results   ")),
        }
        for link in pager.page_window() {
            match link {
                PageLink::Page(page) if page == pager.current_page() => {
                    spans.push(Span::styled(format!("[{}]", page), theme.accent))
                }
                PageLink::Page(page) => spans.push(Span::raw(format!(" {} ", page))),
                PageLink::Ellipsis => spans.push(Span::styled(" … ", Style::default().fg(theme.muted))),
            }
        }
        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }

    fn render_detail(
        frame: &mut Frame,
        area: Rect,
        view_state: &ViewState,
        id: &str,
        scroll: u16,
        theme: &ColorTheme,
    ) {
        let Some(archive) = view_state.archive() else {
            return;
        };
        let lines = match archive.resolve(id) {
            Resolution::Found(entry) => detail_lines(entry, theme),
            Resolution::NotFound { id } => vec![
                Line::from(Span::styled(
                    "Incident not found",
                    Style::default()
                        .fg(theme.error_text)
                        .add_modifier(Modifier::BOLD),
                )),
                Line::default(),
                Line::from(format!("No incident with id \"{}\" exists in the archive.", id)),
                Line::from(Span::styled(
                    "Press Esc to return to the incident list.",
                    Style::default().fg(theme.muted),
                )),
            ],
        };

        let paragraph = Paragraph::new(lines)
            .block(Block::default().borders(Borders::ALL))
            .wrap(Wrap { trim: false })
            .scroll((scroll, 0));
        frame.render_widget(paragraph, area);
    }

    fn render_status(frame: &mut Frame, area: Rect, view_state: &ViewState, theme: &ColorTheme) {
        let hint = view_state.coverage_hint();
        let text = view_state.status_line.format_status_line(hint.as_deref());
        let keys = match view_state.screen {
            Screen::Browse => "/ search  f filters  Enter open  q quit",
            Screen::Detail { .. } => "Esc back  o/s/t search  q quit",
        };

        let status_style = Style::default().bg(theme.status_bg).fg(theme.status_fg);
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Min(10), Constraint::Length(keys.len() as u16 + 1)])
            .split(area);
        frame.render_widget(Paragraph::new(text).style(status_style), columns[0]);
        frame.render_widget(
            Paragraph::new(keys)
                .alignment(Alignment::Right)
                .style(status_style),
            columns[1],
        );
    }
}

/// Severity cell: the raw value styled by its case-insensitive classification
fn severity_badge(raw: &str, level: SeverityLevel, theme: &ColorTheme) -> Span<'static> {
    let label = if raw.trim().is_empty() { "Unrated" } else { raw };
    Span::styled(format!(" {} ", label), theme.severity_style(level))
}

fn inline_spans(runs: Vec<Inline>, theme: &ColorTheme) -> Vec<Span<'static>> {
    runs.into_iter()
        .map(|run| match run {
            Inline::Text(text) => Span::styled(text, theme.text()),
            Inline::Bold(text) => Span::styled(text, theme.text().add_modifier(Modifier::BOLD)),
        })
        .collect()
}

fn section(title: &str, theme: &ColorTheme) -> Vec<Line<'static>> {
    vec![Line::default(), Line::from(Span::styled(title.to_string(), theme.header))]
}

/// Lines of the detail screen for one incident
pub fn detail_lines(entry: &ArchiveEntry, theme: &ColorTheme) -> Vec<Line<'static>> {
    let incident = entry.incident();
    let muted = Style::default().fg(theme.muted);
    let mut lines = vec![
        Line::from(Span::styled(
            incident.organization.clone(),
            theme.header.add_modifier(Modifier::BOLD),
        )),
        Line::from(vec![
            severity_badge(&incident.severity, incident.severity_level(), theme),
            Span::raw("  "),
            Span::styled(
                Verification::label(&incident.verification_status).to_string(),
                theme.verification_style(incident.verification()),
            ),
        ]),
        Line::default(),
    ];

    for (label, value) in [
        ("Date", entry.date().long_display()),
        ("Sector", incident.sector.clone()),
        ("Incident type", incident.incident_type.clone()),
        ("Attack method", incident.attack_method.clone()),
        ("Root cause", incident.root_cause.clone()),
    ] {
        lines.push(Line::from(vec![
            Span::styled(format!("{:<15}", label), muted),
            Span::styled(value, theme.text()),
        ]));
    }

    lines.extend(section("Description", theme));
    let blocks = format_description(&incident.description);
    if blocks.is_empty() {
        lines.push(Line::from(Span::styled("No description available.", muted)));
    }
    let mut previous_was_item = false;
    for (index, block) in blocks.into_iter().enumerate() {
        match block {
            DescriptionBlock::Paragraph(runs) => {
                if index > 0 {
                    lines.push(Line::default());
                }
                lines.push(Line::from(inline_spans(runs, theme)));
                previous_was_item = false;
            }
            DescriptionBlock::ListItem { marker, content } => {
                if index > 0 && !previous_was_item {
                    lines.push(Line::default());
                }
                let mut spans = vec![Span::styled(format!("  {} ", marker), theme.accent)];
                spans.extend(inline_spans(content, theme));
                lines.push(Line::from(spans));
                previous_was_item = true;
            }
        }
    }

    if !incident.impact.trim().is_empty() {
        lines.extend(section("Impact", theme));
        lines.push(Line::from(Span::styled(incident.impact.clone(), theme.text())));
    }

    lines.extend(section("Sources", theme));
    if incident.sources.is_empty() {
        lines.push(Line::from(Span::styled("No sources listed.", muted)));
    }
    for (number, source) in incident.sources.iter().enumerate() {
        let mut spans = vec![Span::raw(format!("{}. ", number + 1)), Span::styled(source.title.clone(), theme.text())];
        if !source.kind.is_empty() {
            spans.push(Span::styled(format!(" ({})", source.kind), muted));
        }
        lines.push(Line::from(spans));
        lines.push(Line::from(Span::styled(format!("   {}", source.url), muted)));
    }

    lines.push(Line::default());
    lines.push(Line::from(Span::styled(format!("Incident ID: {}", incident.id), muted)));
    lines
}

/// A band of `height` rows vertically centered in `area`
fn centered(area: Rect, height: u16) -> Rect {
    let height = height.min(area.height);
    Rect {
        x: area.x,
        y: area.y + (area.height - height) / 2,
        width: area.width,
        height,
    }
}

impl UIRenderer for TerminalUI {
    fn render(&mut self, view_state: &ViewState) -> Result<()> {
        if let Some(ref mut terminal) = self.terminal {
            // Extract theme before closure to avoid borrowing issues
            let theme = &self.theme;

            terminal.draw(move |frame| {
                let size = frame.size();
                let chunks = Layout::default()
                    .direction(Direction::Vertical)
                    .constraints([Constraint::Min(0), Constraint::Length(1)])
                    .split(size);

                match (&view_state.dataset, &view_state.screen) {
                    (DatasetStatus::Loading { source }, _) => {
                        Self::render_loading(frame, chunks[0], source, theme)
                    }
                    (DatasetStatus::Failed { message }, _) => {
                        Self::render_failed(frame, chunks[0], message, theme)
                    }
                    (DatasetStatus::Ready { .. }, Screen::Browse) => {
                        Self::render_browse(frame, chunks[0], view_state, theme)
                    }
                    (DatasetStatus::Ready { .. }, Screen::Detail { id, scroll }) => {
                        Self::render_detail(frame, chunks[0], view_state, id, *scroll, theme)
                    }
                }

                Self::render_status(frame, chunks[1], view_state, theme);
            })?;
        }
        Ok(())
    }

    fn initialize(&mut self) -> Result<()> {
        enable_raw_mode()
            .map_err(|err| ChronicleError::ui(format!("cannot enable raw mode: {}", err)))?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)
            .map_err(|err| ChronicleError::ui(format!("cannot enter alternate screen: {}", err)))?;

        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;
        terminal.hide_cursor()?;
        self.terminal = Some(terminal);

        Ok(())
    }

    fn cleanup(&mut self) -> Result<()> {
        if let Some(mut terminal) = self.terminal.take() {
            disable_raw_mode()?;
            execute!(io::stdout(), LeaveAlternateScreen)?;
            terminal.show_cursor()?;
        }
        Ok(())
    }

    fn get_terminal_size(&self) -> Result<(u16, u16)> {
        let (cols, rows) = ratatui::crossterm::terminal::size()?;
        Ok((cols, rows))
    }
}

impl Drop for TerminalUI {
    fn drop(&mut self) {
        let _ = self.cleanup();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::incident::fixtures::incident;
    use crate::incident::Source;
    use crate::dataset::Archive;
    use ratatui::style::Color;

    fn line_text(line: &Line) -> String {
        line.spans.iter().map(|span| span.content.as_ref()).collect()
    }

    #[test]
    fn test_terminal_ui_creation() {
        let ui = TerminalUI::new().unwrap();
        assert!(ui.terminal.is_none());
        assert_eq!(ui.theme.status_bg, Color::Blue);

        let ui = TerminalUI::with_theme(ColorTheme::monochrome()).unwrap();
        assert_eq!(ui.theme.status_bg, Color::Black);
    }

    #[test]
    fn test_detail_lines_cover_record() {
        let mut record = incident("inc-042", "2017-05-01", "Example Bank", "Banking", "critical");
        record.description = "Attackers used **phishing**.\n\n- Stage one\n- Stage two".into();
        record.verification_status = String::new();
        record.sources = vec![
            Source {
                title: "First report".into(),
                url: "https://example.org/a".into(),
                kind: "News".into(),
            },
            Source {
                title: "Second report".into(),
                url: "https://example.org/b".into(),
                kind: String::new(),
            },
        ];
        let archive = Archive::from_incidents(vec![record]);
        let entry = archive.entry(0).unwrap();

        let text: Vec<String> = detail_lines(entry, &ColorTheme::default())
            .iter()
            .map(line_text)
            .collect();

        assert_eq!(text[0], "Example Bank");
        assert!(text[1].contains(" critical "));
        assert!(text[1].contains("Not stated"));
        assert!(text.iter().any(|l| l.contains("1 May 2017")));
        assert!(text.iter().any(|l| l == "Attackers used phishing."));
        assert!(text.iter().any(|l| l == "  • Stage one"));
        let first = text.iter().position(|l| l.starts_with("1. First report")).unwrap();
        let second = text.iter().position(|l| l.starts_with("2. Second report")).unwrap();
        assert!(first < second);
        assert_eq!(text.last().map(String::as_str), Some("Incident ID: inc-042"));
    }

    #[test]
    fn test_centered_band() {
        let area = Rect::new(0, 0, 80, 20);
        assert_eq!(centered(area, 4), Rect::new(0, 8, 80, 4));
        assert_eq!(centered(area, 40), area);
    }
}
