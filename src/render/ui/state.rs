//! UI state management structures
//!
//! Everything the renderer draws lives here and is owned by the coordinator loop.
//! Query evaluation and pagination are delegated to the query engine and the
//! pager; this module only keeps their results together with the selection.

use crate::catalog::Catalog;
use crate::dataset::{Archive, LoadReport};
use crate::pager::Pager;
use crate::query::{matching_indices, FilterDimension, FilterSelection};
use crate::stats::ArchiveStats;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Progress of the session's dataset load as the screens see it
#[derive(Debug, Clone)]
pub enum DatasetStatus {
    Loading { source: String },
    Failed { message: String },
    Ready {
        archive: Arc<Archive>,
        report: LoadReport,
        stats: ArchiveStats,
    },
}

impl DatasetStatus {
    pub fn archive(&self) -> Option<&Arc<Archive>> {
        match self {
            DatasetStatus::Ready { archive, .. } => Some(archive),
            _ => None,
        }
    }
}

/// Which screen is showing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Screen {
    Browse,
    Detail { id: String, scroll: u16 },
}

/// Search text, filters and the paged result set
#[derive(Debug, Clone)]
pub struct BrowseState {
    pub query: String,
    pub filters: FilterSelection,
    /// Archive positions of the current results, newest first
    pub results: Vec<usize>,
    pub pager: Pager,
    /// Row within the current page
    pub selected: usize,
}

impl BrowseState {
    pub fn new(query: impl Into<String>, pager: Pager) -> Self {
        Self {
            query: query.into(),
            filters: FilterSelection::new(),
            results: Vec::new(),
            pager,
            selected: 0,
        }
    }

    /// Re-run the query; the pager goes back to page 1
    pub fn refresh(&mut self, archive: &Archive) {
        self.results = matching_indices(archive, &self.query, &self.filters);
        self.pager.set_total_items(self.results.len());
        self.selected = 0;
    }

    /// Archive positions shown on the current page
    pub fn visible(&self) -> &[usize] {
        self.pager.slice(&self.results)
    }

    pub fn selected_position(&self) -> Option<usize> {
        self.visible().get(self.selected).copied()
    }

    pub fn move_selection(&mut self, down: bool) {
        let rows = self.visible().len();
        if rows == 0 {
            self.selected = 0;
        } else if down {
            self.selected = (self.selected + 1).min(rows - 1);
        } else {
            self.selected = self.selected.saturating_sub(1);
        }
    }

    /// Apply a page move and reset the row selection if the page changed
    pub fn turn_page(&mut self, turn: impl FnOnce(&mut Pager)) {
        let before = self.pager.current_page();
        turn(&mut self.pager);
        if self.pager.current_page() != before {
            self.selected = 0;
        }
    }
}

/// Filter side panel: focus, cursor and the options per dimension
#[derive(Debug, Clone)]
pub struct FilterPanelState {
    pub open: bool,
    pub dimension: FilterDimension,
    pub cursor: usize,
    pub options: BTreeMap<FilterDimension, Vec<String>>,
}

impl FilterPanelState {
    pub fn new(catalog: &Catalog) -> Self {
        let mut panel = Self {
            open: false,
            dimension: FilterDimension::Year,
            cursor: 0,
            options: BTreeMap::new(),
        };
        panel.reload_options(catalog, None);
        panel
    }

    /// Recompute options once the archive arrives so observed values show up
    pub fn reload_options(&mut self, catalog: &Catalog, archive: Option<&Archive>) {
        self.options = FilterDimension::ALL
            .iter()
            .map(|dimension| (*dimension, catalog.options(*dimension, archive)))
            .collect();
        self.clamp_cursor();
    }

    pub fn current_options(&self) -> &[String] {
        self.options
            .get(&self.dimension)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn current_value(&self) -> Option<&str> {
        self.current_options().get(self.cursor).map(String::as_str)
    }

    pub fn switch_dimension(&mut self, dimension: FilterDimension) {
        self.dimension = dimension;
        self.cursor = 0;
    }

    pub fn move_cursor(&mut self, down: bool) {
        if down {
            self.cursor += 1;
        } else {
            self.cursor = self.cursor.saturating_sub(1);
        }
        self.clamp_cursor();
    }

    fn clamp_cursor(&mut self) {
        let len = self.current_options().len();
        self.cursor = self.cursor.min(len.saturating_sub(1));
    }
}

/// Prompt currently being typed on the status line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Prompt {
    Search(String),
    Page(String),
}

/// Status line information
#[derive(Debug, Clone, Default)]
pub struct StatusLine {
    pub message: Option<String>,
    pub prompt: Option<Prompt>,
}

impl StatusLine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a temporary message
    pub fn set_message(&mut self, message: impl Into<String>) {
        self.message = Some(message.into());
    }

    pub fn clear_message(&mut self) {
        self.message = None;
    }

    pub fn set_prompt(&mut self, prompt: Prompt) {
        self.prompt = Some(prompt);
    }

    pub fn clear_prompt(&mut self) {
        self.prompt = None;
    }

    /// Text for the left side of the status line
    pub fn format_status_line(&self, hint: Option<&str>) -> String {
        match (&self.prompt, &self.message) {
            (Some(Prompt::Search(buffer)), _) => format!("/{}", buffer),
            (Some(Prompt::Page(buffer)), _) => format!("Go to page: {}", buffer),
            (None, Some(message)) => message.clone(),
            (None, None) => hint.unwrap_or_default().to_string(),
        }
    }
}

/// Complete screen state for one session
#[derive(Debug, Clone)]
pub struct ViewState {
    pub dataset: DatasetStatus,
    pub screen: Screen,
    pub browse: BrowseState,
    pub filter_panel: FilterPanelState,
    pub status_line: StatusLine,
    pub terminal_width: u16,
    pub terminal_height: u16,
}

impl ViewState {
    pub fn new(
        source: impl Into<String>,
        catalog: &Catalog,
        pager: Pager,
        terminal_width: u16,
        terminal_height: u16,
    ) -> Self {
        Self {
            dataset: DatasetStatus::Loading {
                source: source.into(),
            },
            screen: Screen::Browse,
            browse: BrowseState::new(String::new(), pager),
            filter_panel: FilterPanelState::new(catalog),
            status_line: StatusLine::new(),
            terminal_width,
            terminal_height,
        }
    }

    pub fn archive(&self) -> Option<&Arc<Archive>> {
        self.dataset.archive()
    }

    /// Re-run the browse query against the loaded archive, if any
    pub fn refresh_results(&mut self) {
        if let Some(archive) = self.dataset.archive().cloned() {
            self.browse.refresh(&archive);
        }
    }

    /// Partial-coverage note from the load report
    pub fn coverage_hint(&self) -> Option<String> {
        match &self.dataset {
            DatasetStatus::Ready { report, .. } => report.coverage_hint(),
            _ => None,
        }
    }

    /// Returns true if dimensions actually changed
    pub fn update_terminal_size(&mut self, width: u16, height: u16) -> bool {
        let changed = self.terminal_width != width || self.terminal_height != height;
        self.terminal_width = width;
        self.terminal_height = height;
        changed
    }
}
