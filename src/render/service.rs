//! Render coordination helpers.
//!
//! [`BrowseController`] mediates between input actions, load-state updates and the
//! view state. It owns no session data of its own beyond the query saved while the
//! search prompt is open, so every screen can be rebuilt from [`ViewState`].

use crate::catalog::Catalog;
use crate::dataset::LoadState;
use crate::detail::Resolution;
use crate::input::{InputAction, MoveDirection, QuickField};
use crate::pager::Pager;
use crate::render::ui::{DatasetStatus, Prompt, Screen, ViewState};
use crate::stats::ArchiveStats;

/// Lines scrolled by a page key on the detail screen
const DETAIL_PAGE_LINES: u16 = 10;

/// Applies input actions and load progress to the view state
#[derive(Debug, Clone, Default)]
pub struct BrowseController {
    catalog: Catalog,
    /// Query in effect when the search prompt opened; restored on cancel
    saved_query: Option<String>,
}

impl BrowseController {
    pub fn new(catalog: Catalog) -> Self {
        Self {
            catalog,
            saved_query: None,
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Reflect a load-state change in the view
    pub fn apply_load_state(&mut self, state: LoadState, view_state: &mut ViewState) {
        match state {
            LoadState::Loading => {
                if !matches!(view_state.dataset, DatasetStatus::Loading { .. }) {
                    view_state.dataset = DatasetStatus::Loading {
                        source: String::new(),
                    };
                }
            }
            LoadState::Failed(message) => {
                view_state.dataset = DatasetStatus::Failed { message };
            }
            LoadState::Ready(archive, report) => {
                let stats = ArchiveStats::compute(&archive);
                view_state
                    .filter_panel
                    .reload_options(&self.catalog, Some(&archive));
                view_state.dataset = DatasetStatus::Ready {
                    archive,
                    report,
                    stats,
                };
                view_state.refresh_results();
            }
        }
    }

    /// Apply one input action. Returns `false` when the session should end.
    pub fn process_action(&mut self, action: InputAction, view_state: &mut ViewState) -> bool {
        match action {
            InputAction::Quit => return false,
            InputAction::Resize { width, height } => {
                view_state.update_terminal_size(width, height);
            }
            InputAction::NoAction | InputAction::InvalidInput => {}
            action => match view_state.screen {
                Screen::Browse => self.process_browse(action, view_state),
                Screen::Detail { .. } => self.process_detail(action, view_state),
            },
        }
        true
    }

    fn process_browse(&mut self, action: InputAction, view_state: &mut ViewState) {
        match action {
            InputAction::Move(direction) => {
                let down = direction == MoveDirection::Down;
                if view_state.filter_panel.open {
                    view_state.filter_panel.move_cursor(down);
                } else {
                    view_state.browse.move_selection(down);
                }
            }
            InputAction::NextPage => view_state.browse.turn_page(Pager::next),
            InputAction::PreviousPage => view_state.browse.turn_page(Pager::previous),
            InputAction::FirstPage => view_state.browse.turn_page(Pager::first),
            InputAction::LastPage => view_state.browse.turn_page(Pager::last),
            InputAction::ToggleFilterPanel => {
                view_state.filter_panel.open = !view_state.filter_panel.open;
            }
            InputAction::NextFilterDimension if view_state.filter_panel.open => {
                let next = view_state.filter_panel.dimension.next();
                view_state.filter_panel.switch_dimension(next);
            }
            InputAction::PreviousFilterDimension if view_state.filter_panel.open => {
                let previous = view_state.filter_panel.dimension.previous();
                view_state.filter_panel.switch_dimension(previous);
            }
            InputAction::ToggleFilterValue if view_state.filter_panel.open => {
                let dimension = view_state.filter_panel.dimension;
                if let Some(value) = view_state.filter_panel.current_value().map(str::to_string) {
                    view_state.browse.filters.toggle(dimension, &value);
                    view_state.refresh_results();
                }
            }
            InputAction::ClearFilters => {
                if !view_state.browse.filters.is_empty() {
                    view_state.browse.filters.clear();
                    view_state.refresh_results();
                    view_state.status_line.set_message("Filters cleared");
                }
            }
            InputAction::Open if view_state.filter_panel.open => {
                view_state.filter_panel.open = false;
            }
            InputAction::Open => self.open_selected(view_state),
            InputAction::Back if view_state.filter_panel.open => {
                view_state.filter_panel.open = false;
            }
            action => self.process_prompt(action, view_state),
        }
    }

    fn process_detail(&mut self, action: InputAction, view_state: &mut ViewState) {
        let Screen::Detail { id, scroll } = &mut view_state.screen else {
            return;
        };
        match action {
            InputAction::Move(MoveDirection::Down) => *scroll = scroll.saturating_add(1),
            InputAction::Move(MoveDirection::Up) => *scroll = scroll.saturating_sub(1),
            InputAction::NextPage => *scroll = scroll.saturating_add(DETAIL_PAGE_LINES),
            InputAction::PreviousPage => *scroll = scroll.saturating_sub(DETAIL_PAGE_LINES),
            InputAction::FirstPage => *scroll = 0,
            InputAction::Back => view_state.screen = Screen::Browse,
            InputAction::QuickSearch(field) => {
                let id = id.clone();
                self.quick_search(&id, field, view_state);
            }
            InputAction::StartSearch | InputAction::StartPageInput => {
                view_state.screen = Screen::Browse;
                self.process_prompt(action, view_state);
            }
            // The prompt keys keep flowing after StartSearch switched screens
            action => self.process_prompt(action, view_state),
        }
    }

    /// Search and go-to-page prompt handling, shared by both screens
    fn process_prompt(&mut self, action: InputAction, view_state: &mut ViewState) {
        match action {
            InputAction::StartSearch => {
                self.saved_query = Some(view_state.browse.query.clone());
                view_state.status_line.clear_message();
                view_state.status_line.set_prompt(Prompt::Search(String::new()));
            }
            InputAction::UpdateSearch(buffer) => {
                view_state.browse.query = buffer.clone();
                view_state.refresh_results();
                view_state.status_line.set_prompt(Prompt::Search(buffer));
            }
            InputAction::CommitSearch(buffer) => {
                self.saved_query = None;
                view_state.browse.query = buffer;
                view_state.refresh_results();
                view_state.status_line.clear_prompt();
            }
            InputAction::CancelSearch => {
                if let Some(saved) = self.saved_query.take() {
                    view_state.browse.query = saved;
                    view_state.refresh_results();
                }
                view_state.status_line.clear_prompt();
            }
            InputAction::StartPageInput => {
                view_state.status_line.clear_message();
                view_state.status_line.set_prompt(Prompt::Page(String::new()));
            }
            InputAction::UpdatePageInput(buffer) => {
                view_state.status_line.set_prompt(Prompt::Page(buffer));
            }
            InputAction::GoToPage(page) => {
                view_state.status_line.clear_prompt();
                view_state.browse.turn_page(|pager| pager.go_to(page));
                let landed = view_state.browse.pager.current_page();
                if landed != page {
                    view_state.status_line.set_message(format!(
                        "Page {} does not exist; showing page {} of {}",
                        page,
                        landed,
                        view_state.browse.pager.total_pages()
                    ));
                }
            }
            InputAction::CancelPageInput => view_state.status_line.clear_prompt(),
            _ => {}
        }
    }

    fn open_selected(&mut self, view_state: &mut ViewState) {
        let Some(archive) = view_state.archive() else {
            return;
        };
        let selected = view_state
            .browse
            .selected_position()
            .and_then(|position| archive.get(position))
            .map(|incident| incident.id.clone());
        match selected {
            Some(id) => {
                view_state.status_line.clear_message();
                view_state.screen = Screen::Detail { id, scroll: 0 };
            }
            None => view_state.status_line.set_message("No incident selected"),
        }
    }

    fn quick_search(&mut self, id: &str, field: QuickField, view_state: &mut ViewState) {
        let Some(archive) = view_state.archive().cloned() else {
            return;
        };
        let Resolution::Found(entry) = archive.resolve(id) else {
            return;
        };
        let incident = entry.incident();
        let value = match field {
            QuickField::Organization => &incident.organization,
            QuickField::Sector => &incident.sector,
            QuickField::IncidentType => &incident.incident_type,
        };

        view_state.browse.query = value.clone();
        view_state.browse.filters.clear();
        view_state.refresh_results();
        view_state.screen = Screen::Browse;
        view_state
            .status_line
            .set_message(format!("Searching for \"{}\"", value));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::{Archive, LoadReport};
    use crate::incident::fixtures::incident;
    use crate::query::FilterDimension;
    use std::sync::Arc;

    fn ready_view(controller: &mut BrowseController, count: usize) -> ViewState {
        let records = (0..count)
            .map(|n| {
                incident(
                    &format!("inc-{:03}", n),
                    &format!("{}-03-01", 2000 + n % 20),
                    &format!("Org {}", n),
                    if n % 3 == 0 { "Banking" } else { "Energy" },
                    if n % 2 == 0 { "Critical" } else { "Low" },
                )
            })
            .collect();
        let archive = Arc::new(Archive::from_incidents(records));
        let mut view = ViewState::new("test", controller.catalog(), Pager::new(10), 100, 30);
        controller.apply_load_state(LoadState::Ready(archive, LoadReport::default()), &mut view);
        view
    }

    #[test]
    fn ready_state_populates_results() {
        let mut controller = BrowseController::default();
        let view = ready_view(&mut controller, 25);
        assert_eq!(view.browse.results.len(), 25);
        assert_eq!(view.browse.pager.total_pages(), 3);
        assert!(matches!(view.dataset, DatasetStatus::Ready { .. }));
    }

    #[test]
    fn failed_state_is_shown() {
        let mut controller = BrowseController::default();
        let mut view = ViewState::new("test", controller.catalog(), Pager::default(), 80, 24);
        controller.apply_load_state(LoadState::Failed("task panicked".into()), &mut view);
        assert!(matches!(view.dataset, DatasetStatus::Failed { ref message } if message == "task panicked"));
    }

    #[test]
    fn live_search_and_cancel_restores_query() {
        let mut controller = BrowseController::default();
        let mut view = ready_view(&mut controller, 30);

        controller.process_action(InputAction::CommitSearch("banking".into()), &mut view);
        assert_eq!(view.browse.results.len(), 10);

        controller.process_action(InputAction::StartSearch, &mut view);
        controller.process_action(InputAction::UpdateSearch("org 1".into()), &mut view);
        assert_eq!(view.browse.query, "org 1");
        assert_eq!(view.status_line.prompt, Some(Prompt::Search("org 1".into())));

        controller.process_action(InputAction::CancelSearch, &mut view);
        assert_eq!(view.browse.query, "banking");
        assert_eq!(view.browse.results.len(), 10);
        assert_eq!(view.status_line.prompt, None);
    }

    #[test]
    fn committed_query_keeps_its_whitespace() {
        let mut controller = BrowseController::default();
        let mut view = ready_view(&mut controller, 30);

        controller.process_action(InputAction::CommitSearch("banking ".into()), &mut view);
        assert_eq!(view.browse.query, "banking ");
        assert_eq!(view.browse.results.len(), 10);

        // No record's search text starts with a space
        controller.process_action(InputAction::CommitSearch(" org".into()), &mut view);
        assert_eq!(view.browse.query, " org");
        assert!(view.browse.results.is_empty());
    }

    #[test]
    fn search_resets_to_first_page() {
        let mut controller = BrowseController::default();
        let mut view = ready_view(&mut controller, 40);
        controller.process_action(InputAction::LastPage, &mut view);
        assert_eq!(view.browse.pager.current_page(), 4);

        controller.process_action(InputAction::CommitSearch("energy".into()), &mut view);
        assert_eq!(view.browse.pager.current_page(), 1);
    }

    #[test]
    fn go_to_page_clamps_with_message() {
        let mut controller = BrowseController::default();
        let mut view = ready_view(&mut controller, 25);
        controller.process_action(InputAction::StartPageInput, &mut view);
        controller.process_action(InputAction::GoToPage(5), &mut view);
        assert_eq!(view.browse.pager.current_page(), 3);
        assert_eq!(
            view.status_line.message.as_deref(),
            Some("Page 5 does not exist; showing page 3 of 3")
        );

        controller.process_action(InputAction::FirstPage, &mut view);
        controller.process_action(InputAction::GoToPage(usize::MAX), &mut view);
        assert_eq!(view.browse.pager.current_page(), 3);
    }

    #[test]
    fn filter_panel_toggles_values() {
        let mut controller = BrowseController::default();
        let mut view = ready_view(&mut controller, 30);

        // Toggle is ignored while the panel is closed
        controller.process_action(InputAction::ToggleFilterValue, &mut view);
        assert!(view.browse.filters.is_empty());

        controller.process_action(InputAction::ToggleFilterPanel, &mut view);
        for _ in 0..3 {
            controller.process_action(InputAction::NextFilterDimension, &mut view);
        }
        assert_eq!(view.filter_panel.dimension, FilterDimension::Severity);
        controller.process_action(InputAction::ToggleFilterValue, &mut view);
        assert!(view.browse.filters.contains(FilterDimension::Severity, "Critical"));
        assert_eq!(view.browse.results.len(), 15);

        controller.process_action(InputAction::ClearFilters, &mut view);
        assert_eq!(view.browse.results.len(), 30);
        controller.process_action(InputAction::Back, &mut view);
        assert!(!view.filter_panel.open);
    }

    #[test]
    fn open_detail_and_quick_search() {
        let mut controller = BrowseController::default();
        let mut view = ready_view(&mut controller, 30);
        controller.process_action(InputAction::Move(MoveDirection::Down), &mut view);
        let expected = view
            .archive()
            .and_then(|archive| archive.get(view.browse.selected_position().unwrap()))
            .map(|incident| incident.id.clone())
            .unwrap();

        controller.process_action(InputAction::Open, &mut view);
        assert_eq!(
            view.screen,
            Screen::Detail {
                id: expected.clone(),
                scroll: 0
            }
        );

        controller.process_action(InputAction::Move(MoveDirection::Down), &mut view);
        assert!(matches!(view.screen, Screen::Detail { scroll: 1, .. }));

        controller.process_action(InputAction::QuickSearch(QuickField::Sector), &mut view);
        assert_eq!(view.screen, Screen::Browse);
        let sector = view
            .archive()
            .and_then(|archive| archive.position_of(&expected).and_then(|p| archive.get(p)))
            .map(|incident| incident.sector.clone())
            .unwrap();
        assert_eq!(view.browse.query, sector);
    }

    #[test]
    fn back_leaves_detail_and_quit_ends() {
        let mut controller = BrowseController::default();
        let mut view = ready_view(&mut controller, 5);
        view.screen = Screen::Detail {
            id: "does-not-exist".into(),
            scroll: 0,
        };
        assert!(controller.process_action(InputAction::Back, &mut view));
        assert_eq!(view.screen, Screen::Browse);
        assert!(!controller.process_action(InputAction::Quit, &mut view));
    }
}
