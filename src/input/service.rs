//! High-level input service.
//!
//! Reads terminal events, runs the browse input state machine, and yields
//! domain-level `InputAction`s that the coordinator applies to the current screen.
//! The state machine only tracks text prompts (search, go-to-page); which screen
//! an action applies to is decided by the coordinator.

use crate::error::Result;
use ratatui::crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::time::Duration;

/// Poll timeout used when the caller does not provide one.
const DEFAULT_POLL_TIMEOUT_MS: u64 = 50;

/// Current input mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputState {
    Navigation,
    SearchInput,
    PageInput,
}

/// Vertical movement of the selection (browse) or scroll position (detail)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveDirection {
    Up,
    Down,
}

/// Record field used by the detail view's quick searches
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuickField {
    Organization,
    Sector,
    IncidentType,
}

/// High-level input actions emitted by the state machine/service.
#[derive(Debug, Clone, PartialEq)]
pub enum InputAction {
    Move(MoveDirection),
    NextPage,
    PreviousPage,
    FirstPage,
    LastPage,
    StartSearch,
    /// Live update of the search prompt
    UpdateSearch(String),
    CommitSearch(String),
    CancelSearch,
    StartPageInput,
    UpdatePageInput(String),
    GoToPage(usize),
    CancelPageInput,
    ToggleFilterPanel,
    NextFilterDimension,
    PreviousFilterDimension,
    ToggleFilterValue,
    ClearFilters,
    /// Enter: open the selected incident
    Open,
    /// Esc/Backspace outside a prompt
    Back,
    QuickSearch(QuickField),
    Quit,
    Resize {
        width: u16,
        height: u16,
    },
    NoAction,
    InvalidInput,
}

/// Key binding state machine for the browse and detail screens
pub struct InputStateMachine {
    state: InputState,
    buffer: String,
}

fn plain(modifiers: KeyModifiers) -> bool {
    !modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT)
}

impl InputStateMachine {
    pub fn new() -> Self {
        Self {
            state: InputState::Navigation,
            buffer: String::new(),
        }
    }

    pub fn handle_key_event(&mut self, key_event: KeyEvent) -> InputAction {
        if key_event.kind != KeyEventKind::Press {
            return InputAction::NoAction;
        }
        if key_event.code == KeyCode::Char('c') && key_event.modifiers.contains(KeyModifiers::CONTROL) {
            self.reset();
            return InputAction::Quit;
        }

        match self.state {
            InputState::Navigation => self.handle_navigation(key_event),
            InputState::SearchInput => self.handle_search(key_event),
            InputState::PageInput => self.handle_page_input(key_event),
        }
    }

    fn handle_navigation(&mut self, key_event: KeyEvent) -> InputAction {
        let modifiers = key_event.modifiers;
        match key_event.code {
            KeyCode::Char('j') if plain(modifiers) => InputAction::Move(MoveDirection::Down),
            KeyCode::Down => InputAction::Move(MoveDirection::Down),
            KeyCode::Char('k') if plain(modifiers) => InputAction::Move(MoveDirection::Up),
            KeyCode::Up => InputAction::Move(MoveDirection::Up),
            KeyCode::Char('l') | KeyCode::Char('n') if plain(modifiers) => InputAction::NextPage,
            KeyCode::Right | KeyCode::PageDown => InputAction::NextPage,
            KeyCode::Char('h') | KeyCode::Char('p') if plain(modifiers) => InputAction::PreviousPage,
            KeyCode::Left | KeyCode::PageUp => InputAction::PreviousPage,
            KeyCode::Char('g') if plain(modifiers) => InputAction::FirstPage,
            KeyCode::Home => InputAction::FirstPage,
            KeyCode::Char('G') if plain(modifiers) => InputAction::LastPage,
            KeyCode::End => InputAction::LastPage,
            KeyCode::Char('/') if plain(modifiers) => {
                self.state = InputState::SearchInput;
                self.buffer.clear();
                InputAction::StartSearch
            }
            KeyCode::Char(':') if plain(modifiers) => {
                self.state = InputState::PageInput;
                self.buffer.clear();
                InputAction::StartPageInput
            }
            KeyCode::Char('f') if plain(modifiers) => InputAction::ToggleFilterPanel,
            KeyCode::Tab => InputAction::NextFilterDimension,
            KeyCode::BackTab => InputAction::PreviousFilterDimension,
            KeyCode::Char(' ') if plain(modifiers) => InputAction::ToggleFilterValue,
            KeyCode::Char('c') if plain(modifiers) => InputAction::ClearFilters,
            KeyCode::Enter => InputAction::Open,
            KeyCode::Esc | KeyCode::Backspace => InputAction::Back,
            KeyCode::Char('o') if plain(modifiers) => InputAction::QuickSearch(QuickField::Organization),
            KeyCode::Char('s') if plain(modifiers) => InputAction::QuickSearch(QuickField::Sector),
            KeyCode::Char('t') if plain(modifiers) => InputAction::QuickSearch(QuickField::IncidentType),
            KeyCode::Char('q') if plain(modifiers) => InputAction::Quit,
            _ => InputAction::InvalidInput,
        }
    }

    fn handle_search(&mut self, key_event: KeyEvent) -> InputAction {
        match key_event.code {
            KeyCode::Char(ch) if plain(key_event.modifiers) && !ch.is_control() => {
                self.buffer.push(ch);
                InputAction::UpdateSearch(self.buffer.clone())
            }
            KeyCode::Backspace => {
                self.buffer.pop();
                InputAction::UpdateSearch(self.buffer.clone())
            }
            KeyCode::Enter => {
                self.state = InputState::Navigation;
                InputAction::CommitSearch(std::mem::take(&mut self.buffer))
            }
            KeyCode::Esc => {
                self.reset();
                InputAction::CancelSearch
            }
            _ => InputAction::NoAction,
        }
    }

    fn handle_page_input(&mut self, key_event: KeyEvent) -> InputAction {
        match key_event.code {
            KeyCode::Char(ch) if ch.is_ascii_digit() => {
                self.buffer.push(ch);
                InputAction::UpdatePageInput(self.buffer.clone())
            }
            KeyCode::Backspace => {
                if self.buffer.pop().is_none() {
                    self.state = InputState::Navigation;
                    return InputAction::CancelPageInput;
                }
                InputAction::UpdatePageInput(self.buffer.clone())
            }
            KeyCode::Enter => {
                // Only digits reach the buffer, so a parse failure means overflow
                let page = (!self.buffer.is_empty())
                    .then(|| self.buffer.parse::<usize>().unwrap_or(usize::MAX));
                self.reset();
                match page {
                    Some(page) => InputAction::GoToPage(page),
                    None => InputAction::CancelPageInput,
                }
            }
            KeyCode::Esc => {
                self.reset();
                InputAction::CancelPageInput
            }
            _ => InputAction::InvalidInput,
        }
    }

    fn reset(&mut self) {
        self.state = InputState::Navigation;
        self.buffer.clear();
    }

    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    pub fn state(&self) -> InputState {
        self.state
    }
}

impl Default for InputStateMachine {
    fn default() -> Self {
        Self::new()
    }
}

/// Service responsible for producing high-level `InputAction`s from terminal events.
pub struct InputService {
    state_machine: InputStateMachine,
}

impl InputService {
    pub fn new() -> Self {
        Self {
            state_machine: InputStateMachine::new(),
        }
    }

    /// Wait up to `timeout` for terminal events and translate everything queued
    pub fn poll_actions(&mut self, timeout: Option<Duration>) -> Result<Vec<InputAction>> {
        let mut actions = Vec::new();
        let timeout = timeout.unwrap_or(Duration::from_millis(DEFAULT_POLL_TIMEOUT_MS));

        if event::poll(timeout)? {
            actions.extend(self.process_event(event::read()?));
            while event::poll(Duration::ZERO)? {
                actions.extend(self.process_event(event::read()?));
            }
        }

        Ok(actions)
    }

    pub fn process_event(&mut self, event: Event) -> Option<InputAction> {
        let action = match event {
            Event::Key(key_event) => self.state_machine.handle_key_event(key_event),
            Event::Resize(width, height) => InputAction::Resize { width, height },
            _ => InputAction::NoAction,
        };

        match action {
            InputAction::NoAction | InputAction::InvalidInput => None,
            _ => Some(action),
        }
    }
}

impl Default for InputService {
    fn default() -> Self {
        Self::new()
    }
}
