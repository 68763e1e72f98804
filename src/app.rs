//! Application orchestration layer
//!
//! Wires the dataset load, the input thread and the renderer together. The
//! coordinator loop owns the view state and reacts to two event sources: input
//! actions from the terminal thread and load-state changes from the loader.

pub mod runtime;

use crate::catalog::Catalog;
use crate::dataset::{spawn_load, DatasetLoader, LoadState};
use crate::error::Result;
use crate::input::InputAction;
use crate::pager::Pager;
use crate::render::ui::{Screen, UIRenderer, ViewState};
use crate::render::BrowseController;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, watch};

const INPUT_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// How the browser opens
#[derive(Debug, Clone, Default)]
pub struct SessionOptions {
    /// Initial search text
    pub query: Option<String>,
    /// Open directly on this incident's detail screen
    pub incident: Option<String>,
    /// Fixed page size; derived from the terminal height when `None`
    pub page_size: Option<usize>,
}

/// Application orchestrator
pub struct Application {
    loader: DatasetLoader,
    catalog: Catalog,
    ui_renderer: Box<dyn UIRenderer>,
    options: SessionOptions,
}

impl Application {
    pub fn new(
        loader: DatasetLoader,
        catalog: Catalog,
        ui_renderer: Box<dyn UIRenderer>,
        options: SessionOptions,
    ) -> Self {
        Self {
            loader,
            catalog,
            ui_renderer,
            options,
        }
    }

    /// Build the initial view state for a terminal of the given size
    pub fn initial_view(&self, width: u16, height: u16) -> ViewState {
        let pager = match self.options.page_size {
            Some(size) => Pager::new(size),
            None => Pager::from_display_rows(height),
        };
        let mut view_state = ViewState::new(
            self.loader.source().describe(),
            &self.catalog,
            pager,
            width,
            height,
        );
        if let Some(query) = &self.options.query {
            view_state.browse.query = query.clone();
        }
        if let Some(id) = &self.options.incident {
            view_state.screen = Screen::Detail {
                id: id.clone(),
                scroll: 0,
            };
        }
        view_state
    }

    /// Run the interactive session until the user quits
    pub async fn run(&mut self) -> Result<()> {
        self.ui_renderer.initialize()?;

        let shutdown = Arc::new(AtomicBool::new(false));
        let (input_tx, input_rx) = mpsc::unbounded_channel();
        let input_thread =
            runtime::spawn_input_thread(input_tx, Arc::clone(&shutdown), INPUT_POLL_INTERVAL);

        let load_rx = spawn_load(self.loader.clone());
        let outcome = self.event_loop(input_rx, load_rx).await;

        shutdown.store(true, Ordering::SeqCst);
        if input_thread.join().is_err() {
            log::warn!("input thread panicked");
        }
        self.ui_renderer.cleanup()?;
        outcome
    }

    /// Coordinator loop, separated from terminal setup so it can be driven by tests
    pub async fn event_loop(
        &mut self,
        mut input_rx: mpsc::UnboundedReceiver<InputAction>,
        mut load_rx: watch::Receiver<LoadState>,
    ) -> Result<()> {
        let (width, height) = self.ui_renderer.get_terminal_size()?;
        let mut view_state = self.initial_view(width, height);
        let mut controller = BrowseController::new(self.catalog.clone());
        let mut load_open = true;

        let initial = (*load_rx.borrow_and_update()).clone();
        controller.apply_load_state(initial, &mut view_state);
        self.ui_renderer.render(&view_state)?;

        loop {
            tokio::select! {
                action = input_rx.recv() => {
                    let Some(action) = action else { break };
                    if !controller.process_action(action, &mut view_state) {
                        break;
                    }
                    // Drain whatever queued up behind this action before redrawing
                    while let Ok(action) = input_rx.try_recv() {
                        if !controller.process_action(action, &mut view_state) {
                            return Ok(());
                        }
                    }
                }
                changed = load_rx.changed(), if load_open => {
                    if changed.is_err() {
                        load_open = false;
                        continue;
                    }
                    let state = (*load_rx.borrow_and_update()).clone();
                    controller.apply_load_state(state, &mut view_state);
                }
            }

            self.ui_renderer.render(&view_state)?;
        }

        Ok(())
    }
}
