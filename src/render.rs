//! Rendering subsystem: the browse controller, the terminal UI and plain-text output.

pub mod service;
pub mod text;
pub mod ui;

pub use service::BrowseController;
