//! # incident-chronicle - Terminal Browser for Cyber-Security Incident Archives
//!
//! Loads a year-partitioned archive of documented cyber incidents, merges it into a
//! single collection, and lets you search, filter, page through and inspect it.
//!
//! ## Features
//!
//! - **Concurrent loading**: one request per year, missing and malformed years tolerated
//! - **Search and filters**: substring search plus year/sector/type/severity filters
//! - **Newest first**: stable date ordering with undated records kept at the end
//! - **Terminal UI**: paged table, filter panel and a formatted detail view
//!
//! ## Architecture
//!
//! - [`error`] - Centralized error types and handling
//! - [`incident`] - Record data model and date handling
//! - [`catalog`] - Recognized categorical values and the year range
//! - [`dataset`] - Per-year sources, the concurrent loader and the merged archive
//! - [`query`] - Search and filter evaluation
//! - [`pager`] - Page slicing and navigation
//! - [`detail`] - Id lookup and description formatting
//! - [`render::ui`](crate::render::ui) - Terminal user interface components
//! - [`app`] - Application core and component coordination

// Core modules
pub mod config;
pub mod error;
pub mod incident;

// Data pipeline
pub mod catalog;
pub mod dataset;
pub mod detail;
pub mod pager;
pub mod query;
pub mod stats;

// Terminal browser
pub mod app;
pub mod input;
pub mod render;

// Re-export commonly used types for convenience
pub use error::{ChronicleError, Result};

// Public API surface for external usage
pub use app::{Application, SessionOptions};
pub use catalog::{Catalog, YearRange};
pub use config::{ChronicleConfig, ConfigFile, ConfigOverrides, ThemeName};
pub use dataset::{Archive, DatasetLoader, DatasetSource, LoadReport, LoadState, YearOutcome};
pub use incident::Incident;
pub use pager::Pager;
pub use query::{FilterDimension, FilterSelection};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
