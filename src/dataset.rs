//! Per-year dataset retrieval and aggregation.

pub mod archive;
pub mod directory;
pub mod http;
pub mod loader;
pub mod source;

pub use archive::{Archive, ArchiveEntry, LoadReport, YearStatus};
pub use directory::DirectorySource;
pub use http::HttpSource;
pub use loader::{spawn_load, DatasetLoader, LoadState, DEFAULT_FETCH_TIMEOUT};
pub use source::{decode_records, parse_year_body, DatasetSource, YearOutcome};
