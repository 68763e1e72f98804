//! Year-addressed dataset sources.
//!
//! A [`DatasetSource`] retrieves one year's chunk of incident records. Sources never
//! return errors: every per-year result is a tagged [`YearOutcome`] that the loader
//! folds into the merge explicitly.

use crate::error::{ChronicleError, Result};
use crate::incident::Incident;
use async_trait::async_trait;

/// Result of retrieving one year's chunk
#[derive(Debug, Clone, PartialEq)]
pub enum YearOutcome {
    /// Chunk retrieved and decoded (possibly empty)
    Loaded(Vec<Incident>),
    /// No resource for this year, or the retrieval timed out
    Missing,
    /// Wrong content type or undecodable body
    Malformed(String),
    /// Any other per-year failure (transport errors, unexpected status, IO)
    Failed(String),
}

/// Core trait for per-year incident retrieval.
///
/// Implementations must be thread-safe: the loader issues every year's request
/// concurrently from separate tasks.
#[async_trait]
pub trait DatasetSource: Send + Sync {
    /// Retrieve the chunk for `year`
    async fn fetch_year(&self, year: u16) -> YearOutcome;

    /// Human readable location of the dataset, for logs and status messages
    fn describe(&self) -> String;
}

/// Decode a JSON array of incident records
pub fn decode_records(body: &[u8]) -> Result<Vec<Incident>> {
    serde_json::from_slice(body)
        .map_err(|err| ChronicleError::parse(format!("invalid incident JSON: {}", err)))
}

/// Decode a per-year body, folding a decode failure into `Malformed`
pub fn parse_year_body(body: &[u8]) -> YearOutcome {
    match decode_records(body) {
        Ok(records) => YearOutcome::Loaded(records),
        Err(err) => YearOutcome::Malformed(err.to_string()),
    }
}
