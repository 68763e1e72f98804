//! Concurrent per-year fan-out and the load state machine.
//!
//! [`DatasetLoader::load`] spawns one task per year of the configured range, with
//! no concurrency limit, and waits for all of them. Each task owns exactly one
//! slot of the result vector, so the merge sees year order regardless of which
//! request finished first. Per-year problems arrive as [`YearOutcome`]s; only a
//! task that panics or is cancelled fails the load.

use crate::catalog::YearRange;
use crate::dataset::archive::{Archive, LoadReport};
use crate::dataset::source::{DatasetSource, YearOutcome};
use crate::error::{ChronicleError, Result};
use futures::future::join_all;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::watch;

pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(5);

/// Observable state of the session's single load
#[derive(Debug, Clone)]
pub enum LoadState {
    Loading,
    /// Aggregate failure; no partial data is exposed
    Failed(String),
    Ready(Arc<Archive>, LoadReport),
}

impl LoadState {
    pub fn is_settled(&self) -> bool {
        !matches!(self, LoadState::Loading)
    }
}

#[derive(Clone)]
pub struct DatasetLoader {
    source: Arc<dyn DatasetSource>,
    years: YearRange,
    timeout: Duration,
}

impl DatasetLoader {
    pub fn new(source: Arc<dyn DatasetSource>, years: YearRange) -> Self {
        Self {
            source,
            years,
            timeout: DEFAULT_FETCH_TIMEOUT,
        }
    }

    /// Per-year deadline; a year that does not answer in time counts as missing
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn years(&self) -> YearRange {
        self.years
    }

    pub fn source(&self) -> &Arc<dyn DatasetSource> {
        &self.source
    }

    /// Retrieve every year concurrently and merge the results
    pub async fn load(&self) -> Result<(Arc<Archive>, LoadReport)> {
        let started = Instant::now();
        log::info!(
            "loading incidents {}-{} from {}",
            self.years.start(),
            self.years.end(),
            self.source.describe()
        );

        let handles: Vec<_> = self
            .years
            .years()
            .map(|year| {
                let source = Arc::clone(&self.source);
                let timeout = self.timeout;
                tokio::spawn(async move {
                    match tokio::time::timeout(timeout, source.fetch_year(year)).await {
                        Ok(outcome) => outcome,
                        Err(_) => {
                            log::debug!("dataset for {} timed out after {:?}", year, timeout);
                            YearOutcome::Missing
                        }
                    }
                })
            })
            .collect();

        let mut chunks = Vec::with_capacity(handles.len());
        for (year, joined) in self.years.years().zip(join_all(handles).await) {
            match joined {
                Ok(outcome) => chunks.push((year, outcome)),
                Err(err) => {
                    return Err(ChronicleError::aggregate(format!(
                        "retrieval task for {} did not complete: {}",
                        year, err
                    )))
                }
            }
        }

        let (archive, report) = Archive::assemble(chunks);
        log::info!(
            "loaded {} incidents in {:?}{}",
            archive.len(),
            started.elapsed(),
            report
                .coverage_hint()
                .map(|hint| format!(" ({})", hint))
                .unwrap_or_default()
        );
        Ok((Arc::new(archive), report))
    }

    /// Run [`load`](Self::load) and convert the result into a settled state
    pub async fn settle(&self) -> LoadState {
        match self.load().await {
            Ok((archive, report)) => LoadState::Ready(archive, report),
            Err(err) => {
                log::error!("dataset load failed: {}", err);
                LoadState::Failed(err.to_string())
            }
        }
    }
}

/// Start the session's load in the background.
///
/// The receiver observes `Loading` until the load settles. If every receiver has
/// been dropped by then, the result is discarded.
pub fn spawn_load(loader: DatasetLoader) -> watch::Receiver<LoadState> {
    let (tx, rx) = watch::channel(LoadState::Loading);
    tokio::spawn(async move {
        let state = loader.settle().await;
        if tx.send(state).is_err() {
            log::debug!("load finished after the consumer went away; result discarded");
        }
    });
    rx
}
