use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tokio::time::{timeout, Duration};

use incident_chronicle::catalog::YearRange;
use incident_chronicle::dataset::{
    spawn_load, DatasetLoader, DatasetSource, DirectorySource, LoadState, YearOutcome, YearStatus,
};
use incident_chronicle::ChronicleError;

const TIMEOUT_MS: u64 = 2_000;

fn record(id: &str, date: &str, organization: &str) -> serde_json::Value {
    json!({
        "id": id,
        "date": date,
        "organization": organization,
        "sector": "Banking",
        "incidentType": "Ransomware",
        "severity": "High",
        "description": "Systems were encrypted.",
        "verificationStatus": "Verified"
    })
}

fn write_year(dir: &Path, year: u16, body: &str) {
    std::fs::write(dir.join(format!("{}.json", year)), body).expect("write year file");
}

fn archive_fixture() -> tempfile::TempDir {
    let dir = tempfile::TempDir::new().expect("create temp dir");
    for year in 2008..=2012u16 {
        match year {
            // Not published
            2010 => {}
            // Static hosts answer unknown paths with an HTML page
            2011 => write_year(dir.path(), year, "<!doctype html><title>Not here</title>"),
            _ => {
                let records = json!([
                    record(&format!("inc-{}-a", year), &format!("{}-03-01", year), "First Bank"),
                    record(&format!("inc-{}-b", year), &format!("{}-09-15", year), "Second Bank"),
                ]);
                write_year(dir.path(), year, &records.to_string());
            }
        }
    }
    dir
}

async fn settled(loader: DatasetLoader) -> LoadState {
    let mut rx = spawn_load(loader);
    let state = timeout(Duration::from_millis(TIMEOUT_MS), rx.wait_for(LoadState::is_settled))
        .await
        .expect("load did not settle in time")
        .expect("loader dropped the channel");
    (*state).clone()
}

#[tokio::test]
async fn missing_and_malformed_years_do_not_fail_the_load() {
    let dir = archive_fixture();
    let source = DirectorySource::new(dir.path()).unwrap();
    let loader = DatasetLoader::new(Arc::new(source), YearRange::new(2008, 2012).unwrap());

    let loaded = timeout(Duration::from_millis(TIMEOUT_MS), loader.load())
        .await
        .expect("load timed out");
    let (archive, report) = tokio_test::assert_ok!(loaded);

    assert_eq!(archive.len(), 6);
    let years: Vec<_> = archive.entries().iter().map(|e| e.year_label().to_string()).collect();
    assert!(!years.contains(&"2010".to_string()));
    assert!(!years.contains(&"2011".to_string()));

    assert_eq!(report.unavailable_years(), vec![2010, 2011]);
    assert_eq!(report.years[2], (2010, YearStatus::Missing));
    assert!(matches!(report.years[3].1, YearStatus::Malformed(_)));
    assert_eq!(
        report.coverage_hint().as_deref(),
        Some("2 of 5 years unavailable")
    );
}

#[tokio::test]
async fn archive_is_merged_in_date_order() {
    let dir = archive_fixture();
    let source = DirectorySource::new(dir.path()).unwrap();
    let loader = DatasetLoader::new(Arc::new(source), YearRange::new(2008, 2012).unwrap());

    let (archive, _) = loader.load().await.unwrap();
    let ids: Vec<_> = archive.incidents().map(|i| i.id.as_str()).collect();
    assert_eq!(
        ids,
        vec![
            "inc-2008-a",
            "inc-2008-b",
            "inc-2009-a",
            "inc-2009-b",
            "inc-2012-a",
            "inc-2012-b"
        ]
    );
}

#[tokio::test]
async fn empty_directory_yields_an_empty_ready_archive() {
    let dir = tempfile::TempDir::new().unwrap();
    let source = DirectorySource::new(dir.path()).unwrap();
    let loader = DatasetLoader::new(Arc::new(source), YearRange::new(2000, 2003).unwrap());

    match settled(loader).await {
        LoadState::Ready(archive, report) => {
            assert!(archive.is_empty());
            assert_eq!(report.unavailable_years().len(), 4);
        }
        other => panic!("unexpected state: {other:?}"),
    }
}

struct StalledSource;

#[async_trait]
impl DatasetSource for StalledSource {
    async fn fetch_year(&self, year: u16) -> YearOutcome {
        if year == 2001 {
            // Never answers within the deadline
            tokio::time::sleep(Duration::from_secs(60)).await;
        }
        YearOutcome::Loaded(Vec::new())
    }

    fn describe(&self) -> String {
        "stalled".to_string()
    }
}

#[tokio::test]
async fn slow_year_times_out_as_missing() {
    let loader = DatasetLoader::new(Arc::new(StalledSource), YearRange::new(2000, 2002).unwrap())
        .with_timeout(Duration::from_millis(50));

    let (archive, report) = timeout(Duration::from_millis(TIMEOUT_MS), loader.load())
        .await
        .expect("deadline was not applied")
        .unwrap();

    assert!(archive.is_empty());
    assert_eq!(report.unavailable_years(), vec![2001]);
}

struct PanickingSource;

#[async_trait]
impl DatasetSource for PanickingSource {
    async fn fetch_year(&self, year: u16) -> YearOutcome {
        if year == 2005 {
            panic!("retrieval task blew up");
        }
        YearOutcome::Missing
    }

    fn describe(&self) -> String {
        "panicking".to_string()
    }
}

#[tokio::test]
async fn panicked_task_is_an_aggregate_failure() {
    let loader = DatasetLoader::new(Arc::new(PanickingSource), YearRange::new(2004, 2006).unwrap());

    let err = loader.load().await.unwrap_err();
    assert!(matches!(err, ChronicleError::Aggregate { .. }));

    // The session state exposes no partial data
    match settled(loader).await {
        LoadState::Failed(message) => assert!(message.contains("2005")),
        other => panic!("unexpected state: {other:?}"),
    }
}

#[tokio::test]
async fn nonexistent_directory_is_rejected() {
    let dir = tempfile::TempDir::new().unwrap();
    let missing = dir.path().join("nope");
    assert!(matches!(
        DirectorySource::new(&missing),
        Err(ChronicleError::InvalidArgument { .. })
    ));
}
