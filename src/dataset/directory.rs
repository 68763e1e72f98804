//! Local directory dataset source: reads `{dir}/{year}.json`.
//!
//! Useful for offline mirrors of the archive and for tests.

use crate::dataset::source::{parse_year_body, DatasetSource, YearOutcome};
use crate::error::{ChronicleError, Result};
use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct DirectorySource {
    root: PathBuf,
}

impl DirectorySource {
    /// Create a source over `root`, which must be an existing directory
    pub fn new(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref().to_path_buf();
        if !root.is_dir() {
            return Err(ChronicleError::invalid_argument(format!(
                "dataset directory does not exist: {}",
                root.display()
            )));
        }
        Ok(Self { root })
    }

    pub fn year_path(&self, year: u16) -> PathBuf {
        self.root.join(format!("{}.json", year))
    }
}

#[async_trait]
impl DatasetSource for DirectorySource {
    async fn fetch_year(&self, year: u16) -> YearOutcome {
        let path = self.year_path(year);
        match tokio::fs::read(&path).await {
            Ok(body) => parse_year_body(&body),
            Err(err) if err.kind() == ErrorKind::NotFound => YearOutcome::Missing,
            Err(err) => YearOutcome::Failed(format!("reading {} failed: {}", path.display(), err)),
        }
    }

    fn describe(&self) -> String {
        self.root.display().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_missing_file_is_missing_year() {
        let dir = TempDir::new().unwrap();
        let source = DirectorySource::new(dir.path()).unwrap();
        assert_eq!(source.fetch_year(2010).await, YearOutcome::Missing);
    }

    #[tokio::test]
    async fn test_reads_year_file() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join("2012.json"),
            r#"[{"id":"x","date":"2012-04-01","organization":"Org","sector":"Energy",
                 "incidentType":"Malware","severity":"Low"}]"#,
        )
        .unwrap();
        let source = DirectorySource::new(dir.path()).unwrap();

        match source.fetch_year(2012).await {
            YearOutcome::Loaded(records) => assert_eq!(records[0].id, "x"),
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_directory_in_place_of_file_fails() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir(dir.path().join("2013.json")).unwrap();
        let source = DirectorySource::new(dir.path()).unwrap();
        assert!(matches!(
            source.fetch_year(2013).await,
            YearOutcome::Failed(_)
        ));
    }

    #[test]
    fn test_requires_existing_directory() {
        assert!(DirectorySource::new("/definitely/not/here").is_err());
    }
}
