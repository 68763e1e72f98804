//! Configuration file and command-line override resolution.
//!
//! Settings come from an optional TOML file (`--config`, or
//! `<config dir>/incident-chronicle/config.toml`) and are then overridden by
//! command-line flags. A missing default file simply means defaults.

use crate::catalog::{Catalog, CatalogLists, YearRange, DEFAULT_END_YEAR, DEFAULT_START_YEAR};
use crate::dataset::{DatasetLoader, DatasetSource, DirectorySource, HttpSource, DEFAULT_FETCH_TIMEOUT};
use crate::error::{ChronicleError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

const APP_DIR: &str = "incident-chronicle";
const CONFIG_FILE: &str = "config.toml";

/// Selectable color theme
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ThemeName {
    #[default]
    Default,
    Monochrome,
    HighContrast,
}

impl ThemeName {
    pub const NAMES: [&'static str; 3] = ["default", "monochrome", "high-contrast"];

    pub fn as_str(&self) -> &'static str {
        match self {
            ThemeName::Default => "default",
            ThemeName::Monochrome => "monochrome",
            ThemeName::HighContrast => "high-contrast",
        }
    }
}

impl fmt::Display for ThemeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ThemeName {
    type Err = ChronicleError;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "default" => Ok(ThemeName::Default),
            "monochrome" => Ok(ThemeName::Monochrome),
            "high-contrast" | "high_contrast" => Ok(ThemeName::HighContrast),
            other => Err(ChronicleError::config(format!(
                "unknown theme {:?} (expected one of {})",
                other,
                Self::NAMES.join(", ")
            ))),
        }
    }
}

/// Contents of the TOML configuration file. Every key is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigFile {
    pub base_url: Option<String>,
    pub data_dir: Option<PathBuf>,
    pub start_year: Option<u16>,
    pub end_year: Option<u16>,
    pub fetch_timeout_ms: Option<u64>,
    pub page_size: Option<usize>,
    pub theme: Option<ThemeName>,
    pub catalog: CatalogLists,
}

impl ConfigFile {
    /// Default location of the configuration file, if the platform has one
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(APP_DIR).join(CONFIG_FILE))
    }

    /// Parse a configuration file that must exist
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            ChronicleError::io(format!("Failed to read config {}", path.display()), e)
        })?;
        Self::parse(&text).map_err(|err| match err {
            ChronicleError::Config { message } => {
                ChronicleError::config(format!("{}: {}", path.display(), message))
            }
            other => other,
        })
    }

    pub fn parse(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Load `explicit` if given, else the default file when it exists
    pub fn discover(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load(path);
        }
        match Self::default_path() {
            Some(path) if path.is_file() => {
                log::debug!("using config file {}", path.display());
                Self::load(&path)
            }
            _ => Ok(Self::default()),
        }
    }
}

/// Values given on the command line; they win over the file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigOverrides {
    pub base_url: Option<String>,
    pub data_dir: Option<PathBuf>,
    pub start_year: Option<u16>,
    pub end_year: Option<u16>,
    pub fetch_timeout_ms: Option<u64>,
    pub page_size: Option<usize>,
    pub theme: Option<ThemeName>,
}

/// Where the per-year files live
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataLocation {
    Url(String),
    Directory(PathBuf),
}

impl DataLocation {
    fn pick(url: Option<String>, dir: Option<PathBuf>, origin: &str) -> Result<Option<Self>> {
        match (url, dir) {
            (Some(_), Some(_)) => Err(ChronicleError::config(format!(
                "{} sets both a dataset URL and a dataset directory",
                origin
            ))),
            (Some(url), None) => Ok(Some(DataLocation::Url(url))),
            (None, Some(dir)) => Ok(Some(DataLocation::Directory(dir))),
            (None, None) => Ok(None),
        }
    }

    pub fn open(&self, timeout: Duration) -> Result<Arc<dyn DatasetSource>> {
        Ok(match self {
            DataLocation::Url(url) => Arc::new(HttpSource::new(url.clone(), timeout)?),
            DataLocation::Directory(dir) => Arc::new(DirectorySource::new(dir)?),
        })
    }
}

impl fmt::Display for DataLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataLocation::Url(url) => f.write_str(url),
            DataLocation::Directory(dir) => write!(f, "{}", dir.display()),
        }
    }
}

/// Fully resolved settings for one session
#[derive(Debug, Clone, PartialEq)]
pub struct ChronicleConfig {
    pub location: DataLocation,
    pub years: YearRange,
    pub fetch_timeout: Duration,
    /// `None` derives the page size from the terminal height
    pub page_size: Option<usize>,
    pub theme: ThemeName,
    pub catalog: CatalogLists,
}

impl ChronicleConfig {
    pub fn resolve(file: ConfigFile, overrides: ConfigOverrides) -> Result<Self> {
        // A source named on the command line replaces the file's source entirely
        let location = match DataLocation::pick(overrides.base_url, overrides.data_dir, "the command line")? {
            Some(location) => location,
            None => DataLocation::pick(file.base_url, file.data_dir, "the config file")?.ok_or_else(|| {
                ChronicleError::config("no dataset source: pass --url or --dir, or set base_url or data_dir")
            })?,
        };

        let years = YearRange::new(
            overrides
                .start_year
                .or(file.start_year)
                .unwrap_or(DEFAULT_START_YEAR),
            overrides.end_year.or(file.end_year).unwrap_or(DEFAULT_END_YEAR),
        )?;

        let fetch_timeout = match overrides.fetch_timeout_ms.or(file.fetch_timeout_ms) {
            Some(0) => return Err(ChronicleError::config("fetch timeout must be positive")),
            Some(ms) => Duration::from_millis(ms),
            None => DEFAULT_FETCH_TIMEOUT,
        };

        let page_size = overrides.page_size.or(file.page_size);
        if page_size == Some(0) {
            return Err(ChronicleError::config("page size must be positive"));
        }

        Ok(Self {
            location,
            years,
            fetch_timeout,
            page_size,
            theme: overrides.theme.or(file.theme).unwrap_or_default(),
            catalog: file.catalog,
        })
    }

    pub fn catalog(&self) -> Catalog {
        Catalog::new(self.years, self.catalog.clone())
    }

    pub fn loader(&self) -> Result<DatasetLoader> {
        let source = self.location.open(self.fetch_timeout)?;
        Ok(DatasetLoader::new(source, self.years).with_timeout(self.fetch_timeout))
    }
}
