//! chronicle - Terminal browser for cyber-security incident archives
//!
//! Loads a year-partitioned incident archive from a URL or a directory and opens it
//! in an interactive browser, or prints matching incidents as plain text.

use anyhow::{Context, Result};
use clap::Parser;
use incident_chronicle::config::{ChronicleConfig, ConfigFile, ConfigOverrides, ThemeName};
use incident_chronicle::detail::Resolution;
use incident_chronicle::query::{matching_indices, FilterSelection};
use incident_chronicle::render::text::{render_detail, render_listing, render_not_found};
use incident_chronicle::render::ui::{ColorTheme, TerminalUI};
use incident_chronicle::{Application, SessionOptions};
use std::fs::File;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(
    name = "chronicle",
    version = incident_chronicle::VERSION,
    about = "Browse an archive of documented cyber-security incidents",
    long_about = "chronicle loads one JSON file per year ({base}/{year}.json) from a URL or a \
                  local directory, merges them, and lets you search, filter and page through \
                  the incidents or open any one of them in detail."
)]
struct Cli {
    /// Base URL serving {year}.json files
    #[arg(long, value_name = "BASE", conflicts_with = "dir")]
    url: Option<String>,

    /// Directory holding {year}.json files
    #[arg(long, value_name = "PATH")]
    dir: Option<PathBuf>,

    /// Initial search text
    #[arg(long, value_name = "TEXT")]
    search: Option<String>,

    /// Open directly on the detail view of this incident
    #[arg(long, value_name = "ID")]
    incident: Option<String>,

    /// First year to load
    #[arg(long, value_name = "YEAR")]
    start_year: Option<u16>,

    /// Last year to load (inclusive)
    #[arg(long, value_name = "YEAR")]
    end_year: Option<u16>,

    /// Per-year retrieval deadline in milliseconds
    #[arg(long, value_name = "MS")]
    timeout_ms: Option<u64>,

    /// Incidents per page (default: fit the terminal)
    #[arg(long, value_name = "N")]
    page_size: Option<usize>,

    /// Color theme: default, monochrome or high-contrast
    #[arg(long, value_name = "NAME")]
    theme: Option<ThemeName>,

    /// Config file (default: <config dir>/incident-chronicle/config.toml)
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Print results as plain text and exit instead of opening the browser
    #[arg(long)]
    print: bool,

    /// Write logs to this file
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,
}

impl Cli {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            base_url: self.url.clone(),
            data_dir: self.dir.clone(),
            start_year: self.start_year,
            end_year: self.end_year,
            fetch_timeout_ms: self.timeout_ms,
            page_size: self.page_size,
            theme: self.theme,
        }
    }
}

fn init_logging(cli: &Cli) -> Result<()> {
    let default_filter = match (&cli.log_file, cli.print) {
        (Some(_), _) => "info",
        (None, true) => "warn",
        // The browser owns the terminal; stray log lines would corrupt the screen
        (None, false) => "off",
    };

    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter));
    if let Some(path) = &cli.log_file {
        let file = File::create(path)
            .with_context(|| format!("cannot create log file {}", path.display()))?;
        builder.target(env_logger::Target::Pipe(Box::new(file)));
    }
    builder.init();
    Ok(())
}

async fn print_mode(cli: &Cli, config: &ChronicleConfig) -> Result<ExitCode> {
    let (archive, report) = config.loader()?.load().await?;

    if let Some(id) = &cli.incident {
        return Ok(match archive.resolve(id) {
            Resolution::Found(entry) => {
                print!("{}", render_detail(entry));
                ExitCode::SUCCESS
            }
            Resolution::NotFound { id } => {
                eprint!("{}", render_not_found(&id));
                ExitCode::FAILURE
            }
        });
    }

    let query = cli.search.as_deref().unwrap_or_default();
    let results = matching_indices(&archive, query, &FilterSelection::new());
    print!("{}", render_listing(&archive, &results, &report));
    Ok(ExitCode::SUCCESS)
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_logging(&cli)?;

    if let Some(path) = &cli.config {
        if !path.is_file() {
            anyhow::bail!("Config file does not exist: {}", path.display());
        }
    }

    let file = ConfigFile::discover(cli.config.as_deref())?;
    let config = ChronicleConfig::resolve(file, cli.overrides())?;
    log::debug!("resolved configuration: {:?}", config);

    if cli.print {
        return print_mode(&cli, &config).await;
    }

    let options = SessionOptions {
        query: cli.search.clone(),
        incident: cli.incident.clone(),
        page_size: config.page_size,
    };
    let ui_renderer = Box::new(TerminalUI::with_theme(ColorTheme::named(config.theme))?);
    let mut app = Application::new(config.loader()?, config.catalog(), ui_renderer, options);

    app.run().await?;

    Ok(ExitCode::SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_constant() {
        // Ensure version is accessible
        assert!(!incident_chronicle::VERSION.is_empty());
    }

    #[test]
    fn cli_flags_become_overrides() {
        let cli = Cli::parse_from([
            "chronicle",
            "--dir",
            "/srv/incidents",
            "--start-year",
            "2015",
            "--theme",
            "monochrome",
            "--page-size",
            "20",
        ]);
        let overrides = cli.overrides();
        assert_eq!(overrides.data_dir, Some(PathBuf::from("/srv/incidents")));
        assert_eq!(overrides.start_year, Some(2015));
        assert_eq!(overrides.theme, Some(ThemeName::Monochrome));
        assert_eq!(overrides.page_size, Some(20));
        assert!(overrides.base_url.is_none());
    }

    #[test]
    fn url_and_dir_conflict() {
        let parsed = Cli::try_parse_from(["chronicle", "--url", "https://x", "--dir", "/tmp"]);
        assert!(parsed.is_err());
    }

    #[test]
    fn unknown_theme_is_rejected() {
        assert!(Cli::try_parse_from(["chronicle", "--theme", "neon"]).is_err());
    }
}
