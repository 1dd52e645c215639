use clap::{Parser, ValueEnum};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::models::TableKind;

// ── DataSources ────────────────────────────────────────────────────────────────

/// Conventional file name of the matches table inside a data directory.
pub const MATCHES_FILE: &str = "cricbuzz_matches.csv";
/// Conventional file name of the teams table.
pub const TEAMS_FILE: &str = "teams.csv";
/// Conventional file name of the series table.
pub const SERIES_FILE: &str = "series.csv";
/// Conventional file name of the venues table.
pub const VENUES_FILE: &str = "venues.csv";

/// Locations of the four source tables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataSources {
    pub matches: PathBuf,
    pub teams: PathBuf,
    pub series: PathBuf,
    pub venues: PathBuf,
}

impl DataSources {
    /// Sources using the conventional file names under `dir`.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            matches: dir.join(MATCHES_FILE),
            teams: dir.join(TEAMS_FILE),
            series: dir.join(SERIES_FILE),
            venues: dir.join(VENUES_FILE),
        }
    }
}

// ── Output selection ───────────────────────────────────────────────────────────

/// Which part of the dashboard to produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum View {
    /// Headline counts only.
    Kpis,
    /// Chart-ready series.
    Charts,
    /// A preview of one loaded table.
    Table,
    /// KPIs, charts and the matches preview.
    All,
}

/// Output encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Text,
    Json,
}

// ── Settings (CLI) ─────────────────────────────────────────────────────────────

/// Match statistics dashboard over static cricket datasets
#[derive(Parser, Debug, Clone)]
#[command(
    name = "cricket-dashboard",
    about = "Match statistics dashboard over static cricket datasets",
    version
)]
pub struct Settings {
    /// Directory holding the four source tables
    #[arg(long, default_value = "data")]
    pub data_dir: PathBuf,

    /// Matches table (overrides --data-dir)
    #[arg(long)]
    pub matches: Option<PathBuf>,

    /// Teams table (overrides --data-dir)
    #[arg(long)]
    pub teams: Option<PathBuf>,

    /// Series table (overrides --data-dir)
    #[arg(long)]
    pub series: Option<PathBuf>,

    /// Venues table (overrides --data-dir)
    #[arg(long)]
    pub venues: Option<PathBuf>,

    /// What to show
    #[arg(long, value_enum, default_value_t = View::All)]
    pub view: View,

    /// Show only this chart (e.g. "city", "teams", "years")
    #[arg(long)]
    pub chart: Option<String>,

    /// Table to preview in the table view
    #[arg(long, value_enum, default_value_t = TableKind::Matches)]
    pub table: TableKind,

    /// Rows to show in a table preview
    #[arg(long)]
    pub rows: Option<usize>,

    /// Entries kept in top-N charts (1-100)
    #[arg(long, default_value = "10", value_parser = clap::value_parser!(u32).range(1..=100))]
    pub top_n: u32,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Logging level
    #[arg(long, default_value = "INFO", value_parser = ["DEBUG", "INFO", "WARNING", "ERROR"])]
    pub log_level: String,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,
}

impl Settings {
    /// Parse the process arguments.
    pub fn load() -> Self {
        Self::from_args(std::env::args_os())
    }

    /// Parse an explicit argument list (the first item is the binary name).
    pub fn from_args<I, T>(args: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        Self::resolve(Settings::parse_from(args))
    }

    /// Fallible variant of [`Settings::from_args`].
    pub fn try_from_args<I, T>(args: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        Settings::try_parse_from(args).map(Self::resolve)
    }

    /// Resolve the four source paths. Explicit per-table paths win over
    /// `--data-dir`.
    pub fn sources(&self) -> DataSources {
        let defaults = DataSources::in_dir(&self.data_dir);
        DataSources {
            matches: self.matches.clone().unwrap_or(defaults.matches),
            teams: self.teams.clone().unwrap_or(defaults.teams),
            series: self.series.clone().unwrap_or(defaults.series),
            venues: self.venues.clone().unwrap_or(defaults.venues),
        }
    }

    /// Rows to show when previewing the selected table.
    pub fn preview_rows(&self) -> usize {
        self.rows.unwrap_or_else(|| self.table.default_preview_rows())
    }

    pub fn top_n(&self) -> usize {
        self.top_n as usize
    }

    /// `--debug` overrides log level.
    fn resolve(mut settings: Settings) -> Settings {
        if settings.debug {
            settings.log_level = "DEBUG".to_string();
        }
        settings
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────
