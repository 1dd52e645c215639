use std::path::PathBuf;
use thiserror::Error;

/// All errors produced by the dashboard crates.
///
/// The first four variants are load errors: the dashboard cannot start
/// without all four source tables.
#[derive(Error, Debug)]
pub enum DashboardError {
    /// A source file could not be opened or read from disk.
    #[error("Failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A source file is not valid delimited text.
    #[error("Malformed table {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// The matches table lacks a column every match row must carry.
    #[error("Table {path} is missing required column \"{column}\"")]
    MissingColumn { path: PathBuf, column: String },

    /// A source file has no header row.
    #[error("Table {0} is empty")]
    EmptyTable(PathBuf),

    /// A chart name did not match any known chart.
    #[error("Unknown chart: {0}")]
    UnknownChart(String),

    /// A report could not be serialised.
    #[error("Failed to serialise JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience alias used throughout the dashboard crates.
pub type Result<T> = std::result::Result<T, DashboardError>;
