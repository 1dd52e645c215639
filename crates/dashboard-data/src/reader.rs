//! Source table loading for the dashboard.
//!
//! Reads the four delimited-text sources into an immutable [`Dataset`] that is
//! built once and passed by reference to every aggregation.

use std::collections::HashMap;
use std::fs::File;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord, Trim};
use dashboard_core::error::{DashboardError, Result};
use dashboard_core::models::{
    is_null_cell, MatchCategory, MatchColumn, MatchRecord, MatchTable, ReferenceTable, TableKind,
};
use dashboard_core::settings::DataSources;
use tracing::{debug, info, warn};

// ── Dataset ───────────────────────────────────────────────────────────────────

/// The four loaded tables. Never mutated after [`Dataset::load`].
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    pub matches: MatchTable,
    pub teams: ReferenceTable,
    pub series: ReferenceTable,
    pub venues: ReferenceTable,
}

impl Dataset {
    pub fn new(
        matches: MatchTable,
        teams: ReferenceTable,
        series: ReferenceTable,
        venues: ReferenceTable,
    ) -> Self {
        Self {
            matches,
            teams,
            series,
            venues,
        }
    }

    /// Load all four sources. Any missing or malformed source is fatal.
    pub fn load(sources: &DataSources) -> Result<Self> {
        let matches = load_matches(&sources.matches)?;
        let teams = load_reference_table(&sources.teams)?;
        let series = load_reference_table(&sources.series)?;
        let venues = load_reference_table(&sources.venues)?;

        info!(
            "Loaded {} matches, {} teams, {} series, {} venues",
            matches.len(),
            teams.len(),
            series.len(),
            venues.len()
        );

        Ok(Self::new(matches, teams, series, venues))
    }

    /// The reference table for `kind`, or `None` for the matches table.
    pub fn reference(&self, kind: TableKind) -> Option<&ReferenceTable> {
        match kind {
            TableKind::Matches => None,
            TableKind::Teams => Some(&self.teams),
            TableKind::Series => Some(&self.series),
            TableKind::Venues => Some(&self.venues),
        }
    }

    /// Row count of the table backing `kind`.
    pub fn row_count(&self, kind: TableKind) -> usize {
        match self.reference(kind) {
            Some(table) => table.len(),
            None => self.matches.len(),
        }
    }
}

// ── Loaders ───────────────────────────────────────────────────────────────────

/// Load the matches table into typed records.
///
/// Every column in [`MatchColumn::REQUIRED`] must be present in the header;
/// `Toss Winner` may be absent. Unknown columns are not typed but stay in the
/// table's raw rows.
pub fn load_matches(path: &Path) -> Result<MatchTable> {
    let mut reader = open_reader(path)?;
    let headers = read_headers(&mut reader, path)?;

    let index = column_index(&headers);
    for column in MatchColumn::REQUIRED {
        if !index.contains_key(&column) {
            return Err(DashboardError::MissingColumn {
                path: path.to_path_buf(),
                column: column.header().to_string(),
            });
        }
    }

    let columns: Vec<MatchColumn> = MatchColumn::ALL
        .into_iter()
        .filter(|c| index.contains_key(c))
        .collect();
    for column in MatchColumn::ALL.iter().filter(|c| !index.contains_key(*c)) {
        warn!(
            "{} has no \"{}\" column; related metrics will be empty",
            path.display(),
            column
        );
    }

    let mut records = Vec::new();
    let mut rows = Vec::new();
    for row in reader.records() {
        let row = row.map_err(|source| csv_error(path, source))?;
        records.push(map_to_match_record(&row, &index));
        rows.push(raw_row(&row));
    }

    debug!("{}: {} match rows", path.display(), records.len());

    let raw = ReferenceTable::new(headers.iter().map(str::to_string).collect(), rows);
    Ok(MatchTable::new(columns, records, raw))
}

/// Load a flat reference table (teams, series or venues) verbatim. Null
/// markers load as empty cells.
pub fn load_reference_table(path: &Path) -> Result<ReferenceTable> {
    let mut reader = open_reader(path)?;
    let headers = read_headers(&mut reader, path)?;

    let mut rows = Vec::new();
    for row in reader.records() {
        let row = row.map_err(|source| csv_error(path, source))?;
        rows.push(raw_row(&row));
    }

    debug!("{}: {} rows", path.display(), rows.len());

    Ok(ReferenceTable::new(
        headers.iter().map(str::to_string).collect(),
        rows,
    ))
}

// ── Internal helpers ──────────────────────────────────────────────────────────

fn open_reader(path: &Path) -> Result<csv::Reader<File>> {
    let file = File::open(path).map_err(|source| DashboardError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;

    Ok(ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(file))
}

/// Read the header row; a source without one is an empty table.
fn read_headers(reader: &mut csv::Reader<File>, path: &Path) -> Result<StringRecord> {
    let headers = reader
        .headers()
        .map_err(|source| csv_error(path, source))?
        .clone();

    if headers.iter().all(|h| h.is_empty()) {
        return Err(DashboardError::EmptyTable(path.to_path_buf()));
    }
    Ok(headers)
}

fn csv_error(path: &Path, source: csv::Error) -> DashboardError {
    DashboardError::Csv {
        path: path.to_path_buf(),
        source,
    }
}

/// Map known headers to their field position. The first occurrence of a
/// duplicated header wins.
fn column_index(headers: &StringRecord) -> HashMap<MatchColumn, usize> {
    let mut index = HashMap::new();
    for (pos, header) in headers.iter().enumerate() {
        if let Some(column) = MatchColumn::from_header(header) {
            index.entry(column).or_insert(pos);
        }
    }
    index
}

fn raw_row(row: &StringRecord) -> Vec<String> {
    row.iter()
        .map(|cell| if is_null_cell(cell) { String::new() } else { cell.to_string() })
        .collect()
}

fn map_to_match_record(row: &StringRecord, index: &HashMap<MatchColumn, usize>) -> MatchRecord {
    let cell = |column: MatchColumn| -> Option<String> {
        let pos = *index.get(&column)?;
        row.get(pos)
            .filter(|s| !is_null_cell(s))
            .map(|s| s.trim().to_string())
    };

    MatchRecord {
        team1: cell(MatchColumn::Team1),
        team2: cell(MatchColumn::Team2),
        venue: cell(MatchColumn::Venue),
        city: cell(MatchColumn::City),
        series: cell(MatchColumn::Series),
        category: cell(MatchColumn::MatchCategory).and_then(|c| MatchCategory::parse(&c)),
        start_date: cell(MatchColumn::StartDate),
        toss_winner: cell(MatchColumn::TossWinner),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
