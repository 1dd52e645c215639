use std::fmt;

use serde::{Deserialize, Serialize};

/// Cell texts that load as null, besides the empty cell.
///
/// Matches the default missing-value markers of common dataframe CSV readers,
/// compared exactly after trimming.
pub const NULL_CELLS: [&str; 18] = [
    "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// `true` when a raw cell holds no value: blank, or one of [`NULL_CELLS`].
pub fn is_null_cell(raw: &str) -> bool {
    let cell = raw.trim();
    cell.is_empty() || NULL_CELLS.contains(&cell)
}

/// Temporal status of a match as recorded in the `Match Category` column.
///
/// Parsing is case-insensitive. Values outside the three known categories are
/// kept verbatim in [`MatchCategory::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum MatchCategory {
    Upcoming,
    Live,
    Recent,
    Other(String),
}

impl MatchCategory {
    /// Parse a raw cell value. Returns `None` for blank input.
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return None;
        }
        let category = match trimmed.to_lowercase().as_str() {
            "upcoming" => Self::Upcoming,
            "live" => Self::Live,
            "recent" => Self::Recent,
            _ => Self::Other(trimmed.to_string()),
        };
        Some(category)
    }

    /// Canonical label: lowercase for the known categories, verbatim otherwise.
    ///
    /// Grouping by category folds case, so `Other` spellings that differ only
    /// in case still count together.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Upcoming => "upcoming",
            Self::Live => "live",
            Self::Recent => "recent",
            Self::Other(s) => s.as_str(),
        }
    }

    /// Case-insensitive comparison against another category.
    pub fn matches(&self, other: &MatchCategory) -> bool {
        self.as_str().eq_ignore_ascii_case(other.as_str())
    }
}

impl fmt::Display for MatchCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The countable columns of the matches table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchColumn {
    Team1,
    Team2,
    Venue,
    City,
    Series,
    MatchCategory,
    StartDate,
    TossWinner,
}

impl MatchColumn {
    /// Every column, in source-file order.
    pub const ALL: [MatchColumn; 8] = [
        MatchColumn::Team1,
        MatchColumn::Team2,
        MatchColumn::Venue,
        MatchColumn::City,
        MatchColumn::Series,
        MatchColumn::MatchCategory,
        MatchColumn::StartDate,
        MatchColumn::TossWinner,
    ];

    /// Columns a matches source must carry to load at all.
    pub const REQUIRED: [MatchColumn; 7] = [
        MatchColumn::Team1,
        MatchColumn::Team2,
        MatchColumn::Venue,
        MatchColumn::City,
        MatchColumn::Series,
        MatchColumn::MatchCategory,
        MatchColumn::StartDate,
    ];

    /// Header text used in the source file.
    pub fn header(self) -> &'static str {
        match self {
            Self::Team1 => "Team 1",
            Self::Team2 => "Team 2",
            Self::Venue => "Venue",
            Self::City => "City",
            Self::Series => "Series",
            Self::MatchCategory => "Match Category",
            Self::StartDate => "Start Date",
            Self::TossWinner => "Toss Winner",
        }
    }

    /// Look a column up by its header text (exact, after trimming).
    pub fn from_header(header: &str) -> Option<Self> {
        let header = header.trim();
        Self::ALL.into_iter().find(|c| c.header() == header)
    }

    pub fn is_required(self) -> bool {
        Self::REQUIRED.contains(&self)
    }
}

impl fmt::Display for MatchColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.header())
    }
}

/// One row of the matches table. Blank cells load as `None`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MatchRecord {
    pub team1: Option<String>,
    pub team2: Option<String>,
    pub venue: Option<String>,
    pub city: Option<String>,
    pub series: Option<String>,
    pub category: Option<MatchCategory>,
    /// Raw `Start Date` cell: epoch milliseconds as integer or float text.
    pub start_date: Option<String>,
    pub toss_winner: Option<String>,
}

impl MatchRecord {
    /// Value of `column` for this row, or `None` when the cell is null.
    pub fn value(&self, column: MatchColumn) -> Option<&str> {
        match column {
            MatchColumn::Team1 => self.team1.as_deref(),
            MatchColumn::Team2 => self.team2.as_deref(),
            MatchColumn::Venue => self.venue.as_deref(),
            MatchColumn::City => self.city.as_deref(),
            MatchColumn::Series => self.series.as_deref(),
            MatchColumn::MatchCategory => self.category.as_ref().map(MatchCategory::as_str),
            MatchColumn::StartDate => self.start_date.as_deref(),
            MatchColumn::TossWinner => self.toss_winner.as_deref(),
        }
    }
}

/// The loaded matches table: typed rows, the columns the source declared, and
/// the source rows as read (every column, including unknown ones).
#[derive(Debug, Clone, Default)]
pub struct MatchTable {
    columns: Vec<MatchColumn>,
    records: Vec<MatchRecord>,
    raw: ReferenceTable,
}

impl MatchTable {
    /// `raw` must hold one row per record, in the same order.
    pub fn new(columns: Vec<MatchColumn>, records: Vec<MatchRecord>, raw: ReferenceTable) -> Self {
        Self {
            columns,
            records,
            raw,
        }
    }

    /// Build an in-memory table declaring `columns`; the raw rows are
    /// rendered from the typed values, nulls as empty cells.
    pub fn with_columns(columns: Vec<MatchColumn>, records: Vec<MatchRecord>) -> Self {
        let headers = columns.iter().map(|c| c.header().to_string()).collect();
        let rows = records
            .iter()
            .map(|r| {
                columns
                    .iter()
                    .map(|&c| r.value(c).unwrap_or_default().to_string())
                    .collect()
            })
            .collect();
        Self::new(columns, records, ReferenceTable::new(headers, rows))
    }

    /// Build an in-memory table that declares every column.
    pub fn from_records(records: Vec<MatchRecord>) -> Self {
        Self::with_columns(MatchColumn::ALL.to_vec(), records)
    }

    /// The source header and rows as read.
    pub fn raw(&self) -> &ReferenceTable {
        &self.raw
    }

    /// Columns present in the source header, in [`MatchColumn::ALL`] order.
    pub fn columns(&self) -> &[MatchColumn] {
        &self.columns
    }

    pub fn has_column(&self, column: MatchColumn) -> bool {
        self.columns.contains(&column)
    }

    pub fn records(&self) -> &[MatchRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Non-null values of `column`, in row order. Empty when the column is
    /// absent from the source.
    pub fn values(&self, column: MatchColumn) -> impl Iterator<Item = &str> + '_ {
        let present = self.has_column(column);
        self.records
            .iter()
            .filter(move |_| present)
            .filter_map(move |r| r.value(column))
    }
}

/// A flat lookup table (teams, series or venues): a header and raw rows.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReferenceTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl ReferenceTable {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self { headers, rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// The first `n` rows (all rows when fewer exist).
    pub fn head(&self, n: usize) -> &[Vec<String>] {
        &self.rows[..n.min(self.rows.len())]
    }
}

/// Which of the four loaded tables an operation refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum TableKind {
    Matches,
    Teams,
    Series,
    Venues,
}

impl TableKind {
    pub const ALL: [TableKind; 4] = [
        TableKind::Matches,
        TableKind::Teams,
        TableKind::Series,
        TableKind::Venues,
    ];

    /// Display name of the table.
    pub fn title(self) -> &'static str {
        match self {
            Self::Matches => "Matches",
            Self::Teams => "Teams",
            Self::Series => "Series",
            Self::Venues => "Venues",
        }
    }

    /// Rows shown by default when previewing this table.
    pub fn default_preview_rows(self) -> usize {
        match self {
            Self::Matches => 10,
            _ => 20,
        }
    }
}

impl fmt::Display for TableKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}
