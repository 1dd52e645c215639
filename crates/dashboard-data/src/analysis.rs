//! Named dashboard metrics and chart series.
//!
//! Turns a loaded [`Dataset`] into the KPIs, chart-ready series and table
//! previews a presentation layer renders, bundled as a [`DashboardReport`].

use std::fmt;
use std::str::FromStr;

use chrono::Utc;
use dashboard_core::error::DashboardError;
use dashboard_core::models::{MatchCategory, MatchColumn, TableKind};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::aggregator::{MatchAggregator, ValueCount, YearCount};
use crate::reader::Dataset;

// ── KPIs ──────────────────────────────────────────────────────────────────────

/// Headline counts shown at the top of the dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KpiSummary {
    pub total_matches: usize,
    pub total_teams: usize,
    pub total_series: usize,
    pub total_venues: usize,
    /// Venue hosting the most matches; `None` when no match has a venue.
    pub most_played_venue: Option<String>,
    pub upcoming_matches: usize,
    pub live_matches: usize,
    pub recent_matches: usize,
}

impl KpiSummary {
    pub fn compute(dataset: &Dataset) -> Self {
        let matches = &dataset.matches;
        Self {
            total_matches: matches.len(),
            total_teams: dataset.teams.len(),
            total_series: dataset.series.len(),
            total_venues: dataset.venues.len(),
            most_played_venue: MatchAggregator::mode_of(matches, MatchColumn::Venue),
            upcoming_matches: MatchAggregator::category_count(matches, &MatchCategory::Upcoming),
            live_matches: MatchAggregator::category_count(matches, &MatchCategory::Live),
            recent_matches: MatchAggregator::category_count(matches, &MatchCategory::Recent),
        }
    }
}

// ── Charts ────────────────────────────────────────────────────────────────────

/// Every chart the dashboard offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ChartKind {
    MatchesByCity,
    TopTeams,
    MatchesOverYears,
    TopVenues,
    TopSeries,
    MatchesByCategory,
    TossWinners,
    TeamMatchTotals,
}

/// How a chart is meant to be drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartStyle {
    Bar,
    Line,
    Donut,
    Scatter,
}

impl ChartKind {
    pub const ALL: [ChartKind; 8] = [
        ChartKind::MatchesByCity,
        ChartKind::TopTeams,
        ChartKind::MatchesOverYears,
        ChartKind::TopVenues,
        ChartKind::TopSeries,
        ChartKind::MatchesByCategory,
        ChartKind::TossWinners,
        ChartKind::TeamMatchTotals,
    ];

    /// Short name accepted on the command line.
    pub fn name(self) -> &'static str {
        match self {
            Self::MatchesByCity => "city",
            Self::TopTeams => "teams",
            Self::MatchesOverYears => "years",
            Self::TopVenues => "venues",
            Self::TopSeries => "series",
            Self::MatchesByCategory => "category",
            Self::TossWinners => "toss",
            Self::TeamMatchTotals => "team-totals",
        }
    }

    /// Display title; top-N charts include `top_n` in the title.
    pub fn title(self, top_n: usize) -> String {
        match self {
            Self::MatchesByCity => "Matches by City".to_string(),
            Self::TopTeams => format!("Top {top_n} Teams by Matches Played"),
            Self::MatchesOverYears => "Matches Over Years".to_string(),
            Self::TopVenues => format!("Top {top_n} Venues"),
            Self::TopSeries => format!("Top {top_n} Series"),
            Self::MatchesByCategory => "Matches by Category".to_string(),
            Self::TossWinners => "Matches by Toss Winner".to_string(),
            Self::TeamMatchTotals => "Matches per Team (Detailed)".to_string(),
        }
    }

    pub fn style(self) -> ChartStyle {
        match self {
            Self::MatchesOverYears => ChartStyle::Line,
            Self::TopVenues | Self::TopSeries => ChartStyle::Donut,
            Self::TeamMatchTotals => ChartStyle::Scatter,
            _ => ChartStyle::Bar,
        }
    }

    /// Label of the reference option list shown beside the chart.
    pub fn reference_label(self) -> &'static str {
        match self {
            Self::MatchesByCity => "City",
            Self::TopTeams | Self::TeamMatchTotals => "Team",
            Self::MatchesOverYears | Self::MatchesByCategory => "Match Category",
            Self::TopVenues => "Venue",
            Self::TopSeries => "Series",
            Self::TossWinners => "Toss Winner",
        }
    }
}

impl fmt::Display for ChartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ChartKind {
    type Err = DashboardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase().replace('_', "-");
        Self::ALL
            .into_iter()
            .find(|k| k.name() == wanted)
            .ok_or_else(|| DashboardError::UnknownChart(s.to_string()))
    }
}

/// The data points of one chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "points", rename_all = "lowercase")]
pub enum ChartData {
    /// Category labels with counts, highest first.
    Ranked(Vec<ValueCount>),
    /// Counts per year, ascending.
    Yearly(Vec<YearCount>),
}

impl ChartData {
    pub fn len(&self) -> usize {
        match self {
            Self::Ranked(points) => points.len(),
            Self::Yearly(points) => points.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Largest single count, or 0 for an empty chart.
    pub fn max_count(&self) -> usize {
        self.counts().max().unwrap_or(0)
    }

    /// Sum of all counts.
    pub fn total(&self) -> usize {
        self.counts().sum()
    }

    /// `(label, count)` pairs in chart order.
    pub fn labelled(&self) -> Vec<(String, usize)> {
        match self {
            Self::Ranked(points) => points.iter().map(|p| (p.value.clone(), p.count)).collect(),
            Self::Yearly(points) => points.iter().map(|p| (p.year.to_string(), p.count)).collect(),
        }
    }

    fn counts(&self) -> Box<dyn Iterator<Item = usize> + '_> {
        match self {
            Self::Ranked(points) => Box::new(points.iter().map(|p| p.count)),
            Self::Yearly(points) => Box::new(points.iter().map(|p| p.count)),
        }
    }
}

/// A chart ready for rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartSeries {
    pub kind: ChartKind,
    pub title: String,
    pub style: ChartStyle,
    pub data: ChartData,
}

/// Compute the series for `kind`. Top-N charts keep `top_n` entries.
pub fn build_chart(dataset: &Dataset, kind: ChartKind, top_n: usize) -> ChartSeries {
    let matches = &dataset.matches;
    let data = match kind {
        ChartKind::MatchesByCity => {
            ChartData::Ranked(MatchAggregator::ranked(matches, MatchColumn::City))
        }
        ChartKind::TopTeams => ChartData::Ranked(MatchAggregator::top_combined(
            matches,
            MatchColumn::Team1,
            MatchColumn::Team2,
            top_n,
        )),
        ChartKind::MatchesOverYears => ChartData::Yearly(MatchAggregator::group_by_year(matches)),
        ChartKind::TopVenues => {
            ChartData::Ranked(MatchAggregator::top_n(matches, MatchColumn::Venue, top_n))
        }
        ChartKind::TopSeries => {
            ChartData::Ranked(MatchAggregator::top_n(matches, MatchColumn::Series, top_n))
        }
        ChartKind::MatchesByCategory => {
            ChartData::Ranked(MatchAggregator::ranked(matches, MatchColumn::MatchCategory))
        }
        ChartKind::TossWinners => {
            ChartData::Ranked(MatchAggregator::top_n(matches, MatchColumn::TossWinner, top_n))
        }
        ChartKind::TeamMatchTotals => ChartData::Ranked(MatchAggregator::ranked_combined(
            matches,
            MatchColumn::Team1,
            MatchColumn::Team2,
        )),
    };

    debug!("chart {}: {} points", kind, data.len());

    ChartSeries {
        kind,
        title: kind.title(top_n),
        style: kind.style(),
        data,
    }
}

/// Distinct values listed beside `kind` for reference. They never filter
/// the chart.
pub fn reference_options(dataset: &Dataset, kind: ChartKind) -> Vec<String> {
    let matches = &dataset.matches;
    match kind {
        ChartKind::MatchesByCity => MatchAggregator::distinct_values(matches, MatchColumn::City),
        ChartKind::TopTeams | ChartKind::TeamMatchTotals => {
            MatchAggregator::distinct_combined(matches, MatchColumn::Team1, MatchColumn::Team2)
        }
        ChartKind::MatchesOverYears | ChartKind::MatchesByCategory => {
            MatchAggregator::distinct_values(matches, MatchColumn::MatchCategory)
        }
        ChartKind::TopVenues => MatchAggregator::distinct_values(matches, MatchColumn::Venue),
        ChartKind::TopSeries => MatchAggregator::distinct_values(matches, MatchColumn::Series),
        ChartKind::TossWinners => {
            MatchAggregator::distinct_values(matches, MatchColumn::TossWinner)
        }
    }
}

// ── Table previews ────────────────────────────────────────────────────────────

/// The first rows of one loaded table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TablePreview {
    pub table: TableKind,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
    /// Row count of the whole table.
    pub total_rows: usize,
}

impl TablePreview {
    /// Preview the first `rows` rows of `kind`, every source column included.
    /// Null cells render empty.
    pub fn of(dataset: &Dataset, kind: TableKind, rows: usize) -> Self {
        let table = dataset
            .reference(kind)
            .unwrap_or_else(|| dataset.matches.raw());
        Self {
            table: kind,
            headers: table.headers.clone(),
            rows: table.head(rows).to_vec(),
            total_rows: dataset.row_count(kind),
        }
    }
}

// ── Report ────────────────────────────────────────────────────────────────────

/// Everything the dashboard shows, in one serialisable value.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardReport {
    /// ISO-8601 timestamp when this report was generated.
    pub generated_at: String,
    pub top_n: usize,
    pub kpis: KpiSummary,
    pub charts: Vec<ChartSeries>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preview: Option<TablePreview>,
}

impl DashboardReport {
    /// KPIs plus every chart.
    pub fn build(dataset: &Dataset, top_n: usize) -> Self {
        Self::build_with(dataset, &ChartKind::ALL, top_n)
    }

    /// KPIs plus the listed charts, in the order given.
    pub fn build_with(dataset: &Dataset, charts: &[ChartKind], top_n: usize) -> Self {
        let start = std::time::Instant::now();

        let kpis = KpiSummary::compute(dataset);
        let charts = charts
            .iter()
            .map(|&kind| build_chart(dataset, kind, top_n))
            .collect();

        debug!(
            "report built in {:.3}s",
            start.elapsed().as_secs_f64()
        );

        Self {
            generated_at: Utc::now().to_rfc3339(),
            top_n,
            kpis,
            charts,
            preview: None,
        }
    }

    /// Attach a table preview.
    pub fn with_preview(mut self, preview: TablePreview) -> Self {
        self.preview = Some(preview);
        self
    }

    pub fn chart(&self, kind: ChartKind) -> Option<&ChartSeries> {
        self.charts.iter().find(|c| c.kind == kind)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
