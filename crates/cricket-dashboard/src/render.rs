//! Renders a [`DashboardReport`] for the terminal or as JSON.

use std::fmt::Write as _;

use dashboard_core::error::Result;
use dashboard_core::formatting::{bar, fit_label, format_count, or_not_available, percentage};
use dashboard_core::settings::{OutputFormat, Settings, View};
use dashboard_data::analysis::{
    reference_options, ChartKind, ChartSeries, DashboardReport, KpiSummary, TablePreview,
};
use dashboard_data::reader::Dataset;

const LABEL_WIDTH: usize = 28;
const BAR_WIDTH: usize = 30;
const CELL_WIDTH: usize = 22;
/// Reference options listed before eliding the rest.
const MAX_OPTIONS: usize = 8;

/// Build the report the settings ask for and render it.
pub fn render(settings: &Settings, dataset: &Dataset) -> Result<String> {
    let report = build_report(settings, dataset)?;
    match settings.format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(&report)? + "\n"),
        OutputFormat::Text => Ok(render_text(settings.view, &report, dataset)),
    }
}

/// Select charts and preview according to `--view`, `--chart` and `--table`.
pub fn build_report(settings: &Settings, dataset: &Dataset) -> Result<DashboardReport> {
    let charts: Vec<ChartKind> = match (&settings.chart, settings.view) {
        (_, View::Kpis | View::Table) => Vec::new(),
        (Some(name), _) => vec![name.parse()?],
        (None, _) => ChartKind::ALL.to_vec(),
    };

    let report = DashboardReport::build_with(dataset, &charts, settings.top_n());
    let report = match settings.view {
        View::Table | View::All => report.with_preview(TablePreview::of(
            dataset,
            settings.table,
            settings.preview_rows(),
        )),
        View::Kpis | View::Charts => report,
    };
    Ok(report)
}

fn render_text(view: View, report: &DashboardReport, dataset: &Dataset) -> String {
    let mut out = String::new();

    if matches!(view, View::Kpis | View::All) {
        write_kpis(&mut out, &report.kpis);
    }
    for chart in &report.charts {
        write_chart(&mut out, chart, &reference_options(dataset, chart.kind));
    }
    if let Some(preview) = &report.preview {
        write_preview(&mut out, preview);
    }
    out
}

fn write_kpis(out: &mut String, kpis: &KpiSummary) {
    heading(out, "KPIs & Metrics");
    let rows = [
        ("Total Matches", format_count(kpis.total_matches)),
        ("Total Teams", format_count(kpis.total_teams)),
        ("Total Series", format_count(kpis.total_series)),
        ("Total Venues", format_count(kpis.total_venues)),
        (
            "Most Played Venue",
            or_not_available(kpis.most_played_venue.as_deref()).to_string(),
        ),
        ("Upcoming Matches", format_count(kpis.upcoming_matches)),
        ("Live Matches", format_count(kpis.live_matches)),
        ("Recent Matches", format_count(kpis.recent_matches)),
    ];
    for (label, value) in rows {
        let _ = writeln!(out, "  {}  {}", fit_label(label, 20), value);
    }
    out.push('\n');
}

fn write_chart(out: &mut String, chart: &ChartSeries, options: &[String]) {
    heading(out, &chart.title);

    if chart.data.is_empty() {
        out.push_str("  (no data)\n\n");
        return;
    }

    let max = chart.data.max_count();
    let total = chart.data.total();
    for (label, count) in chart.data.labelled() {
        let _ = writeln!(
            out,
            "  {}  {:<bar_width$}  {:>7}  ({:.1}%)",
            fit_label(&label, LABEL_WIDTH),
            bar(count, max, BAR_WIDTH),
            format_count(count),
            percentage(count, total, 1),
            bar_width = BAR_WIDTH,
        );
    }

    if !options.is_empty() {
        let shown: Vec<&str> = options.iter().take(MAX_OPTIONS).map(String::as_str).collect();
        let _ = write!(
            out,
            "  {} (reference): {}",
            chart.kind.reference_label(),
            shown.join(", ")
        );
        if options.len() > MAX_OPTIONS {
            let _ = write!(out, ", … (+{} more)", options.len() - MAX_OPTIONS);
        }
        out.push('\n');
    }
    out.push('\n');
}

fn write_preview(out: &mut String, preview: &TablePreview) {
    heading(
        out,
        &format!(
            "{} Table (first {} of {} rows)",
            preview.table,
            preview.rows.len(),
            format_count(preview.total_rows)
        ),
    );

    let header: Vec<String> = preview
        .headers
        .iter()
        .map(|h| fit_label(h, CELL_WIDTH))
        .collect();
    let _ = writeln!(out, "  {}", header.join(" | ").trim_end());

    for row in &preview.rows {
        let cells: Vec<String> = (0..preview.headers.len())
            .map(|i| fit_label(row.get(i).map(String::as_str).unwrap_or(""), CELL_WIDTH))
            .collect();
        let _ = writeln!(out, "  {}", cells.join(" | ").trim_end());
    }
    out.push('\n');
}

fn heading(out: &mut String, title: &str) {
    let _ = writeln!(out, "{title}");
    let _ = writeln!(out, "{}", "─".repeat(title.chars().count()));
}

// ── Tests ──────────────────────────────────────────────────────────────────────
