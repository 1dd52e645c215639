//! Grouped counts, rankings and year bucketing over the matches table.
//!
//! Every function is pure: it reads the table and returns a fresh result.
//! Null cells never count. Ties in rankings keep first-seen order.
//! Category values group case-insensitively under their first-seen spelling.

use std::borrow::Cow;
use std::collections::{BTreeMap, HashMap};

use dashboard_core::models::{MatchCategory, MatchColumn, MatchTable};
use dashboard_core::time_utils::year_of_epoch_millis;
use serde::{Deserialize, Serialize};
use tracing::trace;

// ── Result rows ───────────────────────────────────────────────────────────────

/// One distinct value and how many times it occurred.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValueCount {
    pub value: String,
    pub count: usize,
}

impl ValueCount {
    pub fn new(value: impl Into<String>, count: usize) -> Self {
        Self {
            value: value.into(),
            count,
        }
    }
}

/// Matches started in one calendar year (UTC).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearCount {
    pub year: i32,
    pub count: usize,
}

// ── MatchAggregator ───────────────────────────────────────────────────────────

/// Stateless helper that groups and ranks match rows.
pub struct MatchAggregator;

impl MatchAggregator {
    /// Occurrence count of every distinct non-null value of `column`.
    ///
    /// Empty when the column is absent from the source.
    pub fn count_by(table: &MatchTable, column: MatchColumn) -> HashMap<String, usize> {
        into_map(tally(table.values(column), folds_case(column)))
    }

    /// The `n` most frequent values of `column`, highest count first.
    ///
    /// Equal counts keep the order in which the values first appeared.
    /// Returns every value when fewer than `n` exist.
    pub fn top_n(table: &MatchTable, column: MatchColumn, n: usize) -> Vec<ValueCount> {
        let mut ranked = Self::ranked(table, column);
        ranked.truncate(n);
        ranked
    }

    /// Every distinct value of `column`, highest count first.
    pub fn ranked(table: &MatchTable, column: MatchColumn) -> Vec<ValueCount> {
        rank(tally(table.values(column), folds_case(column)))
    }

    /// Counts over two columns treated as one series: every value of
    /// `first`, then every value of `second`.
    ///
    /// A team appears in either `Team 1` or `Team 2` depending on the side it
    /// played, so this is how matches-per-team is counted.
    pub fn combined_team_counts(
        table: &MatchTable,
        first: MatchColumn,
        second: MatchColumn,
    ) -> HashMap<String, usize> {
        into_map(tally(concat(table, first, second), folds_case(first)))
    }

    /// Ranked form of [`MatchAggregator::combined_team_counts`], truncated to `n`.
    pub fn top_combined(
        table: &MatchTable,
        first: MatchColumn,
        second: MatchColumn,
        n: usize,
    ) -> Vec<ValueCount> {
        let mut ranked = Self::ranked_combined(table, first, second);
        ranked.truncate(n);
        ranked
    }

    /// Ranked form of [`MatchAggregator::combined_team_counts`].
    pub fn ranked_combined(
        table: &MatchTable,
        first: MatchColumn,
        second: MatchColumn,
    ) -> Vec<ValueCount> {
        rank(tally(concat(table, first, second), folds_case(first)))
    }

    /// Matches per calendar year of their start timestamp, ascending by year.
    ///
    /// Rows whose timestamp is missing or unparseable are left out.
    pub fn group_by_year(table: &MatchTable) -> Vec<YearCount> {
        let mut years: BTreeMap<i32, usize> = BTreeMap::new();
        let mut skipped = 0usize;

        if table.has_column(MatchColumn::StartDate) {
            for record in table.records() {
                match record.start_date.as_deref().and_then(year_of_epoch_millis) {
                    Some(year) => *years.entry(year).or_insert(0) += 1,
                    None => skipped += 1,
                }
            }
        }

        if skipped > 0 {
            trace!("group_by_year: {} rows without a usable start date", skipped);
        }

        years
            .into_iter()
            .map(|(year, count)| YearCount { year, count })
            .collect()
    }

    /// The most frequent value of `column`.
    ///
    /// `None` when the column is absent or holds no non-null value. Ties go
    /// to the value seen first.
    pub fn mode_of(table: &MatchTable, column: MatchColumn) -> Option<String> {
        Self::top_n(table, column, 1)
            .into_iter()
            .next()
            .map(|vc| vc.value)
    }

    /// Number of matches whose category equals `category`, ignoring case.
    pub fn category_count(table: &MatchTable, category: &MatchCategory) -> usize {
        if !table.has_column(MatchColumn::MatchCategory) {
            return 0;
        }
        table
            .records()
            .iter()
            .filter_map(|r| r.category.as_ref())
            .filter(|c| c.matches(category))
            .count()
    }

    /// Distinct non-null values of `column`, in first-seen order.
    pub fn distinct_values(table: &MatchTable, column: MatchColumn) -> Vec<String> {
        tally(table.values(column), folds_case(column))
            .into_iter()
            .map(|vc| vc.value)
            .collect()
    }

    /// Distinct values over two columns treated as one series.
    pub fn distinct_combined(
        table: &MatchTable,
        first: MatchColumn,
        second: MatchColumn,
    ) -> Vec<String> {
        tally(concat(table, first, second), folds_case(first))
            .into_iter()
            .map(|vc| vc.value)
            .collect()
    }
}

// ── Private ───────────────────────────────────────────────────────────────────

fn concat<'a>(
    table: &'a MatchTable,
    first: MatchColumn,
    second: MatchColumn,
) -> impl Iterator<Item = &'a str> + 'a {
    table.values(first).chain(table.values(second))
}

/// Category values compare case-insensitively, like [`MatchCategory::matches`].
fn folds_case(column: MatchColumn) -> bool {
    column == MatchColumn::MatchCategory
}

/// Count values, keeping the order in which each distinct value first appeared.
///
/// With `fold_case`, values differing only in ASCII case share one entry
/// labelled with the first spelling seen.
fn tally<'a>(values: impl Iterator<Item = &'a str>, fold_case: bool) -> Vec<ValueCount> {
    let mut positions: HashMap<Cow<'a, str>, usize> = HashMap::new();
    let mut counts: Vec<ValueCount> = Vec::new();

    for value in values {
        let key = if fold_case {
            Cow::Owned(value.to_ascii_lowercase())
        } else {
            Cow::Borrowed(value)
        };
        match positions.get(&key) {
            Some(&pos) => counts[pos].count += 1,
            None => {
                positions.insert(key, counts.len());
                counts.push(ValueCount::new(value, 1));
            }
        }
    }
    counts
}

/// Sort by count descending. The sort is stable, so ties stay in
/// first-seen order.
fn rank(mut counts: Vec<ValueCount>) -> Vec<ValueCount> {
    counts.sort_by(|a, b| b.count.cmp(&a.count));
    counts
}

fn into_map(counts: Vec<ValueCount>) -> HashMap<String, usize> {
    counts.into_iter().map(|vc| (vc.value, vc.count)).collect()
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use dashboard_core::models::MatchRecord;

    fn opt(s: &str) -> Option<String> {
        if s.is_empty() {
            None
        } else {
            Some(s.to_string())
        }
    }

    fn teams(team1: &str, team2: &str) -> MatchRecord {
        MatchRecord {
            team1: opt(team1),
            team2: opt(team2),
            ..Default::default()
        }
    }

    fn cities(cities: &[&str]) -> MatchTable {
        MatchTable::from_records(
            cities
                .iter()
                .map(|c| MatchRecord {
                    city: opt(c),
                    ..Default::default()
                })
                .collect(),
        )
    }

    fn categories(values: &[&str]) -> MatchTable {
        MatchTable::from_records(
            values
                .iter()
                .map(|v| MatchRecord {
                    category: MatchCategory::parse(v),
                    ..Default::default()
                })
                .collect(),
        )
    }

    fn started(ms: &[&str]) -> MatchTable {
        MatchTable::from_records(
            ms.iter()
                .map(|v| MatchRecord {
                    start_date: opt(v),
                    ..Default::default()
                })
                .collect(),
        )
    }

    // ── count_by ──────────────────────────────────────────────────────────────

    #[test]
    fn test_count_by_counts_distinct_values() {
        let table = cities(&["Mumbai", "Pune", "Mumbai", "Delhi", "Mumbai"]);
        let counts = MatchAggregator::count_by(&table, MatchColumn::City);

        assert_eq!(counts.len(), 3);
        assert_eq!(counts["Mumbai"], 3);
        assert_eq!(counts["Pune"], 1);
        assert_eq!(counts["Delhi"], 1);
    }

    #[test]
    fn test_count_by_sum_equals_non_null_rows() {
        let table = cities(&["Mumbai", "", "Pune", "", "Mumbai"]);
        let counts = MatchAggregator::count_by(&table, MatchColumn::City);

        let total: usize = counts.values().sum();
        let non_null = table.records().iter().filter(|r| r.city.is_some()).count();
        assert_eq!(total, non_null);
        assert_eq!(total, 3);
    }

    #[test]
    fn test_count_by_empty_table() {
        let table = MatchTable::default();
        assert!(MatchAggregator::count_by(&table, MatchColumn::Venue).is_empty());
    }

    #[test]
    fn test_count_by_is_case_sensitive_for_text_columns() {
        let table = cities(&["Mumbai", "mumbai"]);
        assert_eq!(MatchAggregator::count_by(&table, MatchColumn::City).len(), 2);
    }

    // ── top_n ─────────────────────────────────────────────────────────────────

    #[test]
    fn test_top_n_sorted_descending_and_truncated() {
        let table = cities(&["A", "B", "B", "C", "C", "C", "D"]);
        let top = MatchAggregator::top_n(&table, MatchColumn::City, 2);

        assert_eq!(top, vec![ValueCount::new("C", 3), ValueCount::new("B", 2)]);
    }

    #[test]
    fn test_top_n_ties_keep_first_seen_order() {
        let table = cities(&["Pune", "Delhi", "Chennai", "Delhi", "Pune", "Chennai"]);
        let top = MatchAggregator::top_n(&table, MatchColumn::City, 10);

        let order: Vec<&str> = top.iter().map(|vc| vc.value.as_str()).collect();
        assert_eq!(order, vec!["Pune", "Delhi", "Chennai"]);
    }

    #[test]
    fn test_top_n_length_is_min_of_n_and_distinct() {
        let table = cities(&["A", "B", "B", "C"]);
        assert_eq!(MatchAggregator::top_n(&table, MatchColumn::City, 10).len(), 3);
        assert_eq!(MatchAggregator::top_n(&table, MatchColumn::City, 3).len(), 3);
        assert_eq!(MatchAggregator::top_n(&table, MatchColumn::City, 1).len(), 1);
        assert!(MatchAggregator::top_n(&table, MatchColumn::City, 0).is_empty());
    }

    #[test]
    fn test_top_n_is_non_increasing() {
        let table = cities(&["E", "A", "B", "B", "C", "C", "C", "D", "D", "E", "E", "E"]);
        let top = MatchAggregator::ranked(&table, MatchColumn::City);
        assert!(top.windows(2).all(|w| w[0].count >= w[1].count));
        assert_eq!(top[0], ValueCount::new("E", 4));
    }

    // ── combined_team_counts ──────────────────────────────────────────────────

    #[test]
    fn test_combined_team_counts_example() {
        let table = MatchTable::from_records(vec![teams("A", "B"), teams("B", "C")]);
        let counts =
            MatchAggregator::combined_team_counts(&table, MatchColumn::Team1, MatchColumn::Team2);

        let expected: HashMap<String, usize> =
            [("A", 1), ("B", 2), ("C", 1)].into_iter().map(|(k, v)| (k.to_string(), v)).collect();
        assert_eq!(counts, expected);
    }

    #[test]
    fn test_combined_team_counts_total_excludes_nulls() {
        let table = MatchTable::from_records(vec![
            teams("A", "B"),
            teams("", "C"),
            teams("A", ""),
            teams("C", "A"),
        ]);
        let counts =
            MatchAggregator::combined_team_counts(&table, MatchColumn::Team1, MatchColumn::Team2);

        let total: usize = counts.values().sum();
        assert_eq!(total, table.len() * 2 - 2);
        assert_eq!(counts["A"], 3);
    }

    #[test]
    fn test_top_combined_first_seen_over_concatenation() {
        // Team 1 column is consumed before Team 2, so "B" (first seen in
        // Team 1) ranks ahead of "X" on a tie.
        let table = MatchTable::from_records(vec![teams("B", "X"), teams("Y", "X"), teams("B", "Z")]);
        let top = MatchAggregator::top_combined(&table, MatchColumn::Team1, MatchColumn::Team2, 2);

        assert_eq!(top, vec![ValueCount::new("B", 2), ValueCount::new("X", 2)]);
    }

    // ── group_by_year ─────────────────────────────────────────────────────────

    #[test]
    fn test_group_by_year_ascending() {
        let table = started(&[
            "1704067200000", // 2024-01-01
            "1672531200000", // 2023-01-01
            "1706745600000", // 2024-02-01
            "1609459200000", // 2021-01-01
        ]);
        let years = MatchAggregator::group_by_year(&table);

        assert_eq!(
            years,
            vec![
                YearCount { year: 2021, count: 1 },
                YearCount { year: 2023, count: 1 },
                YearCount { year: 2024, count: 2 },
            ]
        );
        assert!(years.windows(2).all(|w| w[0].year < w[1].year));
    }

    #[test]
    fn test_group_by_year_skips_unparseable() {
        let table = started(&["1704067200000", "next week", "", "1704067200000.0"]);
        let years = MatchAggregator::group_by_year(&table);

        assert_eq!(years, vec![YearCount { year: 2024, count: 2 }]);
    }

    #[test]
    fn test_group_by_year_skips_out_of_range_sentinel() {
        let table = started(&["1704067200000", "9999999999999"]);
        let years = MatchAggregator::group_by_year(&table);

        assert_eq!(years, vec![YearCount { year: 2024, count: 1 }]);
    }

    #[test]
    fn test_group_by_year_all_invalid_is_empty() {
        let table = started(&["x", "y"]);
        assert!(MatchAggregator::group_by_year(&table).is_empty());
    }

    // ── mode_of ───────────────────────────────────────────────────────────────

    #[test]
    fn test_mode_of_returns_most_frequent() {
        let table = cities(&["Pune", "Mumbai", "Mumbai", "Delhi"]);
        assert_eq!(
            MatchAggregator::mode_of(&table, MatchColumn::City).as_deref(),
            Some("Mumbai")
        );
    }

    #[test]
    fn test_mode_of_tie_goes_to_first_seen() {
        let table = cities(&["Pune", "Mumbai", "Mumbai", "Pune"]);
        assert_eq!(
            MatchAggregator::mode_of(&table, MatchColumn::City).as_deref(),
            Some("Pune")
        );
    }

    #[test]
    fn test_mode_of_absent_column_is_none() {
        let record = MatchRecord {
            toss_winner: Some("India".to_string()),
            ..Default::default()
        };
        let table = MatchTable::with_columns(vec![MatchColumn::Team1], vec![record]);
        assert_eq!(MatchAggregator::mode_of(&table, MatchColumn::TossWinner), None);
    }

    #[test]
    fn test_mode_of_all_null_is_none() {
        let table = cities(&["", ""]);
        assert_eq!(MatchAggregator::mode_of(&table, MatchColumn::City), None);
    }

    // ── category_count ────────────────────────────────────────────────────────

    #[test]
    fn test_category_count_case_insensitive() {
        let table = categories(&["live", "Live", "recent", "upcoming"]);

        assert_eq!(MatchAggregator::category_count(&table, &MatchCategory::Live), 2);
        assert_eq!(MatchAggregator::category_count(&table, &MatchCategory::Recent), 1);
        assert_eq!(MatchAggregator::category_count(&table, &MatchCategory::Upcoming), 1);
    }

    #[test]
    fn test_category_count_other_value() {
        let table = categories(&["Abandoned", "ABANDONED", "live"]);
        let other = MatchCategory::Other("abandoned".to_string());
        assert_eq!(MatchAggregator::category_count(&table, &other), 2);
    }

    #[test]
    fn test_category_breakdown_uses_canonical_labels() {
        let table = categories(&["LIVE", "live", "Recent"]);
        let counts = MatchAggregator::count_by(&table, MatchColumn::MatchCategory);
        assert_eq!(counts["live"], 2);
        assert_eq!(counts["recent"], 1);
    }

    #[test]
    fn test_category_breakdown_folds_case_of_other_values() {
        let table = categories(&["Abandoned", "live", "ABANDONED", "abandoned"]);

        let ranked = MatchAggregator::ranked(&table, MatchColumn::MatchCategory);
        assert_eq!(
            ranked,
            vec![ValueCount::new("Abandoned", 3), ValueCount::new("live", 1)]
        );
        let other = MatchCategory::Other("abandoned".to_string());
        assert_eq!(
            ranked[0].count,
            MatchAggregator::category_count(&table, &other)
        );
        assert_eq!(
            MatchAggregator::distinct_values(&table, MatchColumn::MatchCategory),
            vec!["Abandoned", "live"]
        );
    }

    #[test]
    fn test_city_counts_stay_case_sensitive() {
        let table = cities(&["Pune", "PUNE"]);
        assert_eq!(MatchAggregator::count_by(&table, MatchColumn::City).len(), 2);
    }

    // ── distinct values ───────────────────────────────────────────────────────

    #[test]
    fn test_distinct_values_first_seen_order() {
        let table = cities(&["Pune", "", "Delhi", "Pune", "Agra"]);
        assert_eq!(
            MatchAggregator::distinct_values(&table, MatchColumn::City),
            vec!["Pune", "Delhi", "Agra"]
        );
    }

    #[test]
    fn test_distinct_combined() {
        let table = MatchTable::from_records(vec![teams("A", "B"), teams("C", "A")]);
        assert_eq!(
            MatchAggregator::distinct_combined(&table, MatchColumn::Team1, MatchColumn::Team2),
            vec!["A", "C", "B"]
        );
    }
}
