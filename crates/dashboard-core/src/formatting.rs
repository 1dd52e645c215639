//! Text helpers for rendering metrics outside a graphical front end.

/// Placeholder shown for a metric that has no value.
pub const NOT_AVAILABLE: &str = "N/A";

/// Format a count with thousands separators.
///
/// # Examples
///
/// ```
/// use dashboard_core::formatting::format_count;
///
/// assert_eq!(format_count(0), "0");
/// assert_eq!(format_count(1234), "1,234");
/// assert_eq!(format_count(1234567), "1,234,567");
/// ```
pub fn format_count(value: usize) -> String {
    group_thousands(&value.to_string())
}

/// Render an optional metric, substituting [`NOT_AVAILABLE`] for `None`.
///
/// # Examples
///
/// ```
/// use dashboard_core::formatting::or_not_available;
///
/// assert_eq!(or_not_available(Some("Eden Gardens")), "Eden Gardens");
/// assert_eq!(or_not_available(None), "N/A");
/// ```
pub fn or_not_available(value: Option<&str>) -> &str {
    value.unwrap_or(NOT_AVAILABLE)
}

/// Calculate `(part / whole) * 100`, rounded to `decimal_places`.
///
/// Returns `0.0` if `whole` is zero.
///
/// # Examples
///
/// ```
/// use dashboard_core::formatting::percentage;
///
/// assert!((percentage(50, 200, 1) - 25.0).abs() < 1e-9);
/// assert_eq!(percentage(0, 0, 2), 0.0);
/// ```
pub fn percentage(part: usize, whole: usize, decimal_places: u32) -> f64 {
    if whole == 0 {
        return 0.0;
    }
    let raw = (part as f64 / whole as f64) * 100.0;
    let factor = 10_f64.powi(decimal_places as i32);
    (raw * factor).round() / factor
}

/// A horizontal bar of at most `width` cells, scaled so `max` fills the width.
///
/// Any non-zero count gets at least one cell.
pub fn bar(count: usize, max: usize, width: usize) -> String {
    if max == 0 || count == 0 || width == 0 {
        return String::new();
    }
    let cells = (count * width).div_ceil(max).clamp(1, width);
    "█".repeat(cells)
}

/// Pad or truncate `label` to exactly `width` characters.
///
/// Truncated labels end in `…`.
pub fn fit_label(label: &str, width: usize) -> String {
    let len = label.chars().count();
    if len <= width {
        return format!("{label:<width$}");
    }
    if width == 0 {
        return String::new();
    }
    let mut out: String = label.chars().take(width - 1).collect();
    out.push('…');
    out
}

// ── Internal helpers ──────────────────────────────────────────────────────────

/// Insert commas every three digits from the right of an integer string.
fn group_thousands(s: &str) -> String {
    if s.len() <= 3 {
        return s.to_string();
    }
    let mut result = String::with_capacity(s.len() + s.len() / 3);
    let remainder = s.len() % 3;
    for (i, c) in s.chars().enumerate() {
        if i != 0 && (i % 3 == remainder) {
            result.push(',');
        }
        result.push(c);
    }
    result
}

// ── Tests ──────────────────────────────────────────────────────────────────────
