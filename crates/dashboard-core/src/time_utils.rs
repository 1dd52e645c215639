use chrono::{DateTime, Datelike, Utc};
use tracing::trace;

// ── Epoch-millisecond timestamps ──────────────────────────────────────────────

/// Latest accepted timestamp: the last millisecond representable as signed
/// 64-bit nanoseconds (2262-04-11). Later values are treated as unparseable.
pub const MAX_EPOCH_MILLIS: i64 = i64::MAX / 1_000_000;
/// Earliest accepted timestamp (1677-09-21), mirroring [`MAX_EPOCH_MILLIS`].
pub const MIN_EPOCH_MILLIS: i64 = i64::MIN / 1_000_000;

/// Parse an epoch-millisecond cell into a UTC [`DateTime`].
///
/// Accepts integer text (`"1700000000000"`) and float text
/// (`"1700000000000.0"`, `"1.7e12"`); the fractional millisecond part is
/// dropped. Returns `None` for blank, non-numeric or non-finite input, and
/// for values outside [`MIN_EPOCH_MILLIS`]..=[`MAX_EPOCH_MILLIS`].
pub fn parse_epoch_millis(raw: &str) -> Option<DateTime<Utc>> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }

    let ms = match s.parse::<i64>() {
        Ok(ms) => Some(ms),
        Err(_) => match s.parse::<f64>() {
            Ok(f) if f.is_finite() && f.abs() < i64::MAX as f64 => Some(f.trunc() as i64),
            _ => None,
        },
    };

    match ms {
        Some(ms) if (MIN_EPOCH_MILLIS..=MAX_EPOCH_MILLIS).contains(&ms) => {
            DateTime::from_timestamp_millis(ms)
        }
        Some(ms) => {
            trace!("epoch-millisecond value {} is out of range", ms);
            None
        }
        None => {
            trace!("could not parse epoch-millisecond value \"{}\"", s);
            None
        }
    }
}

/// Calendar year (UTC) of an epoch-millisecond cell.
pub fn year_of_epoch_millis(raw: &str) -> Option<i32> {
    parse_epoch_millis(raw).map(|dt| dt.year())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
