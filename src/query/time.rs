//! Cutoff parsing for higher layers that build `since`/`until` filters
//! (spec.md §4.5). The filters themselves only ever consume an already
//! parsed [`chrono::DateTime<Utc>`]; this module is the one place that
//! turns a user-typed string into one.

use chrono::{DateTime, Duration, NaiveDate, Utc};

use crate::errors::LedgerError;

/// Parses a cutoff token in one of four forms:
/// - a duration like `30s`, `15m`, `6h`;
/// - a day-suffixed integer like `7d`, meaning N calendar days before now;
/// - a date-only `YYYY-MM-DD`, taken as midnight UTC;
/// - a full RFC3339 timestamp.
pub fn parse_cutoff(input: &str, now: DateTime<Utc>) -> Result<DateTime<Utc>, LedgerError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(LedgerError::InvalidTimeRange("empty time value".to_string()));
    }

    if let Some(days) = parse_day_suffix(trimmed) {
        let cutoff = now - Duration::days(days);
        tracing::debug!(input = trimmed, %cutoff, "parsed day-suffix cutoff");
        return Ok(cutoff);
    }
    if let Some(duration) = parse_duration_token(trimmed) {
        let cutoff = now - duration;
        tracing::debug!(input = trimmed, %cutoff, "parsed duration-token cutoff");
        return Ok(cutoff);
    }
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        let cutoff = DateTime::from_naive_utc_and_offset(date.and_hms_opt(0, 0, 0).unwrap(), Utc);
        tracing::debug!(input = trimmed, %cutoff, "parsed date-only cutoff");
        return Ok(cutoff);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        let cutoff = dt.with_timezone(&Utc);
        tracing::debug!(input = trimmed, %cutoff, "parsed rfc3339 cutoff");
        return Ok(cutoff);
    }

    tracing::warn!(input = trimmed, "unrecognized time value");
    Err(LedgerError::InvalidTimeRange(format!(
        "unrecognized time value `{trimmed}`"
    )))
}

fn parse_day_suffix(token: &str) -> Option<i64> {
    let digits = token.strip_suffix('d')?;
    digits.parse::<i64>().ok()
}

fn parse_duration_token(token: &str) -> Option<Duration> {
    let (digits, unit) = token.split_at(token.len().checked_sub(1)?);
    let amount: i64 = digits.parse().ok()?;
    match unit {
        "s" => Some(Duration::seconds(amount)),
        "m" => Some(Duration::minutes(amount)),
        "h" => Some(Duration::hours(amount)),
        _ => None,
    }
}
