//! Text and timestamp formatting for the rendered page.
//!
//! All dates are shown in Chilean Spanish for the `America/Santiago` zone,
//! regardless of where the process runs.

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, Timelike, Utc};
use chrono_tz::America::Santiago;
use url::Url;

/// Placeholder for a missing or unparsable timestamp.
pub const NO_DATE: &str = "Sin fecha";

const MONTHS_ES: [&str; 12] = [
    "ene", "feb", "mar", "abr", "may", "jun", "jul", "ago", "sept", "oct", "nov", "dic",
];

/// Collapses whitespace runs to one space and trims both ends.
pub fn safe_text(value: &str) -> String {
    value.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Cuts `value` to at most `max_chars` characters, ending in `…` when cut.
pub fn truncate(value: &str, max_chars: usize) -> String {
    if value.chars().count() <= max_chars {
        return value.to_string();
    }
    let keep = max_chars.saturating_sub(1);
    let mut out: String = value.chars().take(keep).collect();
    out.truncate(out.trim_end().len());
    out.push('…');
    out
}

/// Parses the timestamp shapes feeds actually send: RFC 3339, RFC 2822 (RSS),
/// a zone-less ISO datetime (read as UTC) and a bare date.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// `05 mar, 14:07` in Santiago time, or [`NO_DATE`].
pub fn format_date(raw: Option<&str>) -> String {
    match raw.and_then(parse_timestamp) {
        Some(dt) => format_datetime(dt),
        None => NO_DATE.to_string(),
    }
}

pub fn format_datetime(dt: DateTime<Utc>) -> String {
    let local = dt.with_timezone(&Santiago);
    format!(
        "{:02} {}, {:02}:{:02}",
        local.day(),
        MONTHS_ES[local.month0() as usize],
        local.hour(),
        local.minute()
    )
}

/// `HH:MM:SS` in Santiago time.
pub fn format_clock(now: DateTime<Utc>) -> String {
    now.with_timezone(&Santiago).format("%H:%M:%S").to_string()
}

/// Returns the normalized URL if it is absolute `http`/`https`; anything else
/// (relative, `javascript:`, `data:`) is refused.
pub fn safe_url(raw: &str) -> Option<String> {
    let url = Url::parse(raw.trim()).ok()?;
    matches!(url.scheme(), "http" | "https").then(|| url.to_string())
}
