//! Span formatting and minute rounding for record timestamps.

use chrono::{DateTime, TimeZone, Utc};

const MINUTE_MS: i64 = 60_000;

/// Legacy display text for a span whose end precedes its start. Only the
/// display layer renders this; everything else sees [`NegativeDuration`].
pub const NEGATIVE_ELAPSED_TEXT: &str = "Dude, negative time?";

/// End time precedes start time.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("end time {end} precedes start time {start}")]
pub struct NegativeDuration {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

/// Format the span between two timestamps as `{d}d {h}h {m}m`, larger units
/// first and included only when nonzero; the minutes segment is always
/// present. Leftover seconds are truncated.
pub fn elapsed_between(
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> Result<String, NegativeDuration> {
    let secs = (end - start).num_seconds();
    if secs < 0 {
        return Err(NegativeDuration { start, end });
    }

    let days = secs / 86_400;
    let hours = (secs % 86_400) / 3_600;
    let minutes = (secs % 3_600) / 60;

    let mut out = format!("{}m", minutes);
    if hours != 0 {
        out = format!("{}h {}", hours, out);
    }
    if days != 0 {
        out = format!("{}d {}", days, out);
    }
    Ok(out)
}

/// Display-layer rendering stored in `Record::elapsed_time`. A negative
/// span renders as the legacy sentinel instead of failing the mutation
/// that triggered the recompute.
pub fn format_elapsed(start: DateTime<Utc>, end: DateTime<Utc>) -> String {
    elapsed_between(start, end).unwrap_or_else(|_| NEGATIVE_ELAPSED_TEXT.to_string())
}

/// Round a millisecond timestamp to the nearest whole minute, half up.
pub fn round_millis_to_minute(ms: i64) -> i64 {
    (ms + MINUTE_MS / 2).div_euclid(MINUTE_MS) * MINUTE_MS
}

/// Round a timestamp to the nearest whole minute, half up.
pub fn round_to_minute(t: DateTime<Utc>) -> DateTime<Utc> {
    Utc.timestamp_millis_opt(round_millis_to_minute(t.timestamp_millis()))
        .single()
        .unwrap_or(t)
}
