//! Human-readable timestamps for item descriptions.

const MINUTE: i64 = 60;
const HOUR: i64 = 60 * MINUTE;
const DAY: i64 = 24 * HOUR;

/// Deltas above this are reported in coarse "months" of sixty days.
const MONTH_SPAN: i64 = 60 * DAY;

/// Current time in epoch seconds.
pub fn now_epoch() -> i64 {
    chrono::Utc::now().timestamp()
}

/// Relative time from `then` to `now`, e.g. `"1d 1h ago"`.
///
/// Hours are shown only below a week, minutes only below a day. Zero
/// components are omitted, so anything under a minute is just `"ago"`.
/// Timestamps in the future count as zero.
pub fn relative_delta(then: i64, now: i64) -> String {
    let delta = now.saturating_sub(then).max(0);
    if delta > MONTH_SPAN {
        return format!("{} months ago", delta / MONTH_SPAN);
    }

    let mut out = String::new();
    let days = delta / DAY;
    if days >= 1 {
        out.push_str(&format!("{}d ", days));
    }
    if days < 7 {
        let hours = (delta % DAY) / HOUR;
        if hours >= 1 {
            out.push_str(&format!("{}h ", hours));
        }
        if days == 0 {
            let minutes = (delta % HOUR) / MINUTE;
            if minutes >= 1 {
                out.push_str(&format!("{}m ", minutes));
            }
        }
    }
    out.push_str("ago");
    out
}

/// Calendar date (UTC) of an epoch-second timestamp as `YYYY-MM-DD`.
pub fn absolute_date(timestamp: i64) -> Option<String> {
    chrono::DateTime::from_timestamp(timestamp, 0).map(|t| t.format("%Y-%m-%d").to_string())
}
