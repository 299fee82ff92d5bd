//! Human readable lecture durations.

/// Formats a number of seconds the way course cards display it.
///
/// - at least one hour: `"1h 5m"`
/// - at least one minute: `"4m 10s"`
/// - otherwise: `"42s"`
pub fn format_duration(total_seconds: i64) -> String {
    let total = total_seconds.max(0);
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let seconds = total % 60;

    if hours > 0 {
        format!("{hours}h {minutes}m")
    } else if minutes > 0 {
        format!("{minutes}m {seconds}s")
    } else {
        format!("{seconds}s")
    }
}

/// Parses a duration reported by a media host (`"12.48"`) into whole seconds.
pub fn parse_seconds(raw: &str) -> Option<i32> {
    let value: f64 = raw.trim().parse().ok()?;
    if !value.is_finite() || value < 0.0 {
        return None;
    }
    Some(value.round() as i32)
}
