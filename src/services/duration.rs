/// Formats a millisecond count as `M:SS`, or `H:MM:SS` from one hour up.
pub fn format_duration(duration_ms: Option<i64>) -> String {
    let Some(ms) = duration_ms else {
        return String::new();
    };

    let total_seconds = (ms / 1000).max(0);
    let (minutes, seconds) = (total_seconds / 60, total_seconds % 60);
    let (hours, minutes) = (minutes / 60, minutes % 60);

    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, minutes, seconds)
    } else {
        format!("{}:{:02}", minutes, seconds)
    }
}
