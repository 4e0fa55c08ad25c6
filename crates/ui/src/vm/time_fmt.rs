/// Countdown label in `m:ss`.
#[must_use]
pub fn format_clock(seconds: u32) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}

/// Leaderboard times arrive in milliseconds; sub-second precision is dropped.
#[must_use]
pub fn format_duration_ms(millis: u64) -> String {
    let seconds = millis / 1000;
    format!("{}:{:02}", seconds / 60, seconds % 60)
}
