//! Shared utility functions.

/// Take at most `max_chars` characters from `s` for log previews.
///
/// Counts `char`s rather than bytes so multi-byte text is never split.
pub fn preview(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        Some((end, _)) => &s[..end],
        None => s,
    }
}

/// Current wall-clock time as epoch milliseconds.
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
