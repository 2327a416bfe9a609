//! Transcript preprocessing
//!
//! Scoring dimensions look at both ends of a call (opening rapport, closing
//! call-to-action), so over-long transcripts are bounded by keeping the head
//! and the tail rather than a plain prefix.

/// Marker inserted where the middle of an over-long transcript was removed
pub const TRUNCATION_MARKER: &str = "\n\n[... transcript truncated for analysis ...]\n\n";

/// Bound a transcript to `max_len` characters, preserving opening and closing.
///
/// Returns the input unchanged when it already fits. Otherwise the head and
/// tail are kept in equal halves around [`TRUNCATION_MARKER`]; the kept
/// budget accounts for the marker, so the result never exceeds `max_len` and
/// the operation is idempotent for a fixed `max_len`.
pub fn truncate(text: &str, max_len: usize) -> String {
    let total = text.chars().count();
    if total <= max_len {
        return text.to_string();
    }

    let marker_len = TRUNCATION_MARKER.chars().count();
    let keep = max_len.saturating_sub(marker_len);
    if keep == 0 {
        // Budget too small to fit the marker at all
        return text.chars().take(max_len).collect();
    }

    let head = keep / 2;
    let tail = keep - head;
    let opening: String = text.chars().take(head).collect();
    let closing: String = text.chars().skip(total - tail).collect();

    format!("{opening}{TRUNCATION_MARKER}{closing}")
}
