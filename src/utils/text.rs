//! Text helpers for list rows and titles.

/// Width limit for commit titles in the history list
pub const TITLE_LIMIT: usize = 80;

const ELLIPSIS: &str = "...";

/// First line of `message`, cut to at most `limit` characters.
///
/// The first line ends at the first `\r` or `\n`. When it is longer than
/// `limit`, it is cut to `limit - 3` characters followed by `"..."`; a
/// limit below 3 leaves only as many dots as fit.
/// Lengths are counted in characters, not bytes.
///
/// # Example
/// ```
/// use gitdeck::utils::text::truncate;
///
/// assert_eq!(truncate("Fix bug\nDetails here", 80), "Fix bug");
/// assert_eq!(truncate("abcdefghij", 8), "abcde...");
/// ```
pub fn truncate(message: &str, limit: usize) -> String {
    let title = message.split(|c: char| c == '\r' || c == '\n').next().unwrap_or("");
    if title.chars().count() <= limit {
        return title.to_string();
    }
    if limit < ELLIPSIS.len() {
        return ELLIPSIS[..limit].to_string();
    }
    let keep = limit - ELLIPSIS.len();
    let mut cut: String = title.chars().take(keep).collect();
    cut.push_str(ELLIPSIS);
    cut
}

/// Short form of an object id for compact displays.
pub fn short_hash(hash: &str) -> &str {
    match hash.char_indices().nth(10) {
        Some((end, _)) => &hash[..end],
        None => hash,
    }
}
