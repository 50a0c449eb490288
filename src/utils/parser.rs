//! Text primitives for line-oriented processing.
//!
//! Everything here works on raw text and knows nothing about rule tables.

/// Split content into lines, keeping each line's terminator attached.
///
/// Concatenating the returned slices reproduces the input exactly, so a
/// caller can rewrite line bodies and still emit the original terminators.
pub fn lines_with_endings(content: &str) -> impl Iterator<Item = &str> {
    content.split_inclusive('\n')
}

/// Separate a line from its terminator (`\r\n`, `\n`, or none).
pub fn split_terminator(line: &str) -> (&str, &str) {
    if let Some(body) = line.strip_suffix("\r\n") {
        (body, "\r\n")
    } else if let Some(body) = line.strip_suffix('\n') {
        (body, "\n")
    } else {
        (line, "")
    }
}

/// Truncate to at most `max` characters, appending `...` when cut.
pub fn truncate_chars(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((byte_idx, _)) => format!("{}...", &text[..byte_idx]),
        None => text.to_string(),
    }
}

/// Count non-overlapping occurrences of `needle`.
pub fn count_occurrences(haystack: &str, needle: &str) -> usize {
    if needle.is_empty() {
        return 0;
    }
    haystack.matches(needle).count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lines_with_endings_round_trips() {
        let content = "a\r\nb\n\nc";
        let parts: Vec<&str> = lines_with_endings(content).collect();
        assert_eq!(parts, vec!["a\r\n", "b\n", "\n", "c"]);
        assert_eq!(parts.concat(), content);
    }

    #[test]
    fn lines_with_endings_empty_content_has_no_lines() {
        assert_eq!(lines_with_endings("").count(), 0);
    }

    #[test]
    fn split_terminator_handles_each_ending() {
        assert_eq!(split_terminator("x\r\n"), ("x", "\r\n"));
        assert_eq!(split_terminator("x\n"), ("x", "\n"));
        assert_eq!(split_terminator("x"), ("x", ""));
        assert_eq!(split_terminator("x\r"), ("x\r", ""));
    }

    #[test]
    fn truncate_chars_only_cuts_long_text() {
        assert_eq!(truncate_chars("short", 10), "short");
        assert_eq!(truncate_chars("exactly", 7), "exactly");
        assert_eq!(truncate_chars("abcdef", 3), "abc...");
    }

    #[test]
    fn truncate_chars_respects_char_boundaries() {
        assert_eq!(truncate_chars("🎨🎨🎨", 2), "🎨🎨...");
    }

    #[test]
    fn count_occurrences_is_non_overlapping() {
        assert_eq!(count_occurrences("AppColors.a AppColors.b", "AppColors."), 2);
        assert_eq!(count_occurrences("aaaa", "aa"), 2);
        assert_eq!(count_occurrences("abc", ""), 0);
    }
}
