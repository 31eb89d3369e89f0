//! Content metrics derived from post bodies. Never persisted.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

pub const WORDS_PER_MINUTE: usize = 200;

/// Preview length shown on post cards.
pub const CARD_EXCERPT_CHARS: usize = 160;

static TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]*>").expect("valid tag regex"));

/// Removes every `<...>` markup sequence.
pub fn strip_tags(html: &str) -> Cow<'_, str> {
    TAG_RE.replace_all(html, "")
}

/// Number of whitespace-separated words in the stripped text.
pub fn word_count(html: &str) -> usize {
    strip_tags(html).split_whitespace().count()
}

/// Estimated minutes to read, `ceil(words / 200)`.
pub fn reading_time(html: &str) -> usize {
    word_count(html).div_ceil(WORDS_PER_MINUTE)
}

/// Characters of the stripped, trimmed text.
pub fn character_count(html: &str) -> usize {
    strip_tags(html).trim().chars().count()
}

/// Plain-text preview of at most `max_chars` characters, with `...` appended
/// when the text was cut.
pub fn excerpt(html: &str, max_chars: usize) -> String {
    let stripped = strip_tags(html);
    let text = stripped.trim();
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentMetrics {
    pub word_count: usize,
    pub reading_time: usize,
}

impl ContentMetrics {
    pub fn of(html: &str) -> Self {
        let word_count = word_count(html);
        Self {
            word_count,
            reading_time: word_count.div_ceil(WORDS_PER_MINUTE),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(n: usize) -> String {
        vec!["word"; n].join(" ")
    }

    #[test]
    fn test_strip_tags() {
        assert_eq!(strip_tags("<p>Hello <strong>world</strong></p>"), "Hello world");
    }

    #[test]
    fn test_word_count_ignores_markup_and_blank_runs() {
        assert_eq!(word_count("<p>one   two</p>\n<p>three</p>"), 3);
        assert_eq!(word_count("<p></p>"), 0);
    }

    #[test]
    fn test_reading_time_rounds_up() {
        assert_eq!(reading_time(&format!("<p>{}</p>", words(400))), 2);
        assert_eq!(reading_time(&words(401)), 3);
        assert_eq!(reading_time(&words(1)), 1);
        assert_eq!(reading_time(""), 0);
    }

    #[test]
    fn test_character_count() {
        assert_eq!(character_count("<p>  short </p>"), 5);
    }

    #[test]
    fn test_excerpt() {
        assert_eq!(excerpt("<p>Hello world</p>", 5), "Hello...");
        assert_eq!(excerpt("<p>Hi</p>", 5), "Hi");
    }

    #[test]
    fn test_metrics_struct_matches_functions() {
        let body = format!("<h1>Title</h1><p>{}</p>", words(250));
        let metrics = ContentMetrics::of(&body);
        assert_eq!(metrics.word_count, 251);
        assert_eq!(metrics.reading_time, 2);
    }
}
