use regex::Regex;
use std::sync::OnceLock;

static MARKUP: OnceLock<Regex> = OnceLock::new();
static ENTITY: OnceLock<Regex> = OnceLock::new();

/// Strips tags and character entities from rich-text content.
pub fn strip_markup(html: &str) -> String {
    let markup = MARKUP.get_or_init(|| Regex::new(r"<[^>]*>").expect("static markup pattern"));
    let entity =
        ENTITY.get_or_init(|| Regex::new(r"&[a-zA-Z0-9#]+;").expect("static entity pattern"));
    let without_tags = markup.replace_all(html, " ");
    entity.replace_all(&without_tags, " ").into_owned()
}

pub fn word_count(html: &str) -> usize {
    strip_markup(html).split_whitespace().count()
}

/// Suggested reading time for rich text. Never less than one minute.
///
/// This is a hint shown next to the authored duration, not a replacement for it.
pub fn estimate_reading_minutes(html: &str, words_per_minute: u32) -> u32 {
    let wpm = words_per_minute.max(1) as usize;
    let words = word_count(html);
    (words.div_ceil(wpm) as u32).max(1)
}

/// Characters a reader would see: markup stripped, whitespace runs collapsed
/// to one space and the ends trimmed. Used for length rules.
pub fn visible_len(value: &str) -> usize {
    strip_markup(value)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .chars()
        .count()
}

/// True when rich text shows nothing once tags and entities are removed.
pub fn is_visually_blank(html: &str) -> bool {
    strip_markup(html).trim().is_empty()
}
