//! Line-level patterns: list items, role sentences, restrictions, dedup keys.

use std::sync::LazyLock;

use regex::Regex;

/// "You are...", "You're...", "You [verb]...", "As a/an...", "I want you to act as..."
static ROLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(you're|you\s+\w+|as\s+an?|i\s+want\s+you\s+to\s+act\s+as)\s+")
        .expect("role pattern")
});

/// Leading negations and exclusivity markers. Always a restriction, whatever the section.
static RESTRICTION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^(do\s+not|don't|never|avoid|must\s+not|cannot|can't|should\s+not|shouldn't|only\s+output|output\s+only)\b",
    )
    .expect("restriction pattern")
});

/// `1. item` or `1) item`
static NUMBERED_ITEM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]+[.)]\s*(.+)$").expect("numbered item pattern"));

const DEDUP_KEY_CHARS: usize = 50;
const MIN_ITEM_CHARS: usize = 10;
const MIN_ITEM_WORDS: usize = 3;

pub fn is_role(text: &str) -> bool {
    ROLE.is_match(text)
}

pub fn is_restriction(text: &str) -> bool {
    RESTRICTION.is_match(text)
}

/// Pull the content out of a bullet (`-`, `*`, `•`) or numbered line.
///
/// Returns an empty string for prose. `line` must already be trimmed.
pub fn extract_item(line: &str) -> &str {
    if line.starts_with(['-', '*', '•']) {
        return line
            .trim_start_matches(|c| matches!(c, '-' | '*' | '•' | ' '))
            .trim();
    }
    NUMBERED_ITEM
        .captures(line)
        .and_then(|caps| caps.get(1))
        .map_or("", |m| m.as_str().trim())
}

/// Items that are too short to carry an instruction.
pub fn is_noise(item: &str) -> bool {
    char_len(item) < MIN_ITEM_CHARS || item.split_whitespace().count() < MIN_ITEM_WORDS
}

/// Lowercased, truncated to 50 characters. Near-duplicates sharing a long
/// prefix collide on purpose.
pub fn dedupe_key(text: &str) -> String {
    text.to_lowercase().chars().take(DEDUP_KEY_CHARS).collect()
}

pub fn char_len(text: &str) -> usize {
    text.chars().count()
}
