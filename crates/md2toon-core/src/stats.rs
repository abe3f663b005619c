//! Size comparison between a Markdown prompt and its TOON rendering.

use std::fmt;

/// Rough tokenizer-free estimate: one token per four characters.
const CHARS_PER_TOKEN: usize = 4;

/// Byte and estimated-token counts for a source document and its TOON form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompressionStats {
    pub source_bytes: usize,
    pub toon_bytes: usize,
    pub source_tokens: usize,
    pub toon_tokens: usize,
}

impl CompressionStats {
    pub fn measure(source: &str, toon: &str) -> Self {
        Self {
            source_bytes: source.len(),
            toon_bytes: toon.len(),
            source_tokens: estimate_tokens(source),
            toon_tokens: estimate_tokens(toon),
        }
    }

    /// Percentage of bytes saved. Negative when the TOON form is larger,
    /// zero for an empty source.
    pub fn savings_percent(&self) -> f64 {
        if self.source_bytes == 0 {
            return 0.0;
        }
        (1.0 - self.toon_bytes as f64 / self.source_bytes as f64) * 100.0
    }
}

impl fmt::Display for CompressionStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Markdown: {} bytes (~{} tokens) -> TOON: {} bytes (~{} tokens), {:.1}% smaller",
            self.source_bytes,
            self.source_tokens,
            self.toon_bytes,
            self.toon_tokens,
            self.savings_percent()
        )
    }
}

fn estimate_tokens(text: &str) -> usize {
    text.chars().count() / CHARS_PER_TOKEN
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn measures_bytes_and_tokens() {
        let stats = CompressionStats::measure("abcdefghij", "abcde");
        assert_eq!(stats.source_bytes, 10);
        assert_eq!(stats.toon_bytes, 5);
        assert_eq!(stats.source_tokens, 2);
        assert_eq!(stats.toon_tokens, 1);
        assert!((stats.savings_percent() - 50.0).abs() < 1e-9);
    }

    #[test]
    fn empty_source_has_no_savings() {
        assert_eq!(CompressionStats::measure("", "role: \"\"").savings_percent(), 0.0);
    }

    #[test]
    fn growth_is_negative() {
        assert!(CompressionStats::measure("ab", "abcd").savings_percent() < 0.0);
    }

    #[test]
    fn display_summary() {
        let line = CompressionStats::measure("abcdefghij", "abcde").to_string();
        assert_eq!(
            line,
            "Markdown: 10 bytes (~2 tokens) -> TOON: 5 bytes (~1 tokens), 50.0% smaller"
        );
    }
}
