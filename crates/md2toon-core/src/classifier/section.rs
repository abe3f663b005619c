//! Section headers and the state they put the scanner in.

use std::sync::LazyLock;

use regex::Regex;

/// `# HEADER` through `### HEADER`.
static HASH_HEADER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^#{1,3}\s*(.+)$").expect("hash header pattern"));

/// `ALL CAPS HEADER:`. Case-sensitive: `Output instructions:` is content, not a header.
static COLON_HEADER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([A-Z][A-Z\s]+):$").expect("colon header pattern"));

/// Semantic type of the section the scanner is currently in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Section {
    /// No header seen yet, or a header that names nothing we know.
    #[default]
    Unknown,
    /// IDENTITY, ROLE, PURPOSE: role and purpose extraction.
    Identity,
    /// STEPS, GOALS, TASK: every item is a step.
    Steps,
    /// OUTPUT, FORMAT, RESTRICTIONS, CONSTRAINTS: every item is an output instruction.
    Output,
    /// EXAMPLE, INPUT: dropped entirely.
    Skip,
}

/// Map header text to a section. Checked in fixed priority order, first match wins.
pub fn classify_section(header: &str) -> Section {
    let h = header.trim().to_uppercase();
    let has = |needle: &str| h.contains(needle);

    if has("EXAMPLE") || has("INPUT") {
        Section::Skip
    } else if has("IDENTITY") || has("ROLE") || h == "PURPOSE" {
        Section::Identity
    } else if has("STEP") || has("GOAL") || has("TASK") {
        Section::Steps
    } else if has("OUTPUT") || has("FORMAT") || has("RESTRICTION") || has("CONSTRAINT") {
        Section::Output
    } else {
        Section::Unknown
    }
}

/// Return the header text if `line` (already trimmed) is a section header.
pub fn header_text(line: &str) -> Option<&str> {
    HASH_HEADER
        .captures(line)
        .or_else(|| COLON_HEADER.captures(line))
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_all_variants() {
        let cases = [
            ("IDENTITY", Section::Identity),
            ("IDENTITY AND PURPOSE", Section::Identity),
            ("ROLE", Section::Identity),
            ("PURPOSE", Section::Identity),
            ("STEPS", Section::Steps),
            ("STEP BY STEP", Section::Steps),
            ("GOALS", Section::Steps),
            ("TASK", Section::Steps),
            ("OUTPUT", Section::Output),
            ("OUTPUT INSTRUCTIONS", Section::Output),
            ("OUTPUT SECTIONS", Section::Output),
            ("OUTPUT FORMAT", Section::Output),
            ("FORMAT", Section::Output),
            ("RESTRICTIONS", Section::Output),
            ("CONSTRAINTS", Section::Output),
            ("EXAMPLE", Section::Skip),
            ("EXAMPLE OUTPUT", Section::Skip),
            ("EXAMPLES", Section::Skip),
            ("INPUT", Section::Skip),
            ("INPUT FORMAT", Section::Skip),
            ("RANDOM HEADER", Section::Unknown),
            ("NOTES", Section::Unknown),
        ];
        for (header, expected) in cases {
            assert_eq!(classify_section(header), expected, "header {header:?}");
        }
    }

    #[test]
    fn classification_is_case_insensitive() {
        assert_eq!(classify_section("Output Instructions"), Section::Output);
        assert_eq!(classify_section("your task"), Section::Steps);
    }

    #[test]
    fn purpose_must_match_exactly() {
        // "PURPOSE" alone is identity; a longer header falls through.
        assert_eq!(classify_section("  purpose  "), Section::Identity);
        assert_eq!(classify_section("PURPOSE OF THIS"), Section::Unknown);
    }

    #[test]
    fn header_forms() {
        assert_eq!(header_text("# STEPS"), Some("STEPS"));
        assert_eq!(header_text("###OUTPUT"), Some("OUTPUT"));
        assert_eq!(header_text("OUTPUT INSTRUCTIONS:"), Some("OUTPUT INSTRUCTIONS"));
        assert_eq!(header_text("Output instructions:"), None);
        assert_eq!(header_text("STEPS"), None);
        assert_eq!(header_text("#"), None);
    }
}
