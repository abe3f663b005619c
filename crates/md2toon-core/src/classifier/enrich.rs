//! Opt-in extractors for `expertise` and `output_sections`.

use std::sync::LazyLock;

use regex::Regex;

use crate::prompt::OutputSection;

static EXPERTISE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:expert in|speciali[sz]e[sd]? in|skilled in|proficient in)\s+([^.]+)")
        .expect("expertise pattern")
});

static EXPERTISE_SEPARATOR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i),\s*(?:and\s+)?|\s+and\s+").expect("expertise separator pattern")
});

/// Section names are taken as written: ALL CAPS, optionally quoted.
static SECTION_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?i:in a section called|under the heading|in a subsection called)\s*["']?([A-Z][A-Z0-9 _-]*[A-Z0-9])"#,
    )
    .expect("output section pattern")
});

/// Append expertise areas mentioned in `text` to `out`, skipping duplicates.
pub fn collect_expertise(text: &str, out: &mut Vec<String>) {
    for caps in EXPERTISE.captures_iter(text) {
        let Some(list) = caps.get(1) else { continue };
        for area in EXPERTISE_SEPARATOR.split(list.as_str()) {
            let area = area.trim();
            if !area.is_empty() && !out.iter().any(|known| known == area) {
                out.push(area.to_string());
            }
        }
    }
}

/// Append output sections named on `line` to `out`, skipping known names.
pub fn collect_output_sections(line: &str, out: &mut Vec<OutputSection>) {
    for caps in SECTION_NAME.captures_iter(line) {
        let Some(name) = caps.get(1) else { continue };
        let name = name.as_str().trim();
        if out.iter().any(|s| s.name == name) {
            continue;
        }
        out.push(OutputSection {
            name: name.to_string(),
            description: format!("Output section: {name}"),
        });
    }
}
