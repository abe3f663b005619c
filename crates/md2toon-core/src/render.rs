//! Fixed top-level TOON layout for a [`Prompt`].
//!
//! ```text
//! role: You are an expert analyst.
//! expertise[0]:
//! purpose: ""
//! steps[2]{action}:
//!   Read the input carefully
//!   Summarize the main points
//! output_format: markdown
//! output_sections[0]:
//! output_instructions[1]{instruction}:
//!   Use bullet points throughout
//! restrictions[0]:
//! thinking_instruction: Think step by step
//! ```
//!
//! `thinking_instruction` is the only field that is omitted when absent.

use crate::classifier::classify;
use crate::encoder::encode_field;
use crate::prompt::Prompt;
use crate::types::ToonValue;

/// Render a prompt as TOON. Total: every prompt renders.
pub fn encode(prompt: &Prompt) -> String {
    let mut lines = vec![
        text_field("role", prompt.role.as_deref()),
        encode_field(
            "expertise",
            &ToonValue::Array(prompt.expertise.iter().map(|e| e.as_str().into()).collect()),
        ),
        text_field("purpose", prompt.purpose.as_deref()),
        records(
            "steps",
            prompt.steps.iter().map(|s| ("action", s.action.as_str())),
        ),
        format!("output_format: {}", prompt.output_format),
        // Count only: section names and descriptions are not rendered.
        format!("output_sections[{}]:", prompt.output_sections.len()),
        records(
            "output_instructions",
            prompt
                .output_instructions
                .iter()
                .map(|i| ("instruction", i.instruction.as_str())),
        ),
        records(
            "restrictions",
            prompt.restrictions.iter().map(|r| ("rule", r.rule.as_str())),
        ),
    ];

    if let Some(thinking) = &prompt.thinking_instruction {
        lines.push(text_field("thinking_instruction", Some(thinking)));
    }

    lines.join("\n")
}

/// Classify a Markdown prompt and render it as TOON in one step.
pub fn convert(document: &str) -> String {
    encode(&classify(document))
}

/// Absent text renders as the empty string (`""`).
fn text_field(key: &str, value: Option<&str>) -> String {
    encode_field(key, &ToonValue::from(value.unwrap_or_default()))
}

/// A list of single-field records, tabular whenever it is non-empty.
fn records<'a>(key: &str, rows: impl Iterator<Item = (&'static str, &'a str)>) -> String {
    let items = rows
        .map(|(field, value)| ToonValue::record([(field, value)]))
        .collect::<Vec<_>>();
    encode_field(key, &ToonValue::Array(items))
}
