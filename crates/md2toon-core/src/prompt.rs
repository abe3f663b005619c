//! The structured form of a system prompt, produced by the classifier and
//! consumed by the TOON renderer.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A single step of the prompt's workflow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Step {
    pub action: String,
}

/// A named section the model is asked to produce.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputSection {
    pub name: String,
    pub description: String,
}

/// A formatting or output rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputInstruction {
    pub instruction: String,
}

/// A constraint on model behavior ("Do not ...", "Never ...").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Restriction {
    pub rule: String,
}

/// Primary output format requested by the prompt.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Markdown,
    Json,
}

impl OutputFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            OutputFormat::Markdown => "markdown",
            OutputFormat::Json => "json",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Structured representation of a Markdown system prompt.
///
/// Every list is always present (possibly empty) and keeps the order in which
/// items were found in the source document. `role`, when set, is never shorter
/// than 10 characters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Prompt {
    pub role: Option<String>,
    #[serde(default)]
    pub expertise: Vec<String>,
    pub purpose: Option<String>,
    #[serde(default)]
    pub steps: Vec<Step>,
    #[serde(default)]
    pub output_format: OutputFormat,
    #[serde(default)]
    pub output_sections: Vec<OutputSection>,
    #[serde(default)]
    pub output_instructions: Vec<OutputInstruction>,
    #[serde(default)]
    pub restrictions: Vec<Restriction>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thinking_instruction: Option<String>,
}

impl Prompt {
    /// True when nothing at all was extracted.
    pub fn is_empty(&self) -> bool {
        self.role.is_none()
            && self.purpose.is_none()
            && self.thinking_instruction.is_none()
            && self.expertise.is_empty()
            && self.steps.is_empty()
            && self.output_sections.is_empty()
            && self.output_instructions.is_empty()
            && self.restrictions.is_empty()
    }
}
