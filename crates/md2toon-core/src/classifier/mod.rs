//! Rule-based classifier: Markdown system prompt → [`Prompt`].
//!
//! The classification of a list item is
//!
//! - restriction pattern → `restrictions` (syntactic override, any section)
//! - Identity section → `role` if it reads like one, else the first `purpose`
//! - Steps section → `steps`
//! - Output section → `output_instructions`
//! - Skip section → dropped, including its dedup bookkeeping
//! - Unknown section → `role` if it reads like one, else `output_instructions`
//!
//! Section headers are trusted as ground truth; there is no intent inference
//! beyond the restriction override.
//!
//! # Example
//! ```
//! use md2toon_core::classify;
//!
//! let prompt = classify("# STEPS\n- Read the whole input\n- Never skip a line\n");
//! assert_eq!(prompt.steps.len(), 1);
//! assert_eq!(prompt.restrictions[0].rule, "Never skip a line");
//! ```

mod enrich;
mod patterns;
mod section;

use std::collections::HashSet;

use tracing::{debug, trace};

use crate::prompt::{OutputFormat, OutputInstruction, Prompt, Restriction, Step};

pub use section::{classify_section, Section};

const THINKING_INSTRUCTION: &str = "Think step by step";
const MIN_PROSE_CHARS: usize = 20;

/// Opt-in extraction beyond the core rules. Everything is off by default, in
/// which case `classify_with` behaves exactly like [`classify`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClassifyOptions {
    /// Collect `expertise` areas ("expert in X, Y and Z") from role and purpose.
    pub extract_expertise: bool,
    /// Collect `output_sections` ("in a section called SUMMARY").
    pub extract_output_sections: bool,
}

impl ClassifyOptions {
    /// All enrichment turned on.
    pub fn enriched() -> Self {
        Self {
            extract_expertise: true,
            extract_output_sections: true,
        }
    }

    pub fn with_expertise(mut self, on: bool) -> Self {
        self.extract_expertise = on;
        self
    }

    pub fn with_output_sections(mut self, on: bool) -> Self {
        self.extract_output_sections = on;
        self
    }
}

/// Classify a Markdown prompt with the default rules.
///
/// Never fails: empty or malformed input yields an empty [`Prompt`].
pub fn classify(document: &str) -> Prompt {
    classify_with(document, &ClassifyOptions::default())
}

/// Classify a Markdown prompt, applying the enrichment selected in `options`.
pub fn classify_with(document: &str, options: &ClassifyOptions) -> Prompt {
    let mut scanner = Scanner::new(*options);
    for line in document.split('\n') {
        scanner.feed(line);
    }
    scanner.finish(document)
}

/// Per-document scan state. One instance per classification run.
struct Scanner {
    prompt: Prompt,
    section: Section,
    seen: HashSet<String>,
    options: ClassifyOptions,
}

impl Scanner {
    fn new(options: ClassifyOptions) -> Self {
        Self {
            prompt: Prompt::default(),
            section: Section::Unknown,
            seen: HashSet::new(),
            options,
        }
    }

    fn feed(&mut self, raw: &str) {
        let line = raw.trim();
        if line.is_empty() {
            return;
        }

        if let Some(header) = section::header_text(line) {
            self.section = classify_section(header);
            trace!(header, section = ?self.section, "section header");
            return;
        }

        if self.section == Section::Skip {
            return;
        }

        if self.options.extract_output_sections
            && matches!(self.section, Section::Output | Section::Unknown)
        {
            enrich::collect_output_sections(line, &mut self.prompt.output_sections);
        }

        let item = patterns::extract_item(line);
        if item.is_empty() {
            self.prose(line);
        } else {
            self.item(item);
        }
    }

    /// Free-form lines: a role sentence, or a step written as a paragraph.
    fn prose(&mut self, line: &str) {
        let long_enough = patterns::char_len(line) > MIN_PROSE_CHARS;

        if self.prompt.role.is_none()
            && long_enough
            && matches!(self.section, Section::Identity | Section::Unknown)
            && patterns::is_role(line)
        {
            self.prompt.role = Some(line.to_string());
        }

        if self.section == Section::Steps
            && long_enough
            && !line.starts_with('#')
            && self.first_sighting(line)
        {
            self.prompt.steps.push(Step {
                action: line.to_string(),
            });
        }
    }

    fn item(&mut self, item: &str) {
        if patterns::is_noise(item) || !self.first_sighting(item) {
            return;
        }

        if patterns::is_restriction(item) {
            self.prompt.restrictions.push(Restriction {
                rule: item.to_string(),
            });
            return;
        }

        let prompt = &mut self.prompt;
        match self.section {
            Section::Identity => {
                if prompt.role.is_none() && patterns::is_role(item) {
                    prompt.role = Some(item.to_string());
                } else if prompt.purpose.is_none() {
                    prompt.purpose = Some(item.to_string());
                }
            }
            Section::Steps => prompt.steps.push(Step {
                action: item.to_string(),
            }),
            Section::Output => prompt.output_instructions.push(OutputInstruction {
                instruction: item.to_string(),
            }),
            Section::Unknown => {
                if prompt.role.is_none() && patterns::is_role(item) {
                    prompt.role = Some(item.to_string());
                } else {
                    prompt.output_instructions.push(OutputInstruction {
                        instruction: item.to_string(),
                    });
                }
            }
            Section::Skip => {}
        }
    }

    /// Record `text` as seen. False if an item with the same dedup key was
    /// already recorded anywhere in the document.
    fn first_sighting(&mut self, text: &str) -> bool {
        let fresh = self.seen.insert(patterns::dedupe_key(text));
        if !fresh {
            trace!(text, "duplicate dropped");
        }
        fresh
    }

    fn finish(mut self, document: &str) -> Prompt {
        let lower = document.to_lowercase();
        if lower.contains("json") && !lower.contains("not json") {
            self.prompt.output_format = OutputFormat::Json;
        }
        if lower.contains("step by step") || lower.contains("step-by-step") {
            self.prompt.thinking_instruction = Some(THINKING_INSTRUCTION.to_string());
        }

        if self.options.extract_expertise {
            let prompt = &mut self.prompt;
            for text in [prompt.role.as_deref(), prompt.purpose.as_deref()]
                .into_iter()
                .flatten()
            {
                enrich::collect_expertise(text, &mut prompt.expertise);
            }
        }

        debug!(
            role = self.prompt.role.is_some(),
            steps = self.prompt.steps.len(),
            output_instructions = self.prompt.output_instructions.len(),
            restrictions = self.prompt.restrictions.len(),
            format = %self.prompt.output_format,
            "classified document"
        );
        self.prompt
    }
}
