//! # md2toon-core
//!
//! Turns a Markdown system prompt into **TOON (Token-Oriented Object Notation)**
//! in two pure stages:
//!
//! 1. [`classify`]: a rule-based classifier that extracts role, purpose,
//!    steps, output instructions and restrictions from the document's
//!    sections into a [`Prompt`].
//! 2. [`encode`]: renders the [`Prompt`] as compact TOON, stating the field
//!    name of each uniform list once instead of per element.
//!
//! Both stages are total: any input, including empty or malformed text,
//! produces a well-formed result.
//!
//! ## Quick start
//!
//! ```rust
//! use md2toon_core::{classify, encode};
//!
//! let markdown = "# STEPS\n- Do the work\n\n# EXAMPLE OUTPUT\n- ignored\n\n# OUTPUT INSTRUCTIONS\n- Use markdown\n";
//! let prompt = classify(markdown);
//! assert_eq!(prompt.steps[0].action, "Do the work");
//!
//! let toon = encode(&prompt);
//! assert!(toon.contains("steps[1]{action}:\n  Do the work"));
//! ```
//!
//! ## Modules
//!
//! - [`classifier`]: section-aware Markdown → [`Prompt`] extraction
//! - [`prompt`]: the intermediate structure
//! - [`render`]: [`Prompt`] → TOON document layout
//! - [`encoder`]: generic TOON writer over [`ToonValue`]
//! - [`decoder`]: TOON → [`ToonValue`], for structural round-trips
//! - [`stats`]: size comparison between source and TOON
//! - [`error`]: decode errors

pub mod classifier;
pub mod decoder;
pub mod encoder;
pub mod error;
pub mod prompt;
pub mod render;
pub mod stats;
pub mod types;

pub use classifier::{classify, classify_with, ClassifyOptions, Section};
pub use decoder::{decode, decode_json};
pub use error::ToonError;
pub use prompt::{OutputFormat, OutputInstruction, OutputSection, Prompt, Restriction, Step};
pub use render::{convert, encode};
pub use stats::CompressionStats;
pub use types::ToonValue;
