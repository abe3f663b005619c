//! # md2toon-python
//!
//! Python bindings for the md2toon prompt classifier and TOON codec, built
//! with PyO3.
//!
//! Exposes the following functions to Python as the `md2toon` module:
//!
//! - `convert(markdown, enrich=False)` -- Markdown prompt -> TOON string
//! - `classify(markdown, enrich=False)` -- Markdown prompt -> JSON of the extracted structure
//! - `decode(toon)` -- TOON string -> JSON string

use md2toon_core::ClassifyOptions;
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;

fn options(enrich: bool) -> ClassifyOptions {
    if enrich {
        ClassifyOptions::enriched()
    } else {
        ClassifyOptions::default()
    }
}

/// Convert a Markdown system prompt to TOON.
///
/// Args:
///     markdown: The prompt text.
///     enrich: Also extract expertise areas and named output sections.
///
/// Returns:
///     The TOON document.
#[pyfunction]
#[pyo3(signature = (markdown, enrich = false))]
fn convert(markdown: &str, enrich: bool) -> String {
    md2toon_core::encode(&md2toon_core::classify_with(markdown, &options(enrich)))
}

/// Classify a Markdown system prompt.
///
/// Args:
///     markdown: The prompt text.
///     enrich: Also extract expertise areas and named output sections.
///
/// Returns:
///     A JSON string with role, expertise, purpose, steps, output_format,
///     output_sections, output_instructions, restrictions and, when
///     present, thinking_instruction.
#[pyfunction]
#[pyo3(signature = (markdown, enrich = false))]
fn classify(markdown: &str, enrich: bool) -> PyResult<String> {
    let prompt = md2toon_core::classify_with(markdown, &options(enrich));
    serde_json::to_string(&prompt).map_err(|e| PyValueError::new_err(e.to_string()))
}

/// Decode a TOON string into JSON.
///
/// Args:
///     toon: A TOON document.
///
/// Returns:
///     The JSON string.
///
/// Raises:
///     ValueError: If the input is not valid TOON.
#[pyfunction]
fn decode(toon: &str) -> PyResult<String> {
    md2toon_core::decode_json(toon).map_err(|e| PyValueError::new_err(e.to_string()))
}

#[pymodule]
fn md2toon(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(convert, m)?)?;
    m.add_function(wrap_pyfunction!(classify, m)?)?;
    m.add_function(wrap_pyfunction!(decode, m)?)?;
    Ok(())
}
