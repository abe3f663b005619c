//! WASM bindings for md2toon-core.
//!
//! Exposes `convert`, `classify` and `decode` as `#[wasm_bindgen]` functions
//! callable from JavaScript/TypeScript. Built with `wasm-bindgen-cli`:
//!
//! ```sh
//! cargo build -p md2toon-wasm --target wasm32-unknown-unknown --release
//! wasm-bindgen --target nodejs --out-dir pkg/ \
//!   target/wasm32-unknown-unknown/release/md2toon_wasm.wasm
//! ```

use wasm_bindgen::prelude::*;

/// Convert a Markdown system prompt to TOON. Never throws.
#[wasm_bindgen]
pub fn convert(markdown: &str) -> String {
    md2toon_core::convert(markdown)
}

/// Classify a Markdown system prompt and return the extracted structure as JSON.
#[wasm_bindgen]
pub fn classify(markdown: &str) -> std::result::Result<String, JsValue> {
    let prompt = md2toon_core::classify(markdown);
    serde_json::to_string(&prompt).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Decode a TOON string into compact JSON.
///
/// Throws a JS error if the input is not valid TOON.
#[wasm_bindgen]
pub fn decode(toon: &str) -> std::result::Result<String, JsValue> {
    md2toon_core::decode_json(toon).map_err(|e| JsValue::from_str(&e.to_string()))
}
