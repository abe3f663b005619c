//! TOON encoder: writes a [`ToonValue`] tree as Token-Oriented Object Notation.
//!
//! - **Records**: one `key: value` per line, nesting expressed by indentation
//! - **Inline arrays**: scalar arrays as `key[N]: v1,v2,v3`
//! - **Tabular arrays**: uniform flat records as `key[N]{f1,f2}:` followed by
//!   one comma-separated row per record, so field names are stated once
//! - **Expanded arrays**: anything else as `key[N]:` followed by one block per
//!   element, two spaces deeper; an empty record is written as `{}`
//! - **Quoting**: strings are only quoted when they could be misread
//!
//! Every continuation line sits two spaces deeper than the line that opened
//! it. Output never ends with a newline.
//!
//! # Example
//! ```
//! use md2toon_core::{encoder::encode_document, ToonValue};
//!
//! let value = ToonValue::record([("name", ToonValue::from("Alice")), ("age", ToonValue::from(30i64))]);
//! assert_eq!(encode_document(&value), "name: Alice\nage: 30");
//! ```

use crate::decoder::EMPTY_RECORD;
use crate::types::ToonValue;

/// The delimiter between inline values and tabular cells.
pub const DELIMITER: char = ',';

/// Characters that always force a string into quotes.
const SPECIAL_CHARS: [char; 10] = [':', '"', '\\', '\n', '\t', '\r', '[', ']', '{', '}'];

/// Encode a whole document: records emit their fields, arrays emit a root
/// array (`[N]...`), scalars emit a bare value.
pub fn encode_document(value: &ToonValue) -> String {
    let mut out = String::new();
    match value {
        ToonValue::Object(entries) => write_object_fields(entries, 0, &mut out),
        ToonValue::Array(items) => write_list(items, 0, &mut out),
        _ => write_scalar(value, &mut out),
    }
    out
}

/// Encode a scalar. Arrays and records have no scalar form and encode as `null`.
pub fn encode_value(value: &ToonValue) -> String {
    let mut out = String::new();
    write_scalar(value, &mut out);
    out
}

/// Encode a list without a key: `[0]:`, `[N]: a,b`, `[N]{k}:` + rows, or `[N]:` + blocks.
pub fn encode_list(items: &[ToonValue]) -> String {
    let mut out = String::new();
    write_list(items, 0, &mut out);
    out
}

/// Encode the fields of a record, one per line. An empty record encodes to
/// an empty string.
pub fn encode_object(entries: &[(String, ToonValue)]) -> String {
    let mut out = String::new();
    write_object_fields(entries, 0, &mut out);
    out
}

/// Encode a single `key` / `value` pair exactly as it appears inside a record.
pub fn encode_field(key: &str, value: &ToonValue) -> String {
    let mut out = String::new();
    write_field(key, value, 0, &mut out);
    out
}

/// Wrap `value` in double quotes (escaped) when it could be misread, else
/// return it unchanged.
pub fn quote(value: &str, delimiter: char) -> String {
    if needs_quoting(value, delimiter) {
        format!("\"{}\"", escape(value))
    } else {
        value.to_string()
    }
}

/// Whether a string must be quoted to read back as the same string.
///
/// True when the value:
/// - is empty, or is literally `true`, `false` or `null`
/// - starts or ends with whitespace, or starts with `-`
/// - contains `:`, `"`, `\`, a newline, tab or carriage return, brackets,
///   braces, or the active delimiter
/// - has the shape of a number (`42`, `-1.5`, `6e3`, `007`)
pub fn needs_quoting(value: &str, delimiter: char) -> bool {
    if value.is_empty() || matches!(value, "true" | "false" | "null") {
        return true;
    }
    if value.starts_with(char::is_whitespace)
        || value.ends_with(char::is_whitespace)
        || value.starts_with('-')
    {
        return true;
    }
    if value.contains(SPECIAL_CHARS) || value.contains(delimiter) {
        return true;
    }
    looks_numeric(value)
}

/// Escape backslash, double quote, newline, carriage return and tab.
pub fn escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            _ => out.push(ch),
        }
    }
    out
}

/// Emit the fields of a record at `depth`, newline-separated.
fn write_object_fields(entries: &[(String, ToonValue)], depth: usize, out: &mut String) {
    let indent = make_indent(depth);
    for (i, (key, value)) in entries.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        out.push_str(&indent);
        write_field(key, value, depth, out);
    }
}

/// Emit `key` and its value. The caller has already written the indentation.
fn write_field(key: &str, value: &ToonValue, depth: usize, out: &mut String) {
    out.push_str(&encode_key(key));
    match value {
        ToonValue::Object(entries) => {
            out.push(':');
            if !entries.is_empty() {
                out.push('\n');
                write_object_fields(entries, depth + 1, out);
            }
        }
        // The key sits directly on the opening bracket: `steps[3]{action}:`
        ToonValue::Array(items) => write_list(items, depth, out),
        _ => {
            out.push_str(": ");
            write_scalar(value, out);
        }
    }
}

/// Emit a list header and its body. The header continues the current line;
/// rows and blocks go on following lines at `depth + 1`.
fn write_list(items: &[ToonValue], depth: usize, out: &mut String) {
    let len = items.len();

    if items.is_empty() {
        out.push_str("[0]:");
        return;
    }

    if items.iter().all(ToonValue::is_scalar) {
        out.push_str(&format!("[{len}]: "));
        write_inline_values(items, out);
        return;
    }

    if let Some(fields) = detect_tabular(items) {
        let header: Vec<String> = fields.iter().map(|f| encode_key(f)).collect();
        out.push_str(&format!("[{len}]{{{}}}:", header.join(",")));
        write_tabular_rows(items, &fields, depth, out);
        return;
    }

    out.push_str(&format!("[{len}]:"));
    write_blocks(items, depth, out);
}

fn write_inline_values(items: &[ToonValue], out: &mut String) {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            out.push(DELIMITER);
        }
        write_scalar(item, out);
    }
}

/// One row per record, values in the header's field order.
fn write_tabular_rows(items: &[ToonValue], fields: &[&str], depth: usize, out: &mut String) {
    let row_indent = make_indent(depth + 1);
    for item in items {
        out.push('\n');
        out.push_str(&row_indent);
        for (i, field) in fields.iter().enumerate() {
            if i > 0 {
                out.push(DELIMITER);
            }
            if let Some(value) = item.get(field) {
                write_scalar(value, out);
            }
        }
    }
}

/// Expanded form: each element encoded on its own, two spaces deeper.
fn write_blocks(items: &[ToonValue], depth: usize, out: &mut String) {
    let item_indent = make_indent(depth + 1);
    for item in items {
        match item {
            ToonValue::Object(entries) if entries.is_empty() => {
                out.push('\n');
                out.push_str(&item_indent);
                out.push_str(EMPTY_RECORD);
            }
            ToonValue::Object(entries) => {
                out.push('\n');
                write_object_fields(entries, depth + 1, out);
            }
            ToonValue::Array(inner) => {
                out.push('\n');
                out.push_str(&item_indent);
                write_list(inner, depth + 1, out);
            }
            _ => {
                out.push('\n');
                out.push_str(&item_indent);
                write_scalar(item, out);
            }
        }
    }
}

fn write_scalar(value: &ToonValue, out: &mut String) {
    match value {
        ToonValue::Null => out.push_str("null"),
        ToonValue::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
        ToonValue::Integer(i) => out.push_str(&i.to_string()),
        ToonValue::Float(f) => out.push_str(&format_float(*f)),
        ToonValue::String(s) => out.push_str(&quote(s, DELIMITER)),
        ToonValue::Array(_) | ToonValue::Object(_) => out.push_str("null"),
    }
}

/// Shortest decimal form: no exponent, no trailing fractional zeros, `-0` → `0`,
/// whole floats as integers, non-finite values as `null`.
fn format_float(f: f64) -> String {
    if !f.is_finite() {
        return "null".to_string();
    }
    let f = if f == 0.0 { 0.0 } else { f };
    if f.fract() == 0.0 && f.abs() < (i64::MAX as f64) {
        return (f as i64).to_string();
    }
    let s = f.to_string();
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        s
    }
}

/// Matches `[+-]?\d+(\.\d+)?([eE][+-]?\d+)?` in full. This also covers
/// leading-zero integers such as `007`.
pub(crate) fn looks_numeric(s: &str) -> bool {
    let bytes = s.as_bytes();
    let mut i = 0;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        i += 1;
    }
    let digits = |i: &mut usize| {
        let start = *i;
        while *i < bytes.len() && bytes[*i].is_ascii_digit() {
            *i += 1;
        }
        *i > start
    };
    if !digits(&mut i) {
        return false;
    }
    if i < bytes.len() && bytes[i] == b'.' {
        i += 1;
        if !digits(&mut i) {
            return false;
        }
    }
    if i < bytes.len() && matches!(bytes[i], b'e' | b'E') {
        i += 1;
        if i < bytes.len() && matches!(bytes[i], b'+' | b'-') {
            i += 1;
        }
        if !digits(&mut i) {
            return false;
        }
    }
    i == bytes.len()
}

/// Keys matching `^[A-Za-z_][A-Za-z0-9_.]*$` are emitted bare; all others are
/// quoted with the string escapes.
fn encode_key(key: &str) -> String {
    if is_valid_unquoted_key(key) {
        key.to_string()
    } else {
        format!("\"{}\"", escape(key))
    }
}

fn is_valid_unquoted_key(key: &str) -> bool {
    let mut chars = key.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '.')
}

/// Field names if every element is a record with the same non-empty key set
/// and only scalar values; `None` otherwise.
fn detect_tabular(items: &[ToonValue]) -> Option<Vec<&str>> {
    let ToonValue::Object(first) = items.first()? else {
        return None;
    };
    if first.is_empty() {
        return None;
    }
    let fields: Vec<&str> = first.iter().map(|(k, _)| k.as_str()).collect();

    for item in items {
        let ToonValue::Object(entries) = item else {
            return None;
        };
        if entries.len() != fields.len() {
            return None;
        }
        for field in &fields {
            if !item.get(field)?.is_scalar() {
                return None;
            }
        }
    }
    Some(fields)
}

/// 2-space-per-level indentation.
fn make_indent(depth: usize) -> String {
    "  ".repeat(depth)
}
