//! TOON decoder: reads the encoder's output back into a [`ToonValue`] tree.
//!
//! Handles every construct the encoder writes:
//!
//! - `key: value` fields and indented nested records
//! - inline arrays (`key[N]: v1,v2`)
//! - tabular arrays (`key[N]{f1,f2}:` + rows)
//! - expanded arrays (`key[N]:` + one block per element)
//! - quoted strings with escape sequences; unquoted `true`/`false`/`null`
//!   and numbers are typed, everything else is a string
//!
//! A bodiless `key[N]:` with N > 0 (the renderer's count-only
//! `output_sections` line) decodes to N `null` placeholders so the count
//! survives, up to a fixed limit. Inside an expanded block a key that
//! repeats starts the next record, and a bare `{}` is an empty record.
//! Declared counts are checked against what is actually present.

use crate::encoder::looks_numeric;
use crate::error::{Result, ToonError};
use crate::types::ToonValue;

/// Upper bound on the `null`s a bodiless `key[N]:` may expand to.
const MAX_PLACEHOLDERS: usize = 1 << 16;

/// Written in place of an empty record inside an expanded array.
pub(crate) const EMPTY_RECORD: &str = "{}";

/// Decode a TOON document.
pub fn decode(toon: &str) -> Result<ToonValue> {
    Parser::new(toon).parse_document()
}

/// Decode a TOON document and serialize it as compact JSON.
pub fn decode_json(toon: &str) -> Result<String> {
    let value = decode(toon)?;
    Ok(serde_json::to_string(&value.to_json())?)
}

/// A non-blank source line.
struct Line<'a> {
    /// 1-based line number in the source.
    number: usize,
    indent: usize,
    text: &'a str,
}

/// Parsed `[N]`, `[N]{f1,f2}:` or `[N]: v1,v2` header.
struct ArrayHeader<'a> {
    len: usize,
    fields: Option<Vec<String>>,
    inline_values: Option<&'a str>,
}

struct Parser<'a> {
    lines: Vec<Line<'a>>,
}

impl<'a> Parser<'a> {
    fn new(toon: &'a str) -> Self {
        let lines = toon
            .lines()
            .enumerate()
            .filter(|(_, line)| !line.trim().is_empty())
            .map(|(i, line)| Line {
                number: i + 1,
                indent: count_indent(line),
                text: line.trim(),
            })
            .collect();
        Self { lines }
    }

    fn parse_document(&self) -> Result<ToonValue> {
        let Some(first) = self.lines.first() else {
            return Ok(ToonValue::Object(Vec::new()));
        };

        let (value, next) = if first.text.starts_with('[') {
            let header = parse_array_header(first.text)
                .ok_or_else(|| ToonError::parse(first.number, "malformed root array header"))?;
            self.parse_array_body(&header, 0)?
        } else if self.lines.len() == 1 && !is_key_line(first.text) {
            (parse_scalar(first.text, first.number)?, 1)
        } else {
            let (entries, next) = self.parse_fields(0, first.indent)?;
            (ToonValue::Object(entries), next)
        };

        match self.lines.get(next) {
            Some(line) => Err(ToonError::parse(line.number, "unexpected indentation")),
            None => Ok(value),
        }
    }

    /// Parse consecutive fields at exactly `indent`, starting at `pos`.
    fn parse_fields(
        &self,
        mut pos: usize,
        indent: usize,
    ) -> Result<(Vec<(String, ToonValue)>, usize)> {
        let mut entries = Vec::new();
        while let Some(line) = self.lines.get(pos) {
            if line.indent < indent {
                break;
            }
            if line.indent > indent {
                return Err(ToonError::parse(line.number, "unexpected indentation"));
            }
            let (entry, next) = self.parse_field(pos)?;
            entries.push(entry);
            pos = next;
        }
        Ok((entries, pos))
    }

    /// Parse the field on line `pos` and everything nested under it.
    /// Returns the entry and the index of the first line after it.
    fn parse_field(&self, pos: usize) -> Result<((String, ToonValue), usize)> {
        let line = &self.lines[pos];
        let (key, rest) = parse_key(line.text, line.number)?;

        if rest.starts_with('[') {
            let header = parse_array_header(rest)
                .ok_or_else(|| ToonError::parse(line.number, "malformed array header"))?;
            let (value, next) = self.parse_array_body(&header, pos)?;
            return Ok(((key, value), next));
        }

        if rest == ":" {
            return match self.lines.get(pos + 1) {
                Some(child) if child.indent > line.indent => {
                    let (entries, next) = self.parse_fields(pos + 1, child.indent)?;
                    Ok(((key, ToonValue::Object(entries)), next))
                }
                _ => Ok(((key, ToonValue::Object(Vec::new())), pos + 1)),
            };
        }

        match rest.strip_prefix(": ") {
            Some(value) => Ok(((key, parse_scalar(value, line.number)?), pos + 1)),
            None => Err(ToonError::parse(
                line.number,
                format!("expected ':' after key '{key}'"),
            )),
        }
    }

    /// Parse the body of the array whose header is on line `pos`.
    fn parse_array_body(&self, header: &ArrayHeader<'_>, pos: usize) -> Result<(ToonValue, usize)> {
        let line = &self.lines[pos];

        if let Some(inline) = header.inline_values {
            let values = parse_inline_values(inline, line.number)?;
            check_count(header.len, values.len(), line.number)?;
            return Ok((ToonValue::Array(values), pos + 1));
        }

        let body_end = self.block_end(pos + 1, line.indent);

        if let Some(fields) = &header.fields {
            let mut rows = Vec::with_capacity(body_end - pos - 1);
            for row in &self.lines[pos + 1..body_end] {
                let cells = parse_inline_values(row.text, row.number)?;
                if cells.len() != fields.len() {
                    return Err(ToonError::parse(
                        row.number,
                        format!("expected {} values, found {}", fields.len(), cells.len()),
                    ));
                }
                rows.push(ToonValue::Object(fields.iter().cloned().zip(cells).collect()));
            }
            check_count(header.len, rows.len(), line.number)?;
            return Ok((ToonValue::Array(rows), body_end));
        }

        if body_end == pos + 1 {
            // Count-only line: keep the count with placeholders.
            if header.len > MAX_PLACEHOLDERS {
                return Err(ToonError::parse(
                    line.number,
                    format!(
                        "count-only array declares {} items, limit is {MAX_PLACEHOLDERS}",
                        header.len
                    ),
                ));
            }
            return Ok((ToonValue::Array(vec![ToonValue::Null; header.len]), body_end));
        }

        let child_indent = self.lines[pos + 1].indent;
        let (items, next) = self.parse_blocks(pos + 1, child_indent)?;
        if next != body_end {
            return Err(ToonError::parse(self.lines[next].number, "unexpected indentation"));
        }
        check_count(header.len, items.len(), line.number)?;
        Ok((ToonValue::Array(items), body_end))
    }

    /// Parse the element blocks of an expanded array at exactly `indent`.
    fn parse_blocks(&self, mut pos: usize, indent: usize) -> Result<(Vec<ToonValue>, usize)> {
        let mut items = Vec::new();
        let mut record: Vec<(String, ToonValue)> = Vec::new();

        while let Some(line) = self.lines.get(pos) {
            if line.indent != indent {
                break;
            }

            if line.text == EMPTY_RECORD {
                flush_record(&mut record, &mut items);
                items.push(ToonValue::Object(Vec::new()));
                pos += 1;
            } else if line.text.starts_with('[') {
                let header = parse_array_header(line.text)
                    .ok_or_else(|| ToonError::parse(line.number, "malformed array header"))?;
                flush_record(&mut record, &mut items);
                let (value, next) = self.parse_array_body(&header, pos)?;
                items.push(value);
                pos = next;
            } else if is_key_line(line.text) {
                let ((key, value), next) = self.parse_field(pos)?;
                if record.iter().any(|(k, _)| *k == key) {
                    flush_record(&mut record, &mut items);
                }
                record.push((key, value));
                pos = next;
            } else {
                flush_record(&mut record, &mut items);
                items.push(parse_scalar(line.text, line.number)?);
                pos += 1;
            }
        }

        flush_record(&mut record, &mut items);
        Ok((items, pos))
    }

    /// Index of the first line at or after `start` not indented deeper than `indent`.
    fn block_end(&self, start: usize, indent: usize) -> usize {
        self.lines[start.min(self.lines.len())..]
            .iter()
            .position(|line| line.indent <= indent)
            .map_or(self.lines.len(), |offset| start + offset)
    }
}

fn flush_record(record: &mut Vec<(String, ToonValue)>, items: &mut Vec<ToonValue>) {
    if !record.is_empty() {
        items.push(ToonValue::Object(std::mem::take(record)));
    }
}

fn check_count(declared: usize, found: usize, line: usize) -> Result<()> {
    if declared == found {
        Ok(())
    } else {
        Err(ToonError::parse(
            line,
            format!("array declares {declared} items, found {found}"),
        ))
    }
}

/// A field line starts with a key followed by `:` or `[`. Unquoted scalars
/// never contain either character, and a quoted scalar ends at its closing
/// quote.
fn is_key_line(text: &str) -> bool {
    if text.starts_with('"') {
        return find_closing_quote(text, 1)
            .and_then(|end| text[end + 1..].chars().next())
            .is_some_and(|c| c == ':' || c == '[');
    }
    text.contains([':', '['])
}

/// Split a field line into its key and the text that follows it.
fn parse_key(text: &str, line: usize) -> Result<(String, &str)> {
    if text.starts_with('"') {
        let end = find_closing_quote(text, 1)
            .ok_or_else(|| ToonError::parse(line, "unterminated quoted key"))?;
        return Ok((unescape(&text[1..end]), &text[end + 1..]));
    }
    let end = text.find([':', '[']).unwrap_or(text.len());
    if end == 0 {
        return Err(ToonError::parse(line, "missing key"));
    }
    Ok((text[..end].to_string(), &text[end..]))
}

/// Parse `[N]:`, `[N]: v1,v2` or `[N]{f1,f2}:` (text starts at the bracket).
fn parse_array_header(text: &str) -> Option<ArrayHeader<'_>> {
    let rest = text.strip_prefix('[')?;
    let close = rest.find(']')?;
    let len = rest[..close].parse().ok()?;
    let after = &rest[close + 1..];

    if let Some(fields_part) = after.strip_prefix('{') {
        let brace = fields_part.find('}')?;
        if &fields_part[brace + 1..] != ":" {
            return None;
        }
        let fields = fields_part[..brace]
            .split(',')
            .map(|f| match f.strip_prefix('"').and_then(|f| f.strip_suffix('"')) {
                Some(quoted) => unescape(quoted),
                None => f.to_string(),
            })
            .collect();
        return Some(ArrayHeader {
            len,
            fields: Some(fields),
            inline_values: None,
        });
    }

    if after == ":" {
        return Some(ArrayHeader {
            len,
            fields: None,
            inline_values: None,
        });
    }

    after.strip_prefix(": ").map(|values| ArrayHeader {
        len,
        fields: None,
        inline_values: Some(values),
    })
}

/// Parse comma-separated values such as `1,"a, b",true`.
fn parse_inline_values(s: &str, line: usize) -> Result<Vec<ToonValue>> {
    let mut values = Vec::new();
    let mut rest = s;

    while !rest.is_empty() {
        let token_end = if rest.starts_with('"') {
            find_closing_quote(rest, 1)
                .ok_or_else(|| ToonError::parse(line, "unterminated quoted string"))?
                + 1
        } else {
            rest.find(',').unwrap_or(rest.len())
        };
        values.push(parse_scalar(&rest[..token_end], line)?);
        rest = &rest[token_end..];

        match rest.strip_prefix(',') {
            Some(after) => {
                rest = after;
                if rest.is_empty() {
                    values.push(ToonValue::String(String::new()));
                }
            }
            None if rest.is_empty() => {}
            None => return Err(ToonError::parse(line, "expected ',' between values")),
        }
    }

    Ok(values)
}

/// Type a single token. Quoted → string; `null`, `true`, `false`; numeric
/// shapes → integer or float; anything else → string.
fn parse_scalar(token: &str, line: usize) -> Result<ToonValue> {
    let token = token.trim();

    if token.starts_with('"') {
        let end = find_closing_quote(token, 1)
            .ok_or_else(|| ToonError::parse(line, "unterminated quoted string"))?;
        if end + 1 != token.len() {
            return Err(ToonError::parse(line, "unexpected text after closing quote"));
        }
        return Ok(ToonValue::String(unescape(&token[1..end])));
    }

    Ok(match token {
        "null" => ToonValue::Null,
        "true" => ToonValue::Bool(true),
        "false" => ToonValue::Bool(false),
        _ if looks_numeric(token) => match token.parse::<i64>() {
            Ok(i) => ToonValue::Integer(i),
            Err(_) => token
                .parse::<f64>()
                .map_or_else(|_| ToonValue::String(token.to_string()), ToonValue::Float),
        },
        _ => ToonValue::String(token.to_string()),
    })
}

fn count_indent(line: &str) -> usize {
    line.len() - line.trim_start_matches(' ').len()
}

/// Byte index of the closing quote, skipping escaped characters.
fn find_closing_quote(s: &str, start: usize) -> Option<usize> {
    let bytes = s.as_bytes();
    let mut i = start;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 2,
            b'"' => return Some(i),
            _ => i += 1,
        }
    }
    None
}

fn unescape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('t') => out.push('\t'),
            Some('\\') => out.push('\\'),
            Some('"') => out.push('"'),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}
