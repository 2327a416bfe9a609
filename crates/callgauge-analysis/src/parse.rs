//! Extraction of JSON payloads from raw model output

use callgauge_core::{Error, Result};

/// Extract the first complete JSON object from model output.
///
/// Models wrap answers in code fences or prose; this scans for the first
/// balanced `{...}` block, ignoring braces inside string literals.
pub(crate) fn extract_json_object(text: &str) -> Result<&str> {
    let start = text
        .find('{')
        .ok_or_else(|| Error::Serialization("no JSON object in oracle output".to_string()))?;

    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, c) in text[start..].char_indices() {
        if in_string {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            continue;
        }

        match c {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    let end = start + offset + c.len_utf8();
                    return Ok(&text[start..end]);
                }
            }
            _ => {}
        }
    }

    Err(Error::Serialization(
        "unterminated JSON object in oracle output".to_string(),
    ))
}
