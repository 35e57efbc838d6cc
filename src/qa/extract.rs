//! JSON extraction from noisy model or pipeline output.
//!
//! Strategies are tried in order and the first one that parses wins:
//! the whole input, fenced code blocks, then the first top-level
//! `{...}` / `[...]` span found in the text. A top-level span left open
//! at the end of the text is parsed as-is so truncation is reported.

use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;

static FENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)```(?:json)?[ \t]*\r?\n?(.*?)```").expect("fence pattern is valid")
});

/// Extract a JSON document from `text`, or describe why none could be found.
pub fn extract_json(text: &str) -> Result<Value, String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err("empty input".to_string());
    }

    let direct_error = match serde_json::from_str::<Value>(trimmed) {
        Ok(value) => return Ok(value),
        Err(e) => e,
    };

    for block in fenced_blocks(trimmed) {
        if let Ok(value) = serde_json::from_str::<Value>(block) {
            return Ok(value);
        }
    }

    match top_level_span(trimmed) {
        Span::Closed(span) | Span::Unclosed(span) => {
            serde_json::from_str(span).map_err(|e| e.to_string())
        }
        Span::None => Err(direct_error.to_string()),
    }
}

/// Contents of every fenced code block labeled `json` or unlabeled.
fn fenced_blocks(text: &str) -> impl Iterator<Item = &str> {
    FENCE
        .captures_iter(text)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().trim())
        .filter(|block| !block.is_empty())
}

#[derive(Debug, PartialEq)]
enum Span<'a> {
    /// A top-level bracket span whose brackets balance.
    Closed(&'a str),
    /// A top-level span still open at the end of the text.
    Unclosed(&'a str),
    None,
}

/// First top-level `{...}` / `[...]` span, ignoring brackets in strings.
///
/// Spans only start outside any other span. A mismatched closer abandons
/// the current span and scanning resumes after it.
fn top_level_span(text: &str) -> Span<'_> {
    let mut expected: Vec<char> = Vec::new();
    let mut start = 0;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, c) in text.char_indices() {
        if expected.is_empty() {
            if c == '{' || c == '[' {
                start = offset;
                expected.push(if c == '{' { '}' } else { ']' });
            }
            continue;
        }

        if in_string {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }

        match c {
            '"' => in_string = true,
            '{' => expected.push('}'),
            '[' => expected.push(']'),
            '}' | ']' => {
                if expected.pop() != Some(c) {
                    expected.clear();
                } else if expected.is_empty() {
                    return Span::Closed(&text[start..offset + c.len_utf8()]);
                }
            }
            _ => {}
        }
    }

    if expected.is_empty() {
        Span::None
    } else {
        Span::Unclosed(&text[start..])
    }
}
