//! Quality assurance for transcription JSON.
//!
//! The validator accepts raw JSON or JSON buried in prose or Markdown,
//! checks it against the transcript document shape and reports one of four
//! status families. Hard structure errors and soft completeness warnings are
//! kept apart so a calling agent can choose between regenerating the
//! transcript and accepting a degraded one.

mod extract;

pub use extract::extract_json;

use serde_json::{Map, Value};
use tracing::debug;

/// Fields that carry transcript content.
pub const CONTENT_KEYS: [&str; 4] = ["transcription", "text", "summary", "segments"];

/// Outcome of validating a transcription payload.
#[derive(Debug, Clone, PartialEq)]
pub enum QaStatus {
    /// No JSON could be extracted.
    InvalidJson(String),
    /// JSON was found but violates the document shape.
    InvalidStructure(String),
    /// Structurally valid but without meaningful content in these keys.
    ValidWithWarnings(Vec<String>),
    /// Structurally valid with content.
    Valid,
}

impl QaStatus {
    pub fn is_valid(&self) -> bool {
        matches!(self, QaStatus::Valid | QaStatus::ValidWithWarnings(_))
    }
}

impl std::fmt::Display for QaStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            QaStatus::InvalidJson(reason) => write!(f, "Invalid JSON: {}", reason),
            QaStatus::InvalidStructure(reason) => write!(f, "Invalid JSON structure: {}", reason),
            QaStatus::ValidWithWarnings(keys) => write!(
                f,
                "JSON structure is valid with warnings: missing or empty content keys: {}",
                keys.join(", ")
            ),
            QaStatus::Valid => write!(f, "JSON structure is valid"),
        }
    }
}

/// Validate a transcription payload and return its QA status string.
pub fn validate_json_structure(text: &str) -> String {
    check(text).to_string()
}

/// Validate a transcription payload.
pub fn check(text: &str) -> QaStatus {
    debug!("Validating JSON structure ({} bytes)", text.len());

    let payload = match extract_json(text) {
        Ok(value) => value,
        Err(reason) => return QaStatus::InvalidJson(reason),
    };

    let Value::Object(doc) = payload else {
        return QaStatus::InvalidStructure("top-level must be an object".to_string());
    };

    if let Err(violation) = check_structure(&doc) {
        return QaStatus::InvalidStructure(violation);
    }

    let empty: Vec<String> = CONTENT_KEYS
        .iter()
        .filter(|key| !doc.get(**key).is_some_and(has_content))
        .map(|key| key.to_string())
        .collect();

    if empty.len() == CONTENT_KEYS.len() {
        QaStatus::ValidWithWarnings(empty)
    } else {
        QaStatus::Valid
    }
}

fn check_structure(doc: &Map<String, Value>) -> Result<(), String> {
    for key in ["transcription", "text"] {
        if doc.get(key).is_some_and(|v| !v.is_string()) {
            return Err(format!("{} must be a string", key));
        }
    }

    match doc.get("summary") {
        None | Some(Value::String(_)) => {}
        Some(Value::Array(items)) => {
            if !items.iter().all(Value::is_string) {
                return Err("summary list must contain only strings".to_string());
            }
        }
        Some(_) => return Err("summary must be a string or list of strings".to_string()),
    }

    match doc.get("segments") {
        None => {}
        Some(Value::Array(segments)) => {
            for (index, segment) in segments.iter().enumerate() {
                check_segment(index, segment)?;
            }
        }
        Some(_) => return Err("segments must be a list".to_string()),
    }

    Ok(())
}

fn check_segment(index: usize, segment: &Value) -> Result<(), String> {
    let Value::Object(segment) = segment else {
        return Err(format!("segments[{}] must be an object", index));
    };

    for key in ["text", "speaker"] {
        if segment.get(key).is_some_and(|v| !v.is_string()) {
            return Err(format!("segments[{}].{} must be a string", index, key));
        }
    }

    for key in ["start", "end"] {
        if segment.get(key).is_some_and(|v| !v.is_number()) {
            return Err(format!("segments[{}].{} must be a number", index, key));
        }
    }

    let start = segment.get("start").and_then(Value::as_f64);
    let end = segment.get("end").and_then(Value::as_f64);
    if let (Some(start), Some(end)) = (start, end) {
        if end < start {
            return Err(format!("segments[{}] has end before start", index));
        }
    }

    Ok(())
}

/// Whether an already structurally valid field carries meaningful content.
fn has_content(value: &Value) -> bool {
    match value {
        Value::String(s) => !s.trim().is_empty(),
        Value::Array(items) => items.iter().any(|item| match item {
            Value::String(s) => !s.trim().is_empty(),
            Value::Object(segment) => segment
                .get("text")
                .and_then(Value::as_str)
                .is_some_and(|t| !t.trim().is_empty()),
            _ => false,
        }),
        _ => false,
    }
}
