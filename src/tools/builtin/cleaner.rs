//! Model-backed transcript cleanup.

use crate::error::Result;
use crate::model::{Message, ModelClient, ModelRequest};
use crate::tools::{ParamDecl, ToolArgs, ToolFunction};
use async_trait::async_trait;
use serde::Serialize;
use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::warn;

const SYSTEM_PROMPT: &str = "You clean transcripts. Remove filler words and hesitation noise while \
preserving meaning, tone, proper nouns, and technical terms. Keep speaker labels and \
[inaudible]/[unclear] markers.";

#[derive(Debug, Serialize)]
struct CleanerReport {
    mode: &'static str,
    cleaned_text: String,
    metadata: Map<String, Value>,
    warnings: Vec<String>,
}

/// Removes filler words from a JSON transcript payload via the model service.
pub struct FillerCleaner {
    model: Arc<dyn ModelClient>,
    model_name: String,
}

impl FillerCleaner {
    pub fn new(model: Arc<dyn ModelClient>, model_name: &str) -> Self {
        Self {
            model,
            model_name: model_name.to_string(),
        }
    }

    /// Clean `text`, returning the original and a warning when the model fails.
    async fn clean(&self, text: &str) -> (String, Option<String>) {
        let request = ModelRequest {
            model: self.model_name.clone(),
            messages: vec![
                Message::system(SYSTEM_PROMPT),
                Message::user(&format!(
                    "Return only cleaned transcript text, no explanation.\n\n{}",
                    text
                )),
            ],
            tools: Vec::new(),
        };

        match self.model.complete(&request).await {
            Ok(response) => {
                let cleaned = response.content.unwrap_or_default().trim().to_string();
                if cleaned.is_empty() {
                    (text.to_string(), Some("Model returned empty output.".to_string()))
                } else {
                    (cleaned, None)
                }
            }
            Err(e) => {
                warn!("Transcript cleanup failed: {}", e);
                (text.to_string(), Some(format!("Model cleaner failed ({}).", e)))
            }
        }
    }

    pub async fn remove_filler_words(&self, text: &str) -> Result<String> {
        let raw = text.trim();
        if raw.is_empty() {
            return Ok(String::new());
        }

        let Ok(Value::Object(payload)) = serde_json::from_str::<Value>(raw) else {
            return Ok("[cleaner_error] JSON payload required. Use {'transcript': '...'}.".to_string());
        };

        let transcript = match payload.get("transcript") {
            None | Some(Value::Null) => {
                return Ok("[cleaner_error] JSON payload must include 'transcript'.".to_string())
            }
            Some(Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
        };

        let metadata = match payload.get("metadata") {
            Some(Value::Object(m)) => m.clone(),
            _ => Map::new(),
        };

        let (cleaned_text, warning) = self.clean(&transcript).await;

        let report = CleanerReport {
            mode: "cleaned",
            cleaned_text,
            metadata,
            warnings: warning.into_iter().collect(),
        };
        Ok(serde_json::to_string(&report)?)
    }
}

#[async_trait]
impl ToolFunction for FillerCleaner {
    fn parameters(&self) -> Vec<ParamDecl> {
        vec![ParamDecl::required("text", "string")
            .describe("JSON payload with a 'transcript' field and optional 'metadata'")]
    }

    async fn call(&self, args: ToolArgs) -> Result<String> {
        self.remove_filler_words(args.string("text")?).await
    }
}
