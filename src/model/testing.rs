//! Scripted model client for tests.

use super::types::{ModelRequest, ModelResponse, ToolCallRequest};
use super::ModelClient;
use crate::error::{ChorusError, Result};
use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

/// Replays canned responses per model identifier and records requests.
///
/// Each agent in a test graph gets its own model id so nested agents can be
/// scripted independently.
#[derive(Default)]
pub(crate) struct ScriptedModel {
    scripts: Mutex<HashMap<String, VecDeque<ModelResponse>>>,
    requests: Mutex<Vec<ModelRequest>>,
}

impl ScriptedModel {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Queue a response for requests made with `model`.
    pub(crate) fn push(&self, model: &str, response: ModelResponse) -> &Self {
        self.scripts
            .lock()
            .unwrap()
            .entry(model.to_string())
            .or_default()
            .push_back(response);
        self
    }

    pub(crate) fn say(&self, model: &str, text: &str) -> &Self {
        self.push(model, ModelResponse::message(text))
    }

    pub(crate) fn call(&self, model: &str, calls: &[(&str, &str, &str)]) -> &Self {
        self.push(
            model,
            ModelResponse::tool_calls(
                calls
                    .iter()
                    .map(|(id, name, args)| ToolCallRequest::new(id, name, args))
                    .collect(),
            ),
        )
    }

    /// Every request received so far, in order.
    pub(crate) fn requests(&self) -> Vec<ModelRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Requests received for one model id.
    pub(crate) fn requests_for(&self, model: &str) -> Vec<ModelRequest> {
        self.requests()
            .into_iter()
            .filter(|r| r.model == model)
            .collect()
    }
}

#[async_trait]
impl ModelClient for ScriptedModel {
    async fn complete(&self, request: &ModelRequest) -> Result<ModelResponse> {
        self.requests.lock().unwrap().push(request.clone());
        self.scripts
            .lock()
            .unwrap()
            .get_mut(&request.model)
            .and_then(VecDeque::pop_front)
            .ok_or_else(|| ChorusError::Model(format!("no scripted response for {}", request.model)))
    }
}
