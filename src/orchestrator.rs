//! Session orchestrator for Chorus.
//!
//! Wires settings, the tool registry, the agent graph and the model client
//! into a ready-to-run engine.

use crate::agent::{AgentGraph, AgentRun, Engine};
use crate::config::{AgentsDocument, Settings};
use crate::error::Result;
use crate::model::{ModelClient, OpenAIModel};
use crate::tools::builtin::{register_defaults, BuiltinContext};
use crate::tools::ToolRegistry;
use crate::transcript::TranscriptHandle;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// A configured agent graph ready to run.
pub struct Orchestrator {
    registry: Arc<ToolRegistry>,
    engine: Engine,
}

impl Orchestrator {
    /// Create an orchestrator backed by the OpenAI model service.
    pub fn new(settings: &Settings, document: &AgentsDocument, transcript: TranscriptHandle) -> Result<Self> {
        let model: Arc<dyn ModelClient> = Arc::new(OpenAIModel::with_timeout(Duration::from_secs(
            settings.model.timeout_secs,
        ))?);
        Self::with_model(settings, document, transcript, model)
    }

    /// Create an orchestrator with a custom model client.
    pub fn with_model(
        settings: &Settings,
        document: &AgentsDocument,
        transcript: TranscriptHandle,
        model: Arc<dyn ModelClient>,
    ) -> Result<Self> {
        let registry = Arc::new(Self::build_registry(settings, transcript, model.clone())?);
        let graph = AgentGraph::build(document, &registry, &settings.model.default_model)?;

        info!(
            "Loaded {} agents and {} tools (main agent: {})",
            graph.agents().count(),
            registry.len(),
            graph.main().name
        );

        let engine = Engine::new(Arc::new(graph), model).with_settings(&settings.engine);

        Ok(Self { registry, engine })
    }

    /// Build the registry of built-in tools.
    pub fn build_registry(
        settings: &Settings,
        transcript: TranscriptHandle,
        model: Arc<dyn ModelClient>,
    ) -> Result<ToolRegistry> {
        let mut registry = ToolRegistry::with_policy(settings.engine.duplicate_tools);
        register_defaults(
            &mut registry,
            BuiltinContext {
                transcript,
                model,
                cleaner_model: settings.model.cleaner_model.clone(),
            },
        )?;
        Ok(registry)
    }

    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    pub fn graph(&self) -> &AgentGraph {
        self.engine.graph()
    }

    /// Run the main agent with an optional initial message.
    pub async fn run(&self, input: Option<&str>) -> Result<AgentRun> {
        self.engine.run(input).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ChorusError;
    use crate::model::testing::ScriptedModel;
    use crate::model::Message;

    const AGENTS: &str = r#"
main: coordinator
agents:
  - name: coordinator
    description: Coordinates the session
    model: coord
    prompt: You coordinate transcript processing.
    tools: [quality_assurance]
  - name: quality_assurance
    description: Checks transcription JSON quality
    model: qa
    prompt: You check transcripts.
    tools: [get_transcript, validate_json_structure]
"#;

    #[tokio::test]
    async fn test_end_to_end_delegation_with_builtin_tools() {
        let model = Arc::new(ScriptedModel::new());
        model
            .call("coord", &[("c1", "quality_assurance", r#"{"query": "Check the transcript"}"#)])
            .say("coord", "The transcript passed QA.");
        model
            .call("qa", &[("q1", "get_transcript", "{}")])
            .call(
                "qa",
                &[(
                    "q2",
                    "validate_json_structure",
                    r#"{"transcription": "{\"transcription\": \"hello world\"}"}"#,
                )],
            )
            .say("qa", "JSON structure is valid");

        let document = AgentsDocument::from_yaml(AGENTS).unwrap();
        let orchestrator = Orchestrator::with_model(
            &Settings::default(),
            &document,
            TranscriptHandle::ready(r#"{"transcription": "hello world"}"#),
            model.clone(),
        )
        .unwrap();

        let run = orchestrator.run(None).await.unwrap();
        assert_eq!(run.content, "The transcript passed QA.");
        assert_eq!(run.tool_calls.len(), 3);

        let qa_requests = model.requests_for("qa");
        assert_eq!(qa_requests.len(), 3);
        let last = qa_requests[2].messages.last().unwrap();
        assert_eq!(
            last,
            &Message::ToolResult {
                call_id: "q2".to_string(),
                name: "validate_json_structure".to_string(),
                content: "JSON structure is valid".to_string(),
                is_error: false,
            }
        );
    }

    #[test]
    fn test_unresolved_reference_is_fatal() {
        let document = AgentsDocument::from_yaml(
            "main: a\nagents:\n  - name: a\n    prompt: p\n    tools: [summarize_everything]\n",
        )
        .unwrap();
        let result = Orchestrator::with_model(
            &Settings::default(),
            &document,
            TranscriptHandle::none(),
            Arc::new(ScriptedModel::new()),
        );
        assert!(matches!(result, Err(ChorusError::GraphConfig { .. })));
    }
}
