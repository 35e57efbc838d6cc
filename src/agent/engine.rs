//! Conversation loop with tool dispatch and agent-as-tool recursion.

use super::conversation::ConversationState;
use super::graph::{AgentGraph, AgentSpec};
use crate::config::EngineSettings;
use crate::error::{ChorusError, Result};
use crate::model::{Message, ModelClient, ModelRequest, ToolCallRequest};
use crate::tools::ToolKind;
use futures::future::BoxFuture;
use futures::FutureExt;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tracing::{debug, info, info_span, warn, Instrument};
use uuid::Uuid;

/// Result of one tool call as seen by the calling model.
#[derive(Debug, Clone, PartialEq)]
pub enum ToolOutcome {
    Success(String),
    Error(String),
}

impl ToolOutcome {
    pub fn is_error(&self) -> bool {
        matches!(self, ToolOutcome::Error(_))
    }

    /// Text appended to the conversation as the tool result.
    pub fn content(&self) -> &str {
        match self {
            ToolOutcome::Success(s) | ToolOutcome::Error(s) => s,
        }
    }
}

/// Record of a tool call made during a run.
#[derive(Debug, Clone)]
pub struct ToolCallRecord {
    /// Agent that issued the call.
    pub agent: String,
    /// Name of the tool called.
    pub name: String,
    /// JSON arguments passed to the tool.
    pub arguments: String,
    /// Result returned to the model.
    pub outcome: ToolOutcome,
}

impl std::fmt::Display for ToolCallRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}({})", self.agent, self.name, self.arguments)
    }
}

/// Response from an agent run.
#[derive(Debug)]
pub struct AgentRun {
    /// The final message text.
    pub content: String,
    /// Tool calls made by this agent and any agents it delegated to.
    pub tool_calls: Vec<ToolCallRecord>,
    /// Number of model calls made by this agent.
    pub turns: usize,
}

enum LoopState {
    AwaitingModel,
    DispatchingTools(Vec<ToolCallRequest>),
    Done(String),
}

/// Runs agents of a graph against a model service.
pub struct Engine {
    graph: Arc<AgentGraph>,
    model: Arc<dyn ModelClient>,
    max_turns: Option<usize>,
    max_depth: Option<usize>,
}

impl Engine {
    /// Create an engine with the default limits.
    pub fn new(graph: Arc<AgentGraph>, model: Arc<dyn ModelClient>) -> Self {
        let defaults = EngineSettings::default();
        Self {
            graph,
            model,
            max_turns: defaults.max_turns,
            max_depth: defaults.max_depth,
        }
    }

    /// Apply limits from settings.
    pub fn with_settings(self, settings: &EngineSettings) -> Self {
        self.with_max_turns(settings.max_turns)
            .with_max_depth(settings.max_depth)
    }

    /// Set the maximum number of model calls per agent invocation.
    pub fn with_max_turns(mut self, max: Option<usize>) -> Self {
        self.max_turns = max;
        self
    }

    /// Set the maximum agent delegation depth.
    pub fn with_max_depth(mut self, max: Option<usize>) -> Self {
        self.max_depth = max;
        self
    }

    pub fn graph(&self) -> &AgentGraph {
        &self.graph
    }

    /// Run the main agent.
    pub async fn run(&self, input: Option<&str>) -> Result<AgentRun> {
        let main = self.graph.main();
        let mut tool_calls = Vec::new();
        let (content, turns) = self.invoke(&main.name, input, 0, &mut tool_calls).await?;
        Ok(AgentRun {
            content,
            tool_calls,
            turns,
        })
    }

    /// Run one agent invocation, appending every tool call made to `records`,
    /// including those of a conversation that ends in an error.
    fn invoke<'a>(
        &'a self,
        name: &'a str,
        input: Option<&'a str>,
        depth: usize,
        records: &'a mut Vec<ToolCallRecord>,
    ) -> BoxFuture<'a, Result<(String, usize)>> {
        let span = info_span!("agent", name = %name, depth, run_id = %Uuid::new_v4());
        async move {
            let agent = self
                .graph
                .agent(name)
                .ok_or_else(|| ChorusError::UnknownTool(name.to_string()))?;
            self.converse(agent, input, depth, records).await
        }
        .instrument(span)
        .boxed()
    }

    async fn converse(
        &self,
        agent: &AgentSpec,
        input: Option<&str>,
        depth: usize,
        records: &mut Vec<ToolCallRecord>,
    ) -> Result<(String, usize)> {
        info!("Running agent {}", agent.name);
        if let Some(input) = input {
            debug!("Input: {}", input);
        }

        let mut conversation = ConversationState::seeded(&agent.prompt, input);
        let tools = self.graph.tool_schemas(&agent.name);
        let mut turns = 0;
        let mut state = LoopState::AwaitingModel;

        loop {
            state = match state {
                LoopState::AwaitingModel => {
                    turns += 1;
                    if let Some(limit) = self.max_turns {
                        if turns > limit {
                            return Err(ChorusError::TurnLimit {
                                agent: agent.name.clone(),
                                limit,
                            });
                        }
                    }

                    debug!("Agent {} turn {}", agent.name, turns);
                    let request = ModelRequest {
                        model: agent.model.clone(),
                        messages: conversation.messages().to_vec(),
                        tools: tools.clone(),
                    };
                    let response = self.model.complete(&request).await?;

                    if response.is_final() {
                        let content = response.content.unwrap_or_default();
                        conversation.push(Message::Assistant {
                            content: Some(content.clone()),
                            tool_calls: Vec::new(),
                        });
                        LoopState::Done(content)
                    } else {
                        conversation.push(Message::Assistant {
                            content: response.content,
                            tool_calls: response.tool_calls.clone(),
                        });
                        LoopState::DispatchingTools(response.tool_calls)
                    }
                }

                LoopState::DispatchingTools(pending) => {
                    let mut results = Vec::with_capacity(pending.len());
                    for request in &pending {
                        let outcome = self.dispatch(agent, request, depth, records).await;
                        results.push(Message::ToolResult {
                            call_id: request.id.clone(),
                            name: request.name.clone(),
                            content: outcome.content().to_string(),
                            is_error: outcome.is_error(),
                        });
                        records.push(ToolCallRecord {
                            agent: agent.name.clone(),
                            name: request.name.clone(),
                            arguments: request.arguments.clone(),
                            outcome,
                        });
                    }
                    conversation.extend(results);
                    LoopState::AwaitingModel
                }

                LoopState::Done(content) => {
                    info!("Agent {} finished after {} turn(s)", agent.name, turns);
                    return Ok((content, turns));
                }
            };
        }
    }

    /// Execute one tool call, capturing every failure as an error outcome.
    ///
    /// Calls made by a delegated agent are appended to `records`.
    async fn dispatch(
        &self,
        agent: &AgentSpec,
        request: &ToolCallRequest,
        depth: usize,
        records: &mut Vec<ToolCallRecord>,
    ) -> ToolOutcome {
        info!("Agent {} calling tool {} with args: {}", agent.name, request.name, request.arguments);

        let Some(tool) = self.graph.find_tool(&agent.name, &request.name) else {
            warn!("Agent {} requested unknown tool {}", agent.name, request.name);
            let err = ChorusError::UnknownTool(request.name.clone());
            return ToolOutcome::Error(err.to_string());
        };

        let args = match tool.parameters.validate(&tool.name, &request.arguments) {
            Ok(args) => args,
            Err(e) => {
                warn!("Rejected call to {}: {}", tool.name, e);
                return ToolOutcome::Error(e.to_string());
            }
        };

        match &tool.kind {
            ToolKind::Function(function) => {
                let outcome = match AssertUnwindSafe(function.call(args)).catch_unwind().await {
                    Ok(Ok(output)) => ToolOutcome::Success(output),
                    Ok(Err(e)) => ToolOutcome::Error(format!("Tool error: {}", e)),
                    Err(panic) => ToolOutcome::Error(format!(
                        "Tool error: {} panicked: {}",
                        tool.name,
                        panic_message(panic.as_ref())
                    )),
                };
                if let ToolOutcome::Error(ref e) = outcome {
                    warn!("{}", e);
                }
                outcome
            }

            ToolKind::Agent(target) => {
                let child_depth = depth + 1;
                if let Some(limit) = self.max_depth {
                    if child_depth > limit {
                        let err = ChorusError::DepthLimit {
                            agent: target.clone(),
                            limit,
                        };
                        warn!("{}", err);
                        return ToolOutcome::Error(err.to_string());
                    }
                }

                let query = match args.string("query") {
                    Ok(query) => query.to_string(),
                    Err(e) => return ToolOutcome::Error(e.to_string()),
                };

                match self.invoke(target, Some(&query), child_depth, records).await {
                    Ok((content, _)) => ToolOutcome::Success(content),
                    Err(e) => {
                        warn!("Delegated agent {} failed: {}", target, e);
                        ToolOutcome::Error(format!("Agent error: {}", e))
                    }
                }
            }
        }
    }
}

fn panic_message(panic: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AgentConfig, AgentsDocument};
    use crate::model::testing::ScriptedModel;
    use crate::model::Role;
    use crate::tools::{FnTool, ParamDecl, ToolArgs, ToolFunction, ToolRegistry};
    use async_trait::async_trait;
    use std::time::Duration;

    struct Sleepy {
        label: &'static str,
        millis: u64,
    }

    #[async_trait]
    impl ToolFunction for Sleepy {
        fn parameters(&self) -> Vec<ParamDecl> {
            Vec::new()
        }

        async fn call(&self, _args: ToolArgs) -> Result<String> {
            tokio::time::sleep(Duration::from_millis(self.millis)).await;
            Ok(self.label.to_string())
        }
    }

    fn registry() -> ToolRegistry {
        let mut registry = ToolRegistry::new();
        registry
            .register("slow", "Slow tool.", Arc::new(Sleepy { label: "slow", millis: 40 }))
            .unwrap();
        registry
            .register("fast", "Fast tool.", Arc::new(Sleepy { label: "fast", millis: 0 }))
            .unwrap();
        registry
            .register("medium", "Medium tool.", Arc::new(Sleepy { label: "medium", millis: 15 }))
            .unwrap();
        registry
            .register(
                "fails",
                "Always fails.",
                Arc::new(FnTool::new(vec![], |_| {
                    Err(ChorusError::ToolExecution("disk on fire".to_string()))
                })),
            )
            .unwrap();
        registry
            .register(
                "panics",
                "Always panics.",
                Arc::new(FnTool::new(vec![], |_| panic!("boom"))),
            )
            .unwrap();
        registry
            .register(
                "shout",
                "Upper-cases text.",
                Arc::new(FnTool::new(vec![ParamDecl::required("text", "string")], |args| {
                    Ok(args.string("text")?.to_uppercase())
                })),
            )
            .unwrap();
        registry
    }

    fn agent(name: &str, tools: &[&str]) -> AgentConfig {
        AgentConfig {
            name: name.to_string(),
            description: format!("The {} agent", name),
            model: Some(format!("{}-model", name)),
            prompt: format!("You are {}.", name),
            tools: tools.iter().map(|t| t.to_string()).collect(),
        }
    }

    fn engine(agents: Vec<AgentConfig>, main: &str, model: Arc<ScriptedModel>) -> Engine {
        let doc = AgentsDocument {
            agents,
            main: main.to_string(),
        };
        let graph = AgentGraph::build(&doc, &registry(), "default").unwrap();
        Engine::new(Arc::new(graph), model)
    }

    fn tool_results(request: &ModelRequest) -> Vec<(String, String, bool)> {
        request
            .messages
            .iter()
            .filter_map(|m| match m {
                Message::ToolResult {
                    call_id,
                    content,
                    is_error,
                    ..
                } => Some((call_id.clone(), content.clone(), *is_error)),
                _ => None,
            })
            .collect()
    }

    #[tokio::test]
    async fn test_plain_message_finishes() {
        let model = Arc::new(ScriptedModel::new());
        model.say("solo-model", "All done.");

        let engine = engine(vec![agent("solo", &[])], "solo", model.clone());
        let run = engine.run(Some("hello")).await.unwrap();

        assert_eq!(run.content, "All done.");
        assert_eq!(run.turns, 1);
        assert!(run.tool_calls.is_empty());

        let requests = model.requests();
        let roles: Vec<Role> = requests[0].messages.iter().map(Message::role).collect();
        assert_eq!(roles, vec![Role::System, Role::User]);
    }

    #[tokio::test]
    async fn test_main_agent_may_start_without_input() {
        let model = Arc::new(ScriptedModel::new());
        model.say("solo-model", "Hi, what can I do?");

        let engine = engine(vec![agent("solo", &[])], "solo", model.clone());
        engine.run(None).await.unwrap();

        assert_eq!(model.requests()[0].messages.len(), 1);
    }

    #[tokio::test]
    async fn test_results_follow_request_order_regardless_of_latency() {
        let model = Arc::new(ScriptedModel::new());
        model
            .call("solo-model", &[("1", "slow", "{}"), ("2", "fast", "{}"), ("3", "medium", "{}")])
            .say("solo-model", "done");

        let engine = engine(vec![agent("solo", &["slow", "fast", "medium"])], "solo", model.clone());
        let run = engine.run(Some("go")).await.unwrap();

        let second = &model.requests()[1];
        let results = tool_results(second);
        assert_eq!(
            results,
            vec![
                ("1".to_string(), "slow".to_string(), false),
                ("2".to_string(), "fast".to_string(), false),
                ("3".to_string(), "medium".to_string(), false),
            ]
        );

        let names: Vec<&str> = run.tool_calls.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["slow", "fast", "medium"]);
        assert_eq!(run.turns, 2);
    }

    #[tokio::test]
    async fn test_tool_failure_becomes_conversation_content() {
        let model = Arc::new(ScriptedModel::new());
        model
            .call("solo-model", &[("1", "fails", "{}")])
            .say("solo-model", "The tool failed, sorry.");

        let engine = engine(vec![agent("solo", &["fails"])], "solo", model.clone());
        let run = engine.run(Some("go")).await.unwrap();

        assert_eq!(run.content, "The tool failed, sorry.");
        let results = tool_results(&model.requests()[1]);
        assert!(results[0].2);
        assert!(results[0].1.contains("disk on fire"));
    }

    #[tokio::test]
    async fn test_tool_panic_is_captured() {
        let model = Arc::new(ScriptedModel::new());
        model
            .call("solo-model", &[("1", "panics", "{}")])
            .say("solo-model", "recovered");

        let engine = engine(vec![agent("solo", &["panics"])], "solo", model.clone());
        let run = engine.run(Some("go")).await.unwrap();

        assert_eq!(run.content, "recovered");
        let results = tool_results(&model.requests()[1]);
        assert!(results[0].1.contains("boom"));
    }

    #[tokio::test]
    async fn test_malformed_calls_become_error_results() {
        let model = Arc::new(ScriptedModel::new());
        model
            .call(
                "solo-model",
                &[
                    ("1", "nonexistent", "{}"),
                    ("2", "shout", r#"{"text": 5}"#),
                    ("3", "shout", "{"),
                    ("4", "shout", r#"{"text": "ok"}"#),
                ],
            )
            .say("solo-model", "done");

        let engine = engine(vec![agent("solo", &["shout"])], "solo", model.clone());
        engine.run(Some("go")).await.unwrap();

        let results = tool_results(&model.requests()[1]);
        assert_eq!(results.len(), 4);
        assert!(results[0].2 && results[0].1.contains("Unknown tool"));
        assert!(results[1].2 && results[1].1.contains("must be string"));
        assert!(results[2].2);
        assert_eq!(results[3], ("4".to_string(), "OK".to_string(), false));
    }

    #[tokio::test]
    async fn test_registered_but_unlisted_tool_is_invisible() {
        let model = Arc::new(ScriptedModel::new());
        model
            .call("solo-model", &[("1", "fast", "{}")])
            .say("solo-model", "done");

        let engine = engine(vec![agent("solo", &["shout"])], "solo", model.clone());
        engine.run(Some("go")).await.unwrap();

        let first = &model.requests()[0];
        let visible: Vec<&str> = first.tools.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(visible, vec!["shout"]);

        let results = tool_results(&model.requests()[1]);
        assert!(results[0].2);
    }

    #[tokio::test]
    async fn test_agent_as_tool_recursion() {
        let model = Arc::new(ScriptedModel::new());
        model
            .call(
                "coordinator-model",
                &[("c1", "summarizer", r#"{"query": "Summarize the call"}"#)],
            )
            .say("coordinator-model", "Here is the summary: short");
        model
            .call("summarizer-model", &[("s1", "shout", r#"{"text": "short"}"#)])
            .say("summarizer-model", "short");

        let engine = engine(
            vec![
                agent("coordinator", &["summarizer"]),
                agent("summarizer", &["shout"]),
            ],
            "coordinator",
            model.clone(),
        );
        let run = engine.run(None).await.unwrap();
        assert_eq!(run.content, "Here is the summary: short");

        let sub = model.requests_for("summarizer-model");
        assert_eq!(
            sub[0].messages,
            vec![
                Message::system("You are summarizer."),
                Message::user("Summarize the call"),
            ]
        );
        assert_eq!(sub[0].tools.len(), 1);

        let parent = model.requests_for("coordinator-model");
        assert_eq!(
            tool_results(&parent[1]),
            vec![("c1".to_string(), "short".to_string(), false)]
        );

        let calls: Vec<String> = run.tool_calls.iter().map(|r| r.to_string()).collect();
        assert_eq!(
            calls,
            vec![
                r#"summarizer: shout({"text": "short"})"#.to_string(),
                r#"coordinator: summarizer({"query": "Summarize the call"})"#.to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn test_delegated_agent_failure_is_reported_to_parent() {
        let model = Arc::new(ScriptedModel::new());
        model
            .call("coordinator-model", &[("c1", "helper", r#"{"query": "help"}"#)])
            .say("coordinator-model", "helper is down");

        let engine = engine(
            vec![agent("coordinator", &["helper"]), agent("helper", &[])],
            "coordinator",
            model.clone(),
        );
        let run = engine.run(None).await.unwrap();

        assert_eq!(run.content, "helper is down");
        let results = tool_results(&model.requests_for("coordinator-model")[1]);
        assert!(results[0].2);
        assert!(results[0].1.starts_with("Agent error: "));
    }

    #[tokio::test]
    async fn test_failed_delegate_keeps_its_tool_calls() {
        let model = Arc::new(ScriptedModel::new());
        model
            .call("coordinator-model", &[("c1", "helper", r#"{"query": "help"}"#)])
            .say("coordinator-model", "helper gave up");
        model.call("helper-model", &[("h1", "shout", r#"{"text": "partial"}"#)]);

        let engine = engine(
            vec![agent("coordinator", &["helper"]), agent("helper", &["shout"])],
            "coordinator",
            model.clone(),
        );
        let run = engine.run(None).await.unwrap();

        let calls: Vec<String> = run.tool_calls.iter().map(|r| r.to_string()).collect();
        assert_eq!(
            calls,
            vec![
                r#"helper: shout({"text": "partial"})"#.to_string(),
                r#"coordinator: helper({"query": "help"})"#.to_string(),
            ]
        );
        assert_eq!(run.tool_calls[0].outcome, ToolOutcome::Success("PARTIAL".to_string()));
        assert!(run.tool_calls[1].outcome.is_error());
    }

    #[tokio::test]
    async fn test_turn_limit_stops_runaway_agent() {
        let model = Arc::new(ScriptedModel::new());
        for i in 0..5 {
            let id = i.to_string();
            model.call("solo-model", &[(id.as_str(), "fast", "{}")]);
        }

        let engine = engine(vec![agent("solo", &["fast"])], "solo", model.clone())
            .with_max_turns(Some(3));
        let err = engine.run(Some("loop")).await.unwrap_err();

        assert!(matches!(err, ChorusError::TurnLimit { limit: 3, .. }));
        assert_eq!(model.requests().len(), 3);
    }

    #[tokio::test]
    async fn test_depth_limit_stops_self_delegation() {
        let model = Arc::new(ScriptedModel::new());
        model
            .call("echo-model", &[("1", "echo", r#"{"query": "again"}"#)])
            .call("echo-model", &[("2", "echo", r#"{"query": "again"}"#)])
            .say("echo-model", "stopped")
            .say("echo-model", "unwound");

        let engine = engine(vec![agent("echo", &["echo"])], "echo", model.clone())
            .with_max_depth(Some(1));
        let run = engine.run(Some("start")).await.unwrap();

        assert_eq!(run.content, "unwound");
        let nested = model.requests().into_iter().nth(2).unwrap();
        let results = tool_results(&nested);
        assert!(results[0].2);
        assert!(results[0].1.contains("maximum delegation depth"));
    }

    #[tokio::test]
    async fn test_model_failure_at_top_level_is_an_error() {
        let model = Arc::new(ScriptedModel::new());
        let engine = engine(vec![agent("solo", &[])], "solo", model);
        assert!(matches!(engine.run(Some("hi")).await, Err(ChorusError::Model(_))));
    }
}
