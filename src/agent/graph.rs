//! Agent graph construction.

use crate::config::{AgentConfig, AgentsDocument};
use crate::error::{ChorusError, Result};
use crate::model::ToolSchema;
use crate::tools::{ToolDescriptor, ToolRegistry};
use std::collections::HashSet;
use tracing::debug;

/// An immutable, validated agent definition.
#[derive(Debug, Clone, PartialEq)]
pub struct AgentSpec {
    pub name: String,
    pub description: String,
    pub model: String,
    pub prompt: String,
    pub tools: Vec<String>,
}

impl AgentSpec {
    fn from_config(config: &AgentConfig, default_model: &str) -> Self {
        Self {
            name: config.name.clone(),
            description: config.description.clone(),
            model: config
                .model
                .clone()
                .filter(|m| !m.trim().is_empty())
                .unwrap_or_else(|| default_model.to_string()),
            prompt: config.prompt.clone(),
            tools: config.tools.clone(),
        }
    }
}

#[derive(Debug)]
struct AgentNode {
    spec: AgentSpec,
    visible: Vec<ToolDescriptor>,
}

/// All agents of one configuration document, with resolved tool sets.
#[derive(Debug)]
pub struct AgentGraph {
    nodes: Vec<AgentNode>,
    main: usize,
}

impl AgentGraph {
    /// Build and validate a graph against a tool registry.
    ///
    /// Every tool name an agent lists must name a registered function or
    /// another declared agent. Agents referenced by other agents are exposed
    /// through a synthesized descriptor taking a single `query` string.
    pub fn build(
        document: &AgentsDocument,
        registry: &ToolRegistry,
        default_model: &str,
    ) -> Result<Self> {
        let mut declared: HashSet<&str> = HashSet::new();
        for agent in &document.agents {
            if !declared.insert(agent.name.as_str()) {
                return Err(ChorusError::Config(format!(
                    "Agent '{}' is declared more than once",
                    agent.name
                )));
            }
            if registry.contains(&agent.name) {
                return Err(ChorusError::Config(format!(
                    "Agent '{}' has the same name as a registered tool",
                    agent.name
                )));
            }
        }

        let mut nodes = Vec::with_capacity(document.agents.len());
        for agent in &document.agents {
            let mut visible: Vec<ToolDescriptor> = Vec::with_capacity(agent.tools.len());

            for tool_name in &agent.tools {
                if visible.iter().any(|t| &t.name == tool_name) {
                    return Err(ChorusError::Config(format!(
                        "Agent '{}' lists tool '{}' more than once",
                        agent.name, tool_name
                    )));
                }

                let descriptor = if let Some(target) = document.agent(tool_name) {
                    ToolDescriptor::agent(&target.name, &target.description)?
                } else if registry.contains(tool_name) {
                    registry.resolve(tool_name)?.clone()
                } else {
                    return Err(ChorusError::GraphConfig {
                        agent: agent.name.clone(),
                        reference: tool_name.clone(),
                    });
                };
                visible.push(descriptor);
            }

            debug!("Agent '{}' sees {} tools", agent.name, visible.len());
            nodes.push(AgentNode {
                spec: AgentSpec::from_config(agent, default_model),
                visible,
            });
        }

        let main = nodes
            .iter()
            .position(|n| n.spec.name == document.main)
            .ok_or_else(|| ChorusError::MissingMainAgent(document.main.clone()))?;

        Ok(Self { nodes, main })
    }

    /// The agent receiving the initial input.
    pub fn main(&self) -> &AgentSpec {
        &self.nodes[self.main].spec
    }

    pub fn agent(&self, name: &str) -> Option<&AgentSpec> {
        self.node(name).map(|n| &n.spec)
    }

    /// Agents in declaration order.
    pub fn agents(&self) -> impl Iterator<Item = &AgentSpec> {
        self.nodes.iter().map(|n| &n.spec)
    }

    /// Tools visible to an agent, in configured order.
    pub fn visible_tools(&self, agent: &str) -> &[ToolDescriptor] {
        self.node(agent).map(|n| n.visible.as_slice()).unwrap_or_default()
    }

    /// Model-facing schemas of the tools visible to an agent.
    pub fn tool_schemas(&self, agent: &str) -> Vec<ToolSchema> {
        self.visible_tools(agent)
            .iter()
            .map(ToolDescriptor::schema)
            .collect()
    }

    /// Resolve a tool name from an agent's point of view.
    pub fn find_tool(&self, agent: &str, tool: &str) -> Option<&ToolDescriptor> {
        self.visible_tools(agent).iter().find(|t| t.name == tool)
    }

    fn node(&self, name: &str) -> Option<&AgentNode> {
        self.nodes.iter().find(|n| n.spec.name == name)
    }
}
