//! Agent graph documents.
//!
//! A document declares the agents of one graph and names the main agent.
//! It can be written as YAML, JSON, TOML, or Markdown with YAML front matter.

use crate::error::{ChorusError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// One declared agent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentConfig {
    pub name: String,
    /// Shown to other agents when this agent is exposed as a tool.
    #[serde(default)]
    pub description: String,
    /// Model identifier; falls back to the configured default model.
    #[serde(default)]
    pub model: Option<String>,
    /// System prompt.
    pub prompt: String,
    /// Function tools and agents this agent may call.
    #[serde(default)]
    pub tools: Vec<String>,
}

/// A full agent graph document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentsDocument {
    pub agents: Vec<AgentConfig>,
    /// Name of the agent receiving the initial input.
    pub main: String,
}

impl AgentsDocument {
    /// Load a document, choosing the format from the file extension.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_lowercase)
            .unwrap_or_default();

        debug!("Loading agent document {} ({})", path.display(), extension);

        match extension.as_str() {
            "yaml" | "yml" => Self::from_yaml(&content),
            "json" => Self::from_json(&content),
            "toml" => Self::from_toml(&content),
            "md" | "markdown" => Self::from_markdown(&content),
            other => Err(ChorusError::Config(format!(
                "Unsupported agent document format '{}' for {}",
                other,
                path.display()
            ))),
        }
    }

    pub fn from_yaml(content: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(content)?)
    }

    pub fn from_json(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Parse the YAML front matter of a Markdown document.
    pub fn from_markdown(content: &str) -> Result<Self> {
        let front_matter = front_matter(content).ok_or_else(|| {
            ChorusError::Config("Markdown agent document has no front matter".to_string())
        })?;
        Self::from_yaml(front_matter)
    }

    /// Look up a declared agent.
    pub fn agent(&self, name: &str) -> Option<&AgentConfig> {
        self.agents.iter().find(|a| a.name == name)
    }
}

/// Text between the leading `---` line and the next `---` line.
fn front_matter(content: &str) -> Option<&str> {
    let content = content.trim_start_matches('\u{feff}');
    let rest = content
        .strip_prefix("---\n")
        .or_else(|| content.strip_prefix("---\r\n"))?;

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end() == "---" {
            return Some(&rest[..offset]);
        }
        offset += line.len();
    }
    None
}
