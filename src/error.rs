//! Error types for Chorus.

use thiserror::Error;

/// Library-level error type for Chorus operations.
#[derive(Error, Debug)]
pub enum ChorusError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Agent '{agent}' references unknown tool or agent '{reference}'")]
    GraphConfig { agent: String, reference: String },

    #[error("Main agent '{0}' is not declared in the agent list")]
    MissingMainAgent(String),

    #[error("Tool '{tool}' parameter '{parameter}' has unsupported type '{ty}' (expected string, integer, float or boolean)")]
    SchemaType {
        tool: String,
        parameter: String,
        ty: String,
    },

    #[error("Tool '{0}' must have a non-empty description")]
    MissingDescription(String),

    #[error("Tool '{0}' is already registered")]
    DuplicateTool(String),

    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    #[error("Invalid tool call: {0}")]
    Dispatch(String),

    #[error("Tool execution failed: {0}")]
    ToolExecution(String),

    #[error("Agent '{agent}' exceeded maximum turns ({limit})")]
    TurnLimit { agent: String, limit: usize },

    #[error("Agent '{agent}' exceeded maximum delegation depth ({limit})")]
    DepthLimit { agent: String, limit: usize },

    #[error("Model service error: {0}")]
    Model(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("YAML parse error: {0}")]
    YamlParse(#[from] serde_yaml::Error),
}

/// Result type alias for Chorus operations.
pub type Result<T> = std::result::Result<T, ChorusError>;
