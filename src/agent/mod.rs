//! Agents, agent graphs and the conversation loop.
//!
//! Each agent alternates between model calls and tool dispatch until the
//! model produces a final message. Agents listed as tools of other agents
//! are invoked recursively through the same dispatch path, with their own
//! fresh conversation.

mod conversation;
mod engine;
mod graph;

pub use conversation::ConversationState;
pub use engine::{AgentRun, Engine, ToolCallRecord, ToolOutcome};
pub use graph::{AgentGraph, AgentSpec};
