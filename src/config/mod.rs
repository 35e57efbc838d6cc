//! Configuration module for Chorus.
//!
//! Handles process settings and agent graph documents.

mod agents;
mod settings;

pub use agents::{AgentConfig, AgentsDocument};
pub use settings::{DuplicatePolicy, EngineSettings, GeneralSettings, ModelSettings, Settings};
