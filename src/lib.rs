//! Chorus - Declarative Multi-Agent Orchestration
//!
//! A CLI tool and library for running graphs of LLM agents that call tools
//! and delegate to each other.
//!
//! # Overview
//!
//! Chorus allows you to:
//! - Describe agents, their prompts and their tools in a YAML, JSON, TOML or Markdown document
//! - Expose plain functions as tools with schemas inferred from their parameters
//! - Let agents call other agents as if they were tools
//! - Validate transcription output against the expected JSON structure
//!
//! # Architecture
//!
//! The library is organized into several modules:
//!
//! - `config` - Settings and agent graph documents
//! - `tools` - Tool registry, schema inference and builtin tools
//! - `model` - Chat model abstraction and the OpenAI client
//! - `agent` - Agent graph and the conversation engine
//! - `qa` - Transcription QA validator
//! - `transcript` - Lazily loaded transcript shared with tools
//! - `orchestrator` - Wires everything together
//!
//! # Example
//!
//! ```rust,no_run
//! use chorus::config::{AgentsDocument, Settings};
//! use chorus::orchestrator::Orchestrator;
//! use chorus::transcript::TranscriptHandle;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let settings = Settings::load()?;
//!     let document = AgentsDocument::load("agents.yaml".as_ref())?;
//!     let orchestrator = Orchestrator::new(&settings, &document, TranscriptHandle::none())?;
//!
//!     let run = orchestrator.run(Some("Check the latest transcript")).await?;
//!     println!("{}", run.content);
//!
//!     Ok(())
//! }
//! ```

pub mod agent;
pub mod cli;
pub mod config;
pub mod error;
pub mod model;
pub mod orchestrator;
pub mod qa;
pub mod tools;
pub mod transcript;

pub use error::{ChorusError, Result};
