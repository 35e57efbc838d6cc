//! CLI module for Chorus.

pub mod commands;
mod output;
pub mod preflight;

pub use output::{truncate, Output};

use clap::{Parser, Subcommand};

/// Chorus - declarative multi-agent orchestration
///
/// Loads a graph of agents from a configuration document and runs the main
/// agent, letting agents call tools and each other until an answer is produced.
#[derive(Parser, Debug)]
#[command(name = "chorus")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v for info, -vv for debug, -vvv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the main agent of an agent graph
    Run {
        /// Agent graph document (.yaml, .yml, .json, .toml or .md)
        agents: String,

        /// Transcript file made available through the get_transcript tool
        #[arg(short, long)]
        transcript: Option<String>,

        /// Initial message for the main agent
        #[arg(short, long)]
        input: Option<String>,
    },

    /// Validate an agent graph and show each agent's tools
    Check {
        /// Agent graph document
        agents: String,
    },

    /// List the registered tools and their parameter schemas
    Tools,

    /// Run the transcription QA validator on files ('-' reads stdin)
    Validate {
        /// Files to validate
        #[arg(required = true)]
        files: Vec<String>,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Show configuration file path
    Path,
}
