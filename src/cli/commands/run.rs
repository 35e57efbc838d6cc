//! Run command implementation.

use crate::cli::preflight::{self, Operation};
use crate::cli::{truncate, Output};
use crate::config::{AgentsDocument, Settings};
use crate::orchestrator::Orchestrator;
use crate::transcript::TranscriptHandle;
use anyhow::Result;
use std::path::PathBuf;

/// Run the main agent of a graph.
pub async fn run_agents(
    agents: &str,
    transcript: Option<String>,
    input: Option<String>,
    settings: Settings,
) -> Result<()> {
    // Pre-flight checks
    if let Err(e) = preflight::check(Operation::Run) {
        Output::error(&format!("{}", e));
        return Err(e.into());
    }

    let agents_path = Settings::expand_path(agents);
    preflight::check_input_file(&agents_path)?;
    let document = AgentsDocument::load(&agents_path)?;

    // Start loading the transcript while the agents get going
    let transcript = match transcript {
        Some(path) => {
            let path: PathBuf = Settings::expand_path(&path);
            preflight::check_input_file(&path)?;
            TranscriptHandle::from_file(path)
        }
        None => TranscriptHandle::none(),
    };

    let orchestrator = Orchestrator::new(&settings, &document, transcript)?;
    Output::info(&format!("Running agent '{}'", orchestrator.graph().main().name));

    match orchestrator.run(input.as_deref()).await {
        Ok(response) => {
            println!("\n{}\n", response.content);

            if !response.tool_calls.is_empty() {
                Output::header(&format!("Tool calls ({})", response.tool_calls.len()));
                for call in &response.tool_calls {
                    let line = format!(
                        "  {} -> {} {}",
                        call.agent,
                        call.name,
                        truncate(&call.arguments, 60)
                    );
                    if call.outcome.is_error() {
                        Output::warning(&line);
                    } else {
                        Output::info(&line);
                    }
                }
                println!();
            }

            Output::info(&format!("Completed in {} turn(s)", response.turns));
        }
        Err(e) => {
            Output::error(&format!("Agent failed: {}", e));
            return Err(e.into());
        }
    }

    Ok(())
}
