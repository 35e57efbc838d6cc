//! Check command implementation.

use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::{AgentsDocument, Settings};
use crate::orchestrator::Orchestrator;
use crate::transcript::TranscriptHandle;
use anyhow::Result;

/// Build an agent graph without running it and print its shape.
pub fn run_check(agents: &str, settings: Settings) -> Result<()> {
    preflight::check(Operation::Offline)?;

    let agents_path = Settings::expand_path(agents);
    preflight::check_input_file(&agents_path)?;
    let document = AgentsDocument::load(&agents_path)?;

    let orchestrator = match Orchestrator::new(&settings, &document, TranscriptHandle::none()) {
        Ok(o) => o,
        Err(e) => {
            Output::error(&format!("Invalid agent graph: {}", e));
            return Err(e.into());
        }
    };

    let graph = orchestrator.graph();
    Output::header(&format!("Agents ({})", graph.agents().count()));

    for agent in graph.agents() {
        let main_marker = if agent.name == graph.main().name { " (main)" } else { "" };
        println!();
        Output::list_item(&format!("{}{}", agent.name, main_marker));
        Output::kv("Model", &agent.model);
        if !agent.description.is_empty() {
            Output::kv("Description", &agent.description);
        }

        let tools: Vec<String> = graph
            .visible_tools(&agent.name)
            .iter()
            .map(|t| {
                if t.is_agent() {
                    format!("{} [agent]", t.name)
                } else {
                    t.name.clone()
                }
            })
            .collect();
        Output::kv(
            "Tools",
            &if tools.is_empty() { "none".to_string() } else { tools.join(", ") },
        );
    }

    println!();
    Output::success("Agent graph is valid.");
    Ok(())
}
