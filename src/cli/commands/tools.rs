//! Tools command implementation.

use crate::cli::Output;
use crate::config::Settings;
use crate::orchestrator::Orchestrator;
use crate::transcript::TranscriptHandle;
use anyhow::Result;
use std::time::Duration;

/// List registered tools with their schemas.
pub fn run_tools(settings: Settings) -> Result<()> {
    let model = std::sync::Arc::new(crate::model::OpenAIModel::with_timeout(Duration::from_secs(
        settings.model.timeout_secs,
    ))?);
    let registry = Orchestrator::build_registry(&settings, TranscriptHandle::none(), model)?;

    Output::header(&format!("Registered tools ({})", registry.len()));
    for tool in registry.iter() {
        println!();
        Output::list_item(&tool.name);
        Output::kv("Description", &tool.description);
        let schema = serde_json::to_string_pretty(&tool.parameters.to_json_schema())?;
        for line in schema.lines() {
            println!("    {}", line);
        }
    }

    Ok(())
}
