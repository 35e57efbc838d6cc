//! Validate command implementation.

use crate::cli::Output;
use crate::config::Settings;
use crate::qa;
use anyhow::{Context, Result};
use std::io::Read;

/// Run the transcription QA validator over files.
pub fn run_validate(files: &[String]) -> Result<()> {
    let progress = (files.len() > 1).then(|| Output::progress_bar(files.len() as u64, "Validating"));

    let mut results = Vec::with_capacity(files.len());
    for file in files {
        let text = read_input(file)?;
        results.push((file.as_str(), qa::check(&text)));
        if let Some(ref pb) = progress {
            pb.inc(1);
        }
    }

    if let Some(pb) = progress {
        pb.finish_and_clear();
    }

    for (file, status) in &results {
        Output::qa_status(file, status);
    }

    let failed = results.iter().filter(|(_, s)| !s.is_valid()).count();
    if failed > 0 {
        anyhow::bail!("{} of {} input(s) failed validation", failed, results.len());
    }

    Ok(())
}

fn read_input(file: &str) -> Result<String> {
    if file == "-" {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .context("Failed to read stdin")?;
        return Ok(text);
    }

    let path = Settings::expand_path(file);
    std::fs::read_to_string(&path).with_context(|| format!("Failed to read {}", path.display()))
}
