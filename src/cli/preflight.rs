//! Pre-flight checks before starting a session.
//!
//! Validates that credentials and input files are available before a
//! conversation starts, so nothing fails midway through an agent run.

use crate::error::{ChorusError, Result};
use std::path::Path;

/// Requirements for different operations.
#[derive(Debug, Clone, Copy)]
pub enum Operation {
    /// Running agents requires an API key.
    Run,
    /// Checking a graph or validating files needs nothing external.
    Offline,
}

/// Run pre-flight checks for the given operation.
pub fn check(operation: Operation) -> Result<()> {
    match operation {
        Operation::Run => check_api_key()?,
        Operation::Offline => {}
    }
    Ok(())
}

/// Check that an input path exists and is a regular file.
pub fn check_input_file(path: &Path) -> Result<()> {
    if !path.exists() {
        return Err(ChorusError::Config(format!(
            "Path '{}' does not exist",
            path.display()
        )));
    }
    if !path.is_file() {
        return Err(ChorusError::Config(format!(
            "Path '{}' is not a file",
            path.display()
        )));
    }
    Ok(())
}

/// Check if OpenAI API key is configured.
fn check_api_key() -> Result<()> {
    match std::env::var("OPENAI_API_KEY") {
        Ok(key) if !key.is_empty() => Ok(()),
        Ok(_) => Err(ChorusError::Config(
            "OPENAI_API_KEY is empty. Set it in your environment or a .env file.".to_string(),
        )),
        Err(_) => Err(ChorusError::Config(
            "OPENAI_API_KEY not set. Set it in your environment or a .env file.".to_string(),
        )),
    }
}
