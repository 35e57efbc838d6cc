//! Console conversation with the human user.

use crate::error::{ChorusError, Result};
use crate::tools::{ParamDecl, ToolArgs, ToolFunction};
use async_trait::async_trait;
use console::style;
use std::io::{BufRead, Write};

/// Prints a message to the user and returns their reply from stdin.
pub struct TalkToUser;

fn converse(message: &str) -> Result<String> {
    println!();
    println!("{} {}", style("AI:").cyan().bold(), message);
    print!("{} ", style("User:").green().bold());
    std::io::stdout().flush()?;

    let mut reply = String::new();
    let read = std::io::stdin().lock().read_line(&mut reply)?;
    if read == 0 {
        return Err(ChorusError::ToolExecution("user input closed".to_string()));
    }
    Ok(reply.trim_end_matches(['\r', '\n']).to_string())
}

#[async_trait]
impl ToolFunction for TalkToUser {
    fn parameters(&self) -> Vec<ParamDecl> {
        vec![ParamDecl::required("message", "string").describe("What to say to the user")]
    }

    async fn call(&self, args: ToolArgs) -> Result<String> {
        let message = args.string("message")?.to_string();
        tokio::task::spawn_blocking(move || converse(&message))
            .await
            .map_err(|e| ChorusError::ToolExecution(e.to_string()))?
    }
}
