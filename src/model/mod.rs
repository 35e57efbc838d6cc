//! Model service contract.
//!
//! The conversation loop only depends on [`ModelClient`]; the hosted
//! OpenAI implementation lives in [`openai`].

pub mod openai;
#[cfg(test)]
pub(crate) mod testing;
mod types;

pub use openai::OpenAIModel;
pub use types::{Message, ModelRequest, ModelResponse, Role, ToolCallRequest, ToolSchema};

use crate::error::Result;
use async_trait::async_trait;

/// A language model that answers with a message or tool calls.
#[async_trait]
pub trait ModelClient: Send + Sync {
    /// Send the conversation and visible tools, returning the model's turn.
    async fn complete(&self, request: &ModelRequest) -> Result<ModelResponse>;
}
