//! OpenAI chat-completions backed model client.

use super::types::{Message, ModelRequest, ModelResponse, ToolCallRequest, ToolSchema};
use super::ModelClient;
use crate::error::{ChorusError, Result};
use async_openai::config::OpenAIConfig;
use async_openai::types::{
    ChatCompletionMessageToolCall, ChatCompletionRequestAssistantMessageArgs,
    ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
    ChatCompletionRequestToolMessageArgs, ChatCompletionRequestUserMessageArgs, ChatCompletionTool,
    ChatCompletionToolType, CreateChatCompletionRequestArgs, FunctionCall, FunctionObject,
};
use async_openai::Client;
use async_trait::async_trait;
use std::time::Duration;
use tracing::debug;

/// Default timeout for OpenAI API requests (5 minutes).
pub const DEFAULT_TIMEOUT_SECS: u64 = 300;

/// Create an OpenAI client with a request timeout.
///
/// Credentials come from `OPENAI_API_KEY` in the environment.
pub fn create_client_with_timeout(timeout: Duration) -> Result<Client<OpenAIConfig>> {
    let http_client = reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| ChorusError::Model(format!("Failed to create HTTP client: {}", e)))?;

    Ok(Client::with_config(OpenAIConfig::default()).with_http_client(http_client))
}

/// Model client calling the OpenAI chat completions API.
pub struct OpenAIModel {
    client: Client<OpenAIConfig>,
}

impl OpenAIModel {
    pub fn new() -> Result<Self> {
        Self::with_timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    pub fn with_timeout(timeout: Duration) -> Result<Self> {
        Ok(Self {
            client: create_client_with_timeout(timeout)?,
        })
    }
}

#[async_trait]
impl ModelClient for OpenAIModel {
    async fn complete(&self, request: &ModelRequest) -> Result<ModelResponse> {
        let messages = request
            .messages
            .iter()
            .map(to_openai_message)
            .collect::<Result<Vec<_>>>()?;

        let mut args = CreateChatCompletionRequestArgs::default();
        args.model(&request.model).messages(messages);
        if !request.tools.is_empty() {
            args.tools(request.tools.iter().map(to_openai_tool).collect::<Vec<_>>());
        }
        let chat_request = args.build().map_err(|e| ChorusError::Model(e.to_string()))?;

        debug!(
            "Calling model {} with {} messages and {} tools",
            request.model,
            request.messages.len(),
            request.tools.len()
        );

        let response = self
            .client
            .chat()
            .create(chat_request)
            .await
            .map_err(|e| ChorusError::Model(format!("OpenAI API error: {}", e)))?;

        let choice = response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| ChorusError::Model("No response from model".to_string()))?;

        let tool_calls = choice
            .message
            .tool_calls
            .unwrap_or_default()
            .into_iter()
            .map(|call| ToolCallRequest {
                id: call.id,
                name: call.function.name,
                arguments: call.function.arguments,
            })
            .collect();

        Ok(ModelResponse {
            content: choice.message.content,
            tool_calls,
        })
    }
}

fn to_openai_message(message: &Message) -> Result<ChatCompletionRequestMessage> {
    let converted: ChatCompletionRequestMessage = match message {
        Message::System { content } => ChatCompletionRequestSystemMessageArgs::default()
            .content(content.clone())
            .build()
            .map_err(|e| ChorusError::Model(e.to_string()))?
            .into(),
        Message::User { content } => ChatCompletionRequestUserMessageArgs::default()
            .content(content.clone())
            .build()
            .map_err(|e| ChorusError::Model(e.to_string()))?
            .into(),
        Message::Assistant { content, tool_calls } => {
            let mut args = ChatCompletionRequestAssistantMessageArgs::default();
            if let Some(content) = content {
                args.content(content.clone());
            }
            if !tool_calls.is_empty() {
                args.tool_calls(
                    tool_calls
                        .iter()
                        .map(|call| ChatCompletionMessageToolCall {
                            id: call.id.clone(),
                            r#type: ChatCompletionToolType::Function,
                            function: FunctionCall {
                                name: call.name.clone(),
                                arguments: call.arguments.clone(),
                            },
                        })
                        .collect::<Vec<_>>(),
                );
            }
            args.build().map_err(|e| ChorusError::Model(e.to_string()))?.into()
        }
        Message::ToolResult { call_id, content, .. } => ChatCompletionRequestToolMessageArgs::default()
            .tool_call_id(call_id.clone())
            .content(content.clone())
            .build()
            .map_err(|e| ChorusError::Model(e.to_string()))?
            .into(),
    };

    Ok(converted)
}

fn to_openai_tool(schema: &ToolSchema) -> ChatCompletionTool {
    ChatCompletionTool {
        r#type: ChatCompletionToolType::Function,
        function: FunctionObject {
            name: schema.name.clone(),
            description: Some(schema.description.clone()),
            parameters: Some(schema.parameters.clone()),
            strict: Some(schema.strict),
        },
    }
}
