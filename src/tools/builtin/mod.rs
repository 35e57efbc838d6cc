//! Built-in tools available to every agent graph.

mod cleaner;
mod user;
mod words;

pub use cleaner::FillerCleaner;
pub use user::TalkToUser;
pub use words::most_common_words;

use super::{FnTool, ParamDecl, ToolArgs, ToolFunction, ToolRegistry};
use crate::error::Result;
use crate::model::ModelClient;
use crate::qa;
use crate::transcript::TranscriptHandle;
use async_trait::async_trait;
use std::sync::Arc;

/// Resources shared by the built-in tools.
pub struct BuiltinContext {
    pub transcript: TranscriptHandle,
    pub model: Arc<dyn ModelClient>,
    pub cleaner_model: String,
}

/// Awaits the background transcript.
pub struct GetTranscript {
    transcript: TranscriptHandle,
}

#[async_trait]
impl ToolFunction for GetTranscript {
    fn parameters(&self) -> Vec<ParamDecl> {
        Vec::new()
    }

    async fn call(&self, _args: ToolArgs) -> Result<String> {
        self.transcript.wait().await
    }
}

/// Register every built-in tool.
pub fn register_defaults(registry: &mut ToolRegistry, ctx: BuiltinContext) -> Result<()> {
    registry.register(
        "get_transcript",
        "Retrieve the transcript of the audio file. Awaits until transcription is complete.",
        Arc::new(GetTranscript {
            transcript: ctx.transcript,
        }),
    )?;

    registry.register(
        "validate_json_structure",
        "Validate a transcription JSON payload and return a QA status. Accepts raw JSON or JSON \
         embedded in text or Markdown. Returns 'Invalid JSON: ...', 'Invalid JSON structure: ...', \
         'JSON structure is valid with warnings: ...' or 'JSON structure is valid'.",
        Arc::new(FnTool::new(
            vec![ParamDecl::required("transcription", "string")],
            |args| Ok(qa::validate_json_structure(args.string("transcription")?)),
        )),
    )?;

    registry.register(
        "get_n_most_common_words",
        "Extract the n most common words from the text.",
        Arc::new(FnTool::new(
            vec![ParamDecl::required("text", "string"), ParamDecl::required("n", "integer")],
            |args| words::describe_most_common_words(args.string("text")?, args.integer("n")?),
        )),
    )?;

    registry.register(
        "remove_filler_words",
        "Clean transcript text with the language model. Expects a JSON payload string of the form \
         {\"transcript\": \"...\", \"metadata\": {...}}.",
        Arc::new(FillerCleaner::new(ctx.model, &ctx.cleaner_model)),
    )?;

    registry.register(
        "talk_to_user",
        "Send a message to the user and get the user's response. This is the only way to \
         communicate with the user, so all information to and from the user comes through this \
         function.",
        Arc::new(TalkToUser),
    )?;

    Ok(())
}
