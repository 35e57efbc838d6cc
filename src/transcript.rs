//! Handle on the upstream transcript producer.
//!
//! Transcription itself happens outside this crate. A producer is started
//! before the conversation begins and keeps running while agents work;
//! tools that need the transcript await the shared handle.

use crate::error::{ChorusError, Result};
use futures::future::{BoxFuture, FutureExt, Shared};
use std::path::PathBuf;
use tracing::{info, warn};

type Pending = Shared<BoxFuture<'static, std::result::Result<String, String>>>;

/// Cloneable handle resolving to the transcript text once available.
#[derive(Clone)]
pub struct TranscriptHandle {
    pending: Option<Pending>,
}

impl TranscriptHandle {
    /// No transcript was supplied.
    pub fn none() -> Self {
        Self { pending: None }
    }

    /// A transcript that is already available.
    pub fn ready(text: &str) -> Self {
        let text = text.to_string();
        Self {
            pending: Some(async move { Ok(text) }.boxed().shared()),
        }
    }

    /// Start loading a transcript file in the background.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn from_file(path: PathBuf) -> Self {
        let task = tokio::spawn(async move {
            info!("Loading transcript from {}", path.display());
            match tokio::fs::read_to_string(&path).await {
                Ok(text) => {
                    info!("Transcript ready ({} bytes)", text.len());
                    Ok(text.trim().to_string())
                }
                Err(e) => {
                    warn!("Failed to load transcript {}: {}", path.display(), e);
                    Err(format!("could not read {}: {}", path.display(), e))
                }
            }
        });

        let pending = async move {
            match task.await {
                Ok(result) => result,
                Err(e) => Err(format!("transcript task failed: {}", e)),
            }
        }
        .boxed()
        .shared();

        Self {
            pending: Some(pending),
        }
    }

    /// Wait until the transcript is complete.
    pub async fn wait(&self) -> Result<String> {
        match &self.pending {
            None => Err(ChorusError::ToolExecution(
                "no transcript was provided for this session".to_string(),
            )),
            Some(pending) => pending.clone().await.map_err(ChorusError::ToolExecution),
        }
    }
}
