//! Prompt assembly and the chat-completion collaborator

mod prompt;

pub use prompt::{DEFAULT_SYSTEM_PROMPT, build_prompt};

use crate::config::CompletionConfig;
use crate::error::CompletionError;
use crate::process::{RunFailure, run_with_timeout, stderr_summary};
use crate::types::ChatMessage;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

pub type SharedCompletion = Arc<dyn ChatCompletion>;

/// Turns a list of chat messages into an answer
#[async_trait]
pub trait ChatCompletion: Send + Sync {
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String, CompletionError>;
}

/// Completion backed by an executable.
///
/// The messages are written to its stdin as one JSON array; everything it prints on
/// stdout is the answer.
#[derive(Debug, Clone)]
pub struct CommandCompletion {
    command: String,
    args: Vec<String>,
    timeout: Duration,
}

impl CommandCompletion {
    pub fn new(command: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            command: command.into(),
            args,
            timeout: Duration::from_secs(120),
        }
    }

    /// `None` when no command is configured
    pub fn from_config(config: &CompletionConfig) -> Option<Self> {
        config.command.as_ref().map(|command| {
            Self::new(command.clone(), config.args.clone())
                .with_timeout(Duration::from_secs(config.timeout_secs))
        })
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn shared(self) -> SharedCompletion {
        Arc::new(self)
    }
}

#[async_trait]
impl ChatCompletion for CommandCompletion {
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String, CompletionError> {
        let input = serde_json::to_vec(messages).map_err(|e| CompletionError::Spawn {
            command: self.command.clone(),
            reason: format!("failed to encode messages: {}", e),
        })?;

        tracing::debug!("Running completion command: {}", self.command);
        let output = run_with_timeout(&self.command, &self.args, Some(input), self.timeout)
            .await
            .map_err(|failure| match failure {
                RunFailure::Spawn(e) | RunFailure::Wait(e) => CompletionError::Spawn {
                    command: self.command.clone(),
                    reason: e.to_string(),
                },
                RunFailure::Timeout => CompletionError::Timeout(self.timeout.as_secs()),
            })?;

        if !output.status.success() {
            return Err(CompletionError::CommandFailed {
                status: output.status.to_string(),
                stderr: stderr_summary(&output),
            });
        }

        let answer = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if answer.is_empty() {
            return Err(CompletionError::EmptyResponse);
        }
        Ok(answer)
    }
}
