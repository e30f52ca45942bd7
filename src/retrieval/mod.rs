//! Top-K chunk retrieval through the external ranking process
//!
//! The ranker is a black box: it receives the query and a result limit on its command
//! line and must print one JSON array of scored chunks on stdout.

use crate::config::RetrievalConfig;
use crate::error::RetrievalError;
use crate::process::{RunFailure, run_with_timeout, stderr_summary};
use crate::types::ScoredChunk;
use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;

/// Source of chunks ranked against a query
#[async_trait]
pub trait Retriever: Send + Sync {
    /// Return at most `k` chunks, best first
    async fn top_k(&self, query: &str, k: usize) -> Result<Vec<ScoredChunk>, RetrievalError>;
}

/// Retriever backed by a ranker executable
#[derive(Debug, Clone)]
pub struct CommandRetriever {
    command: String,
    args: Vec<String>,
    timeout: Duration,
}

impl CommandRetriever {
    /// `args` may contain `{query}` and `{top_k}` placeholders
    pub fn new(command: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            command: command.into(),
            args,
            timeout: Duration::from_secs(60),
        }
    }

    pub fn from_config(config: &RetrievalConfig) -> Self {
        Self::new(config.command.clone(), config.args.clone())
            .with_timeout(Duration::from_secs(config.timeout_secs))
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn render_args(&self, query: &str, k: usize) -> Vec<String> {
        let k = k.to_string();
        self.args
            .iter()
            .map(|arg| arg.replace("{top_k}", &k).replace("{query}", query))
            .collect()
    }
}

#[async_trait]
impl Retriever for CommandRetriever {
    async fn top_k(&self, query: &str, k: usize) -> Result<Vec<ScoredChunk>, RetrievalError> {
        let args = self.render_args(query, k);
        tracing::debug!("Running ranker: {} {:?}", self.command, args);

        let output = run_with_timeout(&self.command, &args, None, self.timeout)
            .await
            .map_err(|failure| match failure {
                RunFailure::Spawn(e) | RunFailure::Wait(e) => RetrievalError::Spawn {
                    command: self.command.clone(),
                    reason: e.to_string(),
                },
                RunFailure::Timeout => RetrievalError::Timeout(self.timeout.as_secs()),
            })?;

        if !output.status.success() {
            return Err(RetrievalError::CommandFailed {
                status: output.status.to_string(),
                stderr: stderr_summary(&output),
            });
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let mut chunks = parse_ranker_output(&stdout)?;
        chunks.truncate(k);
        Ok(chunks)
    }
}

/// Parse the ranker's stdout, which must be exactly one JSON array of scored chunks
pub fn parse_ranker_output(stdout: &str) -> Result<Vec<ScoredChunk>, RetrievalError> {
    let value: Value = serde_json::from_str(stdout.trim())
        .map_err(|e| RetrievalError::InvalidOutput(e.to_string()))?;

    match value {
        Value::Array(_) => {
            serde_json::from_value(value).map_err(|e| RetrievalError::InvalidOutput(e.to_string()))
        }
        other => Err(RetrievalError::NotAnArray(json_kind(&other).to_string())),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
