//! Core library client for repoqa-indexer
//!
//! This module provides the main client interface for using the indexer and the
//! question-answering pipeline as a library.

pub mod indexing;

use crate::completion::{CommandCompletion, SharedCompletion, build_prompt};
use crate::config::Config;
use crate::error::{CompletionError, RepoQaError, ValidationError};
use crate::retrieval::{CommandRetriever, Retriever};
use crate::types::{AskResponse, IndexResponse};
use std::path::Path;
use std::sync::Arc;

/// Main client for indexing a repository and asking questions about it
///
/// # Example
///
/// ```no_run
/// use repoqa_indexer::{Config, RepoQaClient};
/// use std::path::Path;
///
/// #[tokio::main]
/// async fn main() -> anyhow::Result<()> {
///     let client = RepoQaClient::new(Config::new()?);
///
///     let response = client.index_repository(Path::new("./my-repo")).await?;
///     println!("Wrote {} chunks", response.chunks_written);
///
///     let answer = client.ask("where is the HTTP server started", None, false).await?;
///     println!("{}", answer.answer.unwrap_or_default());
///     Ok(())
/// }
/// ```
#[derive(Clone)]
pub struct RepoQaClient {
    pub(crate) config: Arc<Config>,
    pub(crate) retriever: Arc<dyn Retriever>,
    pub(crate) completion: Option<SharedCompletion>,
}

impl RepoQaClient {
    /// Create a client whose collaborators are the commands named in `config`
    pub fn new(config: Config) -> Self {
        let retriever = Arc::new(CommandRetriever::from_config(&config.retrieval));
        let completion = CommandCompletion::from_config(&config.completion).map(CommandCompletion::shared);
        Self::with_collaborators(config, retriever, completion)
    }

    /// Create a client with explicit ranking and completion collaborators
    pub fn with_collaborators(
        config: Config,
        retriever: Arc<dyn Retriever>,
        completion: Option<SharedCompletion>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            retriever,
            completion,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Rebuild the chunk store from the files under `root`
    pub async fn index_repository(&self, root: &Path) -> Result<IndexResponse, RepoQaError> {
        indexing::do_index(&self.config.indexing, root).await
    }

    /// Retrieve the chunks most relevant to `query` and answer from them.
    ///
    /// `top_k` defaults to the configured value. With `prompt_only` the completion
    /// collaborator is not called and the answer is `None`.
    pub async fn ask(
        &self,
        query: &str,
        top_k: Option<usize>,
        prompt_only: bool,
    ) -> Result<AskResponse, RepoQaError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(ValidationError::Empty("query".to_string()).into());
        }

        let k = top_k.unwrap_or(self.config.retrieval.top_k);
        if k == 0 {
            return Err(ValidationError::InvalidValue(
                "top".to_string(),
                "must be greater than 0".to_string(),
            )
            .into());
        }

        // Fail before ranking when there is nobody to answer
        let completion = match (&self.completion, prompt_only) {
            (_, true) => None,
            (Some(completion), false) => Some(completion),
            (None, false) => return Err(CompletionError::NotConfigured.into()),
        };

        tracing::info!("Retrieving top {} chunks for: {}", k, query);
        let chunks = self.retriever.top_k(query, k).await?;
        if chunks.is_empty() {
            tracing::warn!("Ranker returned no chunks for: {}", query);
        }

        let prompt = build_prompt(&self.config.completion.system_prompt, query, &chunks);

        let answer = match completion {
            Some(completion) => Some(completion.complete(&prompt).await?),
            None => None,
        };

        Ok(AskResponse {
            chunks,
            prompt,
            answer,
        })
    }
}
