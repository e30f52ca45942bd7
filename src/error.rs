/// Centralized error types for repoqa-indexer using thiserror
///
/// One enum per concern, folded into [`RepoQaError`] for callers that only need to
/// report the failure.
use thiserror::Error;

/// Main error type for the indexing and ask pipeline
#[derive(Error, Debug)]
pub enum RepoQaError {
    #[error("Indexing error: {0}")]
    Indexing(#[from] IndexingError),

    #[error("Chunking error: {0}")]
    Chunking(#[from] ChunkingError),

    #[error("Retrieval error: {0}")]
    Retrieval(#[from] RetrievalError),

    #[error("Completion error: {0}")]
    Completion(#[from] CompletionError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors raised while walking the tree or writing the chunk store
#[derive(Error, Debug)]
pub enum IndexingError {
    #[error("Directory not found: {0}")]
    DirectoryNotFound(String),

    #[error("Path is not a directory: {0}")]
    NotADirectory(String),

    #[error("Failed to read directory '{dir}': {reason}")]
    WalkFailed { dir: String, reason: String },

    #[error("Failed to read file '{file}': {reason}")]
    FileReadFailed { file: String, reason: String },

    #[error("File '{file}' exceeds maximum size: {size} > {max}")]
    FileTooLarge { file: String, size: u64, max: u64 },

    #[error("Failed to write chunk store '{path}': {reason}")]
    WriteFailed { path: String, reason: String },
}

/// Errors raised while turning one file into chunks
#[derive(Error, Debug)]
pub enum ChunkingError {
    #[error("Failed to parse '{file}': {reason}")]
    ParseFailed { file: String, reason: String },

    #[error("Failed to load grammar for {0}")]
    GrammarUnavailable(String),

    #[error("Chunk extraction panicked for '{0}'")]
    Panicked(String),
}

/// Errors from the external ranking process
#[derive(Error, Debug)]
pub enum RetrievalError {
    #[error("Failed to start ranker '{command}': {reason}")]
    Spawn { command: String, reason: String },

    #[error("Ranker exited with {status}: {stderr}")]
    CommandFailed { status: String, stderr: String },

    #[error("Ranker timed out after {0} seconds")]
    Timeout(u64),

    #[error("Invalid ranker output: {0}")]
    InvalidOutput(String),

    #[error("Invalid ranker output: expected an array of scored chunks, got {0}")]
    NotAnArray(String),
}

/// Errors from the chat-completion collaborator
#[derive(Error, Debug)]
pub enum CompletionError {
    #[error("No completion command configured (set completion.command or REPOQA_COMPLETION_COMMAND)")]
    NotConfigured,

    #[error("Failed to start completion command '{command}': {reason}")]
    Spawn { command: String, reason: String },

    #[error("Completion command exited with {status}: {stderr}")]
    CommandFailed { status: String, stderr: String },

    #[error("Completion timed out after {0} seconds")]
    Timeout(u64),

    #[error("Completion returned an empty response")]
    EmptyResponse,
}

/// Errors related to configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load configuration file: {0}")]
    LoadFailed(String),

    #[error("Failed to parse configuration: {0}")]
    ParseFailed(String),

    #[error("Invalid configuration value for '{key}': {reason}")]
    InvalidValue { key: String, reason: String },

    #[error("Configuration file not found: {0}")]
    FileNotFound(String),
}

/// Errors related to operator input
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Empty {0}")]
    Empty(String),

    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),
}

impl RepoQaError {
    /// Check if this is an operator error (bad input) rather than a system failure
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            RepoQaError::Validation(_) | RepoQaError::Config(ConfigError::InvalidValue { .. })
        )
    }

    /// Check if the failure aborts an indexing run as opposed to a single file
    pub fn is_fatal_for_run(&self) -> bool {
        !matches!(
            self,
            RepoQaError::Chunking(_)
                | RepoQaError::Indexing(IndexingError::FileReadFailed { .. })
                | RepoQaError::Indexing(IndexingError::FileTooLarge { .. })
        )
    }
}

/// Result alias using [`RepoQaError`]
pub type Result<T> = std::result::Result<T, RepoQaError>;
