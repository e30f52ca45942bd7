/// Configuration system for repoqa-indexer
///
/// Supports loading from multiple sources with priority:
/// CLI args > Environment variables > Config file > Defaults
use crate::error::{ConfigError, RepoQaError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Indexing configuration
    #[serde(default)]
    pub indexing: IndexingConfig,

    /// Ranking collaborator configuration
    #[serde(default)]
    pub retrieval: RetrievalConfig,

    /// Completion collaborator configuration
    #[serde(default)]
    pub completion: CompletionConfig,
}

/// Indexing configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexingConfig {
    /// Chunk store written by each indexing run
    #[serde(default = "default_output_path")]
    pub output_path: PathBuf,

    /// Maximum file size to index (in bytes)
    #[serde(default = "default_max_file_size")]
    pub max_file_size: u64,

    /// Extra path substrings that exclude a file
    #[serde(default)]
    pub exclude_patterns: Vec<String>,

    /// Extra directory names whose subtree is skipped
    #[serde(default)]
    pub exclude_dirs: Vec<String>,

    /// Keep chunks from files with syntax errors instead of skipping the file
    #[serde(default)]
    pub allow_partial_parse: bool,
}

/// Ranking collaborator configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalConfig {
    /// Ranker executable
    #[serde(default = "default_ranker_command")]
    pub command: String,

    /// Arguments; `{query}` and `{top_k}` are substituted
    #[serde(default = "default_ranker_args")]
    pub args: Vec<String>,

    /// Number of chunks to retrieve
    #[serde(default = "default_top_k")]
    pub top_k: usize,

    /// Timeout in seconds for one ranker invocation
    #[serde(default = "default_retrieval_timeout")]
    pub timeout_secs: u64,
}

/// Completion collaborator configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionConfig {
    /// Executable that reads chat messages as JSON on stdin and prints the answer
    #[serde(default)]
    pub command: Option<String>,

    #[serde(default)]
    pub args: Vec<String>,

    /// Timeout in seconds for one completion
    #[serde(default = "default_completion_timeout")]
    pub timeout_secs: u64,

    /// System instructions sent ahead of the question
    #[serde(default = "default_system_prompt")]
    pub system_prompt: String,
}

fn default_output_path() -> PathBuf {
    crate::indexer::default_output_path()
}

fn default_max_file_size() -> u64 {
    1_048_576 // 1 MB
}

fn default_ranker_command() -> String {
    "./repoqa".to_string()
}

fn default_ranker_args() -> Vec<String> {
    ["query", "--json", "--top", "{top_k}", "{query}"]
        .into_iter()
        .map(String::from)
        .collect()
}

fn default_top_k() -> usize {
    3
}

fn default_retrieval_timeout() -> u64 {
    60
}

fn default_completion_timeout() -> u64 {
    120
}

fn default_system_prompt() -> String {
    crate::completion::DEFAULT_SYSTEM_PROMPT.to_string()
}

impl Default for IndexingConfig {
    fn default() -> Self {
        Self {
            output_path: default_output_path(),
            max_file_size: default_max_file_size(),
            exclude_patterns: Vec::new(),
            exclude_dirs: Vec::new(),
            allow_partial_parse: false,
        }
    }
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            command: default_ranker_command(),
            args: default_ranker_args(),
            top_k: default_top_k(),
            timeout_secs: default_retrieval_timeout(),
        }
    }
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            command: None,
            args: Vec::new(),
            timeout_secs: default_completion_timeout(),
            system_prompt: default_system_prompt(),
        }
    }
}

impl Config {
    /// Load configuration from file
    pub fn from_file(path: &Path) -> Result<Self, RepoQaError> {
        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.display().to_string()).into());
        }

        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::LoadFailed(format!("Failed to read config file: {}", e)))?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| ConfigError::ParseFailed(format!("Invalid TOML: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from default location or fall back to defaults
    pub fn load_or_default() -> Result<Self, RepoQaError> {
        let config_path = crate::paths::default_config_path();

        if config_path.exists() {
            tracing::info!("Loading config from: {}", config_path.display());
            Self::from_file(&config_path)
        } else {
            tracing::debug!("No config file found, using defaults");
            Ok(Self::default())
        }
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), RepoQaError> {
        if self.indexing.output_path.as_os_str().is_empty() {
            return Err(invalid("indexing.output_path", "must not be empty"));
        }

        if self.indexing.max_file_size == 0 {
            return Err(invalid("indexing.max_file_size", "must be greater than 0"));
        }

        if self.retrieval.command.trim().is_empty() {
            return Err(invalid("retrieval.command", "must not be empty"));
        }

        if self.retrieval.top_k == 0 {
            return Err(invalid("retrieval.top_k", "must be greater than 0"));
        }

        if self.retrieval.timeout_secs == 0 {
            return Err(invalid("retrieval.timeout_secs", "must be greater than 0"));
        }

        if self.completion.timeout_secs == 0 {
            return Err(invalid("completion.timeout_secs", "must be greater than 0"));
        }

        if self
            .completion
            .command
            .as_deref()
            .is_some_and(|c| c.trim().is_empty())
        {
            return Err(invalid("completion.command", "must not be empty when set"));
        }

        Ok(())
    }

    /// Apply environment variable overrides
    pub fn apply_env_overrides(&mut self) {
        if let Ok(path) = std::env::var("REPOQA_OUTPUT_PATH") {
            self.indexing.output_path = PathBuf::from(path);
        }

        if let Ok(size) = std::env::var("REPOQA_MAX_FILE_SIZE")
            && let Ok(size) = size.parse()
        {
            self.indexing.max_file_size = size;
        }

        if let Ok(command) = std::env::var("REPOQA_RANKER_COMMAND") {
            self.retrieval.command = command;
        }

        if let Ok(top_k) = std::env::var("REPOQA_TOP_K")
            && let Ok(top_k) = top_k.parse()
        {
            self.retrieval.top_k = top_k;
        }

        if let Ok(command) = std::env::var("REPOQA_COMPLETION_COMMAND") {
            self.completion.command = Some(command);
        }
    }

    /// Load from `path` (or the default location), then apply environment overrides
    pub fn load(path: Option<&Path>) -> Result<Self, RepoQaError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::load_or_default()?,
        };
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Create a new Config with defaults and environment overrides
    pub fn new() -> Result<Self, RepoQaError> {
        Self::load(None)
    }
}

fn invalid(key: &str, reason: &str) -> RepoQaError {
    ConfigError::InvalidValue {
        key: key.to_string(),
        reason: reason.to_string(),
    }
    .into()
}
