use serde::{Deserialize, Serialize};

/// How a chunk was cut out of its file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceType {
    /// One chunk per chunkable syntax node
    Ast,
}

/// One syntactically delimited unit of source code, as persisted in the chunk store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Chunk {
    /// `chunk_<index>`, unique within one file's extraction
    pub id: String,
    /// Path of the source file as produced by the walker
    pub file: String,
    /// Verbatim slice of the original file content
    pub code: String,
    /// 1-based first line
    pub start_line: usize,
    /// 1-based last line (inclusive)
    pub end_line: usize,
    /// Declared name, or `anonymous_<index>`
    pub symbol: String,
    /// Grammar node kind, e.g. `function_declaration`
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_type: Option<SourceType>,
}

impl Chunk {
    /// Numeric part of the id, if it follows the `chunk_<index>` convention
    pub fn index(&self) -> Option<usize> {
        self.id.strip_prefix("chunk_")?.parse().ok()
    }
}

/// A chunk ranked against a query by the external ranker
///
/// The reference ranker serializes Go structs without field tags, so the
/// capitalized key spellings are accepted as well.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredChunk {
    #[serde(alias = "ID")]
    pub id: String,
    #[serde(alias = "File")]
    pub file: String,
    #[serde(alias = "Code")]
    pub code: String,
    #[serde(alias = "Score")]
    pub score: f32,
}

/// Speaker of a chat message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
}

/// A role-tagged message sent to the completion collaborator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

/// Summary of one indexing run
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IndexResponse {
    /// Files whose chunks reached the store, including files with no chunkable nodes
    pub files_indexed: usize,
    /// Files left out of the store: filtered, unsupported, too large, unreadable or
    /// unparseable. The last three also appear in `errors`.
    pub files_skipped: usize,
    /// Records written to the chunk store
    pub chunks_written: usize,
    /// Chunks discarded because their code was blank
    pub empty_chunks_dropped: usize,
    /// Non-fatal per-file diagnostics
    #[serde(default)]
    pub errors: Vec<String>,
    /// Time taken in milliseconds
    pub duration_ms: u64,
    /// Location of the chunk store
    pub output_path: String,
}

/// Answer produced by the ask pipeline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AskResponse {
    /// Chunks the ranker returned, in rank order
    pub chunks: Vec<ScoredChunk>,
    /// Messages sent to the completion collaborator
    pub prompt: Vec<ChatMessage>,
    /// Completion text, absent when only the prompt was requested
    pub answer: Option<String>,
}

#[cfg(test)]
mod tests;
