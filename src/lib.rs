//! # RepoQA Indexer - Syntax-aware chunking and question answering over a repository
//!
//! Splits a source tree into syntactic units with tree-sitter, stores them as
//! line-delimited JSON, and answers natural-language questions by handing the best
//! matching chunks to a chat-completion collaborator.
//!
//! ## Overview
//!
//! The indexer walks a directory, drops paths the exclusion policy rejects, parses each
//! remaining file with its grammar and writes one record per function, method, class or
//! comparable declaration. Ranking is delegated to an external executable that reads
//! the chunk store; answering is delegated to an external completion command.
//!
//! ## Supported Languages
//!
//! Go, JavaScript, TypeScript (including TSX), Python and Rust.
//!
//! ## Architecture
//!
//! ```text
//!  repo/ ──► FileWalker ──► PathFilter ──► detect_language
//!                                              │
//!                                              ▼
//!  data/chunked.jsonl ◄── ChunkWriter ◄── ChunkExtractor (tree-sitter)
//!          │
//!          ▼
//!  ranker process ──► ScoredChunk[] ──► build_prompt ──► completion command
//! ```
//!
//! ## Modules
//!
//! - [`indexer`]: File walking, filtering, language detection and AST chunking
//! - [`client`]: Indexing pipeline and the ask flow
//! - [`retrieval`]: Ranking collaborator contract and its subprocess implementation
//! - [`completion`]: Prompt assembly and the completion collaborator
//! - [`config`]: Configuration management with environment variable support
//! - [`types`]: Chunk records and pipeline responses
//! - [`error`]: Error types and result aliases
//! - [`paths`]: Platform configuration paths
//!
//! ## Usage Example
//!
//! ```no_run
//! use repoqa_indexer::{Config, RepoQaClient};
//! use std::path::Path;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let client = RepoQaClient::new(Config::new()?);
//!     let response = client.index_repository(Path::new(".")).await?;
//!     println!("{} chunks", response.chunks_written);
//!     Ok(())
//! }
//! ```

/// Indexing pipeline and ask flow
pub mod client;

/// Prompt assembly and chat completion
pub mod completion;

/// Configuration management with environment variable overrides
pub mod config;

/// Error types and utilities
pub mod error;

/// File walking, code chunking, and AST parsing
pub mod indexer;

/// Platform configuration paths
pub mod paths;

mod process;

/// Top-K retrieval through the external ranker
pub mod retrieval;

/// Chunk records, chat messages and pipeline responses
pub mod types;

pub use client::RepoQaClient;
pub use config::Config;
pub use error::{RepoQaError, Result};
