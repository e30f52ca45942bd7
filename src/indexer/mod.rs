//! Code indexing: file walking, filtering, language detection and AST chunking
//!
//! Walks a directory, keeps the files the path policy allows, parses each one with
//! its tree-sitter grammar and writes one record per chunkable node.

mod ast_parser;
mod chunker;
mod file_walker;
pub mod filter;
mod language;
mod writer;

pub use ast_parser::{AstNode, AstParser};
pub use chunker::{ChunkExtractor, sanitize};
pub use file_walker::FileWalker;
pub use filter::{PathFilter, should_skip, should_skip_dir};
pub use language::{Lang, detect_language};
pub use writer::{ChunkWriter, default_output_path};
