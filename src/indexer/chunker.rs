use super::ast_parser::{AstNode, AstParser};
use super::language::Lang;
use crate::error::ChunkingError;
use crate::types::{Chunk, SourceType};

/// Turns one file's source text into chunk records
#[derive(Debug, Clone, Default)]
pub struct ChunkExtractor {
    allow_partial_parse: bool,
}

impl ChunkExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep chunkable nodes from trees that contain syntax errors
    pub fn with_partial_parse(mut self, allow: bool) -> Self {
        self.allow_partial_parse = allow;
        self
    }

    /// Extract chunks from `source`, the decoded content of the file at `path`.
    ///
    /// A file without chunkable nodes yields an empty vector. Chunks whose code is
    /// blank are dropped, so ids may skip numbers but always increase.
    pub fn extract(&self, lang: Lang, source: &str, path: &str) -> Result<Vec<Chunk>, ChunkingError> {
        self.extract_counted(lang, source, path).map(|(chunks, _)| chunks)
    }

    /// Like [`ChunkExtractor::extract`], also returning how many blank chunks were dropped
    pub fn extract_counted(
        &self,
        lang: Lang,
        source: &str,
        path: &str,
    ) -> Result<(Vec<Chunk>, usize), ChunkingError> {
        let cleaned = sanitize(source, lang);
        debug_assert_eq!(cleaned.len(), source.len());

        tracing::debug!("Parsing {} as {} ({} bytes)", path, lang, source.len());

        let mut parser = AstParser::new(lang)
            .map_err(|_| ChunkingError::GrammarUnavailable(lang.to_string()))?
            .with_partial_parse(self.allow_partial_parse);

        let nodes = parser.parse(&cleaned).map_err(|e| ChunkingError::ParseFailed {
            file: path.to_string(),
            reason: format!("{:#}", e),
        })?;

        if nodes.is_empty() {
            tracing::info!("No chunkable nodes found in {}", path);
            return Ok((Vec::new(), 0));
        }

        let chunks: Vec<Chunk> = nodes
            .iter()
            .enumerate()
            .filter_map(|(index, node)| to_chunk(index, node, source, lang, path))
            .collect();
        let dropped = nodes.len() - chunks.len();

        Ok((chunks, dropped))
    }
}

/// Build the record for one node, or `None` when its code is blank.
///
/// Offsets come from the sanitized text, which has the same length and line breaks
/// as `source`, so they slice the original verbatim.
fn to_chunk(index: usize, node: &AstNode, source: &str, lang: Lang, path: &str) -> Option<Chunk> {
    let code = source.get(node.start_byte..node.end_byte)?;
    if code.trim().is_empty() {
        tracing::debug!("Skipped empty chunk {} from {}", index, path);
        return None;
    }

    let symbol = node
        .symbol_range
        .and_then(|(start, end)| source.get(start..end))
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(String::from)
        .unwrap_or_else(|| format!("anonymous_{}", index));

    Some(Chunk {
        id: format!("chunk_{}", index),
        file: path.to_string(),
        code: code.to_string(),
        start_line: node.start_line,
        end_line: node.end_line,
        symbol,
        kind: node.kind.clone(),
        language: Some(lang.id().to_string()),
        source_type: Some(SourceType::Ast),
    })
}

/// Prepare source text for the parser without moving any byte or line.
///
/// A leading interpreter directive is blanked with spaces when the grammar rejects it
/// (`#![` is a Rust inner attribute and stays). Line terminators become `\n`: the CR of
/// a CRLF pair turns into a space and a lone CR into a newline.
pub fn sanitize(source: &str, lang: Lang) -> String {
    let mut cleaned = String::with_capacity(source.len());
    let mut rest = source;

    if lang.blanks_interpreter_line() && source.starts_with("#!") && !source.starts_with("#![") {
        let line_end = source.find('\n').unwrap_or(source.len());
        cleaned.extend(std::iter::repeat_n(' ', line_end));
        rest = &source[line_end..];
    }

    let mut chars = rest.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\r' if chars.peek() == Some(&'\n') => cleaned.push(' '),
            '\r' => cleaned.push('\n'),
            c => cleaned.push(c),
        }
    }

    cleaned
}
