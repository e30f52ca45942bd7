//! Newline-delimited JSON chunk store

use crate::error::IndexingError;
use crate::types::Chunk;
use std::path::{Path, PathBuf};
use tokio::fs::{self, File};
use tokio::io::{AsyncWrite, AsyncWriteExt, BufWriter};

/// Appends one JSON record per line to an output stream.
///
/// Buffered output only reaches its destination through [`ChunkWriter::finish`], so
/// callers must finish the writer on every exit path.
pub struct ChunkWriter<W> {
    inner: W,
    target: String,
    written: usize,
}

impl ChunkWriter<BufWriter<File>> {
    /// Create (or truncate) the store at `path`, creating parent directories
    pub async fn create(path: &Path) -> Result<Self, IndexingError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| write_failed(path, &e))?;
        }
        let file = File::create(path).await.map_err(|e| write_failed(path, &e))?;
        Ok(Self::new(BufWriter::new(file), path.display().to_string()))
    }
}

impl<W: AsyncWrite + Unpin> ChunkWriter<W> {
    pub fn new(inner: W, target: impl Into<String>) -> Self {
        Self {
            inner,
            target: target.into(),
            written: 0,
        }
    }

    /// Append one chunk as a single line
    pub async fn write_chunk(&mut self, chunk: &Chunk) -> Result<(), IndexingError> {
        let mut line = serde_json::to_string(chunk).map_err(|e| IndexingError::WriteFailed {
            path: self.target.clone(),
            reason: e.to_string(),
        })?;
        line.push('\n');

        self.inner
            .write_all(line.as_bytes())
            .await
            .map_err(|e| write_failed(Path::new(&self.target), &e))?;
        self.written += 1;
        Ok(())
    }

    /// Number of records written so far
    pub fn written(&self) -> usize {
        self.written
    }

    /// Flush and close the stream, returning the underlying writer
    pub async fn finish(mut self) -> Result<W, IndexingError> {
        self.inner
            .flush()
            .await
            .map_err(|e| write_failed(Path::new(&self.target), &e))?;
        self.inner
            .shutdown()
            .await
            .map_err(|e| write_failed(Path::new(&self.target), &e))?;
        tracing::debug!("Closed chunk store {} ({} records)", self.target, self.written);
        Ok(self.inner)
    }
}

fn write_failed(path: &Path, err: &std::io::Error) -> IndexingError {
    IndexingError::WriteFailed {
        path: path.display().to_string(),
        reason: err.to_string(),
    }
}

/// Default location of the chunk store, relative to the working directory
pub fn default_output_path() -> PathBuf {
    PathBuf::from("data").join("chunked.jsonl")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SourceType;
    use tempfile::TempDir;

    fn chunk(id: usize, code: &str) -> Chunk {
        Chunk {
            id: format!("chunk_{id}"),
            file: "src/a.go".to_string(),
            code: code.to_string(),
            start_line: 1,
            end_line: 3,
            symbol: format!("f{id}"),
            kind: "function_declaration".to_string(),
            language: Some("go".to_string()),
            source_type: Some(SourceType::Ast),
        }
    }

    #[tokio::test]
    async fn test_writes_one_record_per_line() {
        let mut writer = ChunkWriter::new(Vec::new(), "memory");
        writer.write_chunk(&chunk(0, "func a() {\n}")).await.unwrap();
        writer.write_chunk(&chunk(1, "func b() {}")).await.unwrap();
        assert_eq!(writer.written(), 2);

        let bytes = writer.finish().await.unwrap();
        let text = String::from_utf8(bytes).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 2);
        assert!(text.ends_with('\n'));
        let first: Chunk = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(first.code, "func a() {\n}");
        let second: Chunk = serde_json::from_str(lines[1]).unwrap();
        assert_eq!(second.id, "chunk_1");
    }

    #[tokio::test]
    async fn test_create_truncates_previous_store() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("data").join("chunked.jsonl");

        let mut writer = ChunkWriter::create(&path).await.unwrap();
        writer.write_chunk(&chunk(0, "func a() {}")).await.unwrap();
        writer.write_chunk(&chunk(1, "func b() {}")).await.unwrap();
        writer.finish().await.unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap().lines().count(), 2);

        let writer = ChunkWriter::create(&path).await.unwrap();
        writer.finish().await.unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "");
    }

    #[tokio::test]
    async fn test_create_in_unwritable_location_fails() {
        let temp_dir = TempDir::new().unwrap();
        let blocker = temp_dir.path().join("file");
        std::fs::write(&blocker, "x").unwrap();

        let result = ChunkWriter::create(&blocker.join("chunked.jsonl")).await;
        assert!(matches!(result, Err(IndexingError::WriteFailed { .. })));
    }

    #[test]
    fn test_default_output_path() {
        assert_eq!(default_output_path(), PathBuf::from("data/chunked.jsonl"));
    }
}
