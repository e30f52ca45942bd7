use crate::config::IndexingConfig;
use crate::error::{ChunkingError, IndexingError, RepoQaError};
use crate::indexer::{ChunkExtractor, ChunkWriter, FileWalker, Lang, PathFilter, detect_language};
use crate::types::{Chunk, IndexResponse};
use futures::TryStreamExt;
use std::any::Any;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::path::Path;
use std::time::Instant;
use tokio::io::AsyncWrite;

/// Index every supported file under `root` into the configured chunk store.
///
/// The store is truncated first. Files that cannot be read or parsed are reported in
/// [`IndexResponse::errors`] and skipped; a directory that cannot be listed aborts the
/// run. Whatever was written before an abort is still flushed.
pub async fn do_index(config: &IndexingConfig, root: &Path) -> Result<IndexResponse, RepoQaError> {
    let start = Instant::now();
    check_root(root).await?;

    tracing::info!(
        "Indexing {} into {}",
        root.display(),
        config.output_path.display()
    );

    let mut writer = ChunkWriter::create(&config.output_path).await?;
    let mut response = IndexResponse {
        output_path: config.output_path.display().to_string(),
        ..Default::default()
    };

    let outcome = index_files(config, root, &mut writer, &mut response).await;
    response.chunks_written = writer.written();
    let closed = writer.finish().await;

    if let Err(e) = outcome {
        tracing::error!("Indexing aborted: {}", e);
        return Err(e);
    }
    closed?;

    response.duration_ms = start.elapsed().as_millis() as u64;
    tracing::info!(
        "Indexed {} files ({} skipped), wrote {} chunks in {}ms",
        response.files_indexed,
        response.files_skipped,
        response.chunks_written,
        response.duration_ms
    );
    if !response.errors.is_empty() {
        tracing::warn!("{} files could not be indexed", response.errors.len());
    }

    Ok(response)
}

/// Reject a missing or non-directory root before the store is truncated
async fn check_root(root: &Path) -> Result<(), IndexingError> {
    match tokio::fs::metadata(root).await {
        Ok(meta) if meta.is_dir() => Ok(()),
        Ok(_) => Err(IndexingError::NotADirectory(root.display().to_string())),
        Err(_) => Err(IndexingError::DirectoryNotFound(root.display().to_string())),
    }
}

async fn index_files<W: AsyncWrite + Unpin>(
    config: &IndexingConfig,
    root: &Path,
    writer: &mut ChunkWriter<W>,
    response: &mut IndexResponse,
) -> Result<(), RepoQaError> {
    let filter = PathFilter::new(config.exclude_patterns.clone(), config.exclude_dirs.clone());
    let extractor = ChunkExtractor::new().with_partial_parse(config.allow_partial_parse);
    let files = FileWalker::new(root).with_filter(filter.clone()).walk();
    futures::pin_mut!(files);

    while let Some(path) = files.try_next().await? {
        if filter.should_skip(&path) {
            tracing::debug!("Skipped by filter: {}", path.display());
            response.files_skipped += 1;
            continue;
        }

        let Some(lang) = detect_language(&path) else {
            tracing::debug!("Unsupported file type: {}", path.display());
            response.files_skipped += 1;
            continue;
        };

        match index_file(&extractor, lang, &path, config.max_file_size).await {
            Ok((chunks, dropped)) => {
                for chunk in &chunks {
                    writer.write_chunk(chunk).await?;
                }
                tracing::debug!("{}: {} chunks", path.display(), chunks.len());
                response.files_indexed += 1;
                response.empty_chunks_dropped += dropped;
            }
            Err(e) if !e.is_fatal_for_run() => {
                tracing::warn!("Skipping {}: {}", path.display(), e);
                response.files_skipped += 1;
                response.errors.push(e.to_string());
            }
            Err(e) => return Err(e),
        }
    }

    Ok(())
}

/// Read one file and extract its chunks along with the count of dropped blank chunks
async fn index_file(
    extractor: &ChunkExtractor,
    lang: Lang,
    path: &Path,
    max_file_size: u64,
) -> Result<(Vec<Chunk>, usize), RepoQaError> {
    let file = path.display().to_string();
    let read_failed = |e: std::io::Error| IndexingError::FileReadFailed {
        file: file.clone(),
        reason: e.to_string(),
    };

    let size = tokio::fs::metadata(path).await.map_err(read_failed)?.len();
    if size > max_file_size {
        return Err(IndexingError::FileTooLarge {
            file: file.clone(),
            size,
            max: max_file_size,
        }
        .into());
    }

    let bytes = tokio::fs::read(path).await.map_err(read_failed)?;
    let source = String::from_utf8_lossy(&bytes);

    // A grammar bug must cost one file, not the run
    match catch_unwind(AssertUnwindSafe(|| {
        extractor.extract_counted(lang, &source, &file)
    })) {
        Ok(result) => Ok(result?),
        Err(payload) => {
            tracing::error!("Extraction panicked for {}: {}", file, panic_message(&*payload));
            Err(ChunkingError::Panicked(file).into())
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("unknown panic")
}

#[cfg(test)]
mod tests;
