//! Lazy depth-first directory traversal
//!
//! The walk is a [`Stream`] over a stack of open directory handles. Each poll reads at
//! most one directory entry ahead of the consumer, and dropping the stream closes every
//! handle still on the stack.

use super::filter::PathFilter;
use crate::error::IndexingError;
use futures::stream::{self, Stream};
use std::path::{Path, PathBuf};
use tokio::fs::{self, ReadDir};

pub struct FileWalker {
    pub(crate) root: PathBuf,
    pub(crate) filter: PathFilter,
}

impl FileWalker {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            filter: PathFilter::default(),
        }
    }

    /// Use a filter with extra exclusions instead of the built-in policy
    pub fn with_filter(mut self, filter: PathFilter) -> Self {
        self.filter = filter;
        self
    }

    /// Walk the tree under the root, yielding every regular file not pruned by the filter.
    ///
    /// Entries come in directory listing order. A directory that can not be opened or
    /// read, the root included, yields one error and ends the stream.
    pub fn walk(&self) -> impl Stream<Item = Result<PathBuf, IndexingError>> + Send + 'static {
        let state = WalkState {
            pending_root: Some(self.root.clone()),
            stack: Vec::new(),
            filter: self.filter.clone(),
        };

        stream::try_unfold(state, |mut state| async move {
            let next = state.next_file().await?;
            Ok(next.map(|path| (path, state)))
        })
    }
}

struct WalkState {
    pending_root: Option<PathBuf>,
    stack: Vec<(PathBuf, ReadDir)>,
    filter: PathFilter,
}

impl WalkState {
    async fn next_file(&mut self) -> Result<Option<PathBuf>, IndexingError> {
        if let Some(root) = self.pending_root.take() {
            let entries = open_dir(&root).await?;
            self.stack.push((root, entries));
        }

        while let Some((dir, entries)) = self.stack.last_mut() {
            let entry = entries
                .next_entry()
                .await
                .map_err(|e| walk_failed(dir.as_path(), &e))?;

            let Some(entry) = entry else {
                self.stack.pop();
                continue;
            };

            let path = entry.path();
            let file_type = entry.file_type().await.map_err(|e| walk_failed(&path, &e))?;

            if file_type.is_dir() {
                if self.filter.should_skip_dir(&path) {
                    tracing::debug!("Skipping directory: {}", path.display());
                    continue;
                }
                let child = open_dir(&path).await?;
                self.stack.push((path, child));
            } else if file_type.is_file() {
                return Ok(Some(path));
            }
        }

        Ok(None)
    }
}

async fn open_dir(dir: &Path) -> Result<ReadDir, IndexingError> {
    fs::read_dir(dir).await.map_err(|e| walk_failed(dir, &e))
}

fn walk_failed(dir: &Path, err: &std::io::Error) -> IndexingError {
    IndexingError::WalkFailed {
        dir: dir.display().to_string(),
        reason: err.to_string(),
    }
}
