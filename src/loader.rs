//! One-time loading of the backing workbook.

use crate::error::{Error, Result};
use crate::model::Workbook;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::OnceCell;

/// Loads the workbook file on first use and keeps it for the loader's
/// lifetime.
///
/// Concurrent first calls wait on a single load. A failed load is not
/// retained, so a later call reads the file again.
#[derive(Debug)]
pub struct WorkbookLoader {
    path: PathBuf,
    workbook: OnceCell<Arc<Workbook>>,
}

impl WorkbookLoader {
    /// Create a loader for the given spreadsheet path. Nothing is read yet.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            workbook: OnceCell::new(),
        }
    }

    /// Create a loader around an already parsed workbook.
    pub fn preloaded(path: impl Into<PathBuf>, workbook: Workbook) -> Self {
        Self {
            path: path.into(),
            workbook: OnceCell::new_with(Some(Arc::new(workbook))),
        }
    }

    /// Path of the backing spreadsheet.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether the workbook has been loaded.
    pub fn is_loaded(&self) -> bool {
        self.workbook.initialized()
    }

    /// Get the workbook, reading and parsing the file on first call.
    ///
    /// Parsing runs on the blocking thread pool. Failures are reported as
    /// [`Error::FileRead`].
    pub async fn workbook(&self) -> Result<Arc<Workbook>> {
        self.workbook
            .get_or_try_init(|| self.load())
            .await
            .map(Arc::clone)
    }

    async fn load(&self) -> Result<Arc<Workbook>> {
        let path = self.path.clone();
        tracing::debug!(path = %path.display(), "loading workbook");

        let workbook = tokio::task::spawn_blocking(move || crate::open_workbook(&path))
            .await
            .map_err(|e| Error::Background(e.to_string()))?
            .map_err(|e| Error::file_read(&self.path, e))?;

        tracing::info!(
            path = %self.path.display(),
            sheets = workbook.len(),
            "workbook loaded"
        );
        Ok(Arc::new(workbook))
    }
}
