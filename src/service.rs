//! Data access facade used by the request layer.

use crate::cache::{SheetCache, SheetRecords};
use crate::config::ServiceConfig;
use crate::error::{Error, Result};
use crate::loader::WorkbookLoader;
use crate::normalize::SheetNormalizer;

/// Entry points for listing sheets and loading normalized sheet data.
///
/// Owns the workbook loader, the sheet cache and the normalizer. Create one
/// per process (or per test) and share it behind an `Arc`.
///
/// # Example
///
/// ```no_run
/// use optidata::{DataService, WorkbookLoader};
///
/// # async fn run() -> optidata::Result<()> {
/// let service = DataService::new(WorkbookLoader::new("data.xlsx"));
///
/// for name in service.list_sheet_names().await? {
///     let records = service.load_sheet(Some(&name)).await?;
///     println!("{name}: {} records", records.len());
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct DataService {
    loader: WorkbookLoader,
    cache: SheetCache,
    normalizer: SheetNormalizer,
}

impl DataService {
    /// Create a service with an empty cache and the standard normalizer.
    pub fn new(loader: WorkbookLoader) -> Self {
        Self {
            loader,
            cache: SheetCache::new(),
            normalizer: SheetNormalizer::new(),
        }
    }

    /// Create a service reading the configured spreadsheet.
    pub fn from_config(config: &ServiceConfig) -> Self {
        Self::new(WorkbookLoader::new(config.data_file.clone()))
    }

    /// Replace the normalizer.
    pub fn with_normalizer(mut self, normalizer: SheetNormalizer) -> Self {
        self.normalizer = normalizer;
        self
    }

    /// The workbook loader.
    pub fn loader(&self) -> &WorkbookLoader {
        &self.loader
    }

    /// The sheet cache.
    pub fn cache(&self) -> &SheetCache {
        &self.cache
    }

    /// Sheet names in the order the workbook declares them.
    pub async fn list_sheet_names(&self) -> Result<Vec<String>> {
        Ok(self.loader.workbook().await?.sheet_names())
    }

    /// Normalized records of a sheet.
    ///
    /// `None` or an empty name selects the first sheet. Unknown names fail
    /// with [`Error::SheetNotFound`] and leave the cache untouched.
    pub async fn load_sheet(&self, name: Option<&str>) -> Result<SheetRecords> {
        let workbook = self.loader.workbook().await?;

        let sheet = match name.filter(|n| !n.is_empty()) {
            Some(name) => workbook
                .sheet(name)
                .ok_or_else(|| Error::SheetNotFound(name.to_string()))?,
            None => workbook.first_sheet().ok_or(Error::EmptyWorkbook)?,
        };

        self.cache
            .get_or_try_insert_with(&sheet.name, || Ok(self.normalizer.normalize(&sheet.rows)))
            .await
    }
}
