//! # optidata
//!
//! Material optical properties from Excel workbooks, normalized into a
//! fixed record schema and served over a small JSON API.
//!
//! Workbooks in the wild label the same quantity differently (`Wavelength`,
//! `λ`, `lambda (nm)`) and mix numbers with unit-suffixed text (`"600nm"`).
//! This crate reads the workbook once, maps every row onto a
//! [`MaterialRecord`] and caches the result per sheet.
//!
//! ## Quick Start
//!
//! ```no_run
//! use optidata::{open_workbook, normalize::normalize};
//!
//! let workbook = open_workbook("data.xlsx")?;
//! for sheet in workbook.sheets() {
//!     let records = normalize(&sheet.rows);
//!     println!("{}: {} records", sheet.name, records.len());
//! }
//! # Ok::<(), optidata::Error>(())
//! ```
//!
//! ## Serving
//!
//! ```no_run
//! use std::sync::Arc;
//! use optidata::{DataService, ServiceConfig};
//!
//! # async fn run() -> std::io::Result<()> {
//! let config = ServiceConfig::default();
//! let service = Arc::new(DataService::from_config(&config));
//! let app = optidata::api::router(service, &config.static_file);
//!
//! let listener = tokio::net::TcpListener::bind(config.socket_addr()).await?;
//! axum::serve(listener, app).await
//! # }
//! ```
//!
//! ## Features
//!
//! - `server` (default): axum router in [`api`]

pub mod cache;
pub mod config;
pub mod container;
pub mod detect;
pub mod error;
pub mod loader;
pub mod model;
pub mod normalize;
pub mod service;
pub mod xlsx;

#[cfg(feature = "server")]
pub mod api;

// Re-exports
pub use cache::{SheetCache, SheetRecords};
pub use config::ServiceConfig;
pub use container::SpreadsheetPackage;
pub use detect::{detect_format_from_bytes, SpreadsheetFormat};
pub use error::{Error, Result};
pub use loader::WorkbookLoader;
pub use model::{CellValue, MaterialRecord, NumericField, RawRow, Sheet, Workbook};
pub use normalize::SheetNormalizer;
pub use service::DataService;

use std::path::Path;

/// Read and parse a workbook file.
///
/// # Example
///
/// ```no_run
/// let workbook = optidata::open_workbook("data.xlsx")?;
/// println!("Sheets: {:?}", workbook.sheet_names());
/// # Ok::<(), optidata::Error>(())
/// ```
pub fn open_workbook(path: impl AsRef<Path>) -> Result<Workbook> {
    xlsx::XlsxParser::open(path)?.parse()
}

/// Parse a workbook from bytes.
pub fn parse_workbook_bytes(data: &[u8]) -> Result<Workbook> {
    xlsx::XlsxParser::from_bytes(data.to_vec())?.parse()
}
