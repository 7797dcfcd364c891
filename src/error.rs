//! Error types for the optidata library.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for optidata operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while loading or serving workbook data.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error during file operations.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The bytes are not a spreadsheet package.
    #[error("Unknown file format")]
    UnknownFormat,

    /// Error reading ZIP archive.
    #[error("ZIP archive error: {0}")]
    ZipArchive(String),

    /// Error parsing XML content.
    #[error("XML parse error: {0}")]
    XmlParse(String),

    /// Invalid or malformed data in the workbook.
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// A required package part is missing.
    #[error("Missing component: {0}")]
    MissingComponent(String),

    /// The backing spreadsheet could not be read or parsed.
    #[error("Failed to read workbook {}: {source}", .path.display())]
    FileRead {
        path: PathBuf,
        #[source]
        source: Box<Error>,
    },

    /// The requested sheet does not exist in the workbook.
    #[error("Sheet not found: {0}")]
    SheetNotFound(String),

    /// The workbook has no sheets, so there is no default sheet.
    #[error("Workbook contains no sheets")]
    EmptyWorkbook,

    /// A blocking task panicked or was cancelled.
    #[error("Background task failed: {0}")]
    Background(String),
}

impl Error {
    /// Wrap a load failure with the path it came from.
    pub fn file_read(path: impl Into<PathBuf>, source: Error) -> Self {
        Error::FileRead {
            path: path.into(),
            source: Box::new(source),
        }
    }

    /// Whether this error means the requested sheet was not available.
    pub fn is_sheet_not_found(&self) -> bool {
        matches!(self, Error::SheetNotFound(_) | Error::EmptyWorkbook)
    }
}

impl From<zip::result::ZipError> for Error {
    fn from(err: zip::result::ZipError) -> Self {
        Error::ZipArchive(err.to_string())
    }
}

impl From<quick_xml::Error> for Error {
    fn from(err: quick_xml::Error) -> Self {
        Error::XmlParse(err.to_string())
    }
}
