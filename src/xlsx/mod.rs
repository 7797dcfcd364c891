//! XLSX (Excel) workbook parser.
//!
//! Reads the sheets of an Office Open XML workbook (.xlsx / .xlsm) into
//! header-keyed [`RawRow`](crate::model::RawRow)s.
//!
//! # Example
//!
//! ```no_run
//! use optidata::xlsx::XlsxParser;
//!
//! let parser = XlsxParser::open("data.xlsx")?;
//! let workbook = parser.parse()?;
//!
//! for sheet in workbook.sheets() {
//!     println!("{}: {} rows", sheet.name, sheet.rows.len());
//! }
//! # Ok::<(), optidata::Error>(())
//! ```

mod parser;
mod shared_strings;

pub use parser::XlsxParser;
pub use shared_strings::SharedStrings;
