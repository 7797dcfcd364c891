//! In-memory workbook model and the normalized record schema.
//!
//! Parsers convert package XML into [`Workbook`]s made of [`RawRow`]s;
//! the normalizer turns raw rows into [`MaterialRecord`]s.

mod cell;
mod record;
mod sheet;

pub use cell::*;
pub use record::*;
pub use sheet::*;
