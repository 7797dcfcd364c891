//! Mapping of loosely structured sheet rows onto [`MaterialRecord`]s.
//!
//! Column labels differ between files (`Wavelength`, `λ`, `lambda (nm)`,
//! ...), and values mix numbers with unit-suffixed text. The normalizer
//! resolves each output field through [`FieldRules`] and coerces values with
//! [`coerce_number`].
//!
//! # Example
//!
//! ```
//! use optidata::model::RawRow;
//! use optidata::normalize::SheetNormalizer;
//!
//! let row = RawRow::new()
//!     .with("Material", "Gold")
//!     .with("Wavelength", "600nm")
//!     .with("n", 0.2);
//!
//! let records = SheetNormalizer::new().normalize(&[row]);
//! assert_eq!(records[0].material, "Gold");
//! assert_eq!(records[0].wavelength, Some(600.0));
//! assert_eq!(records[0].k, None);
//! ```

mod number;
mod rules;

pub use number::{coerce_number, parse_number_text};
pub use rules::{ColumnRule, FieldRules, Matcher};

use crate::model::{MaterialRecord, RawRow, UNKNOWN_MATERIAL};

/// Converts raw rows into material records. Pure; holds only the rules.
#[derive(Debug, Clone, Default)]
pub struct SheetNormalizer {
    rules: FieldRules,
}

impl SheetNormalizer {
    /// Create a normalizer with the standard column rules.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a normalizer with custom column rules.
    pub fn with_rules(rules: FieldRules) -> Self {
        Self { rules }
    }

    /// The column rules in use.
    pub fn rules(&self) -> &FieldRules {
        &self.rules
    }

    /// Normalize every row, preserving order and count.
    pub fn normalize(&self, rows: &[RawRow]) -> Vec<MaterialRecord> {
        rows.iter().map(|row| self.normalize_row(row)).collect()
    }

    /// Normalize one row.
    pub fn normalize_row(&self, row: &RawRow) -> MaterialRecord {
        let material = self
            .rules
            .material()
            .resolve(row)
            .map(|value| value.to_string())
            .unwrap_or_else(|| UNKNOWN_MATERIAL.to_string());

        let mut record = MaterialRecord::new(material);
        for (field, rule) in self.rules.numeric_rules() {
            *record.number_mut(field) = coerce_number(rule.resolve(row));
        }
        record
    }
}

/// Normalize rows with the standard column rules.
pub fn normalize(rows: &[RawRow]) -> Vec<MaterialRecord> {
    SheetNormalizer::new().normalize(rows)
}
