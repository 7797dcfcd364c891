//! Workbook, sheet and raw row structures.

use super::CellValue;
use std::collections::{BTreeMap, HashMap};

/// Label given to columns whose header cell is empty.
pub const EMPTY_HEADER: &str = "__EMPTY";

/// One worksheet row keyed by column label, before normalization.
///
/// Columns keep the sheet's left-to-right order. Every column of the sheet
/// is present; cells that were empty hold `None`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawRow {
    columns: Vec<(String, Option<CellValue>)>,
}

impl RawRow {
    /// Create an empty row.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style append of a present value.
    pub fn with(mut self, label: impl Into<String>, value: impl Into<CellValue>) -> Self {
        self.push(label, Some(value.into()));
        self
    }

    /// Builder-style append of an empty cell.
    pub fn with_null(mut self, label: impl Into<String>) -> Self {
        self.push(label, None);
        self
    }

    /// Append a column.
    pub fn push(&mut self, label: impl Into<String>, value: Option<CellValue>) {
        self.columns.push((label.into(), value));
    }

    /// Get the value under an exact label. Empty cells yield `None`.
    pub fn get(&self, label: &str) -> Option<&CellValue> {
        self.columns
            .iter()
            .find(|(l, _)| l == label)
            .and_then(|(_, v)| v.as_ref())
    }

    /// Iterate over `(label, value)` pairs in column order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&CellValue>)> {
        self.columns.iter().map(|(l, v)| (l.as_str(), v.as_ref()))
    }

    /// Column labels in order.
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|(l, _)| l.as_str())
    }

    /// Number of columns.
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Check if the row has no columns.
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Check if every cell in the row is empty.
    pub fn is_blank(&self) -> bool {
        self.columns.iter().all(|(_, v)| v.is_none())
    }
}

/// Cells collected from one worksheet, addressed by zero-based `(row, col)`.
///
/// A cell element without a usable value is stored as `None`; it still
/// widens the sheet's used range.
#[derive(Debug, Clone, Default)]
pub struct CellGrid {
    cells: BTreeMap<(u32, u32), Option<CellValue>>,
}

impl CellGrid {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, row: u32, col: u32, value: Option<CellValue>) {
        self.cells.insert((row, col), value);
    }

    pub fn get(&self, row: u32, col: u32) -> Option<&CellValue> {
        self.cells.get(&(row, col)).and_then(|v| v.as_ref())
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Used range as `(first_row, last_row, first_col, last_col)`, inclusive.
    pub fn range(&self) -> Option<(u32, u32, u32, u32)> {
        let first_row = self.cells.keys().next()?.0;
        let last_row = self.cells.keys().next_back()?.0;
        let first_col = self.cells.keys().map(|(_, c)| *c).min()?;
        let last_col = self.cells.keys().map(|(_, c)| *c).max()?;
        Some((first_row, last_row, first_col, last_col))
    }

    /// Column labels taken from the first row of the used range.
    ///
    /// Empty header cells become [`EMPTY_HEADER`]; repeated labels get a
    /// `_1`, `_2`, ... suffix, skipping suffixes that are already taken.
    pub fn headers(&self) -> Vec<String> {
        let Some((header_row, _, first_col, last_col)) = self.range() else {
            return Vec::new();
        };

        let mut seen: HashMap<String, usize> = HashMap::new();
        let mut headers = Vec::with_capacity((last_col - first_col + 1) as usize);

        for col in first_col..=last_col {
            let base = self
                .get(header_row, col)
                .map(|v| v.to_string())
                .unwrap_or_else(|| EMPTY_HEADER.to_string());

            let label = match seen.get(&base).copied() {
                None => {
                    seen.insert(base.clone(), 1);
                    base
                }
                Some(mut counter) => {
                    let mut candidate = format!("{}_{}", base, counter);
                    counter += 1;
                    while seen.contains_key(&candidate) {
                        candidate = format!("{}_{}", base, counter);
                        counter += 1;
                    }
                    seen.insert(base, counter);
                    seen.insert(candidate.clone(), 1);
                    candidate
                }
            };
            headers.push(label);
        }

        headers
    }

    /// Convert the grid into header-keyed rows.
    ///
    /// The first row of the used range provides the labels. Each later row
    /// yields one [`RawRow`] carrying every label; rows whose cells are all
    /// empty are dropped.
    pub fn into_raw_rows(self) -> Vec<RawRow> {
        let Some((header_row, _, first_col, last_col)) = self.range() else {
            return Vec::new();
        };
        let headers = self.headers();
        let width = headers.len();

        let mut grouped: BTreeMap<u32, Vec<Option<CellValue>>> = BTreeMap::new();
        for ((row, col), value) in self.cells {
            if row == header_row {
                continue;
            }
            let slots = grouped.entry(row).or_insert_with(|| vec![None; width]);
            slots[(col - first_col) as usize] = value;
        }
        debug_assert_eq!(width, (last_col - first_col + 1) as usize);

        grouped
            .into_values()
            .map(|values| RawRow {
                columns: headers.iter().cloned().zip(values).collect(),
            })
            .filter(|row| !row.is_blank())
            .collect()
    }
}

/// A named worksheet.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Sheet {
    /// Sheet name as declared in the workbook
    pub name: String,
    /// Data rows (the header row is not included)
    pub rows: Vec<RawRow>,
}

impl Sheet {
    /// Create a sheet from its name and rows.
    pub fn new(name: impl Into<String>, rows: Vec<RawRow>) -> Self {
        Self {
            name: name.into(),
            rows,
        }
    }
}

/// A parsed workbook: sheets in the order the file declares them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Workbook {
    sheets: Vec<Sheet>,
}

impl Workbook {
    /// Create a workbook from sheets in declaration order.
    pub fn new(sheets: Vec<Sheet>) -> Self {
        Self { sheets }
    }

    /// Sheet names in declaration order.
    pub fn sheet_names(&self) -> Vec<String> {
        self.sheets.iter().map(|s| s.name.clone()).collect()
    }

    /// Look up a sheet by exact name.
    pub fn sheet(&self, name: &str) -> Option<&Sheet> {
        self.sheets.iter().find(|s| s.name == name)
    }

    /// The first declared sheet.
    pub fn first_sheet(&self) -> Option<&Sheet> {
        self.sheets.first()
    }

    /// All sheets.
    pub fn sheets(&self) -> &[Sheet] {
        &self.sheets
    }

    /// Number of sheets.
    pub fn len(&self) -> usize {
        self.sheets.len()
    }

    /// Check if the workbook has no sheets.
    pub fn is_empty(&self) -> bool {
        self.sheets.is_empty()
    }
}
