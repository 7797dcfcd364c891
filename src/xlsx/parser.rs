//! XLSX parser implementation.

use crate::container::{Relationships, SpreadsheetPackage};
use crate::detect::detect_format_from_bytes;
use crate::error::{Error, Result};
use crate::model::{CellGrid, CellValue, Sheet, Workbook};
use std::path::Path;

use super::shared_strings::SharedStrings;

const DEFAULT_WORKBOOK_PATH: &str = "xl/workbook.xml";
const DEFAULT_SHARED_STRINGS_PATH: &str = "xl/sharedStrings.xml";

/// Sheet info from workbook.xml.
#[derive(Debug, Clone)]
struct SheetInfo {
    name: String,
    rel_id: String,
}

/// Parser for XLSX (Excel) workbooks.
pub struct XlsxParser {
    package: SpreadsheetPackage,
    workbook_path: String,
    shared_strings: SharedStrings,
    sheets: Vec<SheetInfo>,
    relationships: Relationships,
}

impl XlsxParser {
    /// Open an XLSX file for parsing.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let data = std::fs::read(path.as_ref())?;
        Self::from_bytes(data)
    }

    /// Create a parser from bytes.
    ///
    /// Fails with [`Error::UnknownFormat`] if the bytes are not a
    /// spreadsheet package.
    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        detect_format_from_bytes(&data)?;
        let package = SpreadsheetPackage::from_bytes(data)?;
        Self::from_package(package)
    }

    fn from_package(package: SpreadsheetPackage) -> Result<Self> {
        let workbook_path = package
            .read_relationships("")?
            .find_by_type("/officeDocument")
            .map(|rel| SpreadsheetPackage::resolve_path("", &rel.target))
            .unwrap_or_else(|| DEFAULT_WORKBOOK_PATH.to_string());

        let workbook_xml = package.read_xml(&workbook_path)?;
        let sheets = Self::parse_workbook(&workbook_xml)?;
        let relationships = package.read_relationships(&workbook_path)?;

        let shared_strings_path = relationships
            .find_by_type("/sharedStrings")
            .map(|rel| SpreadsheetPackage::resolve_path(&workbook_path, &rel.target))
            .unwrap_or_else(|| DEFAULT_SHARED_STRINGS_PATH.to_string());

        let shared_strings = if package.exists(&shared_strings_path) {
            SharedStrings::parse(&package.read_xml(&shared_strings_path)?)?
        } else {
            SharedStrings::default()
        };

        Ok(Self {
            package,
            workbook_path,
            shared_strings,
            sheets,
            relationships,
        })
    }

    /// Parse workbook.xml for sheet info, in declaration order.
    fn parse_workbook(xml: &str) -> Result<Vec<SheetInfo>> {
        let mut sheets = Vec::new();
        let mut reader = quick_xml::Reader::from_str(xml);
        reader.config_mut().trim_text(true);

        let mut buf = Vec::new();

        loop {
            match reader.read_event_into(&mut buf) {
                Ok(quick_xml::events::Event::Empty(e))
                | Ok(quick_xml::events::Event::Start(e)) => {
                    if e.local_name().as_ref() == b"sheet" {
                        let mut name = String::new();
                        let mut rel_id = String::new();

                        for attr in e.attributes().flatten() {
                            let key = attr.key.as_ref();
                            if key == b"name" {
                                name = attr
                                    .unescape_value()
                                    .map(|v| v.into_owned())
                                    .unwrap_or_else(|_| {
                                        String::from_utf8_lossy(&attr.value).to_string()
                                    });
                            } else if key.ends_with(b":id") {
                                rel_id = String::from_utf8_lossy(&attr.value).to_string();
                            }
                        }

                        if !name.is_empty() {
                            sheets.push(SheetInfo { name, rel_id });
                        }
                    }
                }
                Ok(quick_xml::events::Event::Eof) => break,
                Err(e) => return Err(Error::XmlParse(e.to_string())),
                _ => {}
            }
            buf.clear();
        }

        Ok(sheets)
    }

    /// Parse every sheet and return the workbook model.
    pub fn parse(&self) -> Result<Workbook> {
        let mut sheets = Vec::with_capacity(self.sheets.len());

        for info in &self.sheets {
            let rows = match self.sheet_part(info) {
                Some(path) if self.package.exists(&path) => {
                    let xml = self.package.read_xml(&path)?;
                    self.parse_sheet(&xml)?.into_raw_rows()
                }
                _ => {
                    tracing::warn!(sheet = %info.name, "worksheet part not found, treating as empty");
                    Vec::new()
                }
            };
            sheets.push(Sheet::new(info.name.clone(), rows));
        }

        Ok(Workbook::new(sheets))
    }

    /// Package path of a sheet's XML part.
    fn sheet_part(&self, info: &SheetInfo) -> Option<String> {
        self.relationships
            .get(&info.rel_id)
            .map(|rel| SpreadsheetPackage::resolve_path(&self.workbook_path, &rel.target))
    }

    /// Parse a worksheet XML into a cell grid.
    fn parse_sheet(&self, xml: &str) -> Result<CellGrid> {
        let mut grid = CellGrid::new();
        let mut reader = quick_xml::Reader::from_str(xml);

        let mut buf = Vec::new();
        let mut in_cell = false;
        let mut in_value = false;
        let mut in_phonetic = false;
        let mut row_idx: Option<u32> = None;
        let mut col_idx: Option<u32> = None;
        let mut cell_pos = (0u32, 0u32);
        let mut cell_type: Option<String> = None;
        let mut cell_value = String::new();
        let mut has_value = false;

        loop {
            match reader.read_event_into(&mut buf) {
                Ok(quick_xml::events::Event::Start(ref e)) => match e.local_name().as_ref() {
                    b"row" => {
                        row_idx = Some(next_row(e, row_idx));
                        col_idx = None;
                    }
                    b"c" => {
                        let (pos, t) = cell_start(e, row_idx, col_idx);
                        cell_pos = pos;
                        col_idx = Some(pos.1);
                        cell_type = t;
                        cell_value.clear();
                        has_value = false;
                        in_cell = true;
                    }
                    b"rPh" if in_cell => in_phonetic = true,
                    b"v" | b"t" if in_cell && !in_phonetic => {
                        in_value = true;
                        has_value = true;
                    }
                    _ => {}
                },
                Ok(quick_xml::events::Event::Empty(ref e)) => match e.local_name().as_ref() {
                    b"row" => {
                        row_idx = Some(next_row(e, row_idx));
                        col_idx = None;
                    }
                    b"c" => {
                        let (pos, _) = cell_start(e, row_idx, col_idx);
                        col_idx = Some(pos.1);
                        grid.insert(pos.0, pos.1, None);
                    }
                    // <t/> inside an inline string is an empty string
                    b"v" | b"t" if in_cell && !in_phonetic => has_value = true,
                    _ => {}
                },
                Ok(quick_xml::events::Event::Text(ref e)) => {
                    if in_value {
                        let text = e.unescape().unwrap_or_default();
                        cell_value.push_str(&text);
                    }
                }
                Ok(quick_xml::events::Event::End(ref e)) => match e.local_name().as_ref() {
                    b"c" => {
                        let value = if has_value {
                            self.resolve_cell_value(&cell_value, cell_type.as_deref())
                        } else {
                            None
                        };
                        grid.insert(cell_pos.0, cell_pos.1, value);
                        in_cell = false;
                    }
                    b"rPh" => in_phonetic = false,
                    b"v" | b"t" => in_value = false,
                    _ => {}
                },
                Ok(quick_xml::events::Event::Eof) => break,
                Err(e) => return Err(Error::XmlParse(e.to_string())),
                _ => {}
            }
            buf.clear();
        }

        Ok(grid)
    }

    /// Resolve a cell value based on its type attribute.
    fn resolve_cell_value(&self, value: &str, cell_type: Option<&str>) -> Option<CellValue> {
        match cell_type {
            Some("s") => value
                .trim()
                .parse::<usize>()
                .ok()
                .and_then(|idx| self.shared_strings.get(idx))
                .map(CellValue::text),
            Some("b") => Some(CellValue::Bool(value.trim() == "1")),
            // Error cells (#N/A, #DIV/0!, ...) carry no data
            Some("e") => None,
            Some("str") | Some("inlineStr") | Some("d") => Some(CellValue::text(value)),
            _ => value
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|n| n.is_finite())
                .map(CellValue::Number),
        }
    }

    /// Get a reference to the package.
    pub fn package(&self) -> &SpreadsheetPackage {
        &self.package
    }

    /// Get the number of sheets.
    pub fn sheet_count(&self) -> usize {
        self.sheets.len()
    }

    /// Get sheet names in declaration order.
    pub fn sheet_names(&self) -> Vec<&str> {
        self.sheets.iter().map(|s| s.name.as_str()).collect()
    }
}

/// Zero-based index of a `<row>` element, from its `r` attribute or by
/// following the previous row.
fn next_row(e: &quick_xml::events::BytesStart<'_>, previous: Option<u32>) -> u32 {
    e.attributes()
        .flatten()
        .find(|a| a.key.as_ref() == b"r")
        .and_then(|a| String::from_utf8_lossy(&a.value).trim().parse::<u32>().ok())
        .and_then(|r| r.checked_sub(1))
        .unwrap_or_else(|| previous.map_or(0, |p| p + 1))
}

/// Position and type of a `<c>` element.
///
/// Cells without an `r` reference follow the previous cell in the row.
fn cell_start(
    e: &quick_xml::events::BytesStart<'_>,
    row: Option<u32>,
    previous_col: Option<u32>,
) -> ((u32, u32), Option<String>) {
    let mut reference = None;
    let mut cell_type = None;

    for attr in e.attributes().flatten() {
        match attr.key.as_ref() {
            b"r" => reference = parse_cell_ref(&String::from_utf8_lossy(&attr.value)),
            b"t" => cell_type = Some(String::from_utf8_lossy(&attr.value).to_string()),
            _ => {}
        }
    }

    let pos = reference.unwrap_or_else(|| {
        (
            row.unwrap_or(0),
            previous_col.map_or(0, |c| c + 1),
        )
    });
    (pos, cell_type)
}

/// Number of columns in a worksheet (`A` through `XFD`).
const MAX_COLUMNS: u32 = 16_384;

/// Parse an A1-style reference into zero-based `(row, col)`.
///
/// Columns past `XFD` are rejected.
pub(crate) fn parse_cell_ref(reference: &str) -> Option<(u32, u32)> {
    let reference = reference.trim();
    let split = reference.find(|c: char| c.is_ascii_digit())?;
    let (letters, digits) = reference.split_at(split);
    if letters.is_empty() {
        return None;
    }

    let mut col: u32 = 0;
    for b in letters.bytes() {
        if !b.is_ascii_alphabetic() {
            return None;
        }
        let digit = u32::from(b.to_ascii_uppercase() - b'A' + 1);
        col = col.checked_mul(26)?.checked_add(digit)?;
        if col > MAX_COLUMNS {
            return None;
        }
    }

    let row: u32 = digits.parse().ok()?;
    Some((row.checked_sub(1)?, col - 1))
}
