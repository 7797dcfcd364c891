//! In-memory workbook builder shared by the integration tests.

#![allow(dead_code)]

use std::io::{Cursor, Write};
use std::path::PathBuf;
use zip::write::SimpleFileOptions;

/// A cell written into a generated worksheet.
#[derive(Debug, Clone)]
pub enum Cell {
    Text(&'static str),
    Number(f64),
    Empty,
}

/// Builds minimal `.xlsx` packages sheet by sheet.
#[derive(Debug, Default)]
pub struct WorkbookBuilder {
    sheets: Vec<(String, Vec<Vec<Cell>>)>,
}

impl WorkbookBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sheet(mut self, name: &str, rows: Vec<Vec<Cell>>) -> Self {
        self.sheets.push((name.to_string(), rows));
        self
    }

    pub fn build(&self) -> Vec<u8> {
        let mut buffer = Vec::new();
        {
            let mut zip = zip::ZipWriter::new(Cursor::new(&mut buffer));
            let options = SimpleFileOptions::default();
            let mut write = |name: &str, body: &str| {
                zip.start_file(name, options).unwrap();
                zip.write_all(body.as_bytes()).unwrap();
            };

            write("[Content_Types].xml", CONTENT_TYPES);

            let mut sheets = String::new();
            let mut rels = String::new();
            for (idx, (name, _)) in self.sheets.iter().enumerate() {
                let id = idx + 1;
                sheets.push_str(&format!(
                    r#"<sheet name="{}" sheetId="{id}" r:id="rId{id}"/>"#,
                    escape(name)
                ));
                rels.push_str(&format!(
                    r#"<Relationship Id="rId{id}" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet{id}.xml"/>"#
                ));
            }
            write(
                "xl/workbook.xml",
                &format!(
                    r#"<workbook xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships"><sheets>{sheets}</sheets></workbook>"#
                ),
            );
            write(
                "xl/_rels/workbook.xml.rels",
                &format!("<Relationships>{rels}</Relationships>"),
            );

            for (idx, (_, rows)) in self.sheets.iter().enumerate() {
                write(
                    &format!("xl/worksheets/sheet{}.xml", idx + 1),
                    &sheet_xml(rows),
                );
            }

            zip.finish().unwrap();
        }
        buffer
    }

    /// Write the package into `dir` and return its path.
    pub fn write_to(&self, dir: &tempfile::TempDir, name: &str) -> PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, self.build()).unwrap();
        path
    }
}

/// Workbook with an `Au` sheet (one Gold row) and an `Ag` sheet.
pub fn optical_workbook() -> WorkbookBuilder {
    use Cell::*;

    WorkbookBuilder::new()
        .sheet(
            "Au",
            vec![
                vec![Text("Material"), Text("Wavelength"), Text("n"), Text("k")],
                vec![Text("Gold"), Text("600nm"), Number(0.2), Number(3.5)],
            ],
        )
        .sheet(
            "Ag",
            vec![
                vec![Text("MAT"), Text("lambda (nm)"), Text("n"), Text("Q-PL")],
                vec![Text("Silver"), Number(450.0), Number(0.05), Text("0.8")],
                vec![Empty, Empty, Empty, Empty],
                vec![Empty, Number(500.0), Text("n/a"), Empty],
            ],
        )
}

fn sheet_xml(rows: &[Vec<Cell>]) -> String {
    let mut xml = String::from("<worksheet><sheetData>");
    for (r, row) in rows.iter().enumerate() {
        xml.push_str(&format!(r#"<row r="{}">"#, r + 1));
        for (c, cell) in row.iter().enumerate() {
            let reference = format!("{}{}", column_name(c), r + 1);
            match cell {
                Cell::Text(text) => xml.push_str(&format!(
                    r#"<c r="{reference}" t="inlineStr"><is><t>{}</t></is></c>"#,
                    escape(text)
                )),
                Cell::Number(value) => {
                    xml.push_str(&format!(r#"<c r="{reference}"><v>{value}</v></c>"#))
                }
                Cell::Empty => {}
            }
        }
        xml.push_str("</row>");
    }
    xml.push_str("</sheetData></worksheet>");
    xml
}

fn column_name(mut index: usize) -> String {
    let mut name = String::new();
    loop {
        name.insert(0, (b'A' + (index % 26) as u8) as char);
        if index < 26 {
            break;
        }
        index = index / 26 - 1;
    }
    name
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

const CONTENT_TYPES: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
  <Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/>
</Types>"#;
