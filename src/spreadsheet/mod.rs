//! # Spreadsheet Reading
//!
//! Reads `.xlsx` workbooks into a [`RecordTable`]. The package is parsed with
//! `zip` and `quick-xml`: workbook relationships give the worksheet parts,
//! `styles.xml` decides which numeric cells are dates, and shared strings are
//! resolved when a sheet is converted.
//!
//! One sheet is read per upload: the first sheet accepted by the loader
//! criteria. When that sheet cannot be read, the first sheet of the workbook
//! is read instead. An empty sheet reads as an empty table.

pub(crate) mod cell;
pub(crate) mod excel;
pub(crate) mod reference;
pub(crate) mod sheet;
pub(crate) mod xlsx;

use crate::error::DashboardError;
use crate::error::ResultMessage;
use crate::helpers::reader::UploadedFile;
use crate::loader::criteria::Criteria;
use crate::spreadsheet::xlsx::XlsxWorkbook;
use crate::table::RecordTable;
use std::io::Read;
use std::io::Seek;
use thiserror::Error;
use tracing::info;
use tracing::warn;

/// Sheet read when no other is selected or the selected one fails
const DEFAULT_SHEET: usize = 0;

#[derive(Error, Debug)]
pub enum SpreadsheetError {
    #[error("Missing package part '{0}'")]
    FileError(String),

    #[error("Spreadsheet '{0}' has no worksheets")]
    SpreadsheetEmptyError(String),

    #[error("Spreadsheet '{0}' is password protected")]
    SpreadsheetPasswordProtectedError(String),

    #[error("Spreadsheet '{0}' uses the legacy binary format, save it as .xlsx")]
    LegacyFormatError(String),

    #[error("Sheet '{0}' not found")]
    SheetNotFound(String),
}

/// Reads the selected worksheet of an uploaded workbook.
pub(crate) fn read_workbook(upload: &UploadedFile, criteria: &Criteria) -> Result<RecordTable, DashboardError> {
    excel::check_package(&upload.name, &upload.bytes)?;
    let mut workbook = XlsxWorkbook::open(&upload.name, upload.cursor())
        .with_prefix(&format!("Open workbook '{}'", upload.name))?;

    let preferred = workbook.sheet_names().position(|name| criteria.accept(name));
    match preferred {
        Some(DEFAULT_SHEET) => return read_table(&mut workbook, DEFAULT_SHEET, criteria),
        Some(index) => match read_table(&mut workbook, index, criteria) {
            Ok(table) => return Ok(table),
            Err(error) => warn!(file = upload.name, %error, "selected sheet unreadable, retrying with default sheet"),
        },
        None => warn!(file = upload.name, "no sheet matches the configured pattern, using default sheet"),
    }
    read_table(&mut workbook, DEFAULT_SHEET, criteria)
}

fn read_table<RS: Read + Seek>(
    workbook: &mut XlsxWorkbook<RS>,
    index: usize,
    criteria: &Criteria,
) -> Result<RecordTable, DashboardError> {
    let sheet = workbook.read_sheet(index)?;
    let table = sheet.to_table(workbook.shared_strings(), &criteria.nulls);
    info!(
        file = workbook.name,
        sheet = sheet.name,
        rows = table.row_count(),
        columns = table.columns.len(),
        "read worksheet"
    );
    Ok(table)
}

/// In-memory `.xlsx` packages for tests.
#[cfg(test)]
pub(crate) mod fixtures {
    use std::io::Cursor;
    use std::io::Write;
    use zip::write::SimpleFileOptions;
    use zip::ZipWriter;

    /// Builds a minimal workbook. Cell text prefixes pick the cell kind:
    /// `s:` shared string, `i:` inline string, `d:` date-styled serial,
    /// `b:` boolean, `e:` error. Unprefixed text is a number when it parses
    /// as one, a shared string otherwise; empty text leaves the cell out.
    pub(crate) struct WorkbookBuilder {
        sheets: Vec<(String, Vec<Vec<String>>)>,
        is_1904: bool,
        broken_sheets: Vec<usize>,
    }

    impl WorkbookBuilder {
        pub(crate) fn new() -> Self {
            WorkbookBuilder {
                sheets: Vec::new(),
                is_1904: false,
                broken_sheets: Vec::new(),
            }
        }

        pub(crate) fn sheet(mut self, name: &str, rows: &[&[&str]]) -> Self {
            let rows = rows
                .iter()
                .map(|row| row.iter().map(|cell| cell.to_string()).collect())
                .collect();
            self.sheets.push((name.to_owned(), rows));
            self
        }

        pub(crate) fn date1904(mut self) -> Self {
            self.is_1904 = true;
            self
        }

        /// Writes malformed XML for the most recently added sheet.
        pub(crate) fn broken(mut self) -> Self {
            self.broken_sheets.push(self.sheets.len() - 1);
            self
        }

        pub(crate) fn build(self) -> Vec<u8> {
            let mut shared_strings = Vec::<String>::new();
            let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
            let options = SimpleFileOptions::default();

            let mut workbook = String::from(
                r#"<?xml version="1.0" encoding="UTF-8"?><workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">"#,
            );
            workbook.push_str(&format!(r#"<workbookPr date1904="{}"/><sheets>"#, if self.is_1904 { 1 } else { 0 }));
            let mut relationships = String::from(
                r#"<?xml version="1.0" encoding="UTF-8"?><Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
            );
            for (index, (name, rows)) in self.sheets.iter().enumerate() {
                let number = index + 1;
                workbook.push_str(&format!(r#"<sheet name="{name}" sheetId="{number}" r:id="rId{number}"/>"#));
                relationships.push_str(&format!(
                    r#"<Relationship Id="rId{number}" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet{number}.xml"/>"#
                ));

                let mut xml = String::from(r#"<?xml version="1.0" encoding="UTF-8"?><worksheet><sheetData>"#);
                if self.broken_sheets.contains(&index) {
                    xml.push_str(r#"<row r="1"><c r="A1" t="inlineStr"><is><t>&bogus;</t></is></c></row>"#);
                }
                for (row_index, row) in rows.iter().enumerate() {
                    xml.push_str(&format!(r#"<row r="{}">"#, row_index + 1));
                    for (col_index, text) in row.iter().enumerate() {
                        if text.is_empty() {
                            continue;
                        }
                        let reference = format!("{}{}", (b'A' + col_index as u8) as char, row_index + 1);
                        xml.push_str(&cell_xml(&reference, text, &mut shared_strings));
                    }
                    xml.push_str("</row>");
                }
                xml.push_str("</sheetData></worksheet>");
                writer.start_file(format!("xl/worksheets/sheet{number}.xml"), options).unwrap();
                writer.write_all(xml.as_bytes()).unwrap();
            }
            workbook.push_str("</sheets></workbook>");
            relationships.push_str(
                r#"<Relationship Id="rId100" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/></Relationships>"#,
            );

            let styles = r#"<?xml version="1.0" encoding="UTF-8"?><styleSheet><cellStyleXfs count="1"><xf numFmtId="0"/></cellStyleXfs><cellXfs count="2"><xf numFmtId="0" xfId="0"/><xf numFmtId="14" xfId="0" applyNumberFormat="1"/></cellXfs></styleSheet>"#;

            let mut strings = String::from(r#"<?xml version="1.0" encoding="UTF-8"?><sst>"#);
            for string in &shared_strings {
                strings.push_str(&format!("<si><t>{}</t></si>", escape(string)));
            }
            strings.push_str("</sst>");

            for (path, content) in [
                ("xl/workbook.xml", workbook.as_str()),
                ("xl/_rels/workbook.xml.rels", relationships.as_str()),
                ("xl/styles.xml", styles),
                ("xl/sharedStrings.xml", strings.as_str()),
            ] {
                writer.start_file(path, options).unwrap();
                writer.write_all(content.as_bytes()).unwrap();
            }
            writer.finish().unwrap().into_inner()
        }
    }

    fn cell_xml(reference: &str, text: &str, shared_strings: &mut Vec<String>) -> String {
        let mut shared = |value: &str| {
            shared_strings.push(value.to_owned());
            format!(r#"<c r="{reference}" t="s"><v>{}</v></c>"#, shared_strings.len() - 1)
        };
        if let Some(value) = text.strip_prefix("s:") {
            shared(value)
        } else if let Some(value) = text.strip_prefix("i:") {
            format!(r#"<c r="{reference}" t="inlineStr"><is><t>{}</t></is></c>"#, escape(value))
        } else if let Some(value) = text.strip_prefix("d:") {
            format!(r#"<c r="{reference}" s="1"><v>{value}</v></c>"#)
        } else if let Some(value) = text.strip_prefix("b:") {
            format!(r#"<c r="{reference}" t="b"><v>{value}</v></c>"#)
        } else if let Some(value) = text.strip_prefix("e:") {
            format!(r#"<c r="{reference}" t="e"><v>{value}</v></c>"#)
        } else if text.parse::<f64>().is_ok() {
            format!(r#"<c r="{reference}"><v>{text}</v></c>"#)
        } else {
            shared(text)
        }
    }

    fn escape(text: &str) -> String {
        text.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
    }
}
