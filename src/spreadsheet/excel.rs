//! Office Open XML package helpers
use crate::error::DashboardError;
use crate::helpers::xml::XmlNodeHelper;
use crate::helpers::zip::ZipHelper;
use crate::match_xml_events;
use crate::spreadsheet::cell::CellType;
use crate::spreadsheet::SpreadsheetError;
use quick_xml::events::Event;
use std::borrow::Cow;
use std::collections::HashMap;
use std::io::Read;
use std::io::Seek;
use zip::ZipArchive;

/// XML tag name for relationship elements in Excel files
const TAG_RELATIONSHIP: &[u8] = b"Relationship";

/// Signature of an OLE compound file (encrypted packages and legacy `.xls`)
const CFB_SIGNATURE: [u8; 8] = [0xD0, 0xCF, 0x11, 0xE0, 0xA1, 0xB1, 0x1A, 0xE1];

/// Rejects content that is not a zip package before it reaches the zip reader.
///
/// Password protected workbooks are stored as a compound file holding an
/// `EncryptedPackage` stream; any other compound file is a legacy workbook.
pub(super) fn check_package(file_name: &str, bytes: &[u8]) -> Result<(), SpreadsheetError> {
    if !bytes.starts_with(&CFB_SIGNATURE) {
        return Ok(());
    }
    let stream_name: Vec<u8> = "EncryptedPackage"
        .encode_utf16()
        .flat_map(|unit| unit.to_le_bytes())
        .collect();
    if bytes.windows(stream_name.len()).any(|window| window == stream_name.as_slice()) {
        Err(SpreadsheetError::SpreadsheetPasswordProtectedError(file_name.to_owned()))
    } else {
        Err(SpreadsheetError::LegacyFormatError(file_name.to_owned()))
    }
}

/// Loads worksheet relationships, mapping relationship IDs to zip paths
pub(super) fn load_relationships<RS: Read + Seek>(
    zip: &mut ZipArchive<RS>,
    path: &str,
) -> Result<HashMap<String, String>, DashboardError> {
    let mut reader = zip
        .xml_reader(path)?
        .ok_or_else(|| SpreadsheetError::FileError(path.to_string()))?;
    let mut relationships: HashMap<String, String> = HashMap::new();
    match_xml_events!(reader => {
        Event::Start(event) if event.local_name().as_ref() == TAG_RELATIONSHIP => {
            let id = event.get_attribute_value("Id")?;
            let kind = event.get_attribute_value("Type")?;
            let target = event.get_attribute_value("Target")?;
            // Only worksheets; chartsheets and styles are skipped
            if kind.map(|it| it.ends_with("/worksheet")).unwrap_or(true) {
                if let Some((id, target)) = id.zip(target) {
                    relationships.insert(id.to_string(), to_zip_path(target));
                }
            }
        }
    });
    Ok(relationships)
}

/// Maps cell style indexes to cell types using custom and built-in formats
pub(super) fn load_number_formats(
    format_indexes: Vec<String>,
    custom_formats: HashMap<String, CellType>,
    is_1904: bool,
) -> Vec<CellType> {
    format_indexes
        .iter()
        .map(|id| {
            custom_formats
                .get(id)
                .copied()
                .or_else(|| CellType::parse_builtin_number_format_id(id, is_1904))
                .unwrap_or(CellType::Number)
        })
        .collect()
}

/// Normalizes a relationship target to a path inside the package
pub(crate) fn to_zip_path(path: Cow<'_, str>) -> String {
    if let Some(stripped) = path.strip_prefix("/xl/") {
        format!("xl/{stripped}")
    } else if path.starts_with("xl/") {
        path.to_string()
    } else if let Some(stripped) = path.strip_prefix('/') {
        stripped.to_string()
    } else {
        format!("xl/{path}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zip_paths() {
        assert_eq!(to_zip_path(Cow::Borrowed("worksheets/sheet1.xml")), "xl/worksheets/sheet1.xml");
        assert_eq!(to_zip_path(Cow::Borrowed("/xl/worksheets/sheet1.xml")), "xl/worksheets/sheet1.xml");
        assert_eq!(to_zip_path(Cow::Borrowed("xl/worksheets/sheet2.xml")), "xl/worksheets/sheet2.xml");
    }

    #[test]
    fn number_formats_prefer_custom() {
        let mut custom = HashMap::new();
        custom.insert("164".to_owned(), CellType::NumberDate1900);
        let formats = load_number_formats(
            vec!["0".to_owned(), "14".to_owned(), "164".to_owned(), "4".to_owned()],
            custom,
            false,
        );
        assert_eq!(
            formats,
            vec![CellType::Number, CellType::NumberDate1900, CellType::NumberDate1900, CellType::Number]
        );
    }

    #[test]
    fn compound_files_are_rejected() {
        let mut encrypted = CFB_SIGNATURE.to_vec();
        encrypted.extend("EncryptedPackage".encode_utf16().flat_map(|unit| unit.to_le_bytes()));
        assert!(matches!(
            check_package("vendas.xlsx", &encrypted),
            Err(SpreadsheetError::SpreadsheetPasswordProtectedError(_))
        ));
        assert!(matches!(
            check_package("vendas.xlsx", &CFB_SIGNATURE),
            Err(SpreadsheetError::LegacyFormatError(_))
        ));
        assert!(check_package("vendas.xlsx", b"PK\x03\x04").is_ok());
    }
}
