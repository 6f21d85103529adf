//! # File Loader
//!
//! Turns an upload into a [`RecordTable`]: `.csv` names go through the
//! delimited reader, everything else is read as an `.xlsx` workbook. Column
//! names are trimmed and empty ones get a positional placeholder name.

pub(crate) mod criteria;

use crate::delimited::read_delimited;
use crate::error::DashboardError;
use crate::helpers::reader::UploadedFile;
use crate::loader::criteria::Criteria;
use crate::spreadsheet::read_workbook;
use crate::table::Column;
use crate::table::RecordTable;
use tracing::info;

/// Loads an upload into a record table with normalized column names.
pub(crate) fn load_table(upload: &UploadedFile, criteria: &Criteria) -> Result<RecordTable, DashboardError> {
    let table = if upload.is_delimited() {
        read_delimited(upload, criteria)?
    } else {
        read_workbook(upload, criteria)?
    };
    let table = normalize_headers(table);
    info!(
        file = upload.name,
        rows = table.row_count(),
        columns = table.columns.len(),
        "loaded table"
    );
    Ok(table)
}

/// Trims every column name; empty names become `Unnamed: <position>`.
fn normalize_headers(table: RecordTable) -> RecordTable {
    let columns = table
        .columns
        .into_iter()
        .enumerate()
        .map(|(index, column)| {
            let name = match column.name.trim() {
                "" => format!("Unnamed: {index}"),
                name => name.to_owned(),
            };
            Column::new(name, column.values)
        })
        .collect();
    RecordTable { columns }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spreadsheet::fixtures::WorkbookBuilder;
    use crate::table::Value;

    #[test]
    fn csv_headers_are_trimmed() {
        let upload = UploadedFile::new("VENDAS.CSV", " Evento ;;Faturamento Total \nCirco A;x;10\n");
        let table = load_table(&upload, &Criteria::default()).unwrap();
        assert_eq!(
            table.column_names().collect::<Vec<_>>(),
            vec!["Evento", "Unnamed: 1", "Faturamento Total"]
        );
        assert_eq!(table.columns[2].values, vec![Value::Number(10.0)]);
    }

    #[test]
    fn other_extensions_are_workbooks() {
        let bytes = WorkbookBuilder::new()
            .sheet("Plan1", &[&[" Evento", "", "Faturamento Total"], &["Circo A", "1", "10"]])
            .build();
        let table = load_table(&UploadedFile::new("vendas.xlsx", bytes), &Criteria::default()).unwrap();
        assert_eq!(
            table.column_names().collect::<Vec<_>>(),
            vec!["Evento", "Unnamed: 1", "Faturamento Total"]
        );
    }

    #[test]
    fn loading_is_idempotent() {
        let upload = UploadedFile::new("vendas.csv", "Evento,Data Evento\nCirco A,01/02/2023\n");
        let first = load_table(&upload, &Criteria::default()).unwrap();
        let second = load_table(&upload, &Criteria::default()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn csv_is_not_parsed_as_workbook() {
        let upload = UploadedFile::new("vendas.txt", "Evento,Data\n");
        assert!(load_table(&upload, &Criteria::default()).is_err());
    }
}
