//! CSV export of the filtered table.

use crate::error::DashboardError;
use crate::table::Column;
use crate::table::RecordTable;
use crate::table::Value;
use chrono::NaiveTime;
use csv::WriterBuilder;
use serde::Serialize;

pub const CSV_MIME_TYPE: &str = "text/csv";

/// The download offered next to the table.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CsvDownload {
    pub file_name: String,
    pub mime_type: &'static str,
    #[serde(skip)]
    pub bytes: Vec<u8>,
}

impl CsvDownload {
    pub fn new(table: &RecordTable, file_name: &str) -> Result<CsvDownload, DashboardError> {
        Ok(CsvDownload {
            file_name: file_name.to_owned(),
            mime_type: CSV_MIME_TYPE,
            bytes: to_csv(table)?,
        })
    }
}

/// Writes the table as UTF-8 CSV: comma separated, header row, no index.
/// Missing cells are empty fields; a date column is written without times
/// when every date in it falls at midnight.
pub fn to_csv(table: &RecordTable) -> Result<Vec<u8>, DashboardError> {
    let mut writer = WriterBuilder::new().from_writer(Vec::new());
    writer.write_record(table.column_names())?;

    let date_only: Vec<bool> = table.columns.iter().map(is_date_only).collect();
    for row in 0..table.row_count() {
        let record = table.columns.iter().zip(&date_only).map(|(column, date_only)| {
            match column.values.get(row) {
                Some(Value::Date(date)) if !*date_only => date.format("%Y-%m-%d %H:%M:%S").to_string(),
                Some(value) => value.to_string(),
                None => String::new(),
            }
        });
        writer.write_record(record)?;
    }
    writer
        .into_inner()
        .map_err(|error| DashboardError::IoError(error.into_error()))
}

fn is_date_only(column: &Column) -> bool {
    column
        .values
        .iter()
        .filter_map(Value::as_date)
        .all(|date| date.time() == NaiveTime::MIN)
}
